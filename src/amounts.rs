// Exact-precision currency amounts
// This file implements token-denominated amounts backed by big rationals so
// that bucket splits and quote comparisons never drift
//
// Numan Thabit 2025 Nov

use crate::errors::{Result, RouterError};
use crate::tokens::Token;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::fmt;

pub type Fraction = BigRational;

/// `numerator / denominator` as an exact fraction. `denominator` must be non-zero.
pub fn fraction(numerator: u64, denominator: u64) -> Fraction {
    BigRational::new(BigInt::from(numerator), BigInt::from(denominator))
}

/// Largest decimal exponent accepted in either direction.
const MAX_EXPONENT: u64 = 255;
/// Most significant digits accepted in one decimal string.
const MAX_DIGITS: usize = 128;

fn pow10(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// Parse a decimal string ("12", "-0.5", "1.25e-3") into an exact fraction.
pub fn parse_decimal(value: &str) -> Result<Fraction> {
    let invalid = || RouterError::InvalidAmount(format!("malformed decimal {value:?}"));
    let trimmed = value.trim();

    let (mantissa, exponent) = match trimmed.find(['e', 'E']) {
        Some(idx) => {
            let exp: i64 = trimmed[idx + 1..].parse().map_err(|_| invalid())?;
            if exp.unsigned_abs() > MAX_EXPONENT {
                return Err(RouterError::InvalidAmount(format!(
                    "exponent of {value:?} is outside ±{MAX_EXPONENT}"
                )));
            }
            (&trimmed[..idx], exp)
        }
        None => (trimmed, 0),
    };

    let (negative, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let digits = format!("{int_part}{frac_part}");
    if digits.len() > MAX_DIGITS {
        return Err(RouterError::InvalidAmount(format!(
            "{} digits exceed the limit of {MAX_DIGITS}",
            digits.len()
        )));
    }
    let mut numerator: BigInt = if digits.is_empty() {
        BigInt::zero()
    } else {
        digits.parse().map_err(|_| invalid())?
    };
    if negative {
        numerator = -numerator;
    }

    let scale = i64::try_from(frac_part.len())
        .ok()
        .and_then(|places| exponent.checked_sub(places))
        .ok_or_else(invalid)?;
    let value = if scale >= 0 {
        BigRational::from_integer(numerator * pow10(scale as u32))
    } else {
        BigRational::new(numerator, pow10(scale.unsigned_abs() as u32))
    };
    Ok(value)
}

/// Convert a human-readable amount ("1.5") into raw token units.
pub fn parse_amount(value: &str, token: &Token) -> Result<CurrencyAmount> {
    let parsed = parse_decimal(value)?;
    if parsed.is_negative() {
        return Err(RouterError::InvalidAmount(format!("{value} is negative")));
    }
    let raw = parsed * BigRational::from_integer(pow10(token.decimals as u32));
    if !raw.is_integer() {
        return Err(RouterError::InvalidAmount(format!(
            "{value} has more than {} decimals for {}",
            token.decimals, token.symbol
        )));
    }
    Ok(CurrencyAmount::from_fraction(token.clone(), raw))
}

/// An amount of a token in raw units (10^-decimals of one token), held exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAmount {
    pub token: Token,
    value: BigRational,
}

impl CurrencyAmount {
    pub fn from_raw(token: Token, raw: impl Into<BigInt>) -> Self {
        Self {
            token,
            value: BigRational::from_integer(raw.into()),
        }
    }

    pub fn from_fraction(token: Token, value: Fraction) -> Self {
        Self { token, value }
    }

    pub fn zero(token: Token) -> Self {
        Self::from_raw(token, BigInt::zero())
    }

    /// Exact raw value, possibly fractional after a multiply.
    pub fn raw(&self) -> &Fraction {
        &self.value
    }

    /// Raw value rounded toward negative infinity.
    pub fn quotient(&self) -> BigInt {
        self.value.floor().to_integer()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn add(&self, other: &CurrencyAmount) -> CurrencyAmount {
        debug_assert_eq!(self.token, other.token, "adding amounts of different tokens");
        Self::from_fraction(self.token.clone(), &self.value + &other.value)
    }

    pub fn subtract(&self, other: &CurrencyAmount) -> CurrencyAmount {
        debug_assert_eq!(self.token, other.token, "subtracting amounts of different tokens");
        Self::from_fraction(self.token.clone(), &self.value - &other.value)
    }

    pub fn multiply(&self, by: &Fraction) -> CurrencyAmount {
        Self::from_fraction(self.token.clone(), &self.value * by)
    }

    pub fn greater_than(&self, other: &CurrencyAmount) -> bool {
        self.partial_cmp(other) == Some(Ordering::Greater)
    }

    pub fn less_than(&self, other: &CurrencyAmount) -> bool {
        self.partial_cmp(other) == Some(Ordering::Less)
    }

    /// Human-readable value with exactly `places` fractional digits, truncated.
    pub fn to_fixed(&self, places: u32) -> String {
        let scaled = &self.value * BigRational::new(pow10(places), pow10(self.token.decimals as u32));
        let truncated = scaled.trunc().to_integer();
        let negative = truncated.is_negative() || (truncated.is_zero() && scaled.is_negative());
        let digits = truncated.abs().to_string();

        let places = places as usize;
        let padded = if digits.len() <= places {
            format!("{}{digits}", "0".repeat(places + 1 - digits.len()))
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - places);
        let sign = if negative { "-" } else { "" };
        if frac_part.is_empty() {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac_part}")
        }
    }
}

impl PartialOrd for CurrencyAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.token != other.token {
            return None;
        }
        Some(self.value.cmp(&other.value))
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_fixed(self.token.decimals.min(6) as u32), self.token.symbol)
    }
}
