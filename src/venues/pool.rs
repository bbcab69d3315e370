// Pool (venue) model
// This file defines fee tiers, resolved pools and the deterministic pool key
// used to enforce venue uniqueness inside a path and across a split
//
// Numan Thabit 2025 Nov

use crate::amounts::Fraction;
use crate::errors::{Result, RouterError};
use crate::tokens::Token;
use blake2::{Blake2b512, Digest};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeeAmount {
    Lowest = 100,
    Low = 500,
    Medium = 3000,
    High = 10000,
}

impl FeeAmount {
    /// Fee in hundredths of a basis point.
    pub fn pips(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for FeeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pips = self.pips();
        let whole = pips / 10_000;
        let frac = format!("{:04}", pips % 10_000);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            write!(f, "{whole}%")
        } else {
            write!(f, "{whole}.{frac}%")
        }
    }
}

pub fn parse_fee_amount(fee_tier: &str) -> Result<FeeAmount> {
    match fee_tier {
        "10000" => Ok(FeeAmount::High),
        "3000" => Ok(FeeAmount::Medium),
        "500" => Ok(FeeAmount::Low),
        "100" => Ok(FeeAmount::Lowest),
        other => Err(RouterError::UnsupportedFee(other.to_string())),
    }
}

/// Deterministic pool identifier derived from (chain, token0, token1, fee).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PoolKey(String);

impl PoolKey {
    fn derive(token0: &Token, token1: &Token, fee: FeeAmount) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update(token0.chain_id.id().to_be_bytes());
        hasher.update(token0.address.to_ascii_lowercase().as_bytes());
        hasher.update(token1.address.to_ascii_lowercase().as_bytes());
        hasher.update(fee.pips().to_be_bytes());
        let hash = hasher.finalize();
        PoolKey(format!("0x{}", hex::encode(&hash[..32])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved pool between two tokens at one fee tier.
#[derive(Debug, Clone)]
pub struct Pool {
    pub token0: Token,
    pub token1: Token,
    pub fee: FeeAmount,
    /// Ranking metric (total value locked, in ETH).
    pub liquidity: f64,
    /// Raw token1 units per raw token0 unit, when known.
    token0_price: Option<Fraction>,
    key: PoolKey,
}

impl Pool {
    /// Build a pool; tokens are reordered by address and the price follows them.
    pub fn new(
        token_a: Token,
        token_b: Token,
        fee: FeeAmount,
        liquidity: f64,
        price_of_a_in_b: Option<Fraction>,
    ) -> Self {
        let (token0, token1, token0_price) = if token_a.sorts_before(&token_b) {
            (token_a, token_b, price_of_a_in_b)
        } else {
            let inverted = price_of_a_in_b
                .filter(|p| !p.is_zero())
                .map(|p| p.recip());
            (token_b, token_a, inverted)
        };
        let key = PoolKey::derive(&token0, &token1, fee);
        Self {
            token0,
            token1,
            fee,
            liquidity,
            token0_price,
            key,
        }
    }

    pub fn key(&self) -> &PoolKey {
        &self.key
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        &self.token0 == token || &self.token1 == token
    }

    /// The token on the other side of `token`, if the pool holds it.
    pub fn other_token(&self, token: &Token) -> Option<&Token> {
        if &self.token0 == token {
            Some(&self.token1)
        } else if &self.token1 == token {
            Some(&self.token0)
        } else {
            None
        }
    }

    /// Raw units of the other token per raw unit of `token`.
    pub fn price_of(&self, token: &Token) -> Option<Fraction> {
        let price = self.token0_price.as_ref()?;
        if &self.token0 == token {
            Some(price.clone())
        } else if &self.token1 == token && !price.is_zero() {
            Some(price.recip())
        } else {
            None
        }
    }
}

impl PartialEq for Pool {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Pool {}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.token0, self.token1, self.fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amounts::fraction;
    use crate::chains::ChainId;

    fn token(address_suffix: u8, symbol: &str) -> Token {
        let address = format!("0x{:040x}", address_suffix);
        Token::new(ChainId::Mainnet, &address, 18, symbol, None)
    }

    #[test]
    fn test_parse_fee_amount() {
        assert_eq!(parse_fee_amount("3000").unwrap(), FeeAmount::Medium);
        assert_eq!(parse_fee_amount("100").unwrap(), FeeAmount::Lowest);
        assert!(matches!(
            parse_fee_amount("2500"),
            Err(RouterError::UnsupportedFee(_))
        ));
    }

    #[test]
    fn test_fee_display() {
        assert_eq!(FeeAmount::Medium.to_string(), "0.3%");
        assert_eq!(FeeAmount::Low.to_string(), "0.05%");
        assert_eq!(FeeAmount::Lowest.to_string(), "0.01%");
        assert_eq!(FeeAmount::High.to_string(), "1%");
    }

    #[test]
    fn test_key_ignores_token_order_but_not_fee() {
        let a = token(1, "A");
        let b = token(2, "B");
        let p1 = Pool::new(a.clone(), b.clone(), FeeAmount::Medium, 1.0, None);
        let p2 = Pool::new(b.clone(), a.clone(), FeeAmount::Medium, 5.0, None);
        let p3 = Pool::new(a, b, FeeAmount::Low, 1.0, None);
        assert_eq!(p1.key(), p2.key());
        assert_ne!(p1.key(), p3.key());
        assert_eq!(p1.key().as_str().len(), 66);
    }

    #[test]
    fn test_price_follows_token_order() {
        let a = token(1, "A");
        let b = token(2, "B");
        // 1 B buys 4 A, so 1 A is worth 1/4 B.
        let pool = Pool::new(b.clone(), a.clone(), FeeAmount::Medium, 1.0, Some(fraction(4, 1)));
        assert_eq!(pool.token0, a);
        assert_eq!(pool.price_of(&a), Some(fraction(1, 4)));
        assert_eq!(pool.price_of(&b), Some(fraction(4, 1)));
        assert_eq!(pool.other_token(&a), Some(&b));
        assert_eq!(pool.price_of(&token(3, "C")), None);
    }
}
