// Chain identifiers and canonical wrapped-native tokens
//
// Numan Thabit 2025 Nov

use crate::errors::RouterError;
use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum ChainId {
    Mainnet = 1,
    Ropsten = 3,
    Rinkeby = 4,
    Goerli = 5,
    Kovan = 42,
}

impl ChainId {
    pub const ALL: [ChainId; 5] = [
        ChainId::Mainnet,
        ChainId::Ropsten,
        ChainId::Rinkeby,
        ChainId::Goerli,
        ChainId::Kovan,
    ];

    pub fn id(self) -> u64 {
        self as u64
    }
}

impl TryFrom<u64> for ChainId {
    type Error = RouterError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ChainId::Mainnet),
            3 => Ok(ChainId::Ropsten),
            4 => Ok(ChainId::Rinkeby),
            5 => Ok(ChainId::Goerli),
            42 => Ok(ChainId::Kovan),
            other => Err(RouterError::InvalidConfig(format!("unsupported chain id {other}"))),
        }
    }
}

impl From<ChainId> for u64 {
    fn from(chain: ChainId) -> Self {
        chain.id()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Wrapped ether for each supported chain.
pub fn weth9(chain_id: ChainId) -> Token {
    let address = match chain_id {
        ChainId::Mainnet => "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
        ChainId::Ropsten | ChainId::Rinkeby => "0xc778417E063141139Fce010982780140Aa0cD5Ab",
        ChainId::Goerli => "0xB4FBF271143F4FBf7B91A5ded31805e42b2208d6",
        ChainId::Kovan => "0xd0A1E359811322d97991E03f863a0C30C2cF029C",
    };
    Token::new(chain_id, address, 18, "WETH9", Some("Wrapped Ether"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_round_trip_through_u64() {
        for chain in ChainId::ALL {
            assert_eq!(ChainId::try_from(chain.id()).unwrap(), chain);
        }
        assert!(ChainId::try_from(137).is_err());
    }

    #[test]
    fn test_weth9_has_eighteen_decimals() {
        let weth = weth9(ChainId::Mainnet);
        assert_eq!(weth.decimals, 18);
        assert_eq!(weth.chain_id, ChainId::Mainnet);
        assert_eq!(weth9(ChainId::Ropsten), weth9(ChainId::Ropsten));
    }
}
