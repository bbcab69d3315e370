// Token model and token-list backed asset resolution
// This file defines the Token type used throughout routing and the
// TokenProvider that resolves human-readable symbols to tokens per chain
//
// Numan Thabit 2025 Nov

use crate::chains::{weth9, ChainId};
use crate::errors::{Result, RouterError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tracing::{error, trace};

/// Native asset symbol. It has no token contract, so it resolves to its wrapped form.
pub const NATIVE_SYMBOL: &str = "ETH";
/// Symbol the native asset resolves to in a token list.
pub const WRAPPED_NATIVE_SYMBOL: &str = "WETH";

/// An ERC20-like token. Identity is (chain, address); symbols are informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: ChainId,
    pub address: String,
    pub decimals: u8,
    pub symbol: String,
    pub name: Option<String>,
}

impl Token {
    pub fn new(
        chain_id: ChainId,
        address: &str,
        decimals: u8,
        symbol: &str,
        name: Option<&str>,
    ) -> Self {
        Self {
            chain_id,
            address: address.to_string(),
            decimals,
            symbol: symbol.to_string(),
            name: name.map(str::to_string),
        }
    }

    fn address_key(&self) -> String {
        self.address.to_ascii_lowercase()
    }

    /// Address ordering used to sort the two tokens of a pool.
    pub fn sorts_before(&self, other: &Token) -> bool {
        self.address_key() < other.address_key()
    }

    /// Raw 20-byte address.
    pub fn address_bytes(&self) -> Result<[u8; 20]> {
        parse_address(&self.address)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address_key() == other.address_key()
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address_key().hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

pub(crate) fn parse_address(address: &str) -> Result<[u8; 20]> {
    let hex_part = address
        .strip_prefix("0x")
        .ok_or_else(|| RouterError::InvalidTokenList(format!("address {address} missing 0x")))?;
    let bytes = hex::decode(hex_part)
        .map_err(|e| RouterError::InvalidTokenList(format!("address {address}: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| RouterError::InvalidTokenList(format!("address {address} is not 20 bytes")))
}

/// One entry of a token list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub chain_id: u64,
    pub address: String,
    pub symbol: String,
    pub name: Option<String>,
    pub decimals: u8,
}

/// A token list document (Uniswap token-list layout; extra fields are ignored).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenList {
    pub name: String,
    pub tokens: Vec<TokenInfo>,
}

impl TokenList {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RouterError::InvalidTokenList("token list name is empty".into()));
        }
        for info in &self.tokens {
            if info.symbol.trim().is_empty() {
                return Err(RouterError::InvalidTokenList(format!(
                    "token {} has an empty symbol",
                    info.address
                )));
            }
            parse_address(&info.address)?;
        }
        Ok(())
    }
}

/// Resolves token symbols to tokens for each chain from a validated token list.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    list_name: String,
    by_chain_symbol: HashMap<ChainId, HashMap<String, TokenInfo>>,
}

impl TokenProvider {
    pub fn from_token_list(token_list: TokenList) -> Result<Self> {
        token_list.validate()?;

        let mut by_chain_symbol: HashMap<ChainId, HashMap<String, TokenInfo>> = HashMap::new();
        for info in token_list.tokens {
            // Entries for chains we do not route on are kept out of the index.
            let Ok(chain) = ChainId::try_from(info.chain_id) else {
                trace!(chain_id = info.chain_id, symbol = %info.symbol, "skipping token on unsupported chain");
                continue;
            };
            by_chain_symbol
                .entry(chain)
                .or_default()
                .insert(info.symbol.clone(), info);
        }

        Ok(Self {
            list_name: token_list.name,
            by_chain_symbol,
        })
    }

    /// Fetch a token list over HTTP(S).
    pub async fn from_uri(uri: &str) -> Result<Self> {
        let response = reqwest::get(uri)
            .await
            .map_err(|e| RouterError::Transport(format!("token list fetch {uri}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            error!(uri = uri, status = %status, "unable to get token list");
            return Err(RouterError::Retrieval(format!(
                "unable to get token list from {uri}: http {status}"
            )));
        }
        let list: TokenList = response
            .json()
            .await
            .map_err(|e| RouterError::InvalidTokenList(format!("decode {uri}: {e}")))?;
        Self::from_token_list(list)
    }

    /// Load a token list from a local JSON or YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RouterError::Retrieval(format!("read {}: {e}", path.display())))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let list: TokenList = if is_yaml {
            serde_yaml::from_str(&raw)
                .map_err(|e| RouterError::InvalidTokenList(format!("{}: {e}", path.display())))?
        } else {
            serde_json::from_str(&raw)
                .map_err(|e| RouterError::InvalidTokenList(format!("{}: {e}", path.display())))?
        };
        Self::from_token_list(list)
    }

    /// Load from a URI when it looks like one, otherwise from disk.
    pub async fn load(source: &str) -> Result<Self> {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::from_uri(source).await
        } else {
            Self::from_path(source)
        }
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    pub fn get_token(&self, chain_id: ChainId, symbol: &str) -> Result<Token> {
        self.get_token_if_exists(chain_id, symbol)
            .ok_or_else(|| RouterError::UnknownToken {
                chain_id: chain_id.id(),
                symbol: symbol.to_string(),
            })
    }

    pub fn get_token_if_exists(&self, chain_id: ChainId, symbol: &str) -> Option<Token> {
        let symbol = if symbol == NATIVE_SYMBOL {
            WRAPPED_NATIVE_SYMBOL
        } else {
            symbol
        };

        let info = self
            .by_chain_symbol
            .get(&chain_id)
            .and_then(|symbols| symbols.get(symbol));

        match info {
            Some(info) => Some(Token::new(
                chain_id,
                &info.address,
                info.decimals,
                &info.symbol,
                info.name.as_deref(),
            )),
            None => {
                trace!(
                    symbol = symbol,
                    list = %self.list_name,
                    "could not find symbol in token list; ignoring"
                );
                None
            }
        }
    }

    pub fn token_exists(&self, chain_id: ChainId, symbol: &str) -> bool {
        self.get_token_if_exists(chain_id, symbol).is_some()
    }

    pub fn get_tokens_if_exists(&self, chain_id: ChainId, symbols: &[&str]) -> Vec<Token> {
        symbols
            .iter()
            .filter_map(|symbol| self.get_token_if_exists(chain_id, symbol))
            .collect()
    }

    /// The wrapped native token: the list's entry when present, else WETH9.
    pub fn wrapped_native(&self, chain_id: ChainId) -> Token {
        self.get_token_if_exists(chain_id, NATIVE_SYMBOL)
            .unwrap_or_else(|| weth9(chain_id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_list() -> TokenList {
        let entry = |symbol: &str, address: &str, decimals: u8| TokenInfo {
            chain_id: 1,
            address: address.to_string(),
            symbol: symbol.to_string(),
            name: None,
            decimals,
        };
        TokenList {
            name: "test list".to_string(),
            tokens: vec![
                entry("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18),
                entry("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6),
                entry("DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F", 18),
            ],
        }
    }

    #[test]
    fn test_native_symbol_resolves_to_wrapped() {
        let provider = TokenProvider::from_token_list(sample_list()).unwrap();
        let eth = provider.get_token(ChainId::Mainnet, "ETH").unwrap();
        let weth = provider.get_token(ChainId::Mainnet, "WETH").unwrap();
        assert_eq!(eth, weth);
        assert_eq!(eth.symbol, "WETH");
        assert_eq!(provider.wrapped_native(ChainId::Mainnet), weth9(ChainId::Mainnet));
    }

    #[test]
    fn test_unknown_symbol_is_absent_and_get_token_fails() {
        let provider = TokenProvider::from_token_list(sample_list()).unwrap();
        assert!(!provider.token_exists(ChainId::Mainnet, "UNI"));
        assert!(!provider.token_exists(ChainId::Kovan, "USDC"));
        assert!(matches!(
            provider.get_token(ChainId::Mainnet, "UNI"),
            Err(RouterError::UnknownToken { .. })
        ));
        let found = provider.get_tokens_if_exists(ChainId::Mainnet, &["USDC", "UNI", "DAI"]);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_equality_ignores_symbol_and_address_case() {
        let a = Token::new(ChainId::Mainnet, "0xabc0000000000000000000000000000000000001", 18, "A", None);
        let b = Token::new(ChainId::Mainnet, "0xABC0000000000000000000000000000000000001", 6, "B", None);
        let c = Token::new(ChainId::Kovan, "0xabc0000000000000000000000000000000000001", 18, "A", None);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_list_rejected() {
        let mut list = sample_list();
        list.tokens[0].address = "0x1234".to_string();
        assert!(matches!(
            TokenProvider::from_token_list(list),
            Err(RouterError::InvalidTokenList(_))
        ));

        let mut list = sample_list();
        list.name = " ".to_string();
        assert!(TokenProvider::from_token_list(list).is_err());
    }

    #[test]
    fn test_from_path_reads_yaml() {
        let dir = std::env::temp_dir().join(format!("ultra-sor-tokens-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("list.yaml");
        std::fs::write(&path, serde_yaml::to_string(&sample_list()).unwrap()).unwrap();

        let provider = TokenProvider::from_path(&path).unwrap();
        assert_eq!(provider.list_name(), "test list");
        assert!(provider.token_exists(ChainId::Mainnet, "DAI"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
