use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Token parameters fixed at deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Base units minted to the deployer
    pub initial_supply: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::zoracles()
    }
}

impl TokenConfig {
    /// ZORA: 10,000 tokens at 9 decimals.
    pub fn zoracles() -> Self {
        Self {
            name: "Zoracles".to_string(),
            symbol: "ZORA".to_string(),
            decimals: 9,
            initial_supply: 10_000_000_000_000,
        }
    }

    pub fn validate(&self) -> Result<(), TokenError> {
        if self.name.is_empty() || self.symbol.is_empty() {
            return Err(TokenError::InvalidConfig(
                "name and symbol must not be empty".to_string(),
            ));
        }
        if self.decimals > 38 {
            return Err(TokenError::InvalidConfig(format!(
                "decimals {} exceed 38",
                self.decimals
            )));
        }
        if self.initial_supply == 0 {
            return Err(TokenError::InvalidConfig(
                "initial supply must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
