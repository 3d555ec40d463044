//! Deployment configuration: one TOML file for token, timelock and governor.

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use zora_governance::GovernorConfig;
use zora_timelock::TimelockConfig;
use zora_token::TokenConfig;

/// Built-in parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Mainnet,
    Devnet,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub token: TokenConfig,
    pub timelock: TimelockConfig,
    pub governor: GovernorConfig,
}

impl DeploymentConfig {
    pub fn mainnet() -> Self {
        Self {
            token: TokenConfig::zoracles(),
            timelock: TimelockConfig::mainnet(),
            governor: GovernorConfig::mainnet(),
        }
    }

    pub fn devnet() -> Self {
        Self {
            token: TokenConfig::zoracles(),
            timelock: TimelockConfig::devnet(),
            governor: GovernorConfig::devnet(),
        }
    }

    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Mainnet => Self::mainnet(),
            Preset::Devnet => Self::devnet(),
        }
    }

    /// Read `path` if given, otherwise use `preset`. Missing keys in the
    /// file fall back to mainnet values.
    pub fn resolve(path: Option<&Path>, preset: Preset) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::preset(preset),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: DeploymentConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.token.validate()?;
        self.timelock.validate()?;
        self.governor.validate()?;
        Ok(())
    }
}
