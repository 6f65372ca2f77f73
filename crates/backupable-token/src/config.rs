//! # Token Configuration
//!
//! Deployment parameters with defaults and `BTK_*` environment overrides.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `BTK_NAME` | token name | `Backupable ERC20` |
//! | `BTK_SYMBOL` | ticker | `BTOKEN` |
//! | `BTK_DECIMALS` | display decimals | `18` |
//! | `BTK_TOTAL_SUPPLY` | supply in whole tokens | `10000` |
//! | `BTK_DOMAIN_TAG` | 0x-hex 32-byte authorization tag | derived from schema |

use crate::domain::authorization::{AuthorizationDomain, BACKUP_SCHEMA};
use crate::domain::value_objects::{parse_units, Hash, U256};
use thiserror::Error;

/// Largest decimals value for which `10^decimals` fits in 256 bits.
pub const MAX_DECIMALS: u8 = 77;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Token name is empty.
    #[error("token name must not be empty")]
    EmptyName,

    /// Token symbol is empty.
    #[error("token symbol must not be empty")]
    EmptySymbol,

    /// Decimals exceed [`MAX_DECIMALS`].
    #[error("decimals {0} exceeds maximum {MAX_DECIMALS}")]
    DecimalsTooLarge(u8),

    /// An environment value could not be parsed.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Parse failure.
        reason: String,
    },

    /// The supply would be credited to the zero address.
    #[error("deployer must not be the zero address")]
    ZeroDeployer,
}

/// Where the authorization domain tag comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainTagConfig {
    /// `keccak256(schema)`.
    Schema(String),
    /// A pinned tag.
    Tag(Hash),
}

impl DomainTagConfig {
    /// Resolves to a domain.
    #[must_use]
    pub fn domain(&self) -> AuthorizationDomain {
        match self {
            Self::Schema(schema) => AuthorizationDomain::from_schema(schema),
            Self::Tag(tag) => AuthorizationDomain::from_tag(*tag),
        }
    }
}

impl Default for DomainTagConfig {
    fn default() -> Self {
        Self::Schema(BACKUP_SCHEMA.to_string())
    }
}

/// Token deployment parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenConfig {
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Display decimals.
    pub decimals: u8,
    /// Total supply in base units.
    pub total_supply: U256,
    /// Authorization domain tag source.
    pub domain_tag: DomainTagConfig,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Backupable ERC20".to_string(),
            symbol: "BTOKEN".to_string(),
            decimals: 18,
            total_supply: U256::from(10_000u64) * U256::exp10(18),
            domain_tag: DomainTagConfig::default(),
        }
    }
}

impl TokenConfig {
    /// Defaults overlaid with `BTK_*` environment variables.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unparsable variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    ///
    /// `BTK_TOTAL_SUPPLY` is read in whole tokens and scaled by the
    /// (possibly overridden) decimals.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unparsable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("BTK_NAME") {
            config.name = name;
        }
        if let Some(symbol) = lookup("BTK_SYMBOL") {
            config.symbol = symbol;
        }
        if let Some(decimals) = lookup("BTK_DECIMALS") {
            config.decimals = decimals
                .trim()
                .parse::<u8>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "BTK_DECIMALS",
                    reason: e.to_string(),
                })?;
        }
        match lookup("BTK_TOTAL_SUPPLY") {
            Some(supply) => {
                config.total_supply = parse_units(&supply, config.decimals).map_err(|e| {
                    ConfigError::InvalidValue {
                        key: "BTK_TOTAL_SUPPLY",
                        reason: e.to_string(),
                    }
                })?;
            }
            None if config.decimals <= MAX_DECIMALS => {
                config.total_supply = U256::from(10_000u64)
                    .checked_mul(U256::exp10(usize::from(config.decimals)))
                    .ok_or(ConfigError::InvalidValue {
                        key: "BTK_DECIMALS",
                        reason: "default supply overflows".to_string(),
                    })?;
            }
            None => {}
        }
        if let Some(tag) = lookup("BTK_DOMAIN_TAG") {
            let tag = tag
                .trim()
                .parse::<Hash>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "BTK_DOMAIN_TAG",
                    reason: e.to_string(),
                })?;
            config.domain_tag = DomainTagConfig::Tag(tag);
        }

        Ok(config)
    }

    /// Checks the configuration can be deployed.
    ///
    /// # Errors
    ///
    /// `EmptyName`, `EmptySymbol` or `DecimalsTooLarge`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::DecimalsTooLarge(self.decimals));
        }
        Ok(())
    }
}
