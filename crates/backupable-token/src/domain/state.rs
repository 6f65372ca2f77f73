//! # Token State
//!
//! The explicit store owned by a service instance: immutable metadata, the
//! [`Ledger`] and the [`AccessGuard`]. Lives from deployment to shutdown.
//!
//! Mutation happens only through [`TokenState::commit`], which applies a
//! fully validated [`StateDelta`] produced by a [`Transaction`].
//!
//! [`Transaction`]: super::transaction::Transaction

use super::access_guard::AccessGuard;
use super::invariants::check_conservation;
use super::ledger::Ledger;
use super::transaction::StateDelta;
use super::value_objects::{Address, U256};
use crate::errors::{TokenError, TokenResult};
use crate::events::TokenEvent;
use serde::{Deserialize, Serialize};

/// Token name, symbol and decimals. Set once at deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Number of fractional digits in the display unit.
    pub decimals: u8,
}

/// Complete token state.
#[derive(Clone, Debug)]
pub struct TokenState {
    metadata: TokenMetadata,
    ledger: Ledger,
    guard: AccessGuard,
}

impl TokenState {
    /// Creates the state with the whole supply credited to `deployer`.
    #[must_use]
    pub fn new(metadata: TokenMetadata, deployer: Address, total_supply: U256) -> Self {
        Self {
            metadata,
            ledger: Ledger::new(deployer, total_supply),
            guard: AccessGuard::default(),
        }
    }

    /// Token metadata.
    #[must_use]
    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Balances, allowances and supply.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Backup registrations and blacklist flags.
    #[must_use]
    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    /// Applies a staged delta and returns its events.
    ///
    /// The delta is checked for supply conservation first; on failure
    /// nothing is applied.
    pub(crate) fn commit(&mut self, delta: StateDelta) -> TokenResult<Vec<TokenEvent>> {
        check_conservation(self, &delta)
            .map_err(|violation| TokenError::ConservationViolated(violation.to_string()))?;

        let StateDelta {
            balances,
            allowances,
            backups,
            blacklisted,
            events,
        } = delta;

        self.ledger.apply(balances, allowances);
        self.guard.apply(backups, blacklisted);
        Ok(events)
    }
}
