//! # Staged Transactions
//!
//! A [`Transaction`] is a copy-on-write overlay over a [`TokenState`]. Ledger,
//! access-guard and recovery rules read through the overlay and write only
//! into it. The caller then either converts it into a [`StateDelta`] and
//! commits, or drops it, discarding every staged write and event.
//!
//! The rules themselves live next to the state they govern:
//! `ledger.rs`, `access_guard.rs` and `recovery.rs` each add methods to
//! `Transaction`.

use super::state::TokenState;
use super::value_objects::{Address, U256};
use crate::events::TokenEvent;
use std::collections::{HashMap, HashSet};

/// Staged writes and events of a transaction that passed every check.
#[derive(Debug, Default)]
pub struct StateDelta {
    /// New balances of touched accounts.
    pub balances: HashMap<Address, U256>,
    /// New allowances of touched `(owner, spender)` pairs.
    pub allowances: HashMap<(Address, Address), U256>,
    /// New backup registrations.
    pub backups: HashMap<Address, Address>,
    /// Accounts newly blacklisted.
    pub blacklisted: HashSet<Address>,
    /// Events in emission order.
    pub events: Vec<TokenEvent>,
}

/// A begin/validate/commit-or-discard unit over the token state.
#[derive(Debug)]
pub struct Transaction<'a> {
    base: &'a TokenState,
    delta: StateDelta,
}

impl<'a> Transaction<'a> {
    /// Opens a transaction over `base`.
    #[must_use]
    pub fn begin(base: &'a TokenState) -> Self {
        Self {
            base,
            delta: StateDelta::default(),
        }
    }

    /// Finishes the transaction, yielding its staged writes.
    #[must_use]
    pub fn into_delta(self) -> StateDelta {
        self.delta
    }

    /// Events staged so far.
    #[must_use]
    pub fn events(&self) -> &[TokenEvent] {
        &self.delta.events
    }

    // =========================================================================
    // READ-THROUGH VIEWS
    // =========================================================================

    /// Balance as seen by this transaction.
    #[must_use]
    pub fn balance_of(&self, account: Address) -> U256 {
        self.delta
            .balances
            .get(&account)
            .copied()
            .unwrap_or_else(|| self.base.ledger().balance_of(account))
    }

    /// Allowance as seen by this transaction.
    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.delta
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_else(|| self.base.ledger().allowance(owner, spender))
    }

    /// Backup address as seen by this transaction.
    #[must_use]
    pub fn backup_address_of(&self, account: Address) -> Option<Address> {
        match self.delta.backups.get(&account) {
            Some(backup) if backup.is_zero() => None,
            Some(backup) => Some(*backup),
            None => self.base.guard().backup_address_of(account),
        }
    }

    /// Blacklist flag as seen by this transaction.
    #[must_use]
    pub fn is_blacklisted(&self, account: Address) -> bool {
        self.delta.blacklisted.contains(&account) || self.base.guard().is_blacklisted(account)
    }

    // =========================================================================
    // STAGED WRITES
    // =========================================================================

    pub(crate) fn stage_balance(&mut self, account: Address, value: U256) {
        self.delta.balances.insert(account, value);
    }

    pub(crate) fn stage_allowance(&mut self, owner: Address, spender: Address, value: U256) {
        self.delta.allowances.insert((owner, spender), value);
    }

    pub(crate) fn stage_backup(&mut self, account: Address, backup: Address) {
        self.delta.backups.insert(account, backup);
    }

    pub(crate) fn stage_blacklist(&mut self, account: Address) {
        self.delta.blacklisted.insert(account);
    }

    pub(crate) fn emit(&mut self, event: TokenEvent) {
        self.delta.events.push(event);
    }
}
