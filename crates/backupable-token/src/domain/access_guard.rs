//! # Access Guard
//!
//! Per-account backup-address registrations and blacklist flags.
//!
//! An account is either [`AccountStatus::Active`] or
//! [`AccountStatus::Blacklisted`]. The only transition is Active to
//! Blacklisted, staged by a successful recovery sweep. There is no
//! operation that clears a flag.

use super::transaction::Transaction;
use super::value_objects::Address;
use crate::errors::{TokenError, TokenResult};
use crate::events::TokenEvent;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Lifecycle state of an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    /// May hold, send, receive and approve tokens.
    Active,
    /// Permanently disabled. Terminal.
    Blacklisted,
}

/// Committed backup registrations and blacklist flags.
#[derive(Clone, Debug, Default)]
pub struct AccessGuard {
    backup_addresses: HashMap<Address, Address>,
    blacklisted: HashSet<Address>,
}

impl AccessGuard {
    /// Registered backup address, if any. A zero registration reads as unset.
    #[must_use]
    pub fn backup_address_of(&self, account: Address) -> Option<Address> {
        self.backup_addresses
            .get(&account)
            .copied()
            .filter(|backup| !backup.is_zero())
    }

    /// Whether `account` has been blacklisted.
    #[must_use]
    pub fn is_blacklisted(&self, account: Address) -> bool {
        self.blacklisted.contains(&account)
    }

    /// Lifecycle state of `account`.
    #[must_use]
    pub fn status(&self, account: Address) -> AccountStatus {
        if self.is_blacklisted(account) {
            AccountStatus::Blacklisted
        } else {
            AccountStatus::Active
        }
    }

    /// Number of blacklisted accounts.
    #[must_use]
    pub fn blacklisted_count(&self) -> usize {
        self.blacklisted.len()
    }

    /// Iterates over blacklisted accounts.
    pub fn blacklisted(&self) -> impl Iterator<Item = &Address> {
        self.blacklisted.iter()
    }

    // Insert-only: flags are never removed.
    pub(crate) fn apply(&mut self, backups: HashMap<Address, Address>, blacklisted: HashSet<Address>) {
        for (account, backup) in backups {
            if backup.is_zero() {
                self.backup_addresses.remove(&account);
            } else {
                self.backup_addresses.insert(account, backup);
            }
        }
        self.blacklisted.extend(blacklisted);
    }
}

// =============================================================================
// ACCESS RULES
// =============================================================================

impl Transaction<'_> {
    /// Registers (or replaces) `caller`'s backup address.
    ///
    /// The backup itself is not validated here; recovery checks it.
    pub fn set_backup_address(&mut self, caller: Address, backup: Address) -> TokenResult<()> {
        self.ensure_not_blacklisted(caller)?;
        self.stage_backup(caller, backup);
        self.emit(TokenEvent::BackupAddressSet {
            account: caller,
            backup_address: backup,
        });
        Ok(())
    }

    /// Fails with [`TokenError::Blacklisted`] if `account` is blacklisted.
    pub fn ensure_not_blacklisted(&self, account: Address) -> TokenResult<()> {
        if self.is_blacklisted(account) {
            return Err(TokenError::Blacklisted(account));
        }
        Ok(())
    }

    pub(crate) fn blacklist(&mut self, account: Address) {
        self.stage_blacklist(account);
        self.emit(TokenEvent::Blacklisted { account });
    }
}
