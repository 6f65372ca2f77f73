//! # Recovery Authority
//!
//! Verifies a signed authorization and stages the atomic sweep-and-blacklist
//! transition.
//!
//! ## Checks (in order)
//!
//! | # | Condition | Error |
//! |---|-----------|-------|
//! | 1 | account already blacklisted | `Blacklisted` |
//! | 2 | no backup address | `BackupAddressNotSet` |
//! | 3 | backup address blacklisted | `BackupAddressBlacklisted` |
//! | 4 | `now > deadline` | `SignatureExpired` |
//! | 5 | recovered signer ≠ account | `InvalidSignature` |
//!
//! The signed amount is never an input: the hash is always rebuilt over the
//! account's balance at verification time, so an authorization cannot be
//! replayed after the balance changes.

use super::authorization::{AuthorizationDomain, AuthorizationMessage};
use super::transaction::Transaction;
use super::value_objects::{Address, EcdsaSignature, U256};
use crate::errors::{TokenError, TokenResult};
use crate::events::TokenEvent;
use crate::ports::outbound::SignatureRecovery;

/// Outcome of a staged recovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sweep {
    /// The recovered (now blacklisted) account.
    pub account: Address,
    /// Receiver of the balance.
    pub backup_address: Address,
    /// Amount moved.
    pub amount: U256,
}

/// Composes ledger and access-guard rules into the recovery transition.
pub struct RecoveryAuthority<'a, R: SignatureRecovery + ?Sized> {
    domain: &'a AuthorizationDomain,
    recovery: &'a R,
}

impl<'a, R: SignatureRecovery + ?Sized> RecoveryAuthority<'a, R> {
    /// Creates an authority verifying under `domain` with `recovery`.
    pub fn new(domain: &'a AuthorizationDomain, recovery: &'a R) -> Self {
        Self { domain, recovery }
    }

    /// Stages the recovery of `account` into `tx`.
    ///
    /// On success the transaction holds: the full balance moved to the
    /// backup address, the account blacklisted, and the events
    /// `Transfer`, `EmergencyTransfer`, `Blacklisted` in that order.
    pub fn backup_token(
        &self,
        tx: &mut Transaction<'_>,
        account: Address,
        deadline: u64,
        signature: &EcdsaSignature,
        now: u64,
    ) -> TokenResult<Sweep> {
        tx.ensure_not_blacklisted(account)?;

        let backup_address = tx
            .backup_address_of(account)
            .ok_or(TokenError::BackupAddressNotSet(account))?;
        if tx.is_blacklisted(backup_address) {
            return Err(TokenError::BackupAddressBlacklisted(backup_address));
        }

        if now > deadline {
            return Err(TokenError::SignatureExpired { deadline, now });
        }

        let amount = tx.balance_of(account);
        let message = AuthorizationMessage {
            account,
            backup_address,
            amount,
            deadline,
        };
        let signer = self
            .recovery
            .recover(&message.signing_hash(self.domain), signature)?;
        if signer != account {
            return Err(TokenError::InvalidSignature);
        }

        // Sender blacklist is already excluded by check 1, recipient by check 3.
        tx.move_balance(account, backup_address, amount)?;
        tx.emit(TokenEvent::Transfer {
            from: account,
            to: backup_address,
            amount,
        });
        tx.emit(TokenEvent::EmergencyTransfer {
            account,
            backup_address,
            amount,
        });
        tx.blacklist(account);

        Ok(Sweep {
            account,
            backup_address,
            amount,
        })
    }
}
