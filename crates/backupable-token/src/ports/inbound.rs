//! # Driving Port (API - Inbound)
//!
//! The token's public entry points. The acting account is always an explicit
//! parameter; for `backup_token` the caller is not a parameter at all,
//! because a recovery is authorized by signature alone and any relayer may
//! submit it.

use crate::domain::access_guard::AccountStatus;
use crate::domain::value_objects::{Address, EcdsaSignature, U256};
use crate::errors::TokenResult;
use crate::events::Receipt;

/// Backupable fungible token.
///
/// Every mutating method is atomic: it either returns `Ok` with the events it
/// emitted, or returns an error and changes nothing.
pub trait BackupableTokenApi: Send + Sync {
    // =========================================================================
    // METADATA & QUERIES
    // =========================================================================

    /// Token name.
    fn name(&self) -> String;

    /// Token symbol.
    fn symbol(&self) -> String;

    /// Display decimals.
    fn decimals(&self) -> u8;

    /// Fixed total supply.
    fn total_supply(&self) -> U256;

    /// Balance of `account`.
    fn balance_of(&self, account: Address) -> U256;

    /// Remaining allowance of `spender` over `owner`'s balance.
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Registered backup address of `account`.
    fn backup_address_of(&self, account: Address) -> Option<Address>;

    /// Whether `account` is blacklisted.
    fn is_blacklisted(&self, account: Address) -> bool;

    /// Lifecycle state of `account`.
    fn account_status(&self, account: Address) -> AccountStatus {
        if self.is_blacklisted(account) {
            AccountStatus::Blacklisted
        } else {
            AccountStatus::Active
        }
    }

    // =========================================================================
    // LEDGER
    // =========================================================================

    /// `caller` sends `amount` to `to`.
    ///
    /// # Errors
    ///
    /// `InvalidFromAddress`, `InvalidRecipient`, `Blacklisted`,
    /// `InsufficientBalance`.
    fn transfer(&self, caller: Address, to: Address, amount: U256) -> TokenResult<Receipt>;

    /// `spender` moves `amount` from `from` to `to` using its allowance.
    ///
    /// # Errors
    ///
    /// `InvalidFromAddress`, `InsufficientAllowance`, then the `transfer`
    /// errors, then `Blacklisted` for the spender.
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<Receipt>;

    /// `owner` sets `spender`'s allowance to `amount`.
    ///
    /// # Errors
    ///
    /// `InvalidOwner`, `InvalidSpender`, `Blacklisted`.
    fn approve(&self, owner: Address, spender: Address, amount: U256) -> TokenResult<Receipt>;

    /// `owner` raises `spender`'s allowance by `delta`.
    ///
    /// # Errors
    ///
    /// As `approve`, plus `Overflow`.
    fn increase_allowance(
        &self,
        owner: Address,
        spender: Address,
        delta: U256,
    ) -> TokenResult<Receipt>;

    /// `owner` lowers `spender`'s allowance by `delta`.
    ///
    /// # Errors
    ///
    /// As `approve`, plus `NegativeAllowance`.
    fn decrease_allowance(
        &self,
        owner: Address,
        spender: Address,
        delta: U256,
    ) -> TokenResult<Receipt>;

    // =========================================================================
    // BACKUP & RECOVERY
    // =========================================================================

    /// `caller` nominates `backup` as its recovery destination.
    ///
    /// # Errors
    ///
    /// `Blacklisted` if `caller` is blacklisted.
    fn set_backup_address(&self, caller: Address, backup: Address) -> TokenResult<Receipt>;

    /// Sweeps `account`'s whole balance to its backup address and
    /// blacklists `account`, authorized by `signature` over the current
    /// balance and `deadline`.
    ///
    /// # Errors
    ///
    /// `Blacklisted`, `BackupAddressNotSet`, `BackupAddressBlacklisted`,
    /// `SignatureExpired`, `InvalidSignature`.
    fn backup_token(
        &self,
        account: Address,
        deadline: u64,
        signature: &EcdsaSignature,
    ) -> TokenResult<Receipt>;
}
