//! # Ledger
//!
//! Balances, allowances and the fixed total supply, plus the value-transfer
//! and approval rules applied to a [`Transaction`].
//!
//! Every rule checks all of its preconditions before staging a write, and
//! every write goes to the transaction overlay, so a failed call never
//! leaves partial state behind.

use super::transaction::Transaction;
use super::value_objects::{Address, U256};
use crate::errors::{TokenError, TokenResult};
use crate::events::TokenEvent;
use std::collections::HashMap;

/// Committed balances and allowances.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    total_supply: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

impl Ledger {
    /// Creates a ledger with the whole supply held by `holder`.
    #[must_use]
    pub fn new(holder: Address, total_supply: U256) -> Self {
        let mut balances = HashMap::new();
        if !total_supply.is_zero() {
            balances.insert(holder, total_supply);
        }
        Self {
            total_supply,
            balances,
            allowances: HashMap::new(),
        }
    }

    /// Total supply, fixed at deployment.
    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Balance of `account` (zero if never credited).
    #[must_use]
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Amount `spender` may still move out of `owner`'s balance.
    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Iterates over all non-zero balances.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &U256)> {
        self.balances.iter()
    }

    /// Number of accounts holding a non-zero balance.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    pub(crate) fn apply(
        &mut self,
        balances: HashMap<Address, U256>,
        allowances: HashMap<(Address, Address), U256>,
    ) {
        for (account, value) in balances {
            if value.is_zero() {
                self.balances.remove(&account);
            } else {
                self.balances.insert(account, value);
            }
        }
        for (pair, value) in allowances {
            if value.is_zero() {
                self.allowances.remove(&pair);
            } else {
                self.allowances.insert(pair, value);
            }
        }
    }
}

// =============================================================================
// LEDGER RULES
// =============================================================================

impl Transaction<'_> {
    /// Moves `amount` from `from` to `to`.
    ///
    /// Checks, in order: zero source, zero recipient, blacklisted source,
    /// blacklisted recipient, insufficient balance.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> TokenResult<()> {
        if from.is_zero() {
            return Err(TokenError::InvalidFromAddress);
        }
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        self.ensure_not_blacklisted(from)?;
        self.ensure_not_blacklisted(to)?;

        self.move_balance(from, to, amount)?;
        self.emit(TokenEvent::Transfer { from, to, amount });
        Ok(())
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`, consuming
    /// allowance.
    ///
    /// Checks, in order: zero source, insufficient allowance, then every
    /// [`transfer`](Self::transfer) check, then the approval checks for the
    /// reduced allowance. Emits `Transfer` followed by `Approval`.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<()> {
        if from.is_zero() {
            return Err(TokenError::InvalidFromAddress);
        }
        let current = self.allowance(from, spender);
        if current < amount {
            return Err(TokenError::InsufficientAllowance {
                available: current,
                required: amount,
            });
        }

        self.transfer(from, to, amount)?;

        self.check_approval(from, spender)?;
        self.write_allowance(from, spender, current - amount);
        Ok(())
    }

    /// Sets `owner`'s allowance for `spender` to `amount`.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) -> TokenResult<()> {
        self.check_approval(owner, spender)?;
        self.write_allowance(owner, spender, amount);
        Ok(())
    }

    /// Raises `owner`'s allowance for `spender` by `delta`.
    pub fn increase_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        delta: U256,
    ) -> TokenResult<()> {
        self.check_approval(owner, spender)?;
        let updated = self
            .allowance(owner, spender)
            .checked_add(delta)
            .ok_or(TokenError::Overflow)?;
        self.write_allowance(owner, spender, updated);
        Ok(())
    }

    /// Lowers `owner`'s allowance for `spender` by `delta`.
    pub fn decrease_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        delta: U256,
    ) -> TokenResult<()> {
        self.check_approval(owner, spender)?;
        let current = self.allowance(owner, spender);
        if delta > current {
            return Err(TokenError::NegativeAllowance {
                current,
                decrease: delta,
            });
        }
        self.write_allowance(owner, spender, current - delta);
        Ok(())
    }

    /// Debits `from` and credits `to` without access checks.
    ///
    /// Used directly only by the recovery sweep; reads `to` after the debit
    /// so a self-transfer is a no-op.
    pub(crate) fn move_balance(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        self.stage_balance(from, available - amount);

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.stage_balance(to, credited);
        Ok(())
    }

    fn check_approval(&self, owner: Address, spender: Address) -> TokenResult<()> {
        if owner.is_zero() {
            return Err(TokenError::InvalidOwner);
        }
        if spender.is_zero() {
            return Err(TokenError::InvalidSpender);
        }
        self.ensure_not_blacklisted(owner)?;
        self.ensure_not_blacklisted(spender)
    }

    fn write_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        self.stage_allowance(owner, spender, amount);
        self.emit(TokenEvent::Approval {
            owner,
            spender,
            amount,
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
