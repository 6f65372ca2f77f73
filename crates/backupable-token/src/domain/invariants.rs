//! # Domain Invariants
//!
//! Properties that must hold across every committed transition.
//!
//! - Supply conservation: balances always sum to the fixed total supply.
//!   Checked on every delta before it is applied.
//! - Blacklist monotonicity: a flagged account stays flagged.

use super::access_guard::AccessGuard;
use super::state::TokenState;
use super::transaction::StateDelta;
use super::value_objects::U256;
use thiserror::Error;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Verifies that applying `delta` to `base` moves value without creating or
/// destroying any.
///
/// Only accounts touched by the delta are visited: total credits must equal
/// total debits.
pub fn check_conservation(base: &TokenState, delta: &StateDelta) -> Result<(), InvariantViolation> {
    let mut credits = U256::zero();
    let mut debits = U256::zero();

    for (account, &after) in &delta.balances {
        let before = base.ledger().balance_of(*account);
        if after >= before {
            credits = credits
                .checked_add(after - before)
                .ok_or(InvariantViolation::SumOverflow)?;
        } else {
            debits = debits
                .checked_add(before - after)
                .ok_or(InvariantViolation::SumOverflow)?;
        }
    }

    if credits == debits {
        Ok(())
    } else {
        Err(InvariantViolation::SupplyChanged { credits, debits })
    }
}

/// Balances sum to the total supply.
#[must_use]
pub fn check_supply_invariant(state: &TokenState) -> bool {
    let ledger = state.ledger();
    ledger
        .balances()
        .try_fold(U256::zero(), |acc, (_, balance)| acc.checked_add(*balance))
        .is_some_and(|sum| sum == ledger.total_supply())
}

/// Every account blacklisted in `before` is still blacklisted in `after`.
#[must_use]
pub fn check_blacklist_monotonic(before: &AccessGuard, after: &AccessGuard) -> bool {
    before
        .blacklisted()
        .all(|account| after.is_blacklisted(*account))
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Credits and debits of a delta differ.
    #[error("supply changed: credits {credits} != debits {debits}")]
    SupplyChanged {
        /// Sum of balance increases.
        credits: U256,
        /// Sum of balance decreases.
        debits: U256,
    },
    /// Summing the delta overflowed 256 bits.
    #[error("balance sum overflow")]
    SumOverflow,
}

// =============================================================================
// TESTS
// =============================================================================
