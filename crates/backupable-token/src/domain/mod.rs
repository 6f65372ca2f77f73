//! # Domain Layer (Inner Hexagon)
//!
//! Ledger, access-guard and recovery rules over an explicit [`TokenState`].
//! No I/O, no async, no locking: the service layer owns concurrency.

pub mod access_guard;
pub mod authorization;
pub mod invariants;
pub mod ledger;
pub mod recovery;
pub mod state;
pub mod transaction;
pub mod value_objects;

pub use access_guard::{AccessGuard, AccountStatus};
pub use authorization::{
    eth_signed_message_hash, keccak256, AuthorizationDomain, AuthorizationMessage, BACKUP_SCHEMA,
};
pub use invariants::{
    check_blacklist_monotonic, check_conservation, check_supply_invariant, InvariantViolation,
};
pub use ledger::Ledger;
pub use recovery::{RecoveryAuthority, Sweep};
pub use state::{TokenMetadata, TokenState};
pub use transaction::{StateDelta, Transaction};
pub use value_objects::*;
