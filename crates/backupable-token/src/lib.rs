//! # Backupable Token
//!
//! A fixed-supply fungible-token ledger in which a holder can pre-register a
//! backup address and later authorize, by an off-ledger signature, an
//! emergency sweep of its whole balance to that backup. The swept account is
//! permanently blacklisted.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|----------------------|
//! | Balances always sum to the total supply | `domain/invariants.rs` - `check_conservation()` on every commit |
//! | A failed call changes nothing and emits nothing | `domain/transaction.rs` - staged overlay, dropped on error |
//! | Blacklisting is permanent | `domain/access_guard.rs` - insert-only `apply()` |
//! | Blacklisted accounts cannot send, receive, approve or be approved | `domain/ledger.rs`, `domain/access_guard.rs` |
//! | A recovery is authorized only by the account's own signature over its current balance | `domain/recovery.rs` |
//!
//! ## Layout
//!
//! | Layer | Location | Purpose |
//! |-------|----------|---------|
//! | Domain | `domain/` | State, transactions, ledger/guard/recovery rules |
//! | Ports | `ports/` | `BackupableTokenApi`; `SignatureRecovery`, `Clock`, `EventSink` |
//! | Adapters | `adapters/` | k256 recovery and signing, clocks, event log |
//! | Service | `service.rs` | Locking, commit, event publication, stats |
//!
//! ## Usage Example
//!
//! ```ignore
//! use backupable_token::prelude::*;
//! use std::sync::Arc;
//!
//! let log = Arc::new(EventLog::new());
//! let token = BackupableTokenService::deploy(
//!     TokenConfig::default(),
//!     deployer,
//!     SystemClock,
//!     K256Recovery,
//!     log.clone(),
//! )?;
//!
//! token.transfer(deployer, bob, parse_units("1000", 18)?)?;
//! token.set_backup_address(bob, carol)?;
//!
//! // Later, anyone relays Bob's signed authorization:
//! let receipt = token.backup_token(bob, deadline, &signature)?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Value objects
    pub use crate::domain::value_objects::{
        format_units, parse_units, Address, EcdsaSignature, Hash, U256,
    };

    // Domain
    pub use crate::domain::access_guard::AccountStatus;
    pub use crate::domain::authorization::{AuthorizationDomain, AuthorizationMessage};

    // Errors
    pub use crate::errors::{SignatureError, TokenError, TokenResult};

    // Events
    pub use crate::events::{LoggedEvent, Receipt, TokenEvent};

    // Ports
    pub use crate::ports::inbound::BackupableTokenApi;
    pub use crate::ports::outbound::{Clock, EventSink, SignatureRecovery};

    // Adapters
    pub use crate::adapters::{AuthorizationSigner, EventLog, K256Recovery, ManualClock, SystemClock};

    // Service
    pub use crate::config::{ConfigError, DomainTagConfig, TokenConfig};
    pub use crate::service::{BackupableTokenService, ServiceStats};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
