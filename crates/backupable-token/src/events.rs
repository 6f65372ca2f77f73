//! # Event Schema
//!
//! Every externally observable state change emits one of these events.
//! A successful call's events are returned in its [`Receipt`] and published
//! to the configured [`EventSink`](crate::ports::outbound::EventSink) in
//! emission order, after the call's state has been committed.
//!
//! | Event | Emitted by |
//! |-------|------------|
//! | `Transfer` | deploy (mint), `transfer`, `transfer_from`, `backup_token` |
//! | `Approval` | `approve`, `increase_allowance`, `decrease_allowance`, `transfer_from` |
//! | `BackupAddressSet` | `set_backup_address` |
//! | `EmergencyTransfer` | `backup_token` |
//! | `Blacklisted` | `backup_token` |

use crate::domain::value_objects::{Address, U256};
use serde::{Deserialize, Serialize};

/// A token state-change notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum TokenEvent {
    /// Value moved between accounts. `from` is zero for the initial mint.
    Transfer {
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Amount moved.
        amount: U256,
    },
    /// An allowance was set to a new value.
    Approval {
        /// Account whose tokens may be spent.
        owner: Address,
        /// Account allowed to spend.
        spender: Address,
        /// Resulting allowance.
        amount: U256,
    },
    /// A holder registered or replaced its backup address.
    BackupAddressSet {
        /// The holder.
        account: Address,
        /// The nominated backup.
        backup_address: Address,
    },
    /// A recovery sweep moved a compromised account's balance to its backup.
    EmergencyTransfer {
        /// The recovered account.
        account: Address,
        /// Receiver of the sweep.
        backup_address: Address,
        /// Amount swept.
        amount: U256,
    },
    /// An account was permanently disabled.
    Blacklisted {
        /// The disabled account.
        account: Address,
    },
}

impl TokenEvent {
    /// Event name as used in logs and subscriptions.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::BackupAddressSet { .. } => "BackupAddressSet",
            Self::EmergencyTransfer { .. } => "EmergencyTransfer",
            Self::Blacklisted { .. } => "Blacklisted",
        }
    }

    /// Returns true if `account` appears anywhere in the payload.
    #[must_use]
    pub fn involves(&self, account: Address) -> bool {
        match *self {
            Self::Transfer { from, to, .. } => from == account || to == account,
            Self::Approval { owner, spender, .. } => owner == account || spender == account,
            Self::BackupAddressSet {
                account: a,
                backup_address,
            }
            | Self::EmergencyTransfer {
                account: a,
                backup_address,
                ..
            } => a == account || backup_address == account,
            Self::Blacklisted { account: a } => a == account,
        }
    }
}

/// An event together with its position in the global event order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Monotonic sequence number, starting at 0 for the deploy mint.
    pub sequence: u64,
    /// The event.
    pub event: TokenEvent,
}

/// Events emitted by one successful call, in emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Receipt {
    /// The emitted events.
    pub events: Vec<TokenEvent>,
}

impl Receipt {
    /// Returns true if the receipt contains `event`.
    #[must_use]
    pub fn emitted(&self, event: &TokenEvent) -> bool {
        self.events.contains(event)
    }

    /// Names of the emitted events, in order.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(TokenEvent::name).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
