//! # Driven Ports (SPI - Outbound)
//!
//! Environment services the token core consumes but does not implement:
//! signer recovery, a wall-clock oracle, and event delivery.

use crate::domain::value_objects::{Address, EcdsaSignature, Hash};
use crate::errors::SignatureError;
use crate::events::TokenEvent;
use std::sync::Arc;

// =============================================================================
// SIGNATURE RECOVERY
// =============================================================================

/// Recovers the address that produced an ECDSA signature.
pub trait SignatureRecovery: Send + Sync {
    /// Recover the signer of `hash`.
    ///
    /// # Errors
    ///
    /// Returns a [`SignatureError`] if the signature is malformed, malleable,
    /// or no public key can be recovered.
    fn recover(&self, hash: &Hash, signature: &EcdsaSignature) -> Result<Address, SignatureError>;
}

// =============================================================================
// CLOCK
// =============================================================================

/// Wall-clock oracle, in seconds since the Unix epoch.
///
/// Deadlines are domain values compared against this clock; nothing in the
/// core waits on it.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Receives the events of each committed call.
///
/// Called once per successful call, in commit order, while the state lock is
/// still held. Implementations must not block.
pub trait EventSink: Send + Sync {
    /// Deliver one call's events, in emission order.
    fn publish(&self, events: &[TokenEvent]);
}
