//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the driven ports.
//!
//! - `ecdsa`: secp256k1 signer recovery (`k256`) and an authorization signer
//! - `clock`: system and manually driven clocks
//! - `event_log`: ordered history with broadcast fan-out

pub mod clock;
pub mod ecdsa;
pub mod event_log;

pub use clock::{ManualClock, SystemClock};
pub use ecdsa::{address_from_pubkey, AuthorizationSigner, K256Recovery};
pub use event_log::EventLog;
