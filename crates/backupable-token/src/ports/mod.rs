//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the token domain and the outside world.
//!
//! - **Driving Port (Inbound)**: `BackupableTokenApi`
//! - **Driven Ports (Outbound)**: `SignatureRecovery`, `Clock`, `EventSink`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
