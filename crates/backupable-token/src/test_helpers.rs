//! # Test Helpers
//!
//! Deterministic signers and a ready-deployed token for unit and
//! integration tests. Enabled by `cfg(test)` or the `test-helpers` feature.

use crate::adapters::clock::ManualClock;
use crate::adapters::ecdsa::{AuthorizationSigner, K256Recovery};
use crate::adapters::event_log::EventLog;
use crate::config::TokenConfig;
use crate::domain::value_objects::{Address, U256};
use crate::service::BackupableTokenService;
use std::sync::Arc;

/// Timestamp the test clock starts at.
pub const GENESIS_TIME: u64 = 1_700_000_000;

/// Service type wired with test adapters.
pub type TestToken = BackupableTokenService<ManualClock, K256Recovery>;

/// A signer whose secret key is `[seed; 32]`.
///
/// # Panics
///
/// If `seed` is `0x00` or `0xFF`: `[0xFF; 32]` is above the curve order.
#[must_use]
pub fn deterministic_signer(seed: u8) -> AuthorizationSigner {
    AuthorizationSigner::from_bytes([seed; 32]).expect("seed must be in 1..=254")
}

/// `n` whole tokens at 18 decimals.
#[must_use]
pub fn units(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

/// A token deployed with the default configuration, plus its event log and
/// clock handle.
pub struct TestEnv {
    /// The token.
    pub token: TestToken,
    /// Everything the token published.
    pub log: Arc<EventLog>,
    /// Drives `backup_token` deadlines.
    pub clock: ManualClock,
    /// Holder of the initial supply.
    pub deployer: Address,
}

/// Deploys the default token to `deployer` with the clock at
/// [`GENESIS_TIME`].
///
/// # Panics
///
/// If `deployer` is the zero address.
#[must_use]
pub fn test_env(deployer: Address) -> TestEnv {
    let log = Arc::new(EventLog::new());
    let clock = ManualClock::new(GENESIS_TIME);
    let token = BackupableTokenService::deploy(
        TokenConfig::default(),
        deployer,
        clock.clone(),
        K256Recovery,
        log.clone(),
    )
    .expect("default config deploys");

    TestEnv {
        token,
        log,
        clock,
        deployer,
    }
}
