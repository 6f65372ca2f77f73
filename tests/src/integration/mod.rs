//! # Integration Tests
//!
//! Every test drives a deployed token through `BackupableTokenApi` only.
//! Accounts are deterministic secp256k1 signers so recovery authorizations
//! are real signatures.

pub mod backup_flows;
pub mod concurrency;
pub mod event_stream;

#[cfg(test)]
use backupable_token::prelude::*;

#[cfg(test)]
use backupable_token::test_helpers::{deterministic_signer, test_env, TestEnv};

/// Alice (deployer), Bob and Carol.
#[cfg(test)]
pub(crate) struct Actors {
    pub env: TestEnv,
    pub alice: AuthorizationSigner,
    pub bob: AuthorizationSigner,
    pub carol: AuthorizationSigner,
}

#[cfg(test)]
impl Actors {
    pub fn new() -> Self {
        let alice = deterministic_signer(0xA1);
        let env = test_env(alice.address());
        Self {
            env,
            alice,
            bob: deterministic_signer(0xB0),
            carol: deterministic_signer(0xC0),
        }
    }

    pub fn token(&self) -> &impl BackupableTokenApi {
        &self.env.token
    }

    pub fn now(&self) -> u64 {
        self.env.clock.now()
    }

    /// `account` signs a sweep of `amount` to `backup`, valid until
    /// `deadline`.
    pub fn authorize(
        &self,
        account: &AuthorizationSigner,
        backup: Address,
        amount: U256,
        deadline: u64,
    ) -> EcdsaSignature {
        account
            .sign_authorization(self.env.token.domain(), backup, amount, deadline)
            .expect("signing succeeds")
    }
}
