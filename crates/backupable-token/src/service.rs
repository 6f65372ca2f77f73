//! # Backupable Token Service
//!
//! Owns one [`TokenState`] behind an exclusive lock and implements
//! [`BackupableTokenApi`] on top of the domain rules.
//!
//! Each mutating call runs as one transaction:
//!
//! 1. take the write lock
//! 2. stage every check and write in a [`Transaction`]
//! 3. on error, drop the transaction (nothing changed, nothing emitted)
//! 4. on success, commit the delta and publish its events before releasing
//!    the lock, so subscribers observe events in commit order

use crate::adapters::clock::SystemClock;
use crate::adapters::ecdsa::K256Recovery;
use crate::config::{ConfigError, TokenConfig};
use crate::domain::access_guard::AccountStatus;
use crate::domain::authorization::AuthorizationDomain;
use crate::domain::recovery::RecoveryAuthority;
use crate::domain::state::{TokenMetadata, TokenState};
use crate::domain::transaction::Transaction;
use crate::domain::value_objects::{Address, EcdsaSignature, U256};
use crate::errors::TokenResult;
use crate::events::{Receipt, TokenEvent};
use crate::ports::inbound::BackupableTokenApi;
use crate::ports::outbound::{Clock, EventSink, SignatureRecovery};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Call counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStats {
    /// Mutating calls that committed.
    pub committed: u64,
    /// Mutating calls rejected with an error.
    pub rejected: u64,
    /// Successful recovery sweeps.
    pub recoveries: u64,
}

/// A deployed token instance.
pub struct BackupableTokenService<C: Clock = SystemClock, R: SignatureRecovery = K256Recovery> {
    state: RwLock<TokenState>,
    domain: AuthorizationDomain,
    clock: C,
    recovery: R,
    events: Arc<dyn EventSink>,
    stats: Mutex<ServiceStats>,
}

impl<C: Clock, R: SignatureRecovery> BackupableTokenService<C, R> {
    /// Deploys a token: credits the whole supply to `deployer` and publishes
    /// the mint `Transfer(0x0, deployer, supply)`.
    ///
    /// # Errors
    ///
    /// Any [`TokenConfig::validate`] failure, or
    /// [`ConfigError::ZeroDeployer`].
    pub fn deploy(
        config: TokenConfig,
        deployer: Address,
        clock: C,
        recovery: R,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if deployer.is_zero() {
            return Err(ConfigError::ZeroDeployer);
        }

        let metadata = TokenMetadata {
            name: config.name,
            symbol: config.symbol,
            decimals: config.decimals,
        };
        let state = TokenState::new(metadata, deployer, config.total_supply);
        let domain = config.domain_tag.domain();

        events.publish(&[TokenEvent::Transfer {
            from: Address::ZERO,
            to: deployer,
            amount: config.total_supply,
        }]);
        info!(
            name = %state.metadata().name,
            symbol = %state.metadata().symbol,
            %deployer,
            supply = %config.total_supply,
            domain_tag = %domain.tag(),
            "Token deployed"
        );

        Ok(Self {
            state: RwLock::new(state),
            domain,
            clock,
            recovery,
            events,
            stats: Mutex::new(ServiceStats::default()),
        })
    }

    /// Current counters.
    pub fn stats(&self) -> ServiceStats {
        *self.stats.lock()
    }

    /// The authorization domain signatures are verified under.
    pub fn domain(&self) -> &AuthorizationDomain {
        &self.domain
    }

    /// Runs `f` against a read-only view of the committed state.
    pub fn with_state<T>(&self, f: impl FnOnce(&TokenState) -> T) -> T {
        f(&self.state.read())
    }

    /// Runs `op` as one transaction and returns its output and events.
    fn execute<T>(
        &self,
        call: &'static str,
        op: impl FnOnce(&mut Transaction<'_>) -> TokenResult<T>,
    ) -> TokenResult<(T, Vec<TokenEvent>)> {
        let mut state = self.state.write();

        let staged = {
            let mut tx = Transaction::begin(&state);
            op(&mut tx).map(|out| (out, tx.into_delta()))
        };
        let (out, delta) = match staged {
            Ok(staged) => staged,
            Err(e) => {
                self.stats.lock().rejected += 1;
                warn!(call, code = e.code(), error = %e, "Call rejected");
                return Err(e);
            }
        };

        let events = state.commit(delta).map_err(|e| {
            self.stats.lock().rejected += 1;
            error!(call, error = %e, "Commit refused");
            e
        })?;
        self.events.publish(&events);
        self.stats.lock().committed += 1;
        Ok((out, events))
    }
}

impl<C: Clock, R: SignatureRecovery> BackupableTokenApi for BackupableTokenService<C, R> {
    fn name(&self) -> String {
        self.state.read().metadata().name.clone()
    }

    fn symbol(&self) -> String {
        self.state.read().metadata().symbol.clone()
    }

    fn decimals(&self) -> u8 {
        self.state.read().metadata().decimals
    }

    fn total_supply(&self) -> U256 {
        self.state.read().ledger().total_supply()
    }

    fn balance_of(&self, account: Address) -> U256 {
        self.state.read().ledger().balance_of(account)
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.state.read().ledger().allowance(owner, spender)
    }

    fn backup_address_of(&self, account: Address) -> Option<Address> {
        self.state.read().guard().backup_address_of(account)
    }

    fn is_blacklisted(&self, account: Address) -> bool {
        self.state.read().guard().is_blacklisted(account)
    }

    fn account_status(&self, account: Address) -> AccountStatus {
        self.state.read().guard().status(account)
    }

    #[instrument(skip(self))]
    fn transfer(&self, caller: Address, to: Address, amount: U256) -> TokenResult<Receipt> {
        let ((), events) = self.execute("transfer", |tx| tx.transfer(caller, to, amount))?;
        debug!("Transfer committed");
        Ok(Receipt { events })
    }

    #[instrument(skip(self))]
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<Receipt> {
        let ((), events) = self.execute("transfer_from", |tx| {
            tx.transfer_from(spender, from, to, amount)
        })?;
        debug!("Delegated transfer committed");
        Ok(Receipt { events })
    }

    #[instrument(skip(self))]
    fn approve(&self, owner: Address, spender: Address, amount: U256) -> TokenResult<Receipt> {
        let ((), events) = self.execute("approve", |tx| tx.approve(owner, spender, amount))?;
        debug!("Approval committed");
        Ok(Receipt { events })
    }

    #[instrument(skip(self))]
    fn increase_allowance(
        &self,
        owner: Address,
        spender: Address,
        delta: U256,
    ) -> TokenResult<Receipt> {
        let ((), events) = self.execute("increase_allowance", |tx| {
            tx.increase_allowance(owner, spender, delta)
        })?;
        debug!("Allowance increased");
        Ok(Receipt { events })
    }

    #[instrument(skip(self))]
    fn decrease_allowance(
        &self,
        owner: Address,
        spender: Address,
        delta: U256,
    ) -> TokenResult<Receipt> {
        let ((), events) = self.execute("decrease_allowance", |tx| {
            tx.decrease_allowance(owner, spender, delta)
        })?;
        debug!("Allowance decreased");
        Ok(Receipt { events })
    }

    #[instrument(skip(self))]
    fn set_backup_address(&self, caller: Address, backup: Address) -> TokenResult<Receipt> {
        let ((), events) = self.execute("set_backup_address", |tx| {
            tx.set_backup_address(caller, backup)
        })?;
        info!("Backup address registered");
        Ok(Receipt { events })
    }

    #[instrument(skip(self, signature))]
    fn backup_token(
        &self,
        account: Address,
        deadline: u64,
        signature: &EcdsaSignature,
    ) -> TokenResult<Receipt> {
        let now = self.clock.now();
        let authority = RecoveryAuthority::new(&self.domain, &self.recovery);
        let (sweep, events) = self.execute("backup_token", |tx| {
            authority.backup_token(tx, account, deadline, signature, now)
        })?;

        self.stats.lock().recoveries += 1;
        info!(
            backup_address = %sweep.backup_address,
            amount = %sweep.amount,
            "Account recovered and blacklisted"
        );
        Ok(Receipt { events })
    }
}

impl<C: Clock, R: SignatureRecovery> std::fmt::Debug for BackupableTokenService<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("BackupableTokenService")
            .field("symbol", &state.metadata().symbol)
            .field("total_supply", &state.ledger().total_supply())
            .field("holders", &state.ledger().holder_count())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
