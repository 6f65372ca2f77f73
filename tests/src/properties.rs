//! # Ledger Properties
//!
//! Randomized call sequences against a deployed token. After every call,
//! accepted or rejected:
//!
//! - balances sum to the total supply
//! - every previously blacklisted account is still blacklisted
//! - a rejected call left balances, allowances and the event log untouched

#[cfg(test)]
mod tests {
    use backupable_token::domain::invariants::{check_blacklist_monotonic, check_supply_invariant};
    use backupable_token::prelude::*;
    use backupable_token::test_helpers::{deterministic_signer, test_env, TestEnv};
    use proptest::prelude::*;

    const ACCOUNTS: usize = 4;

    #[derive(Clone, Debug)]
    enum Op {
        Transfer { from: usize, to: usize, amount: u64 },
        Approve { owner: usize, spender: usize, amount: u64 },
        TransferFrom { spender: usize, from: usize, to: usize, amount: u64 },
        Increase { owner: usize, spender: usize, delta: u64 },
        Decrease { owner: usize, spender: usize, delta: u64 },
        SetBackup { account: usize, backup: usize },
        Recover { account: usize },
    }

    fn idx() -> impl Strategy<Value = usize> {
        0..ACCOUNTS
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (idx(), idx(), 0u64..5_000).prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
            2 => (idx(), idx(), 0u64..5_000).prop_map(|(owner, spender, amount)| Op::Approve { owner, spender, amount }),
            3 => (idx(), idx(), idx(), 0u64..5_000)
                .prop_map(|(spender, from, to, amount)| Op::TransferFrom { spender, from, to, amount }),
            1 => (idx(), idx(), 0u64..5_000).prop_map(|(owner, spender, delta)| Op::Increase { owner, spender, delta }),
            1 => (idx(), idx(), 0u64..5_000).prop_map(|(owner, spender, delta)| Op::Decrease { owner, spender, delta }),
            1 => (idx(), idx()).prop_map(|(account, backup)| Op::SetBackup { account, backup }),
            1 => idx().prop_map(|account| Op::Recover { account }),
        ]
    }

    struct World {
        env: TestEnv,
        signers: Vec<AuthorizationSigner>,
    }

    impl World {
        fn new() -> Self {
            let signers: Vec<_> = (1..=ACCOUNTS as u8).map(deterministic_signer).collect();
            let env = test_env(signers[0].address());
            Self { env, signers }
        }

        fn addr(&self, i: usize) -> Address {
            self.signers[i].address()
        }

        fn snapshot(&self) -> Vec<U256> {
            let mut values = Vec::new();
            for i in 0..ACCOUNTS {
                values.push(self.env.token.balance_of(self.addr(i)));
                for j in 0..ACCOUNTS {
                    values.push(self.env.token.allowance(self.addr(i), self.addr(j)));
                }
            }
            values
        }

        fn apply(&self, op: &Op) -> TokenResult<Receipt> {
            let token = &self.env.token;
            let amount = |n: u64| U256::from(n) * U256::exp10(18);
            match *op {
                Op::Transfer { from, to, amount: n } => token.transfer(self.addr(from), self.addr(to), amount(n)),
                Op::Approve { owner, spender, amount: n } => {
                    token.approve(self.addr(owner), self.addr(spender), amount(n))
                }
                Op::TransferFrom { spender, from, to, amount: n } => {
                    token.transfer_from(self.addr(spender), self.addr(from), self.addr(to), amount(n))
                }
                Op::Increase { owner, spender, delta } => {
                    token.increase_allowance(self.addr(owner), self.addr(spender), amount(delta))
                }
                Op::Decrease { owner, spender, delta } => {
                    token.decrease_allowance(self.addr(owner), self.addr(spender), amount(delta))
                }
                Op::SetBackup { account, backup } => token.set_backup_address(self.addr(account), self.addr(backup)),
                Op::Recover { account } => {
                    let signer = &self.signers[account];
                    let deadline = self.env.clock.now() + 60;
                    let backup = token.backup_address_of(signer.address()).unwrap_or(Address::ZERO);
                    let balance = token.balance_of(signer.address());
                    let sig = signer
                        .sign_authorization(token.domain(), backup, balance, deadline)
                        .expect("signing succeeds");
                    token.backup_token(signer.address(), deadline, &sig)
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_invariants_hold_across_call_sequences(ops in prop::collection::vec(op(), 1..40)) {
            let world = World::new();

            for op in &ops {
                let guard_before = world.env.token.with_state(|s| s.guard().clone());
                let snapshot = world.snapshot();
                let logged = world.env.log.len();

                let result = world.apply(op);

                prop_assert!(world.env.token.with_state(check_supply_invariant));
                prop_assert!(world.env.token.with_state(|s| check_blacklist_monotonic(&guard_before, s.guard())));
                match result {
                    Ok(receipt) => {
                        prop_assert_eq!(world.env.log.len(), logged + receipt.events.len());
                    }
                    Err(_) => {
                        prop_assert_eq!(world.snapshot(), snapshot);
                        prop_assert_eq!(world.env.log.len(), logged);
                    }
                }
            }
        }

        #[test]
        fn prop_overdraft_is_rejected_without_effect(have in 0u64..1_000_000, extra in 1u64..1_000_000) {
            let world = World::new();
            let (alice, bob, carol) = (world.addr(0), world.addr(1), world.addr(2));
            world.env.token.transfer(alice, bob, U256::from(have)).unwrap();

            let err = world.env.token.transfer(bob, carol, U256::from(have + extra)).unwrap_err();

            prop_assert_eq!(err.code(), "InsufficientBalance");
            prop_assert_eq!(world.env.token.balance_of(bob), U256::from(have));
            prop_assert_eq!(world.env.token.balance_of(carol), U256::zero());
        }

        #[test]
        fn prop_increase_then_decrease_restores_allowance(start in any::<u64>(), delta in any::<u64>()) {
            let world = World::new();
            let (owner, spender) = (world.addr(1), world.addr(2));
            world.env.token.approve(owner, spender, U256::from(start)).unwrap();

            world.env.token.increase_allowance(owner, spender, U256::from(delta)).unwrap();
            world.env.token.decrease_allowance(owner, spender, U256::from(delta)).unwrap();

            prop_assert_eq!(world.env.token.allowance(owner, spender), U256::from(start));
        }

        #[test]
        fn prop_foreign_signature_is_invalid(seed in 5u8..=254, amount in 0u64..10_000) {
            let world = World::new();
            let (alice, bob, carol) = (world.addr(0), world.addr(1), world.addr(2));
            world.env.token.transfer(alice, bob, U256::from(amount)).unwrap();
            world.env.token.set_backup_address(bob, carol).unwrap();

            let impostor = deterministic_signer(seed);
            let deadline = world.env.clock.now() + 60;
            let sig = impostor
                .sign_authorization(world.env.token.domain(), carol, U256::from(amount), deadline)
                .unwrap();

            prop_assert_eq!(
                world.env.token.backup_token(bob, deadline, &sig),
                Err(TokenError::InvalidSignature)
            );
            prop_assert!(!world.env.token.is_blacklisted(bob));
        }

        #[test]
        fn prop_sweep_moves_entire_balance(amount in 0u64..u64::MAX, window in 0u64..1_000_000) {
            let world = World::new();
            let (alice, bob, carol) = (world.addr(0), world.addr(1), world.addr(2));
            world.env.token.transfer(alice, bob, U256::from(amount)).unwrap();
            world.env.token.set_backup_address(bob, carol).unwrap();
            let carol_before = world.env.token.balance_of(carol);

            let deadline = world.env.clock.now() + window;
            let sig = world.signers[1]
                .sign_authorization(world.env.token.domain(), carol, U256::from(amount), deadline)
                .unwrap();
            world.env.token.backup_token(bob, deadline, &sig).unwrap();

            prop_assert_eq!(world.env.token.balance_of(bob), U256::zero());
            prop_assert_eq!(world.env.token.balance_of(carol), carol_before + U256::from(amount));
            prop_assert_eq!(world.env.token.account_status(bob), AccountStatus::Blacklisted);
        }
    }
}
