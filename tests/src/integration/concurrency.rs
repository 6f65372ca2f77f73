//! # Concurrency
//!
//! Calls from many threads are serialized by the service lock: supply is
//! conserved and every accepted call is reflected exactly once.

#[cfg(test)]
mod tests {
    use backupable_token::domain::invariants::check_supply_invariant;
    use backupable_token::prelude::*;
    use backupable_token::test_helpers::{deterministic_signer, test_env, units};
    use std::sync::Arc;

    #[test]
    fn test_parallel_transfers_conserve_supply() {
        let deployer = deterministic_signer(1).address();
        let env = Arc::new(test_env(deployer));
        let holders: Vec<Address> = (2u8..10).map(|i| Address::new([i; 20])).collect();
        for holder in &holders {
            env.token.transfer(deployer, *holder, units(100)).unwrap();
        }

        let handles: Vec<_> = holders
            .iter()
            .enumerate()
            .map(|(i, &from)| {
                let env = Arc::clone(&env);
                let to = holders[(i + 1) % holders.len()];
                std::thread::spawn(move || {
                    let mut accepted = 0u64;
                    for _ in 0..50 {
                        if env.token.transfer(from, to, units(3)).is_ok() {
                            accepted += 1;
                        }
                    }
                    accepted
                })
            })
            .collect();
        let accepted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert!(env.token.with_state(check_supply_invariant));
        let total: U256 = holders
            .iter()
            .chain(std::iter::once(&deployer))
            .fold(U256::zero(), |acc, h| acc + env.token.balance_of(*h));
        assert_eq!(total, units(10_000));

        let stats = env.token.stats();
        assert_eq!(stats.committed, holders.len() as u64 + accepted);
        assert_eq!(env.log.len() as u64, 1 + stats.committed);
    }

    #[test]
    fn test_racing_recoveries_sweep_once() {
        let bob = deterministic_signer(0xB0);
        let carol = Address::new([0xC0; 20]);
        let deployer = deterministic_signer(1).address();
        let env = Arc::new(test_env(deployer));
        env.token.transfer(deployer, bob.address(), units(50)).unwrap();
        env.token.set_backup_address(bob.address(), carol).unwrap();

        let deadline = env.clock.now() + 100;
        let sig = bob
            .sign_authorization(env.token.domain(), carol, units(50), deadline)
            .unwrap();
        let account = bob.address();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let env = Arc::clone(&env);
                std::thread::spawn(move || env.token.backup_token(account, deadline, &sig))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == TokenError::Blacklisted(account)));
        assert_eq!(env.token.balance_of(carol), units(50));
        assert_eq!(env.token.stats().recoveries, 1);
    }
}
