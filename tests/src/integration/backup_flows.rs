//! # Backup and Recovery Flows
//!
//! Backup registration, signature-authorized sweeps, and the permanent
//! blacklist that follows.

#[cfg(test)]
mod tests {
    use crate::integration::Actors;
    use backupable_token::domain::authorization::keccak256;
    use backupable_token::prelude::*;
    use backupable_token::test_helpers::{deterministic_signer, units, GENESIS_TIME};

    const DEADLINE_WINDOW: u64 = 10_000;

    /// Alice sends Bob 1000 tokens; Bob nominates Carol.
    fn bob_with_backup() -> Actors {
        let a = Actors::new();
        a.token()
            .transfer(a.alice.address(), a.bob.address(), units(1000))
            .unwrap();
        a.token()
            .set_backup_address(a.bob.address(), a.carol.address())
            .unwrap();
        a
    }

    /// Carol nominates Alice and is swept (with a zero balance), leaving
    /// Carol blacklisted.
    fn blacklist_carol(a: &Actors) {
        let (alice, carol) = (a.alice.address(), a.carol.address());
        let deadline = a.now() + DEADLINE_WINDOW;
        a.token().set_backup_address(carol, alice).unwrap();
        let sig = a.authorize(&a.carol, alice, U256::zero(), deadline);
        a.token().backup_token(carol, deadline, &sig).unwrap();
        assert!(a.token().is_blacklisted(carol));
    }

    #[test]
    fn test_set_backup_address() {
        let a = Actors::new();
        let (bob, carol) = (a.bob.address(), a.carol.address());

        let receipt = a.token().set_backup_address(bob, carol).unwrap();

        assert_eq!(a.token().backup_address_of(bob), Some(carol));
        assert_eq!(
            receipt.events,
            vec![TokenEvent::BackupAddressSet {
                account: bob,
                backup_address: carol
            }]
        );
    }

    #[test]
    fn test_blacklisted_backup_may_be_nominated() {
        let a = Actors::new();
        blacklist_carol(&a);

        // Registration only checks the caller; recovery checks the backup.
        a.token()
            .set_backup_address(a.bob.address(), a.carol.address())
            .unwrap();
    }

    #[test]
    fn test_blacklisted_caller_cannot_set_backup() {
        let a = Actors::new();
        blacklist_carol(&a);

        let err = a
            .token()
            .set_backup_address(a.carol.address(), a.bob.address())
            .unwrap_err();
        assert_eq!(err, TokenError::Blacklisted(a.carol.address()));
        assert_eq!(err.to_string(), "blacklisted");
    }

    #[test]
    fn test_backup_token_sweeps_and_blacklists() {
        let a = bob_with_backup();
        let (bob, carol) = (a.bob.address(), a.carol.address());
        let deadline = a.now() + DEADLINE_WINDOW;
        let sig = a.authorize(&a.bob, carol, units(1000), deadline);

        // Relayed by Alice; the relayer is not part of the call.
        let receipt = a.token().backup_token(bob, deadline, &sig).unwrap();

        assert_eq!(a.token().balance_of(bob), U256::zero());
        assert_eq!(a.token().balance_of(carol), units(1000));
        assert!(a.token().is_blacklisted(bob));
        assert_eq!(a.token().account_status(bob), AccountStatus::Blacklisted);
        assert_eq!(
            receipt.events,
            vec![
                TokenEvent::Transfer {
                    from: bob,
                    to: carol,
                    amount: units(1000)
                },
                TokenEvent::EmergencyTransfer {
                    account: bob,
                    backup_address: carol,
                    amount: units(1000)
                },
                TokenEvent::Blacklisted { account: bob },
            ]
        );
    }

    #[test]
    fn test_expired_signature() {
        let a = bob_with_backup();
        let deadline = a.now() - DEADLINE_WINDOW;
        let sig = a.authorize(&a.bob, a.carol.address(), units(1000), deadline);

        let err = a
            .token()
            .backup_token(a.bob.address(), deadline, &sig)
            .unwrap_err();
        assert_eq!(err.to_string(), "signature expired");
        assert!(!a.token().is_blacklisted(a.bob.address()));
    }

    #[test]
    fn test_deadline_boundary() {
        let a = bob_with_backup();
        let deadline = a.now() + 5;
        let sig = a.authorize(&a.bob, a.carol.address(), units(1000), deadline);

        a.env.clock.set(deadline);
        a.token()
            .backup_token(a.bob.address(), deadline, &sig)
            .unwrap();
    }

    #[test]
    fn test_backup_not_set() {
        let a = bob_with_backup();
        let deadline = a.now() + DEADLINE_WINDOW;
        let sig = a.authorize(&a.alice, a.carol.address(), units(1000), deadline);

        let err = a
            .token()
            .backup_token(a.alice.address(), deadline, &sig)
            .unwrap_err();
        assert_eq!(err, TokenError::BackupAddressNotSet(a.alice.address()));
        assert_eq!(err.to_string(), "backup address is not set");
    }

    #[test]
    fn test_zero_backup_reads_as_unset() {
        let a = bob_with_backup();
        let bob = a.bob.address();
        a.token().set_backup_address(bob, Address::ZERO).unwrap();
        assert_eq!(a.token().backup_address_of(bob), None);

        let deadline = a.now() + DEADLINE_WINDOW;
        let sig = a.authorize(&a.bob, Address::ZERO, units(1000), deadline);
        assert_eq!(
            a.token().backup_token(bob, deadline, &sig),
            Err(TokenError::BackupAddressNotSet(bob))
        );
    }

    #[test]
    fn test_already_backed_up() {
        let a = bob_with_backup();
        let bob = a.bob.address();
        let deadline = a.now() + DEADLINE_WINDOW;
        let sig = a.authorize(&a.bob, a.carol.address(), units(1000), deadline);
        a.token().backup_token(bob, deadline, &sig).unwrap();

        assert_eq!(
            a.token().backup_token(bob, deadline, &sig),
            Err(TokenError::Blacklisted(bob))
        );
    }

    #[test]
    fn test_backup_address_blacklisted() {
        let a = bob_with_backup();
        blacklist_carol(&a);
        let deadline = a.now() + DEADLINE_WINDOW;
        let sig = a.authorize(&a.bob, a.carol.address(), units(1000), deadline);

        let err = a
            .token()
            .backup_token(a.bob.address(), deadline, &sig)
            .unwrap_err();
        assert_eq!(err, TokenError::BackupAddressBlacklisted(a.carol.address()));
        assert_eq!(err.to_string(), "backup address is black listed");
        assert_eq!(a.token().balance_of(a.bob.address()), units(1000));
    }

    #[test]
    fn test_signature_by_someone_else() {
        let a = bob_with_backup();
        let deadline = a.now() + DEADLINE_WINDOW;
        let sig = a.authorize(&a.alice, a.carol.address(), units(1000), deadline);

        let err = a
            .token()
            .backup_token(a.bob.address(), deadline, &sig)
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid signature");
    }

    #[test]
    fn test_signature_over_wrong_fields() {
        let a = bob_with_backup();
        let (bob, carol) = (a.bob.address(), a.carol.address());
        let deadline = a.now() + DEADLINE_WINDOW;

        let wrong_amount = a.authorize(&a.bob, carol, units(999), deadline);
        let wrong_backup = a.authorize(&a.bob, a.alice.address(), units(1000), deadline);
        let wrong_deadline = a.authorize(&a.bob, carol, units(1000), deadline + 1);
        for sig in [wrong_amount, wrong_backup, wrong_deadline] {
            assert_eq!(
                a.token().backup_token(bob, deadline, &sig),
                Err(TokenError::InvalidSignature)
            );
        }
    }

    #[test]
    fn test_signature_from_other_domain() {
        let a = bob_with_backup();
        let deadline = a.now() + DEADLINE_WINDOW;
        let other = AuthorizationDomain::from_tag(keccak256(b"another deployment"));
        let sig = a
            .bob
            .sign_authorization(&other, a.carol.address(), units(1000), deadline)
            .unwrap();

        assert_eq!(
            a.token().backup_token(a.bob.address(), deadline, &sig),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_malformed_signatures() {
        let a = bob_with_backup();
        let bob = a.bob.address();
        let deadline = a.now() + DEADLINE_WINDOW;
        let good = a.authorize(&a.bob, a.carol.address(), units(1000), deadline);

        let mut bad_v = good;
        bad_v.v = 30;
        let zero_r = EcdsaSignature::new(good.v, [0u8; 32], good.s);
        let garbage = EcdsaSignature::from_rsv(&[0xFF; 65]);
        for sig in [bad_v, zero_r, garbage] {
            assert_eq!(
                a.token().backup_token(bob, deadline, &sig),
                Err(TokenError::InvalidSignature)
            );
        }
        assert_eq!(a.env.token.stats().rejected, 3);
    }

    #[test]
    fn test_pinned_domain_tag() {
        let alice = deterministic_signer(0xA1);
        let bob = deterministic_signer(0xB0);
        let carol = Address::new([0xC0; 20]);
        let tag: Hash = "0x4310bae2d8c961b4f172b7233bb28f5e858776459ced2b09e2a6c2951c368ef4"
            .parse()
            .unwrap();
        let config = TokenConfig {
            domain_tag: DomainTagConfig::Tag(tag),
            ..TokenConfig::default()
        };
        let clock = ManualClock::new(GENESIS_TIME);
        let token = BackupableTokenService::deploy(
            config,
            alice.address(),
            clock,
            K256Recovery,
            std::sync::Arc::new(EventLog::new()),
        )
        .unwrap();

        token.transfer(alice.address(), bob.address(), units(3)).unwrap();
        token.set_backup_address(bob.address(), carol).unwrap();
        let deadline = GENESIS_TIME + 1;
        let sig = bob
            .sign_authorization(&AuthorizationDomain::from_tag(tag), carol, units(3), deadline)
            .unwrap();

        token.backup_token(bob.address(), deadline, &sig).unwrap();
        assert_eq!(token.balance_of(carol), units(3));
    }

    #[test]
    fn test_blacklisted_cannot_send_or_receive() {
        let a = bob_with_backup();
        let (alice, bob, carol) = (a.alice.address(), a.bob.address(), a.carol.address());
        let deadline = a.now() + DEADLINE_WINDOW;
        let sig = a.authorize(&a.bob, carol, units(1000), deadline);
        a.token().backup_token(bob, deadline, &sig).unwrap();
        let token = a.token();

        assert_eq!(
            token.transfer(alice, bob, units(1000)),
            Err(TokenError::Blacklisted(bob))
        );
        token.approve(alice, carol, units(1000)).unwrap();
        assert_eq!(
            token.transfer_from(carol, alice, bob, units(1000)),
            Err(TokenError::Blacklisted(bob))
        );

        assert_eq!(
            token.transfer(bob, alice, U256::zero()),
            Err(TokenError::Blacklisted(bob))
        );
        assert_eq!(
            token.transfer_from(carol, bob, alice, U256::zero()),
            Err(TokenError::Blacklisted(bob))
        );
    }

    #[test]
    fn test_blacklisted_cannot_approve_or_be_approved() {
        let a = Actors::new();
        let (alice, bob, carol) = (a.alice.address(), a.bob.address(), a.carol.address());
        let token = a.token();
        token.transfer(alice, bob, units(1000)).unwrap();
        token.approve(bob, alice, units(1000)).unwrap();
        token.set_backup_address(bob, carol).unwrap();
        token.approve(alice, bob, units(1000)).unwrap();
        let deadline = a.now() + DEADLINE_WINDOW;
        let sig = a.authorize(&a.bob, carol, units(1000), deadline);
        token.backup_token(bob, deadline, &sig).unwrap();

        let blocked = Err(TokenError::Blacklisted(bob));
        assert_eq!(token.approve(alice, bob, units(1000)), blocked);
        assert_eq!(token.increase_allowance(alice, bob, units(1000)), blocked);
        assert_eq!(token.decrease_allowance(alice, bob, units(1000)), blocked);

        assert_eq!(token.approve(bob, alice, units(1000)), blocked);
        assert_eq!(token.increase_allowance(bob, alice, units(1000)), blocked);
        assert_eq!(token.decrease_allowance(bob, alice, units(1000)), blocked);

        // Existing allowances are frozen, not cleared.
        assert_eq!(token.allowance(alice, bob), units(1000));
    }

    #[test]
    fn test_blacklisted_spender_cannot_transfer_from() {
        let a = bob_with_backup();
        let (alice, bob, carol) = (a.alice.address(), a.bob.address(), a.carol.address());
        let token = a.token();
        token.approve(alice, bob, units(500)).unwrap();
        let deadline = a.now() + DEADLINE_WINDOW;
        let sig = a.authorize(&a.bob, carol, units(1000), deadline);
        token.backup_token(bob, deadline, &sig).unwrap();

        let alice_before = token.balance_of(alice);
        let carol_before = token.balance_of(carol);
        let logged = a.env.log.len();

        assert_eq!(
            token.transfer_from(bob, alice, carol, units(100)),
            Err(TokenError::Blacklisted(bob))
        );
        assert_eq!(token.balance_of(alice), alice_before);
        assert_eq!(token.balance_of(carol), carol_before);
        assert_eq!(token.allowance(alice, bob), units(500));
        assert_eq!(a.env.log.len(), logged);
    }
}
