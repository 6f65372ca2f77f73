//! # Event Stream
//!
//! Live subscribers see exactly the committed events, in commit order, and
//! never see events from rejected calls.

#[cfg(test)]
mod tests {
    use crate::integration::Actors;
    use backupable_token::prelude::*;
    use backupable_token::test_helpers::units;
    use std::time::Duration;

    #[tokio::test]
    async fn test_subscriber_sees_committed_events_only() {
        let a = Actors::new();
        let (alice, bob, carol) = (a.alice.address(), a.bob.address(), a.carol.address());
        let mut rx = a.env.log.subscribe();

        a.token().transfer(alice, bob, units(10)).unwrap();
        assert!(a.token().transfer(carol, bob, units(1)).is_err());
        a.token().approve(bob, carol, units(2)).unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(first.event.name(), "Transfer");
        assert_eq!(second.sequence, 2);
        assert_eq!(second.event.name(), "Approval");

        let nothing = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test]
    async fn test_recovery_events_stream_in_order() {
        let a = Actors::new();
        let (alice, bob, carol) = (a.alice.address(), a.bob.address(), a.carol.address());
        a.token().transfer(alice, bob, units(7)).unwrap();
        a.token().set_backup_address(bob, carol).unwrap();
        let mut rx = a.env.log.subscribe();

        let deadline = a.now() + 60;
        let sig = a.authorize(&a.bob, carol, units(7), deadline);
        a.token().backup_token(bob, deadline, &sig).unwrap();

        let mut names = Vec::new();
        for _ in 0..3 {
            names.push(rx.recv().await.unwrap().event.name());
        }
        assert_eq!(names, vec!["Transfer", "EmergencyTransfer", "Blacklisted"]);
    }

    #[test]
    fn test_history_starts_with_mint() {
        let a = Actors::new();
        let history = a.env.log.history();

        assert_eq!(history[0].sequence, 0);
        assert_eq!(
            history[0].event,
            TokenEvent::Transfer {
                from: Address::ZERO,
                to: a.alice.address(),
                amount: units(10_000)
            }
        );
        assert_eq!(a.env.log.events_for(a.alice.address()).len(), 1);
    }

    #[test]
    fn test_events_serialize_as_tagged_json() {
        let a = Actors::new();
        a.token()
            .set_backup_address(a.bob.address(), a.carol.address())
            .unwrap();

        let logged = a.env.log.history().pop().unwrap();
        let json = serde_json::to_value(&logged).unwrap();
        assert_eq!(json["event"]["event"], "BackupAddressSet");
        assert_eq!(json["sequence"], 1);

        let back: LoggedEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, logged);
    }
}
