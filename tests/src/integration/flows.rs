//! # Integration Test Flows
//!
//! Full deposit lifecycles driven through `ValueLockApi`, checking ledger
//! balances, events and lifecycle state together.

#[cfg(test)]
mod tests {
    use crate::fixtures::{qnt, qnt_asset, Fixture, ALICE, BOB, MALLORY, T0};
    use value_lock::{
        ClockSource, LockEvent, LockState, ValueLockApi, ValueLockError, WithdrawnBy,
        MS_PER_MINUTE,
    };

    // =============================================================================
    // HAPPY PATHS
    // =============================================================================

    /// Recipient waits out the lock and claims.
    #[test]
    fn test_recipient_claim_flow() {
        let f = Fixture::new();
        let (id, created) = f.engine.create_deposit(ALICE, qnt(100), BOB, 10).unwrap();
        assert_eq!(created.unlock_time, T0 + 600_000);

        f.clock.advance(599_999);
        assert_eq!(
            f.engine.withdraw_by_recipient(BOB, id),
            Err(ValueLockError::TooEarly {
                now: T0 + 599_999,
                unlock_time: T0 + 600_000
            })
        );

        f.clock.advance(1);
        let (transfer, withdrawn) = f.engine.withdraw_by_recipient(BOB, id).unwrap();
        assert_eq!(transfer.destination, BOB);
        assert_eq!(transfer.value, qnt(100));
        assert_eq!(withdrawn.withdrawn_by, WithdrawnBy::Recipient);
        assert_eq!(withdrawn.withdrawn_at, T0 + 600_000);

        assert_eq!(f.ledger.balance_of(&BOB, &qnt_asset()), 100);
        assert_eq!(f.ledger.balance_of(&ALICE, &qnt_asset()), 0);
        assert_eq!(
            f.engine.lifecycle_state(&id),
            Some(LockState::WithdrawnByRecipient)
        );
    }

    /// Depositor changes their mind one second after locking.
    #[test]
    fn test_depositor_reclaim_flow() {
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(100), BOB, 10).unwrap();
        f.clock.advance(1_000);

        let (transfer, withdrawn) = f.engine.withdraw_by_depositor(ALICE, id).unwrap();
        assert_eq!(transfer.destination, ALICE);
        assert_eq!(withdrawn.withdrawn_by, WithdrawnBy::Depositor);
        assert_eq!(f.ledger.balance_of(&ALICE, &qnt_asset()), 100);

        f.clock.advance(600_000);
        assert_eq!(
            f.engine.withdraw_by_recipient(BOB, id),
            Err(ValueLockError::NotFound(id))
        );
    }

    /// The depositor keeps the right to reclaim after unlock until someone
    /// withdraws.
    #[test]
    fn test_depositor_reclaim_after_unlock() {
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(7), BOB, 1).unwrap();
        f.clock.advance(10 * MS_PER_MINUTE);

        assert!(f.engine.can_recipient_withdraw(id).unwrap());
        assert!(f.engine.withdraw_by_depositor(ALICE, id).is_ok());
        assert_eq!(f.ledger.balance_of(&ALICE, &qnt_asset()), 7);
    }

    // =============================================================================
    // WORKED SCENARIOS
    // =============================================================================

    #[test]
    fn test_scenario_thirty_minute_lock() {
        let f = Fixture::new();
        let (_, created) = f.engine.create_deposit(ALICE, qnt(1000), BOB, 30).unwrap();
        assert_eq!(created.unlock_time, created.start_time + 1_800_000);
    }

    #[test]
    fn test_scenario_claim_after_five_minutes() {
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(300), BOB, 5).unwrap();
        f.clock.advance(5 * MS_PER_MINUTE);
        let (transfer, _) = f.engine.withdraw_by_recipient(BOB, id).unwrap();
        assert_eq!(transfer.value, qnt(300));
    }

    #[test]
    fn test_scenario_can_withdraw_flips_at_unlock() {
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(1), BOB, 2).unwrap();
        assert!(!f.engine.can_recipient_withdraw(id).unwrap());
        f.clock.advance(120_000);
        assert!(f.engine.can_recipient_withdraw(id).unwrap());
    }

    #[test]
    fn test_scenario_time_until_unlock_countdown() {
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(1), BOB, 3).unwrap();
        assert_eq!(f.engine.time_until_unlock(id).unwrap(), 180_000);
        f.clock.advance(60_000);
        assert_eq!(f.engine.time_until_unlock(id).unwrap(), 120_000);
        f.clock.advance(120_000);
        assert_eq!(f.engine.time_until_unlock(id).unwrap(), 0);
    }

    #[test]
    fn test_scenario_creation_rejections() {
        let f = Fixture::new();
        assert_eq!(
            f.engine.create_deposit(ALICE, qnt(1), BOB, 0),
            Err(ValueLockError::InvalidDuration)
        );
        assert_eq!(
            f.engine.create_deposit(ALICE, qnt(1), BOB, 525_601),
            Err(ValueLockError::DurationTooLong {
                minutes: 525_601,
                max: 525_600
            })
        );
        assert_eq!(
            f.engine.create_deposit(ALICE, qnt(0), BOB, 1),
            Err(ValueLockError::InvalidAmount)
        );
        assert_eq!(
            f.engine.create_deposit(ALICE, qnt(1), ALICE, 1),
            Err(ValueLockError::InvalidRecipient)
        );
    }

    // =============================================================================
    // QUERIES
    // =============================================================================

    #[test]
    fn test_snapshot_tracks_clock() {
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(3), BOB, 2).unwrap();

        let before = f.engine.get_info(id).unwrap();
        f.clock.advance(30_000);
        let after = f.engine.get_info(id).unwrap();

        assert_eq!(before.now, T0);
        assert_eq!(after.now, T0 + 30_000);
        assert_eq!(before.unlock_time, after.unlock_time);
        assert_eq!(f.engine.time_until_unlock(id).unwrap(), 90_000);
    }

    #[test]
    fn test_queries_after_withdrawal() {
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(3), BOB, 2).unwrap();
        f.engine.withdraw_by_depositor(ALICE, id).unwrap();

        assert_eq!(f.engine.get_info(id), Err(ValueLockError::NotFound(id)));
        assert_eq!(
            f.engine.can_recipient_withdraw(id),
            Err(ValueLockError::NotFound(id))
        );
        assert_eq!(
            f.engine.time_until_unlock(id),
            Err(ValueLockError::NotFound(id))
        );
    }

    // =============================================================================
    // MULTIPLE DEPOSITS
    // =============================================================================

    /// Deposits between the same parties are independent.
    #[test]
    fn test_independent_deposits() {
        let f = Fixture::new();
        let (short, _) = f.engine.create_deposit(ALICE, qnt(10), BOB, 1).unwrap();
        let (long, _) = f.engine.create_deposit(ALICE, qnt(20), BOB, 60).unwrap();
        assert_ne!(short, long);

        f.clock.advance(MS_PER_MINUTE);
        assert!(f.engine.withdraw_by_recipient(BOB, short).is_ok());
        assert!(matches!(
            f.engine.withdraw_by_recipient(BOB, long),
            Err(ValueLockError::TooEarly { .. })
        ));

        assert_eq!(f.ledger.balance_of(&BOB, &qnt_asset()), 10);
        assert_eq!(f.ledger.in_custody(&qnt_asset()), 20);
        assert_eq!(f.engine.stats().active_deposits, 1);
    }

    /// A third party can neither reclaim nor claim.
    #[test]
    fn test_third_party_locked_out() {
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(10), BOB, 1).unwrap();
        f.clock.advance(MS_PER_MINUTE);

        assert_eq!(
            f.engine.withdraw_by_depositor(MALLORY, id),
            Err(ValueLockError::Unauthorized { caller: MALLORY })
        );
        assert_eq!(
            f.engine.withdraw_by_recipient(MALLORY, id),
            Err(ValueLockError::Unauthorized { caller: MALLORY })
        );
        assert!(f.engine.get_info(id).is_ok());
    }

    /// Events appear in commit order and match the returned values.
    #[test]
    fn test_event_log_matches_results() {
        let f = Fixture::new();
        let (a, created_a) = f.engine.create_deposit(ALICE, qnt(1), BOB, 1).unwrap();
        let (b, created_b) = f.engine.create_deposit(BOB, qnt(2), ALICE, 1).unwrap();
        let (_, withdrawn_b) = f.engine.withdraw_by_depositor(BOB, b).unwrap();

        assert_eq!(
            f.log.events(),
            vec![
                LockEvent::Created(created_a),
                LockEvent::Created(created_b),
                LockEvent::Withdrawn(withdrawn_b),
            ]
        );
        assert_eq!(f.clock.now_ms(), T0);
    }

    /// Failed operations never publish.
    #[test]
    fn test_rejections_publish_nothing() {
        let f = Fixture::new();
        let _ = f.engine.create_deposit(ALICE, qnt(0), BOB, 1);
        let _ = f.engine.create_deposit(ALICE, qnt(1), ALICE, 1);
        let (id, _) = f.engine.create_deposit(ALICE, qnt(1), BOB, 1).unwrap();
        let _ = f.engine.withdraw_by_recipient(BOB, id);
        let _ = f.engine.withdraw_by_depositor(BOB, id);

        assert_eq!(f.log.len(), 1);
        assert_eq!(f.engine.stats().rejected_operations, 4);
    }

    // =============================================================================
    // TELEMETRY
    // =============================================================================

    /// Engine operations show up in the exported metrics.
    #[test]
    fn test_metrics_exported() {
        lock_telemetry::register_metrics().unwrap();
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(1), BOB, 1).unwrap();
        let _ = f.engine.withdraw_by_recipient(BOB, id);
        f.engine.withdraw_by_depositor(ALICE, id).unwrap();

        let text = lock_telemetry::gather_metrics().unwrap();
        assert!(text.contains("vl_deposits_created_total"));
        assert!(text.contains("vl_withdrawals_total"));
        assert!(text.contains("vl_operations_rejected_total"));
        assert!(text.contains("TOO_EARLY"));
    }
}
