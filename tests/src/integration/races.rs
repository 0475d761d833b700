//! # Concurrency Races
//!
//! Many threads share one engine. The store's version check must let
//! exactly one withdrawal per deposit commit no matter how calls interleave.

#[cfg(test)]
mod tests {
    use crate::fixtures::{qnt, qnt_asset, Fixture, ALICE, BOB};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use value_lock::{
        Address, DepositId, DepositStore, ValueLockApi, ValueLockError, WithdrawnBy,
        MS_PER_MINUTE,
    };

    const ROUNDS: usize = 50;

    fn is_loser(err: &ValueLockError) -> bool {
        matches!(
            err,
            ValueLockError::NotFound(_) | ValueLockError::VersionConflict { .. }
        )
    }

    /// Depositor and recipient race at the unlock boundary.
    #[test]
    fn test_depositor_recipient_race_single_winner() {
        for _ in 0..ROUNDS {
            let f = Fixture::new();
            let (id, _) = f.engine.create_deposit(ALICE, qnt(100), BOB, 1).unwrap();
            f.clock.advance(MS_PER_MINUTE);

            let barrier = Arc::new(Barrier::new(2));
            let handles: Vec<_> = [WithdrawnBy::Depositor, WithdrawnBy::Recipient]
                .into_iter()
                .map(|by| {
                    let engine = f.engine.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        match by {
                            WithdrawnBy::Depositor => engine.withdraw_by_depositor(ALICE, id),
                            WithdrawnBy::Recipient => engine.withdraw_by_recipient(BOB, id),
                        }
                    })
                })
                .collect();

            let results: Vec<_> = handles
                .into_iter()
                .map(|h| h.join().expect("thread panicked"))
                .collect();

            let winners = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(winners, 1);
            for result in &results {
                if let Err(e) = result {
                    assert!(is_loser(e), "unexpected error {e:?}");
                }
            }

            let paid = f.ledger.balance_of(&ALICE, &qnt_asset())
                + f.ledger.balance_of(&BOB, &qnt_asset());
            assert_eq!(paid, 100);
            assert_eq!(f.ledger.in_custody(&qnt_asset()), 0);
            assert_eq!(f.log.withdrawn().len(), 1);
        }
    }

    /// The same party hammering withdraw from many threads is paid once.
    #[test]
    fn test_repeated_withdraw_single_payout() {
        const THREADS: usize = 8;
        let f = Fixture::new();
        let (id, _) = f.engine.create_deposit(ALICE, qnt(500), BOB, 1).unwrap();

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let engine = f.engine.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    engine.withdraw_by_depositor(ALICE, id)
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(|r| r.is_ok())
            .count();

        assert_eq!(winners, 1);
        assert_eq!(f.ledger.balance_of(&ALICE, &qnt_asset()), 500);
        assert_eq!(f.engine.stats().depositor_withdrawals, 1);
    }

    /// Concurrent creations all get distinct ids and all value is custodied.
    #[test]
    fn test_concurrent_creations_distinct_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 25;
        let f = Fixture::new();

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let engine = f.engine.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    (0..PER_THREAD)
                        .map(|_| {
                            engine
                                .create_deposit(ALICE, qnt(2), BOB, 5)
                                .map(|(id, _)| id)
                        })
                        .collect::<Result<Vec<DepositId>, _>>()
                })
            })
            .collect();

        let mut ids: Vec<DepositId> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread panicked").expect("create failed"))
            .collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), THREADS * PER_THREAD);
        assert_eq!(
            f.ledger.in_custody(&qnt_asset()),
            (THREADS * PER_THREAD * 2) as u128
        );
        assert_eq!(f.engine.stats().active_deposits, (THREADS * PER_THREAD) as u64);
    }

    /// Mixed traffic over many deposits conserves value.
    #[test]
    fn test_mixed_traffic_conserves_value() {
        const DEPOSITS: usize = 40;
        let f = Fixture::new();
        let ids: Vec<DepositId> = (0..DEPOSITS)
            .map(|_| f.engine.create_deposit(ALICE, qnt(10), BOB, 1).unwrap().0)
            .collect();
        f.clock.advance(MS_PER_MINUTE);

        let parties: [(Address, WithdrawnBy); 2] =
            [(ALICE, WithdrawnBy::Depositor), (BOB, WithdrawnBy::Recipient)];
        let barrier = Arc::new(Barrier::new(parties.len() * 2));
        let handles: Vec<_> = parties
            .into_iter()
            .chain(parties)
            .map(|(caller, by)| {
                let engine = f.engine.clone();
                let barrier = barrier.clone();
                let ids = ids.clone();
                thread::spawn(move || {
                    barrier.wait();
                    ids.iter()
                        .filter(|id| {
                            let result = match by {
                                WithdrawnBy::Depositor => engine.withdraw_by_depositor(caller, **id),
                                WithdrawnBy::Recipient => engine.withdraw_by_recipient(caller, **id),
                            };
                            result.is_ok()
                        })
                        .count()
                })
            })
            .collect();

        let total_wins: usize = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .sum();

        assert_eq!(total_wins, DEPOSITS);
        let paid = f.ledger.balance_of(&ALICE, &qnt_asset())
            + f.ledger.balance_of(&BOB, &qnt_asset());
        assert_eq!(paid, (DEPOSITS * 10) as u128);
        assert_eq!(f.store.active_count(), 0);
    }
}
