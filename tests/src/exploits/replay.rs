//! # Replay Attacks
//!
//! Re-submitting a captured request envelope through the handler.

#[cfg(test)]
mod tests {
    use crate::fixtures::{qnt, qnt_asset, Fixture, ALICE, BOB, MALLORY, T0};
    use uuid::Uuid;
    use value_lock::{
        LockRequest, LockRequestEnvelope, LockResponse, LockResponseEnvelope, ValueLockHandler,
        MS_PER_MINUTE,
    };

    fn create_envelope(timestamp_ms: u64) -> LockRequestEnvelope {
        LockRequestEnvelope::new(
            ALICE,
            timestamp_ms,
            LockRequest::CreateDeposit {
                value: qnt(100),
                recipient: BOB,
                duration_minutes: 1,
            },
        )
    }

    /// A captured create replayed verbatim must not lock value twice.
    #[test]
    fn test_replayed_create() {
        let f = Fixture::new();
        let handler = ValueLockHandler::new(f.engine.clone(), f.clock.clone());
        let envelope = create_envelope(T0);

        assert!(handler.handle(envelope.clone()).is_ok());
        let replay = handler.handle(envelope);

        assert_eq!(replay.error_code(), Some("REPLAY_REJECTED"));
        assert_eq!(f.ledger.custody_count(), 1);
        assert_eq!(f.engine.stats().deposits_created, 1);
    }

    /// A replay with a fresh correlation id but the old nonce is still caught.
    #[test]
    fn test_replay_with_new_correlation_id() {
        let f = Fixture::new();
        let handler = ValueLockHandler::new(f.engine.clone(), f.clock.clone());
        let envelope = create_envelope(T0);
        assert!(handler.handle(envelope.clone()).is_ok());

        let mut replay = envelope;
        replay.correlation_id = Uuid::new_v4();
        assert_eq!(handler.handle(replay).error_code(), Some("REPLAY_REJECTED"));
    }

    /// Delayed past the freshness window, the envelope is refused as stale.
    #[test]
    fn test_delayed_replay() {
        let f = Fixture::new();
        let handler = ValueLockHandler::new(f.engine.clone(), f.clock.clone());
        let envelope = create_envelope(T0);
        assert!(handler.handle(envelope.clone()).is_ok());

        f.clock.advance(5 * MS_PER_MINUTE);
        assert_eq!(
            handler.handle(envelope).error_code(),
            Some("REPLAY_REJECTED")
        );
        assert_eq!(f.ledger.custody_count(), 1);
    }

    /// Stealing an id and claiming with the attacker's own envelope fails:
    /// the caller comes from the envelope, not the payload.
    #[test]
    fn test_stolen_id_claim() {
        let f = Fixture::new();
        let handler = ValueLockHandler::new(f.engine.clone(), f.clock.clone());
        let id = match handler.handle(create_envelope(T0)).result {
            Ok(LockResponse::Created { id, .. }) => id,
            other => panic!("unexpected {:?}", other),
        };

        f.clock.advance(MS_PER_MINUTE);
        let response = handler.handle(LockRequestEnvelope::new(
            MALLORY,
            T0 + MS_PER_MINUTE,
            LockRequest::WithdrawByRecipient { id },
        ));
        assert_eq!(response.error_code(), Some("UNAUTHORIZED"));
        assert_eq!(f.ledger.balance_of(&MALLORY, &qnt_asset()), 0);
    }

    /// JSON round trip through the handler, including a replay.
    #[test]
    fn test_json_replay() {
        let f = Fixture::new();
        let handler = ValueLockHandler::new(f.engine.clone(), f.clock.clone());
        let raw = serde_json::to_string(&create_envelope(T0)).unwrap();

        let first: LockResponseEnvelope =
            serde_json::from_str(&handler.handle_json(&raw).unwrap()).unwrap();
        let second: LockResponseEnvelope =
            serde_json::from_str(&handler.handle_json(&raw).unwrap()).unwrap();

        assert!(first.is_ok());
        assert_eq!(second.error_code(), Some("REPLAY_REJECTED"));
    }
}
