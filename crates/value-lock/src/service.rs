//! # Value Lock Engine
//!
//! The engine owns no storage of its own. It validates requests, moves value
//! through the ledger port, persists records through the store port and
//! reports changes through the event sink.
//!
//! ## Commit model
//!
//! - Creation: custody, insert, publish. If the insert fails the custodied
//!   value is handed straight back to the depositor.
//! - Withdrawal: read the record and its version, check the caller and the
//!   unlock gate, then `finalize` against that version. Release and publish
//!   run inside `finalize`, so a failed release leaves the record live and
//!   a concurrent withdrawal that lost the race sees `VersionConflict`.

use crate::config::{ConfigError, ValueLockConfig};
use crate::domain::{
    compute_unlock_time, format_address, invariant_authorized, invariant_record_consistent,
    invariant_unlocked, validate_creation, Address, AssetId, CustodyHandle, Deposit, DepositId,
    DepositParams, DepositSnapshot, LockState, Transfer, Value, ValueLockError, WithdrawnBy,
};
use crate::events::{DepositCreated, DepositWithdrawn, LockEvent};
use crate::ports::inbound::ValueLockApi;
use crate::ports::outbound::{ClockSource, DepositStore, EventSink, LedgerAdapter};
use lock_telemetry::metrics::{
    OperationTimer, ACTIVE_DEPOSITS, DEPOSITS_CREATED, LOCK_DURATION_MINUTES,
    OPERATIONS_REJECTED, WITHDRAWALS,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, instrument, warn};

/// Statistics for the engine.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EngineStats {
    /// Deposits successfully created.
    pub deposits_created: u64,
    /// Reclaims by depositors.
    pub depositor_withdrawals: u64,
    /// Claims by recipients.
    pub recipient_withdrawals: u64,
    /// Create and withdraw calls that returned an error.
    pub rejected_operations: u64,
    /// Deposits currently live.
    pub active_deposits: u64,
    /// Value currently locked, per asset. Saturates at `u128::MAX`.
    pub value_locked: BTreeMap<AssetId, u128>,
}

impl EngineStats {
    fn record_created(&mut self, value: &Value) {
        self.deposits_created += 1;
        self.active_deposits += 1;
        let locked = self.value_locked.entry(value.asset.clone()).or_insert(0);
        *locked = locked.saturating_add(value.amount);
    }

    fn record_withdrawn(&mut self, value: &Value, by: WithdrawnBy) {
        match by {
            WithdrawnBy::Depositor => self.depositor_withdrawals += 1,
            WithdrawnBy::Recipient => self.recipient_withdrawals += 1,
        }
        self.active_deposits = self.active_deposits.saturating_sub(1);
        if let Some(locked) = self.value_locked.get_mut(&value.asset) {
            *locked = locked.saturating_sub(value.amount);
            if *locked == 0 {
                self.value_locked.remove(&value.asset);
            }
        }
    }
}

/// Two-party time-locked escrow engine.
///
/// Generic over its ports so production and tests wire different adapters
/// without dynamic dispatch. Shareable across threads behind an `Arc`.
pub struct ValueLockEngine<C, L, E, S>
where
    C: ClockSource,
    L: LedgerAdapter,
    E: EventSink,
    S: DepositStore,
{
    config: ValueLockConfig,
    clock: C,
    ledger: L,
    sink: E,
    store: S,
    /// Disambiguates ids of deposits created in the same millisecond.
    sequence: AtomicU64,
    stats: RwLock<EngineStats>,
}

impl<C, L, E, S> ValueLockEngine<C, L, E, S>
where
    C: ClockSource,
    L: LedgerAdapter,
    E: EventSink,
    S: DepositStore,
{
    /// Create an engine with the default configuration.
    pub fn new(clock: C, ledger: L, sink: E, store: S) -> Self {
        Self {
            config: ValueLockConfig::default(),
            clock,
            ledger,
            sink,
            store,
            sequence: AtomicU64::new(0),
            stats: RwLock::new(EngineStats::default()),
        }
    }

    /// Create an engine with a validated configuration.
    pub fn with_config(
        config: ValueLockConfig,
        clock: C,
        ledger: L,
        sink: E,
        store: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            service = %config.service_name,
            max_duration_minutes = config.max_duration_minutes,
            "Value lock engine configured"
        );
        Ok(Self {
            config,
            ..Self::new(clock, ledger, sink, store)
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ValueLockConfig {
        &self.config
    }

    /// Current statistics.
    pub fn stats(&self) -> EngineStats {
        self.stats.read().clone()
    }

    /// Clock port.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Ledger port.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Event sink port.
    pub fn sink(&self) -> &E {
        &self.sink
    }

    /// Store port.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lifecycle state of a deposit, including consumed ones.
    pub fn lifecycle_state(&self, id: &DepositId) -> Option<LockState> {
        self.store.state(id)
    }

    fn next_id(&self, depositor: &Address, recipient: &Address, now: u64) -> DepositId {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        DepositId::derive(depositor, recipient, now, sequence)
    }

    fn reject(&self, operation: &'static str, err: ValueLockError) -> ValueLockError {
        warn!(operation, code = err.code(), error = %err, "Operation rejected");
        OPERATIONS_REJECTED
            .with_label_values(&[operation, err.code()])
            .inc();
        self.stats.write().rejected_operations += 1;
        err
    }

    /// Hand custodied value back after a creation that could not be stored.
    fn return_custody(&self, handle: CustodyHandle, depositor: Address) {
        if let Err(e) = self.ledger.release(handle, depositor) {
            error!(
                handle = handle.0,
                depositor = %format_address(&depositor),
                error = %e,
                "Failed to return custody after aborted creation"
            );
        }
    }

    fn try_create(
        &self,
        caller: Address,
        value: Value,
        recipient: Address,
        duration_minutes: u64,
    ) -> Result<(DepositId, DepositCreated), ValueLockError> {
        let duration_ms = validate_creation(
            &caller,
            &recipient,
            &value,
            duration_minutes,
            self.config.max_duration_minutes,
        )?;
        let now = self.clock.now_ms();
        compute_unlock_time(now, duration_ms)?;

        let id = self.next_id(&caller, &recipient, now);
        let custody = self.ledger.custody(value.clone())?;

        let deposit = match Deposit::new(DepositParams {
            id,
            value,
            custody,
            depositor: caller,
            recipient,
            start_time: now,
            duration_ms,
        }) {
            Ok(deposit) => deposit,
            Err(e) => {
                self.return_custody(custody, caller);
                return Err(e);
            }
        };
        debug_assert!(invariant_record_consistent(&deposit));

        let event = DepositCreated::from(&deposit);
        let locked_value = deposit.locked_value.clone();
        if let Err(e) = self.store.insert(deposit) {
            self.return_custody(custody, caller);
            return Err(e);
        }
        self.sink.publish(LockEvent::Created(event.clone()));

        self.stats.write().record_created(&locked_value);
        DEPOSITS_CREATED.inc();
        ACTIVE_DEPOSITS.inc();
        LOCK_DURATION_MINUTES.observe(duration_minutes as f64);

        info!(
            deposit_id = %id,
            depositor = %format_address(&caller),
            recipient = %format_address(&recipient),
            asset = %locked_value.asset,
            amount = %locked_value.amount,
            unlock_time = event.unlock_time,
            "Deposit created"
        );
        Ok((id, event))
    }

    fn try_withdraw(
        &self,
        caller: Address,
        id: DepositId,
        by: WithdrawnBy,
    ) -> Result<(Transfer, DepositWithdrawn), ValueLockError> {
        let now = self.clock.now_ms();
        let current = self.store.get(&id)?;
        invariant_authorized(&current.deposit, &caller, by)?;
        if by == WithdrawnBy::Recipient {
            invariant_unlocked(&current.deposit, now)?;
        }

        let event = DepositWithdrawn::new(&current.deposit, by, caller, now);
        let transfer = Transfer {
            destination: caller,
            value: current.deposit.locked_value.clone(),
        };

        self.store
            .finalize(&id, current.version, by.terminal_state(), |deposit| {
                self.ledger.release(deposit.custody, caller)?;
                self.sink.publish(LockEvent::Withdrawn(event.clone()));
                Ok(())
            })?;

        self.stats.write().record_withdrawn(&transfer.value, by);
        WITHDRAWALS.with_label_values(&[by.as_str()]).inc();
        ACTIVE_DEPOSITS.dec();

        info!(
            deposit_id = %id,
            withdrawn_by = by.as_str(),
            withdrawer = %format_address(&caller),
            amount = %transfer.value.amount,
            "Deposit withdrawn"
        );
        Ok((transfer, event))
    }

    fn withdraw(
        &self,
        operation: &'static str,
        caller: Address,
        id: DepositId,
        by: WithdrawnBy,
    ) -> Result<(Transfer, DepositWithdrawn), ValueLockError> {
        let _timer = OperationTimer::start(operation);
        self.try_withdraw(caller, id, by)
            .map_err(|e| self.reject(operation, e))
    }
}

impl<C, L, E, S> ValueLockApi for ValueLockEngine<C, L, E, S>
where
    C: ClockSource,
    L: LedgerAdapter,
    E: EventSink,
    S: DepositStore,
{
    #[instrument(skip(self, caller, value, recipient), fields(asset = %value.asset))]
    fn create_deposit(
        &self,
        caller: Address,
        value: Value,
        recipient: Address,
        duration_minutes: u64,
    ) -> Result<(DepositId, DepositCreated), ValueLockError> {
        let _timer = OperationTimer::start("create_deposit");
        self.try_create(caller, value, recipient, duration_minutes)
            .map_err(|e| self.reject("create_deposit", e))
    }

    #[instrument(skip(self, caller), fields(deposit_id = %id))]
    fn withdraw_by_depositor(
        &self,
        caller: Address,
        id: DepositId,
    ) -> Result<(Transfer, DepositWithdrawn), ValueLockError> {
        self.withdraw("withdraw_by_depositor", caller, id, WithdrawnBy::Depositor)
    }

    #[instrument(skip(self, caller), fields(deposit_id = %id))]
    fn withdraw_by_recipient(
        &self,
        caller: Address,
        id: DepositId,
    ) -> Result<(Transfer, DepositWithdrawn), ValueLockError> {
        self.withdraw("withdraw_by_recipient", caller, id, WithdrawnBy::Recipient)
    }

    fn get_info(&self, id: DepositId) -> Result<DepositSnapshot, ValueLockError> {
        let now = self.clock.now_ms();
        let record = self.store.get(&id)?;
        debug!(deposit_id = %id, now, "Deposit info queried");
        Ok(record.deposit.snapshot(now))
    }

    fn can_recipient_withdraw(&self, id: DepositId) -> Result<bool, ValueLockError> {
        let now = self.clock.now_ms();
        Ok(self.store.get(&id)?.deposit.is_unlocked(now))
    }

    fn time_until_unlock(&self, id: DepositId) -> Result<u64, ValueLockError> {
        let now = self.clock.now_ms();
        Ok(self.store.get(&id)?.deposit.time_until_unlock(now))
    }
}
