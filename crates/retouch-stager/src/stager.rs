use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use retouch_gate::{CreditGate, GateDecision};
use retouch_ledger::LedgerError;
use retouch_merge::{merge, merge_params, MergeEngine};
use retouch_registry::TransformationTypeRegistry;
use retouch_types::{ParamObject, TransformationConfig, TransformationType};

use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
use crate::error::{StagerError, StagerResult};

// ---------------------------------------------------------------------------
// Public records
// ---------------------------------------------------------------------------

/// Debounce key: one field of one transformation type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldKey {
    pub ty: TransformationType,
    pub field: String,
}

/// Notification that a debounced write landed in the pending delta.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingUpdate {
    pub ty: TransformationType,
    pub field: String,
    pub value: Value,
}

/// Handle for a commit whose ledger debit is outstanding.
///
/// Returned by [`ConfigStager::begin_commit`]; hand it back to
/// [`ConfigStager::complete_commit`] with the outcome of the debit.
#[derive(Debug, PartialEq, Eq)]
pub struct CommitTicket {
    id: u64,
    fee: i64,
}

impl CommitTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Fee gated for this commit.
    pub fn fee(&self) -> i64 {
        self.fee
    }

    /// Amount the ledger must debit.
    pub fn debit_amount(&self) -> u64 {
        self.fee.unsigned_abs()
    }
}

/// Result of a successful commit.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitReceipt {
    /// The newly committed configuration.
    pub committed: TransformationConfig,
    pub fee: i64,
    /// Balance reported by the ledger after the debit.
    pub balance_after: i64,
}

struct InFlight {
    id: u64,
    snapshot: TransformationConfig,
    merged: TransformationConfig,
}

// ---------------------------------------------------------------------------
// ConfigStager
// ---------------------------------------------------------------------------

/// Owns the committed configuration and pending delta of one editing session.
///
/// Commits are two-phase so the ledger debit can run without holding the
/// stager: [`begin_commit`](Self::begin_commit) gates, merges, and takes the
/// pending snapshot; [`complete_commit`](Self::complete_commit) publishes
/// the merge if the debit succeeded or restores the snapshot if it did not.
/// Edits staged in between land in a fresh pending delta and are never
/// folded into the outstanding commit.
pub struct ConfigStager {
    registry: Arc<TransformationTypeRegistry>,
    gate: CreditGate,
    committed: TransformationConfig,
    pending: Option<TransformationConfig>,
    debouncer: Debouncer<FieldKey, Value>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl ConfigStager {
    /// A stager with an empty committed configuration (the "add" flow).
    pub fn new(registry: Arc<TransformationTypeRegistry>) -> Self {
        Self::with_committed(registry, TransformationConfig::new())
    }

    /// A stager starting from a persisted configuration (the "update" flow).
    pub fn with_committed(
        registry: Arc<TransformationTypeRegistry>,
        committed: TransformationConfig,
    ) -> Self {
        Self {
            registry,
            gate: CreditGate::new(),
            committed,
            pending: None,
            debouncer: Debouncer::new(DEFAULT_DEBOUNCE_WINDOW),
            in_flight: None,
            next_ticket: 1,
        }
    }

    /// Replace the debounce window. Buffered writes are dropped.
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debouncer = Debouncer::new(window);
        self
    }

    pub fn registry(&self) -> &TransformationTypeRegistry {
        &self.registry
    }

    // ---- Staging ----

    /// Stage `value` under `type_key.field`, debounced against the wall clock.
    pub fn stage(&mut self, type_key: &str, field: &str, value: impl Into<Value>) -> StagerResult<()> {
        self.stage_at(type_key, field, value, Instant::now())
    }

    /// Stage `value` under `type_key.field` as of `now`.
    ///
    /// The write only reaches the pending delta once `poll_at` observes a
    /// full debounce window with no further writes to the same field.
    /// Unknown type keys fail synchronously and change nothing.
    pub fn stage_at(
        &mut self,
        type_key: &str,
        field: &str,
        value: impl Into<Value>,
        now: Instant,
    ) -> StagerResult<()> {
        let ty = self.registry.resolve(type_key)?;
        let key = FieldKey {
            ty,
            field: field.to_string(),
        };
        let superseded = self.debouncer.push(key, value.into(), now);
        debug!(ty = %ty, field, superseded, "edit buffered");
        Ok(())
    }

    /// Write every debounced edit whose quiescence period has elapsed into
    /// the pending delta, returning one notification per written field.
    pub fn poll_at(&mut self, now: Instant) -> Vec<PendingUpdate> {
        let fired = self.debouncer.poll(now);
        self.apply_fired(fired)
    }

    /// Write every buffered edit into the pending delta immediately.
    pub fn flush(&mut self) -> Vec<PendingUpdate> {
        let fired = self.debouncer.flush();
        self.apply_fired(fired)
    }

    /// Earliest instant at which `poll_at` has something to fire.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Whether edits are buffered but not yet written to the pending delta.
    pub fn has_buffered(&self) -> bool {
        !self.debouncer.is_empty()
    }

    /// Merge a whole parameter object into the pending delta, bypassing the
    /// debouncer. Used for defaults that are selected rather than typed.
    pub fn seed(&mut self, ty: TransformationType, params: ParamObject) {
        let pending = self.pending.get_or_insert_with(TransformationConfig::new);
        let merged = match pending.remove(ty) {
            Some(existing) => merge_params(existing, &params),
            None => params,
        };
        pending.insert(ty, merged);
        debug!(ty = %ty, "defaults seeded");
    }

    /// Seed the registry defaults of `ty`.
    pub fn seed_defaults(&mut self, ty: TransformationType) {
        let defaults = self.registry.defaults(ty);
        self.seed(ty, defaults);
    }

    fn apply_fired(&mut self, fired: Vec<(FieldKey, Value)>) -> Vec<PendingUpdate> {
        if fired.is_empty() {
            return Vec::new();
        }
        let pending = self.pending.get_or_insert_with(TransformationConfig::new);
        fired
            .into_iter()
            .map(|(key, value)| {
                pending.set_field(key.ty, key.field.clone(), value.clone());
                debug!(ty = %key.ty, field = %key.field, "pending edit written");
                PendingUpdate {
                    ty: key.ty,
                    field: key.field,
                    value,
                }
            })
            .collect()
    }

    // ---- Discard ----

    /// Drop the pending delta and every buffered edit.
    ///
    /// Buffered edits are cancelled outright, so no debounce deadline that
    /// passes afterwards can write into the pending delta again. An
    /// outstanding commit is unaffected.
    pub fn discard(&mut self) {
        let had_pending = self.pending.take().is_some();
        let cancelled = self.debouncer.cancel_all();
        info!(had_pending, cancelled, "pending edits discarded");
    }

    // ---- Commit ----

    /// Fee for committing the current pending delta.
    ///
    /// Flat: the largest per-type fee among the staged types, never scaled
    /// by how many types or fields changed.
    pub fn pending_fee(&self) -> Option<i64> {
        self.pending
            .as_ref()?
            .types()
            .map(|ty| self.registry.fee(ty))
            .max_by_key(|fee| fee.unsigned_abs())
    }

    /// First phase of a commit: gate, merge, and take the pending snapshot.
    ///
    /// On any error nothing changes. On success the pending delta is
    /// cleared and the merged result is held until
    /// [`complete_commit`](Self::complete_commit).
    pub fn begin_commit(&mut self, balance: i64) -> StagerResult<CommitTicket> {
        if self.in_flight.is_some() {
            return Err(StagerError::CommitInProgress);
        }
        if !self.is_dirty() {
            return Err(StagerError::NothingStaged);
        }
        let fee = self.pending_fee().ok_or(StagerError::NothingStaged)?;

        if let GateDecision::InsufficientCredit { balance, required } =
            self.gate.check(balance, fee)
        {
            warn!(balance, required, "commit blocked by credit gate");
            return Err(StagerError::InsufficientCredit { balance, required });
        }

        let merged = MergeEngine::new(&self.registry)
            .merge_validated(&self.committed, self.pending.as_ref())?;

        let snapshot = self.pending.take().unwrap_or_default();
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(InFlight {
            id,
            snapshot,
            merged,
        });
        info!(ticket = id, fee, "commit started");
        Ok(CommitTicket { id, fee })
    }

    /// Second phase of a commit: publish or roll back.
    ///
    /// With a successful debit the merged configuration becomes the
    /// committed one. With a failed debit the merge is dropped and the
    /// snapshot returns to the pending delta, underneath anything staged
    /// while the debit was outstanding.
    pub fn complete_commit(
        &mut self,
        ticket: CommitTicket,
        debit: Result<i64, LedgerError>,
    ) -> StagerResult<CommitReceipt> {
        let in_flight = self.take_in_flight(&ticket)?;
        match debit {
            Ok(balance_after) => {
                self.committed = in_flight.merged;
                info!(
                    ticket = ticket.id,
                    balance_after,
                    types = self.committed.len(),
                    "commit published"
                );
                Ok(CommitReceipt {
                    committed: self.committed.clone(),
                    fee: ticket.fee,
                    balance_after,
                })
            }
            Err(err) => {
                warn!(ticket = ticket.id, error = %err, "debit failed; commit rolled back");
                self.restore_snapshot(in_flight.snapshot);
                Err(StagerError::LedgerUnavailable(err))
            }
        }
    }

    /// Abandon an outstanding commit without a debit outcome, restoring its
    /// snapshot exactly as a failed debit would.
    pub fn abort_commit(&mut self, ticket: CommitTicket) -> StagerResult<()> {
        let in_flight = self.take_in_flight(&ticket)?;
        warn!(ticket = ticket.id, "commit aborted");
        self.restore_snapshot(in_flight.snapshot);
        Ok(())
    }

    /// Gate, merge, debit through `on_debit`, and publish.
    ///
    /// `on_debit` receives the amount to debit and resolves to the new
    /// balance. The stager is borrowed for the whole call; callers that
    /// need to keep staging while the debit is outstanding should drive
    /// [`begin_commit`](Self::begin_commit) and
    /// [`complete_commit`](Self::complete_commit) themselves.
    pub async fn commit<F, Fut>(&mut self, balance: i64, on_debit: F) -> StagerResult<CommitReceipt>
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = Result<i64, LedgerError>>,
    {
        let ticket = self.begin_commit(balance)?;
        let debit = on_debit(ticket.debit_amount()).await;
        self.complete_commit(ticket, debit)
    }

    fn take_in_flight(&mut self, ticket: &CommitTicket) -> StagerResult<InFlight> {
        match self.in_flight.take() {
            Some(in_flight) if in_flight.id == ticket.id => Ok(in_flight),
            other => {
                self.in_flight = other;
                Err(StagerError::StaleTicket(ticket.id))
            }
        }
    }

    fn restore_snapshot(&mut self, snapshot: TransformationConfig) {
        self.pending = Some(match self.pending.take() {
            Some(newer) => merge(&snapshot, Some(&newer)),
            None => snapshot,
        });
    }

    // ---- Queries ----

    /// True iff a pending delta exists and configures at least one type.
    pub fn is_dirty(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Whether a commit is waiting on its debit.
    pub fn is_committing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn current_config(&self) -> &TransformationConfig {
        &self.committed
    }

    pub fn current_pending(&self) -> Option<&TransformationConfig> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WINDOW: Duration = Duration::from_millis(1000);

    fn registry_with_fee(fee: i64) -> Arc<TransformationTypeRegistry> {
        Arc::new(TransformationTypeRegistry::standard().with_default_fee(fee))
    }

    fn config(value: Value) -> TransformationConfig {
        serde_json::from_value(value).unwrap()
    }

    /// Stage a write and let its debounce window elapse.
    fn stage_settled(stager: &mut ConfigStager, ty: &str, field: &str, value: Value) {
        let t0 = Instant::now();
        stager.stage_at(ty, field, value, t0).unwrap();
        stager.poll_at(t0 + WINDOW);
    }

    // -----------------------------------------------------------------------
    // Scenario A: stage, commit with enough credit
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn commit_merges_and_debits() {
        let mut stager = ConfigStager::new(registry_with_fee(10));
        stage_settled(&mut stager, "fill", "aspectRatio", json!("1:1"));

        let receipt = stager
            .commit(100, |amount| async move { Ok(100 - amount as i64) })
            .await
            .unwrap();

        assert_eq!(receipt.committed, config(json!({"fill": {"aspectRatio": "1:1"}})));
        assert_eq!(receipt.balance_after, 90);
        assert_eq!(receipt.fee, 10);
        assert_eq!(stager.current_config(), &receipt.committed);
        assert_eq!(stager.current_pending(), None);
        assert!(!stager.is_dirty());
    }

    // -----------------------------------------------------------------------
    // Scenario B: discard leaves the committed configuration alone
    // -----------------------------------------------------------------------
    #[test]
    fn discard_drops_pending_only() {
        let committed = config(json!({"recolor": {"color": "red"}}));
        let mut stager = ConfigStager::with_committed(registry_with_fee(1), committed.clone());
        stage_settled(&mut stager, "recolor", "prompt", json!("sky"));
        assert!(stager.is_dirty());

        stager.discard();
        assert_eq!(stager.current_config(), &committed);
        assert_eq!(stager.current_pending(), None);
    }

    // -----------------------------------------------------------------------
    // Scenario C: insufficient credit
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn insufficient_credit_changes_nothing_and_skips_debit() {
        let mut stager = ConfigStager::new(registry_with_fee(10));
        stage_settled(&mut stager, "fill", "aspectRatio", json!("1:1"));
        let pending_before = stager.current_pending().cloned();
        let committed_before = stager.current_config().clone();

        let mut debited = false;
        let err = stager
            .commit(5, |_| {
                debited = true;
                async { Ok(0) }
            })
            .await
            .unwrap_err();

        assert_eq!(err, StagerError::InsufficientCredit { balance: 5, required: 10 });
        assert!(!debited);
        assert_eq!(stager.current_pending().cloned(), pending_before);
        assert_eq!(stager.current_config(), &committed_before);
        assert!(!stager.is_committing());
    }

    // -----------------------------------------------------------------------
    // Scenario D: rapid edits collapse
    // -----------------------------------------------------------------------
    #[test]
    fn rapid_edits_to_one_field_collapse() {
        let t0 = Instant::now();
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stager.stage_at("remove", "to", "dog", t0).unwrap();
        assert!(stager.poll_at(t0 + Duration::from_millis(400)).is_empty());
        stager.stage_at("remove", "to", "cat", t0 + Duration::from_millis(500)).unwrap();

        // Nothing observable until the window after the last edit elapses.
        assert!(stager.poll_at(t0 + Duration::from_millis(1400)).is_empty());
        assert_eq!(stager.current_pending(), None);

        let updates = stager.poll_at(t0 + Duration::from_millis(1500));
        assert_eq!(
            updates,
            vec![PendingUpdate {
                ty: TransformationType::Remove,
                field: "to".into(),
                value: json!("cat"),
            }]
        );
        assert_eq!(
            stager.current_pending(),
            Some(&config(json!({"remove": {"to": "cat"}})))
        );
    }

    #[test]
    fn different_fields_do_not_block_each_other() {
        let t0 = Instant::now();
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stager.stage_at("recolor", "prompt", "car", t0).unwrap();
        stager
            .stage_at("recolor", "color", "red", t0 + Duration::from_millis(900))
            .unwrap();
        let first = stager.poll_at(t0 + WINDOW);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].field, "prompt");
        assert_eq!(stager.next_deadline(), Some(t0 + Duration::from_millis(1900)));
    }

    #[test]
    fn unknown_type_fails_without_touching_state() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        let err = stager.stage("sharpen", "amount", 3).unwrap_err();
        assert_eq!(err, StagerError::UnknownType("sharpen".into()));
        assert!(!stager.has_buffered());
        assert_eq!(stager.current_pending(), None);
    }

    // -----------------------------------------------------------------------
    // Discard cancels buffered edits
    // -----------------------------------------------------------------------
    #[test]
    fn discard_cancels_buffered_edits() {
        let t0 = Instant::now();
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stager.stage_at("remove", "prompt", "dog", t0).unwrap();
        stager.discard();
        assert!(stager.poll_at(t0 + WINDOW * 3).is_empty());
        assert_eq!(stager.current_pending(), None);

        // A new edit after the discard starts a fresh delta.
        stager.stage_at("remove", "prompt", "cat", t0 + WINDOW * 3).unwrap();
        stager.poll_at(t0 + WINDOW * 4);
        assert_eq!(
            stager.current_pending(),
            Some(&config(json!({"remove": {"prompt": "cat"}})))
        );
    }

    // -----------------------------------------------------------------------
    // Shape validation
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn invalid_config_aborts_before_debit() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stage_settled(&mut stager, "fill", "aspectRatio", json!(16));
        let pending_before = stager.current_pending().cloned();

        let mut debited = false;
        let err = stager
            .commit(100, |_| {
                debited = true;
                async { Ok(99) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StagerError::InvalidConfig(_)));
        assert!(!debited);
        assert_eq!(stager.current_pending().cloned(), pending_before);
        assert!(stager.current_config().is_empty());
    }

    // -----------------------------------------------------------------------
    // Ledger failure rolls back
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn ledger_failure_restores_pending() {
        let committed = config(json!({"recolor": {"color": "red"}}));
        let mut stager = ConfigStager::with_committed(registry_with_fee(1), committed.clone());
        stage_settled(&mut stager, "recolor", "prompt", json!("sky"));
        let pending_before = stager.current_pending().cloned();

        let err = stager
            .commit(20, |_| async { Err(LedgerError::Unavailable("timeout".into())) })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StagerError::LedgerUnavailable(LedgerError::Unavailable("timeout".into()))
        );
        assert_eq!(stager.current_config(), &committed);
        assert_eq!(stager.current_pending().cloned(), pending_before);
        assert!(!stager.is_committing());
    }

    // -----------------------------------------------------------------------
    // Two-phase commit
    // -----------------------------------------------------------------------
    #[test]
    fn edits_during_flight_wait_for_the_next_commit() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stage_settled(&mut stager, "recolor", "prompt", json!("car"));
        let ticket = stager.begin_commit(10).unwrap();
        assert!(stager.is_committing());
        assert_eq!(stager.current_pending(), None);

        stage_settled(&mut stager, "recolor", "color", json!("blue"));
        let receipt = stager.complete_commit(ticket, Ok(9)).unwrap();

        assert_eq!(receipt.committed, config(json!({"recolor": {"prompt": "car"}})));
        assert_eq!(
            stager.current_pending(),
            Some(&config(json!({"recolor": {"color": "blue"}})))
        );
    }

    #[test]
    fn second_commit_is_refused_while_one_is_outstanding() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stage_settled(&mut stager, "remove", "prompt", json!("dog"));
        let _ticket = stager.begin_commit(10).unwrap();
        stage_settled(&mut stager, "remove", "prompt", json!("cat"));
        assert_eq!(stager.begin_commit(10).unwrap_err(), StagerError::CommitInProgress);
    }

    #[test]
    fn rollback_keeps_newer_edits_on_top() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stage_settled(&mut stager, "recolor", "prompt", json!("car"));
        stage_settled(&mut stager, "recolor", "color", json!("red"));
        let ticket = stager.begin_commit(10).unwrap();

        stage_settled(&mut stager, "recolor", "color", json!("green"));
        let err = stager
            .complete_commit(ticket, Err(LedgerError::Unavailable("down".into())))
            .unwrap_err();
        assert!(matches!(err, StagerError::LedgerUnavailable(_)));
        assert_eq!(
            stager.current_pending(),
            Some(&config(json!({"recolor": {"prompt": "car", "color": "green"}})))
        );
        assert!(stager.current_config().is_empty());
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stage_settled(&mut stager, "remove", "prompt", json!("dog"));
        let ticket = stager.begin_commit(10).unwrap();
        stager.abort_commit(ticket).unwrap();

        let again = stager.begin_commit(10).unwrap();
        let forged = CommitTicket { id: again.id() + 1, fee: 1 };
        assert_eq!(
            stager.complete_commit(forged, Ok(0)).unwrap_err(),
            StagerError::StaleTicket(again.id() + 1)
        );
        assert!(stager.is_committing());
        stager.complete_commit(again, Ok(9)).unwrap();
        assert!(!stager.is_committing());
    }

    #[test]
    fn nothing_staged_is_refused() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        assert_eq!(stager.begin_commit(10).unwrap_err(), StagerError::NothingStaged);
        // Buffered but unfired edits are not part of a commit.
        stager.stage("remove", "prompt", "dog").unwrap();
        assert_eq!(stager.begin_commit(10).unwrap_err(), StagerError::NothingStaged);
    }

    // -----------------------------------------------------------------------
    // Seeding, flushing, fees
    // -----------------------------------------------------------------------
    #[test]
    fn seeding_defaults_marks_dirty_immediately() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stager.seed_defaults(TransformationType::Restore);
        assert!(stager.is_dirty());
        assert_eq!(
            stager.current_pending(),
            Some(&config(json!({"restore": {"restore": true}})))
        );
    }

    #[test]
    fn seeding_preserves_fields_already_pending() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stage_settled(&mut stager, "fill", "aspectRatio", json!("3:4"));
        stager.seed_defaults(TransformationType::Fill);
        assert_eq!(
            stager.current_pending(),
            Some(&config(json!({"fill": {"aspectRatio": "3:4", "fillBackground": true}})))
        );
    }

    #[test]
    fn flush_writes_buffered_edits_now() {
        let mut stager = ConfigStager::new(registry_with_fee(1));
        stager.stage("remove", "prompt", "dog").unwrap();
        assert!(!stager.is_dirty());
        let updates = stager.flush();
        assert_eq!(updates.len(), 1);
        assert!(stager.is_dirty());
        assert!(!stager.has_buffered());
    }

    #[test]
    fn fee_is_flat_across_types() {
        let registry = Arc::new(
            TransformationTypeRegistry::standard()
                .with_default_fee(2)
                .with_fee(TransformationType::Fill, -5),
        );
        let mut stager = ConfigStager::new(registry);
        assert_eq!(stager.pending_fee(), None);
        stage_settled(&mut stager, "recolor", "prompt", json!("car"));
        stage_settled(&mut stager, "remove", "prompt", json!("dog"));
        assert_eq!(stager.pending_fee(), Some(2));
        stage_settled(&mut stager, "fill", "aspectRatio", json!("1:1"));
        assert_eq!(stager.pending_fee(), Some(-5));
    }
}
