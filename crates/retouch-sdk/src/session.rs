use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info};

use retouch_descriptor::{derive, DeliveryConfig, RequestDescriptor, ASPECT_RATIO_FIELD};
use retouch_gate::CreditGate;
use retouch_ledger::{CreditLedger, LedgerError};
use retouch_registry::TransformationTypeRegistry;
use retouch_stager::{CommitReceipt, CommitTicket, ConfigStager, PendingUpdate};
use retouch_types::{
    AspectRatio, ImageAttributes, ImageId, TransformationConfig, TransformationType, UserId,
};

use crate::engine::Ports;
use crate::error::{SdkError, SdkResult};
use crate::repository::{ImageRecord, StoredImage};

/// Whether a session creates a new image or edits a persisted one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditMode {
    Add,
    Update(ImageId),
}

/// An apply whose ledger debit has not been performed yet.
///
/// Produced by [`ImageEditSession::begin_apply`]; run [`debit`](Self::debit)
/// without holding the session, then hand both back to
/// [`ImageEditSession::complete_apply`].
pub struct ApplyTicket {
    user: UserId,
    commit: CommitTicket,
    ledger: Arc<dyn CreditLedger>,
}

impl ApplyTicket {
    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn fee(&self) -> i64 {
        self.commit.fee()
    }

    pub async fn debit(&self) -> Result<i64, LedgerError> {
        self.ledger.debit(&self.user, self.commit.debit_amount()).await
    }
}

/// One user's editing session for a single image and transformation type.
///
/// Wraps a [`ConfigStager`] with the image being edited and the external
/// ports needed to apply and persist edits.
pub struct ImageEditSession {
    ty: TransformationType,
    mode: EditMode,
    title: String,
    image: Option<ImageAttributes>,
    stager: ConfigStager,
    gate: CreditGate,
    delivery: DeliveryConfig,
    ports: Ports,
}

impl ImageEditSession {
    pub(crate) fn new(
        ty: TransformationType,
        registry: Arc<TransformationTypeRegistry>,
        delivery: DeliveryConfig,
        ports: Ports,
    ) -> Self {
        Self {
            ty,
            mode: EditMode::Add,
            title: String::new(),
            image: None,
            stager: ConfigStager::new(registry),
            gate: CreditGate::new(),
            delivery,
            ports,
        }
    }

    pub(crate) fn resume(
        stored: StoredImage,
        registry: Arc<TransformationTypeRegistry>,
        delivery: DeliveryConfig,
        ports: Ports,
    ) -> Self {
        let record = stored.record;
        Self {
            ty: record.transformation_type,
            mode: EditMode::Update(stored.id),
            title: record.title,
            image: Some(record.attributes),
            stager: ConfigStager::with_committed(registry, record.config),
            gate: CreditGate::new(),
            delivery,
            ports,
        }
    }

    pub(crate) fn with_stager(mut self, f: impl FnOnce(ConfigStager) -> ConfigStager) -> Self {
        self.stager = f(self.stager);
        self
    }

    pub fn transformation_type(&self) -> TransformationType {
        self.ty
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn image(&self) -> Option<&ImageAttributes> {
        self.image.as_ref()
    }

    // ---- Staging ----

    /// Stage an edit; it reaches the pending delta after the debounce window.
    pub fn stage(&mut self, type_key: &str, field: &str, value: impl Into<Value>) -> SdkResult<()> {
        self.stage_at(type_key, field, value, Instant::now())
    }

    pub fn stage_at(
        &mut self,
        type_key: &str,
        field: &str,
        value: impl Into<Value>,
        now: Instant,
    ) -> SdkResult<()> {
        Ok(self.stager.stage_at(type_key, field, value, now)?)
    }

    pub fn poll_at(&mut self, now: Instant) -> Vec<PendingUpdate> {
        self.stager.poll_at(now)
    }

    pub fn flush(&mut self) -> Vec<PendingUpdate> {
        self.stager.flush()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.stager.next_deadline()
    }

    pub fn discard(&mut self) {
        self.stager.discard();
    }

    pub fn is_dirty(&self) -> bool {
        self.stager.is_dirty()
    }

    pub fn current_config(&self) -> &TransformationConfig {
        self.stager.current_config()
    }

    pub fn current_pending(&self) -> Option<&TransformationConfig> {
        self.stager.current_pending()
    }

    // ---- Image selection ----

    /// Attach the uploaded image. Types that need no parameters have their
    /// defaults staged at once, so the session is immediately applicable.
    pub fn set_image(&mut self, attrs: ImageAttributes) {
        debug!(public_id = %attrs.public_id, ty = %self.ty, "image attached");
        self.image = Some(attrs);
        if self.ty.is_auto_seeded() {
            self.stager.seed_defaults(self.ty);
        }
    }

    /// Select an aspect-ratio preset: resizes the target and stages the
    /// fill defaults with the chosen ratio.
    pub fn select_aspect_ratio(&mut self, key: &str) -> SdkResult<AspectRatio> {
        let ratio = AspectRatio::from_key(key)?;
        if let Some(attrs) = self.image.as_mut() {
            attrs.apply_aspect_ratio(&ratio);
        }
        let mut params = self.stager.registry().defaults(TransformationType::Fill);
        params.insert(ASPECT_RATIO_FIELD.to_string(), Value::from(ratio.key));
        self.stager.seed(TransformationType::Fill, params);
        info!(ratio = ratio.key, width = ratio.width, height = ratio.height, "aspect ratio selected");
        Ok(ratio)
    }

    // ---- Credits ----

    /// Credit cost of applying this session's transformation.
    pub fn fee(&self) -> i64 {
        self.stager.registry().fee(self.ty)
    }

    /// Whether `balance` is too low to apply, so the caller can prompt for
    /// a top-up before attempting.
    ///
    /// Uses the fee the next commit would actually charge when edits are
    /// pending, and this session's own fee otherwise.
    pub fn needs_credits(&self, balance: i64) -> bool {
        let fee = self.stager.pending_fee().unwrap_or_else(|| self.fee());
        !self.gate.can_afford(balance, fee)
    }

    /// Balance of the signed-in user.
    pub async fn balance(&self) -> SdkResult<i64> {
        let user = self.ports.auth.resolve().await?;
        Ok(self.ports.ledger.get_balance(&user).await?)
    }

    pub fn is_committing(&self) -> bool {
        self.stager.is_committing()
    }

    pub(crate) fn ports(&self) -> &Ports {
        &self.ports
    }

    // ---- Apply ----

    /// Commit the pending delta: resolve the user, read their balance, gate,
    /// merge, and debit.
    ///
    /// On `InsufficientCredit` the pending edits stay staged. On a failed
    /// debit they are restored and the committed configuration is
    /// unchanged.
    pub async fn apply(&mut self) -> SdkResult<CommitReceipt> {
        let user = self.ports.auth.resolve().await?;
        let balance = self.ports.ledger.get_balance(&user).await?;
        let ticket = self.begin_apply(user, balance)?;
        let debit = ticket.debit().await;
        self.complete_apply(ticket, debit)
    }

    /// First half of [`apply`](Self::apply) for callers that must not hold
    /// the session while the debit is outstanding: gate, merge, and take
    /// the pending snapshot. Edits staged afterwards form the next delta.
    pub fn begin_apply(&mut self, user: UserId, balance: i64) -> SdkResult<ApplyTicket> {
        let commit = self.stager.begin_commit(balance)?;
        Ok(ApplyTicket {
            user,
            commit,
            ledger: self.ports.ledger.clone(),
        })
    }

    /// Second half of [`apply`](Self::apply): publish or roll back.
    pub fn complete_apply(
        &mut self,
        ticket: ApplyTicket,
        debit: Result<i64, LedgerError>,
    ) -> SdkResult<CommitReceipt> {
        let ApplyTicket { user, commit, .. } = ticket;
        let receipt = self.stager.complete_commit(commit, debit)?;
        info!(
            user = %user,
            ty = %self.ty,
            fee = receipt.fee,
            balance_after = receipt.balance_after,
            "transformation applied"
        );
        Ok(receipt)
    }

    // ---- Persistence ----

    /// Descriptor of the committed configuration for the attached image.
    pub fn descriptor(&self) -> SdkResult<RequestDescriptor> {
        let attrs = self.image.as_ref().ok_or(SdkError::NoImage)?;
        Ok(derive(attrs, self.stager.current_config())?)
    }

    /// Delivery URL of the committed configuration.
    pub fn transformation_url(&self) -> SdkResult<String> {
        Ok(self.descriptor()?.to_url(&self.delivery))
    }

    /// The record [`save`](Self::save) would persist.
    pub fn record(&self) -> SdkResult<ImageRecord> {
        let attrs = self.image.as_ref().ok_or(SdkError::NoImage)?;
        let committed = self.stager.current_config();
        let descriptor = derive(attrs, committed)?;
        Ok(ImageRecord {
            title: self.title.clone(),
            transformation_type: self.ty,
            attributes: attrs.clone(),
            config: committed.clone(),
            transformation_url: descriptor.to_url(&self.delivery),
            descriptor,
            aspect_ratio: attrs.aspect_ratio.clone(),
            prompt: self.committed_text("prompt"),
            color: self.committed_text("color"),
        })
    }

    /// Persist the committed configuration.
    ///
    /// The first save of an add session creates the image; later saves, and
    /// every save of an update session, replace it. Refused while edits are
    /// pending, since those would not be part of what is saved.
    pub async fn save(&mut self) -> SdkResult<StoredImage> {
        if self.is_dirty() {
            return Err(SdkError::UnappliedEdits);
        }
        if self.title.trim().is_empty() {
            return Err(SdkError::MissingTitle);
        }
        let user = self.ports.auth.resolve().await?;
        let record = self.record()?;

        let stored = match self.mode {
            EditMode::Add => self.ports.images.add_image(&user, record).await?,
            EditMode::Update(id) => self.ports.images.update_image(&user, id, record).await?,
        };
        self.mode = EditMode::Update(stored.id);
        info!(image = %stored.id, user = %user, "image saved");
        Ok(stored)
    }

    fn committed_text(&self, field: &str) -> Option<String> {
        match self.stager.current_config().field(self.ty, field) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}
