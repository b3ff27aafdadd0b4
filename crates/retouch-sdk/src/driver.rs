use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use retouch_stager::{CommitReceipt, PendingUpdate};

use crate::error::SdkResult;
use crate::session::ImageEditSession;

/// Runs a session's debouncer on the tokio clock.
///
/// A background task sleeps until the next debounce deadline, moves every
/// due edit into the pending delta, and forwards one [`PendingUpdate`] per
/// written field over a channel. The task stops when the receiver is
/// dropped or this handle is dropped.
pub struct DebouncedSession {
    session: Arc<Mutex<ImageEditSession>>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl DebouncedSession {
    pub fn spawn(
        session: ImageEditSession,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<PendingUpdate>) {
        let session = Arc::new(Mutex::new(session));
        let wake = Arc::new(Notify::new());
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(run(session.clone(), wake.clone(), tx));
        (
            Self {
                session,
                wake,
                task,
            },
            rx,
        )
    }

    /// Stage an edit as of the tokio clock's now.
    pub async fn stage(&self, type_key: &str, field: &str, value: impl Into<Value>) -> SdkResult<()> {
        let now = Instant::now().into_std();
        self.session
            .lock()
            .await
            .stage_at(type_key, field, value, now)?;
        self.wake.notify_one();
        Ok(())
    }

    /// Discard pending and buffered edits.
    pub async fn discard(&self) {
        self.session.lock().await.discard();
        self.wake.notify_one();
    }

    /// Apply the pending delta without holding the session across the
    /// ledger calls, so staging and the debounce task keep running while
    /// the debit is outstanding. Edits staged meanwhile form the next delta.
    pub async fn apply(&self) -> SdkResult<CommitReceipt> {
        let ports = self.session.lock().await.ports().clone();
        let user = ports.auth.resolve().await?;
        let balance = ports.ledger.get_balance(&user).await?;

        let ticket = self.session.lock().await.begin_apply(user, balance)?;
        let debit = ticket.debit().await;
        let receipt = self.session.lock().await.complete_apply(ticket, debit);
        // A rollback may have restored pending edits; re-arm the timer loop.
        self.wake.notify_one();
        receipt
    }

    /// The wrapped session, for saving and queries.
    pub fn session(&self) -> &Arc<Mutex<ImageEditSession>> {
        &self.session
    }
}

impl Drop for DebouncedSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    session: Arc<Mutex<ImageEditSession>>,
    wake: Arc<Notify>,
    tx: mpsc::Sender<PendingUpdate>,
) {
    loop {
        let (fired, deadline) = {
            let mut session = session.lock().await;
            let fired = session.poll_at(Instant::now().into_std());
            (fired, session.next_deadline())
        };

        for update in fired {
            if tx.send(update).await.is_err() {
                debug!("update receiver dropped; debounce driver stopping");
                return;
            }
        }

        let sleep = async {
            match deadline {
                Some(deadline) => sleep_until(Instant::from_std(deadline)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = sleep => {}
            _ = wake.notified() => {}
            _ = tx.closed() => {
                debug!("update receiver dropped; debounce driver stopping");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::auth::StaticAuth;
    use crate::config::EngineConfig;
    use crate::engine::{Engine, Ports};
    use crate::repository::InMemoryImageRepository;
    use async_trait::async_trait;
    use retouch_ledger::{CreditLedger, InMemoryCreditLedger, LedgerError};
    use retouch_types::{TransformationType, UserId};
    use serde_json::json;

    /// Ledger whose debits take five seconds to settle.
    struct SlowLedger;

    #[async_trait]
    impl CreditLedger for SlowLedger {
        async fn get_balance(&self, _user: &UserId) -> Result<i64, LedgerError> {
            Ok(20)
        }

        async fn debit(&self, _user: &UserId, amount: u64) -> Result<i64, LedgerError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(20 - amount as i64)
        }

        async fn credit(&self, _user: &UserId, amount: u64) -> Result<i64, LedgerError> {
            Ok(20 + amount as i64)
        }
    }

    fn session_with(ledger: Arc<dyn CreditLedger>) -> ImageEditSession {
        let ports = Ports::new(
            Arc::new(StaticAuth::new(UserId::new("alice").unwrap())),
            ledger,
            Arc::new(InMemoryImageRepository::new()),
        );
        Engine::new(EngineConfig::default(), ports)
            .unwrap()
            .new_session("remove")
            .unwrap()
    }

    fn session() -> ImageEditSession {
        session_with(Arc::new(InMemoryCreditLedger::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_arrive_once_after_quiescence() {
        let (driver, mut rx) = DebouncedSession::spawn(session(), 8);
        let start = Instant::now();

        driver.stage("remove", "to", "dog").await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());
        driver.stage("remove", "to", "cat").await.unwrap();

        let update = rx.recv().await.unwrap();
        assert_eq!(update.ty, TransformationType::Remove);
        assert_eq!(update.value, json!("cat"));
        assert!(Instant::now() - start >= Duration::from_millis(1400));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());

        let session = driver.session().lock().await;
        assert_eq!(
            session.current_pending().and_then(|p| p.field(TransformationType::Remove, "to")),
            Some(&json!("cat"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn discard_silences_buffered_edits() {
        let (driver, mut rx) = DebouncedSession::spawn(session(), 8);
        driver.stage("remove", "prompt", "dog").await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        driver.discard().await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(rx.try_recv().is_err());
        assert!(!driver.session().lock().await.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_type_is_rejected_synchronously() {
        let (driver, _rx) = DebouncedSession::spawn(session(), 8);
        assert!(driver.stage("sharpen", "amount", 2).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn staging_continues_while_a_debit_is_outstanding() {
        let (driver, mut rx) = DebouncedSession::spawn(session_with(Arc::new(SlowLedger)), 8);
        let driver = Arc::new(driver);

        driver.stage("remove", "prompt", "dog").await.unwrap();
        assert_eq!(rx.recv().await.unwrap().value, json!("dog"));

        let applying = tokio::spawn({
            let driver = driver.clone();
            async move { driver.apply().await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(driver.session().lock().await.is_committing());

        tokio::time::timeout(
            Duration::from_millis(500),
            driver.stage("remove", "prompt", "cat"),
        )
        .await
        .expect("stage waited on the outstanding debit")
        .unwrap();

        // The debounce task keeps firing during the debit, too.
        let update = rx.recv().await.unwrap();
        assert_eq!(update.value, json!("cat"));
        assert!(driver.session().lock().await.is_committing());

        let receipt = applying.await.unwrap().unwrap();
        assert_eq!(receipt.balance_after, 19);
        assert_eq!(
            receipt.committed.field(TransformationType::Remove, "prompt"),
            Some(&json!("dog"))
        );

        let session = driver.session().lock().await;
        assert!(!session.is_committing());
        assert_eq!(
            session.current_pending().and_then(|p| p.field(TransformationType::Remove, "prompt")),
            Some(&json!("cat"))
        );
    }
}
