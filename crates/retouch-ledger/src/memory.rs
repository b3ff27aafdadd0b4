use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use retouch_types::UserId;

use crate::error::LedgerError;
use crate::traits::CreditLedger;

/// Balance a freshly opened account starts with.
pub const DEFAULT_STARTING_BALANCE: i64 = 20;

/// Direction of a balance movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Debit,
    Credit,
}

/// One recorded balance movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub kind: EntryKind,
    pub amount: u64,
    pub balance_after: i64,
    pub recorded_at: DateTime<Utc>,
}

/// In-memory credit ledger for tests, local demos, and embedding.
pub struct InMemoryCreditLedger {
    starting_balance: i64,
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<UserId, i64>,
    entries: HashMap<UserId, Vec<LedgerEntry>>,
}

impl InMemoryCreditLedger {
    pub fn new(starting_balance: i64) -> Self {
        Self {
            starting_balance,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// Open an account for `user` at the starting balance.
    pub fn open_account(&self, user: &UserId) -> Result<i64, LedgerError> {
        let mut state = self.write()?;
        if state.balances.contains_key(user) {
            return Err(LedgerError::AccountExists(user.clone()));
        }
        state.balances.insert(user.clone(), self.starting_balance);
        info!(user = %user, balance = self.starting_balance, "credit account opened");
        Ok(self.starting_balance)
    }

    /// Overwrite the balance of `user`, opening the account if needed.
    pub fn set_balance(&self, user: &UserId, balance: i64) -> Result<(), LedgerError> {
        self.write()?.balances.insert(user.clone(), balance);
        Ok(())
    }

    /// Every movement recorded for `user`, oldest first.
    pub fn entries(&self, user: &UserId) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.read()?.entries.get(user).cloned().unwrap_or_default())
    }

    fn apply(&self, user: &UserId, kind: EntryKind, amount: u64) -> Result<i64, LedgerError> {
        let mut state = self.write()?;
        let balance = state
            .balances
            .get_mut(user)
            .ok_or_else(|| LedgerError::AccountNotFound(user.clone()))?;

        let delta = i64::try_from(amount).unwrap_or(i64::MAX);
        *balance = match kind {
            EntryKind::Debit => balance.saturating_sub(delta),
            EntryKind::Credit => balance.saturating_add(delta),
        };
        let balance_after = *balance;

        state.entries.entry(user.clone()).or_default().push(LedgerEntry {
            kind,
            amount,
            balance_after,
            recorded_at: Utc::now(),
        });
        debug!(user = %user, ?kind, amount, balance_after, "ledger entry recorded");
        Ok(balance_after)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Unavailable("ledger read lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Unavailable("ledger write lock poisoned".into()))
    }
}

impl Default for InMemoryCreditLedger {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_BALANCE)
    }
}

#[async_trait]
impl CreditLedger for InMemoryCreditLedger {
    async fn get_balance(&self, user: &UserId) -> Result<i64, LedgerError> {
        self.read()?
            .balances
            .get(user)
            .copied()
            .ok_or_else(|| LedgerError::AccountNotFound(user.clone()))
    }

    async fn debit(&self, user: &UserId, amount: u64) -> Result<i64, LedgerError> {
        self.apply(user, EntryKind::Debit, amount)
    }

    async fn credit(&self, user: &UserId, amount: u64) -> Result<i64, LedgerError> {
        self.apply(user, EntryKind::Credit, amount)
    }
}
