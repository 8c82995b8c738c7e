//! Flat-file [`ExpenseRepository`] used by the command line tool.
//!
//! The whole collection lives in memory and is mirrored to a pretty-printed
//! JSON array after every mutation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    EngineError, Expense, ResultEngine,
    repository::{ExpenseRepository, ensure_active},
};

/// JSON file store.
///
/// Ids are assigned as the id of the *last* element plus one, so they are only
/// unique as long as records stay in append order.
///
/// A failed write is returned to the caller but the in-memory change is kept,
/// which means memory and disk can disagree until the next successful save.
///
/// There is no file locking: two processes working on the same file will
/// overwrite each other.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    expenses: Mutex<Vec<Expense>>,
}

impl JsonFileRepository {
    /// Load the store from `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> ResultEngine<Self> {
        let path = path.into();
        let expenses = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no expense file yet, starting empty");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            expenses: Mutex::new(expenses),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, expenses: &[Expense]) -> ResultEngine<()> {
        let data = serde_json::to_vec_pretty(expenses)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl ExpenseRepository for JsonFileRepository {
    async fn create(&self, expense: &mut Expense, cancel: &CancellationToken) -> ResultEngine<()> {
        ensure_active(cancel)?;

        let mut expenses = self.expenses.lock().await;
        expense.id = match expenses.last() {
            Some(last) => last
                .id
                .checked_add(1)
                .ok_or(EngineError::IdsExhausted(last.id))?,
            None => 1,
        };
        expenses.push(expense.clone());

        self.save(&expenses).await
    }

    async fn get_all(&self, cancel: &CancellationToken) -> ResultEngine<Vec<Expense>> {
        ensure_active(cancel)?;
        Ok(self.expenses.lock().await.clone())
    }

    async fn get_by_id(&self, id: i64, cancel: &CancellationToken) -> ResultEngine<Expense> {
        ensure_active(cancel)?;
        self.expenses
            .lock()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(EngineError::NotFound(id))
    }

    async fn delete(&self, id: i64, cancel: &CancellationToken) -> ResultEngine<()> {
        ensure_active(cancel)?;

        let mut expenses = self.expenses.lock().await;
        let index = expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(EngineError::NotFound(id))?;
        expenses.remove(index);

        self.save(&expenses).await
    }
}
