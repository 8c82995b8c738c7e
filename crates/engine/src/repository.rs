//! Storage contract for expenses.
//!
//! Any backend (SQL database, JSON file, ...) implements [`ExpenseRepository`]
//! to plug into the [`Engine`](crate::Engine). Every operation receives a
//! [`CancellationToken`] and must stop promptly once it fires.

use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{EngineError, Expense, ResultEngine};

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Store a new expense and write the generated id back into it.
    async fn create(&self, expense: &mut Expense, cancel: &CancellationToken) -> ResultEngine<()>;

    /// Every stored expense, in the backend's natural order.
    async fn get_all(&self, cancel: &CancellationToken) -> ResultEngine<Vec<Expense>>;

    /// Fails with [`EngineError::NotFound`] when no expense has `id`.
    async fn get_by_id(&self, id: i64, cancel: &CancellationToken) -> ResultEngine<Expense>;

    /// Fails with [`EngineError::NotFound`] when nothing was removed.
    async fn delete(&self, id: i64, cancel: &CancellationToken) -> ResultEngine<()>;
}

/// Race `fut` against `cancel`.
///
/// When the token wins, `fut` is dropped, which aborts the pending driver call.
pub(crate) async fn cancellable<T, E, F>(cancel: &CancellationToken, fut: F) -> ResultEngine<T>
where
    F: Future<Output = Result<T, E>>,
    EngineError: From<E>,
{
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(EngineError::Cancelled),
        res = fut => res.map_err(EngineError::from),
    }
}

/// Fail fast when the caller already gave up.
pub(crate) fn ensure_active(cancel: &CancellationToken) -> ResultEngine<()> {
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }
    Ok(())
}
