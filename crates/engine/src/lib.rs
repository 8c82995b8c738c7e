use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

pub use error::{EngineError, ErrorKind};
pub use expenses::Expense;
pub use json_file::JsonFileRepository;
pub use repository::ExpenseRepository;
pub use sql::SqlRepository;

mod error;
mod expenses;
mod json_file;
mod repository;
mod sql;

type ResultEngine<T> = Result<T, EngineError>;

/// Business rules for expenses.
///
/// The engine only knows the [`ExpenseRepository`] contract, never the
/// concrete backend it was built with.
#[derive(Clone)]
pub struct Engine {
    repository: Arc<dyn ExpenseRepository>,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Validate and store a new expense dated now.
    ///
    /// The amount must be strictly positive and the description non-empty;
    /// the category is stored as given.
    pub async fn register_expense(
        &self,
        description: &str,
        amount: f64,
        category: &str,
        cancel: &CancellationToken,
    ) -> ResultEngine<Expense> {
        // Written this way so NaN is rejected too.
        if !(amount > 0.0) {
            return Err(EngineError::Validation(
                "amount must be positive".to_string(),
            ));
        }
        if description.is_empty() {
            return Err(EngineError::Validation(
                "description cannot be empty".to_string(),
            ));
        }

        let mut expense = Expense::new(
            description.to_string(),
            amount,
            category.to_string(),
            Utc::now(),
        );
        self.repository.create(&mut expense, cancel).await?;

        Ok(expense)
    }

    pub async fn list_expenses(&self, cancel: &CancellationToken) -> ResultEngine<Vec<Expense>> {
        self.repository.get_all(cancel).await
    }

    pub async fn expense_details(
        &self,
        id: i64,
        cancel: &CancellationToken,
    ) -> ResultEngine<Expense> {
        self.repository.get_by_id(id, cancel).await
    }

    pub async fn remove_expense(&self, id: i64, cancel: &CancellationToken) -> ResultEngine<()> {
        self.repository.delete(id, cancel).await
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    repository: Option<Arc<dyn ExpenseRepository>>,
}

impl EngineBuilder {
    /// Pass the store the engine works on
    pub fn repository(mut self, repository: Arc<dyn ExpenseRepository>) -> EngineBuilder {
        self.repository = Some(repository);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let repository = self.repository.ok_or(EngineError::MissingRepository)?;
        Ok(Engine { repository })
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}
