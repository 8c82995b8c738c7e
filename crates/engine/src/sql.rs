//! Relational [`ExpenseRepository`] backed by sea-orm.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use tokio_util::sync::CancellationToken;

use crate::{
    EngineError, Expense, ResultEngine, expenses,
    repository::{ExpenseRepository, cancellable},
};

/// Expenses stored in the `expenses` table.
///
/// Concurrent writers rely on the database's statement-level guarantees; the
/// repository itself holds no lock.
#[derive(Clone, Debug)]
pub struct SqlRepository {
    database: DatabaseConnection,
}

impl SqlRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ExpenseRepository for SqlRepository {
    async fn create(&self, expense: &mut Expense, cancel: &CancellationToken) -> ResultEngine<()> {
        let active = expenses::ActiveModel::from(&*expense);
        let res = cancellable(
            cancel,
            expenses::Entity::insert(active).exec(&self.database),
        )
        .await?;

        expense.id = res.last_insert_id;
        tracing::debug!(id = expense.id, "expense inserted");
        Ok(())
    }

    async fn get_all(&self, cancel: &CancellationToken) -> ResultEngine<Vec<Expense>> {
        let models = cancellable(cancel, expenses::Entity::find().all(&self.database)).await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    async fn get_by_id(&self, id: i64, cancel: &CancellationToken) -> ResultEngine<Expense> {
        cancellable(cancel, expenses::Entity::find_by_id(id).one(&self.database))
            .await?
            .map(Expense::from)
            .ok_or(EngineError::NotFound(id))
    }

    async fn delete(&self, id: i64, cancel: &CancellationToken) -> ResultEngine<()> {
        let res = cancellable(
            cancel,
            expenses::Entity::delete_by_id(id).exec(&self.database),
        )
        .await?;

        if res.rows_affected == 0 {
            return Err(EngineError::NotFound(id));
        }
        tracing::debug!(id, "expense deleted");
        Ok(())
    }
}
