//! Expense primitives.
//!
//! An `Expense` is a dated, categorized monetary record. It is the only
//! entity handled by the engine.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
}

impl Expense {
    /// Build an expense that has not been stored yet.
    ///
    /// The id stays `0` until a repository assigns one.
    pub fn new(description: String, amount: f64, category: String, date: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            description,
            amount,
            category,
            date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::NotSet,
            description: ActiveValue::Set(expense.description.clone()),
            amount: ActiveValue::Set(expense.amount),
            category: ActiveValue::Set(expense.category.clone()),
            date: ActiveValue::Set(expense.date),
        }
    }
}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            amount: model.amount,
            category: model.category,
            date: model.date,
        }
    }
}
