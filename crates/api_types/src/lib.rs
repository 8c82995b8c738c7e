use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;

    /// Body of `POST /expenses`.
    ///
    /// Missing fields decode to their zero value, so `{}` is a well-formed
    /// body that the engine then rejects during validation.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ExpenseNew {
        pub description: String,
        pub amount: f64,
        pub category: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i64,
        pub description: String,
        pub amount: f64,
        pub category: String,
        pub date: DateTime<Utc>,
    }
}
