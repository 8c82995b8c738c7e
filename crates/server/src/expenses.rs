//! Expenses API endpoints

use api_types::expense::{ExpenseNew, ExpenseView};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        description: expense.description,
        amount: expense.amount,
        category: expense.category,
        date: expense.date,
    }
}

/// `POST /expenses`
///
/// The body is decoded by hand so that every malformed payload, whatever its
/// content type, is a plain 400.
pub async fn create(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let payload: ExpenseNew = serde_json::from_slice(&body)
        .map_err(|_| ServerError::BadRequest("Invalid request body".to_string()))?;

    let scope = state.request_scope();
    let expense = state
        .engine
        .register_expense(
            &payload.description,
            payload.amount,
            &payload.category,
            scope.token(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

/// `GET /expenses`
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let scope = state.request_scope();
    let expenses = state
        .engine
        .list_expenses(scope.token())
        .await
        .map_err(|err| {
            tracing::error!("failed to list expenses: {err}");
            ServerError::Internal("Failed to fetch expenses".to_string())
        })?;

    Ok(Json(expenses.into_iter().map(map_expense).collect()))
}

/// `GET /expenses/{*id}`
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    fetch(&state, &id).await
}

/// `GET /expenses/`
pub async fn get_without_id(
    State(state): State<ServerState>,
) -> Result<Json<ExpenseView>, ServerError> {
    fetch(&state, "").await
}

async fn fetch(state: &ServerState, raw_id: &str) -> Result<Json<ExpenseView>, ServerError> {
    let id: i64 = raw_id
        .parse()
        .map_err(|_| ServerError::BadRequest("Invalid ID".to_string()))?;

    let scope = state.request_scope();
    let expense = state.engine.expense_details(id, scope.token()).await?;

    Ok(Json(map_expense(expense)))
}

/// `DELETE /expenses/{*id}`
///
/// Unlike the other endpoints, a missing expense is reported as a 500 with
/// the engine's message.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, &'static str), ServerError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ServerError::BadRequest("Invalid ID format".to_string()))?;

    let scope = state.request_scope();
    state
        .engine
        .remove_expense(id, scope.token())
        .await
        .map_err(|err| {
            tracing::error!("failed to delete expense {id}: {err}");
            ServerError::Internal(err.to_string())
        })?;

    Ok((StatusCode::OK, "Expense deleted"))
}

/// `DELETE /expenses/`
pub async fn delete_without_id() -> Result<(StatusCode, &'static str), ServerError> {
    Err(ServerError::BadRequest("Missing ID".to_string()))
}

pub async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}
