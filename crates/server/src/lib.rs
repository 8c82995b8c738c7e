use axum::{http::StatusCode, response::IntoResponse};
use engine::{EngineError, ErrorKind};

pub use server::{ServerState, router, run_with_listener};

mod expenses;
mod server;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{ExpenseNew, ExpenseView};
        pub use engine::Expense;
    }
}

/// Errors returned by the handlers.
///
/// Every variant is rendered as a `text/plain` body.
#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    BadRequest(String),
    Internal(String),
    MethodNotAllowed,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err.kind() {
        ErrorKind::Validation => err.to_string(),
        ErrorKind::NotFound => "Expense not found".to_string(),
        ErrorKind::Storage => {
            tracing::error!("storage error: {err}");
            "internal server error".to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServerError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
        };

        (status, message).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation("bad".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound(1)).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_storage_maps_to_500() {
        let res = ServerError::from(EngineError::Cancelled).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res = ServerError::from(EngineError::Io(std::io::Error::other("disk"))).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bodies_are_plain_text() {
        let res = ServerError::BadRequest("Missing ID".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            res.headers()[axum::http::header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn method_not_allowed_maps_to_405() {
        let res = ServerError::MethodNotAllowed.into_response();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
