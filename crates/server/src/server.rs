use axum::{
    Router,
    extract::Request,
    http::Method,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use engine::Engine;
use tokio_util::sync::CancellationToken;

use std::{sync::Arc, time::Duration};

use crate::{ServerError, expenses};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Cancelled when the server shuts down; every request token is a child.
    pub shutdown: CancellationToken,
    pub request_timeout: Option<Duration>,
}

impl ServerState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
            shutdown: CancellationToken::new(),
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Token for one request, cancelled on shutdown, on deadline, or when the
    /// returned scope is dropped.
    pub(crate) fn request_scope(&self) -> RequestScope {
        let token = self.shutdown.child_token();

        if let Some(timeout) = self.request_timeout {
            let deadline = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = deadline.cancelled() => {}
                    _ = tokio::time::sleep(timeout) => {
                        tracing::warn!("request deadline of {timeout:?} exceeded");
                        deadline.cancel();
                    }
                }
            });
        }

        RequestScope { token }
    }
}

/// Cancellation scope of a single request.
pub(crate) struct RequestScope {
    token: CancellationToken,
}

impl RequestScope {
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Every path under `/expenses/` is an item route: the id is the whole rest of
/// the path, so `/expenses/1/2` is a bad id rather than an unknown route.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/expenses",
            get(expenses::list)
                .post(expenses::create)
                .fallback(expenses::method_not_allowed),
        )
        .route(
            "/expenses/",
            get(expenses::get_without_id)
                .delete(expenses::delete_without_id)
                .fallback(expenses::method_not_allowed),
        )
        .route(
            "/expenses/{*id}",
            get(expenses::get)
                .delete(expenses::delete)
                .fallback(expenses::method_not_allowed),
        )
        .route_layer(middleware::from_fn(reject_head))
        .with_state(state)
}

/// `get` routes answer HEAD too; only GET is served.
async fn reject_head(request: Request, next: Next) -> Response {
    if request.method() == Method::HEAD {
        return ServerError::MethodNotAllowed.into_response();
    }
    next.run(request).await
}

/// Serve until `state.shutdown` is cancelled.
pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::JsonFileRepository;

    async fn state() -> ServerState {
        // Never written: only reads happen through this state.
        let path = std::env::temp_dir().join("expenses-server-unit-never-written.json");
        let repo = JsonFileRepository::open(path).await.unwrap();
        let engine = Engine::builder().repository(Arc::new(repo)).build().unwrap();
        ServerState::new(engine)
    }

    #[tokio::test]
    async fn scope_is_cancelled_on_drop() {
        let state = state().await;
        let scope = state.request_scope();
        let token = scope.token().clone();

        assert!(!token.is_cancelled());
        drop(scope);
        assert!(token.is_cancelled());
        assert!(!state.shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn scope_is_cancelled_on_deadline() {
        let state = state()
            .await
            .with_request_timeout(Some(Duration::from_millis(10)));
        let scope = state.request_scope();

        let fired = tokio::time::timeout(Duration::from_secs(5), scope.token().cancelled()).await;
        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn shutdown_cancels_every_scope() {
        let state = state().await;
        let first = state.request_scope();
        let second = state.request_scope();

        state.shutdown.cancel();
        assert!(first.token().is_cancelled());
        assert!(second.token().is_cancelled());
    }
}
