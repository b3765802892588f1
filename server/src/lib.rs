//! HTTP CRUD service for todo items kept in a single Redis hash.
//!
//! # Overview
//! Each route performs one read, one write, or one read followed by one write
//! against the [`TodoStore`]. New ids come from an in-memory [`IdSequence`].
//!
//! # Design
//! - Handlers share an [`AppState`] holding the store as a trait object, so
//!   tests run the same router over [`MemoryStore`].
//! - Store values are raw JSON strings. Handlers decode and encode `Todo`.
//! - Every error becomes a bare status code (see [`TodoError`]).

pub mod error;
pub mod handlers;
pub mod ids;
pub mod model;
pub mod settings;
pub mod store;
pub mod telemetry;

use std::{future::Future, sync::Arc};

use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::TodoError;
pub use ids::IdSequence;
pub use model::{NewTodo, Todo, TodoPatch};
pub use settings::Settings;
pub use store::{MemoryStore, RedisStore, StoreError, TodoStore};

use handlers::{
    create_todo, delete_all, delete_todo, get_todo, list_by_status, list_todos, update_todo,
};
use settings::StoreBackend;

/// Written on startup when `store.seed_sample` is set.
pub const SAMPLE_TODO_ID: u64 = 24;

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub ids: Arc<IdSequence>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, initial_id: u64) -> Self {
        Self {
            store,
            ids: Arc::new(IdSequence::new(initial_id)),
        }
    }

    pub fn in_memory(initial_id: u64) -> Self {
        Self::new(Arc::new(MemoryStore::new()), initial_id)
    }

    /// Connect the configured backend.
    pub async fn from_settings(settings: &Settings) -> Result<Self, StoreError> {
        let store: Arc<dyn TodoStore> = match settings.store.backend {
            StoreBackend::Redis => {
                Arc::new(RedisStore::connect(&settings.redis, &settings.store.namespace).await?)
            }
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(store, settings.store.initial_id))
    }

    /// Write the sample todo and move the id counter past it.
    pub async fn seed_sample(&self) -> Result<(), TodoError> {
        let sample = Todo {
            id: SAMPLE_TODO_ID,
            title: "Something to do...".to_string(),
            completed: false,
            order: 1,
            url: "todo/ex".to_string(),
        };
        let encoded = serde_json::to_string(&sample).map_err(TodoError::Encode)?;
        self.store.set(SAMPLE_TODO_ID, encoded).await?;
        self.ids.observe(SAMPLE_TODO_ID);
        Ok(())
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::PATCH])
        .allow_headers([
            HeaderName::from_static("x-requested-with"),
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo).delete(delete_all))
        .route("/todos/", get(list_todos).post(create_todo).delete(delete_all))
        .route("/todos/status/", get(list_todos))
        .route("/todos/status/{status}", get(list_by_status))
        .route(
            "/todos/{todo_id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    run_until(listener, state, std::future::pending()).await
}

/// Serve until `shutdown` resolves, letting in-flight requests finish.
pub async fn run_until<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seed_sample_advances_counter() {
        let state = AppState::in_memory(1);
        state.seed_sample().await.unwrap();

        let raw = state.store.get(SAMPLE_TODO_ID).await.unwrap().unwrap();
        let todo: Todo = serde_json::from_str(&raw).unwrap();
        assert_eq!(todo.title, "Something to do...");
        assert_eq!(todo.url, "todo/ex");
        assert_eq!(state.ids.peek(), 25);
    }

    #[tokio::test]
    async fn seed_sample_keeps_higher_counter() {
        let state = AppState::in_memory(100);
        state.seed_sample().await.unwrap();
        assert_eq!(state.ids.peek(), 100);
    }
}
