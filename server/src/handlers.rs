use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::TodoError;
use crate::model::{parse_status, NewTodo, Todo, TodoPatch};
use crate::AppState;

/// Hash field for a path segment. Only the canonical decimal form names a
/// stored todo; anything else (`abc`, `05`, `+5`) cannot match a field.
fn field_id(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|id| id.to_string() == raw)
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, TodoError> {
    serde_json::from_slice(body).map_err(|e| TodoError::BadRequest(e.to_string()))
}

fn decode(raw: &str) -> Result<Todo, TodoError> {
    serde_json::from_str(raw).map_err(TodoError::CorruptRecord)
}

fn encode(todo: &Todo) -> Result<String, TodoError> {
    serde_json::to_string(todo).map_err(TodoError::Encode)
}

/// Absolute URI of the current request, without query and trailing slash.
fn absolute_uri(headers: &HeaderMap, uri: &Uri) -> String {
    let path = uri.path().trim_end_matches('/');
    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return format!("{scheme}://{authority}{path}");
    }
    match headers.get(header::HOST).and_then(|host| host.to_str().ok()) {
        Some(host) => format!("http://{host}{path}"),
        None => path.to_string(),
    }
}

async fn load_all(state: &AppState) -> Result<Vec<Todo>, TodoError> {
    state
        .store
        .values()
        .await?
        .iter()
        .map(|raw| decode(raw))
        .collect()
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Todo>, TodoError> {
    let id = field_id(&raw_id).ok_or_else(|| TodoError::NotFound(raw_id.clone()))?;
    let raw = state.store.get(id).await?.ok_or(TodoError::NotFound(raw_id))?;
    Ok(Json(decode(&raw)?))
}

/// Every todo, sorted by `order`.
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, TodoError> {
    let mut todos = load_all(&state).await?;
    todos.sort_by_key(|todo| todo.order);
    Ok(Json(todos))
}

/// Todos whose `completed` flag matches the path segment.
pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Todo>>, TodoError> {
    if status.is_empty() {
        return list_todos(State(state)).await;
    }
    let completed = parse_status(&status);
    let todos = load_all(&state)
        .await?
        .into_iter()
        .filter(|todo| todo.completed == completed)
        .collect();
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), TodoError> {
    let input: NewTodo = parse_body(&body)?;
    let id = state.ids.assign(input.requested_id())?;
    let url = format!("{}/{id}", absolute_uri(&headers, &uri));
    let todo = input.into_todo(id, url);

    state.store.set(id, encode(&todo)?).await?;
    info!(id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, TodoError> {
    let patch: TodoPatch = parse_body(&body)?;

    let id = field_id(&raw_id).ok_or_else(|| TodoError::NotFound(raw_id.clone()))?;
    let raw = state.store.get(id).await?.ok_or(TodoError::NotFound(raw_id))?;
    let mut todo = decode(&raw)?;
    todo.merge(patch);

    state.store.set(id, encode(&todo)?).await?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, TodoError> {
    // A segment that cannot name a field has nothing to remove.
    if let Some(id) = field_id(&raw_id) {
        state.store.remove(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Drop the whole namespace. The id counter keeps counting.
pub async fn delete_all(State(state): State<AppState>) -> Result<StatusCode, TodoError> {
    state.store.clear().await?;
    info!("cleared all todos");
    Ok(StatusCode::NO_CONTENT)
}
