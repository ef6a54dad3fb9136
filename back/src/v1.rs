use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tally_api::v1::{DeletedTodo, ErrorBody, Todo, TodoFields, TodoPage, TodoPatch};
use tracing::info;

use crate::AppState;

const DEFAULT_LIMIT: usize = 30;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", get(list_todos))
        .route("/todos/add", post(add_todo))
        .route(
            "/todos/:id",
            get(get_todo)
                .put(update_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Todo with id '{0}' not found")]
    NotFound(u64),
    #[error("{0}")]
    BadRequest(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = ErrorBody {
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    limit: Option<usize>,
    skip: Option<usize>,
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<TodoPage> {
    let todos = state.todos.lock().await;

    let skip = params.skip.unwrap_or(0);
    let limit = match params.limit.unwrap_or(DEFAULT_LIMIT) {
        0 => usize::MAX,
        limit => limit,
    };

    let page: Vec<_> = todos.values().skip(skip).take(limit).cloned().collect();

    Json(TodoPage {
        limit: page.len(),
        todos: page,
        total: todos.len(),
        skip,
    })
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, ApiError> {
    let todos = state.todos.lock().await;
    let todo = todos.get(&id).ok_or(ApiError::NotFound(id))?;

    Ok(Json(todo.clone()))
}

async fn add_todo(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<TodoFields>,
) -> Result<Json<Todo>, ApiError> {
    check_text(&fields.text)?;
    check_user_id(fields.user_id)?;

    let todo = Todo::with_fields(state.next_id(), fields);

    let mut todos = state.todos.lock().await;
    todos.insert(todo.id, todo.clone());

    info!(
        id = %todo.id,
        text = %todo.text,
        "created todo"
    );

    Ok(Json(todo))
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Todo>, ApiError> {
    if let Some(text) = &patch.text {
        check_text(text)?;
    }

    if let Some(user_id) = patch.user_id {
        check_user_id(user_id)?;
    }

    let mut todos = state.todos.lock().await;
    let todo = todos.get_mut(&id).ok_or(ApiError::NotFound(id))?;
    todo.apply(patch);

    info!(
        id = %todo.id,
        text = ?todo.text,
        completed = todo.completed,
        "updated todo"
    );

    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<DeletedTodo>, ApiError> {
    let mut todos = state.todos.lock().await;
    let todo = todos.remove(&id).ok_or(ApiError::NotFound(id))?;

    info!(id = %todo.id, "deleted todo");

    Ok(Json(DeletedTodo::now(todo)))
}

fn check_text(text: &str) -> Result<(), ApiError> {
    match text.is_empty() {
        true => Err(ApiError::BadRequest("Todo description is required")),
        false => Ok(()),
    }
}

fn check_user_id(user_id: u64) -> Result<(), ApiError> {
    match user_id {
        0 => Err(ApiError::BadRequest("User ID must be at least 1")),
        _ => Ok(()),
    }
}
