use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    #[serde(rename = "todo", alias = "text")]
    pub text: String,
    pub completed: bool,
    pub user_id: u64,
}

impl Todo {
    pub fn with_fields(id: u64, fields: TodoFields) -> Self {
        Self {
            id,
            text: fields.text,
            completed: fields.completed,
            user_id: fields.user_id,
        }
    }

    pub fn fields(&self) -> TodoFields {
        TodoFields {
            text: self.text.clone(),
            completed: self.completed,
            user_id: self.user_id,
        }
    }

    /// Applies the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }

        if let Some(completed) = patch.completed {
            self.completed = completed;
        }

        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
    }
}

/// Body of create and update requests: every client-editable field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFields {
    #[serde(rename = "todo", alias = "text")]
    pub text: String,
    pub completed: bool,
    pub user_id: u64,
}

/// Partial update accepted by `PUT`/`PATCH /todos/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(rename = "todo", alias = "text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

impl From<TodoFields> for TodoPatch {
    fn from(fields: TodoFields) -> Self {
        Self {
            text: Some(fields.text),
            completed: Some(fields.completed),
            user_id: Some(fields.user_id),
        }
    }
}

/// Envelope returned by `GET /todos`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: usize,
}

/// Confirmation returned by `DELETE /todos/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTodo {
    #[serde(flatten)]
    pub todo: Todo,
    pub is_deleted: bool,
    pub deleted_on: DateTime<Utc>,
}

impl DeletedTodo {
    pub fn now(todo: Todo) -> Self {
        Self {
            todo,
            is_deleted: true,
            deleted_on: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
