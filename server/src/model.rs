//! Todo record and the request payloads that create or patch it.
//!
//! # Design
//! `Todo` is both the response body and the value stored under each hash
//! field. Request payloads are separate structs of optional fields so a patch
//! can tell "absent" apart from "explicitly false/zero".

use serde::{Deserialize, Serialize};

/// A todo item as stored and returned by the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub url: String,
}

/// Body of `POST /todos`. Every key is optional; `id` of 0 or absent means
/// "assign one".
#[derive(Debug, Default, Deserialize)]
pub struct NewTodo {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i64>,
}

/// Body of `PATCH /todos/{id}`. Only present keys are applied.
///
/// `id` and `url` are accepted (so clients may echo a whole record back)
/// but never applied.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i64>,
}

impl NewTodo {
    /// Requested id, with 0 standing in for "none".
    pub fn requested_id(&self) -> u64 {
        self.id.unwrap_or(0)
    }

    pub fn into_todo(self, id: u64, url: String) -> Todo {
        Todo {
            id,
            title: self.title.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
            order: self.order.unwrap_or(0),
            url,
        }
    }
}

impl Todo {
    /// Overwrite the fields present in `patch`, leaving the rest alone.
    pub fn merge(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Boolean-parse semantics for the status filter: only "true" (any case)
/// is true.
pub fn parse_status(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}
