//! Domain types for the todo list.
//!
//! # Design
//! `Todo` mirrors the backend record plus one client-only field, `editable`,
//! which drives the inline-edit rendering mode. `editable` is never written
//! to the wire: it is skipped on serialization and defaults to `false` when a
//! record arrives from the server.
//!
//! The wire payloads (`CreateTodo`, `UpdateTodo`) are separate structs so the
//! persisted shape is spelled out once and cannot pick up UI state by
//! accident.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Server-assigned identity of a todo.
///
/// Backends hand out either numbers or strings. A string that reads as a
/// non-negative integer is stored as `Number`, so `"3"` and `3` are the same
/// id; any other string is kept verbatim as `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(u64),
    Text(String),
}

impl From<u64> for TodoId {
    fn from(n: u64) -> Self {
        TodoId::Number(n)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(TodoId::Number(n)),
            Raw::Text(s) => s.parse().map_err(<D::Error as serde::de::Error>::custom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("empty todo id")]
pub struct EmptyTodoId;

impl FromStr for TodoId {
    type Err = EmptyTodoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmptyTodoId);
        }
        Ok(match s.parse::<u64>() {
            Ok(n) => TodoId::Number(n),
            Err(_) => TodoId::Text(s.to_string()),
        })
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Number(n) => write!(f, "{n}"),
            TodoId::Text(s) => f.write_str(s),
        }
    }
}

/// A single todo item as held in the client's list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    /// Inline-edit mode. Client-only, never persisted.
    #[serde(default, skip_serializing)]
    pub editable: bool,
}

impl Todo {
    /// The persisted fields of this item, ready to be sent as a PUT body.
    pub fn to_update(&self) -> UpdateTodo {
        UpdateTodo {
            title: self.title.clone(),
            completed: self.completed,
        }
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for replacing an existing todo. Both persisted fields are
/// always sent; the backend replaces the stored record with them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    pub title: String,
    pub completed: bool,
}
