//! Domain types for the todo demo.
//!
//! A todo list is an insertion-ordered collection of items that can be added,
//! toggled, and removed. State is kept deliberately flat; the interesting
//! wiring lives in how the actions reach the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a new random `TodoId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TodoId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Title of the todo
    pub title: String,
    /// Whether the todo is done
    pub done: bool,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Creates a new open todo item
    #[must_use]
    pub const fn new(id: TodoId, title: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            done: false,
            created_at,
        }
    }
}

/// State of the todo list
///
/// Items keep insertion order, like the list a UI would render.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TodoState {
    /// All todos, in insertion order
    pub items: Vec<TodoItem>,
    /// Last validation error, if any
    pub last_error: Option<String>,
}

impl TodoState {
    /// Number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Number of completed todos
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.items.iter().filter(|item| item.done).count()
    }

    /// Look up a todo by id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Actions on the todo list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Add a todo with the given title
    Add {
        /// Title of the new todo
        title: String,
    },
    /// Flip the done flag of a todo
    Toggle {
        /// Todo to toggle
        id: TodoId,
    },
    /// Remove a todo
    Remove {
        /// Todo to remove
        id: TodoId,
    },
}
