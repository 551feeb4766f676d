//! The synchronized state store for one open board.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the single mutable resource per board connection. It is owned by
//! the connection actor and mutated only on that task (by inbound broadcasts
//! and by local optimistic mutations), so mutation is sequential by
//! construction and no locking exists anywhere in the store.
//!
//! Authoritative broadcasts replace whole collections; optimistic mutations
//! shallow-merge changed fields so the UI updates with zero latency until the
//! next snapshot supersedes them.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use std::collections::HashMap;

use wire::ServerMessage;
use wire::types::{ActiveUser, Category, ChatMessage, Todo, TodoCreate, TodoPatch};

use crate::error::SyncError;

/// WebSocket connection lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Not connected; socket closed or never opened.
    #[default]
    Disconnected,
    /// Socket handshake in progress.
    Connecting,
    /// Socket open; broadcasts are flowing.
    Connected,
}

/// A remote user's live cursor, keyed by user id in [`BoardState::cursors`].
#[derive(Clone, Debug, PartialEq)]
pub struct CursorPosition {
    /// Display name for the cursor label.
    pub username: String,
    /// Presence color (hex).
    pub color: String,
    /// Horizontal canvas coordinate.
    pub x: f64,
    /// Vertical canvas coordinate.
    pub y: f64,
}

/// An optimistic mutation applied locally before the server confirms it.
#[derive(Clone, Debug, PartialEq)]
pub enum LocalMutation {
    /// Provisionally create a todo under a negative placeholder id.
    CreateTodo(TodoCreate),
    /// Shallow-merge changed fields onto an existing todo.
    PatchTodo(TodoPatch),
    /// Remove a todo (optimistic delete).
    RemoveTodo {
        /// Id of the todo being removed.
        id: i64,
    },
    /// Preview a category recolor before the broadcast lands.
    RecolorCategory {
        /// Category being recolored.
        id: i64,
        /// New hex color.
        color: String,
    },
}

/// Reconciled collections for the currently open board.
#[derive(Clone, Debug)]
pub struct BoardState {
    /// Board the state belongs to, once known.
    pub board_id: Option<i64>,
    /// Connection lifecycle state.
    pub connection: ConnectionStatus,
    /// The local user's id; their own cursor broadcasts are never stored.
    pub self_user_id: Option<i64>,
    /// Authoritative todo set, keyed by id.
    pub todos: HashMap<i64, Todo>,
    /// Authoritative category set, keyed by id.
    pub categories: HashMap<i64, Category>,
    /// Authoritative active-user set, replaced wholesale on every update.
    pub active_users: Vec<ActiveUser>,
    /// Remote cursors, keyed by user id.
    pub cursors: HashMap<i64, CursorPosition>,
    /// Chat log in chronological order.
    pub chat: Vec<ChatMessage>,
    /// Whether the one-time chat backlog has been applied this connection.
    pub chat_history_loaded: bool,
    /// Most recent error, if any.
    pub last_error: Option<SyncError>,
    next_placeholder_id: i64,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            board_id: None,
            connection: ConnectionStatus::default(),
            self_user_id: None,
            todos: HashMap::new(),
            categories: HashMap::new(),
            active_users: Vec::new(),
            cursors: HashMap::new(),
            chat: Vec::new(),
            chat_history_loaded: false,
            last_error: None,
            next_placeholder_id: -1,
        }
    }
}

impl BoardState {
    /// A fresh board-scoped state for a new connection attempt. Starting
    /// from empty collections is what keeps stale data from a previous board
    /// from ever being visible.
    #[must_use]
    pub fn fresh(board_id: i64, self_user_id: Option<i64>, connection: ConnectionStatus) -> Self {
        Self {
            board_id: Some(board_id),
            self_user_id,
            connection,
            ..Self::default()
        }
    }

    /// The terminal state after teardown: every collection destroyed, only
    /// the closure reason retained.
    #[must_use]
    pub fn closed(last_error: Option<SyncError>) -> Self {
        Self { last_error, ..Self::default() }
    }

    /// Apply one decoded server broadcast.
    ///
    /// Full-collection payloads replace their collection wholesale — the
    /// server always sends complete sets, never deltas, for todos,
    /// categories and active users. Applying the same snapshot twice is a
    /// no-op the second time.
    pub fn apply_server(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::BoardDataUpdate(data) => {
                self.board_id = Some(data.board_id);
                self.todos = data.todos.into_iter().map(|t| (t.id, t)).collect();
                self.categories = data.categories.into_iter().map(|c| (c.id, c)).collect();
                self.active_users = data.active_users;
                if let Some(history) = data.chat_history
                    && !self.chat_history_loaded
                {
                    // Backlog arrives newest first; flip it into chronological order.
                    self.chat = history.into_iter().rev().collect();
                    self.chat_history_loaded = true;
                }
                self.prune_cursors();
            }
            ServerMessage::ActiveUsersUpdate(users) => {
                self.active_users = users;
                self.prune_cursors();
            }
            ServerMessage::CursorUpdate(cursor) => {
                if self.self_user_id == Some(cursor.user_id) {
                    return;
                }
                self.cursors.insert(
                    cursor.user_id,
                    CursorPosition {
                        username: cursor.username,
                        color: cursor.color,
                        x: cursor.x,
                        y: cursor.y,
                    },
                );
            }
            ServerMessage::NewChatMessage(message) => self.chat.push(message),
            ServerMessage::Error(error) => {
                self.last_error = Some(SyncError::Application(error.message));
            }
            // Unknown actions are logged at the protocol boundary.
            ServerMessage::Unknown { .. } => {}
        }
    }

    /// Apply one optimistic local mutation.
    ///
    /// Returns the placeholder id for creations so the caller can track the
    /// provisional entity until the authoritative snapshot replaces it.
    pub fn apply_local(&mut self, mutation: LocalMutation) -> Option<i64> {
        match mutation {
            LocalMutation::CreateTodo(create) => {
                let id = self.next_placeholder_id;
                self.next_placeholder_id -= 1;
                self.todos.insert(
                    id,
                    Todo {
                        id,
                        name: create.name,
                        description: create.description,
                        position_x: create.position_x,
                        position_y: create.position_y,
                        is_completed: false,
                        completed_at: None,
                        created_at: None,
                        updated_at: None,
                        category_id: create.category_id,
                        board_id: self.board_id.unwrap_or_default(),
                    },
                );
                Some(id)
            }
            LocalMutation::PatchTodo(patch) => {
                if let Some(todo) = self.todos.get_mut(&patch.id) {
                    merge_todo_patch(todo, &patch);
                }
                None
            }
            LocalMutation::RemoveTodo { id } => {
                self.todos.remove(&id);
                None
            }
            LocalMutation::RecolorCategory { id, color } => {
                if let Some(category) = self.categories.get_mut(&id) {
                    category.color = Some(color);
                }
                None
            }
        }
    }

    /// Drop cursors whose user is no longer in the active-user set. This is
    /// the only removal path for cursors; there is no "user left" message.
    fn prune_cursors(&mut self) {
        let active: std::collections::HashSet<i64> =
            self.active_users.iter().map(|u| u.user_id).collect();
        self.cursors.retain(|user_id, _| active.contains(user_id));
    }
}

/// Shallow merge: only fields present on the patch overwrite the todo.
fn merge_todo_patch(todo: &mut Todo, patch: &TodoPatch) {
    if let Some(name) = &patch.name {
        todo.name = name.clone();
    }
    if let Some(description) = &patch.description {
        todo.description = Some(description.clone());
    }
    if let Some(x) = patch.position_x {
        todo.position_x = x;
    }
    if let Some(y) = patch.position_y {
        todo.position_y = y;
    }
    if let Some(is_completed) = patch.is_completed {
        todo.is_completed = is_completed;
        if !is_completed {
            todo.completed_at = None;
        }
    }
    if let Some(category_id) = patch.category_id {
        todo.category_id = Some(category_id);
    }
}
