//! Wire protocol for the ideaboard realtime channel.
//!
//! Every frame on the board WebSocket is a JSON text envelope of the form
//! `{"action": <string>, "payload": <object>}`. This crate owns both
//! directions of that boundary: inbound envelopes are decoded exactly once
//! into the closed [`ServerMessage`] sum type (with an explicit
//! [`ServerMessage::Unknown`] fallthrough so new server actions degrade to a
//! logged no-op instead of a decode failure), and outbound [`ClientAction`]
//! values serialize back into the same envelope shape.

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;

pub mod types;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{ActiveUser, BoardData, CategoryCreate, CategoryPatch, ChatMessage, CursorUpdate, ServerError, TodoCreate, TodoPatch};

/// Error returned by [`decode_server_message`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The frame text is not a well-formed `{action, payload}` envelope.
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The action is known but its payload does not match the expected shape.
    #[error("invalid `{action}` payload: {source}")]
    InvalidPayload {
        /// Action string from the envelope.
        action: String,
        /// Underlying shape mismatch.
        source: serde_json::Error,
    },
}

/// A message broadcast by the server, decoded from one inbound envelope.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerMessage {
    /// Full replacement of the board's todos, categories and active users.
    /// Carries the chat history exactly once, on the first frame after connect.
    BoardDataUpdate(BoardData),
    /// Full replacement of the active-user set.
    ActiveUsersUpdate(Vec<ActiveUser>),
    /// Upsert of one remote user's cursor position.
    CursorUpdate(CursorUpdate),
    /// One chat message to append.
    NewChatMessage(ChatMessage),
    /// Application-level error; non-fatal unless the socket also closes.
    Error(ServerError),
    /// An action this client does not recognize. Ignored, never fatal.
    Unknown {
        /// The unrecognized action string, kept for logging.
        action: String,
    },
}

/// An action sent by the client. All sends are fire-and-forget: there is no
/// correlation id, and success is inferred from a later broadcast.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum ClientAction {
    /// Publish the local cursor position in canvas coordinates.
    UpdateCursor {
        /// Horizontal canvas coordinate.
        x: f64,
        /// Vertical canvas coordinate.
        y: f64,
    },
    /// Create a new todo node.
    CreateTodo(TodoCreate),
    /// Partially update an existing todo; absent fields are left untouched.
    UpdateTodo(TodoPatch),
    /// Delete a todo by id.
    DeleteTodo {
        /// Server id of the todo to delete.
        id: i64,
    },
    /// Create a new category.
    CreateCategory(CategoryCreate),
    /// Partially update a category (rename, recolor).
    UpdateCategory(CategoryPatch),
    /// Post one chat message to the board channel.
    SendChatMessage {
        /// Message body.
        message: String,
    },
    /// Change the local user's presence color on this board.
    UpdateMyBoardColor {
        /// New hex color.
        color: String,
    },
}

#[derive(Deserialize)]
struct Envelope {
    action: String,
    #[serde(default)]
    payload: Value,
}

/// Decode one inbound text frame into a [`ServerMessage`].
///
/// Unrecognized actions decode to [`ServerMessage::Unknown`]; they are a
/// caller-side warning, not an error.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] when the text is not a JSON envelope and
/// [`CodecError::InvalidPayload`] when a known action carries a payload of
/// the wrong shape.
pub fn decode_server_message(text: &str) -> Result<ServerMessage, CodecError> {
    let Envelope { action, payload } = serde_json::from_str(text)?;

    let message = match action.as_str() {
        "board_data_update" => ServerMessage::BoardDataUpdate(payload_into(&action, payload)?),
        "active_users_update" => ServerMessage::ActiveUsersUpdate(payload_into(&action, payload)?),
        "cursor_update" => ServerMessage::CursorUpdate(payload_into(&action, payload)?),
        "new_chat_message" => ServerMessage::NewChatMessage(payload_into(&action, payload)?),
        "error" => ServerMessage::Error(payload_into(&action, payload)?),
        _ => ServerMessage::Unknown { action },
    };

    Ok(message)
}

/// Encode one outbound [`ClientAction`] into an envelope text frame.
#[must_use]
pub fn encode_client_action(action: &ClientAction) -> String {
    // Serializing these enums cannot fail: every payload is a plain struct of
    // strings, numbers and options, with no non-string map keys.
    serde_json::to_string(action).unwrap_or_default()
}

fn payload_into<T: DeserializeOwned>(action: &str, payload: Value) -> Result<T, CodecError> {
    serde_json::from_value(payload).map_err(|source| CodecError::InvalidPayload {
        action: action.to_owned(),
        source,
    })
}
