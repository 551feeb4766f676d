//! Wire DTOs shared across the board channel.
//!
//! These types mirror the server's broadcast payloads field-for-field so
//! serde round-trips stay lossless. Integer ids tolerate float-encoded
//! integers because some upstream serializers emit `7.0` for `7`.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A positioned task node on the board canvas.
///
/// `position_x` / `position_y` are the node's *center* in canvas coordinates.
/// Server-assigned ids are positive; a client holding an optimistic creation
/// uses a transient negative placeholder id until the authoritative snapshot
/// arrives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-assigned id (negative while a local placeholder).
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    /// Non-empty display text.
    pub name: String,
    /// Optional long-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Horizontal center coordinate on the canvas.
    pub position_x: f64,
    /// Vertical center coordinate on the canvas.
    pub position_y: f64,
    /// Whether the task has been completed.
    pub is_completed: bool,
    /// ISO 8601 completion timestamp, if completed.
    #[serde(default)]
    pub completed_at: Option<String>,
    /// ISO 8601 creation timestamp, when known.
    #[serde(default)]
    pub created_at: Option<String>,
    /// ISO 8601 last-update timestamp, when known.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Owning category, if any.
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Board this todo belongs to.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub board_id: i64,
}

/// A named, colored grouping of todos.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Server-assigned id.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Hex color; `None` renders as the default gray.
    #[serde(default)]
    pub color: Option<String>,
    /// Board this category belongs to.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub board_id: i64,
}

/// Membership role on a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full control, including membership management.
    Owner,
    /// May create and mutate board content.
    Editor,
    /// Read-only access.
    Viewer,
}

/// A user currently connected to the board channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveUser {
    /// Authenticated user id.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub user_id: i64,
    /// Display name.
    pub username: String,
    /// Assigned presence color (hex).
    pub color: String,
    /// The user's role on this board.
    pub role: Role,
}

/// One remote cursor position broadcast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CursorUpdate {
    /// User the cursor belongs to.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub user_id: i64,
    /// Display name, for the cursor label.
    pub username: String,
    /// Presence color (hex).
    pub color: String,
    /// Horizontal canvas coordinate.
    pub x: f64,
    /// Vertical canvas coordinate.
    pub y: f64,
}

/// Sender identity embedded in a chat message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatUser {
    /// Authenticated user id.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    /// Display name.
    pub username: String,
    /// Presence color (hex).
    pub color: String,
}

/// One message on the board chat channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server-assigned message id.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    /// Board the message was posted to.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub board_id: i64,
    /// Posting user's id.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub user_id: i64,
    /// Message body.
    pub message: String,
    /// ISO 8601 post timestamp.
    pub timestamp: String,
    /// Embedded sender identity.
    pub user: ChatUser,
}

/// Payload of a `board_data_update` broadcast: the authoritative snapshot.
///
/// The three collections are always complete sets, never deltas. The server
/// includes `chat_history` (newest first) only on the first frame after a
/// connection is established.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardData {
    /// Board the snapshot belongs to.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub board_id: i64,
    /// Complete todo set.
    #[serde(default)]
    pub todos: Vec<Todo>,
    /// Complete category set.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Complete active-user set.
    #[serde(default)]
    pub active_users: Vec<ActiveUser>,
    /// Chat backlog, newest first; present only on the initial frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<Vec<ChatMessage>>,
}

/// Payload of a server `error` action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerError {
    /// Human-readable error text.
    pub message: String,
    /// Optional HTTP-style status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Outbound payload for `create_todo`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TodoCreate {
    /// Display text for the new node.
    pub name: String,
    /// Horizontal center coordinate.
    pub position_x: f64,
    /// Vertical center coordinate.
    pub position_y: f64,
    /// Optional long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional owning category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// Sparse outbound update for a todo. Only present fields are applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoPatch {
    /// Id of the todo to update.
    pub id: i64,
    /// New display text, if being updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description, if being updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New horizontal center coordinate, if being updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    /// New vertical center coordinate, if being updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
    /// New completion state, if being updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    /// New owning category, if being updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl TodoPatch {
    /// A patch moving `id` to a new center position.
    #[must_use]
    pub fn position(id: i64, x: f64, y: f64) -> Self {
        Self {
            id,
            position_x: Some(x),
            position_y: Some(y),
            ..Self::default()
        }
    }

    /// A patch setting only the completion flag of `id`.
    #[must_use]
    pub fn completion(id: i64, is_completed: bool) -> Self {
        Self {
            id,
            is_completed: Some(is_completed),
            ..Self::default()
        }
    }
}

/// Outbound payload for `create_category`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryCreate {
    /// Display name for the new category.
    pub name: String,
    /// Optional hex color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Sparse outbound update for a category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    /// Id of the category to update.
    pub id: i64,
    /// New display name, if being updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New hex color, if being updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= i64::MIN as f64
                && float <= i64::MAX as f64
            {
                return Ok(float as i64);
            }
            Err(D::Error::custom("expected integer-compatible number"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}
