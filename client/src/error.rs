//! Error taxonomy for the synchronization core.
//!
//! No category triggers automatic retry by itself; recovery is re-selecting
//! the board unless an explicit reconnect policy is configured.

/// An error surfaced by the board connection or state store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Socket error or abnormal close. Transient: state is cleared and the
    /// error shown as a non-blocking banner.
    #[error("websocket transport error: {0}")]
    Transport(String),
    /// Malformed JSON or an unrecognized payload shape. The frame is dropped
    /// and the connection stays open.
    #[error("received invalid data from server: {0}")]
    Protocol(String),
    /// Close code 4001/4003. Terminal: the user must re-authenticate or
    /// re-select the board; this core never retries it.
    #[error("board connection unauthorized")]
    Unauthorized,
    /// A server-sent `error` action. The connection stays open.
    #[error("server error: {0}")]
    Application(String),
}
