//! Client-side realtime synchronization core for the ideaboard canvas.
//!
//! One WebSocket per selected board carries `{action, payload}` envelopes in
//! both directions. This crate owns the connection lifecycle, the
//! synchronized state store with its optimistic-update/authoritative-merge
//! model, outbound cursor throttling, and the drag reconciler that turns
//! pointer gestures into debounced position broadcasts.
//!
//! CONSISTENCY MODEL
//! =================
//! The server is the single source of truth. Authoritative broadcasts replace
//! whole collections; optimistic local mutations fill the round-trip window
//! and are silently superseded by the next snapshot (last-writer-wins at
//! collection granularity). Optimistic values are never rolled back; the
//! next broadcast is the recovery mechanism.

pub mod drag;
pub mod error;
pub mod net;
pub mod presence;
pub mod state;
pub mod timing;

pub use error::SyncError;
pub use net::connection::{
    BoardHandle, ConnectConfig, ConnectionManager, ReconnectPolicy, connect, ws_url,
};
pub use state::board::{BoardState, ConnectionStatus, CursorPosition, LocalMutation};
