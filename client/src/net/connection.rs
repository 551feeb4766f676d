//! Board connection lifecycle.
//!
//! One actor task per open board owns the socket and the synchronized state.
//! Commands (sends, optimistic mutations, close) arrive on an unbounded
//! channel and inbound frames are applied in arrival order, so every state
//! mutation happens sequentially on the actor. Snapshots are published
//! through a `watch` channel; hosts render from whatever snapshot they
//! observe.
//!
//! ERROR HANDLING
//! ==============
//! Protocol failures (bad JSON, wrong payload shape) never tear the socket
//! down; transport failures end the actor unless an explicit reconnect
//! policy asks for backoff; close codes 4001/4003 are terminal.

#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use wire::{ClientAction, ServerMessage};

use crate::error::SyncError;
use crate::state::board::{BoardState, ConnectionStatus, LocalMutation};

/// Everything needed to open one board connection.
#[derive(Clone, Debug)]
pub struct ConnectConfig {
    /// `http(s)://host[:port]` of the board server; the WebSocket scheme is
    /// derived from it (`http` → `ws`, `https` → `wss`).
    pub base_url: String,
    /// Board to join.
    pub board_id: i64,
    /// Session token embedded in the connection URL.
    pub token: String,
    /// The local user's id, for self-cursor exclusion.
    pub self_user_id: Option<i64>,
    /// What to do when the transport drops.
    pub reconnect: ReconnectPolicy,
}

/// Reconnection policy for transport failures.
///
/// Normal closes (board switch, logout) and unauthorized closes never
/// reconnect regardless of policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Give up on the first transport failure; recovery is user-initiated.
    #[default]
    Never,
    /// Retry with doubling delays, capped at `max_ms`.
    ExponentialBackoff {
        /// Delay before the first retry, in milliseconds.
        initial_ms: u64,
        /// Upper bound for the doubled delay, in milliseconds.
        max_ms: u64,
    },
}

impl ReconnectPolicy {
    /// The delay before the next attempt, given the previous delay.
    #[must_use]
    pub fn next_delay(self, previous: Option<Duration>) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::ExponentialBackoff { initial_ms, max_ms } => {
                let initial = Duration::from_millis(initial_ms);
                let max = Duration::from_millis(max_ms);
                Some(previous.map_or(initial, |p| (p * 2).min(max)))
            }
        }
    }
}

/// Build the connection URL: `<ws|wss>://<host>/ws/board/<board_id>/<token>`.
///
/// # Errors
///
/// Returns [`SyncError::Transport`] when the base URL has no `http`/`https`
/// scheme to derive the WebSocket scheme from.
pub fn ws_url(base_url: &str, board_id: i64, token: &str) -> Result<String, SyncError> {
    if let Some(rest) = base_url.strip_prefix("http://") {
        let host = rest.trim_end_matches('/');
        return Ok(format!("ws://{host}/ws/board/{board_id}/{token}"));
    }
    if let Some(rest) = base_url.strip_prefix("https://") {
        let host = rest.trim_end_matches('/');
        return Ok(format!("wss://{host}/ws/board/{board_id}/{token}"));
    }

    Err(SyncError::Transport(format!("invalid base URL: {base_url}")))
}

/// Classify a close code: `None` is a normal close, `Some` an error.
pub(crate) fn classify_close(code: u16) -> Option<SyncError> {
    match code {
        1000 => None,
        4001 | 4003 => Some(SyncError::Unauthorized),
        other => Some(SyncError::Transport(format!(
            "connection closed abnormally (code {other})"
        ))),
    }
}

#[derive(Debug)]
enum Command {
    Send(ClientAction),
    Apply(LocalMutation),
    Close,
}

/// Handle to one open board connection.
///
/// Cheap to clone; all clones feed the same actor. Once the actor has exited
/// every method degrades to a logged no-op.
#[derive(Clone, Debug)]
pub struct BoardHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<BoardState>,
}

impl BoardHandle {
    /// Fire-and-forget one action to the server. A no-op with a reported
    /// error when the socket is not open — never throws, never queues.
    pub fn send(&self, action: ClientAction) {
        if self.commands.send(Command::Send(action)).is_err() {
            tracing::warn!("board connection is closed; outbound action dropped");
        }
    }

    /// Apply an optimistic mutation on the connection's event loop.
    pub fn apply(&self, mutation: LocalMutation) {
        if self.commands.send(Command::Apply(mutation)).is_err() {
            tracing::warn!("board connection is closed; local mutation dropped");
        }
    }

    /// Close the connection with code 1000 and destroy its state.
    pub fn close(&self) {
        if self.commands.send(Command::Close).is_err() {
            tracing::debug!("board connection already closed");
        }
    }

    /// Watch receiver for state snapshots.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<BoardState> {
        self.state.clone()
    }

    /// The most recent state snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BoardState {
        self.state.borrow().clone()
    }
}

/// Owns the single live connection; opening a new board closes the old one
/// first, so exactly one socket exists at a time.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    active: Option<BoardHandle>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a board connection, tearing down any prior one synchronously.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(&mut self, config: ConnectConfig) -> BoardHandle {
        self.close();
        let handle = connect(config);
        self.active = Some(handle.clone());
        handle
    }

    /// Close the live connection, if any.
    pub fn close(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.close();
        }
    }

    /// The live connection's handle, if one is open.
    #[must_use]
    pub fn active(&self) -> Option<&BoardHandle> {
        self.active.as_ref()
    }
}

/// Spawn the connection actor for one board and return its handle.
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn connect(config: ConnectConfig) -> BoardHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(BoardState::default());
    tokio::spawn(run_connection(config, command_rx, state_tx));
    BoardHandle { commands: command_tx, state: state_rx }
}

/// How a connection ended.
enum Closure {
    /// `close()` was called locally; we sent code 1000.
    Local,
    /// The server closed with code 1000.
    Normal,
    /// The server closed with 4001/4003. Terminal.
    Unauthorized,
    /// Socket error, abnormal close, or failed connect.
    Transport(SyncError),
}

async fn run_connection(
    config: ConnectConfig,
    mut commands: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<BoardState>,
) {
    let mut previous_delay: Option<Duration> = None;

    let closure = loop {
        publish_fresh(&state_tx, &config, ConnectionStatus::Connecting);
        if drain_while_disconnected(&mut commands) {
            break Closure::Local;
        }

        let url = match ws_url(&config.base_url, config.board_id, &config.token) {
            Ok(url) => url,
            Err(error) => break Closure::Transport(error),
        };

        match connect_async(&url).await {
            Ok((socket, _)) => {
                tracing::info!(board_id = config.board_id, "board connection established");
                publish_fresh(&state_tx, &config, ConnectionStatus::Connected);

                match drive_socket(socket, &mut commands, &state_tx).await {
                    Closure::Transport(error) => {
                        match config.reconnect.next_delay(previous_delay) {
                            Some(delay) => {
                                tracing::warn!(%error, ?delay, "transport dropped; retrying");
                                previous_delay = Some(delay);
                                tokio::time::sleep(delay).await;
                            }
                            None => break Closure::Transport(error),
                        }
                    }
                    other => break other,
                }
            }
            Err(error) => {
                let error = SyncError::Transport(error.to_string());
                match config.reconnect.next_delay(previous_delay) {
                    Some(delay) => {
                        tracing::warn!(%error, ?delay, "connect failed; retrying");
                        previous_delay = Some(delay);
                        tokio::time::sleep(delay).await;
                    }
                    None => break Closure::Transport(error),
                }
            }
        }
    };

    // Teardown destroys every board-scoped collection; only the closure
    // reason survives into the terminal snapshot.
    let last_error = match closure {
        Closure::Local | Closure::Normal => None,
        Closure::Unauthorized => Some(SyncError::Unauthorized),
        Closure::Transport(error) => Some(error),
    };
    state_tx.send_replace(BoardState::closed(last_error));
    tracing::info!(board_id = config.board_id, "board connection closed");
}

async fn drive_socket(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    commands: &mut mpsc::UnboundedReceiver<Command>,
    state_tx: &watch::Sender<BoardState>,
) -> Closure {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Send(action)) => {
                    let text = wire::encode_client_action(&action);
                    if let Err(error) = sink.send(Message::Text(text.into())).await {
                        return Closure::Transport(SyncError::Transport(error.to_string()));
                    }
                }
                Some(Command::Apply(mutation)) => {
                    state_tx.send_modify(|state| {
                        state.apply_local(mutation);
                    });
                }
                Some(Command::Close) | None => {
                    let frame = CloseFrame { code: CloseCode::Normal, reason: "board switch".into() };
                    if let Err(error) = sink.send(Message::Close(Some(frame))).await {
                        tracing::debug!(%error, "close frame not delivered");
                    }
                    return Closure::Local;
                }
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => handle_text(text.as_str(), state_tx),
                Some(Ok(Message::Close(frame))) => {
                    // 1005 = no status code present.
                    let code = frame.as_ref().map_or(1005, |f| u16::from(f.code));
                    return match classify_close(code) {
                        None => Closure::Normal,
                        Some(SyncError::Unauthorized) => Closure::Unauthorized,
                        Some(error) => Closure::Transport(error),
                    };
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    return Closure::Transport(SyncError::Transport(error.to_string()));
                }
                None => {
                    return Closure::Transport(SyncError::Transport("connection dropped".to_owned()));
                }
            },
        }
    }
}

fn handle_text(text: &str, state_tx: &watch::Sender<BoardState>) {
    match wire::decode_server_message(text) {
        Ok(ServerMessage::Unknown { action }) => {
            tracing::warn!(action, "ignoring unknown server action");
        }
        Ok(message) => state_tx.send_modify(|state| state.apply_server(message)),
        Err(error) => {
            // Dropped silently on the wire; surfaced as a non-fatal error.
            tracing::warn!(%error, "dropping undecodable server frame");
            state_tx.send_modify(|state| {
                state.last_error = Some(SyncError::Protocol(error.to_string()));
            });
        }
    }
}

/// Publish a fresh board-scoped state so stale data from a previous board or
/// attempt is never visible.
fn publish_fresh(state_tx: &watch::Sender<BoardState>, config: &ConnectConfig, status: ConnectionStatus) {
    state_tx.send_replace(BoardState::fresh(config.board_id, config.self_user_id, status));
}

/// Handle commands that arrive while no socket is open: sends and mutations
/// are reported and dropped, never queued, and `Close` aborts the actor.
/// Returns `true` when the actor should stop.
fn drain_while_disconnected(commands: &mut mpsc::UnboundedReceiver<Command>) -> bool {
    loop {
        match commands.try_recv() {
            Ok(Command::Send(_)) => {
                tracing::warn!("not connected to board; outbound action dropped");
            }
            Ok(Command::Apply(_)) => {
                tracing::warn!("not connected to board; local mutation dropped");
            }
            Ok(Command::Close) => return true,
            Err(mpsc::error::TryRecvError::Empty) => return false,
            Err(mpsc::error::TryRecvError::Disconnected) => return true,
        }
    }
}
