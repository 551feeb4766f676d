//! WebSocket networking for the board channel.

pub mod connection;
