//! bitex-client
//!
//! Client for the BitEx venue over a single WebSocket connection.
//!
//! - [`client`]    : connection lifecycle, outbound commands, inbound dispatch
//! - [`transport`] : the duplex text channel the client talks through
//! - [`websocket`] : tokio-tungstenite implementation of that channel
//! - [`config`]    : file / environment configuration for the console

pub mod config;
pub mod transport;
pub mod websocket;
pub mod client;

pub use client::{BitExClient, ClientError};
pub use config::{ClientConfig, ConfigError};
pub use transport::{
    Connector, Transport, TransportError, TransportEvent, TransportEventRx, TransportEventTx,
};
pub use websocket::WebSocketConnector;
