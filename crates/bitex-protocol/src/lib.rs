//! bitex-protocol
//!
//! Wire-level encoding/decoding for the BitEx client.
//!
//! This crate turns logical commands (`bitex_core::Command`) into JSON
//! frames, and inbound JSON text into published `bitex_core::Event`s.
//!
//! - [`wire_types`]    : discriminator codes, field names, scale constants
//! - [`command_codec`] : command -> frame -> text
//! - [`dispatcher`]    : text -> frame -> events

pub mod wire_types;
pub mod error;
pub mod command_codec;
pub mod dispatcher;

pub use error::ProtocolError;
pub use command_codec::{encode_command, encode_command_text, scale_price, scale_quantity};
pub use dispatcher::{decode_frame, dispatch, handle_text};
