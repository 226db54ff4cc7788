//! The duplex text channel under the client.
//!
//! A [`Connector`] opens a channel and hands back a [`Transport`] for
//! the outbound side. Everything the channel observes (open, close,
//! error, inbound text) arrives as a [`TransportEvent`] on the sender it
//! was given, in order, one at a time.

use tokio::sync::mpsc;

/// Callbacks from the channel, as values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Closed,
    Error(String),
    Message(String),
}

pub type TransportEventTx = mpsc::UnboundedSender<TransportEvent>;
pub type TransportEventRx = mpsc::UnboundedReceiver<TransportEvent>;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No usable channel implementation for this URL / environment.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The channel is gone; nothing more can be sent.
    #[error("transport closed")]
    Closed,
}

/// Outbound half of an open channel.
pub trait Transport: Send {
    /// Queue one text frame. Must not block.
    fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Start closing the channel. A `Closed` event follows.
    fn close(&mut self) -> Result<(), TransportError>;
}

/// Something that can open a channel to a URL.
pub trait Connector {
    /// Open a channel to `url`, reporting its events on `events`.
    ///
    /// Failing here means no channel was created at all.
    fn open(&self, url: &str, events: TransportEventTx)
        -> Result<Box<dyn Transport>, TransportError>;
}
