// crates/bitex-client/src/websocket.rs

use futures::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::transport::{Connector, Transport, TransportError, TransportEvent, TransportEventTx};

/// Opens WebSocket channels on the current tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    fn open(
        &self,
        url: &str,
        events: TransportEventTx,
    ) -> Result<Box<dyn Transport>, TransportError> {
        let parsed = Url::parse(url)?;
        match parsed.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(TransportError::Unavailable(format!(
                    "unsupported scheme `{}`",
                    other
                )))
            }
        }

        let runtime = Handle::try_current()
            .map_err(|_| TransportError::Unavailable("no tokio runtime".to_string()))?;

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        runtime.spawn(run_connection(url.to_string(), outbound_rx, events));

        Ok(Box::new(WebSocketTransport {
            outbound: outbound_tx,
        }))
    }
}

#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// Handle to a connection task. Dropping it closes the socket.
struct WebSocketTransport {
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl Transport for WebSocketTransport {
    fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.outbound
            .send(Outbound::Text(text))
            .map_err(|_| TransportError::Closed)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.outbound
            .send(Outbound::Close)
            .map_err(|_| TransportError::Closed)
    }
}

async fn run_connection(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: TransportEventTx,
) {
    info!("Connecting to {}...", url);

    let ws = match connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            error!("Connection failed: {}", e);
            let _ = events.send(TransportEvent::Error(e.to_string()));
            let _ = events.send(TransportEvent::Closed);
            return;
        }
    };

    info!("Connected to {}", url);
    let _ = events.send(TransportEvent::Opened);

    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            cmd = outbound.recv() => match cmd {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        error!("Failed to send frame: {}", e);
                        let _ = events.send(TransportEvent::Error(e.to_string()));
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    debug!("Closing connection to {}", url);
                    if let Err(e) = write.send(Message::Close(None)).await {
                        warn!("Close handshake failed: {}", e);
                    }
                    break;
                }
            },

            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if events.send(TransportEvent::Message(text.as_str().to_owned())).is_err() {
                        debug!("Event receiver dropped, shutting down connection");
                        break;
                    }
                }
                Some(Ok(Message::Ping(data))) => {
                    trace!("Received ping");
                    if let Err(e) = write.send(Message::Pong(data)).await {
                        error!("Failed to answer ping: {}", e);
                        let _ = events.send(TransportEvent::Error(e.to_string()));
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("Server closed connection: {:?}", frame);
                    break;
                }
                Some(Ok(other)) => {
                    trace!("Ignoring non-text frame: {:?}", other);
                }
                Some(Err(e)) => {
                    error!("Read error: {}", e);
                    let _ = events.send(TransportEvent::Error(e.to_string()));
                    break;
                }
                None => break,
            },
        }
    }

    info!("Connection to {} closed", url);
    let _ = events.send(TransportEvent::Closed);
}
