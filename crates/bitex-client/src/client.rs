// crates/bitex-client/src/client.rs

use bitex_core::{
    CancelOrder, ChangePassword, Command, Event, EventBus, EventSink, EventType, Frame,
    IdGenerator, Login, MarketDataSubscribe, NewOrder, OrderType, RandomIdGenerator, Side, Signup,
};
use bitex_protocol::wire_types::{MD_REQ_ID_BOUND, REQUEST_ID_BOUND};
use bitex_protocol::{command_codec, dispatcher, ProtocolError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::transport::{Connector, Transport, TransportError, TransportEvent, TransportEventRx};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No open connection.
    #[error("not connected")]
    NotConnected,

    /// `open` called while a connection is live.
    #[error("connection already open")]
    AlreadyOpen,

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// A BitEx session over one duplex channel.
///
/// Outbound calls encode a command and hand the text to the transport
/// without waiting for an answer. Answers come back through
/// [`BitExClient::handle_transport_event`], which publishes them on the
/// client's [`EventBus`] before returning.
pub struct BitExClient {
    transport: Option<Box<dyn Transport>>,
    events: EventBus,
    ids: Box<dyn IdGenerator>,
}

impl Default for BitExClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BitExClient {
    pub fn new() -> Self {
        Self::with_id_generator(RandomIdGenerator)
    }

    /// Client drawing request and order ids from `ids`.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            transport: None,
            events: EventBus::new(),
            ids: Box::new(ids),
        }
    }

    /// Listener registry; subscribe here.
    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    // -------------------------------------------------------------------------
    // Connection lifecycle
    // -------------------------------------------------------------------------

    /// Open a channel to `url`.
    ///
    /// Returns the receiver of the channel's events; feed each one to
    /// [`handle_transport_event`](Self::handle_transport_event).
    pub fn open<C: Connector + ?Sized>(
        &mut self,
        url: &str,
        connector: &C,
    ) -> Result<TransportEventRx, ClientError> {
        if self.transport.is_some() {
            return Err(ClientError::AlreadyOpen);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let transport = connector.open(url, tx)?;
        self.transport = Some(transport);
        info!("Opened channel to {}", url);
        Ok(rx)
    }

    /// Close the channel and release the handle.
    ///
    /// The handle is released even if the transport reports an error.
    pub fn close(&mut self) -> Result<(), ClientError> {
        let mut transport = self.transport.take().ok_or(ClientError::NotConnected)?;
        transport.close()?;
        info!("Closed channel");
        Ok(())
    }

    /// React to one channel callback.
    ///
    /// Inbound text is decoded and dispatched; a decode error is returned
    /// and nothing but the error surfaces for that frame.
    pub fn handle_transport_event(&mut self, event: TransportEvent) -> Result<(), ClientError> {
        match event {
            TransportEvent::Opened => self.events.publish(Event::bare(EventType::Opened)),
            TransportEvent::Closed => {
                self.transport = None;
                self.events.publish(Event::bare(EventType::Closed));
            }
            TransportEvent::Error(reason) => {
                warn!("Transport error: {}", reason);
                self.events.publish(Event::bare(EventType::Error));
            }
            TransportEvent::Message(text) => {
                if self.transport.is_none() {
                    warn!("Ignoring message received while closed");
                    return Ok(());
                }
                dispatcher::handle_text(&text, &mut self.events)?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        self.send_command(&Command::Login(Login {
            username: username.to_string(),
            password: password.to_string(),
        }))
    }

    pub fn change_password(
        &mut self,
        password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        self.send_command(&Command::ChangePassword(ChangePassword {
            password: password.to_string(),
            new_password: new_password.to_string(),
        }))
    }

    pub fn signup(
        &mut self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<(), ClientError> {
        self.send_command(&Command::Signup(Signup {
            username: username.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        }))
    }

    /// Send a test request; the venue answers with a heartbeat.
    pub fn test_request(&mut self) -> Result<(), ClientError> {
        self.ensure_open()?;
        let test_req_id = self.ids.next_correlation();
        self.send_command(&Command::TestRequest { test_req_id })
    }

    // -------------------------------------------------------------------------
    // Market data
    // -------------------------------------------------------------------------

    /// Subscribe to incremental market data. Returns the `MDReqID`
    /// needed to unsubscribe.
    pub fn subscribe_market_data(
        &mut self,
        market_depth: u32,
        symbols: &[String],
        entry_types: &[String],
    ) -> Result<u64, ClientError> {
        self.ensure_open()?;
        let md_req_id = self.ids.next_id(MD_REQ_ID_BOUND);
        self.send_command(&Command::SubscribeMarketData(MarketDataSubscribe {
            md_req_id,
            market_depth,
            symbols: symbols.to_vec(),
            entry_types: entry_types.to_vec(),
        }))?;
        Ok(md_req_id)
    }

    pub fn unsubscribe_market_data(&mut self, md_req_id: u64) -> Result<(), ClientError> {
        self.send_command(&Command::UnsubscribeMarketData { md_req_id })
    }

    // -------------------------------------------------------------------------
    // Account
    // -------------------------------------------------------------------------

    /// Ask for open orders. Returns the request id used.
    pub fn request_open_orders(&mut self, request_id: Option<u64>) -> Result<u64, ClientError> {
        self.ensure_open()?;
        let request_id = request_id.unwrap_or_else(|| self.ids.next_id(REQUEST_ID_BOUND));
        self.send_command(&Command::RequestOpenOrders { request_id })?;
        Ok(request_id)
    }

    /// Ask for balances. Returns the request id used.
    pub fn request_balance(&mut self, request_id: Option<u64>) -> Result<u64, ClientError> {
        self.ensure_open()?;
        let request_id = request_id.unwrap_or_else(|| self.ids.next_id(REQUEST_ID_BOUND));
        self.send_command(&Command::RequestBalance { request_id })?;
        Ok(request_id)
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Send a new order. Returns the client order id used.
    ///
    /// `price` and `quantity` are in natural units; they go out as
    /// fixed-point integers. Without an order type the order is a limit
    /// order.
    pub fn send_order(
        &mut self,
        symbol: &str,
        quantity: f64,
        price: f64,
        side: Side,
        client_order_id: Option<u64>,
        order_type: Option<OrderType>,
    ) -> Result<u64, ClientError> {
        self.ensure_open()?;
        let client_order_id =
            client_order_id.unwrap_or_else(|| self.ids.next_id(REQUEST_ID_BOUND));
        self.send_command(&Command::NewOrder(NewOrder {
            client_order_id,
            symbol: symbol.to_string(),
            side,
            order_type: order_type.unwrap_or_default(),
            price,
            quantity,
        }))?;
        Ok(client_order_id)
    }

    pub fn send_buy_limit_order(
        &mut self,
        symbol: &str,
        quantity: f64,
        price: f64,
        client_order_id: Option<u64>,
    ) -> Result<u64, ClientError> {
        self.send_order(
            symbol,
            quantity,
            price,
            Side::Buy,
            client_order_id,
            Some(OrderType::Limit),
        )
    }

    pub fn send_sell_limit_order(
        &mut self,
        symbol: &str,
        quantity: f64,
        price: f64,
        client_order_id: Option<u64>,
    ) -> Result<u64, ClientError> {
        self.send_order(
            symbol,
            quantity,
            price,
            Side::Sell,
            client_order_id,
            Some(OrderType::Limit),
        )
    }

    /// Cancel by client order id, or by venue order id when no client
    /// order id is given.
    pub fn cancel_order(
        &mut self,
        client_order_id: Option<&str>,
        order_id: Option<&str>,
    ) -> Result<(), ClientError> {
        self.send_command(&Command::CancelOrder(CancelOrder {
            client_order_id: client_order_id.map(str::to_string),
            order_id: order_id.map(str::to_string),
        }))
    }

    /// Send a caller-built frame as is.
    pub fn send_raw(&mut self, frame: &Frame) -> Result<(), ClientError> {
        let text = serde_json::to_string(frame).map_err(ProtocolError::from)?;
        self.send_text(text)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.transport.is_some() {
            Ok(())
        } else {
            Err(ClientError::NotConnected)
        }
    }

    fn send_command(&mut self, cmd: &Command) -> Result<(), ClientError> {
        let text = command_codec::encode_command_text(cmd)?;
        debug!("Sending {}", cmd.name());
        self.send_text(text)
    }

    fn send_text(&mut self, text: String) -> Result<(), ClientError> {
        let transport = self.transport.as_mut().ok_or(ClientError::NotConnected)?;
        transport.send(text)?;
        Ok(())
    }
}

impl std::fmt::Debug for BitExClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitExClient")
            .field("open", &self.is_open())
            .field("events", &self.events)
            .finish()
    }
}
