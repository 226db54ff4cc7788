//! Logical outbound commands.
//!
//! These are **transport-agnostic** requests the client sends to the
//! venue. Every identifier is already resolved (caller-supplied or
//! generated) by the time a `Command` exists; turning one into a JSON
//! frame is the job of the `bitex-protocol` crate.

use crate::order_type::OrderType;
use crate::side::Side;

/// One JSON object exchanged over the connection.
///
/// Inbound frames are parsed fresh per delivery and outbound frames are
/// built fresh per call; nothing keeps a frame around afterwards.
pub type Frame = serde_json::Map<String, serde_json::Value>;

/// A high-level request to the venue.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Authenticate the session.
    Login(Login),

    /// Change the password of the logged-in user.
    ChangePassword(ChangePassword),

    /// Subscribe to incremental market data.
    SubscribeMarketData(MarketDataSubscribe),

    /// Drop a subscription by its `MDReqID`.
    UnsubscribeMarketData { md_req_id: u64 },

    /// Register a new account.
    Signup(Signup),

    /// Ask for the list of open orders.
    RequestOpenOrders { request_id: u64 },

    /// Ask for account balances.
    RequestBalance { request_id: u64 },

    /// New single order.
    NewOrder(NewOrder),

    /// Cancel a resting order.
    CancelOrder(CancelOrder),

    /// Test request; the venue answers with a heartbeat.
    TestRequest { test_req_id: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePassword {
    pub password: String,
    pub new_password: String,
}

/// Market data subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDataSubscribe {
    /// Correlates the later unsubscribe.
    pub md_req_id: u64,

    /// Requested book depth; `1` means top of book only.
    pub market_depth: u32,

    /// Instruments, e.g. `"BTCUSD"`.
    pub symbols: Vec<String>,

    /// Entry type codes (`"0"` bid, `"1"` offer, `"2"` trade).
    pub entry_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// New order (input).
///
/// Price and quantity stay in natural units here; the wire layer scales
/// them to fixed-point integers.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub client_order_id: u64,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: f64,
    pub quantity: f64,
}

/// Cancel request.
///
/// When both ids are present the client order id wins; the order id is
/// only used as a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CancelOrder {
    pub client_order_id: Option<String>,
    pub order_id: Option<String>,
}

impl Command {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login(_) => "login",
            Command::ChangePassword(_) => "change_password",
            Command::SubscribeMarketData(_) => "subscribe_market_data",
            Command::UnsubscribeMarketData { .. } => "unsubscribe_market_data",
            Command::Signup(_) => "signup",
            Command::RequestOpenOrders { .. } => "request_open_orders",
            Command::RequestBalance { .. } => "request_balance",
            Command::NewOrder(_) => "new_order",
            Command::CancelOrder(_) => "cancel_order",
            Command::TestRequest { .. } => "test_request",
        }
    }
}
