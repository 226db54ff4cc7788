//! Events raised by the client.
//!
//! An [`Event`] is a kind plus an optional payload. The kind set is
//! closed; every kind has a stable string name that listeners and logs
//! can rely on.

use std::fmt;

use crate::messages::Frame;

/// Every event the client can publish.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    // Connection
    Opened,
    Closed,
    Error,

    RawMessage,
    LoginOk,
    LoginError,

    // Trading
    BalanceResponse,
    OrderListResponse,
    Heartbeat,
    ExecutionReport,

    // Market data
    MarketDataFullRefresh,
    MarketDataIncrementalRefresh,
    MarketDataRequestReject,
    Trade,
    TradeClear,
    OrderBookClear,
    OrderBookDeleteOrdersThru,
    OrderBookDeleteOrder,
    OrderBookNewOrder,
    OrderBookUpdateOrder,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Opened => "opened",
            EventType::Closed => "closed",
            EventType::Error => "error",
            EventType::RawMessage => "raw_message",
            EventType::LoginOk => "login_ok",
            EventType::LoginError => "login_error",
            EventType::BalanceResponse => "balance_response",
            EventType::OrderListResponse => "order_list_response",
            EventType::Heartbeat => "heartbeat",
            EventType::ExecutionReport => "execution_report",
            EventType::MarketDataFullRefresh => "md_full_refresh",
            EventType::MarketDataIncrementalRefresh => "md_incremental_refresh",
            EventType::MarketDataRequestReject => "md_request_reject",
            EventType::Trade => "trade",
            EventType::TradeClear => "trade_clear",
            EventType::OrderBookClear => "ob_clear",
            EventType::OrderBookDeleteOrdersThru => "ob_delete_orders_thru",
            EventType::OrderBookDeleteOrder => "ob_delete_order",
            EventType::OrderBookNewOrder => "ob_new_order",
            EventType::OrderBookUpdateOrder => "ob_update_order",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an event carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The whole decoded frame.
    Frame(Frame),

    /// One element of a market data group (`MDFullGrp` / `MDIncGrp`).
    Entry(Frame),
}

impl Payload {
    /// The underlying JSON object, whichever variant this is.
    pub fn as_object(&self) -> &Frame {
        match self {
            Payload::Frame(f) | Payload::Entry(f) => f,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventType,
    pub payload: Option<Payload>,
}

impl Event {
    /// Event with no payload.
    pub fn bare(kind: EventType) -> Self {
        Event {
            kind,
            payload: None,
        }
    }

    /// Event carrying a whole frame.
    pub fn frame(kind: EventType, frame: &Frame) -> Self {
        Event {
            kind,
            payload: Some(Payload::Frame(frame.clone())),
        }
    }

    /// Event carrying a single group entry.
    pub fn entry(kind: EventType, entry: &Frame) -> Self {
        Event {
            kind,
            payload: Some(Payload::Entry(entry.clone())),
        }
    }

    /// Convenience: a string field of the payload object, if any.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|p| p.as_object().get(name))
            .and_then(|v| v.as_str())
    }
}
