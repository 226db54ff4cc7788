//! Low-level wire types and constants.
//!
//! This module defines:
//! - `MsgType` codes for every frame the client sends or understands.
//! - Market data entry / update / book type codes.
//! - Field names, fixed-point scales and id bounds.
//!
//! The actual encode/dispatch logic lives in `command_codec` and
//! `dispatcher`.

use serde_json::Value;

/// Fixed-point scale for prices on the wire.
pub const PRICE_SCALE: f64 = 1e5;

/// Fixed-point scale for quantities on the wire.
pub const QTY_SCALE: f64 = 1e8;

/// Upper bound (exclusive) for generated `MDReqID`s.
pub const MD_REQ_ID_BOUND: u64 = 1_000_000;

/// Upper bound (exclusive) for generated request and client order ids.
pub const REQUEST_ID_BOUND: u64 = 10_000_000;

/// Frame discriminator (`MsgType`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MsgType {
    /// Heartbeat (in).
    Heartbeat,

    /// Test request (out).
    TestRequest,

    /// Execution report (in).
    ExecutionReport,

    /// New order single (out).
    NewOrderSingle,

    /// Order cancel request (out).
    OrderCancelRequest,

    /// Market data subscribe / unsubscribe (out).
    MarketDataRequest,

    /// Market data snapshot (in).
    MarketDataFullRefresh,

    /// Market data incremental refresh (in).
    MarketDataIncrementalRefresh,

    /// Market data request reject (in).
    MarketDataRequestReject,

    /// Login and change password share this type (out).
    UserRequest,

    /// Login response (in).
    UserResponse,

    /// Account sign-up (out).
    SignupRequest,

    /// Balance request (out).
    BalanceRequest,

    /// Balance response (in).
    BalanceResponse,

    /// Open orders request (out).
    OrderListRequest,

    /// Open orders response (in).
    OrderListResponse,
}

impl MsgType {
    pub fn code(self) -> &'static str {
        match self {
            MsgType::Heartbeat => "0",
            MsgType::TestRequest => "1",
            MsgType::ExecutionReport => "8",
            MsgType::NewOrderSingle => "D",
            MsgType::OrderCancelRequest => "F",
            MsgType::MarketDataRequest => "V",
            MsgType::MarketDataFullRefresh => "W",
            MsgType::MarketDataIncrementalRefresh => "X",
            MsgType::MarketDataRequestReject => "Y",
            MsgType::UserRequest => "BE",
            MsgType::UserResponse => "BF",
            MsgType::SignupRequest => "U0",
            MsgType::BalanceRequest => "U2",
            MsgType::BalanceResponse => "U3",
            MsgType::OrderListRequest => "U4",
            MsgType::OrderListResponse => "U5",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(MsgType::Heartbeat),
            "1" => Some(MsgType::TestRequest),
            "8" => Some(MsgType::ExecutionReport),
            "D" => Some(MsgType::NewOrderSingle),
            "F" => Some(MsgType::OrderCancelRequest),
            "V" => Some(MsgType::MarketDataRequest),
            "W" => Some(MsgType::MarketDataFullRefresh),
            "X" => Some(MsgType::MarketDataIncrementalRefresh),
            "Y" => Some(MsgType::MarketDataRequestReject),
            "BE" => Some(MsgType::UserRequest),
            "BF" => Some(MsgType::UserResponse),
            "U0" => Some(MsgType::SignupRequest),
            "U2" => Some(MsgType::BalanceRequest),
            "U3" => Some(MsgType::BalanceResponse),
            "U4" => Some(MsgType::OrderListRequest),
            "U5" => Some(MsgType::OrderListResponse),
            _ => None,
        }
    }
}

/// `MDEntryType` of a market data entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    Bid,
    Offer,
    Trade,
}

impl EntryType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(EntryType::Bid),
            "1" => Some(EntryType::Offer),
            "2" => Some(EntryType::Trade),
            _ => None,
        }
    }
}

/// `MDUpdateAction` of an incremental entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    New,
    Change,
    Delete,
    /// Delete every order from the top of the book through this one.
    DeleteThru,
}

impl UpdateAction {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(UpdateAction::New),
            "1" => Some(UpdateAction::Change),
            "2" => Some(UpdateAction::Delete),
            "3" => Some(UpdateAction::DeleteThru),
            _ => None,
        }
    }
}

/// `MDBkTyp` of an incremental refresh.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BookType {
    /// Order depth: one entry per resting order.
    OrderDepth,
    /// Anything else (top of book, price depth, ...). Not expanded.
    Other,
}

impl BookType {
    /// Order depth is `3`, compared loosely; a missing field is `Other`.
    pub fn from_value(value: Option<&Value>) -> Self {
        if value.is_some_and(|v| loosely_equals(v, 3.0)) {
            BookType::OrderDepth
        } else {
            BookType::Other
        }
    }
}

/// Field names used on the wire.
pub mod field {
    pub const MSG_TYPE: &str = "MsgType";

    pub const USER_REQ_ID: &str = "UserReqID";
    pub const USER_REQ_TYP: &str = "UserReqTyp";
    pub const USERNAME: &str = "Username";
    pub const PASSWORD: &str = "Password";
    pub const NEW_PASSWORD: &str = "NewPassword";
    pub const USER_STATUS: &str = "UserStatus";
    pub const FIRST_NAME: &str = "FirstName";
    pub const LAST_NAME: &str = "LastName";
    pub const EMAIL: &str = "Email";

    pub const MD_REQ_ID: &str = "MDReqID";
    pub const SUBSCRIPTION_REQUEST_TYPE: &str = "SubscriptionRequestType";
    pub const MARKET_DEPTH: &str = "MarketDepth";
    pub const MD_UPDATE_TYPE: &str = "MDUpdateType";
    pub const MD_ENTRY_TYPES: &str = "MDEntryTypes";
    pub const INSTRUMENTS: &str = "Instruments";
    pub const MD_FULL_GRP: &str = "MDFullGrp";
    pub const MD_INC_GRP: &str = "MDIncGrp";
    pub const MD_ENTRY_TYPE: &str = "MDEntryType";
    pub const MD_UPDATE_ACTION: &str = "MDUpdateAction";
    pub const MD_BK_TYP: &str = "MDBkTyp";

    pub const OPEN_ORDERS_REQ_ID: &str = "OpenOrdersReqID";
    pub const BALANCE_REQ_ID: &str = "BalanceReqID";

    pub const CL_ORD_ID: &str = "ClOrdID";
    pub const ORIG_CL_ORD_ID: &str = "OrigClOrdID";
    pub const ORDER_ID: &str = "OrderID";
    pub const SYMBOL: &str = "Symbol";
    pub const SIDE: &str = "Side";
    pub const ORD_TYPE: &str = "OrdType";
    pub const PRICE: &str = "Price";
    pub const ORDER_QTY: &str = "OrderQty";

    pub const TEST_REQ_ID: &str = "TestReqID";
}

/// Request type markers carried in the user / subscription requests.
pub mod marker {
    pub const LOGIN_REQ_ID: &str = "1";
    pub const LOGIN_REQ_TYP: &str = "1";
    pub const CHANGE_PASSWORD_REQ_ID: &str = "3";

    pub const SUBSCRIBE: &str = "1";
    pub const UNSUBSCRIBE: &str = "2";
    pub const INCREMENTAL_UPDATES: &str = "1";

    /// `UserStatus` of an authenticated session.
    pub const USER_STATUS_ACTIVE: f64 = 1.0;

    /// `MarketDepth` of a top-of-book-only snapshot.
    pub const TOP_OF_BOOK_DEPTH: f64 = 1.0;
}

/// Numeric comparison with coercion for status-like fields.
///
/// Numbers compare by value. Booleans count as `0`/`1`. Strings are
/// read as decimal, hex (`0x`), octal (`0o`) or binary (`0b`) numbers
/// after trimming whitespace, with the empty string as `0`. `null`,
/// arrays and objects never match.
pub fn loosely_equals(value: &Value, expected: f64) -> bool {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_number(s),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    number == Some(expected)
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&text[2..], radix).ok().map(|n| n as f64);
    }

    // f64's parser also takes "inf" and "nan" spellings; only digits,
    // signs, points and exponents are numbers here.
    let numeric = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if numeric {
        text.parse().ok()
    } else {
        None
    }
}
