//! Command encoding.
//!
//! Converts a `bitex_core::Command` into the JSON frame the venue
//! expects. Frame shapes:
//!
//! ```text
//! Login              {MsgType:"BE", UserReqID:"1", Username, Password, UserReqTyp:"1"}
//! ChangePassword     {MsgType:"BE", UserReqID:"3", Password, NewPassword}
//! Subscribe          {MsgType:"V", MDReqID, SubscriptionRequestType:"1", MarketDepth,
//!                     MDUpdateType:"1", MDEntryTypes, Instruments}
//! Unsubscribe        {MsgType:"V", MDReqID, SubscriptionRequestType:"2"}
//! Signup             {MsgType:"U0", Username, Password, FirstName, LastName, Email}
//! RequestBalance     {MsgType:"U2", BalanceReqID}
//! RequestOpenOrders  {MsgType:"U4", OpenOrdersReqID}
//! NewOrder           {MsgType:"D", ClOrdID:"<id>", Symbol, Side, OrdType, Price, OrderQty}
//! CancelOrder        {MsgType:"F", OrigClOrdID | OrderID}
//! TestRequest        {MsgType:"1", TestReqID}
//! ```
//!
//! `Price` and `OrderQty` are fixed-point integers (scale 1e5 and 1e8,
//! truncated toward zero). Downstream systems expect exactly these
//! units. An amount that is NaN, infinite or out of `i64` range is an
//! error; the order is never sent.

use bitex_core::{
    CancelOrder, ChangePassword, Command, Frame, Login, MarketDataSubscribe, NewOrder, Signup,
};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::wire_types::{field, marker, MsgType, PRICE_SCALE, QTY_SCALE};

/// Build the frame for a command.
pub fn encode_command(cmd: &Command) -> Result<Frame, ProtocolError> {
    let frame = match cmd {
        Command::Login(l) => encode_login(l),
        Command::ChangePassword(c) => encode_change_password(c),
        Command::SubscribeMarketData(s) => encode_subscribe(s),
        Command::UnsubscribeMarketData { md_req_id } => encode_unsubscribe(*md_req_id),
        Command::Signup(s) => encode_signup(s),
        Command::RequestOpenOrders { request_id } => {
            let mut f = new_frame(MsgType::OrderListRequest);
            f.insert(field::OPEN_ORDERS_REQ_ID.into(), Value::from(*request_id));
            f
        }
        Command::RequestBalance { request_id } => {
            let mut f = new_frame(MsgType::BalanceRequest);
            f.insert(field::BALANCE_REQ_ID.into(), Value::from(*request_id));
            f
        }
        Command::NewOrder(n) => encode_new_order(n)?,
        Command::CancelOrder(c) => encode_cancel(c),
        Command::TestRequest { test_req_id } => {
            let mut f = new_frame(MsgType::TestRequest);
            f.insert(field::TEST_REQ_ID.into(), Value::from(*test_req_id));
            f
        }
    };
    Ok(frame)
}

/// Build the frame for a command and serialize it to JSON text.
pub fn encode_command_text(cmd: &Command) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(&encode_command(cmd)?)?)
}

/// Price in venue fixed-point units.
pub fn scale_price(price: f64) -> Result<i64, ProtocolError> {
    to_fixed_point(field::PRICE, price, PRICE_SCALE)
}

/// Quantity in venue fixed-point units.
pub fn scale_quantity(quantity: f64) -> Result<i64, ProtocolError> {
    to_fixed_point(field::ORDER_QTY, quantity, QTY_SCALE)
}

fn to_fixed_point(name: &'static str, value: f64, scale: f64) -> Result<i64, ProtocolError> {
    let scaled = (value * scale).trunc();
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    if scaled.is_finite() && scaled >= i64::MIN as f64 && scaled < i64::MAX as f64 {
        Ok(scaled as i64)
    } else {
        Err(ProtocolError::InvalidAmount { field: name, value })
    }
}

fn new_frame(msg_type: MsgType) -> Frame {
    let mut f = Frame::new();
    f.insert(field::MSG_TYPE.into(), Value::from(msg_type.code()));
    f
}

fn encode_login(l: &Login) -> Frame {
    let mut f = new_frame(MsgType::UserRequest);
    f.insert(field::USER_REQ_ID.into(), Value::from(marker::LOGIN_REQ_ID));
    f.insert(field::USERNAME.into(), Value::from(l.username.as_str()));
    f.insert(field::PASSWORD.into(), Value::from(l.password.as_str()));
    f.insert(field::USER_REQ_TYP.into(), Value::from(marker::LOGIN_REQ_TYP));
    f
}

// Same MsgType as login; the venue tells them apart by UserReqID.
fn encode_change_password(c: &ChangePassword) -> Frame {
    let mut f = new_frame(MsgType::UserRequest);
    f.insert(field::USER_REQ_ID.into(), Value::from(marker::CHANGE_PASSWORD_REQ_ID));
    f.insert(field::PASSWORD.into(), Value::from(c.password.as_str()));
    f.insert(field::NEW_PASSWORD.into(), Value::from(c.new_password.as_str()));
    f
}

fn encode_subscribe(s: &MarketDataSubscribe) -> Frame {
    let mut f = new_frame(MsgType::MarketDataRequest);
    f.insert(field::MD_REQ_ID.into(), Value::from(s.md_req_id));
    f.insert(field::SUBSCRIPTION_REQUEST_TYPE.into(), Value::from(marker::SUBSCRIBE));
    f.insert(field::MARKET_DEPTH.into(), Value::from(s.market_depth));
    f.insert(field::MD_UPDATE_TYPE.into(), Value::from(marker::INCREMENTAL_UPDATES));
    f.insert(field::MD_ENTRY_TYPES.into(), string_array(&s.entry_types));
    f.insert(field::INSTRUMENTS.into(), string_array(&s.symbols));
    f
}

fn encode_unsubscribe(md_req_id: u64) -> Frame {
    let mut f = new_frame(MsgType::MarketDataRequest);
    f.insert(field::MD_REQ_ID.into(), Value::from(md_req_id));
    f.insert(field::SUBSCRIPTION_REQUEST_TYPE.into(), Value::from(marker::UNSUBSCRIBE));
    f
}

fn encode_signup(s: &Signup) -> Frame {
    let mut f = new_frame(MsgType::SignupRequest);
    f.insert(field::USERNAME.into(), Value::from(s.username.as_str()));
    f.insert(field::PASSWORD.into(), Value::from(s.password.as_str()));
    f.insert(field::FIRST_NAME.into(), Value::from(s.first_name.as_str()));
    f.insert(field::LAST_NAME.into(), Value::from(s.last_name.as_str()));
    f.insert(field::EMAIL.into(), Value::from(s.email.as_str()));
    f
}

fn encode_new_order(n: &NewOrder) -> Result<Frame, ProtocolError> {
    let price = scale_price(n.price)?;
    let quantity = scale_quantity(n.quantity)?;

    let mut f = new_frame(MsgType::NewOrderSingle);
    f.insert(field::CL_ORD_ID.into(), Value::from(n.client_order_id.to_string()));
    f.insert(field::SYMBOL.into(), Value::from(n.symbol.as_str()));
    f.insert(field::SIDE.into(), Value::from(n.side.code()));
    f.insert(field::ORD_TYPE.into(), Value::from(n.order_type.code()));
    f.insert(field::PRICE.into(), Value::from(price));
    f.insert(field::ORDER_QTY.into(), Value::from(quantity));
    Ok(f)
}

fn encode_cancel(c: &CancelOrder) -> Frame {
    let mut f = new_frame(MsgType::OrderCancelRequest);
    // An empty id counts as absent.
    let cl_ord_id = c.client_order_id.as_deref().filter(|s| !s.is_empty());
    let order_id = c.order_id.as_deref().filter(|s| !s.is_empty());

    if let Some(cl_ord_id) = cl_ord_id {
        f.insert(field::ORIG_CL_ORD_ID.into(), Value::from(cl_ord_id));
    } else if let Some(order_id) = order_id {
        f.insert(field::ORDER_ID.into(), Value::from(order_id));
    }
    f
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().map(|s| Value::from(s.as_str())).collect())
}
