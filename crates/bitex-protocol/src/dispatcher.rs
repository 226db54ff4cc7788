//! Inbound frame classification.
//!
//! Every inbound frame publishes `RawMessage` first, then whatever its
//! `MsgType` calls for:
//!
//! ```text
//! "0"  Heartbeat             -> Heartbeat(frame)
//! "BF" UserResponse          -> LoginOk(frame) | LoginError(frame)
//! "U3" BalanceResponse       -> BalanceResponse(frame)
//! "U5" OrderListResponse     -> OrderListResponse(frame)
//! "W"  FullRefresh           -> [OrderBookClear, TradeClear, per-entry...] MarketDataFullRefresh(frame)
//! "X"  IncrementalRefresh    -> [per-entry...] MarketDataIncrementalRefresh(frame)
//! "Y"  MarketDataReject      -> MarketDataRequestReject(frame)
//! "8"  ExecutionReport       -> ExecutionReport(frame)
//! ```
//!
//! Unknown message types, entry types and update actions publish
//! nothing beyond the raw message. The dispatcher keeps no state between
//! frames; rebuilding a book from the events is up to the listener.

use bitex_core::{Event, EventSink, EventType, Frame};
use serde_json::Value;
use tracing::trace;

use crate::error::ProtocolError;
use crate::wire_types::{
    field, loosely_equals, marker, BookType, EntryType, MsgType, UpdateAction,
};

/// Parse inbound text into a frame.
pub fn decode_frame(text: &str) -> Result<Frame, ProtocolError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(frame) => Ok(frame),
        _ => Err(ProtocolError::NotAnObject),
    }
}

/// Decode `text` and publish its events.
///
/// On a decode error nothing is published and the error is returned.
pub fn handle_text<S: EventSink + ?Sized>(text: &str, sink: &mut S) -> Result<(), ProtocolError> {
    trace!("Received frame: {}", text);
    let frame = decode_frame(text)?;
    dispatch(&frame, sink);
    Ok(())
}

/// Publish the event sequence for one decoded frame.
pub fn dispatch<S: EventSink + ?Sized>(frame: &Frame, sink: &mut S) {
    sink.publish(Event::frame(EventType::RawMessage, frame));

    let Some(msg_type) = frame
        .get(field::MSG_TYPE)
        .and_then(Value::as_str)
        .and_then(MsgType::from_code)
    else {
        return;
    };

    match msg_type {
        MsgType::Heartbeat => sink.publish(Event::frame(EventType::Heartbeat, frame)),

        MsgType::UserResponse => {
            let kind = if field_equals(frame, field::USER_STATUS, marker::USER_STATUS_ACTIVE) {
                EventType::LoginOk
            } else {
                EventType::LoginError
            };
            sink.publish(Event::frame(kind, frame));
        }

        MsgType::BalanceResponse => sink.publish(Event::frame(EventType::BalanceResponse, frame)),

        MsgType::OrderListResponse => {
            sink.publish(Event::frame(EventType::OrderListResponse, frame))
        }

        MsgType::MarketDataFullRefresh => dispatch_full_refresh(frame, sink),

        MsgType::MarketDataIncrementalRefresh => dispatch_incremental_refresh(frame, sink),

        MsgType::MarketDataRequestReject => {
            sink.publish(Event::frame(EventType::MarketDataRequestReject, frame))
        }

        MsgType::ExecutionReport => sink.publish(Event::frame(EventType::ExecutionReport, frame)),

        // Outbound-only types echoed back to us carry no extra meaning.
        MsgType::TestRequest
        | MsgType::NewOrderSingle
        | MsgType::OrderCancelRequest
        | MsgType::MarketDataRequest
        | MsgType::UserRequest
        | MsgType::SignupRequest
        | MsgType::BalanceRequest
        | MsgType::OrderListRequest => {}
    }
}

fn dispatch_full_refresh<S: EventSink + ?Sized>(frame: &Frame, sink: &mut S) {
    // A top-of-book snapshot carries no book to rebuild.
    if !field_equals(frame, field::MARKET_DEPTH, marker::TOP_OF_BOOK_DEPTH) {
        sink.publish(Event::bare(EventType::OrderBookClear));
        sink.publish(Event::bare(EventType::TradeClear));

        for entry in group_entries(frame, field::MD_FULL_GRP) {
            match entry_type(entry) {
                Some(EntryType::Bid | EntryType::Offer) => {
                    sink.publish(Event::entry(EventType::OrderBookNewOrder, entry))
                }
                Some(EntryType::Trade) => sink.publish(Event::entry(EventType::Trade, entry)),
                None => {}
            }
        }
    }

    sink.publish(Event::frame(EventType::MarketDataFullRefresh, frame));
}

fn dispatch_incremental_refresh<S: EventSink + ?Sized>(frame: &Frame, sink: &mut S) {
    match BookType::from_value(frame.get(field::MD_BK_TYP)) {
        BookType::OrderDepth => {
            for entry in group_entries(frame, field::MD_INC_GRP) {
                match entry_type(entry) {
                    Some(EntryType::Bid | EntryType::Offer) => {
                        if let Some(kind) = update_action(entry).map(book_event) {
                            sink.publish(Event::entry(kind, entry));
                        }
                    }
                    Some(EntryType::Trade) => sink.publish(Event::entry(EventType::Trade, entry)),
                    None => {}
                }
            }
        }
        // Top-of-book and price-depth increments are not expanded per
        // entry; listeners still get the whole frame below.
        BookType::Other => {}
    }

    sink.publish(Event::frame(EventType::MarketDataIncrementalRefresh, frame));
}

fn book_event(action: UpdateAction) -> EventType {
    match action {
        UpdateAction::New => EventType::OrderBookNewOrder,
        UpdateAction::Change => EventType::OrderBookUpdateOrder,
        UpdateAction::Delete => EventType::OrderBookDeleteOrder,
        UpdateAction::DeleteThru => EventType::OrderBookDeleteOrdersThru,
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

/// Object entries of a group array, in order. A missing or non-array
/// group yields nothing; non-object elements are skipped.
fn group_entries<'a>(frame: &'a Frame, group: &str) -> impl Iterator<Item = &'a Frame> {
    frame
        .get(group)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

// Entry codes must be strings; a numeric `0` is not a bid.
fn entry_type(entry: &Frame) -> Option<EntryType> {
    entry
        .get(field::MD_ENTRY_TYPE)
        .and_then(Value::as_str)
        .and_then(EntryType::from_code)
}

fn update_action(entry: &Frame) -> Option<UpdateAction> {
    entry
        .get(field::MD_UPDATE_ACTION)
        .and_then(Value::as_str)
        .and_then(UpdateAction::from_code)
}

fn field_equals(frame: &Frame, name: &str, expected: f64) -> bool {
    frame.get(name).is_some_and(|v| loosely_equals(v, expected))
}
