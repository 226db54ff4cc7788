// crates/bitex-protocol/tests/dispatch_scenarios.rs
use bitex_core::{Event, EventType, Frame, Payload};
use bitex_protocol::{decode_frame, dispatch, handle_text, ProtocolError};
use serde_json::{json, Value};

const FULL_REFRESH: &str = include_str!("data/full_refresh.json");
const INCREMENTAL_REFRESH: &str = include_str!("data/incremental_refresh.json");

fn frame(v: Value) -> Frame {
    v.as_object().cloned().expect("fixture must be an object")
}

fn run(text: &str) -> Vec<Event> {
    let mut events = Vec::new();
    handle_text(text, &mut events).expect("fixture should decode");
    events
}

fn kinds(events: &[Event]) -> Vec<EventType> {
    events.iter().map(|e| e.kind).collect()
}

fn entry_of(frame: &Frame, group: &str, idx: usize) -> Payload {
    let entry = frame[group][idx].as_object().cloned().unwrap();
    Payload::Entry(entry)
}

#[test]
fn raw_message_comes_first_and_carries_the_frame_unchanged() {
    let text = r#"{"MsgType":"0","TestReqID":0.25,"Nested":{"a":[1,2]}}"#;
    let events = run(text);

    assert_eq!(kinds(&events), vec![EventType::RawMessage, EventType::Heartbeat]);
    let expected = decode_frame(text).unwrap();
    assert_eq!(events[0].payload, Some(Payload::Frame(expected.clone())));
    assert_eq!(events[1].payload, Some(Payload::Frame(expected)));
}

#[test]
fn active_user_status_is_login_ok() {
    for status in [
        json!(1),
        json!("1"),
        json!(1.0),
        json!("01"),
        json!(" 1.0 "),
        json!(true),
        json!("0x1"),
    ] {
        let f = frame(json!({"MsgType": "BF", "UserStatus": status, "Username": "alice"}));
        let mut events = Vec::new();
        dispatch(&f, &mut events);

        assert_eq!(kinds(&events), vec![EventType::RawMessage, EventType::LoginOk]);
        assert_eq!(events[1].payload, Some(Payload::Frame(f)));
    }
}

#[test]
fn any_other_user_status_is_login_error() {
    for status in [
        json!(2),
        json!("3"),
        json!(null),
        json!("active"),
        json!(false),
        json!(""),
        json!("inf"),
        json!([1]),
    ] {
        let f = frame(json!({"MsgType": "BF", "UserStatus": status}));
        let mut events = Vec::new();
        dispatch(&f, &mut events);

        assert_eq!(kinds(&events), vec![EventType::RawMessage, EventType::LoginError]);
    }

    let events = run(r#"{"MsgType":"BF","UserStatusText":"bad password"}"#);
    assert_eq!(kinds(&events), vec![EventType::RawMessage, EventType::LoginError]);
}

#[test]
fn whole_frame_responses_map_one_to_one() {
    let cases = [
        ("0", EventType::Heartbeat),
        ("U3", EventType::BalanceResponse),
        ("U5", EventType::OrderListResponse),
        ("Y", EventType::MarketDataRequestReject),
        ("8", EventType::ExecutionReport),
    ];

    for (code, kind) in cases {
        let f = frame(json!({"MsgType": code, "Extra": "x"}));
        let mut events = Vec::new();
        dispatch(&f, &mut events);

        assert_eq!(kinds(&events), vec![EventType::RawMessage, kind], "MsgType {code}");
        assert_eq!(events[1].payload, Some(Payload::Frame(f)));
    }
}

#[test]
fn unknown_or_missing_msg_type_only_publishes_raw_message() {
    for text in [
        r#"{"MsgType":"ZZ"}"#,
        r#"{"MsgType":"D","ClOrdID":"1"}"#,
        r#"{"MsgType":0}"#,
        r#"{"NoType":true}"#,
        r#"{}"#,
    ] {
        let events = run(text);
        assert_eq!(kinds(&events), vec![EventType::RawMessage], "{text}");
    }
}

#[test]
fn full_refresh_with_depth_rebuilds_book_in_order() {
    let f = decode_frame(FULL_REFRESH).unwrap();
    let events = run(FULL_REFRESH);

    // 5 entries, one of them unknown: clear, clear, 4 entries, refresh.
    assert_eq!(
        kinds(&events),
        vec![
            EventType::RawMessage,
            EventType::OrderBookClear,
            EventType::TradeClear,
            EventType::OrderBookNewOrder,
            EventType::OrderBookNewOrder,
            EventType::OrderBookNewOrder,
            EventType::Trade,
            EventType::MarketDataFullRefresh,
        ]
    );

    assert_eq!(events[1].payload, None);
    assert_eq!(events[2].payload, None);
    for (ev, idx) in events[3..7].iter().zip(0..) {
        assert_eq!(ev.payload, Some(entry_of(&f, "MDFullGrp", idx)));
    }
    assert_eq!(events[7].payload, Some(Payload::Frame(f)));
}

#[test]
fn full_refresh_event_count_is_entries_plus_three() {
    let entries: Vec<Value> = (0..10)
        .map(|i| json!({"MDEntryType": (["0", "1", "2"][i % 3]), "Seq": i}))
        .collect();
    let f = frame(json!({"MsgType": "W", "MarketDepth": 0, "MDFullGrp": entries}));

    let mut events = Vec::new();
    dispatch(&f, &mut events);

    // Raw message + N + 3.
    assert_eq!(events.len(), 1 + 10 + 3);
    for (i, ev) in events[3..13].iter().enumerate() {
        let seq = ev.payload.as_ref().unwrap().as_object()["Seq"].as_u64();
        assert_eq!(seq, Some(i as u64));
        let expected = if i % 3 == 2 {
            EventType::Trade
        } else {
            EventType::OrderBookNewOrder
        };
        assert_eq!(ev.kind, expected);
    }
}

#[test]
fn full_refresh_without_market_depth_field_counts_as_full_depth() {
    let events = run(r#"{"MsgType":"W","MDFullGrp":[{"MDEntryType":"1"}]}"#);
    assert_eq!(
        kinds(&events),
        vec![
            EventType::RawMessage,
            EventType::OrderBookClear,
            EventType::TradeClear,
            EventType::OrderBookNewOrder,
            EventType::MarketDataFullRefresh,
        ]
    );
}

#[test]
fn top_of_book_full_refresh_skips_book_events() {
    for depth in [json!(1), json!("1"), json!("1e0"), json!(true)] {
        let f = frame(json!({
            "MsgType": "W",
            "MarketDepth": depth,
            "MDFullGrp": [{"MDEntryType": "0"}, {"MDEntryType": "2"}]
        }));
        let mut events = Vec::new();
        dispatch(&f, &mut events);

        assert_eq!(
            kinds(&events),
            vec![EventType::RawMessage, EventType::MarketDataFullRefresh]
        );
        assert_eq!(events[1].payload, Some(Payload::Frame(f)));
    }
}

#[test]
fn full_refresh_with_missing_or_malformed_group_still_clears() {
    for text in [
        r#"{"MsgType":"W","MarketDepth":0}"#,
        r#"{"MsgType":"W","MarketDepth":0,"MDFullGrp":"nope"}"#,
        r#"{"MsgType":"W","MarketDepth":0,"MDFullGrp":[1,"x",null]}"#,
    ] {
        let events = run(text);
        assert_eq!(
            kinds(&events),
            vec![
                EventType::RawMessage,
                EventType::OrderBookClear,
                EventType::TradeClear,
                EventType::MarketDataFullRefresh,
            ],
            "{text}"
        );
    }
}

#[test]
fn order_depth_incremental_maps_update_actions() {
    let f = decode_frame(INCREMENTAL_REFRESH).unwrap();
    let events = run(INCREMENTAL_REFRESH);

    assert_eq!(
        kinds(&events),
        vec![
            EventType::RawMessage,
            EventType::OrderBookNewOrder,
            EventType::OrderBookUpdateOrder,
            EventType::OrderBookDeleteOrder,
            EventType::OrderBookDeleteOrdersThru,
            EventType::Trade,
            EventType::MarketDataIncrementalRefresh,
        ]
    );

    for (ev, idx) in events[1..6].iter().zip(0..) {
        assert_eq!(ev.payload, Some(entry_of(&f, "MDIncGrp", idx)));
    }
    assert_eq!(events[6].payload, Some(Payload::Frame(f)));
}

#[test]
fn trade_entries_ignore_update_action() {
    let events = run(
        r#"{"MsgType":"X","MDBkTyp":"3","MDIncGrp":[{"MDEntryType":"2"},{"MDEntryType":"2","MDUpdateAction":"2"}]}"#,
    );
    assert_eq!(
        kinds(&events),
        vec![
            EventType::RawMessage,
            EventType::Trade,
            EventType::Trade,
            EventType::MarketDataIncrementalRefresh,
        ]
    );
}

#[test]
fn numeric_book_type_counts_as_order_depth() {
    for book_type in ["3", "3.0", "\"03\""] {
        let text = format!(
            r#"{{"MsgType":"X","MDBkTyp":{book_type},"MDIncGrp":[{{"MDEntryType":"0","MDUpdateAction":"0"}}]}}"#
        );
        assert_eq!(
            kinds(&run(&text)),
            vec![
                EventType::RawMessage,
                EventType::OrderBookNewOrder,
                EventType::MarketDataIncrementalRefresh,
            ],
            "{text}"
        );
    }
}

#[test]
fn numeric_entry_codes_are_not_recognized() {
    let events = run(
        r#"{"MsgType":"W","MarketDepth":0,"MDFullGrp":[{"MDEntryType":0},{"MDEntryType":2}]}"#,
    );
    assert_eq!(
        kinds(&events),
        vec![
            EventType::RawMessage,
            EventType::OrderBookClear,
            EventType::TradeClear,
            EventType::MarketDataFullRefresh,
        ]
    );

    let events = run(
        r#"{"MsgType":"X","MDBkTyp":"3","MDIncGrp":[{"MDEntryType":"0","MDUpdateAction":2},{"MDEntryType":1,"MDUpdateAction":"0"}]}"#,
    );
    assert_eq!(
        kinds(&events),
        vec![EventType::RawMessage, EventType::MarketDataIncrementalRefresh]
    );
}

#[test]
fn other_book_types_publish_only_the_refresh() {
    for book_type in [json!("1"), json!("2"), json!(null)] {
        let f = frame(json!({
            "MsgType": "X",
            "MDBkTyp": book_type,
            "MDIncGrp": [
                {"MDEntryType": "0", "MDUpdateAction": "0"},
                {"MDEntryType": "2", "MDUpdateAction": "0"}
            ]
        }));
        let mut events = Vec::new();
        dispatch(&f, &mut events);

        assert_eq!(
            kinds(&events),
            vec![EventType::RawMessage, EventType::MarketDataIncrementalRefresh]
        );
        assert_eq!(events[1].payload, Some(Payload::Frame(f)));
    }

    let events = run(r#"{"MsgType":"X","MDIncGrp":[{"MDEntryType":"0","MDUpdateAction":"0"}]}"#);
    assert_eq!(
        kinds(&events),
        vec![EventType::RawMessage, EventType::MarketDataIncrementalRefresh]
    );
}

#[test]
fn malformed_text_is_an_error_and_publishes_nothing() {
    for text in ["{not json", "", r#"{"MsgType":"0""#] {
        let mut events = Vec::new();
        let err = handle_text(text, &mut events).unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)), "{text}: {err}");
        assert!(events.is_empty());
    }
}

#[test]
fn non_object_json_is_rejected() {
    for text in ["[1,2,3]", "42", r#""MsgType""#, "null"] {
        let mut events = Vec::new();
        let err = handle_text(text, &mut events).unwrap_err();
        assert!(matches!(err, ProtocolError::NotAnObject), "{text}");
        assert!(events.is_empty());
    }
}
