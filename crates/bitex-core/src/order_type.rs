//! Order type (FIX `OrdType`).
//!
//! The venue treats limit orders as the default; everything the client
//! sends without an explicit type goes out as `Limit`.

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OrderType {
    Market,
    #[default]
    Limit,
    Stop,
    StopLimit,
}

impl OrderType {
    pub fn code(self) -> &'static str {
        match self {
            OrderType::Market => "1",
            OrderType::Limit => "2",
            OrderType::Stop => "3",
            OrderType::StopLimit => "4",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(OrderType::Market),
            "2" => Some(OrderType::Limit),
            "3" => Some(OrderType::Stop),
            "4" => Some(OrderType::StopLimit),
            _ => None,
        }
    }
}
