//! Side (Buy / Sell) for orders.

/// Order side, as carried in the FIX `Side` field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// FIX code sent on the wire (`"1"` / `"2"`).
    pub fn code(self) -> &'static str {
        match self {
            Side::Buy => "1",
            Side::Sell => "2",
        }
    }

    /// Try to parse from the FIX code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Side::Buy),
            "2" => Some(Side::Sell),
            _ => None,
        }
    }
}
