//! bitex-core
//!
//! Pure client-side logic for the BitEx venue:
//! - sides and order types
//! - logical outbound commands
//! - events and the listener bus
//! - request / order id generation

pub mod side;
pub mod order_type;
pub mod messages;
pub mod event;
pub mod event_bus;
pub mod ids;

pub use side::Side;
pub use order_type::OrderType;

pub use messages::{
    CancelOrder,
    ChangePassword,
    Command,
    Frame,
    Login,
    MarketDataSubscribe,
    NewOrder,
    Signup,
};

pub use event::{Event, EventType, Payload};
pub use event_bus::{EventBus, EventSink, ListenerId};
pub use ids::{IdGenerator, RandomIdGenerator, SequenceIdGenerator};
