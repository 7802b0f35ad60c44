//! Message handling - parsing inbound actions and dispatching them

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{Caller, ShopDispatcher};
