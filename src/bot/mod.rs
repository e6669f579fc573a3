//! Bot module
//!
//! Command parsing, command replies and update dispatch.

mod commands;
mod dispatcher;
mod responder;

pub use commands::Command;
pub use dispatcher::Dispatcher;
pub use responder::{CommandResponder, MCAP_FAILURE_MESSAGE};
