//! STOMP frame codec
//!
//! Header values are taken verbatim; escaping of `:`/`\n` inside values is
//! not supported.

mod command;
mod frame;

pub use command::StompCommand;
pub use frame::{FrameError, StompFrame};
