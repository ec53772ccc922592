//! Integration test utilities for the Adigo client
//!
//! Provides an in-process STOMP broker and a fake REST server so the client
//! crates can be exercised end to end over real sockets.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
