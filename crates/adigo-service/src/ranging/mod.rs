//! UWB ranging
//!
//! The platform UWB stack sits behind [`RangingBackend`]; the
//! [`UwbRangingManager`] owns at most one session at a time and exposes the
//! latest distance and angle as watch channels.

mod backend;
mod error;
mod manager;
mod parameters;

pub use backend::{LocalEndpoint, RangingBackend, RangingEvent, RangingRole};
pub use error::RangingError;
pub use manager::{UwbRangingManager, INITIAL_ANGLE, INITIAL_DISTANCE};
pub use parameters::{
    ComplexChannel, RangingConfig, RangingParameters, UpdateRate, UwbAddress, DEFAULT_CHANNEL,
    DEFAULT_PREAMBLE_INDEX, SESSION_ID, SUB_SESSION_ID,
};
