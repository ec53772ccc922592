//! Seam to the platform UWB stack

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::RangingError;
use super::parameters::{ComplexChannel, RangingParameters, UwbAddress};

/// Which side of the exchange this device plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangingRole {
    Controller,
    Controlee,
}

impl RangingRole {
    pub fn from_controller_flag(is_controller: bool) -> Self {
        if is_controller {
            Self::Controller
        } else {
            Self::Controlee
        }
    }
}

/// What the local device looks like to its peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalEndpoint {
    pub address: UwbAddress,
    /// Assigned channel, present for the controller role only
    pub complex_channel: Option<ComplexChannel>,
}

/// Result reported by an open ranging session
#[derive(Debug, Clone, PartialEq)]
pub enum RangingEvent {
    /// Measurement; components the hardware did not report are `None`
    Position {
        distance: Option<f32>,
        azimuth: Option<f32>,
        elevation: Option<f32>,
    },
    PeerDisconnected,
    /// Any other result, described for logging
    Other(String),
}

/// Platform UWB stack
#[async_trait]
pub trait RangingBackend: Send + Sync {
    /// Address and channel of the local endpoint for `role`
    async fn local_endpoint(&self, role: RangingRole) -> Result<LocalEndpoint, RangingError>;

    /// Open a session; results arrive on the returned channel until it closes
    async fn open_session(
        &self,
        role: RangingRole,
        params: RangingParameters,
    ) -> Result<mpsc::Receiver<RangingEvent>, RangingError>;
}
