//! Session parameters for unicast DS-TWR ranging

use std::fmt;

/// Session id shared by both ends
pub const SESSION_ID: u32 = 12345;

pub const SUB_SESSION_ID: u32 = 0;

/// UWB channel used when none is given
pub const DEFAULT_CHANNEL: u8 = 9;

/// Preamble index used when none is given
pub const DEFAULT_PREAMBLE_INDEX: u8 = 11;

/// Two-byte short address of a UWB device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UwbAddress([u8; 2]);

impl UwbAddress {
    /// Address from its numeric form, big-endian on the wire
    pub fn from_short(value: u16) -> Self {
        Self(value.to_be_bytes())
    }

    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub fn to_short(self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl fmt::Display for UwbAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}:{:02X}", self.0[0], self.0[1])
    }
}

/// UWB channel and preamble index pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexChannel {
    pub channel: u8,
    pub preamble_index: u8,
}

impl ComplexChannel {
    pub fn new(channel: u8, preamble_index: u8) -> Self {
        Self {
            channel,
            preamble_index,
        }
    }
}

impl Default for ComplexChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL, DEFAULT_PREAMBLE_INDEX)
    }
}

/// Ranging method; only one-to-one double-sided two-way ranging is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangingConfig {
    UnicastDsTwr,
}

/// Measurement cadence; the platform picks the rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRate {
    Automatic,
}

/// Everything the platform needs to open a ranging session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangingParameters {
    pub config: RangingConfig,
    pub session_id: u32,
    pub sub_session_id: u32,
    pub session_key: [u8; 8],
    pub sub_session_key: Option<[u8; 16]>,
    pub complex_channel: ComplexChannel,
    pub peers: Vec<UwbAddress>,
    pub update_rate: UpdateRate,
}

impl RangingParameters {
    /// Unicast DS-TWR with a single peer and the fixed session id
    pub fn unicast(complex_channel: ComplexChannel, peer: UwbAddress) -> Self {
        Self {
            config: RangingConfig::UnicastDsTwr,
            session_id: SESSION_ID,
            sub_session_id: SUB_SESSION_ID,
            session_key: [0; 8],
            sub_session_key: None,
            complex_channel,
            peers: vec![peer],
            update_rate: UpdateRate::Automatic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_big_endian() {
        let addr = UwbAddress::from_short(1234);
        assert_eq!(addr.as_bytes(), &[0x04, 0xD2]);
        assert_eq!(addr.to_short(), 1234);
        assert_eq!(addr.to_string(), "04:D2");
        assert_eq!(UwbAddress::from_bytes([0x04, 0xD2]), addr);
    }

    #[test]
    fn test_unicast_defaults() {
        let params = RangingParameters::unicast(ComplexChannel::default(), UwbAddress::from_short(7));
        assert_eq!(params.config, RangingConfig::UnicastDsTwr);
        assert_eq!(params.session_id, 12345);
        assert_eq!(params.sub_session_id, 0);
        assert_eq!(params.session_key, [0; 8]);
        assert_eq!(params.complex_channel, ComplexChannel::new(9, 11));
        assert_eq!(params.peers, vec![UwbAddress::from_short(7)]);
        assert_eq!(params.update_rate, UpdateRate::Automatic);
    }
}
