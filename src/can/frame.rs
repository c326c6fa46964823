//! # CAN Frame Type
//!
//! A transport-level message: a standard (11-bit) identifier plus an owned
//! payload of up to 8 bytes. Frames are immutable once constructed; the
//! constructor enforces the transport limits so the rest of the crate can
//! rely on them.

use crate::constants::{CAN_MAX_PAYLOAD, CAN_STANDARD_ID_MAX};
use crate::error::CanBusError;
use std::fmt;

/// Represents one CAN frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanBusFrame {
    id: u32,
    data: Vec<u8>,
}

impl CanBusFrame {
    /// Builds a frame, validating the standard-identifier range and the
    /// 0-8 byte payload length.
    pub fn new(id: u32, data: Vec<u8>) -> Result<CanBusFrame, CanBusError> {
        if id > CAN_STANDARD_ID_MAX {
            return Err(CanBusError::InvalidFrame(format!(
                "identifier 0x{id:X} exceeds the standard 11-bit range"
            )));
        }
        if data.len() > CAN_MAX_PAYLOAD {
            return Err(CanBusError::InvalidFrame(format!(
                "payload of {} bytes exceeds the {CAN_MAX_PAYLOAD} byte limit",
                data.len()
            )));
        }
        Ok(CanBusFrame { id, data })
    }

    /// Builds a frame from values already known to be in range. Used by the
    /// codec, whose identifier map and payloads are valid by construction.
    pub(crate) fn from_parts(id: u32, data: Vec<u8>) -> CanBusFrame {
        debug_assert!(id <= CAN_STANDARD_ID_MAX);
        debug_assert!(data.len() <= CAN_MAX_PAYLOAD);
        CanBusFrame { id, data }
    }

    /// The frame identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The frame payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for CanBusFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID=0x{:03X}, data=[{}]", self.id, hex::encode(&self.data))
    }
}
