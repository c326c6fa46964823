//! # CAN Session Error Handling
//!
//! This module defines the CanBusError enum, which represents the different
//! error types that can occur in the canbus-rs crate.

use thiserror::Error;

/// Represents the different error types that can occur in the CAN session crate.
#[derive(Debug, Error)]
pub enum CanBusError {
    /// Indicates the underlying CAN interface could not be opened. Fatal to
    /// that transport instance; the session continues in a degraded no-op mode.
    #[error("CAN transport unavailable: {0}")]
    TransportUnavailable(String),

    /// Indicates an operation on a transport that is disabled or already closed.
    #[error("CAN bus not connected")]
    NotConnected,

    /// Indicates a bus-level send failure (arbitration loss, bus-off, full queue).
    #[error("CAN send error: {0}")]
    Send(String),

    /// Indicates a bus-level receive failure. Transient; the receive loop
    /// backs off and retries.
    #[error("CAN receive error: {0}")]
    Receive(String),

    /// Indicates a reply payload too short for its frame identifier.
    #[error("malformed frame 0x{id:02X}: expected at least {expected} payload bytes, got {actual}")]
    MalformedFrame {
        id: u32,
        expected: usize,
        actual: usize,
    },

    /// Indicates a frame identifier with no known decode strategy.
    /// Recoverable: the frame is logged and discarded.
    #[error("unknown frame identifier: 0x{0:02X}")]
    UnknownFrameId(u32),

    /// Indicates a frame that violates the transport limits
    /// (11-bit identifier, 0-8 byte payload).
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Indicates a failure inside a registered sink. Isolated per sink,
    /// never propagated past the registry.
    #[error("sink error: {0}")]
    Sink(String),
}
