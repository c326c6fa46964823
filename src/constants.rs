//! CAN Sensor Bus Constants
//!
//! This module defines the frame identifier map and timing defaults for the
//! sensor bus. Identifiers are standard (11-bit) CAN identifiers; the bit
//! rate is configured at the OS level, outside this crate.

use std::time::Duration;

/// Request identifier for the IMU channel (MPU9250).
pub const REQUEST_ID_IMU: u32 = 0x02;

/// Request identifier for the distance channel (VL6180X).
pub const REQUEST_ID_DISTANCE: u32 = 0x01;

/// Request identifier for the anemometer/motor channel.
pub const REQUEST_ID_ANEMOMETER: u32 = 0x03;

/// Reply identifier carrying roll/pitch/yaw as three big-endian i16 values.
pub const REPLY_ID_ORIENTATION: u32 = 0x08;

/// Reply identifier carrying opaque distance bytes. Same as the request
/// identifier for that channel.
pub const REPLY_ID_DISTANCE: u32 = 0x01;

/// Reply identifier echoing the commanded motor speed.
pub const REPLY_ID_MOTOR_ECHO: u32 = 0x03;

/// Reply identifier carrying the windmill speed, one byte of RPM.
/// Unsolicited telemetry, not a poll reply.
pub const REPLY_ID_WIND_SPEED: u32 = 0x09;

/// Largest standard (non-extended) CAN identifier.
pub const CAN_STANDARD_ID_MAX: u32 = 0x7FF;

/// Largest classic CAN payload.
pub const CAN_MAX_PAYLOAD: usize = 8;

/// Cadence of the periodic poll request while a channel is active.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Upper bound on one blocking receive; bounds receive-loop shutdown latency.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Pause after a transient receive error before the loop retries.
pub const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Depth of the decoded-reading queue between receive loop and dispatcher.
pub const DEFAULT_READING_QUEUE_DEPTH: usize = 64;

/// Sleep between non-blocking socket polls while waiting inside one receive.
pub const SOCKET_POLL_INTERVAL: Duration = Duration::from_millis(2);
