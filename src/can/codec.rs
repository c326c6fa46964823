//! # Sensor Frame Codec
//!
//! Pure, stateless encode/decode between [`CanBusFrame`]s and typed sensor
//! readings. Safe to call from any task; no shared state.
//!
//! The identifier map (request -> reply) is:
//!
//! | Channel     | Request | Reply                                  |
//! |-------------|---------|----------------------------------------|
//! | IMU         | 0x02    | 0x08 (roll/pitch/yaw, 3 x i16 BE)      |
//! | Distance    | 0x01    | 0x01 (opaque bytes)                    |
//! | Anemometer  | 0x03    | 0x03 (echo) and 0x09 (RPM, unsolicited)|

use crate::can::frame::CanBusFrame;
use crate::constants::{
    REPLY_ID_DISTANCE, REPLY_ID_MOTOR_ECHO, REPLY_ID_ORIENTATION, REPLY_ID_WIND_SPEED,
    REQUEST_ID_ANEMOMETER, REQUEST_ID_DISTANCE, REQUEST_ID_IMU,
};
use crate::error::CanBusError;
use std::fmt;
use std::str::FromStr;

/// One logical sensor/actuator endpoint multiplexed over the shared bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorChannel {
    Imu,
    Distance,
    Anemometer,
}

impl SensorChannel {
    /// The identifier of this channel's poll request frame.
    pub fn request_id(self) -> u32 {
        match self {
            SensorChannel::Imu => REQUEST_ID_IMU,
            SensorChannel::Distance => REQUEST_ID_DISTANCE,
            SensorChannel::Anemometer => REQUEST_ID_ANEMOMETER,
        }
    }
}

impl fmt::Display for SensorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorChannel::Imu => write!(f, "imu"),
            SensorChannel::Distance => write!(f, "distance"),
            SensorChannel::Anemometer => write!(f, "anemometer"),
        }
    }
}

impl FromStr for SensorChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "imu" => Ok(SensorChannel::Imu),
            "distance" => Ok(SensorChannel::Distance),
            "anemometer" => Ok(SensorChannel::Anemometer),
            other => Err(format!(
                "unknown channel '{other}' (expected imu, distance or anemometer)"
            )),
        }
    }
}

/// A reply frame decoded against its channel's strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedReading {
    /// Roll/pitch/yaw in radians, from the IMU reply (0x08).
    Orientation { roll: f64, pitch: f64, yaw: f64 },
    /// Opaque distance payload (0x01), rendered as hex by consumers.
    Distance(Vec<u8>),
    /// Windmill speed in RPM, from the unsolicited 0x09 frame.
    WindSpeed { rpm: u8 },
    /// The anemometer data reply (0x03) echoing the commanded motor speed.
    MotorSpeedEcho(Vec<u8>),
}

/// Encodes the poll request for a channel. The distance and anemometer
/// requests carry the current commanded motor speed as their single payload
/// byte; the IMU request is empty.
pub fn encode_poll_request(channel: SensorChannel, commanded_speed: u8) -> CanBusFrame {
    let payload = match channel {
        SensorChannel::Imu => Vec::new(),
        SensorChannel::Distance | SensorChannel::Anemometer => vec![commanded_speed],
    };
    CanBusFrame::from_parts(channel.request_id(), payload)
}

/// Decodes a reply frame into a typed reading.
pub fn decode(frame: &CanBusFrame) -> Result<DecodedReading, CanBusError> {
    let data = frame.data();
    match frame.id() {
        REPLY_ID_ORIENTATION => {
            if data.len() < 6 {
                return Err(CanBusError::MalformedFrame {
                    id: frame.id(),
                    expected: 6,
                    actual: data.len(),
                });
            }
            let phi = i16::from_be_bytes([data[0], data[1]]);
            let theta = i16::from_be_bytes([data[2], data[3]]);
            let psi = i16::from_be_bytes([data[4], data[5]]);
            Ok(DecodedReading::Orientation {
                roll: raw_angle_to_radians(phi),
                pitch: raw_angle_to_radians(theta),
                yaw: raw_angle_to_radians(psi),
            })
        }
        REPLY_ID_WIND_SPEED => match data.first() {
            Some(&rpm) => Ok(DecodedReading::WindSpeed { rpm }),
            None => Err(CanBusError::MalformedFrame {
                id: frame.id(),
                expected: 1,
                actual: 0,
            }),
        },
        REPLY_ID_MOTOR_ECHO => Ok(DecodedReading::MotorSpeedEcho(data.to_vec())),
        REPLY_ID_DISTANCE => Ok(DecodedReading::Distance(data.to_vec())),
        other => Err(CanBusError::UnknownFrameId(other)),
    }
}

/// The wire value is hundredths of a degree, and the raw integer is fed
/// straight into the degree-to-radian conversion without dividing by 100
/// first. That matches the deployed consumer of these frames bit for bit,
/// so it is kept as-is rather than rescaled here.
fn raw_angle_to_radians(raw: i16) -> f64 {
    f64::from(raw).to_radians()
}
