//! # canbus-rs - Channel-Multiplexed CAN Sensor Sessions
//!
//! The canbus-rs crate drives a small vehicle-style sensor bus: three
//! virtual sensor channels (an IMU, a distance sensor, and an
//! anemometer/motor pair) multiplexed over one shared half-duplex CAN bus.
//! It provides the transport, the frame codec, and the polling session that
//! a dashboard front end builds on.
//!
//! ## Features
//!
//! - Open a SocketCAN interface by name; degrade, never crash, when the bus
//!   is absent
//! - Poll the active sensor channel on a fixed cadence, one channel at a time
//! - Drain the bus on a background task and decode fixed binary frame
//!   layouts into typed readings
//! - Route readings to registered sinks by frame identifier, with per-sink
//!   fault isolation
//! - Push a new commanded motor speed to the bus the moment it changes
//!
//! ## Usage
//!
//! ```no_run
//! use canbus_rs::{
//!     constants::REPLY_ID_WIND_SPEED, BusSession, CanBusError, DecodedReading, SensorChannel,
//!     SessionConfig,
//! };
//!
//! # async fn run() {
//! let mut session = BusSession::open("can0", SessionConfig::default());
//! session.register_sink(
//!     REPLY_ID_WIND_SPEED,
//!     Box::new(|reading: &DecodedReading| -> Result<(), CanBusError> {
//!         if let DecodedReading::WindSpeed { rpm } = reading {
//!             println!("windmill speed: {rpm} RPM");
//!         }
//!         Ok(())
//!     }),
//! );
//! session.activate(SensorChannel::Anemometer);
//! # session.shutdown().await;
//! # }
//! ```

pub mod can;
pub mod constants;
pub mod error;
pub mod logging;

pub use crate::error::CanBusError;
pub use crate::logging::{init_logger, log_info};

// Core bus types
pub use can::codec::{decode, encode_poll_request, DecodedReading, SensorChannel};
pub use can::frame::CanBusFrame;
pub use can::orientation::{rotation_matrix, transform};
pub use can::registry::{ObserverRegistry, ReadingSink};
pub use can::session::{BusSession, EchoPolicy, PollState, SessionConfig};
pub use can::transport::{BusTransport, SocketCanTransport};
pub use can::transport_mock::MockTransport;

/// Open a session on a SocketCAN interface with default settings.
///
/// # Arguments
/// * `interface` - Interface name (e.g. "can0", "vcan0")
///
/// # Returns
/// A running session; degraded to a disabled transport if the interface
/// could not be opened. Must be called within a tokio runtime.
pub fn open(interface: &str) -> BusSession {
    BusSession::open(interface, SessionConfig::default())
}
