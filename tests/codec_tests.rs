//! Unit tests for the sensor frame codec: poll request encoding and the
//! decode strategy of every reply identifier.

use canbus_rs::{decode, encode_poll_request, CanBusError, CanBusFrame, DecodedReading, SensorChannel};
use std::f64::consts::PI;

/// Tests that an IMU poll request has an empty payload.
#[test]
fn test_encode_imu_request() {
    let frame = encode_poll_request(SensorChannel::Imu, 99);
    assert_eq!(frame.id(), 0x02);
    assert!(frame.data().is_empty());
}

/// Tests that a distance poll request carries the commanded speed.
#[test]
fn test_encode_distance_request() {
    let frame = encode_poll_request(SensorChannel::Distance, 55);
    assert_eq!(frame.id(), 0x01);
    assert_eq!(frame.data(), &[55]);
}

/// Tests that an anemometer poll request with commanded speed 128 is
/// identifier 0x03 with payload [128].
#[test]
fn test_encode_anemometer_request() {
    let frame = encode_poll_request(SensorChannel::Anemometer, 128);
    assert_eq!(frame.id(), 0x03);
    assert_eq!(frame.data(), &[128]);
}

/// Tests that an orientation reply decodes the three big-endian i16 values
/// with the raw hundredths-of-a-degree integers fed directly into the
/// degree-to-radian conversion (no division by 100).
#[test]
fn test_decode_orientation() {
    // roll = 1 (0.01°), pitch = 9000 (90.00°), yaw = -4500 (-45.00°)
    let frame = CanBusFrame::new(0x08, vec![0x00, 0x01, 0x23, 0x28, 0xEE, 0x6C]).unwrap();
    match decode(&frame).unwrap() {
        DecodedReading::Orientation { roll, pitch, yaw } => {
            assert!((roll - PI / 180.0).abs() < 1e-12);
            assert!((pitch - 9000.0 * PI / 180.0).abs() < 1e-9);
            assert!((yaw + 4500.0 * PI / 180.0).abs() < 1e-9);
        }
        other => panic!("expected Orientation, got {other:?}"),
    }
}

/// Tests that extra payload bytes beyond the six angle bytes are ignored.
#[test]
fn test_decode_orientation_ignores_trailing_bytes() {
    let frame = CanBusFrame::new(0x08, vec![0, 0, 0, 0, 0, 0, 0xAA, 0xBB]).unwrap();
    assert!(matches!(
        decode(&frame).unwrap(),
        DecodedReading::Orientation { .. }
    ));
}

/// Tests that an orientation payload shorter than 6 bytes fails with
/// MalformedFrame rather than panicking.
#[test]
fn test_decode_short_orientation_is_malformed() {
    let frame = CanBusFrame::new(0x08, vec![1, 2, 3]).unwrap();
    match decode(&frame).unwrap_err() {
        CanBusError::MalformedFrame {
            id,
            expected,
            actual,
        } => {
            assert_eq!(id, 0x08);
            assert_eq!(expected, 6);
            assert_eq!(actual, 3);
        }
        other => panic!("expected MalformedFrame, got {other:?}"),
    }
}

/// Tests that a distance reply keeps its payload opaque.
#[test]
fn test_decode_distance_is_opaque() {
    let frame = CanBusFrame::new(0x01, vec![0xDE, 0xAD]).unwrap();
    assert_eq!(
        decode(&frame).unwrap(),
        DecodedReading::Distance(vec![0xDE, 0xAD])
    );
}

/// Tests that a 0x03 reply decodes as the motor-speed echo.
#[test]
fn test_decode_motor_speed_echo() {
    let frame = CanBusFrame::new(0x03, vec![200]).unwrap();
    assert_eq!(
        decode(&frame).unwrap(),
        DecodedReading::MotorSpeedEcho(vec![200])
    );
}

/// Tests that a wind-speed reply takes its RPM from byte 0.
#[test]
fn test_decode_wind_speed() {
    let frame = CanBusFrame::new(0x09, vec![42, 7]).unwrap();
    assert_eq!(decode(&frame).unwrap(), DecodedReading::WindSpeed { rpm: 42 });
}

/// Tests that an empty wind-speed payload is malformed.
#[test]
fn test_decode_empty_wind_speed_is_malformed() {
    let frame = CanBusFrame::new(0x09, Vec::new()).unwrap();
    assert!(matches!(
        decode(&frame).unwrap_err(),
        CanBusError::MalformedFrame { id: 0x09, .. }
    ));
}

/// Tests that an identifier outside the reply map is recoverable.
#[test]
fn test_decode_unknown_identifier() {
    let frame = CanBusFrame::new(0x55, vec![1]).unwrap();
    assert!(matches!(
        decode(&frame).unwrap_err(),
        CanBusError::UnknownFrameId(0x55)
    ));
}

/// Tests the channel name round trip used by the CLI.
#[test]
fn test_channel_from_str() {
    assert_eq!("imu".parse::<SensorChannel>().unwrap(), SensorChannel::Imu);
    assert_eq!(
        "Anemometer".parse::<SensorChannel>().unwrap(),
        SensorChannel::Anemometer
    );
    assert!("sonar".parse::<SensorChannel>().is_err());
    assert_eq!(SensorChannel::Distance.to_string(), "distance");
}
