//! Property tests for the orientation math: the combined rotation matrix
//! must stay orthonormal for every angle the codec can produce.

use canbus_rs::{decode, rotation_matrix, transform, CanBusFrame, DecodedReading};
use nalgebra::Matrix3;
use proptest::prelude::*;

proptest! {
    /// For any raw angle triple, R = Rz*Ry*Rx satisfies R^T R = I and
    /// det R = 1 within floating tolerance.
    #[test]
    fn rotation_is_orthonormal(phi in i16::MIN..=i16::MAX,
                               theta in i16::MIN..=i16::MAX,
                               psi in i16::MIN..=i16::MAX) {
        let roll = f64::from(phi).to_radians();
        let pitch = f64::from(theta).to_radians();
        let yaw = f64::from(psi).to_radians();

        let r = rotation_matrix(roll, pitch, yaw);
        let gram = r.transpose() * r;
        prop_assert!((gram - Matrix3::identity()).norm() < 1e-9);
        prop_assert!((r.determinant() - 1.0).abs() < 1e-9);
    }

    /// Decoding any 6-byte orientation payload and building the rotation
    /// never leaves the orthonormal manifold.
    #[test]
    fn decoded_payload_yields_orthonormal_rotation(payload in proptest::array::uniform6(any::<u8>())) {
        let frame = CanBusFrame::new(0x08, payload.to_vec()).unwrap();
        let DecodedReading::Orientation { roll, pitch, yaw } = decode(&frame).unwrap() else {
            panic!("0x08 must decode to an orientation");
        };
        let r = rotation_matrix(roll, pitch, yaw);
        prop_assert!((r.transpose() * r - Matrix3::identity()).norm() < 1e-9);
    }
}

/// Tests that zero angles give the identity rotation and transform.
#[test]
fn test_zero_angles_are_identity() {
    let r = rotation_matrix(0.0, 0.0, 0.0);
    assert_eq!(r, Matrix3::identity());
    let m = transform(0.0, 0.0, 0.0);
    assert_eq!(m, nalgebra::Matrix4::identity());
}

/// Tests a quarter turn about Z: yaw = 90° maps x onto y.
#[test]
fn test_quarter_turn_about_z() {
    let r = rotation_matrix(0.0, 0.0, std::f64::consts::FRAC_PI_2);
    let v = r * nalgebra::Vector3::new(1.0, 0.0, 0.0);
    assert!((v - nalgebra::Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
}
