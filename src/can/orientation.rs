//! # Orientation Math
//!
//! Builds the rotation an IMU reading describes, in the Z-Y-X convention:
//! `R = Rz(yaw) * Ry(pitch) * Rx(roll)`. The homogeneous form is what a 3D
//! front end feeds to its scene transform.

use nalgebra::{Matrix3, Matrix4};

/// The combined rotation matrix `R = Rz * Ry * Rx` for the given Euler
/// angles in radians. Orthonormal for any input.
pub fn rotation_matrix(roll: f64, pitch: f64, yaw: f64) -> Matrix3<f64> {
    #[rustfmt::skip]
    let rx = Matrix3::new(
        1.0, 0.0,        0.0,
        0.0, roll.cos(), -roll.sin(),
        0.0, roll.sin(), roll.cos(),
    );
    #[rustfmt::skip]
    let ry = Matrix3::new(
        pitch.cos(),  0.0, pitch.sin(),
        0.0,          1.0, 0.0,
        -pitch.sin(), 0.0, pitch.cos(),
    );
    #[rustfmt::skip]
    let rz = Matrix3::new(
        yaw.cos(), -yaw.sin(), 0.0,
        yaw.sin(), yaw.cos(),  0.0,
        0.0,       0.0,        1.0,
    );
    rz * ry * rx
}

/// The homogeneous 4x4 transform for the given Euler angles in radians.
pub fn transform(roll: f64, pitch: f64, yaw: f64) -> Matrix4<f64> {
    rotation_matrix(roll, pitch, yaw).to_homogeneous()
}
