//! Angle helpers shared by the attitude tracker

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::Vector3;

/// Mathematical constants
pub const DEG_TO_RAD: f64 = PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / PI;

/// Roll and pitch implied by the gravity direction alone
///
/// The ratios are scale-invariant, so raw ticks can be passed directly.
/// Roll is defined as zero when x and z are both zero, instead of
/// propagating a NaN.
///
/// Returns `(pitch, roll)` in radians.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use mpu6050_attitude::accel_angles;
///
/// let (pitch, roll) = accel_angles(Vector3::new(0.0, 0.0, 16384.0));
/// assert_eq!((pitch, roll), (0.0, 0.0));
/// ```
pub fn accel_angles(accel: Vector3<f64>) -> (f64, f64) {
    let denominator = libm::sqrt(accel.x * accel.x + accel.z * accel.z);
    let roll = if denominator != 0.0 {
        libm::atan(accel.y / denominator)
    } else {
        0.0
    };
    let pitch = libm::atan2(-accel.x, accel.z);

    (pitch, roll)
}

/// Wraps an angle into (-π, π]
///
/// Shift by π, reduce modulo 2π, lift negatives, shift back. The reduction
/// alone lands exact multiples on -π, which is folded onto π.
pub fn wrap_pi(angle: f64) -> f64 {
    let mut wrapped = libm::fmod(angle + PI, TAU);
    if wrapped < 0.0 {
        wrapped += TAU;
    }
    wrapped -= PI;
    if wrapped <= -PI { PI } else { wrapped }
}

/// True when `a` and `b` sit on opposite sides of the ±90° band
///
/// One value below -90° and the other above +90° means the accelerometer
/// pitch jumped across the ±180° branch cut.
pub fn crosses_branch_cut(a: f64, b: f64) -> bool {
    (a < -FRAC_PI_2 && b > FRAC_PI_2) || (a > FRAC_PI_2 && b < -FRAC_PI_2)
}

/// True past vertical, where the roll gyroscope sense inverts
pub fn is_inverted(pitch: f64) -> bool {
    libm::fabs(pitch) > FRAC_PI_2
}
