//! Core types, settings and sensor ranges for the attitude estimator

use nalgebra::Vector3;

/// Accelerometer full-scale range
///
/// Trades measurable range for resolution. The discriminant order matches the
/// `AFS_SEL` field of the `ACCEL_CONFIG` register.
///
/// # Example
/// ```
/// use mpu6050_attitude::AccelRange;
///
/// assert_eq!(AccelRange::G4.ticks_per_g(), 8192.0);
/// assert_eq!(AccelRange::G4.register_value(), 0x08);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccelRange {
    /// ±2 g
    #[default]
    G2,
    /// ±4 g
    G4,
    /// ±8 g
    G8,
    /// ±16 g
    G16,
}

impl AccelRange {
    /// Value written to `ACCEL_CONFIG` (bits 4:3)
    pub fn register_value(self) -> u8 {
        (self as u8) << 3
    }

    /// Raw ticks per g
    pub fn ticks_per_g(self) -> f64 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }
}

/// Gyroscope full-scale range
///
/// The discriminant order matches the `FS_SEL` field of `GYRO_CONFIG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GyroRange {
    /// ±250 °/s
    #[default]
    Dps250,
    /// ±500 °/s
    Dps500,
    /// ±1000 °/s
    Dps1000,
    /// ±2000 °/s
    Dps2000,
}

impl GyroRange {
    /// Value written to `GYRO_CONFIG` (bits 4:3)
    pub fn register_value(self) -> u8 {
        (self as u8) << 3
    }

    /// Raw ticks per rad/s
    pub fn ticks_per_rad_s(self) -> f64 {
        match self {
            GyroRange::Dps250 => 7509.872412338726,
            GyroRange::Dps500 => 3754.936206169363,
            GyroRange::Dps1000 => 1877.4681030846814,
            GyroRange::Dps2000 => 938.7340515423407,
        }
    }
}

/// One burst read from the sensor, in raw ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    /// Accelerometer ticks (x, y, z)
    pub accel: Vector3<i16>,
    /// Gyroscope ticks (x, y, z)
    pub gyro: Vector3<i16>,
    /// Die temperature ticks
    pub temperature: i16,
}

impl Default for RawSample {
    fn default() -> Self {
        Self {
            accel: Vector3::zeros(),
            gyro: Vector3::zeros(),
            temperature: 0,
        }
    }
}

/// A sample converted to physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalSample {
    /// Acceleration in g
    pub accel: Vector3<f64>,
    /// Angular rate in rad/s. Only z has the calibrated bias removed.
    pub gyro: Vector3<f64>,
    /// Die temperature in °C
    pub temperature: f64,
}

/// Estimated orientation in radians
///
/// Yaw is integrated from the z gyroscope alone and drifts without bound
/// over time since there is no heading reference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

/// Result of one estimation cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuData {
    /// The physical sample the attitude was computed from
    pub sample: PhysicalSample,
    /// Fused attitude
    pub attitude: Attitude,
    /// False when the transport failed and an all-zero sample was substituted
    ///
    /// The attitude is still computed from the zero sample so callers that
    /// ignore this flag see the same values as before the flag existed.
    pub sample_valid: bool,
}

/// Angle estimator noise parameters
///
/// These are tuning defaults, not physical constants. Larger `q_angle` and
/// `q_bias` trust the gyroscope less; larger `r_measure` trusts the
/// accelerometer less.
///
/// # Example
/// ```
/// use mpu6050_attitude::{AngleEstimator, KalmanSettings};
///
/// let settings = KalmanSettings {
///     r_measure: 1e-4, // noisier accelerometer
///     ..Default::default()
/// };
/// let estimator = AngleEstimator::with_settings(settings);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanSettings {
    /// Process noise variance for the angle
    pub q_angle: f64,
    /// Process noise variance for the rate bias
    pub q_bias: f64,
    /// Measurement noise variance
    pub r_measure: f64,
}

impl Default for KalmanSettings {
    fn default() -> Self {
        Self {
            q_angle: 3.05e-7,
            q_bias: 9.14e-7,
            r_measure: 9.14e-6,
        }
    }
}

/// Gyro-z bias calibration settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSettings {
    /// Number of raw samples averaged
    pub samples: u16,
    /// Spacing between samples in microseconds
    pub period_us: u32,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            samples: 100,
            period_us: 10_000,
        }
    }
}
