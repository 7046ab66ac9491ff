//! Raw tick to physical unit conversion

use nalgebra::Vector3;

use crate::types::{AccelRange, GyroRange, PhysicalSample, RawSample};

/// Temperature ticks per °C
const TEMP_SENSITIVITY: f64 = 340.0;
/// Temperature reading at zero ticks, °C
const TEMP_OFFSET: f64 = 36.53;

/// Conversion divisors selected from the configured full-scale ranges
///
/// All three accelerometer axes share one divisor, as do the gyroscope axes.
/// Fixed once the device is initialised.
///
/// # Example
/// ```
/// use mpu6050_attitude::{AccelRange, GyroRange, ScaleConfig};
///
/// let scale = ScaleConfig::new(AccelRange::G2, GyroRange::Dps250);
/// assert_eq!(scale.accel_to_g(16384.0), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleConfig {
    accel_ticks_per_g: f64,
    gyro_ticks_per_rad_s: f64,
}

impl ScaleConfig {
    pub fn new(accel_range: AccelRange, gyro_range: GyroRange) -> Self {
        Self {
            accel_ticks_per_g: accel_range.ticks_per_g(),
            gyro_ticks_per_rad_s: gyro_range.ticks_per_rad_s(),
        }
    }

    pub fn accel_ticks_per_g(&self) -> f64 {
        self.accel_ticks_per_g
    }

    pub fn gyro_ticks_per_rad_s(&self) -> f64 {
        self.gyro_ticks_per_rad_s
    }

    /// Accelerometer ticks to g
    pub fn accel_to_g(&self, ticks: f64) -> f64 {
        ticks / self.accel_ticks_per_g
    }

    /// Gyroscope ticks to rad/s
    pub fn gyro_to_rad_s(&self, ticks: f64) -> f64 {
        ticks / self.gyro_ticks_per_rad_s
    }

    /// Converts a raw sample to physical units
    ///
    /// `gyro_z_bias` is subtracted from the z gyroscope only; x and y are
    /// converted as read.
    pub fn to_physical(&self, raw: &RawSample, gyro_z_bias: i16) -> PhysicalSample {
        let accel = raw.accel.map(|ticks| self.accel_to_g(f64::from(ticks)));
        // widen before subtracting so extreme readings cannot overflow
        let gyro_z = i32::from(raw.gyro.z) - i32::from(gyro_z_bias);
        let gyro = Vector3::new(
            self.gyro_to_rad_s(f64::from(raw.gyro.x)),
            self.gyro_to_rad_s(f64::from(raw.gyro.y)),
            self.gyro_to_rad_s(f64::from(gyro_z)),
        );

        PhysicalSample {
            accel,
            gyro,
            temperature: temperature_celsius(raw.temperature),
        }
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self::new(AccelRange::default(), GyroRange::default())
    }
}

/// Die temperature ticks to °C
pub fn temperature_celsius(ticks: i16) -> f64 {
    f64::from(ticks) / TEMP_SENSITIVITY + TEMP_OFFSET
}
