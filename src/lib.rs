#![cfg_attr(not(test), no_std)]

//! MPU-6050 attitude estimation
//!
//! Estimates pitch, roll and yaw for a body carrying a 3-axis accelerometer
//! and a 3-axis gyroscope. Pitch and roll each run a two-state Kalman filter
//! (angle and gyroscope bias) that fuses the accelerometer tilt with the
//! gyroscope rate. Yaw is integrated from the z gyroscope alone; with no
//! heading reference it drifts.
//!
//! # Features
//!
//! - Per-axis Kalman filter with tunable noise parameters
//! - Pitch branch-cut reset when the accelerometer pitch jumps across ±180°
//! - Roll rate sign inversion past vertical
//! - Yaw wrapped into (-π, π]
//! - Gyroscope z bias calibration on a fixed cadence through `DelayNs`
//! - MPU-6050 driver over any `embedded-hal` 1.0 I2C bus
//! - `#![no_std]` compatible for embedded systems
//!
//! # Quick Start
//!
//! ```rust
//! use mpu6050_attitude::{AttitudeTracker, Error, ImuTransport, MonotonicClock, RawSample};
//! use nalgebra::Vector3;
//!
//! // A transport reporting a level, still device
//! struct Level;
//!
//! impl ImuTransport for Level {
//!     fn read_raw(&mut self) -> Result<RawSample, Error> {
//!         Ok(RawSample {
//!             accel: Vector3::new(0, 0, 16384),
//!             ..Default::default()
//!         })
//!     }
//! }
//!
//! // A clock advancing 10 ms per reading
//! struct Ticks(core::cell::Cell<u64>);
//!
//! impl MonotonicClock for Ticks {
//!     fn now_micros(&self) -> u64 {
//!         self.0.replace(self.0.get() + 10_000)
//!     }
//! }
//!
//! let mut tracker = AttitudeTracker::new(Level, Ticks(Default::default()));
//!
//! for _ in 0..10 {
//!     let data = tracker.update();
//!     let attitude = data.attitude;
//!     assert!(attitude.pitch.abs() < 1e-9 && attitude.roll.abs() < 1e-9);
//! }
//! ```
//!
//! With real hardware, wrap the I2C bus in [`Mpu6050`] and call
//! [`AttitudeTracker::init`] and [`AttitudeTracker::calibrate_gyro_z_bias`]
//! before polling.

mod attitude;
pub mod calibration;
mod clock;
mod error;
mod kalman;
mod math;
mod mpu6050;
pub mod registers;
mod scale;
mod transport;
mod types;

// Re-export all public types and functions
pub use attitude::AttitudeTracker;
pub use clock::MonotonicClock;
pub use error::Error;
pub use kalman::AngleEstimator;
pub use math::{DEG_TO_RAD, RAD_TO_DEG, accel_angles, wrap_pi};
pub use mpu6050::{Mpu6050, Mpu6050Config};
pub use scale::{ScaleConfig, temperature_celsius};
pub use transport::ImuTransport;
pub use types::*;
