//! Attitude tracker: one estimation cycle per call

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::calibration;
use crate::clock::MonotonicClock;
use crate::kalman::AngleEstimator;
use crate::math::{accel_angles, crosses_branch_cut, is_inverted, wrap_pi};
use crate::scale::ScaleConfig;
use crate::transport::ImuTransport;
use crate::types::{Attitude, CalibrationSettings, ImuData, KalmanSettings, RawSample};

/// Microseconds per second
const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Pitch/roll/yaw estimator for a 6-axis IMU
///
/// Pitch and roll each run through their own [`AngleEstimator`], fusing the
/// accelerometer tilt with the gyroscope rate. Yaw has no absolute reference
/// and is integrated from the z gyroscope alone.
///
/// The transport and clock are owned collaborators. Neither
/// [`update`](Self::update) nor [`calibrate_gyro_z_bias`](Self::calibrate_gyro_z_bias)
/// may run concurrently on one tracker; `&mut self` enforces that.
pub struct AttitudeTracker<T, C> {
    transport: T,
    clock: C,
    scale: ScaleConfig,
    /// Subtracted from raw z gyroscope ticks
    gyro_z_bias: i16,
    pitch: AngleEstimator,
    roll: AngleEstimator,
    /// `None` until the first cycle has seeded the estimators
    last_update_us: Option<u64>,
    /// Integrated yaw, rewrapped into (-π, π] every cycle
    yaw: f64,
}

impl<T, C> AttitudeTracker<T, C> {
    /// Create a tracker using the default ±2 g / ±250 °/s scale
    pub fn new(transport: T, clock: C) -> Self {
        Self::with_scale(transport, clock, ScaleConfig::default())
    }

    pub fn with_scale(transport: T, clock: C, scale: ScaleConfig) -> Self {
        Self {
            transport,
            clock,
            scale,
            gyro_z_bias: 0,
            pitch: AngleEstimator::new(),
            roll: AngleEstimator::new(),
            last_update_us: None,
            yaw: 0.0,
        }
    }

    /// Run one estimation cycle on an already acquired sample
    ///
    /// The first call after construction or [`reset`](Self::reset) seeds
    /// both estimators with the accelerometer angles and zeroes yaw without
    /// filtering. Later calls fuse, with `dt` taken from the previous call's
    /// timestamp.
    pub fn update_with_raw(&mut self, raw: &RawSample, now_us: u64) -> ImuData {
        let sample = self.scale.to_physical(raw, self.gyro_z_bias);
        let (pitch_acc, roll_acc) = accel_angles(raw.accel.map(f64::from));

        let Some(last_us) = self.last_update_us.replace(now_us) else {
            self.pitch.set_angle(pitch_acc);
            self.roll.set_angle(roll_acc);
            self.yaw = 0.0;
            debug!("seeded pitch {} roll {}", pitch_acc, roll_acc);

            return ImuData {
                sample,
                attitude: Attitude {
                    pitch: pitch_acc,
                    roll: roll_acc,
                    yaw: 0.0,
                },
                sample_valid: true,
            };
        };
        let dt = now_us.saturating_sub(last_us) as f64 / MICROS_PER_SECOND;

        // Reset rather than filter across the ±180° discontinuity
        let pitch = if crosses_branch_cut(pitch_acc, self.pitch.angle()) {
            debug!("pitch crossed branch cut, reset to {}", pitch_acc);
            self.pitch.set_angle(pitch_acc);
            pitch_acc
        } else {
            self.pitch.update(pitch_acc, sample.gyro.y, dt)
        };

        let roll_rate = if is_inverted(pitch) {
            -sample.gyro.x
        } else {
            sample.gyro.x
        };
        let roll = self.roll.update(roll_acc, roll_rate, dt);

        // The accumulator itself is replaced by its wrapped value, so whole
        // revolutions are not remembered.
        self.yaw = wrap_pi(self.yaw + sample.gyro.z * dt);

        ImuData {
            sample,
            attitude: Attitude {
                pitch,
                roll,
                yaw: self.yaw,
            },
            sample_valid: true,
        }
    }

    /// Forget the previous cycle; the next update seeds afresh
    ///
    /// Estimator bias and covariance are cleared too. Scale, gyro-z bias and
    /// noise settings are kept.
    pub fn reset(&mut self) {
        self.pitch.reset();
        self.roll.reset();
        self.last_update_us = None;
        self.yaw = 0.0;
    }

    /// True once the first cycle has run
    pub fn is_seeded(&self) -> bool {
        self.last_update_us.is_some()
    }

    pub fn pitch_estimator(&self) -> &AngleEstimator {
        &self.pitch
    }

    pub fn roll_estimator(&self) -> &AngleEstimator {
        &self.roll
    }

    /// Apply the same noise parameters to both estimators
    pub fn set_kalman_settings(&mut self, settings: KalmanSettings) {
        self.pitch.set_settings(settings);
        self.roll.set_settings(settings);
    }

    /// Current integrated yaw in rad
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn gyro_z_bias(&self) -> i16 {
        self.gyro_z_bias
    }

    /// Use a bias obtained elsewhere, e.g. restored from storage
    pub fn set_gyro_z_bias(&mut self, bias: i16) {
        self.gyro_z_bias = bias;
    }

    pub fn scale(&self) -> ScaleConfig {
        self.scale
    }

    pub fn set_scale(&mut self, scale: ScaleConfig) {
        self.scale = scale;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Take the collaborators back
    pub fn into_parts(self) -> (T, C) {
        (self.transport, self.clock)
    }
}

impl<T: ImuTransport, C: MonotonicClock> AttitudeTracker<T, C> {
    /// Read the clock and one sample, then run an estimation cycle
    ///
    /// A failed read is replaced by an all-zero sample and still processed,
    /// so the returned attitude is plausible but wrong for that cycle.
    /// `sample_valid` is false in that case.
    pub fn update(&mut self) -> ImuData {
        let now_us = self.clock.now_micros();
        let (raw, sample_valid) = match self.transport.read_raw() {
            Ok(raw) => (raw, true),
            Err(err) => {
                warn!("sensor read failed, substituting zero sample: {}", err);
                (RawSample::default(), false)
            }
        };

        let mut data = self.update_with_raw(&raw, now_us);
        data.sample_valid = sample_valid;
        data
    }

    /// Measure and store the gyro-z bias with the default 100 × 10 ms schedule
    ///
    /// Blocks for about a second; keep the device still.
    pub fn calibrate_gyro_z_bias<D: DelayNs>(&mut self, delay: &mut D) -> i16 {
        self.calibrate_gyro_z_bias_with(&CalibrationSettings::default(), delay)
    }

    pub fn calibrate_gyro_z_bias_with<D: DelayNs>(
        &mut self,
        settings: &CalibrationSettings,
        delay: &mut D,
    ) -> i16 {
        let bias =
            calibration::calibrate_gyro_z_bias(&mut self.transport, &self.clock, delay, settings);
        info!("gyro-z bias set to {}", bias);
        self.gyro_z_bias = bias;
        bias
    }
}
