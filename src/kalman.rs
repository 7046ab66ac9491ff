//! Single-axis angle estimator

use nalgebra::Matrix2;

use crate::types::KalmanSettings;

/// Two-state Kalman filter tracking one angle and its gyroscope rate bias
///
/// Blends an absolute but noisy angle (from the accelerometer) with an
/// integrated rate (from the gyroscope). The state is the angle and the rate
/// bias; `p` is their 2×2 error covariance.
///
/// One instance per axis. Instances are never shared between axes.
#[derive(Debug, Clone, Copy)]
pub struct AngleEstimator {
    settings: KalmanSettings,
    /// Estimated angle, rad
    angle: f64,
    /// Estimated rate bias, rad/s
    bias: f64,
    /// Bias-corrected rate from the most recent update, rad/s
    rate: f64,
    /// Error covariance
    p: Matrix2<f64>,
}

impl AngleEstimator {
    /// Create an estimator with default noise parameters
    pub fn new() -> Self {
        Self::with_settings(KalmanSettings::default())
    }

    /// Create an estimator with the given noise parameters
    pub fn with_settings(settings: KalmanSettings) -> Self {
        Self {
            settings,
            angle: 0.0,
            bias: 0.0,
            rate: 0.0,
            p: Matrix2::zeros(),
        }
    }

    /// Run one predict/correct step and return the new angle
    ///
    /// # Arguments
    /// * `new_angle` - Measured angle in rad
    /// * `new_rate` - Measured angular rate in rad/s
    /// * `dt` - Time since the previous step in seconds, `>= 0`
    ///
    /// With `dt = 0` the prediction is a no-op but the measurement is still
    /// blended in.
    ///
    /// # Example
    /// ```
    /// use mpu6050_attitude::AngleEstimator;
    ///
    /// let mut estimator = AngleEstimator::new();
    /// estimator.set_angle(0.1);
    /// let angle = estimator.update(0.12, 0.0, 0.01);
    /// assert!(angle > 0.1 && angle < 0.12);
    /// ```
    pub fn update(&mut self, new_angle: f64, new_rate: f64, dt: f64) -> f64 {
        let KalmanSettings {
            q_angle,
            q_bias,
            r_measure,
        } = self.settings;
        let p = &mut self.p;

        // Predict
        self.rate = new_rate - self.bias;
        self.angle += dt * self.rate;

        p[(0, 0)] += dt * (dt * p[(1, 1)] - p[(0, 1)] - p[(1, 0)] + q_angle);
        p[(0, 1)] -= dt * p[(1, 1)];
        p[(1, 0)] -= dt * p[(1, 1)];
        p[(1, 1)] += q_bias * dt;

        // Gain. S is only zero when both P00 and R are zero; skip the
        // correction rather than divide by it.
        let s = p[(0, 0)] + r_measure;
        if s == 0.0 {
            return self.angle;
        }
        let k0 = p[(0, 0)] / s;
        let k1 = p[(1, 0)] / s;

        // Correct
        let innovation = new_angle - self.angle;
        self.angle += k0 * innovation;
        self.bias += k1 * innovation;

        let p00 = p[(0, 0)];
        let p01 = p[(0, 1)];
        p[(0, 0)] -= k0 * p00;
        p[(0, 1)] -= k0 * p01;
        p[(1, 0)] -= k1 * p00;
        p[(1, 1)] -= k1 * p01;

        self.angle
    }

    /// Overwrite the angle, leaving bias and covariance untouched
    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }

    /// Current angle estimate in rad
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Bias-corrected rate from the last update in rad/s
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Current rate bias estimate in rad/s
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Current error covariance
    pub fn covariance(&self) -> Matrix2<f64> {
        self.p
    }

    pub fn settings(&self) -> KalmanSettings {
        self.settings
    }

    /// Change the noise parameters; the state is kept
    pub fn set_settings(&mut self, settings: KalmanSettings) {
        self.settings = settings;
    }

    /// Return to the freshly constructed state, keeping the settings
    pub fn reset(&mut self) {
        *self = Self::with_settings(self.settings);
    }
}

impl Default for AngleEstimator {
    fn default() -> Self {
        Self::new()
    }
}
