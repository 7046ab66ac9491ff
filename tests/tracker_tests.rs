//! End-to-end behaviour of the attitude tracker with scripted collaborators

use std::cell::Cell;
use std::collections::VecDeque;
use std::f64::consts::PI;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use mpu6050_attitude::{
    AccelRange, AttitudeTracker, CalibrationSettings, Error, GyroRange, ImuTransport,
    KalmanSettings, MonotonicClock, RawSample, ScaleConfig, accel_angles,
};
use nalgebra::Vector3;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64;

/// Shared simulated time in microseconds
#[derive(Clone, Default)]
struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    fn advance(&self, us: u64) {
        self.0.set(self.0.get() + us);
    }
}

impl MonotonicClock for SimClock {
    fn now_micros(&self) -> u64 {
        self.0.get()
    }
}

/// Delay that moves the simulated clock forward
struct SimDelay(SimClock);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance(u64::from(ns).div_ceil(1_000));
    }
}

/// Replays queued samples; `None` entries are transport failures.
/// Falls back to `idle` once the queue is drained.
struct ScriptedTransport {
    queue: VecDeque<Option<RawSample>>,
    idle: RawSample,
    reads: usize,
}

impl ScriptedTransport {
    fn new(idle: RawSample) -> Self {
        Self {
            queue: VecDeque::new(),
            idle,
            reads: 0,
        }
    }
}

impl ImuTransport for ScriptedTransport {
    fn read_raw(&mut self) -> Result<RawSample, Error> {
        self.reads += 1;
        match self.queue.pop_front() {
            Some(Some(raw)) => Ok(raw),
            Some(None) => Err(Error::Bus(ErrorKind::Other)),
            None => Ok(self.idle),
        }
    }
}

fn raw(accel: [i16; 3], gyro: [i16; 3]) -> RawSample {
    RawSample {
        accel: Vector3::from(accel),
        gyro: Vector3::from(gyro),
        temperature: 0,
    }
}

const LEVEL: [i16; 3] = [0, 0, 16384];

fn tracker(idle: RawSample) -> (AttitudeTracker<ScriptedTransport, SimClock>, SimClock) {
    let clock = SimClock::default();
    let tracker = AttitudeTracker::new(ScriptedTransport::new(idle), clock.clone());
    (tracker, clock)
}

/// Gravity in sensor ticks for a body pitched by `pitch` and rolled by `roll`
fn gravity_ticks(pitch: f64, roll: f64, ticks_per_g: f64) -> [i16; 3] {
    let x = -pitch.sin() * roll.cos();
    let y = roll.sin();
    let z = pitch.cos() * roll.cos();
    [
        (x * ticks_per_g).round() as i16,
        (y * ticks_per_g).round() as i16,
        (z * ticks_per_g).round() as i16,
    ]
}

#[test]
fn test_first_update_seeds_from_accelerometer() {
    let sample = raw([-3000, 2000, 15000], [800, -800, 800]);
    let (mut tracker, clock) = tracker(sample);
    clock.advance(5_000_000);

    let data = tracker.update();

    let (pitch_acc, roll_acc) = accel_angles(sample.accel.map(f64::from));
    assert_eq!(tracker.pitch_estimator().angle(), pitch_acc);
    assert_eq!(tracker.roll_estimator().angle(), roll_acc);
    assert_eq!(data.attitude.yaw, 0.0);
    assert!(data.sample_valid);
}

#[test]
fn test_transport_failure_yields_flagged_zero_sample() {
    let (mut tracker, clock) = tracker(raw(LEVEL, [0, 0, 0]));
    tracker.update();
    clock.advance(10_000);
    tracker.transport_mut().queue.push_back(None);

    let data = tracker.update();

    assert!(!data.sample_valid);
    assert_eq!(data.sample.accel, Vector3::zeros());
    assert_eq!(data.sample.gyro, Vector3::zeros());
    assert_eq!(data.sample.temperature, 36.53);

    clock.advance(10_000);
    assert!(tracker.update().sample_valid);
}

#[test]
fn test_dt_comes_from_clock() {
    let gyro_z = 3000;
    let (mut tracker, clock) = tracker(raw(LEVEL, [0, 0, gyro_z]));
    let rate = tracker.scale().gyro_to_rad_s(f64::from(gyro_z));

    tracker.update();
    clock.advance(250_000);
    let yaw = tracker.update().attitude.yaw;

    assert!((yaw - rate * 0.25).abs() < 1e-12);
}

#[test]
fn test_yaw_output_always_within_half_open_interval() {
    // full-scale rate at ±2000 °/s spins several revolutions per second
    let scale = ScaleConfig::new(AccelRange::G2, GyroRange::Dps2000);
    let clock = SimClock::default();
    let mut tracker = AttitudeTracker::with_scale(
        ScriptedTransport::new(raw(LEVEL, [0, 0, -30000])),
        clock.clone(),
        scale,
    );

    let mut unwrapped = 0.0;
    let rate = scale.gyro_to_rad_s(-30000.0);
    for cycle in 0..2000 {
        let yaw = tracker.update().attitude.yaw;
        assert!(yaw > -PI && yaw <= PI, "cycle {}: yaw {}", cycle, yaw);
        if cycle > 0 {
            unwrapped += rate * 0.005;
        }
        clock.advance(5_000);
    }
    assert!(unwrapped.abs() > 10.0 * PI);
}

#[test]
fn test_pitch_flip_through_tracker() {
    let (mut tracker, clock) = tracker(raw(LEVEL, [0, 0, 0]));
    let plus = raw([-1428, 0, -16322], [0, 0, 0]);
    let minus = raw([1428, 0, -16322], [0, 0, 0]);
    tracker.transport_mut().queue.extend([Some(plus), Some(plus), Some(minus)]);

    tracker.update();
    clock.advance(10_000);
    let before = tracker.update().attitude.pitch;
    clock.advance(10_000);
    let after = tracker.update().attitude.pitch;

    let (minus_acc, _) = accel_angles(minus.accel.map(f64::from));
    assert!(before > 170.0_f64.to_radians());
    assert_eq!(after, minus_acc);
}

#[test]
fn test_tracks_static_tilt_through_noise() {
    let pitch = 20.0_f64.to_radians();
    let roll = -35.0_f64.to_radians();
    let base = gravity_ticks(pitch, roll, 16384.0);
    let (mut tracker, clock) = tracker(raw(base, [0, 0, 0]));
    let mut rng = Pcg64::seed_from_u64(7);

    for _ in 0..3000 {
        let accel = base.map(|v| v.saturating_add(rng.random_range(-300..=300)));
        let gyro = [0; 3].map(|_: i16| rng.random_range(-40..=40));
        tracker.transport_mut().queue.push_back(Some(raw(accel, gyro)));
        tracker.update();
        clock.advance(10_000);
    }

    let attitude_pitch = tracker.pitch_estimator().angle();
    let attitude_roll = tracker.roll_estimator().angle();
    assert!((attitude_pitch - pitch).abs() < 1.0_f64.to_radians());
    assert!((attitude_roll - roll).abs() < 1.0_f64.to_radians());
}

#[test]
fn test_follows_rotation_with_gyro() {
    // pitch ramps 0 -> 40° over 2 s, gyro y reports the true rate
    let scale = ScaleConfig::default();
    let (mut tracker, clock) = tracker(raw(LEVEL, [0, 0, 0]));
    let duration = 2.0;
    let steps = 200;
    let dt = duration / f64::from(steps);
    let rate = 40.0_f64.to_radians() / duration;
    let gyro_y = (rate * scale.gyro_ticks_per_rad_s()).round() as i16;

    for step in 0..=steps {
        let pitch = rate * dt * f64::from(step);
        let accel = gravity_ticks(pitch, 0.0, scale.accel_ticks_per_g());
        tracker.transport_mut().queue.push_back(Some(raw(accel, [0, gyro_y, 0])));
        tracker.update();
        clock.advance((dt * 1e6) as u64);
    }

    let estimated = tracker.pitch_estimator().angle();
    assert!((estimated - 40.0_f64.to_radians()).abs() < 0.5_f64.to_radians());
}

#[test]
fn test_calibration_removes_gyro_z_offset_from_yaw() {
    let offset = 57;
    let (mut tracker, clock) = tracker(raw(LEVEL, [0, 0, offset]));
    let mut delay = SimDelay(clock.clone());

    let bias = tracker.calibrate_gyro_z_bias(&mut delay);

    assert_eq!(bias, offset);
    assert_eq!(tracker.gyro_z_bias(), offset);
    assert_eq!(tracker.transport().reads, 100);
    // about one second of blocking
    assert_eq!(clock.now_micros(), 1_000_000);

    for _ in 0..100 {
        tracker.update();
        clock.advance(10_000);
    }
    assert_eq!(tracker.yaw(), 0.0);
}

#[test]
fn test_calibration_truncates_mean() {
    let (mut tracker, clock) = tracker(raw(LEVEL, [0, 0, 0]));
    let samples = [-5, -6, -6, -6];
    tracker
        .transport_mut()
        .queue
        .extend(samples.map(|z| Some(raw(LEVEL, [0, 0, z]))));
    let settings = CalibrationSettings {
        samples: 4,
        period_us: 2_000,
    };

    let bias = tracker.calibrate_gyro_z_bias_with(&settings, &mut SimDelay(clock.clone()));

    // -23 / 4 = -5.75
    assert_eq!(bias, -5);
    assert_eq!(clock.now_micros(), 8_000);
}

#[test]
fn test_tuned_settings_apply_to_both_axes() {
    let (mut tracker, _) = tracker(raw(LEVEL, [0, 0, 0]));
    let settings = KalmanSettings {
        r_measure: 0.03,
        ..Default::default()
    };

    tracker.set_kalman_settings(settings);

    assert_eq!(tracker.pitch_estimator().settings(), settings);
    assert_eq!(tracker.roll_estimator().settings(), settings);
}

#[test]
fn test_into_parts_returns_collaborators() {
    let (mut tracker, clock) = tracker(raw(LEVEL, [0, 0, 0]));
    tracker.update();
    clock.advance(1);
    tracker.update();

    let (transport, returned_clock) = tracker.into_parts();
    assert_eq!(transport.reads, 2);
    assert_eq!(returned_clock.now_micros(), 1);
}
