use std::cell::Cell;

use mpu6050_attitude::{
    AttitudeTracker, Error, ImuTransport, MonotonicClock, RAD_TO_DEG, RawSample,
};
use nalgebra::Vector3;

const SAMPLE_PERIOD_US: u64 = 10_000; // 10 ms sample period
const TICKS_PER_G: f64 = 16384.0;
const TICKS_PER_RAD_S: f64 = 7509.872412338726;

/// Simulated body rocking in pitch while turning slowly in yaw
struct Simulation<'a> {
    now: &'a Cell<u64>,
}

impl ImuTransport for Simulation<'_> {
    fn read_raw(&mut self) -> Result<RawSample, Error> {
        let t = self.now.get() as f64 / 1e6;
        let pitch = 0.5 * (0.5 * t).sin();
        let pitch_rate = 0.25 * (0.5 * t).cos();
        let yaw_rate = 0.2;

        Ok(RawSample {
            accel: Vector3::new(-pitch.sin(), 0.0, pitch.cos()).map(|g| (g * TICKS_PER_G) as i16),
            gyro: Vector3::new(0.0, pitch_rate, yaw_rate).map(|w| (w * TICKS_PER_RAD_S) as i16),
            temperature: 0,
        })
    }
}

struct SimClock<'a> {
    now: &'a Cell<u64>,
}

impl MonotonicClock for SimClock<'_> {
    fn now_micros(&self) -> u64 {
        self.now.get()
    }
}

fn main() {
    let now = Cell::new(0);
    let mut tracker = AttitudeTracker::new(Simulation { now: &now }, SimClock { now: &now });

    for step in 0..1000 {
        // this loop should repeat each time new sensor data is available
        let data = tracker.update();

        if step % 50 == 0 {
            println!(
                "t={:5.2}s  Pitch: {:7.2}, Roll: {:7.2}, Yaw: {:7.2}",
                now.get() as f64 / 1e6,
                data.attitude.pitch * RAD_TO_DEG,
                data.attitude.roll * RAD_TO_DEG,
                data.attitude.yaw * RAD_TO_DEG
            );
        }

        now.set(now.get() + SAMPLE_PERIOD_US);
    }
}
