//! Gyroscope z-axis bias calibration

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::clock::MonotonicClock;
use crate::transport::ImuTransport;
use crate::types::CalibrationSettings;

/// Averages raw z gyroscope readings taken at a fixed cadence
///
/// Blocks for roughly `samples × period_us`. The device must be held still
/// for the whole call; nothing checks this. Sample `k` is read at or after
/// `start + k × period_us` regardless of how long each read takes, and the
/// wait between samples goes through `delay` so the caller's executor or
/// low-power wait is used instead of spinning.
///
/// A failed read contributes a zero sample, matching the per-cycle read
/// path. Failures are logged.
///
/// # Returns
/// The integer mean of the readings, truncated toward zero. Zero when
/// `samples` is zero.
pub fn calibrate_gyro_z_bias<T, C, D>(
    transport: &mut T,
    clock: &C,
    delay: &mut D,
    settings: &CalibrationSettings,
) -> i16
where
    T: ImuTransport,
    C: MonotonicClock,
    D: DelayNs,
{
    let mut sum: i64 = 0;
    let mut failures: u16 = 0;
    let mut deadline = clock.now_micros();

    for _ in 0..settings.samples {
        let gyro_z = match transport.read_raw() {
            Ok(raw) => raw.gyro.z,
            Err(err) => {
                failures += 1;
                warn!("gyro-z calibration read failed, counting as zero: {}", err);
                0
            }
        };
        sum += i64::from(gyro_z);

        deadline += u64::from(settings.period_us);
        wait_until(clock, delay, deadline);
    }

    let bias = truncated_mean(sum, settings.samples);
    info!(
        "gyro-z bias {} from {} samples ({} failed reads)",
        bias, settings.samples, failures
    );
    bias
}

/// Integer mean, truncated toward zero
pub fn truncated_mean(sum: i64, count: u16) -> i16 {
    if count == 0 {
        return 0;
    }
    // |sum| <= count * 32768, so the quotient always fits
    (sum / i64::from(count)) as i16
}

fn wait_until<C: MonotonicClock, D: DelayNs>(clock: &C, delay: &mut D, deadline: u64) {
    loop {
        let now = clock.now_micros();
        if now >= deadline {
            return;
        }
        let remaining = u32::try_from(deadline - now).unwrap_or(u32::MAX);
        delay.delay_us(remaining);
    }
}
