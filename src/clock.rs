//! Monotonic time source

/// Microsecond clock used to measure the time between estimation cycles
///
/// Readings must never decrease. Wraparound, if the underlying counter has
/// one, is the implementation's problem.
pub trait MonotonicClock {
    /// Current time in microseconds
    fn now_micros(&self) -> u64;
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}
