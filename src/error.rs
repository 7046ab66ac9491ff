//! Error type for device access

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A register read or write failed on the bus
    #[error("I2C transaction failed: {0:?}")]
    Bus(ErrorKind),

    /// `WHO_AM_I` did not identify an MPU-6050
    #[error("unexpected WHO_AM_I value {found:#04x}")]
    DeviceMismatch { found: u8 },
}
