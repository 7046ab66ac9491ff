//! MPU-6050 I2C driver
//!
//! Brings the device out of reset, checks its identity, programs the
//! full-scale ranges and sample rate divider, and burst-reads raw samples.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use log::{error, info};
use nalgebra::Vector3;

use crate::attitude::AttitudeTracker;
use crate::clock::MonotonicClock;
use crate::error::Error;
use crate::registers;
use crate::scale::ScaleConfig;
use crate::transport::ImuTransport;
use crate::types::{AccelRange, GyroRange, RawSample};

/// Device configuration, consumed once by [`Mpu6050::init`]
///
/// # Example
/// ```
/// use mpu6050_attitude::{AccelRange, GyroRange, Mpu6050Config};
///
/// let config = Mpu6050Config {
///     accel_range: AccelRange::G4,
///     gyro_range: GyroRange::Dps500,
///     sample_rate_divider: 7, // 1 kHz gyro rate / 8
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mpu6050Config {
    pub accel_range: AccelRange,
    pub gyro_range: GyroRange,
    /// Written to `SMPLRT_DIV` unchanged
    pub sample_rate_divider: u8,
}

/// MPU-6050 on an I2C bus
pub struct Mpu6050<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Mpu6050<I2C> {
    /// Driver for a device at the default address (AD0 low)
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, registers::MPU6050_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Reset, wake and configure the device
    ///
    /// The sequence stops at the first failed transaction or an identity
    /// mismatch. On success returns the conversion factors matching the
    /// programmed ranges.
    pub fn init<D: DelayNs>(
        &mut self,
        config: &Mpu6050Config,
        delay: &mut D,
    ) -> Result<ScaleConfig, Error> {
        self.configure(config, delay).inspect_err(|err| {
            error!("MPU-6050 at {:#04x} init failed: {}", self.address, err);
        })?;

        info!(
            "MPU-6050 at {:#04x} initialised: {:?}, {:?}, divider {}",
            self.address, config.accel_range, config.gyro_range, config.sample_rate_divider
        );
        Ok(ScaleConfig::new(config.accel_range, config.gyro_range))
    }

    fn configure<D: DelayNs>(&mut self, config: &Mpu6050Config, delay: &mut D) -> Result<(), Error> {
        self.write_register(registers::PWR_MGMT_1, registers::PWR_MGMT_1_DEVICE_RESET)?;
        delay.delay_ms(registers::RESET_SETTLE_MS);

        self.write_register(
            registers::SIGNAL_PATH_RESET,
            registers::SIGNAL_PATH_RESET_GYRO
                | registers::SIGNAL_PATH_RESET_ACCEL
                | registers::SIGNAL_PATH_RESET_TEMP,
        )?;
        delay.delay_ms(registers::RESET_SETTLE_MS);

        self.write_register(registers::PWR_MGMT_1, registers::PWR_MGMT_1_CLKSEL_PLL_X)?;
        self.write_register(registers::PWR_MGMT_2, 0)?;

        let found = self.who_am_i()?;
        if found != registers::WHO_AM_I_VALUE {
            return Err(Error::DeviceMismatch { found });
        }

        self.write_register(registers::SMPLRT_DIV, config.sample_rate_divider)?;
        self.write_register(registers::ACCEL_CONFIG, config.accel_range.register_value())?;
        self.write_register(registers::GYRO_CONFIG, config.gyro_range.register_value())?;

        Ok(())
    }

    /// Read the identity register
    pub fn who_am_i(&mut self) -> Result<u8, Error> {
        self.read_register(registers::WHO_AM_I)
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|err| Error::Bus(err.kind()))?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|err| Error::Bus(err.kind()))
    }
}

impl<I2C: I2c> ImuTransport for Mpu6050<I2C> {
    fn read_raw(&mut self) -> Result<RawSample, Error> {
        let mut buf = [0u8; registers::DATA_LEN];
        self.i2c
            .write_read(self.address, &[registers::ACCEL_XOUT_H], &mut buf)
            .map_err(|err| Error::Bus(err.kind()))?;

        let word = |i: usize| i16::from_be_bytes([buf[i], buf[i + 1]]);
        Ok(RawSample {
            accel: Vector3::new(word(0), word(2), word(4)),
            temperature: word(6),
            gyro: Vector3::new(word(8), word(10), word(12)),
        })
    }
}

impl<I2C: I2c, C: MonotonicClock> AttitudeTracker<Mpu6050<I2C>, C> {
    /// Configure the device and adopt its conversion factors
    ///
    /// On failure the tracker keeps its previous scale. On success the
    /// tracker is reset so the next [`update`](AttitudeTracker::update)
    /// seeds the estimators afresh.
    pub fn init<D: DelayNs>(&mut self, config: &Mpu6050Config, delay: &mut D) -> Result<(), Error> {
        let scale = self.transport_mut().init(config, delay)?;
        self.set_scale(scale);
        self.reset();
        Ok(())
    }
}
