//! MPU-6050 register map subset used by the driver

/// I2C address with AD0 low. `WHO_AM_I` reads back the same value.
pub const MPU6050_ADDR: u8 = 0x68;

/// I2C address with AD0 high
pub const MPU6050_ADDR_ALT: u8 = 0x69;

/// Sample rate divider: rate = gyro output rate / (1 + SMPLRT_DIV)
pub const SMPLRT_DIV: u8 = 0x19;

/// Gyroscope full-scale range (FS_SEL, bits 4:3)
pub const GYRO_CONFIG: u8 = 0x1B;

/// Accelerometer full-scale range (AFS_SEL, bits 4:3)
pub const ACCEL_CONFIG: u8 = 0x1C;

/// First of 14 burst-readable data registers:
/// accel xyz, temperature, gyro xyz, big-endian
pub const ACCEL_XOUT_H: u8 = 0x3B;

pub const SIGNAL_PATH_RESET: u8 = 0x68;
pub const SIGNAL_PATH_RESET_TEMP: u8 = 0x01;
pub const SIGNAL_PATH_RESET_ACCEL: u8 = 0x02;
pub const SIGNAL_PATH_RESET_GYRO: u8 = 0x04;

pub const PWR_MGMT_1: u8 = 0x6B;
pub const PWR_MGMT_1_DEVICE_RESET: u8 = 0x80;
/// PLL with X axis gyroscope reference
pub const PWR_MGMT_1_CLKSEL_PLL_X: u8 = 0x01;

pub const PWR_MGMT_2: u8 = 0x6C;

pub const WHO_AM_I: u8 = 0x75;
pub const WHO_AM_I_VALUE: u8 = 0x68;

/// Length of the accel/temp/gyro burst
pub const DATA_LEN: usize = 14;

/// Settle time after a device or signal path reset, ms
pub const RESET_SETTLE_MS: u32 = 100;
