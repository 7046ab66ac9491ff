//! Sensor transport seam

use crate::error::Error;
use crate::types::RawSample;

/// Anything that can deliver one raw accelerometer/gyroscope/temperature
/// sample on demand
///
/// [`Mpu6050`](crate::Mpu6050) implements this over I2C. Tests and
/// simulations can feed synthetic samples instead.
pub trait ImuTransport {
    fn read_raw(&mut self) -> Result<RawSample, Error>;
}

impl<T: ImuTransport + ?Sized> ImuTransport for &mut T {
    fn read_raw(&mut self) -> Result<RawSample, Error> {
        (**self).read_raw()
    }
}
