use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_async::i2c::{I2c, Operation};

use crate::reg::I2C_ADDR;

/// A single length-bounded register access on the controller's byte bus.
///
/// Implementations perform exactly one transfer per call and report failures
/// as-is; retrying is done by the driver.
#[allow(async_fn_in_trait)]
pub trait Bus {
  type Error: core::fmt::Debug;

  /// Read `buf.len()` bytes starting at `reg`.
  async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

  /// Write `data` starting at `reg`.
  async fn write(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// [`Bus`] adapter for controllers strapped to I²C.
pub struct I2cBus<I> {
  i2c: I,
  addr: SevenBitAddress,
}

impl<I> I2cBus<I> {
  /// Use the default controller address.
  pub fn new(i2c: I) -> Self {
    Self::with_address(i2c, I2C_ADDR)
  }

  pub fn with_address(i2c: I, addr: SevenBitAddress) -> Self {
    Self { i2c, addr }
  }

  pub fn release(self) -> I {
    self.i2c
  }
}

impl<I, E> Bus for I2cBus<I>
where
  I: I2c<SevenBitAddress, Error = E>,
  E: core::fmt::Debug,
{
  type Error = E;

  async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), E> {
    self.i2c.write_read(self.addr, &[reg], buf).await
  }

  async fn write(&mut self, reg: u8, data: &[u8]) -> Result<(), E> {
    // Adjacent writes in one transaction go out as a single frame
    let addr = [reg];
    let mut ops = [Operation::Write(&addr), Operation::Write(data)];
    self.i2c.transaction(self.addr, &mut ops).await
  }
}
