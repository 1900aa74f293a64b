use embedded_hal_async::delay::DelayNs;

use crate::fmt::debug;
use crate::reg::{Reg, DELAY_DFLT_MS, NUM_RETRY};
use crate::{Bus, Error};

/// Bus access with a bounded retry budget.
///
/// Every register operation of the driver goes through here, so isolated bus
/// glitches never reach the mode controller while a persistently broken link
/// still fails after [`NUM_RETRY`] attempts.
pub(crate) struct Transport<B, D> {
  pub(crate) bus: B,
  pub(crate) delay: D,
}

impl<B, D> Transport<B, D> {
  pub(crate) fn new(bus: B, delay: D) -> Self {
    Self { bus, delay }
  }
}

impl<B, D> Transport<B, D>
where
  B: Bus,
  D: DelayNs,
{
  pub(crate) async fn read_bytes(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
    if buf.is_empty() {
      return Err(Error::InvalidArgument);
    }

    let mut attempt = 1;
    loop {
      match self.bus.read(reg.into(), buf).await {
        Ok(()) => return Ok(()),
        Err(e) if attempt >= NUM_RETRY => return Err(Error::Bus(e)),
        Err(_) => debug!("read {:?} failed (attempt {})", reg, attempt),
      }
      attempt += 1;
      self.delay.delay_ms(DELAY_DFLT_MS).await;
    }
  }

  pub(crate) async fn write_bytes(&mut self, reg: Reg, data: &[u8]) -> Result<(), Error<B::Error>> {
    if data.is_empty() {
      return Err(Error::InvalidArgument);
    }

    let mut attempt = 1;
    loop {
      match self.bus.write(reg.into(), data).await {
        Ok(()) => return Ok(()),
        Err(e) if attempt >= NUM_RETRY => return Err(Error::Bus(e)),
        Err(_) => debug!("write {:?} failed (attempt {})", reg, attempt),
      }
      attempt += 1;
      self.delay.delay_ms(DELAY_DFLT_MS).await;
    }
  }

  // Typed helpers
  pub(crate) async fn read<const N: usize>(&mut self, reg: Reg) -> Result<[u8; N], Error<B::Error>> {
    let mut b = [0u8; N];
    self.read_bytes(reg, &mut b).await?;
    Ok(b)
  }

  pub(crate) async fn write_u8(&mut self, reg: Reg, v: u8) -> Result<(), Error<B::Error>> {
    self.write_bytes(reg, &[v]).await
  }
}
