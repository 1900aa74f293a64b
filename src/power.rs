use core::convert::Infallible;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::defs::{HostMode, SleepMode};
use crate::fmt::warning;
use crate::reg::{Reg, FRAME_LEN};
use crate::{Bus, Cyttsp, Error, PowerState};

/// Board hook that brings a sleeping controller back, e.g. by pulsing its
/// interrupt or chip-select line.
#[allow(async_fn_in_trait)]
pub trait Wake {
  type Error: core::fmt::Debug;

  async fn wake(&mut self) -> Result<(), Self::Error>;
}

/// Placeholder for sessions without a wake hook. Never constructed.
pub enum NoWake {}

impl Wake for NoWake {
  type Error = Infallible;

  async fn wake(&mut self) -> Result<(), Infallible> {
    match *self {}
  }
}

impl<B, E, IRQ, D, W> Cyttsp<B, IRQ, D, W>
where
  B: Bus<Error = E>,
  IRQ: Wait,
  D: DelayNs,
  W: Wake,
{
  /// Put an active controller into the configured sleep mode.
  ///
  /// Does nothing when sleep is disabled or the session is not active.
  pub async fn suspend(&mut self) -> Result<(), Error<E>> {
    let Some(mode) = self.config.sleep else {
      return Ok(());
    };
    if self.state != PowerState::Active {
      return Ok(());
    }

    self.io.write_u8(Reg::Base, mode.into()).await?;
    self.set_state(match mode {
      SleepMode::DeepSleep => PowerState::Sleep,
      SleepMode::LowPower => PowerState::LowPower,
    });
    Ok(())
  }

  /// Wake the controller and return to the active state once the firmware
  /// reports operational mode again.
  ///
  /// Does nothing when sleep is disabled or the session is not asleep. An
  /// idle session has not completed mode entry and needs [`Cyttsp::attach`]
  /// instead.
  pub async fn resume(&mut self) -> Result<(), Error<E>> {
    if self.config.sleep.is_none() || !matches!(self.state, PowerState::Sleep | PowerState::LowPower) {
      return Ok(());
    }

    let Some(wake) = self.wake.as_mut() else {
      return Err(Error::Unsupported);
    };
    wake.wake().await.map_err(|_| Error::Wake)?;

    let buf = self.io.read::<FRAME_LEN>(Reg::Base).await?;
    if HostMode::from_bits(buf[0]).is_operational() {
      self.set_state(PowerState::Active);
    } else {
      warning!("controller still in host mode {} after wake", buf[0]);
    }
    Ok(())
  }
}
