use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::defs::HostMode;
use crate::fmt::{debug, warning};
use crate::reg::{Reg, FRAME_LEN, HNDSHK_BIT};
use crate::{Bus, Cyttsp, Error, Notifier, PowerState, Wake};

mod frame;
mod touchpoint;

pub use frame::*;
pub use touchpoint::*;

/// What servicing one interrupt amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
  /// The controller signalled bootloader readiness; no frame was read.
  BootloaderReady,
  /// The session is idle; the frame was read and dropped.
  Discarded,
  /// A frame was reported to the notifier.
  Frame(FrameStatus),
  /// The controller had reset into its bootloader and was brought back.
  Recovered,
  /// The controller reset into its bootloader and did not come back; the
  /// session is idle until attached again.
  Lost,
}

impl<B, E, IRQ, D, W> Cyttsp<B, IRQ, D, W>
where
  B: Bus<Error = E>,
  IRQ: Wait,
  D: DelayNs,
  W: Wake,
{
  /// Wait for the interrupt line and service it.
  pub async fn next_event<N: Notifier>(&mut self, notifier: &mut N) -> Result<Outcome, Error<E>> {
    self.irq.wait_for_falling_edge().await.map_err(|_| Error::Pin)?;
    self.service_interrupt(notifier).await
  }

  /// Handle one "register contents ready" notification.
  ///
  /// In bootloader state the notification only marks readiness. Otherwise the
  /// touch frame is read, validated and forwarded to `notifier` as slot
  /// updates followed by one sync. Bus failures abort this frame only.
  pub async fn service_interrupt<N: Notifier>(&mut self, notifier: &mut N) -> Result<Outcome, Error<E>> {
    if self.state == PowerState::Bootloader {
      return Ok(Outcome::BootloaderReady);
    }

    let buf = self.io.read::<FRAME_LEN>(Reg::Base).await?;
    let frame = TouchFrame::from_bytes(&buf);

    if self.config.handshake {
      self.handshake(frame.host_mode).await?;
    }

    if self.state == PowerState::Idle {
      return Ok(Outcome::Discarded);
    }

    let status = frame.status();
    match status {
      FrameStatus::Bootloader => return Ok(self.recover().await),
      FrameStatus::Valid(_) => {}
      degraded => debug!("frame degraded: {:?}", degraded),
    }

    self.slots.report(frame.contacts(status.touches()), notifier);
    Ok(Outcome::Frame(status))
  }

  async fn handshake(&mut self, host_mode: HostMode) -> Result<(), Error<E>> {
    self.io.write_u8(Reg::Base, host_mode.into_bits() ^ HNDSHK_BIT).await
  }

  async fn recover(&mut self) -> Outcome {
    warning!("controller re-entered its bootloader");
    match self.exit_bootloader().await {
      Ok(()) => {
        self.set_state(PowerState::Active);
        Outcome::Recovered
      }
      Err(e) => {
        match e {
          Error::Timeout(step) => warning!("controller stuck in bootloader ({:?} timed out)", step),
          _ => warning!("bus failed while leaving the bootloader"),
        }
        self.set_state(PowerState::Idle);
        Outcome::Lost
      }
    }
  }
}
