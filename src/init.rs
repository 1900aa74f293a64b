use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::defs::HostMode;
use crate::fmt::{debug, info};
use crate::reg::{Reg, BL_READY_TIMEOUT_MS};
use crate::{Bus, Cyttsp, Error, PowerState, Wake};

/// Steps of the attach sequence, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitState {
  SoftReset,
  CheckBootloader,
  ExitBootloader,
  /// Also writes the scan intervals when they differ from the firmware's.
  SysInfoMode,
  OperationalMode,
  ActiveDistance,
}

impl<B, E, IRQ, D, W> Cyttsp<B, IRQ, D, W>
where
  B: Bus<Error = E>,
  IRQ: Wait,
  D: DelayNs,
  W: Wake,
{
  /// Bring the controller from reset to streaming touch frames.
  ///
  /// Resets the controller, leaves its bootloader if needed, programs the
  /// configured scan intervals and active distance and finally selects
  /// operational mode. On failure the session is left idle and `attach` may
  /// simply be called again.
  pub async fn attach(&mut self) -> Result<(), Error<E>> {
    self.set_state(PowerState::Bootloader);
    self.slots.reset();
    self.bootloader = None;
    self.sysinfo = None;

    match self.init().await {
      Ok(()) => {
        self.set_state(PowerState::Active);
        Ok(())
      }
      Err(e) => {
        self.set_state(PowerState::Idle);
        Err(e)
      }
    }
  }

  async fn init(&mut self) -> Result<(), Error<E>> {
    let mut state = InitState::SoftReset;

    loop {
      debug!("init step {:?}", state);

      match state {
        InitState::SoftReset => {
          self.soft_reset().await?;
          state = InitState::CheckBootloader;
        }

        InitState::CheckBootloader => {
          state = if self.check_bootloader().await? {
            InitState::SysInfoMode
          } else {
            InitState::ExitBootloader
          };
        }

        InitState::ExitBootloader => {
          self.exit_bootloader().await?;
          // Application running but not yet configured
          self.set_state(PowerState::Idle);
          state = InitState::SysInfoMode;
        }

        InitState::SysInfoMode => {
          let current = self.enter_sysinfo_mode().await?;
          self.apply_intervals(&current).await?;
          state = InitState::OperationalMode;
        }

        InitState::OperationalMode => {
          self.enter_operational_mode().await?;
          state = InitState::ActiveDistance;
        }

        InitState::ActiveDistance => {
          self.set_active_distance().await?;
          info!("{} attached", self.config.name);
          return Ok(());
        }
      }
    }
  }

  /// Reset the controller and wait for the interrupt that announces its
  /// bootloader. The edge wait is armed before the reset command goes out,
  /// and exactly one of the edge and the timeout resolves the wait.
  async fn soft_reset(&mut self) -> Result<(), Error<E>> {
    let io = &mut self.io;
    let reset = async {
      io.write_u8(Reg::Base, HostMode::soft_reset_cmd().into_bits()).await?;
      io.delay.delay_ms(BL_READY_TIMEOUT_MS).await;
      Ok::<(), Error<E>>(())
    };

    match select(self.irq.wait_for_falling_edge(), reset).await {
      Either::First(Ok(())) => Ok(()),
      Either::First(Err(_)) => Err(Error::Pin),
      Either::Second(Err(e)) => Err(e),
      Either::Second(Ok(())) => Err(Error::Timeout(InitState::SoftReset)),
    }
  }
}
