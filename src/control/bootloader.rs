use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::fmt::{debug, warning};
use crate::reg::{Reg, BL_COMMAND, BL_DATA_LEN, BL_COMMAND_LEN, DELAY_DFLT_MS, DELAY_MAX, NUM_BL_KEYS};
use crate::{Bus, BootloaderStatus, Cyttsp, Error, InitState, Wake};

/// Controller state derived from the bootloader status block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootState {
  /// Bootloader active with a valid application image; exit it.
  Bootloader,
  /// Bootloader active but the application checksum failed.
  NoApplication,
  /// Application already running without operational errors.
  Running,
  /// Any other combination of mode and error bits.
  Faulted,
}

/// Exit command with the security keys in its trailing bytes.
pub(crate) fn exit_command(keys: Option<[u8; NUM_BL_KEYS]>) -> [u8; BL_COMMAND_LEN] {
  let mut cmd = BL_COMMAND;
  if let Some(keys) = keys {
    cmd[BL_COMMAND_LEN - NUM_BL_KEYS..].copy_from_slice(&keys);
  }
  cmd
}

impl<B, E, IRQ, D, W> Cyttsp<B, IRQ, D, W>
where
  B: Bus<Error = E>,
  IRQ: Wait,
  D: DelayNs,
  W: Wake,
{
  /// Read the bootloader status block.
  pub async fn read_bootloader_status(&mut self) -> Result<BootloaderStatus, Error<E>> {
    let buf = self.io.read::<BL_DATA_LEN>(Reg::Base).await?;
    Ok(BootloaderStatus::from_bytes(&buf))
  }

  /// Decide whether the bootloader must be exited.
  ///
  /// Returns `true` when the application is already running.
  pub(crate) async fn check_bootloader(&mut self) -> Result<bool, Error<E>> {
    let status = self.read_bootloader_status().await?;
    self.bootloader = Some(status);

    match status.boot_state() {
      BootState::Bootloader => Ok(false),
      BootState::Running => Ok(true),
      state => {
        warning!("no usable application: {:?} (status {}, error {})", state, status.status.into_bits(), status.error);
        Err(Error::DeviceNotReady)
      }
    }
  }

  /// Send the exit command and wait for the bootloader bit to clear.
  pub(crate) async fn exit_bootloader(&mut self) -> Result<(), Error<E>> {
    let cmd = exit_command(self.config.bootloader_keys);
    self.io.write_bytes(Reg::Base, &cmd).await?;

    for _ in 0..DELAY_MAX {
      self.io.delay.delay_ms(DELAY_DFLT_MS).await;
      match self.read_bootloader_status().await {
        Ok(status) if !status.status.bootloader() => return Ok(()),
        Ok(_) => {}
        Err(_) => debug!("bootloader status unavailable, polling again"),
      }
    }

    Err(Error::Timeout(InitState::ExitBootloader))
  }
}
