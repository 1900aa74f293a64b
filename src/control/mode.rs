use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::defs::{DeviceMode, HostMode};
use crate::event::TouchFrame;
use crate::fmt::{debug, info};
use crate::reg::{Reg, ACT_DIST_DFLT, DELAY_DFLT_MS, DELAY_MAX, FRAME_LEN, SYSINFO_LEN};
use crate::{Bus, Cyttsp, Error, InitState, SysInfo, Wake};

impl<B, E, IRQ, D, W> Cyttsp<B, IRQ, D, W>
where
  B: Bus<Error = E>,
  IRQ: Wait,
  D: DelayNs,
  W: Wake,
{
  /// Select system information mode and wait for the block to populate.
  pub(crate) async fn enter_sysinfo_mode(&mut self) -> Result<SysInfo, Error<E>> {
    self.sysinfo = None;
    self.io.write_u8(Reg::Base, HostMode::select(DeviceMode::SysInfo).into_bits()).await?;

    for _ in 0..DELAY_MAX {
      self.io.delay.delay_ms(DELAY_DFLT_MS).await;
      match self.io.read::<SYSINFO_LEN>(Reg::Base).await {
        Ok(buf) => {
          let sysinfo = SysInfo::from_bytes(&buf);
          if sysinfo.is_ready() {
            info!(
              "ttsp {}.{} app {}.{} (id {}.{})",
              sysinfo.ttsp_version.major,
              sysinfo.ttsp_version.minor,
              sysinfo.app_version.major,
              sysinfo.app_version.minor,
              sysinfo.app_id.major,
              sysinfo.app_id.minor
            );
            self.sysinfo = Some(sysinfo);
            return Ok(sysinfo);
          }
        }
        Err(_) => debug!("sysinfo block unavailable, polling again"),
      }
    }

    Err(Error::Timeout(InitState::SysInfoMode))
  }

  /// Write the configured scan intervals when they differ from what the
  /// firmware currently uses. Returns `true` if a write happened.
  pub(crate) async fn apply_intervals(&mut self, current: &SysInfo) -> Result<bool, Error<E>> {
    let wanted = self.config.intervals;
    if wanted == current.intervals {
      return Ok(false);
    }

    debug!("intervals {:?} -> {:?}", current.intervals, wanted);
    self.io.write_bytes(Reg::ActiveInterval, &wanted.to_bytes()).await?;
    self.io.delay.delay_ms(DELAY_DFLT_MS).await;
    Ok(true)
  }

  /// Select operational mode and wait until the firmware reports its default
  /// active distance, which it only does once the switch completed.
  pub(crate) async fn enter_operational_mode(&mut self) -> Result<(), Error<E>> {
    self.io.write_u8(Reg::Base, HostMode::select(DeviceMode::Operational).into_bits()).await?;

    for _ in 0..DELAY_MAX {
      match self.io.read::<FRAME_LEN>(Reg::Base).await {
        Ok(buf) if TouchFrame::from_bytes(&buf).active_distance == ACT_DIST_DFLT => return Ok(()),
        Ok(_) => {}
        Err(_) => debug!("touch frame unavailable, polling again"),
      }
      self.io.delay.delay_ms(DELAY_DFLT_MS).await;
    }

    Err(Error::Timeout(InitState::OperationalMode))
  }

  pub(crate) async fn set_active_distance(&mut self) -> Result<(), Error<E>> {
    self.io.write_u8(Reg::ActiveDistance, self.config.active_distance).await
  }
}
