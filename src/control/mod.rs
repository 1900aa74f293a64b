use crate::config::Intervals;
use crate::defs::{BlStatus, HostMode};
use crate::reg::{BL_DATA_LEN, SYSINFO_LEN};

mod bootloader;
mod mode;

pub use bootloader::*;

/// Two-byte firmware version as stored by the controller (high byte first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
  pub major: u8,
  pub minor: u8,
}

impl Version {
  pub const fn new(major: u8, minor: u8) -> Self {
    Self { major, minor }
  }

  pub const fn is_zero(&self) -> bool {
    self.major == 0 && self.minor == 0
  }

  const fn at(buf: &[u8], offset: usize) -> Self {
    Self::new(buf[offset], buf[offset + 1])
  }
}

/// Snapshot of the bootloader register block.
///
/// Read fresh on every check; while the application runs, the first bytes of
/// this block alias the operational host mode and mode registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootloaderStatus {
  pub file: HostMode,
  pub status: BlStatus,
  pub error: u8,
  pub bootloader_version: Version,
  pub loader_version: Version,
  pub ttsp_version: Version,
  pub app_id: Version,
  pub app_version: Version,
  pub chip_id: [u8; 3],
}

impl BootloaderStatus {
  pub fn from_bytes(b: &[u8; BL_DATA_LEN]) -> Self {
    Self {
      file: HostMode::from_bits(b[0]),
      status: BlStatus::from_bits(b[1]),
      error: b[2],
      bootloader_version: Version::at(b, 3),
      loader_version: Version::at(b, 5),
      ttsp_version: Version::at(b, 7),
      app_id: Version::at(b, 9),
      app_version: Version::at(b, 11),
      chip_id: [b[13], b[14], b[15]],
    }
  }

  /// Classify the controller state reported by this snapshot.
  pub fn boot_state(&self) -> BootState {
    if self.status.bootloader() {
      if self.status.app_valid() {
        BootState::Bootloader
      } else {
        BootState::NoApplication
      }
    } else if self.file.is_operational() && self.status.operational_error() == 0 {
      BootState::Running
    } else {
      BootState::Faulted
    }
  }
}

/// System information register block, available after selecting the
/// system information mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysInfo {
  pub host_mode: HostMode,
  pub mfg_cmd: u8,
  pub mfg_stat: u8,
  pub chip_id: [u8; 3],
  pub uid: [u8; 8],
  pub bootloader_version: Version,
  pub ttsp_version: Version,
  pub app_id: Version,
  pub app_version: Version,
  pub scan_type: u8,
  /// Scan intervals currently in effect.
  pub intervals: Intervals,
}

impl SysInfo {
  pub fn from_bytes(b: &[u8; SYSINFO_LEN]) -> Self {
    let mut uid = [0u8; 8];
    uid.copy_from_slice(&b[7..15]);

    Self {
      host_mode: HostMode::from_bits(b[0]),
      mfg_cmd: b[1],
      mfg_stat: b[2],
      chip_id: [b[3], b[4], b[5]],
      uid,
      bootloader_version: Version::at(b, 15),
      ttsp_version: Version::at(b, 17),
      app_id: Version::at(b, 19),
      app_version: Version::at(b, 21),
      scan_type: b[28],
      intervals: Intervals::new(b[29], b[30], b[31]),
    }
  }

  /// The block is populated once the firmware reports a TTSP version.
  pub fn is_ready(&self) -> bool {
    !self.ttsp_version.is_zero()
  }
}
