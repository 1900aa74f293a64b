use bitfield_struct::bitfield;

/// Firmware personality selected through the host mode register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DeviceMode {
  Operational = 0b000,
  SysInfo = 0b001,
}

/// Power mode written to the host mode register on suspend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SleepMode {
  /// Scanning stops until the controller is woken externally.
  DeepSleep = 0x02,
  /// Scanning continues at the low power interval.
  LowPower = 0x04,
}

impl From<SleepMode> for u8 {
  fn from(v: SleepMode) -> Self {
    v as u8
  }
}

/// Host mode register (first byte of every register image).
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostMode {
  /// Return to bootloader mode.
  pub soft_reset: bool,
  pub deep_sleep: bool,
  pub low_power: bool,
  __: bool,
  #[bits(3)]
  pub device_mode: u8,
  /// Flow control toggle echoed back by the host after each frame.
  pub handshake: bool,
}

impl HostMode {
  pub(crate) const fn select(mode: DeviceMode) -> Self {
    Self::new().with_device_mode(mode as u8)
  }

  pub(crate) const fn soft_reset_cmd() -> Self {
    Self::new().with_soft_reset(true)
  }

  pub const fn is_operational(&self) -> bool {
    self.device_mode() == DeviceMode::Operational as u8
  }
}

/// Operational mode register.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TtMode {
  #[bits(4)]
  __: u8,
  /// The controller dropped back into its bootloader.
  pub bootloader: bool,
  /// The frame buffer was being updated while it was read.
  pub bad_packet: bool,
  #[bits(2)]
  ___: u8,
}

/// Operational status register.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TtStat {
  #[bits(4)]
  pub touches: u8,
  /// Contact area too large to resolve individual fingers (palm, water).
  pub large_area: bool,
  #[bits(3)]
  __: u8,
}

/// Bootloader status register.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlStatus {
  /// Application checksum verified.
  pub app_valid: bool,
  #[bits(3)]
  __: u8,
  pub bootloader: bool,
  #[bits(3)]
  ___: u8,
}

impl BlStatus {
  /// Error bits reported by the operational firmware in the same register.
  pub const fn operational_error(&self) -> u8 {
    self.into_bits() & 0x3F
  }
}
