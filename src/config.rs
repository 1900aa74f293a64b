use crate::defs::SleepMode;
use crate::reg::{ACT_DIST_DFLT, ACT_INTRVL_DFLT, LP_INTRVL_DFLT, NUM_BL_KEYS, TCH_TMOUT_DFLT};

/// Scan timing written to the interval registers while in system
/// information mode. All values are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Intervals {
  /// Refresh interval of the active power state. `0` scans as fast as possible.
  pub active: u8,
  /// Time without touches before the controller leaves the active state.
  pub touch_timeout: u8,
  /// Refresh interval of the low power state.
  pub low_power: u8,
}

impl Intervals {
  pub const fn new(active: u8, touch_timeout: u8, low_power: u8) -> Self {
    Self { active, touch_timeout, low_power }
  }

  pub(crate) const fn to_bytes(self) -> [u8; 3] {
    [self.active, self.touch_timeout, self.low_power]
  }
}

impl Default for Intervals {
  fn default() -> Self {
    Self::new(ACT_INTRVL_DFLT, TCH_TMOUT_DFLT, LP_INTRVL_DFLT)
  }
}

/// Device configuration supplied when the controller is attached.
///
/// # Example
/// ```no_run
/// use cyttsp::{Config, Intervals, SleepMode};
///
/// let config = Config::new()
///   .with_name("cyttsp-spi")
///   .with_resolution(480, 800)
///   .with_sleep(SleepMode::DeepSleep)
///   .with_intervals(Intervals::new(0x10, 0xFF, 0x0A));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  pub name: &'static str,
  pub max_x: u16,
  pub max_y: u16,
  /// Echo the handshake bit after every frame read.
  pub handshake: bool,
  /// Power mode entered on suspend; `None` leaves the controller running.
  pub sleep: Option<SleepMode>,
  /// Gesture active distance programmed after entering operational mode.
  pub active_distance: u8,
  pub intervals: Intervals,
  /// Security keys for leaving the bootloader; `None` uses `0..=7`.
  pub bootloader_keys: Option<[u8; NUM_BL_KEYS]>,
}

impl Config {
  pub const fn new() -> Self {
    Self {
      name: "cyttsp",
      max_x: 240,
      max_y: 320,
      handshake: false,
      sleep: None,
      active_distance: ACT_DIST_DFLT,
      intervals: Intervals::new(ACT_INTRVL_DFLT, TCH_TMOUT_DFLT, LP_INTRVL_DFLT),
      bootloader_keys: None,
    }
  }

  pub const fn with_name(mut self, name: &'static str) -> Self {
    self.name = name;
    self
  }

  pub const fn with_resolution(mut self, max_x: u16, max_y: u16) -> Self {
    self.max_x = max_x;
    self.max_y = max_y;
    self
  }

  pub const fn with_handshake(mut self, handshake: bool) -> Self {
    self.handshake = handshake;
    self
  }

  pub const fn with_sleep(mut self, mode: SleepMode) -> Self {
    self.sleep = Some(mode);
    self
  }

  pub const fn with_active_distance(mut self, active_distance: u8) -> Self {
    self.active_distance = active_distance;
    self
  }

  pub const fn with_intervals(mut self, intervals: Intervals) -> Self {
    self.intervals = intervals;
    self
  }

  pub const fn with_bootloader_keys(mut self, keys: [u8; NUM_BL_KEYS]) -> Self {
    self.bootloader_keys = Some(keys);
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new()
  }
}
