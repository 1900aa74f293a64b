/******************************************************************************
 * Cypress TrueTouch Standard Product (TTSP) Gen3 - Registers & Commands       *
 * ========================================================================== *
 * The controller exposes one register file at the base address whose layout  *
 * depends on the active firmware personality (bootloader, system            *
 * information or operational).                                               *
*******************************************************************************/

/// Default 7-bit I²C address of the controller.
pub const I2C_ADDR: u8 = 0x24;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum Reg {
  // Mode select, status blocks and touch frames
  Base = 0x00,
  // Interval block (active, touch timeout, low power)
  ActiveInterval = 0x1D,
  // Gesture active distance
  ActiveDistance = 0x1E,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

// Bus transport
pub(crate) const NUM_RETRY: usize = 4;
pub(crate) const DELAY_DFLT_MS: u32 = 20;

// Mode transitions poll every 20 ms for at most half a second
pub(crate) const DELAY_MAX: usize = 500 / DELAY_DFLT_MS as usize;
pub(crate) const BL_READY_TIMEOUT_MS: u32 = DELAY_DFLT_MS * DELAY_MAX as u32;

// Register block sizes
pub(crate) const BL_DATA_LEN: usize = 16;
pub(crate) const SYSINFO_LEN: usize = 32;
pub(crate) const FRAME_LEN: usize = 32;

// Bootloader exit: file offset, command, exit command, 8 security keys
pub(crate) const NUM_BL_KEYS: usize = 8;
pub(crate) const BL_COMMAND_LEN: usize = 3 + NUM_BL_KEYS;
pub(crate) const BL_COMMAND: [u8; BL_COMMAND_LEN] = [0x00, 0xFF, 0xA5, 0, 1, 2, 3, 4, 5, 6, 7];

/// Active distance the operational firmware reports after a mode switch.
pub const ACT_DIST_DFLT: u8 = 0xF8;
pub const ACT_INTRVL_DFLT: u8 = 0x00;
pub const TCH_TMOUT_DFLT: u8 = 0xFF;
pub const LP_INTRVL_DFLT: u8 = 0x0A;

pub(crate) const HNDSHK_BIT: u8 = 0x80;

pub(crate) const MAX_TOUCHES: usize = 4;
/// Number of track identifiers, and therefore contact slots.
pub const MAX_ID: usize = 16;
/// Upper bound of the reported touch strength.
pub const MAX_Z: u8 = 255;
