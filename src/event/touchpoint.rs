/// One contact sub-record of a touch frame: big-endian X and Y followed by
/// the touch strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Touchpoint {
  pub x: u16,
  pub y: u16,
  pub z: u8,
}

impl Touchpoint {
  pub const LEN: usize = 5;

  pub const fn new(x: u16, y: u16, z: u8) -> Self {
    Self { x, y, z }
  }

  pub(crate) fn from_bytes(b: &[u8]) -> Self {
    Self::new(u16::from_be_bytes([b[0], b[1]]), u16::from_be_bytes([b[2], b[3]]), b[4])
  }
}

/// A decoded contact bound to its slot.
///
/// The slot is the controller's track identifier, which stays stable for as
/// long as the finger remains on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Contact {
  pub slot: u8,
  pub x: u16,
  pub y: u16,
  pub z: u8,
}

impl Contact {
  pub const fn new(slot: u8, x: u16, y: u16, z: u8) -> Self {
    Self { slot, x, y, z }
  }

  pub(crate) const fn from_touchpoint(slot: u8, point: Touchpoint) -> Self {
    Self::new(slot, point.x, point.y, point.z)
  }
}
