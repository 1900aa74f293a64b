use crate::defs::{HostMode, TtMode, TtStat};
use crate::reg::{FRAME_LEN, MAX_TOUCHES};

use super::{Contact, Touchpoint};

// Offsets of the four contact sub-records within the operational block
const TOUCH_OFFSETS: [usize; MAX_TOUCHES] = [3, 9, 16, 22];
const IDS12: usize = 8;
const IDS34: usize = 21;

/// Operational-mode register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchFrame {
  pub host_mode: HostMode,
  pub mode: TtMode,
  pub stat: TtStat,
  pub touches: [Touchpoint; MAX_TOUCHES],
  /// Track identifiers of touches 1 and 2 (high nibble first).
  pub ids12: u8,
  /// Track identifiers of touches 3 and 4 (high nibble first).
  pub ids34: u8,
  pub gesture_count: u8,
  pub gesture_id: u8,
  pub active_distance: u8,
}

/// Verdict on a freshly read frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameStatus {
  /// The controller reset into its bootloader.
  Bootloader,
  /// Oversized contact; all tracks are released.
  LargeArea,
  /// More touches than the hardware can report; the packet is corrupt.
  TooManyTouches(u8),
  /// The controller flagged the buffer as inconsistent.
  BadPacket,
  /// Usable frame with this many touches.
  Valid(usize),
}

impl FrameStatus {
  /// Number of touches to report for this frame.
  pub const fn touches(&self) -> usize {
    match self {
      Self::Valid(n) => *n,
      _ => 0,
    }
  }
}

impl TouchFrame {
  pub fn from_bytes(b: &[u8; FRAME_LEN]) -> Self {
    Self {
      host_mode: HostMode::from_bits(b[0]),
      mode: TtMode::from_bits(b[1]),
      stat: TtStat::from_bits(b[2]),
      touches: TOUCH_OFFSETS.map(|o| Touchpoint::from_bytes(&b[o..o + Touchpoint::LEN])),
      ids12: b[IDS12],
      ids34: b[IDS34],
      gesture_count: b[14],
      gesture_id: b[15],
      active_distance: b[30],
    }
  }

  /// Validate the frame; checks are ordered, the first match wins.
  pub fn status(&self) -> FrameStatus {
    let count = self.stat.touches();

    if self.mode.bootloader() {
      FrameStatus::Bootloader
    } else if self.stat.large_area() {
      FrameStatus::LargeArea
    } else if count as usize > MAX_TOUCHES {
      FrameStatus::TooManyTouches(count)
    } else if self.mode.bad_packet() {
      FrameStatus::BadPacket
    } else {
      FrameStatus::Valid(count as usize)
    }
  }

  /// Track identifiers of the four sub-records, in record order.
  pub const fn track_ids(&self) -> [u8; MAX_TOUCHES] {
    [self.ids12 >> 4, self.ids12 & 0x0F, self.ids34 >> 4, self.ids34 & 0x0F]
  }

  /// Pair the first `count` sub-records with their track identifiers.
  pub fn contacts(&self, count: usize) -> impl Iterator<Item = Contact> + '_ {
    self
      .track_ids()
      .into_iter()
      .zip(self.touches.iter())
      .take(count.min(MAX_TOUCHES))
      .map(|(id, point)| Contact::from_touchpoint(id, *point))
  }
}
