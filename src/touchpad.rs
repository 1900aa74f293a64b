//! Slot-stable contact reporting.
//!
//! The controller tags every contact with a 4-bit track identifier that stays
//! fixed while the finger remains down. Those identifiers double as slot
//! numbers: each frame reports every present contact at its slot and clears
//! every other slot explicitly, so a consumer never has to diff frames to
//! notice a lifted finger.
//!
//! ```no_run
//! # use cyttsp::{Contact, Notifier, Slots};
//! let mut slots = Slots::new();
//! // ... pass `&mut slots` to `Cyttsp::next_event`
//! for contact in slots.iter() {
//!   let _ = (contact.slot, contact.x, contact.y);
//! }
//! ```

use crate::fmt::warning;
use crate::reg::{MAX_ID, MAX_Z};
use crate::{Config, Contact};

/// Sink for decoded contacts, typically a host input device.
pub trait Notifier {
  /// `contact.slot` is occupied at the given position.
  fn contact(&mut self, contact: Contact);

  /// `slot` holds no contact in this frame.
  fn empty(&mut self, slot: u8);

  /// All updates for the current frame have been delivered.
  fn sync(&mut self);
}

/// Converts per-frame contact lists into slot updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotTracker {
  occupied: u16,
}

impl SlotTracker {
  pub const fn new() -> Self {
    Self { occupied: 0 }
  }

  /// Bitmap of the slots occupied in the last reported frame.
  pub const fn occupied(&self) -> u16 {
    self.occupied
  }

  pub fn reset(&mut self) {
    self.occupied = 0;
  }

  /// Report one frame: an occupied update per contact, an empty update for
  /// every remaining slot, then a single sync.
  pub fn report<I, N>(&mut self, contacts: I, notifier: &mut N)
  where
    I: IntoIterator<Item = Contact>,
    N: Notifier,
  {
    let mut present = 0u16;

    for contact in contacts {
      if contact.slot as usize >= MAX_ID {
        warning!("track id {} out of range", contact.slot);
        continue;
      }
      present |= 1 << contact.slot;
      notifier.contact(contact);
    }

    for slot in 0..MAX_ID as u8 {
      if present & (1 << slot) == 0 {
        notifier.empty(slot);
      }
    }

    notifier.sync();
    self.occupied = present;
  }
}

/// Latest contact per slot, for consumers that poll rather than stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slots {
  contacts: [Option<Contact>; MAX_ID],
  frames: u32,
}

impl Slots {
  pub const fn new() -> Self {
    Self { contacts: [None; MAX_ID], frames: 0 }
  }

  pub fn get(&self, slot: u8) -> Option<Contact> {
    self.contacts.get(slot as usize).copied().flatten()
  }

  /// Iterate over the occupied slots in slot order.
  pub fn iter(&self) -> impl Iterator<Item = Contact> + '_ {
    self.contacts.iter().flatten().copied()
  }

  pub fn count(&self) -> usize {
    self.iter().count()
  }

  pub fn is_empty(&self) -> bool {
    self.contacts.iter().all(Option::is_none)
  }

  /// Number of completed frames seen.
  pub const fn frames(&self) -> u32 {
    self.frames
  }
}

impl Notifier for Slots {
  fn contact(&mut self, contact: Contact) {
    if let Some(entry) = self.contacts.get_mut(contact.slot as usize) {
      *entry = Some(contact);
    }
  }

  fn empty(&mut self, slot: u8) {
    if let Some(entry) = self.contacts.get_mut(slot as usize) {
      *entry = None;
    }
  }

  fn sync(&mut self) {
    self.frames = self.frames.wrapping_add(1);
  }
}

/// Axis ranges and slot count to register with a host input subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputCaps {
  pub name: &'static str,
  pub max_x: u16,
  pub max_y: u16,
  pub max_z: u8,
  pub slots: usize,
}

impl InputCaps {
  pub const fn from_config(config: &Config) -> Self {
    Self { name: config.name, max_x: config.max_x, max_y: config.max_y, max_z: MAX_Z, slots: MAX_ID }
  }
}
