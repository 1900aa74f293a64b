#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async, `no_std` driver core for Cypress TrueTouch Standard Product (TTSP)
//! Gen3 touchscreen controllers.
//!
//! The controller firmware runs in one of three personalities (bootloader,
//! system information, operational) that all share one register file. This
//! crate drives the controller from power-on to streaming touch frames:
//!
//! - Soft reset and exit of the resident bootloader with security keys
//! - Programming of scan intervals and gesture active distance
//! - Validation of touch frames, including recovery when the controller
//!   spontaneously drops back into its bootloader
//! - Slot-stable multi-touch reporting through a [`Notifier`]
//! - Suspend and resume through a board-provided [`Wake`] hook
//!
//! The register bus is abstracted by [`Bus`]; [`I2cBus`] adapts any
//! `embedded-hal-async` I²C peripheral.
//!
//! ```no_run
//! use embedded_hal_async::{delay::DelayNs, digital::Wait, i2c::I2c};
//! use cyttsp::{Config, Cyttsp, I2cBus, Slots};
//!
//! async fn example<I2C, IRQ, D>(i2c: I2C, irq: IRQ, delay: D) -> Result<(), cyttsp::Error<I2C::Error>>
//! where
//!   I2C: I2c,
//!   IRQ: Wait,
//!   D: DelayNs,
//! {
//!   let config = Config::new().with_resolution(480, 800);
//!   let mut touch = Cyttsp::new(I2cBus::new(i2c), irq, delay, config);
//!   touch.attach().await?;
//!
//!   let mut slots = Slots::new();
//!   loop {
//!     touch.next_event(&mut slots).await?;
//!   }
//! }
//! ```
mod fmt;

mod bus;
mod config;
mod control;
mod defs;
mod event;
mod init;
mod power;
mod reg;
mod rw;
mod touchpad;

#[cfg(test)]
mod mock;

use fmt::info;
use rw::Transport;

pub use bus::{Bus, I2cBus};
pub use config::{Config, Intervals};
pub use control::{BootState, BootloaderStatus, SysInfo, Version};
pub use defs::{BlStatus, DeviceMode, HostMode, SleepMode, TtMode, TtStat};
pub use event::{Contact, FrameStatus, Outcome, TouchFrame, Touchpoint};
pub use init::InitState;
pub use power::{NoWake, Wake};
pub use reg::{ACT_DIST_DFLT, ACT_INTRVL_DFLT, I2C_ADDR, LP_INTRVL_DFLT, MAX_ID, MAX_Z, TCH_TMOUT_DFLT};
pub use touchpad::{InputCaps, Notifier, SlotTracker, Slots};

/// Errors that can occur while interacting with the controller.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// Bus transfer failed on every attempt; carries the last bus error.
  Bus(E),
  /// A register access was requested with an empty buffer.
  InvalidArgument,
  /// A mode transition did not complete in time.
  Timeout(InitState),
  /// The controller has no usable application firmware.
  DeviceNotReady,
  /// The operation needs a wake hook and none was provided.
  Unsupported,
  /// The interrupt line could not be waited on.
  Pin,
  /// The wake hook failed.
  Wake,
}

/// Power state of an attached controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
  /// Not streaming; frames are dropped until the next attach.
  Idle,
  /// Operational and streaming touch frames.
  Active,
  LowPower,
  Sleep,
  /// A mode transition is in flight; interrupts only signal readiness.
  Bootloader,
  /// Never entered.
  Invalid,
}

/// Driver session for one TTSP controller.
///
/// Owns the register bus, the interrupt line, a delay provider and optionally
/// a [`Wake`] hook. Create it with [`Cyttsp::new`], bring the controller up
/// with [`Cyttsp::attach`] and then feed interrupts to
/// [`Cyttsp::next_event`] or [`Cyttsp::service_interrupt`].
pub struct Cyttsp<B, IRQ, D, W = NoWake> {
  io: Transport<B, D>,
  irq: IRQ,
  wake: Option<W>,
  config: Config,
  state: PowerState,
  slots: SlotTracker,
  bootloader: Option<BootloaderStatus>,
  sysinfo: Option<SysInfo>,
}

impl<B, IRQ, D> Cyttsp<B, IRQ, D> {
  /// Create a session. Nothing is sent to the controller until
  /// [`Cyttsp::attach`] is called.
  pub fn new(bus: B, irq: IRQ, delay: D, config: Config) -> Self {
    Self {
      io: Transport::new(bus, delay),
      irq,
      wake: None,
      config,
      state: PowerState::Idle,
      slots: SlotTracker::new(),
      bootloader: None,
      sysinfo: None,
    }
  }
}

impl<B, IRQ, D, W> Cyttsp<B, IRQ, D, W> {
  /// Install the hook used by [`Cyttsp::resume`].
  pub fn with_wake<W2: Wake>(self, wake: W2) -> Cyttsp<B, IRQ, D, W2> {
    Cyttsp {
      io: self.io,
      irq: self.irq,
      wake: Some(wake),
      config: self.config,
      state: self.state,
      slots: self.slots,
      bootloader: self.bootloader,
      sysinfo: self.sysinfo,
    }
  }

  /// Detach and hand back the bus, interrupt line and delay.
  pub fn release(self) -> (B, IRQ, D) {
    (self.io.bus, self.irq, self.io.delay)
  }

  pub fn power_state(&self) -> PowerState {
    self.state
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Bootloader status read during the last attach.
  pub fn bootloader_status(&self) -> Option<&BootloaderStatus> {
    self.bootloader.as_ref()
  }

  /// System information read during the last attach.
  pub fn sysinfo(&self) -> Option<&SysInfo> {
    self.sysinfo.as_ref()
  }

  /// Bitmap of the slots occupied in the last reported frame.
  pub fn occupied_slots(&self) -> u16 {
    self.slots.occupied()
  }

  pub fn input_caps(&self) -> InputCaps {
    InputCaps::from_config(&self.config)
  }

  pub(crate) fn set_state(&mut self, state: PowerState) {
    if self.state != state {
      info!("power state {:?} -> {:?}", self.state, state);
      self.state = state;
    }
  }
}
