//! Test doubles: a register-level controller model, a recording delay, an
//! interrupt line and a recording notifier.

use core::cell::Cell;
use core::convert::Infallible;
use core::future::poll_fn;
use core::task::Poll;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::ErrorType;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::reg::{BL_COMMAND, BL_COMMAND_LEN, FRAME_LEN, NUM_BL_KEYS};
use crate::{Bus, Config, Contact, Cyttsp, Notifier, TouchFrame, Wake};

pub(crate) type Driver = Cyttsp<FakeDevice, MockIrq, MockDelay>;

/// Session over a simulated controller wired to the interrupt line.
pub(crate) fn driver(config: Config) -> Driver {
  let irq = MockIrq::default();
  let mut device = FakeDevice::new();
  device.irq = irq.line.clone();
  Cyttsp::new(device, irq, MockDelay::default(), config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
  Bootloader,
  SysInfo,
  Operational,
}

#[derive(Debug)]
pub(crate) struct FakeBusError;

/// Controller model answering reads from the register image of its current
/// firmware personality.
pub(crate) struct FakeDevice {
  pub mode: Mode,
  /// Personality entered on soft reset.
  pub resets_to: Mode,
  pub app_valid: bool,
  pub keys: [u8; NUM_BL_KEYS],
  pub stuck_in_bootloader: bool,
  /// Pulse the interrupt line once a soft reset lands.
  pub pulses_irq: bool,
  pub irq: IrqLine,
  /// Whether a waiter was listening when the last soft reset landed.
  pub irq_armed_at_reset: Option<bool>,
  /// Unpopulated system information reads before the block is ready.
  pub sysinfo_polls: usize,
  sysinfo_pending: usize,

  pub frame: [u8; FRAME_LEN],
  pub sysinfo: [u8; 32],

  pub fail_reads: usize,
  pub fail_writes: usize,
  pub read_calls: usize,
  pub write_calls: usize,
  /// Successful writes as `(register, data)`.
  pub writes: Vec<(u8, Vec<u8>)>,
}

impl FakeDevice {
  /// Running controller whose soft reset lands in the bootloader.
  pub fn new() -> Self {
    let mut sysinfo = [0u8; 32];
    sysinfo[0] = 0x10;
    sysinfo[3..6].copy_from_slice(&[0x0A, 0x0B, 0x0C]);
    sysinfo[17..19].copy_from_slice(&[0x01, 0x23]);
    sysinfo[21..23].copy_from_slice(&[0x02, 0x05]);
    sysinfo[29..32].copy_from_slice(&[0x00, 0xFF, 0x0A]);

    Self {
      mode: Mode::Operational,
      resets_to: Mode::Bootloader,
      app_valid: true,
      keys: [0, 1, 2, 3, 4, 5, 6, 7],
      stuck_in_bootloader: false,
      pulses_irq: true,
      irq: IrqLine::default(),
      irq_armed_at_reset: None,
      sysinfo_polls: 0,
      sysinfo_pending: 0,
      frame: FrameBuilder::new().bytes(),
      sysinfo,
      fail_reads: 0,
      fail_writes: 0,
      read_calls: 0,
      write_calls: 0,
      writes: Vec::new(),
    }
  }

  /// Running controller whose soft reset keeps the application running.
  pub fn operational() -> Self {
    Self { resets_to: Mode::Operational, ..Self::new() }
  }

  /// Simulate a spontaneous reset into the bootloader.
  pub fn reset_to_bootloader(&mut self) {
    self.mode = Mode::Bootloader;
  }

  pub fn exit_commands(&self) -> usize {
    self.writes.iter().filter(|(reg, data)| *reg == 0x00 && is_exit_command(data)).count()
  }

  fn bootloader_image(&self) -> [u8; 32] {
    let mut b = [0u8; 32];
    b[1] = 0x10 | self.app_valid as u8;
    b[3..5].copy_from_slice(&[0x01, 0x02]);
    b[7..9].copy_from_slice(&[0x01, 0x23]);
    b[13..16].copy_from_slice(&[0x0A, 0x0B, 0x0C]);
    b
  }

  fn image(&mut self) -> [u8; 32] {
    match self.mode {
      Mode::Bootloader => self.bootloader_image(),
      Mode::SysInfo if self.sysinfo_pending > 0 => {
        self.sysinfo_pending -= 1;
        let mut b = [0u8; 32];
        b[0] = 0x10;
        b
      }
      Mode::SysInfo => self.sysinfo,
      Mode::Operational => self.frame,
    }
  }

  fn soft_reset(&mut self) {
    self.mode = self.resets_to;
    self.irq_armed_at_reset = Some(self.irq.is_armed());
    if self.pulses_irq {
      self.irq.pulse();
    }
  }

  fn command(&mut self, data: &[u8]) {
    if self.mode == Mode::Bootloader {
      if is_exit_command(data) && data[3..] == self.keys && !self.stuck_in_bootloader {
        self.mode = Mode::Operational;
      }
      if data == [0x01] {
        self.soft_reset();
      }
      return;
    }

    let Some(&b) = data.first() else { return };
    if b & 0x01 != 0 {
      self.soft_reset();
      return;
    }
    match (b >> 4) & 0x07 {
      0 => {
        self.mode = Mode::Operational;
        self.frame[0] = b;
      }
      1 => {
        self.mode = Mode::SysInfo;
        self.sysinfo_pending = self.sysinfo_polls;
      }
      _ => {}
    }
  }
}

fn is_exit_command(data: &[u8]) -> bool {
  data.len() == BL_COMMAND_LEN && data[..3] == BL_COMMAND[..3]
}

impl Bus for FakeDevice {
  type Error = FakeBusError;

  async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), FakeBusError> {
    self.read_calls += 1;
    if self.fail_reads > 0 {
      self.fail_reads -= 1;
      return Err(FakeBusError);
    }

    let image = self.image();
    let start = reg as usize;
    buf.copy_from_slice(&image[start..start + buf.len()]);
    Ok(())
  }

  async fn write(&mut self, reg: u8, data: &[u8]) -> Result<(), FakeBusError> {
    self.write_calls += 1;
    if self.fail_writes > 0 {
      self.fail_writes -= 1;
      return Err(FakeBusError);
    }

    self.writes.push((reg, data.to_vec()));
    let start = reg as usize;
    match (reg, self.mode) {
      (0x00, _) => self.command(data),
      (_, Mode::SysInfo) => self.sysinfo[start..start + data.len()].copy_from_slice(data),
      (_, Mode::Operational) => self.frame[start..start + data.len()].copy_from_slice(data),
      (_, Mode::Bootloader) => {}
    }
    Ok(())
  }
}

#[derive(Debug, Default)]
pub(crate) struct MockDelay {
  pub calls: usize,
  pub total_ms: u32,
}

// Elapses after one pending poll, so concurrent futures get a turn first.
async fn elapse() {
  let mut pending = true;
  poll_fn(|cx| {
    if pending {
      pending = false;
      cx.waker().wake_by_ref();
      Poll::Pending
    } else {
      Poll::Ready(())
    }
  })
  .await
}

impl DelayNs for MockDelay {
  async fn delay_ns(&mut self, ns: u32) {
    self.calls += 1;
    self.total_ms += ns / 1_000_000;
    elapse().await
  }

  async fn delay_us(&mut self, us: u32) {
    self.calls += 1;
    self.total_ms += us / 1_000;
    elapse().await
  }

  async fn delay_ms(&mut self, ms: u32) {
    self.calls += 1;
    self.total_ms += ms;
    elapse().await
  }
}

#[derive(Debug, Default)]
struct LineState {
  armed: Cell<bool>,
  latched: Cell<usize>,
}

/// Interrupt line shared between the controller model and [`MockIrq`].
#[derive(Debug, Clone, Default)]
pub(crate) struct IrqLine(Rc<LineState>);

impl IrqLine {
  /// Falling edge. Only seen when a waiter is already listening.
  pub fn pulse(&self) {
    if self.0.armed.get() {
      self.0.latched.set(self.0.latched.get() + 1);
    }
  }

  pub fn is_armed(&self) -> bool {
    self.0.armed.get()
  }
}

// Stops listening when the waiting future completes or is dropped
struct Listening<'a>(&'a LineState);

impl Drop for Listening<'_> {
  fn drop(&mut self) {
    self.0.armed.set(false);
  }
}

/// Edge-triggered interrupt input: a wait completes on an edge that arrives
/// after the wait was first polled.
#[derive(Default)]
pub(crate) struct MockIrq {
  pub line: IrqLine,
  pub edges: usize,
}

impl MockIrq {
  /// Edge already latched by the pin driver before anyone waits.
  pub fn queue(&mut self) {
    let state = &self.line.0;
    state.latched.set(state.latched.get() + 1);
  }

  async fn edge(&mut self) -> Result<(), Infallible> {
    let state = &*self.line.0;
    let _listening = Listening(state);
    poll_fn(|_| {
      state.armed.set(true);
      match state.latched.get() {
        0 => Poll::Pending,
        n => {
          state.latched.set(n - 1);
          Poll::Ready(())
        }
      }
    })
    .await;
    self.edges += 1;
    Ok(())
  }
}

impl ErrorType for MockIrq {
  type Error = Infallible;
}

impl Wait for MockIrq {
  async fn wait_for_high(&mut self) -> Result<(), Infallible> {
    self.edge().await
  }

  async fn wait_for_low(&mut self) -> Result<(), Infallible> {
    self.edge().await
  }

  async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
    self.edge().await
  }

  async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
    self.edge().await
  }

  async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
    self.edge().await
  }
}

#[derive(Debug, Default)]
pub(crate) struct WakeCounter {
  pub calls: usize,
  pub fail: bool,
}

impl Wake for WakeCounter {
  type Error = ();

  async fn wake(&mut self) -> Result<(), ()> {
    self.calls += 1;
    if self.fail {
      Err(())
    } else {
      Ok(())
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Update {
  Contact(Contact),
  Empty(u8),
  Sync,
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
  pub updates: Vec<Update>,
}

impl Recorder {
  pub fn occupied(&self) -> Vec<Contact> {
    self
      .updates
      .iter()
      .filter_map(|u| match u {
        Update::Contact(c) => Some(*c),
        _ => None,
      })
      .collect()
  }

  pub fn empty_slots(&self) -> Vec<u8> {
    self
      .updates
      .iter()
      .filter_map(|u| match u {
        Update::Empty(slot) => Some(*slot),
        _ => None,
      })
      .collect()
  }

  pub fn syncs(&self) -> usize {
    self.updates.iter().filter(|u| **u == Update::Sync).count()
  }
}

impl Notifier for Recorder {
  fn contact(&mut self, contact: Contact) {
    self.updates.push(Update::Contact(contact));
  }

  fn empty(&mut self, slot: u8) {
    self.updates.push(Update::Empty(slot));
  }

  fn sync(&mut self) {
    self.updates.push(Update::Sync);
  }
}

/// Builds operational register images.
#[derive(Debug, Clone)]
pub(crate) struct FrameBuilder {
  b: [u8; FRAME_LEN],
  count: usize,
}

impl FrameBuilder {
  const OFFSETS: [usize; 4] = [3, 9, 16, 22];

  /// Empty frame with the firmware's default active distance.
  pub fn new() -> Self {
    let mut b = [0u8; FRAME_LEN];
    b[30] = 0xF8;
    Self { b, count: 0 }
  }

  pub fn touch(mut self, id: u8, x: u16, y: u16, z: u8) -> Self {
    let o = Self::OFFSETS[self.count];
    self.b[o..o + 2].copy_from_slice(&x.to_be_bytes());
    self.b[o + 2..o + 4].copy_from_slice(&y.to_be_bytes());
    self.b[o + 4] = z;

    let (idx, shift) = match self.count {
      0 => (8, 4),
      1 => (8, 0),
      2 => (21, 4),
      _ => (21, 0),
    };
    self.b[idx] |= (id & 0x0F) << shift;

    self.count += 1;
    self.b[2] = (self.b[2] & 0xF0) | self.count as u8;
    self
  }

  pub fn host(mut self, v: u8) -> Self {
    self.b[0] = v;
    self
  }

  pub fn mode(mut self, v: u8) -> Self {
    self.b[1] = v;
    self
  }

  pub fn stat(mut self, v: u8) -> Self {
    self.b[2] = v;
    self
  }

  pub fn bytes(self) -> [u8; FRAME_LEN] {
    self.b
  }

  pub fn decode(self) -> TouchFrame {
    TouchFrame::from_bytes(&self.b)
  }
}
