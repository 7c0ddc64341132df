//! Shared test infrastructure for event-clock integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use event_clock::{
    Alignment, CalendarTime, Display, Eeprom, FontSize, Srgb, StoreError, StoreErrorKind,
    TimeInstant, WallClock,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock monotonic instant (milliseconds since boot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Mock wall clock that records every `set_system_time` call
pub struct MockClock {
    now: CalendarTime,
    set_calls: Vec<CalendarTime>,
}

impl MockClock {
    pub fn new(now: CalendarTime) -> Self {
        Self {
            now,
            set_calls: Vec::new(),
        }
    }

    pub fn set_calls(&self) -> &[CalendarTime] {
        &self.set_calls
    }

    /// Moves the clock without counting as a `set_system_time` call
    pub fn advance_to(&mut self, now: CalendarTime) {
        self.now = now;
    }
}

impl WallClock for MockClock {
    fn now(&self) -> CalendarTime {
        self.now
    }

    fn set_system_time(&mut self, time: CalendarTime) {
        self.now = time;
        self.set_calls.push(time);
    }
}

// ============================================================================
// Mock EEPROM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EepromOp {
    Read { mem_addr: u16, len: usize },
    Write { mem_addr: u16, len: usize },
}

/// RAM-backed EEPROM with operation log and fault injection
pub struct MockEeprom {
    mem: [u8; 64],
    ops: Vec<EepromOp>,
    /// Fail the operation with this index (0-based, counting reads and writes)
    fail_at: Option<(usize, StoreErrorKind)>,
    /// Fail every operation
    fail_all: Option<StoreErrorKind>,
    device_addrs: Vec<u8>,
}

impl MockEeprom {
    pub fn new() -> Self {
        Self {
            mem: [0; 64],
            ops: Vec::new(),
            fail_at: None,
            fail_all: None,
            device_addrs: Vec::new(),
        }
    }

    /// An EEPROM straight from the factory: all cells read 0xFF
    pub fn erased() -> Self {
        let mut eeprom = Self::new();
        eeprom.mem = [0xFF; 64];
        eeprom
    }

    pub fn fail_op(&mut self, index: usize, kind: StoreErrorKind) {
        self.fail_at = Some((index, kind));
    }

    pub fn fail_all(&mut self, kind: Option<StoreErrorKind>) {
        self.fail_all = kind;
    }

    pub fn ops(&self) -> &[EepromOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
        self.fail_at = None;
    }

    pub fn device_addrs(&self) -> &[u8] {
        &self.device_addrs
    }

    /// Text stored at `addr`, up to the first NUL
    pub fn slot_text(&self, addr: usize) -> String {
        let slot = &self.mem[addr..addr + 32];
        let end = slot.iter().position(|&b| b == 0).unwrap_or(32);
        String::from_utf8_lossy(&slot[..end]).into_owned()
    }

    pub fn poke(&mut self, addr: usize, bytes: &[u8]) {
        self.mem[addr..addr + bytes.len()].copy_from_slice(bytes);
    }

    fn check(&mut self, op: EepromOp, device_addr: u8) -> Result<(), StoreError> {
        let index = self.ops.len();
        self.ops.push(op);
        self.device_addrs.push(device_addr);
        if let Some(kind) = self.fail_all {
            return Err(StoreError::new(kind));
        }
        match self.fail_at {
            Some((at, kind)) if at == index => Err(StoreError::new(kind)),
            _ => Ok(()),
        }
    }
}

impl Eeprom for MockEeprom {
    fn write(&mut self, device_addr: u8, mem_addr: u16, bytes: &[u8]) -> Result<(), StoreError> {
        self.check(
            EepromOp::Write {
                mem_addr,
                len: bytes.len(),
            },
            device_addr,
        )?;
        let start = mem_addr as usize;
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn read(&mut self, device_addr: u8, mem_addr: u16, buf: &mut [u8]) -> Result<(), StoreError> {
        self.check(
            EepromOp::Read {
                mem_addr,
                len: buf.len(),
            },
            device_addr,
        )?;
        let start = mem_addr as usize;
        buf.copy_from_slice(&self.mem[start..start + buf.len()]);
        Ok(())
    }
}

// ============================================================================
// Mock Display
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Srgb),
    Font(FontSize),
    TextColor(Srgb),
    Text {
        x: u16,
        y: u16,
        text: String,
        alignment: Alignment,
    },
}

/// Display that records every call
pub struct MockDisplay {
    calls: Vec<DrawCall>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Text drawn since the most recent clear, in draw order
    pub fn screen(&self) -> Vec<String> {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear(_)))
            .unwrap_or(0);
        self.calls[start..]
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Clear(_)))
            .count()
    }
}

impl Display for MockDisplay {
    fn clear(&mut self, background: Srgb) {
        self.calls.push(DrawCall::Clear(background));
    }

    fn set_font(&mut self, font: FontSize) {
        self.calls.push(DrawCall::Font(font));
    }

    fn set_text_color(&mut self, color: Srgb) {
        self.calls.push(DrawCall::TextColor(color));
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, alignment: Alignment) {
        self.calls.push(DrawCall::Text {
            x,
            y,
            text: text.to_string(),
            alignment,
        });
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Shorthand for a calendar time with a one-based month
pub fn at(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> CalendarTime {
    CalendarTime::new(year, month - 1, day, hour, minute, second)
}
