//! Two-slot persistent log of timestamps.
//!
//! The EEPROM holds two fixed 32-byte records: the latest logged timestamp at
//! offset 0 and the one before it at offset 32. Logging backs the latest
//! record up into the previous slot before overwriting it, so an interrupted
//! write can at worst duplicate a record, never lose the newest distinct one.

use crate::config::{EEPROM_DEVICE_ADDR, LATEST_SLOT_ADDR, PREVIOUS_SLOT_ADDR, RECORD_SIZE};
use crate::editor;
use crate::types::{CalendarTime, ParseError};

/// What went wrong talking to the storage device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreErrorKind {
    /// The device did not respond in time.
    Timeout,
    /// The device did not acknowledge its address or data.
    Nack,
    /// Any other bus-level failure.
    BusFault,
}

/// A failed storage operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoreError {
    pub kind: StoreErrorKind,
}

impl StoreError {
    #[inline]
    pub const fn new(kind: StoreErrorKind) -> Self {
        Self { kind }
    }
}

impl From<StoreErrorKind> for StoreError {
    fn from(kind: StoreErrorKind) -> Self {
        Self::new(kind)
    }
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            StoreErrorKind::Timeout => write!(f, "storage device timed out"),
            StoreErrorKind::Nack => write!(f, "storage device did not acknowledge"),
            StoreErrorKind::BusFault => write!(f, "storage bus fault"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}

/// Trait for abstracting a byte-addressable storage device.
///
/// Implement this for your EEPROM driver. Bus framing (internal address
/// bytes, write cycle delays) is the implementation's business; each call must
/// complete before returning.
pub trait Eeprom {
    /// Writes `bytes` starting at internal address `mem_addr`.
    fn write(&mut self, device_addr: u8, mem_addr: u16, bytes: &[u8]) -> Result<(), StoreError>;

    /// Fills `buf` from internal address `mem_addr`.
    fn read(&mut self, device_addr: u8, mem_addr: u16, buf: &mut [u8]) -> Result<(), StoreError>;
}

impl<T: Eeprom + ?Sized> Eeprom for &mut T {
    fn write(&mut self, device_addr: u8, mem_addr: u16, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).write(device_addr, mem_addr, bytes)
    }

    fn read(&mut self, device_addr: u8, mem_addr: u16, buf: &mut [u8]) -> Result<(), StoreError> {
        (**self).read(device_addr, mem_addr, buf)
    }
}

/// One 32-byte, NUL-padded log slot exactly as stored.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogRecord {
    bytes: [u8; RECORD_SIZE],
}

impl LogRecord {
    /// An empty slot.
    pub const EMPTY: LogRecord = LogRecord {
        bytes: [0; RECORD_SIZE],
    };

    /// Wraps raw slot contents.
    #[inline]
    pub const fn from_raw(bytes: [u8; RECORD_SIZE]) -> Self {
        Self { bytes }
    }

    /// Builds a record holding the formatted `time`.
    pub fn from_time(time: &CalendarTime) -> Self {
        let text = editor::format(time);
        let mut bytes = [0u8; RECORD_SIZE];
        let len = text.len().min(RECORD_SIZE - 1);
        bytes[..len].copy_from_slice(&text.as_bytes()[..len]);
        Self { bytes }
    }

    /// True when the slot has never been written (or was cleared).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes[0] == 0
    }

    /// Stored bytes up to the first NUL.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(RECORD_SIZE);
        &self.bytes[..end]
    }

    /// The stored text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// The full 32-byte slot including padding.
    #[inline]
    pub fn raw(&self) -> &[u8; RECORD_SIZE] {
        &self.bytes
    }

    /// Parses the stored text as a timestamp.
    pub fn parse(&self) -> Result<CalendarTime, ParseError> {
        editor::parse_bytes(self.as_bytes())
    }
}

impl Default for LogRecord {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl core::fmt::Debug for LogRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_str() {
            Some(text) => write!(f, "LogRecord({:?})", text),
            None => write!(f, "LogRecord({:?})", self.as_bytes()),
        }
    }
}

/// Owns the two log slots of one EEPROM device.
pub struct LogStore<E: Eeprom> {
    eeprom: E,
    device_addr: u8,
}

impl<E: Eeprom> LogStore<E> {
    /// Creates a store on the standard device address.
    pub fn new(eeprom: E) -> Self {
        Self::with_device_addr(eeprom, EEPROM_DEVICE_ADDR)
    }

    /// Creates a store on a custom device address.
    pub fn with_device_addr(eeprom: E, device_addr: u8) -> Self {
        Self {
            eeprom,
            device_addr,
        }
    }

    /// Logs `time` as the latest record, shifting the old latest to previous.
    ///
    /// Order of operations: read latest, write it to previous if non-empty,
    /// write the new record to latest. The first failing step aborts the rest.
    pub fn record(&mut self, time: &CalendarTime) -> Result<(), StoreError> {
        let latest = self.read_slot(LATEST_SLOT_ADDR)?;

        if !latest.is_empty() {
            trace!("backing up {=[u8]:a} to previous slot", latest.as_bytes());
            self.write_slot(PREVIOUS_SLOT_ADDR, &latest)?;
        }

        self.write_slot(LATEST_SLOT_ADDR, &LogRecord::from_time(time))?;
        debug!("logged {}", time);
        Ok(())
    }

    /// Reads both slots verbatim as `(latest, previous)`.
    pub fn read_both(&mut self) -> Result<(LogRecord, LogRecord), StoreError> {
        let latest = self.read_slot(LATEST_SLOT_ADDR)?;
        let previous = self.read_slot(PREVIOUS_SLOT_ADDR)?;
        Ok((latest, previous))
    }

    /// The underlying device.
    #[inline]
    pub fn eeprom(&self) -> &E {
        &self.eeprom
    }

    /// Mutable access to the underlying device.
    #[inline]
    pub fn eeprom_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }

    /// Releases the underlying device.
    pub fn into_inner(self) -> E {
        self.eeprom
    }

    fn read_slot(&mut self, mem_addr: u16) -> Result<LogRecord, StoreError> {
        let mut bytes = [0u8; RECORD_SIZE];
        self.eeprom.read(self.device_addr, mem_addr, &mut bytes)?;
        // Always NUL-terminated, whatever the device returned.
        bytes[RECORD_SIZE - 1] = 0;
        Ok(LogRecord::from_raw(bytes))
    }

    fn write_slot(&mut self, mem_addr: u16, record: &LogRecord) -> Result<(), StoreError> {
        self.eeprom.write(self.device_addr, mem_addr, record.raw())
    }
}
