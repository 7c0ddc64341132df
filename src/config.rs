//! Compile-time configuration.
//!
//! The device has no configuration file or command line; everything tunable
//! lives here.

/// Cooldown after an accepted button edge, in milliseconds.
pub const DEBOUNCE_MS: u32 = 200;

/// Period of the cooperative polling loop, in milliseconds.
pub const POLL_PERIOD_MS: u32 = 50;

/// Bus address of the log EEPROM.
pub const EEPROM_DEVICE_ADDR: u8 = 0xA0;

/// Internal EEPROM offset of the most recent log record.
pub const LATEST_SLOT_ADDR: u16 = 0;

/// Internal EEPROM offset of the record logged before the latest one.
pub const PREVIOUS_SLOT_ADDR: u16 = 32;

/// Size of one persisted log record, including NUL padding.
pub const RECORD_SIZE: usize = 32;

/// Length of `YYYY/MM/DD HH:MM:SS`.
pub const TIMESTAMP_LEN: usize = 19;
