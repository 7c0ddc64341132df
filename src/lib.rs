#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ButtonFrontEnd`**: Interrupt-side entry point; debounces edges and posts pending triggers
//! - **`InputDebouncer`**: Per-button 200 ms cooldown, shareable from a `static`
//! - **`PendingTriggers`**: Atomic per-button flags drained by the polling loop
//! - **`AppStateMachine`**: Owns the mode and the time edit; applies presses, logs, renders
//! - **`EditSession`**: A `CalendarTime` under edit plus a cursor over its digit positions
//! - **`LogStore`**: The two-slot `latest`/`previous` log with backup-then-write
//! - **`Eeprom`**, **`Display`**, **`WallClock`**, **`TimeInstant`**: Traits to implement for your hardware
//!
//! Interrupt handlers only touch `ButtonFrontEnd`. Everything else runs on the
//! single polling loop, so the mode, the edit buffer and the cursor need no locks.

// Re-export Srgb from palette for display implementations
pub use palette::Srgb;

#[macro_use]
mod fmt;

pub mod config;
pub mod time;
pub mod types;
pub mod debounce;
pub mod trigger;
pub mod editor;
pub mod store;
pub mod display;
pub mod app;

pub use app::AppStateMachine;
pub use debounce::{DebounceState, InputDebouncer};
pub use display::{Alignment, Display, FontSize, RenderRequest};
pub use editor::EditSession;
pub use store::{Eeprom, LogRecord, LogStore, StoreError, StoreErrorKind};
pub use time::{TimeInstant, WallClock};
pub use trigger::{ButtonFrontEnd, PendingTriggers};
pub use types::{AppMode, ButtonId, CalendarTime, LogicalPress, ParseError, TimeField};
