//! Field-oriented editing of a `YYYY/MM/DD HH:MM:SS` timestamp.
//!
//! The timestamp is held as a typed [`CalendarTime`] while it is edited. The
//! fixed-width text form only exists at the edges: [`format`] for rendering
//! and persisting, [`parse`] for reading stored records back.
//!
//! A cursor walks the 14 digit positions of the text form. Adjusting the
//! value changes the whole field under the cursor, not the single digit:
//! months and days wrap within their calendar range, hours within a day,
//! minutes and seconds within an hour.

use core::fmt::Write;

use heapless::String;

use crate::config::{RECORD_SIZE, TIMESTAMP_LEN};
use crate::types::{CalendarTime, ParseError, TimeField};

/// Formatted timestamp text.
///
/// Sized to a full log record so that years outside `0..=9999` still fit.
pub type TimestampText = String<{ RECORD_SIZE - 1 }>;

/// Separator characters and their positions in the formatted text.
pub const SEPARATORS: [(usize, u8); 5] = [(4, b'/'), (7, b'/'), (10, b' '), (13, b':'), (16, b':')];

/// Position of the last digit of the Second field. Advancing from here commits.
pub const LAST_POSITION: usize = TIMESTAMP_LEN - 1;

/// Days in the given zero-based month.
///
/// February is always 28 days: leap years are not taken into account.
pub const fn max_day(month: u8) -> u8 {
    match month {
        3 | 5 | 8 | 10 => 30,
        1 => 28,
        _ => 31,
    }
}

/// True when `pos` is a digit position of the formatted text.
#[inline]
pub const fn is_editable(pos: usize) -> bool {
    TimeField::from_position(pos).is_some()
}

/// The field under `pos`, if `pos` is editable.
#[inline]
pub const fn field_at(pos: usize) -> Option<TimeField> {
    TimeField::from_position(pos)
}

/// The first editable position of the layout.
pub fn first_editable() -> usize {
    (0..TIMESTAMP_LEN).find(|&pos| is_editable(pos)).unwrap_or(0)
}

/// True exactly at the last digit of the Second field.
#[inline]
pub const fn is_last_field(pos: usize) -> bool {
    pos == LAST_POSITION
}

/// Moves to the next editable position, wrapping from the end to the start.
///
/// Separator positions are skipped. If no other editable position exists the
/// cursor stays where it is.
pub fn advance_cursor(pos: usize) -> usize {
    let mut next = pos;
    loop {
        next = (next + 1) % TIMESTAMP_LEN;
        if next == pos || is_editable(next) {
            return next;
        }
    }
}

/// Formats a calendar time as zero-padded `YYYY/MM/DD HH:MM:SS`.
pub fn format(time: &CalendarTime) -> TimestampText {
    let mut text = TimestampText::new();
    // 31 bytes hold any i32 year plus the 15 fixed characters.
    let _ = write!(
        text,
        "{:04}/{:02}/{:02} {:02}:{:02}:{:02}",
        time.year,
        u16::from(time.month) + 1,
        time.day,
        time.hour,
        time.minute,
        time.second
    );
    text
}

/// Parses exactly `YYYY/MM/DD HH:MM:SS`.
pub fn parse(text: &str) -> Result<CalendarTime, ParseError> {
    parse_bytes(text.as_bytes())
}

/// Parses a timestamp from raw bytes, such as a stored log record.
///
/// Trailing NUL padding is ignored. Every digit position must hold an ASCII
/// digit and every separator must match exactly. Field values are not range
/// checked: a stored `2025/13/40 ...` parses, and it is up to the caller to
/// decide whether that matters (see [`CalendarTime::is_valid`]).
pub fn parse_bytes(bytes: &[u8]) -> Result<CalendarTime, ParseError> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = &bytes[..end];
    if text.len() != TIMESTAMP_LEN {
        return Err(ParseError::Length(text.len()));
    }

    for &(position, expected) in SEPARATORS.iter() {
        if text[position] != expected {
            return Err(ParseError::Separator { position });
        }
    }

    let number = |start: usize, len: usize| -> Result<u32, ParseError> {
        text[start..start + len]
            .iter()
            .enumerate()
            .try_fold(0u32, |acc, (i, &b)| {
                if b.is_ascii_digit() {
                    Ok(acc * 10 + u32::from(b - b'0'))
                } else {
                    Err(ParseError::NotADigit { position: start + i })
                }
            })
    };

    let year = number(0, 4)?;
    let month = number(5, 2)?;
    let day = number(8, 2)?;
    let hour = number(11, 2)?;
    let minute = number(14, 2)?;
    let second = number(17, 2)?;

    if month == 0 {
        return Err(ParseError::OutOfRange(TimeField::Month));
    }

    Ok(CalendarTime::new(
        year as i32,
        (month - 1) as u8,
        day as u8,
        hour as u8,
        minute as u8,
        second as u8,
    ))
}

/// Wraps `value` into `min..=max`.
#[inline]
fn wrap(value: i32, min: i32, max: i32) -> i32 {
    min + (value - min).rem_euclid(max - min + 1)
}

/// Steps `value` by `delta` within `min..=max`.
///
/// A result inside the range is kept as is. From an in-range start, leaving
/// the range wraps around modularly. From an out-of-range start (a clock
/// reporting February 29th, say) the result snaps to the bound on the side
/// it overflowed: past `max` gives `min`, below `min` gives `max`.
fn step(value: i32, delta: i32, min: i32, max: i32) -> i32 {
    let next = value.saturating_add(delta);
    let range = min..=max;
    if range.contains(&next) {
        next
    } else if !range.contains(&value) {
        if next > max { min } else { max }
    } else {
        wrap(next, min, max)
    }
}

/// Adjusts the field under `pos` by `delta`.
///
/// - Year: unbounded.
/// - Month: steps within January..December, then clamps the day down to the
///   new month's length.
/// - Day: steps within `1..=max_day(month)`.
/// - Hour: steps within `0..=23`. Minute and Second: within `0..=59`.
///
/// Stepping adds `delta` first and only corrects a result that left the
/// range, so a field that arrived out of range is brought back
/// into it: month index 12 incremented becomes January, February 29th
/// decremented becomes the 28th and incremented becomes the 1st.
///
/// A separator position leaves the time unchanged.
pub fn adjust(time: CalendarTime, pos: usize, delta: i32) -> CalendarTime {
    let Some(field) = field_at(pos) else {
        return time;
    };

    let mut t = time;
    match field {
        TimeField::Year => {
            t.year = t.year.saturating_add(delta);
        }
        TimeField::Month => {
            t.month = step(i32::from(t.month), delta, 0, 11) as u8;
            let max = max_day(t.month);
            if t.day > max {
                t.day = max;
            }
        }
        TimeField::Day => {
            let max = i32::from(max_day(t.month));
            t.day = step(i32::from(t.day), delta, 1, max) as u8;
        }
        TimeField::Hour => {
            t.hour = step(i32::from(t.hour), delta, 0, 23) as u8;
        }
        TimeField::Minute => {
            t.minute = step(i32::from(t.minute), delta, 0, 59) as u8;
        }
        TimeField::Second => {
            t.second = step(i32::from(t.second), delta, 0, 59) as u8;
        }
    }
    t
}

/// An in-progress time edit: the value being edited plus the cursor.
///
/// The cursor never rests on a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditSession {
    time: CalendarTime,
    cursor: usize,
}

impl EditSession {
    /// Starts editing `time` with the cursor on the first digit of the year.
    pub fn new(time: CalendarTime) -> Self {
        Self {
            time,
            cursor: first_editable(),
        }
    }

    /// The value being edited.
    #[inline]
    pub fn time(&self) -> CalendarTime {
        self.time
    }

    /// Current cursor position in the formatted text.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The field under the cursor.
    pub fn field(&self) -> TimeField {
        // The cursor is only ever set to editable positions.
        field_at(self.cursor).unwrap_or(TimeField::Year)
    }

    /// Adjusts the field under the cursor.
    pub fn adjust(&mut self, delta: i32) {
        self.time = adjust(self.time, self.cursor, delta);
    }

    /// Moves the cursor to the next digit.
    pub fn advance(&mut self) {
        self.cursor = advance_cursor(self.cursor);
    }

    /// True when advancing should commit instead of moving.
    #[inline]
    pub fn is_at_last_field(&self) -> bool {
        is_last_field(self.cursor)
    }

    /// The formatted value.
    pub fn text(&self) -> TimestampText {
        format(&self.time)
    }

    /// The formatted value with the character under the cursor replaced by `_`.
    ///
    /// A year wider than four characters shifts the rest of the layout right;
    /// the marker follows, so year positions cover the last four characters
    /// of the year and every other position stays on its digit.
    pub fn edit_line(&self) -> TimestampText {
        let text = self.text();
        let marker = self.cursor + text.len().saturating_sub(TIMESTAMP_LEN);
        let mut line = TimestampText::new();
        for (i, c) in text.chars().enumerate() {
            let _ = line.push(if i == marker { '_' } else { c });
        }
        line
    }
}
