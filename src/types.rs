//! Core value types shared by the editor, the log store and the state machine.

/// Logical input sources.
///
/// Declaration order is the order in which pending triggers are drained
/// during one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    /// Logs the current time.
    Log,
    /// Toggles the log view; decrements the selected field while setting time.
    ToggleOrDecrement,
    /// Enters time setting; advances the cursor (or commits) while setting time.
    EnterOrAdvance,
    /// Increments the selected field while setting time.
    Increment,
}

impl ButtonId {
    /// Number of logical buttons.
    pub const COUNT: usize = 4;

    /// All buttons, in drain order.
    pub const ALL: [ButtonId; Self::COUNT] = [
        ButtonId::Log,
        ButtonId::ToggleOrDecrement,
        ButtonId::EnterOrAdvance,
        ButtonId::Increment,
    ];

    /// Dense index in `0..COUNT`, for per-button tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ButtonId::Log => 0,
            ButtonId::ToggleOrDecrement => 1,
            ButtonId::EnterOrAdvance => 2,
            ButtonId::Increment => 3,
        }
    }
}

/// A debounced press, produced at most once per physical press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogicalPress {
    pub button: ButtonId,
}

/// Application mode. Exactly one holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppMode {
    /// Showing the current time.
    #[default]
    Idle,
    /// A log write is pending for the next scheduler tick.
    LoggingTime,
    /// Showing the two stored log records.
    DisplayingLog,
    /// Editing the system time field by field.
    SettingTime,
}

/// Broken-down calendar time.
///
/// `month` is zero-based (0 = January) and `day` one-based, the same
/// convention the wraparound rules are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CalendarTime {
    /// Creates a calendar time from already-validated parts.
    ///
    /// `month` is zero-based.
    #[inline]
    pub const fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Returns the first field that is out of range, if any.
    ///
    /// February is always 28 days long here; see [`crate::editor::max_day`].
    pub fn invalid_field(&self) -> Option<TimeField> {
        if self.month > 11 {
            Some(TimeField::Month)
        } else if self.day == 0 || self.day > crate::editor::max_day(self.month) {
            Some(TimeField::Day)
        } else if self.hour > 23 {
            Some(TimeField::Hour)
        } else if self.minute > 59 {
            Some(TimeField::Minute)
        } else if self.second > 59 {
            Some(TimeField::Second)
        } else {
            None
        }
    }

    /// True when every field is inside its calendar range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.invalid_field().is_none()
    }
}

/// The six editable groups of `YYYY/MM/DD HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeField {
    /// Maps a character position of the formatted timestamp to its field.
    ///
    /// Returns `None` for separator positions and anything past the end.
    pub const fn from_position(pos: usize) -> Option<Self> {
        match pos {
            0..=3 => Some(TimeField::Year),
            5..=6 => Some(TimeField::Month),
            8..=9 => Some(TimeField::Day),
            11..=12 => Some(TimeField::Hour),
            14..=15 => Some(TimeField::Minute),
            17..=18 => Some(TimeField::Second),
            _ => None,
        }
    }

    /// Label shown in the edit view hint.
    pub const fn name(self) -> &'static str {
        match self {
            TimeField::Year => "Year",
            TimeField::Month => "Month",
            TimeField::Day => "Day",
            TimeField::Hour => "Hour",
            TimeField::Minute => "Minute",
            TimeField::Second => "Second",
        }
    }
}

/// Why a timestamp string could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Text is not exactly 19 characters (ignoring trailing NUL padding).
    Length(usize),

    /// A separator position holds the wrong character.
    Separator { position: usize },

    /// An editable position holds something other than an ASCII digit.
    NotADigit { position: usize },

    /// The named field is outside its calendar range.
    ///
    /// Parsing only reports this for month `00`, which has no zero-based
    /// index; other field values are taken as stored. Conversions to stricter
    /// calendar types report it for any field they reject.
    OutOfRange(TimeField),
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Length(len) => {
                write!(f, "timestamp must be 19 characters, got {}", len)
            }
            ParseError::Separator { position } => {
                write!(f, "unexpected separator at position {}", position)
            }
            ParseError::NotADigit { position } => {
                write!(f, "expected a digit at position {}", position)
            }
            ParseError::OutOfRange(field) => {
                write!(f, "{} is out of range", field.name())
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDateTime> for CalendarTime {
    fn from(dt: chrono::NaiveDateTime) -> Self {
        use chrono::{Datelike, Timelike};

        CalendarTime::new(
            dt.year(),
            dt.month0() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
        )
    }
}

#[cfg(feature = "chrono")]
impl TryFrom<CalendarTime> for chrono::NaiveDateTime {
    type Error = ParseError;

    fn try_from(time: CalendarTime) -> Result<Self, Self::Error> {
        if time.month > 11 {
            return Err(ParseError::OutOfRange(TimeField::Month));
        }
        let date = chrono::NaiveDate::from_ymd_opt(time.year, u32::from(time.month) + 1, u32::from(time.day))
            .ok_or(ParseError::OutOfRange(TimeField::Day))?;
        date.and_hms_opt(
            u32::from(time.hour),
            u32::from(time.minute),
            u32::from(time.second),
        )
        .ok_or(ParseError::OutOfRange(if time.hour > 23 {
            TimeField::Hour
        } else if time.minute > 59 {
            TimeField::Minute
        } else {
            TimeField::Second
        }))
    }
}
