//! Display abstraction and the three screens of the device.
//!
//! The state machine decides *what* to show as a [`RenderRequest`];
//! [`render`] lays it out as text on a [`Display`].

use core::fmt::Write;

use heapless::String;
use palette::Srgb;

use crate::editor::{self, EditSession};
use crate::store::LogRecord;
use crate::types::CalendarTime;

/// Screen background.
pub const BACKGROUND: Srgb = Srgb::new(1.0, 1.0, 1.0);

/// Text color.
pub const FOREGROUND: Srgb = Srgb::new(0.0, 0.0, 0.0);

/// Horizontal text alignment relative to the `x` coordinate and screen width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Fonts used by the screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontSize {
    /// 16 px tall; log and edit screens.
    Font16,
    /// 20 px tall; clock screen.
    Font20,
}

impl FontSize {
    /// Line height in pixels.
    pub const fn height(self) -> u16 {
        match self {
            FontSize::Font16 => 16,
            FontSize::Font20 => 20,
        }
    }
}

/// Trait for abstracting a text display.
///
/// Implementations should handle hardware errors internally; drawing
/// cannot fail.
pub trait Display {
    /// Fills the screen with `background`.
    fn clear(&mut self, background: Srgb);

    /// Selects the font for subsequent text.
    fn set_font(&mut self, font: FontSize);

    /// Selects the color for subsequent text.
    fn set_text_color(&mut self, color: Srgb);

    /// Draws `text` with its anchor at (`x`, `y`).
    fn draw_text(&mut self, x: u16, y: u16, text: &str, alignment: Alignment);
}

impl<T: Display + ?Sized> Display for &mut T {
    fn clear(&mut self, background: Srgb) {
        (**self).clear(background)
    }

    fn set_font(&mut self, font: FontSize) {
        (**self).set_font(font)
    }

    fn set_text_color(&mut self, color: Srgb) {
        (**self).set_text_color(color)
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, alignment: Alignment) {
        (**self).draw_text(x, y, text, alignment)
    }
}

/// What the polling loop asks the display to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRequest {
    /// Current time and date.
    Clock(CalendarTime),
    /// The two stored log records, as read.
    Log {
        latest: LogRecord,
        previous: LogRecord,
    },
    /// The log could not be read.
    LogUnavailable,
    /// The time being edited, with its cursor.
    Edit(EditSession),
}

type Line = String<32>;

/// Y coordinate of 16 px text line `n`.
const fn line(n: u16) -> u16 {
    n * FontSize::Font16.height()
}

/// Draws the screen for `request`.
pub fn render<D: Display + ?Sized>(display: &mut D, request: &RenderRequest) {
    match request {
        RenderRequest::Clock(now) => render_clock(display, now),
        RenderRequest::Log { latest, previous } => {
            render_log_header(display);
            display.draw_text(0, line(7), &record_line(latest), Alignment::Center);
            display.draw_text(0, line(9), "Previous:", Alignment::Center);
            display.draw_text(0, line(11), &record_line(previous), Alignment::Center);
        }
        RenderRequest::LogUnavailable => {
            render_log_header(display);
            display.draw_text(0, line(7), "Log read failed", Alignment::Center);
        }
        RenderRequest::Edit(session) => render_edit(display, session),
    }
}

fn begin<D: Display + ?Sized>(display: &mut D, font: FontSize) {
    display.clear(BACKGROUND);
    display.set_font(font);
    display.set_text_color(FOREGROUND);
}

fn render_clock<D: Display + ?Sized>(display: &mut D, now: &CalendarTime) {
    let mut time = Line::new();
    let _ = write!(
        time,
        "{:02}:{:02}:{:02}(H,M,S)",
        now.hour, now.minute, now.second
    );

    let mut date = Line::new();
    let _ = write!(
        date,
        "{:04}/{:02}/{:02}(Y,M,D)",
        now.year,
        u16::from(now.month) + 1,
        now.day
    );

    begin(display, FontSize::Font20);
    display.draw_text(0, 80, &time, Alignment::Center);
    display.draw_text(0, 110, &date, Alignment::Center);
}

fn render_log_header<D: Display + ?Sized>(display: &mut D) {
    begin(display, FontSize::Font16);
    display.draw_text(0, line(2), "Time in:H,M,S", Alignment::Center);
    display.draw_text(0, line(3), "Date in Y,M,D", Alignment::Center);
    display.draw_text(0, line(5), "Latest:", Alignment::Center);
}

fn render_edit<D: Display + ?Sized>(display: &mut D, session: &EditSession) {
    let mut hint = Line::new();
    let _ = write!(hint, "Edit: {}", session.field().name());

    begin(display, FontSize::Font16);
    display.draw_text(0, line(1), "Set Time:", Alignment::Center);
    display.draw_text(0, line(3), &session.edit_line(), Alignment::Center);
    display.draw_text(0, line(5), &hint, Alignment::Center);
}

/// Text shown for one log slot.
///
/// A slot that parses as a timestamp is reformatted; anything else is shown
/// as stored, with non-printable bytes replaced by `?`.
pub fn record_line(record: &LogRecord) -> Line {
    let mut out = Line::new();
    match record.parse() {
        Ok(time) => {
            let _ = out.push_str(&editor::format(&time));
        }
        Err(_) => {
            for &b in record.as_bytes() {
                let c = if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '?'
                };
                if out.push(c).is_err() {
                    break;
                }
            }
        }
    }
    out
}
