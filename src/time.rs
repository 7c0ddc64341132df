//! Time abstraction traits for platform-agnostic timing.
//!
//! Two kinds of time are involved: a monotonic millisecond counter used for
//! debouncing, and the settable wall clock the device displays and logs.

use crate::types::CalendarTime;

/// Trait abstraction for monotonic instant types.
pub trait TimeInstant: Copy {
    /// Milliseconds since an arbitrary fixed origin (usually boot).
    ///
    /// Only differences between instants are meaningful. Callers truncate to
    /// 32 bits and use wrapping arithmetic.
    fn as_millis(&self) -> u64;
}

/// Trait for the settable wall clock (RTC or system time).
pub trait WallClock {
    /// Returns the current calendar time.
    fn now(&self) -> CalendarTime;

    /// Replaces the current calendar time.
    fn set_system_time(&mut self, time: CalendarTime);
}

impl<T: WallClock + ?Sized> WallClock for &mut T {
    fn now(&self) -> CalendarTime {
        (**self).now()
    }

    fn set_system_time(&mut self, time: CalendarTime) {
        (**self).set_system_time(time)
    }
}
