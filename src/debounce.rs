//! Per-button debouncing safe to call from interrupt context.
//!
//! Each button has an armed flag and the millisecond timestamp at which it
//! was armed. Both live in atomics so a single [`InputDebouncer`] can sit in a
//! `static` and be shared by every button's interrupt handler.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::DEBOUNCE_MS;
use crate::time::TimeInstant;
use crate::types::{ButtonId, LogicalPress};

/// Debounce state of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// The next edge is accepted.
    Idle,
    /// Edges are ignored until the monotonic clock reaches `until_ms`.
    CoolingDown { until_ms: u32 },
}

/// Suppresses repeated edges of the same button within a cooldown window.
///
/// The window is inclusive of its start and exclusive of its end: an edge
/// exactly `cooldown` milliseconds after the accepted one is accepted again.
/// Millisecond arithmetic wraps, so the 32-bit counter rolling over does not
/// lock a button out.
pub struct InputDebouncer {
    armed: [AtomicBool; ButtonId::COUNT],
    armed_at: [AtomicU32; ButtonId::COUNT],
    cooldown_ms: u32,
}

impl InputDebouncer {
    /// Creates a debouncer with the standard 200 ms cooldown.
    pub const fn new() -> Self {
        Self::with_cooldown(DEBOUNCE_MS)
    }

    /// Creates a debouncer with a custom cooldown.
    pub const fn with_cooldown(cooldown_ms: u32) -> Self {
        Self {
            armed: [const { AtomicBool::new(false) }; ButtonId::COUNT],
            armed_at: [const { AtomicU32::new(0) }; ButtonId::COUNT],
            cooldown_ms,
        }
    }

    /// Cooldown window length in milliseconds.
    #[inline]
    pub fn cooldown_ms(&self) -> u32 {
        self.cooldown_ms
    }

    /// Reports a physical falling edge of `button` at `now`.
    ///
    /// Returns the logical press if the button was outside its cooldown and
    /// arms a new cooldown starting at `now`. Returns `None` otherwise, without
    /// extending the running cooldown.
    ///
    /// Each button's slot must only be signalled from one context at a time,
    /// which holds when it is called from that button's own interrupt handler.
    pub fn signal<I: TimeInstant>(&self, button: ButtonId, now: I) -> Option<LogicalPress> {
        let i = button.index();
        let now_ms = now.as_millis() as u32;

        if self.armed[i].load(Ordering::Acquire) {
            let since = now_ms.wrapping_sub(self.armed_at[i].load(Ordering::Relaxed));
            if since < self.cooldown_ms {
                return None;
            }
        }

        self.armed_at[i].store(now_ms, Ordering::Relaxed);
        self.armed[i].store(true, Ordering::Release);
        Some(LogicalPress { button })
    }

    /// Ends the cooldown of `button` early.
    ///
    /// This is all a one-shot cooldown timer callback may do.
    #[inline]
    pub fn expire(&self, button: ButtonId) {
        self.armed[button.index()].store(false, Ordering::Release);
    }

    /// Debounce state of `button` as seen at `now`.
    pub fn state<I: TimeInstant>(&self, button: ButtonId, now: I) -> DebounceState {
        let i = button.index();
        if !self.armed[i].load(Ordering::Acquire) {
            return DebounceState::Idle;
        }

        let armed_at = self.armed_at[i].load(Ordering::Relaxed);
        if (now.as_millis() as u32).wrapping_sub(armed_at) >= self.cooldown_ms {
            DebounceState::Idle
        } else {
            DebounceState::CoolingDown {
                until_ms: armed_at.wrapping_add(self.cooldown_ms),
            }
        }
    }
}

impl Default for InputDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct Ms(u64);

    impl TimeInstant for Ms {
        fn as_millis(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn first_edge_is_accepted() {
        let debouncer = InputDebouncer::new();
        assert_eq!(
            debouncer.signal(ButtonId::Log, Ms(1000)),
            Some(LogicalPress {
                button: ButtonId::Log
            })
        );
    }

    #[test]
    fn bounce_inside_window_is_dropped() {
        let debouncer = InputDebouncer::new();
        assert!(debouncer.signal(ButtonId::Log, Ms(1000)).is_some());
        assert!(debouncer.signal(ButtonId::Log, Ms(1001)).is_none());
        assert!(debouncer.signal(ButtonId::Log, Ms(1199)).is_none());
    }

    #[test]
    fn edge_exactly_at_expiry_is_accepted() {
        let debouncer = InputDebouncer::new();
        assert!(debouncer.signal(ButtonId::Increment, Ms(500)).is_some());
        assert!(debouncer.signal(ButtonId::Increment, Ms(699)).is_none());
        assert!(debouncer.signal(ButtonId::Increment, Ms(700)).is_some());
    }

    #[test]
    fn dropped_edges_do_not_extend_cooldown() {
        let debouncer = InputDebouncer::new();
        assert!(debouncer.signal(ButtonId::Log, Ms(0)).is_some());
        assert!(debouncer.signal(ButtonId::Log, Ms(150)).is_none());
        assert!(debouncer.signal(ButtonId::Log, Ms(200)).is_some());
    }

    #[test]
    fn buttons_cool_down_independently() {
        let debouncer = InputDebouncer::new();
        assert!(debouncer.signal(ButtonId::Log, Ms(0)).is_some());
        assert!(debouncer.signal(ButtonId::EnterOrAdvance, Ms(10)).is_some());
        assert!(debouncer.signal(ButtonId::Log, Ms(20)).is_none());
    }

    #[test]
    fn expire_clears_cooldown() {
        let debouncer = InputDebouncer::new();
        assert!(debouncer.signal(ButtonId::Log, Ms(0)).is_some());
        debouncer.expire(ButtonId::Log);
        assert_eq!(debouncer.state(ButtonId::Log, Ms(10)), DebounceState::Idle);
        assert!(debouncer.signal(ButtonId::Log, Ms(10)).is_some());
    }

    #[test]
    fn state_reports_cooldown_end() {
        let debouncer = InputDebouncer::new();
        assert_eq!(debouncer.state(ButtonId::Log, Ms(0)), DebounceState::Idle);
        debouncer.signal(ButtonId::Log, Ms(40));
        assert_eq!(
            debouncer.state(ButtonId::Log, Ms(100)),
            DebounceState::CoolingDown { until_ms: 240 }
        );
        assert_eq!(debouncer.state(ButtonId::Log, Ms(240)), DebounceState::Idle);
    }

    #[test]
    fn millisecond_counter_wraparound() {
        let debouncer = InputDebouncer::new();
        let near_wrap = u64::from(u32::MAX) - 50;
        assert!(debouncer.signal(ButtonId::Log, Ms(near_wrap)).is_some());
        // 100 ms later, counter has wrapped past zero
        assert!(debouncer.signal(ButtonId::Log, Ms(near_wrap + 100)).is_none());
        assert!(debouncer.signal(ButtonId::Log, Ms(near_wrap + 200)).is_some());
    }
}
