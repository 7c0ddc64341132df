//! Handoff of button presses from interrupt context to the polling loop.
//!
//! Interrupt handlers never touch the application state. They debounce the
//! edge and raise a per-button pending flag; the polling loop takes the flags
//! and applies the presses on its own thread of control.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::debounce::InputDebouncer;
use crate::time::TimeInstant;
use crate::types::{ButtonId, LogicalPress};

/// One pending-trigger flag per button.
///
/// Posting a trigger that is already pending coalesces with it, so the
/// structure is bounded by construction.
pub struct PendingTriggers {
    pending: [AtomicBool; ButtonId::COUNT],
}

impl PendingTriggers {
    /// Creates an empty set of triggers.
    pub const fn new() -> Self {
        Self {
            pending: [const { AtomicBool::new(false) }; ButtonId::COUNT],
        }
    }

    /// Marks a press as pending. Safe from interrupt context.
    #[inline]
    pub fn post(&self, press: LogicalPress) {
        self.pending[press.button.index()].store(true, Ordering::Release);
    }

    /// Clears and returns the pending flag of `button`.
    #[inline]
    pub fn take(&self, button: ButtonId) -> bool {
        self.pending[button.index()].swap(false, Ordering::AcqRel)
    }

    /// Returns the pending flag of `button` without clearing it.
    #[inline]
    pub fn is_pending(&self, button: ButtonId) -> bool {
        self.pending[button.index()].load(Ordering::Acquire)
    }

    /// Takes every pending press, in [`ButtonId`] declaration order.
    pub fn drain(&self) -> impl Iterator<Item = LogicalPress> + '_ {
        ButtonId::ALL
            .into_iter()
            .filter(move |&button| self.take(button))
            .map(|button| LogicalPress { button })
    }
}

impl Default for PendingTriggers {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the button interrupt handlers need, in one `static`-friendly value.
///
/// ```ignore
/// static BUTTONS: ButtonFrontEnd = ButtonFrontEnd::new();
///
/// fn on_log_button_falling_edge() {
///     BUTTONS.on_falling_edge(ButtonId::Log, monotonic_now());
/// }
/// ```
pub struct ButtonFrontEnd {
    debouncer: InputDebouncer,
    triggers: PendingTriggers,
}

impl ButtonFrontEnd {
    /// Creates a front end with the standard cooldown.
    pub const fn new() -> Self {
        Self {
            debouncer: InputDebouncer::new(),
            triggers: PendingTriggers::new(),
        }
    }

    /// Creates a front end with a custom cooldown.
    pub const fn with_cooldown(cooldown_ms: u32) -> Self {
        Self {
            debouncer: InputDebouncer::with_cooldown(cooldown_ms),
            triggers: PendingTriggers::new(),
        }
    }

    /// Interrupt handler body for a falling edge of `button`.
    ///
    /// Returns `true` if the edge became a pending trigger.
    pub fn on_falling_edge<I: TimeInstant>(&self, button: ButtonId, now: I) -> bool {
        match self.debouncer.signal(button, now) {
            Some(press) => {
                self.triggers.post(press);
                true
            }
            None => false,
        }
    }

    /// Cooldown timer callback for `button`.
    #[inline]
    pub fn on_cooldown_elapsed(&self, button: ButtonId) {
        self.debouncer.expire(button);
    }

    /// The debouncer.
    #[inline]
    pub fn debouncer(&self) -> &InputDebouncer {
        &self.debouncer
    }

    /// The pending triggers, for the polling loop.
    #[inline]
    pub fn triggers(&self) -> &PendingTriggers {
        &self.triggers
    }
}

impl Default for ButtonFrontEnd {
    fn default() -> Self {
        Self::new()
    }
}
