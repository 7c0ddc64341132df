//! Application state machine driven by the polling loop.
//!
//! Provides [`AppStateMachine`], which owns the current [`AppMode`] and the
//! in-progress time edit, turns logical button presses into mode transitions,
//! drives the [`LogStore`] and the editor, and asks the display for a screen
//! every poll.
//!
//! All mutation happens here, on the polling loop. Interrupt handlers only
//! post to [`PendingTriggers`].

use embedded_hal::delay::DelayNs;

use crate::config::POLL_PERIOD_MS;
use crate::display::{self, Display, RenderRequest};
use crate::editor::EditSession;
use crate::store::{Eeprom, LogStore, StoreError};
use crate::time::WallClock;
use crate::trigger::PendingTriggers;
use crate::types::{AppMode, ButtonId, LogicalPress};

/// Top-level controller of the clock.
///
/// # Type Parameters
/// * `E` - EEPROM implementation backing the log
/// * `D` - Display implementation
/// * `C` - Wall clock implementation
///
/// Collaborators are taken by value; pass `&mut` references to keep ownership
/// elsewhere, since all three traits are implemented for `&mut T`.
pub struct AppStateMachine<E: Eeprom, D: Display, C: WallClock> {
    mode: AppMode,
    edit: Option<EditSession>,
    store: LogStore<E>,
    display: D,
    clock: C,
}

impl<E: Eeprom, D: Display, C: WallClock> AppStateMachine<E, D, C> {
    /// Creates the controller in `Idle`.
    pub fn new(store: LogStore<E>, display: D, clock: C) -> Self {
        Self {
            mode: AppMode::Idle,
            edit: None,
            store,
            display,
            clock,
        }
    }

    /// Applies one logical press.
    ///
    /// | Button | From | To | Effect |
    /// |---|---|---|---|
    /// | Log | Idle | LoggingTime | write happens on the next [`tick`](Self::tick) |
    /// | ToggleOrDecrement | Idle | DisplayingLog | |
    /// | ToggleOrDecrement | DisplayingLog | Idle | |
    /// | EnterOrAdvance | Idle | SettingTime | snapshot the clock, cursor on the first digit |
    /// | Increment | SettingTime | SettingTime | field +1 |
    /// | ToggleOrDecrement | SettingTime | SettingTime | field -1 |
    /// | EnterOrAdvance | SettingTime | SettingTime | next digit; on the last digit, commit and go Idle |
    ///
    /// Every other combination is ignored.
    pub fn handle(&mut self, press: LogicalPress) {
        let from = self.mode;
        match (from, press.button) {
            (AppMode::Idle, ButtonId::Log) => {
                self.mode = AppMode::LoggingTime;
            }
            (AppMode::Idle, ButtonId::ToggleOrDecrement) => {
                self.mode = AppMode::DisplayingLog;
            }
            (AppMode::DisplayingLog, ButtonId::ToggleOrDecrement) => {
                self.mode = AppMode::Idle;
            }
            (AppMode::Idle, ButtonId::EnterOrAdvance) => {
                self.edit = Some(EditSession::new(self.clock.now()));
                self.mode = AppMode::SettingTime;
            }
            (AppMode::SettingTime, ButtonId::Increment) => {
                if let Some(edit) = self.edit.as_mut() {
                    edit.adjust(1);
                }
            }
            (AppMode::SettingTime, ButtonId::ToggleOrDecrement) => {
                if let Some(edit) = self.edit.as_mut() {
                    edit.adjust(-1);
                }
            }
            (AppMode::SettingTime, ButtonId::EnterOrAdvance) => {
                self.advance_or_commit();
            }
            _ => {
                trace!("ignoring {} in {}", press.button, from);
                return;
            }
        }

        if self.mode != from {
            debug!("mode {} -> {}", from, self.mode);
        }
    }

    fn advance_or_commit(&mut self) {
        if let Some(edit) = self.edit.as_mut() {
            if !edit.is_at_last_field() {
                edit.advance();
                return;
            }
        }

        if let Some(edit) = self.edit.take() {
            let time = edit.time();
            if !time.is_valid() {
                warn!("committing out-of-range time {}", time);
            }
            self.clock.set_system_time(time);
        }
        self.mode = AppMode::Idle;
    }

    /// Runs the scheduled work of one pass.
    ///
    /// In `LoggingTime` this logs the current wall-clock time and returns to
    /// `Idle`. The mode returns to `Idle` even if the write failed; the error
    /// is handed back for the caller to report.
    pub fn tick(&mut self) -> Result<(), StoreError> {
        if self.mode != AppMode::LoggingTime {
            return Ok(());
        }

        let now = self.clock.now();
        let result = self.store.record(&now);
        self.mode = AppMode::Idle;
        debug!("mode {} -> {}", AppMode::LoggingTime, self.mode);
        result
    }

    /// Builds the screen for the current mode.
    ///
    /// In `DisplayingLog` this reads both log slots; a failed read yields
    /// [`RenderRequest::LogUnavailable`].
    pub fn render_request(&mut self) -> RenderRequest {
        match (self.mode, self.edit) {
            (AppMode::DisplayingLog, _) => match self.store.read_both() {
                Ok((latest, previous)) => RenderRequest::Log { latest, previous },
                Err(err) => {
                    warn!("log read failed: {}", err);
                    RenderRequest::LogUnavailable
                }
            },
            (AppMode::SettingTime, Some(edit)) => RenderRequest::Edit(edit),
            _ => RenderRequest::Clock(self.clock.now()),
        }
    }

    /// Draws the screen for the current mode and returns what was drawn.
    pub fn render(&mut self) -> RenderRequest {
        let request = self.render_request();
        display::render(&mut self.display, &request);
        request
    }

    /// One pass of the polling loop.
    ///
    /// Takes every pending trigger in [`ButtonId`] order, applies them, runs
    /// the scheduled tick and renders. Storage errors are logged and dropped
    /// so input handling never stalls on them.
    pub fn poll(&mut self, triggers: &PendingTriggers) -> RenderRequest {
        for press in triggers.drain() {
            self.handle(press);
        }

        if let Err(err) = self.tick() {
            warn!("log write failed: {}", err);
        }

        self.render()
    }

    /// Runs the polling loop forever, sleeping `POLL_PERIOD_MS` between passes.
    pub fn run<DL: DelayNs>(&mut self, triggers: &PendingTriggers, delay: &mut DL) -> ! {
        loop {
            self.poll(triggers);
            delay.delay_ms(POLL_PERIOD_MS);
        }
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// The in-progress edit, present only in `SettingTime`.
    #[inline]
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// The log store.
    #[inline]
    pub fn store(&self) -> &LogStore<E> {
        &self.store
    }

    /// Mutable access to the log store.
    #[inline]
    pub fn store_mut(&mut self) -> &mut LogStore<E> {
        &mut self.store
    }

    /// The display.
    #[inline]
    pub fn display(&self) -> &D {
        &self.display
    }

    /// The wall clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Releases the collaborators.
    pub fn into_parts(self) -> (LogStore<E>, D, C) {
        (self.store, self.display, self.clock)
    }
}
