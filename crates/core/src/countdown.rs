//! Tick-driven quiz countdown.
//!
//! The countdown never looks at wall-clock time: every call to [`Countdown::tick`]
//! stands for one elapsed second. Pausing and resuming are not supported.

/// Time allowed for one quiz session.
pub const QUIZ_DURATION_SECS: u32 = 300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountdownState {
    #[default]
    Stopped,
    Running,
    Expired,
}

/// Result of feeding one tick into a [`Countdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down.
    Running { remaining: u32 },
    /// This tick brought the countdown to zero. Reported exactly once.
    Expired,
    /// The countdown was not running; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    state: CountdownState,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(QUIZ_DURATION_SECS)
    }
}

impl Countdown {
    /// Creates a stopped countdown showing the full `duration_secs`.
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration: duration_secs,
            remaining: duration_secs,
            state: CountdownState::Stopped,
        }
    }

    /// Resets to the full duration and starts counting. Any previous run is discarded.
    pub fn start(&mut self) {
        self.remaining = self.duration;
        self.state = CountdownState::Running;
    }

    /// Stops a running countdown. Expired countdowns stay expired.
    pub fn cancel(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Stopped;
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state != CountdownState::Running {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = CountdownState::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining: self.remaining,
            }
        }
    }

    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Seconds consumed since the last `start`.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.duration - self.remaining
    }

    #[must_use]
    pub fn state(&self) -> CountdownState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    /// Remaining time as `MM:SS`.
    #[must_use]
    pub fn label(&self) -> String {
        format_countdown(self.remaining)
    }
}

/// Formats seconds as zero-padded `MM:SS`.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes:02}:{remainder:02}")
}
