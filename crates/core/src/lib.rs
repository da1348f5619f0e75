#![forbid(unsafe_code)]

pub mod countdown;
pub mod model;
pub mod time;

pub use countdown::{Countdown, CountdownState, QUIZ_DURATION_SECS, TickOutcome, format_countdown};
pub use time::Clock;
