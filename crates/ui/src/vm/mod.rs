mod quiz_vm;
pub(crate) mod time_fmt;

pub use quiz_vm::{QuizIntent, QuizVm};
pub use time_fmt::format_datetime;
