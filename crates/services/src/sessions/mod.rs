mod controller;
mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{LoadError, SessionError};
pub use controller::{LoadFailure, QuizController, SessionTicket};
pub use plan::{QUESTION_SET_SIZE, QuestionSet, prepare_set, shuffle};
pub use progress::SessionProgress;
pub use service::{Phase, QuizSession, SessionTick, Submission, SubmitReason};
pub use view::{
    BulletVm, OptionVm, QuestionVm, QuizViewModel, ResultsVm, render, render_session,
};
pub use workflow::QuizLoopService;
