use std::sync::{Arc, Mutex};

use quiz_core::model::Topic;
use services::QuizLoopService;

pub trait UiApp: Send + Sync {
    fn quiz_loop(&self) -> Arc<QuizLoopService>;

    /// Topic to start as soon as the quiz view mounts.
    fn initial_topic(&self) -> Option<Topic> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    quiz_loop: Arc<QuizLoopService>,
    initial_topic_once: Arc<Mutex<Option<Topic>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let initial_topic = app.initial_topic();
        Self {
            quiz_loop: app.quiz_loop(),
            initial_topic_once: Arc::new(Mutex::new(initial_topic)),
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    /// Returns the launch topic once; later calls yield `None`.
    #[must_use]
    pub fn take_initial_topic(&self) -> Option<Topic> {
        self.initial_topic_once
            .lock()
            .ok()
            .and_then(|mut guard| guard.take())
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
