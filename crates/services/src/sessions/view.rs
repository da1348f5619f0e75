//! Pure projection of quiz state into display-ready data.
//!
//! Nothing here mutates state or touches a display surface; any view layer
//! can render a [`QuizViewModel`] directly.

use chrono::{DateTime, Utc};

use quiz_core::format_countdown;
use quiz_core::model::{ReviewItem, Topic};

use super::controller::QuizController;
use super::service::{QuizSession, SubmitReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizViewModel {
    Idle { error: Option<String> },
    Loading { topic: Topic },
    InProgress(QuestionVm),
    Submitted(ResultsVm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionVm {
    pub text: String,
    pub selected: bool,
}

/// One marker of the position indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletVm {
    pub current: bool,
    pub answered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionVm {
    pub topic: Topic,
    /// 0-based index of the displayed question.
    pub index: usize,
    pub total: usize,
    pub position_label: String,
    pub title: String,
    pub options: Vec<OptionVm>,
    pub bullets: Vec<BulletVm>,
    pub can_previous: bool,
    pub can_next: bool,
    pub timer_label: String,
    pub answered: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsVm {
    pub topic: Topic,
    pub correct: usize,
    pub total: usize,
    pub score_label: String,
    pub percent: u32,
    pub time_used_label: String,
    pub timed_out: bool,
    pub submitted_at: DateTime<Utc>,
    pub items: Vec<ReviewItem>,
}

/// Project the controller's current state.
#[must_use]
pub fn render(controller: &QuizController) -> QuizViewModel {
    if let Some(topic) = controller.pending_topic() {
        return QuizViewModel::Loading { topic };
    }
    match controller.session() {
        Some(session) => render_session(session),
        None => QuizViewModel::Idle {
            error: controller.last_failure().map(|f| f.message.clone()),
        },
    }
}

#[must_use]
pub fn render_session(session: &QuizSession) -> QuizViewModel {
    match session.submission() {
        Some(submission) => {
            let score = submission.review.score();
            QuizViewModel::Submitted(ResultsVm {
                topic: session.topic(),
                correct: score.correct(),
                total: score.total(),
                score_label: score.to_string(),
                percent: score.percent(),
                time_used_label: format_countdown(submission.time_used_secs),
                timed_out: submission.reason == SubmitReason::TimeUp,
                submitted_at: submission.submitted_at,
                items: submission.review.items().to_vec(),
            })
        }
        None => QuizViewModel::InProgress(question_vm(session)),
    }
}

fn question_vm(session: &QuizSession) -> QuestionVm {
    let index = session.current_index();
    let question = session.current_question();
    let chosen = session.answer_for(index);
    let progress = session.progress();

    let options = question
        .options()
        .iter()
        .map(|text| OptionVm {
            text: text.clone(),
            selected: chosen == Some(text.as_str()),
        })
        .collect();

    let bullets = (0..session.total_questions())
        .map(|i| BulletVm {
            current: i == index,
            answered: session.answer_for(i).is_some(),
        })
        .collect();

    QuestionVm {
        topic: session.topic(),
        index,
        total: progress.total,
        position_label: progress.position_label(),
        title: question.title().to_owned(),
        options,
        bullets,
        can_previous: session.can_go_previous(),
        can_next: session.can_go_next(),
        timer_label: session.countdown().label(),
        answered: progress.answered,
    }
}
