use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dioxus::prelude::ReadableExt;
use quiz_core::model::Topic;
use services::Phase;
use storage::repository::{InMemoryQuestionSource, QuestionRecord, QuestionSource, StorageError};

use super::test_harness::{ViewHarness, setup_view_harness, source_with};
use crate::vm::QuizIntent;

fn dispatch(harness: &ViewHarness, intent: QuizIntent) {
    let callback = harness.handles.dispatch();
    harness.dom.in_runtime(|| callback.call(intent));
}

fn current_question(harness: &ViewHarness) -> (usize, String, String) {
    let vm = harness.handles.vm();
    harness.dom.in_runtime(|| {
        let vm = vm.peek();
        let session = vm.controller().session().expect("session running");
        let question = session.current_question();
        (
            session.current_index(),
            question.title().to_string(),
            question.correct_answer().to_string(),
        )
    })
}

fn phase(harness: &ViewHarness) -> Phase {
    let vm = harness.handles.vm();
    harness.dom.in_runtime(|| vm.peek().phase())
}

#[tokio::test(flavor = "current_thread")]
async fn idle_view_lists_topics() {
    let source = Arc::new(source_with(Topic::Html, &["Q1"]));
    let mut harness = setup_view_harness(source, None);
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Pick a topic to start the quiz."), "missing prompt in {html}");
    for label in ["HTML", "CSS", "JavaScript"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
    assert!(!html.contains("quiz-timer"), "timer rendered while idle: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn selecting_topic_shows_first_question_and_full_timer() {
    let source = Arc::new(source_with(Topic::Html, &["Q1", "Q2", "Q3"]));
    let mut harness = setup_view_harness(source, None);
    harness.rebuild();

    dispatch(&harness, QuizIntent::SelectTopic(Topic::Html));
    let html = harness.drive_until("1 / 3").await;

    assert!(html.contains("1 / 3"), "missing position in {html}");
    assert!(html.contains("05:00"), "missing timer in {html}");
    assert!(html.contains("Questions: 3"), "missing count in {html}");
    assert!(html.contains("topic-btn--active"), "missing active topic in {html}");
    assert_eq!(phase(&harness), Phase::InProgress);
}

#[tokio::test(flavor = "current_thread")]
async fn next_and_previous_move_between_questions() {
    let source = Arc::new(source_with(Topic::Css, &["Q1", "Q2"]));
    let mut harness = setup_view_harness(source, None);
    harness.rebuild();

    dispatch(&harness, QuizIntent::SelectTopic(Topic::Css));
    harness.drive_until("1 / 2").await;

    dispatch(&harness, QuizIntent::Next);
    let html = harness.drive_until("2 / 2").await;
    assert!(html.contains("2 / 2"), "missing second position in {html}");

    // Clamped at the last question.
    dispatch(&harness, QuizIntent::Next);
    harness.drive_async().await;
    assert_eq!(current_question(&harness).0, 1);

    dispatch(&harness, QuizIntent::Previous);
    let html = harness.drive_until("1 / 2").await;
    assert!(html.contains("1 / 2"), "missing first position in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn submitting_shows_results_with_review() {
    let source = Arc::new(source_with(Topic::JavaScript, &["Q1", "Q2"]));
    let mut harness = setup_view_harness(source, None);
    harness.rebuild();

    dispatch(&harness, QuizIntent::SelectTopic(Topic::JavaScript));
    harness.drive_until("1 / 2").await;

    let (index, _, correct) = current_question(&harness);
    dispatch(&harness, QuizIntent::Choose { index, option: correct });
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("answer-option--selected"), "missing selection in {html}");

    dispatch(&harness, QuizIntent::Submit);
    let html = harness.drive_until("Your Results").await;

    assert!(html.contains("1 / 2"), "missing score in {html}");
    assert!(html.contains("50%"), "missing percent in {html}");
    assert!(html.contains("Not answered"), "missing skipped marker in {html}");
    assert!(html.contains("review-option--correct"), "missing correct mark in {html}");
    assert!(!html.contains("quiz-submit"), "submit still offered in {html}");
    assert_eq!(phase(&harness), Phase::Submitted);
}

#[tokio::test(flavor = "current_thread")]
async fn wrong_pick_is_marked_in_review() {
    let source = Arc::new(source_with(Topic::Html, &["Only"]));
    let mut harness = setup_view_harness(source, None);
    harness.rebuild();

    dispatch(&harness, QuizIntent::SelectTopic(Topic::Html));
    harness.drive_until("1 / 1").await;

    dispatch(
        &harness,
        QuizIntent::Choose {
            index: 0,
            option: "Only c".to_string(),
        },
    );
    dispatch(&harness, QuizIntent::Submit);
    let html = harness.drive_until("Your Results").await;

    assert!(html.contains("0 / 1"), "missing score in {html}");
    assert!(html.contains("review-option--wrong"), "missing wrong mark in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_option_surfaces_error_banner() {
    let source = Arc::new(source_with(Topic::Html, &["Q1"]));
    let mut harness = setup_view_harness(source, None);
    harness.rebuild();

    dispatch(&harness, QuizIntent::SelectTopic(Topic::Html));
    harness.drive_until("1 / 1").await;

    dispatch(
        &harness,
        QuizIntent::Choose {
            index: 0,
            option: "not listed".to_string(),
        },
    );
    let html = harness.drive_until("does not belong").await;
    assert!(html.contains("That answer does not belong to this question."), "missing error in {html}");
    assert_eq!(phase(&harness), Phase::InProgress);
}

#[tokio::test(flavor = "current_thread")]
async fn switching_topic_replaces_running_quiz() {
    let source = InMemoryQuestionSource::new();
    source
        .set_pool(
            Topic::Html,
            vec![super::test_harness::question("Html one", 0)],
        )
        .expect("seed html");
    source
        .set_pool(
            Topic::Css,
            vec![
                super::test_harness::question("Css one", 1),
                super::test_harness::question("Css two", 2),
            ],
        )
        .expect("seed css");
    let mut harness = setup_view_harness(Arc::new(source), None);
    harness.rebuild();

    dispatch(&harness, QuizIntent::SelectTopic(Topic::Html));
    harness.drive_until("1 / 1").await;
    dispatch(
        &harness,
        QuizIntent::Choose {
            index: 0,
            option: "Html one a".to_string(),
        },
    );

    dispatch(&harness, QuizIntent::SelectTopic(Topic::Css));
    let html = harness.drive_until("1 / 2").await;

    assert!(html.contains("Css"), "missing css question in {html}");
    assert!(!html.contains("Html one"), "stale question in {html}");
    assert!(html.contains("Submit (0/2 answered)"), "answers carried over in {html}");
    assert!(html.contains("05:00"), "timer not reset in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn initial_topic_starts_on_mount() {
    let source = Arc::new(source_with(Topic::Css, &["Q1", "Q2", "Q3"]));
    let mut harness = setup_view_harness(source, Some(Topic::Css));
    harness.rebuild();

    let html = harness.drive_until("1 / 3").await;
    assert!(html.contains("1 / 3"), "quiz did not start in {html}");
    assert_eq!(phase(&harness), Phase::InProgress);
}

#[tokio::test(flavor = "current_thread")]
async fn failed_load_renders_error_and_stays_idle() {
    let source = Arc::new(source_with(Topic::Html, &["Q1"]));
    let mut harness = setup_view_harness(source, None);
    harness.rebuild();

    dispatch(&harness, QuizIntent::SelectTopic(Topic::Css));
    let html = harness.drive_until("Could not load questions").await;

    assert!(html.contains("Could not load questions"), "missing error in {html}");
    assert!(html.contains("no question pool"), "missing detail in {html}");
    assert_eq!(phase(&harness), Phase::Idle);
}

/// Holds loads of `slow` until the clock moves past `delay`.
struct SlowSource {
    inner: InMemoryQuestionSource,
    slow: Topic,
    delay: Duration,
    completed: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl QuestionSource for SlowSource {
    async fn load_pool(&self, topic: Topic) -> Result<Vec<QuestionRecord>, StorageError> {
        if topic == self.slow {
            tokio::time::sleep(self.delay).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.load_pool(topic).await
    }

    fn describe(&self) -> String {
        "slow".to_string()
    }
}

async fn start_and_settle(harness: &mut ViewHarness, topic: Topic, position: &str) -> String {
    dispatch(harness, QuizIntent::SelectTopic(topic));
    let html = harness.drive_until(position).await;
    // Let the countdown task arm its interval.
    harness.drive_async().await;
    html
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn countdown_ticks_once_per_second() {
    let source = Arc::new(source_with(Topic::Html, &["Q1", "Q2", "Q3"]));
    let mut harness = setup_view_harness(source, None);
    harness.rebuild();

    let html = start_and_settle(&mut harness, Topic::Html, "1 / 3").await;
    assert!(html.contains("05:00"), "missing full timer in {html}");

    harness.advance_secs(1).await;
    let html = harness.render();
    assert!(html.contains("04:59"), "missing first tick in {html}");

    harness.advance_secs(2).await;
    let html = harness.render();
    assert!(html.contains("04:57"), "missing third tick in {html}");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn countdown_expiry_submits_quiz() {
    let source = Arc::new(source_with(Topic::Css, &["Q1", "Q2"]));
    let mut harness = setup_view_harness(source, None);
    harness.rebuild();

    start_and_settle(&mut harness, Topic::Css, "1 / 2").await;

    harness.advance_secs(299).await;
    let html = harness.render();
    assert!(html.contains("00:01"), "missing last second in {html}");
    assert_eq!(phase(&harness), Phase::InProgress);

    harness.advance_secs(1).await;
    let html = harness.drive_until("Your Results").await;
    assert!(html.contains("Your Results"), "missing results in {html}");
    assert!(html.contains("Time is up!"), "missing timeout note in {html}");
    assert!(html.contains("0 / 2"), "missing score in {html}");
    assert_eq!(phase(&harness), Phase::Submitted);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn switching_topic_restarts_countdown() {
    let source = InMemoryQuestionSource::new();
    source
        .set_pool(
            Topic::Html,
            vec![
                super::test_harness::question("Html one", 0),
                super::test_harness::question("Html two", 0),
                super::test_harness::question("Html three", 0),
            ],
        )
        .expect("seed html");
    source
        .set_pool(
            Topic::Css,
            vec![
                super::test_harness::question("Css one", 0),
                super::test_harness::question("Css two", 0),
            ],
        )
        .expect("seed css");
    let mut harness = setup_view_harness(Arc::new(source), None);
    harness.rebuild();

    start_and_settle(&mut harness, Topic::Html, "1 / 3").await;
    harness.advance_secs(3).await;
    let html = harness.render();
    assert!(html.contains("04:57"), "html countdown not running in {html}");

    let html = start_and_settle(&mut harness, Topic::Css, "1 / 2").await;
    assert!(html.contains("05:00"), "css countdown not reset in {html}");

    harness.advance_secs(1).await;
    let html = harness.render();
    assert!(html.contains("04:59"), "expected a single tick in {html}");

    harness.advance_secs(1).await;
    let html = harness.render();
    assert!(html.contains("04:58"), "expected a single tick in {html}");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn switching_topic_cancels_pending_load() {
    let completed = Arc::new(AtomicUsize::new(0));
    let source = SlowSource {
        inner: InMemoryQuestionSource::new(),
        slow: Topic::Html,
        delay: Duration::from_secs(30),
        completed: Arc::clone(&completed),
    };
    source
        .inner
        .set_pool(Topic::Html, vec![super::test_harness::question("Html one", 0)])
        .expect("seed html");
    source
        .inner
        .set_pool(
            Topic::Css,
            vec![
                super::test_harness::question("Css one", 0),
                super::test_harness::question("Css two", 0),
            ],
        )
        .expect("seed css");
    let mut harness = setup_view_harness(Arc::new(source), None);
    harness.rebuild();

    dispatch(&harness, QuizIntent::SelectTopic(Topic::Html));
    let html = harness.drive_until("Loading HTML questions").await;
    assert!(html.contains("Loading HTML questions"), "missing loading state in {html}");

    start_and_settle(&mut harness, Topic::Css, "1 / 2").await;

    tokio::time::advance(Duration::from_secs(60)).await;
    harness.drive_async().await;

    assert_eq!(completed.load(Ordering::SeqCst), 0, "html load kept running");
    let html = harness.render();
    assert!(html.contains("Css"), "css quiz replaced in {html}");
    assert!(!html.contains("Html one"), "stale load installed in {html}");
}
