use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{Question, Topic};
use quiz_core::time::fixed_now;
use services::{Clock, QuizLoopService};
use storage::repository::{InMemoryQuestionSource, QuestionRecord, QuestionSource};

use crate::context::{UiApp, build_app_context};
use crate::views::QuizView;
use crate::views::quiz::QuizTestHandles;

#[derive(Clone)]
struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
    initial_topic: Option<Topic>,
}

impl UiApp for TestApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn initial_topic(&self) -> Option<Topic> {
        self.initial_topic
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    rsx! { QuizView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive the dom until `needle` shows up in the rendered html.
    pub async fn drive_until(&mut self, needle: &str) -> String {
        for _ in 0..20 {
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    /// Step a paused tokio clock one second at a time, letting each tick land.
    pub async fn advance_secs(&mut self, secs: u64) {
        for _ in 0..secs {
            tokio::time::advance(std::time::Duration::from_secs(1)).await;
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn question(title: &str, correct: usize) -> QuestionRecord {
    let options = [
        format!("{title} a"),
        format!("{title} b"),
        format!("{title} c"),
        format!("{title} d"),
    ];
    let answer = options[correct].clone();
    let question = Question::new(title, options, answer).expect("valid question");
    QuestionRecord::from_question(&question)
}

pub fn source_with(topic: Topic, titles: &[&str]) -> InMemoryQuestionSource {
    let source = InMemoryQuestionSource::new();
    let records = titles.iter().map(|title| question(title, 0)).collect();
    source.set_pool(topic, records).expect("seed pool");
    source
}

pub fn setup_view_harness(source: Arc<dyn QuestionSource>, initial_topic: Option<Topic>) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let quiz_loop = Arc::new(QuizLoopService::new(clock, source).with_shuffle_seed(7));
    let handles = QuizTestHandles::default();

    let app = Arc::new(TestApp {
        quiz_loop,
        initial_topic,
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness { dom, handles }
}
