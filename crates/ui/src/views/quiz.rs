use std::time::Duration;

use dioxus::prelude::*;
use dioxus::dioxus_core::Task;
use tokio::time::MissedTickBehavior;

use quiz_core::model::Topic;
use services::session::{BulletVm, QuestionVm};
use services::{Phase, QuizViewModel, SessionTicket};

use crate::context::AppContext;
use crate::views::{ResultsPanel, ViewError};
use crate::vm::{QuizIntent, QuizVm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Deliver one tick per second to `ticket` until its countdown stops.
async fn run_countdown(
    mut vm: Signal<QuizVm>,
    mut timer_task: Signal<Option<Task>>,
    ticket: SessionTicket,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        if !vm.write().tick(ticket).keeps_running() {
            break;
        }
    }
    // Older countdowns are cancelled on topic switch, so this handle is ours.
    timer_task.set(None);
}

/// Cancel the in-flight load and the countdown of the previous topic.
fn cancel_topic_tasks(mut load_task: Signal<Option<Task>>, mut timer_task: Signal<Option<Task>>) {
    let running = [load_task.write().take(), timer_task.write().take()];
    for task in running.into_iter().flatten() {
        task.cancel();
    }
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();

    let vm = use_signal({
        let clock = quiz_loop.clock();
        move || QuizVm::new(clock)
    });
    let timer_task = use_signal(|| None::<Task>);
    let load_task = use_signal(|| None::<Task>);
    let error = use_signal(|| None::<ViewError>);

    let dispatch_intent = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |intent: QuizIntent| {
            let mut vm = vm;
            let mut timer_task = timer_task;
            let mut load_task = load_task;
            let mut error = error;

            match intent {
                QuizIntent::SelectTopic(topic) => {
                    // Nothing from the previous topic may run once the new ticket exists.
                    cancel_topic_tasks(load_task, timer_task);
                    let ticket = vm.write().begin_topic(topic);
                    error.set(None);

                    let quiz_loop = quiz_loop.clone();
                    let task = spawn(async move {
                        let result = quiz_loop.load_set(topic).await;
                        let started = vm.write().finish_load(ticket, result);
                        load_task.set(None);
                        if started {
                            let countdown = spawn(run_countdown(vm, timer_task, ticket));
                            timer_task.set(Some(countdown));
                        }
                    });
                    load_task.set(Some(task));
                }
                other => {
                    let result = vm.write().apply(other);
                    match result {
                        Ok(()) => error.set(None),
                        Err(err) => {
                            log::warn!("quiz intent rejected: {}", err.message());
                            error.set(Some(err));
                        }
                    }
                    if vm.peek().phase() == Phase::Submitted {
                        if let Some(task) = timer_task.write().take() {
                            task.cancel();
                        }
                    }
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    use_effect(move || {
        if let Some(topic) = ctx.take_initial_topic() {
            dispatch_intent.call(QuizIntent::SelectTopic(topic));
        }
    });

    let on_key = use_callback(move |evt: KeyboardEvent| {
        if vm.peek().phase() != Phase::InProgress {
            return;
        }
        match evt.key() {
            Key::ArrowLeft => {
                evt.prevent_default();
                dispatch_intent.call(QuizIntent::Previous);
            }
            Key::ArrowRight => {
                evt.prevent_default();
                dispatch_intent.call(QuizIntent::Next);
            }
            _ => {}
        }
    });

    let view_model = vm.read().view_model();
    let active_topic = vm.read().active_topic();
    let error_message = error().map(ViewError::message);
    let load_failed = ViewError::LoadFailed.message();

    rsx! {
        div { class: "page quiz-page", id: "quiz-root", tabindex: "0", onkeydown: on_key,
            TopicBar { active: active_topic, on_intent: dispatch_intent }
            if let Some(message) = error_message {
                p { class: "quiz-error", role: "alert", "{message}" }
            }
            match view_model {
                QuizViewModel::Idle { error } => rsx! {
                    div { class: "quiz-idle",
                        p { "Pick a topic to start the quiz." }
                        if let Some(detail) = error {
                            p { class: "quiz-error", role: "alert", "{load_failed}" }
                            p { class: "quiz-error__detail", "{detail}" }
                        }
                    }
                },
                QuizViewModel::Loading { topic } => rsx! {
                    p { class: "quiz-loading", "Loading {topic} questions..." }
                },
                QuizViewModel::InProgress(question) => rsx! {
                    QuestionPanel { question, on_intent: dispatch_intent }
                },
                QuizViewModel::Submitted(results) => rsx! {
                    ResultsPanel { results }
                },
            }
        }
    }
}

#[component]
fn TopicBar(active: Option<Topic>, on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        nav { class: "topics", aria_label: "Quiz topics",
            {Topic::ALL.into_iter().map(|topic| {
                let key = topic.key();
                let label = topic.label();
                rsx! {
                    button {
                        key: "{key}",
                        class: if active == Some(topic) { "topic-btn topic-btn--active" } else { "topic-btn" },
                        id: "topic-{key}",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::SelectTopic(topic)),
                        "{label}"
                    }
                }
            })}
        }
    }
}

#[component]
fn QuestionPanel(question: QuestionVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let index = question.index;
    let topic_label = question.topic.label();

    rsx! {
        section { class: "quiz",
            header { class: "quiz__header",
                span { class: "quiz__topic", "{topic_label}" }
                span { class: "quiz__count", "Questions: {question.total}" }
                span { class: "quiz__timer", id: "quiz-timer", "{question.timer_label}" }
            }
            h2 { class: "quiz__title", "{question.title}" }
            div { class: "answers", role: "radiogroup",
                for option in question.options.iter().cloned() {
                    button {
                        key: "{option.text}",
                        class: if option.selected { "answer-option answer-option--selected" } else { "answer-option" },
                        r#type: "button",
                        role: "radio",
                        aria_checked: "{option.selected}",
                        onclick: {
                            let text = option.text.clone();
                            move |_| on_intent.call(QuizIntent::Choose { index, option: text.clone() })
                        },
                        "{option.text}"
                    }
                }
            }
            Bullets { bullets: question.bullets.clone() }
            footer { class: "quiz__footer",
                button {
                    class: "btn btn-secondary",
                    id: "quiz-prev",
                    r#type: "button",
                    disabled: !question.can_previous,
                    onclick: move |_| on_intent.call(QuizIntent::Previous),
                    "Previous"
                }
                span { class: "quiz__position", "{question.position_label}" }
                button {
                    class: "btn btn-secondary",
                    id: "quiz-next",
                    r#type: "button",
                    disabled: !question.can_next,
                    onclick: move |_| on_intent.call(QuizIntent::Next),
                    "Next"
                }
                button {
                    class: "btn btn-primary",
                    id: "quiz-submit",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::Submit),
                    "Submit ({question.answered}/{question.total} answered)"
                }
            }
        }
    }
}

#[component]
fn Bullets(bullets: Vec<BulletVm>) -> Element {
    rsx! {
        div { class: "bullets", aria_hidden: "true",
            for bullet in bullets {
                span {
                    class: match (bullet.current, bullet.answered) {
                        (true, _) => "bullet bullet--current",
                        (false, true) => "bullet bullet--answered",
                        (false, false) => "bullet",
                    },
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<QuizVm>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<QuizVm>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<QuizVm> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
