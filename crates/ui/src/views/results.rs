use dioxus::prelude::*;

use quiz_core::model::{OptionMark, ReviewItem};
use services::session::ResultsVm;

use crate::vm::format_datetime;

fn option_class(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::Neutral => "review-option",
        OptionMark::Correct => "review-option review-option--correct",
        OptionMark::IncorrectPick => "review-option review-option--wrong",
    }
}

/// Final score plus every question with its correct option and any wrong pick.
#[component]
pub fn ResultsPanel(results: ResultsVm) -> Element {
    let submitted_at = format_datetime(results.submitted_at);

    rsx! {
        section { class: "results", id: "quiz-results",
            h2 { class: "results__title", "Your Results" }
            p { class: "results__score",
                "You scored "
                strong { "{results.score_label}" }
                " correct ({results.percent}%)."
            }
            if results.timed_out {
                p { class: "results__timeout", "Time is up! Your answers were submitted automatically." }
            }
            p { class: "results__meta", "Time used: {results.time_used_label} · Submitted {submitted_at}" }
        }
        section { class: "review",
            for item in results.items.iter().cloned() {
                ReviewEntry { key: "{item.number}", item }
            }
        }
    }
}

#[component]
fn ReviewEntry(item: ReviewItem) -> Element {
    let status = if item.is_correct { "review-entry review-entry--correct" } else { "review-entry" };

    rsx! {
        article { class: "{status}",
            h3 { class: "review-entry__title", "{item.number}. {item.title}" }
            div { class: "review-entry__options",
                for option in item.options.iter() {
                    div {
                        class: option_class(option.mark),
                        role: "radio",
                        aria_checked: "{option.selected}",
                        aria_disabled: "true",
                        "{option.text}"
                    }
                }
            }
            if item.chosen.is_none() {
                p { class: "review-entry__skipped", "Not answered" }
            }
        }
    }
}
