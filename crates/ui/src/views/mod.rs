mod quiz;
mod results;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use quiz::QuizView;
pub use results::ResultsPanel;
pub use state::ViewError;
