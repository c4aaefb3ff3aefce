pub mod ops;
pub mod evaluator;
pub mod runner;
pub mod event;
pub mod interpreter;

pub use event::{Event, JobId, JobState, JobStatus, ListenerId};
pub use interpreter::{Interpreter, InterpreterConfig};
pub use runner::Runner;

pub const DEFAULT_PROGRESS_INTERVAL: f64 = 0.05;

/// Options for a single run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// Minimum completed fraction between two progress notifications.
    /// A final `1.0` is always reported.
    pub progress_interval: f64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { progress_interval: DEFAULT_PROGRESS_INTERVAL }
    }
}

impl RunOptions {
    pub fn with_progress_interval(mut self, interval: f64) -> Self {
        self.progress_interval = interval;
        self
    }
}
