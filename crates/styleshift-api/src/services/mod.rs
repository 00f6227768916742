//! Application services: run state tracking, polling watchers, and job dispatch.

pub mod dispatcher;
pub mod run_tracker;
pub mod watcher;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use run_tracker::{RunSnapshot, RunTracker};
pub use watcher::{spawn_run_watcher, WatcherConfig};
