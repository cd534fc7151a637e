pub mod config;
pub mod director;
pub mod kernel;
pub mod library;
pub mod outputs;
pub mod services;
pub mod transcript;

pub use director::Director;
pub use kernel::reactor::{StoryAnalyzer, TickOutcome};
