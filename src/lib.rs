pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod storage;
pub mod watch;

pub use config::Config;
pub use error::{Error, Result};
pub use feed::Entry;
pub use watch::{CycleReport, SourceOutcome, Watcher};
