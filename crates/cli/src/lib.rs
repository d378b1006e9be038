pub mod config;
pub mod metrics;
pub mod pipeline;

pub use config::{AppConfig, LogFormat, MergeMode};
pub use pipeline::{RunReport, run};
