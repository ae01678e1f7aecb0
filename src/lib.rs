//! Library entry for earthview exposing the acquisition pipeline for integration tests.

pub mod args;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod history;
pub mod paths;
pub mod pipeline;
pub mod sequence;
pub mod wallpaper;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Pipeline, RunReport};
