//! Job-search aggregation: turn a free-text query and an optional profile
//! into platform-specific searches, run them with progressive relaxation and
//! normalize the results into one display list.

pub mod cli;
pub mod core;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod platform;
pub mod profile;
pub mod query;
pub mod results;
pub mod search;
pub mod sources;
pub mod utils;
pub mod web;

#[cfg(test)]
pub mod testing;

pub use error::{AppError, AppResult};
pub use orchestrator::JobSearchService;
pub use platform::Platform;
pub use web::start_web_server;
