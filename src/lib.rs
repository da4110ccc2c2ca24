pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod net;
pub mod pipeline;
pub mod snapshot;
pub mod types;
