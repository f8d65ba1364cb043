pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod sheet;
pub mod templates;
pub mod types;
