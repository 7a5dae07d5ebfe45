pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod fetch;
pub mod join;
pub mod logging;
pub mod sources;
