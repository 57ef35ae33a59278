pub mod config;
pub mod dataset;
pub mod error;
pub mod matching;
pub mod telemetry;
