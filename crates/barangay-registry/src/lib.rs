pub mod config;
pub mod error;
pub mod residents;
pub mod telemetry;
