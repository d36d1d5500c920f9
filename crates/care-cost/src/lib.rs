pub mod config;
pub mod error;
pub mod estimation;
pub mod regional;
pub mod telemetry;
