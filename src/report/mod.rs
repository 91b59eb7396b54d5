pub mod generator;
pub mod stats;

pub use generator::{default_report_path, generate_report};
