pub mod providers;
pub mod report;

pub use report::{fallback_report, merge_report};
