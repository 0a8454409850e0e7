pub mod analyze;
pub mod health;

pub use analyze::analyze_plant;
pub use health::{health_check, readiness_check};
