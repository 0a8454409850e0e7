pub mod report;

pub use report::{
    HealthResult, HealthStatus, IdentificationResult, NarrativeReport, NO_DISEASE, UNKNOWN,
};
