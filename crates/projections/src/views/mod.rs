//! Read model views.

mod active_licenses;
mod subdivision_usage;

pub use active_licenses::{ActiveLicenseSummary, ActiveLicensesView};
pub use subdivision_usage::{SubdivisionUsage, SubdivisionUsageView};
