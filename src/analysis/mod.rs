//! Per-category rate sums and the category exclusivity check.

pub mod aggregate;
pub mod consistency;

pub use aggregate::{RateSummary, aggregate};
pub use consistency::{ConsistencyPolicy, Diagnostic, check_exclusivity};
