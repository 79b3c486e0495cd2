//! Metrics over fetched collections: department joins, per-employee lead
//! workload, lead assignment counts, and product detail projection.

pub mod assignment;
pub mod detail;
pub mod joiner;
pub mod pipeline;
pub mod workload;

pub use assignment::{count_assignments, fetch_assignment_counts};
pub use detail::{fetch_detail, project};
pub use joiner::{equals_formula, filter_linked, resolve_identity};
pub use pipeline::run_workload;
pub use workload::aggregate;
