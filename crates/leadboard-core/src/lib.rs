pub mod config;
mod error;
pub mod product;
pub mod record;
pub mod summary;

pub use config::{
    AssignmentConfig, Category, DetailConfig, DetailFields, SourceConfig, WorkloadConfig,
    WorkloadFields, WorkloadTables,
};
pub use error::{BoxError, Error, Result};
pub use product::{ImageSelection, Money, ProductDetail, ProductImage};
pub use record::{Attachment, Record};
pub use summary::{AssignmentCounts, EntitySummary, ViewState, WorkloadReport, WorkloadSummary};
