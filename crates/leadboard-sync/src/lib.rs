//! Record access layer: the `RecordSource` seam, full-collection pagination,
//! an in-memory source, and the Airtable HTTP client.

pub mod fetch;
pub mod memory;
pub mod source;

#[cfg(feature = "http")]
pub mod http;

pub use fetch::fetch_all;
pub use memory::{MemorySource, RequestLog};
pub use source::{ListQuery, Page, RecordSource};

#[cfg(feature = "http")]
pub use http::AirtableClient;
