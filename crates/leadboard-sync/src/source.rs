//! The `RecordSource` seam: paged listing and single-record lookup over a
//! tabular backend.

use async_trait::async_trait;
use leadboard_core::{Record, Result};
use serde::Deserialize;

/// Projection and filtering applied to a collection listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Fields to return. Empty means every field.
    pub fields: Vec<String>,
    /// Boolean predicate evaluated by the backend. Opaque to this crate.
    pub filter_by_formula: Option<String>,
    pub page_size: Option<u32>,
}

impl ListQuery {
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, formula: impl Into<String>) -> Self {
        self.filter_by_formula = Some(formula.into());
        self
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }
}

/// One page of a listing plus the token for the next one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    pub records: Vec<Record>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// A tabular backend that lists records page by page and fetches single
/// records by id.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the page starting at `offset` (`None` for the first page).
    async fn list_page(
        &self,
        collection: &str,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<Page>;

    async fn get_record(&self, collection: &str, id: &str) -> Result<Record>;
}
