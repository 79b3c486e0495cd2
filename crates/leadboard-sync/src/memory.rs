//! In-memory [`RecordSource`] over fixed tables.
//!
//! Pages through each table with a fixed page size, honours field
//! projection, and ignores `filter_by_formula` (formulas are backend-side).
//! Every request is logged so callers can inspect what was asked for.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use leadboard_core::{Error, Record, Result};
use tracing::debug;

use crate::{ListQuery, Page, RecordSource};

const DEFAULT_PAGE_SIZE: usize = 100;
const TOKEN_PREFIX: &str = "itr";

/// One request received by a [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestLog {
    List {
        collection: String,
        fields: Vec<String>,
        filter: Option<String>,
        offset: Option<String>,
    },
    Get {
        collection: String,
        id: String,
    },
}

#[derive(Debug, Clone)]
struct Failure {
    collection: String,
    request: usize,
    status: u16,
}

#[derive(Debug)]
pub struct MemorySource {
    tables: HashMap<String, Vec<Record>>,
    page_size: usize,
    failure: Option<Failure>,
    requests: Mutex<Vec<RequestLog>>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Parse a fixture of the form `{"<table>": [{"id": .., "fields": {..}}, ..]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: HashMap<String, Vec<Record>> = serde_json::from_str(json)
            .map_err(|e| Error::configuration(format!("invalid fixture: {e}")))?;
        let mut source = Self::new();
        source.tables = tables;
        Ok(source)
    }

    pub fn with_table(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.tables.insert(name.into(), records);
        self
    }

    /// Default page size when the query does not set one. Clamped to 1.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fail the `request`-th listing (0-based) of `collection` with `status`.
    pub fn fail_listing(
        mut self,
        collection: impl Into<String>,
        request: usize,
        status: u16,
    ) -> Self {
        self.failure = Some(Failure {
            collection: collection.into(),
            request,
            status,
        });
        self
    }

    /// Snapshot of the requests received so far.
    pub fn requests(&self) -> Vec<RequestLog> {
        self.log().clone()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<RequestLog>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn listings_of(&self, collection: &str) -> usize {
        self.log()
            .iter()
            .filter(|r| matches!(r, RequestLog::List { collection: c, .. } if c == collection))
            .count()
    }
}

fn parse_token(token: &str) -> Option<usize> {
    token.strip_prefix(TOKEN_PREFIX)?.parse().ok()
}

fn project(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }
    let mut out = Record::new(record.id.clone());
    for f in fields {
        if let Some(v) = record.fields.get(f) {
            out.fields.insert(f.clone(), v.clone());
        }
    }
    out
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn list_page(
        &self,
        collection: &str,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<Page> {
        let request = self.listings_of(collection);
        self.log().push(RequestLog::List {
            collection: collection.to_string(),
            fields: query.fields.clone(),
            filter: query.filter_by_formula.clone(),
            offset: offset.map(str::to_string),
        });

        if let Some(f) = &self.failure
            && f.collection == collection
            && f.request == request
        {
            return Err(Error::RemoteApi {
                status: f.status,
                message: format!("injected failure on request {request} to {collection}"),
            });
        }

        let table = self.tables.get(collection).ok_or_else(|| Error::RemoteApi {
            status: 404,
            message: format!("NOT_FOUND - Could not find table {collection}"),
        })?;

        let start = match offset {
            None => 0,
            Some(token) => parse_token(token).ok_or_else(|| Error::RemoteApi {
                status: 422,
                message: format!("LIST_RECORDS_ITERATOR_NOT_AVAILABLE - bad offset {token}"),
            })?,
        };
        let size = query
            .page_size
            .map(|n| n.max(1) as usize)
            .unwrap_or(self.page_size);
        let end = (start + size).min(table.len());

        let records = table
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|r| project(r, &query.fields))
            .collect();
        let offset = (end < table.len()).then(|| format!("{TOKEN_PREFIX}{end}"));
        debug!(collection, start, end, "served memory page");
        Ok(Page { records, offset })
    }

    async fn get_record(&self, collection: &str, id: &str) -> Result<Record> {
        self.log().push(RequestLog::Get {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self.tables
            .get(collection)
            .and_then(|t| t.iter().find(|r| r.id == id))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("record {id} in {collection}")))
    }
}
