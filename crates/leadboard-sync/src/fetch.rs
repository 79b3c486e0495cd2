//! Full-collection fetch over a paginated [`RecordSource`].

use std::collections::HashSet;

use leadboard_core::{Error, Record, Result};
use tracing::{debug, info};

use crate::{ListQuery, RecordSource};

/// Fetch every record of `collection`, following continuation tokens until
/// the source stops returning one.
///
/// Pages are requested strictly in sequence and concatenated in order. Any
/// failing page aborts the whole fetch; nothing fetched so far is returned.
pub async fn fetch_all<S>(source: &S, collection: &str, query: &ListQuery) -> Result<Vec<Record>>
where
    S: RecordSource + ?Sized,
{
    let mut records = Vec::new();
    let mut offset: Option<String> = None;
    let mut seen: HashSet<String> = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = source
            .list_page(collection, query, offset.as_deref())
            .await?;
        pages += 1;
        records.extend(page.records);
        debug!(collection, page = pages, count = records.len(), "fetched page");

        match page.offset {
            // An empty token means the same as no token.
            Some(next) if !next.is_empty() => {
                if !seen.insert(next.clone()) {
                    return Err(Error::MalformedResponse(format!(
                        "continuation token {next} repeated while listing {collection}"
                    )));
                }
                offset = Some(next);
            }
            _ => break,
        }
    }

    info!(collection, pages, count = records.len(), "fetched collection");
    Ok(records)
}
