//! Assigned versus unassigned lead counts.

use leadboard_core::{AssignmentConfig, AssignmentCounts, Record, Result};
use leadboard_sync::{ListQuery, RecordSource, fetch_all};
use tracing::info;

/// A lead is assigned when its assignment field is a non-empty array,
/// whatever the element type. Absent fields, empty arrays, and non-array
/// values count as unassigned.
pub fn count_assignments(leads: &[Record], assigned_field: &str) -> AssignmentCounts {
    let assigned = leads
        .iter()
        .filter(|l| {
            l.get(assigned_field)
                .and_then(|v| v.as_array())
                .is_some_and(|items| !items.is_empty())
        })
        .count() as u64;
    AssignmentCounts {
        assigned,
        unassigned: leads.len() as u64 - assigned,
    }
}

pub async fn fetch_assignment_counts<S>(
    source: &S,
    config: &AssignmentConfig,
    page_size: Option<u32>,
) -> Result<AssignmentCounts>
where
    S: RecordSource + ?Sized,
{
    config.validate()?;
    let query = ListQuery::fields([config.assigned_field.as_str()]).with_page_size(page_size);
    let leads = fetch_all(source, &config.table, &query).await?;
    let counts = count_assignments(&leads, &config.assigned_field);
    info!(
        assigned = counts.assigned,
        unassigned = counts.unassigned,
        "counted lead assignments"
    );
    Ok(counts)
}
