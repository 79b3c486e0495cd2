//! Per-employee lead workload.

use std::collections::HashMap;

use leadboard_core::{EntitySummary, Record, WorkloadConfig, WorkloadSummary};
use tracing::{debug, warn};

const UNKNOWN_NAME: &str = "Unknown";

/// Small thumbnail of the photo at position 0, or empty.
fn avatar_of(record: &Record, photo_field: &str) -> String {
    record
        .first_attachment(photo_field)
        .and_then(|a| a.thumbnails)
        .and_then(|t| t.small)
        .map(|t| t.url)
        .unwrap_or_default()
}

/// Tally `leads` against `entities`.
///
/// # Algorithm
///
/// 1. Seed one zeroed summary per entity, in entity order. A repeated entity
///    id seeds once.
/// 2. Attribute each lead to the *first* id in its assignment field only.
/// 3. If that id was seeded, bump `total`, and bump the category whose label
///    equals the lead's stage exactly. Unknown stages bump `total` only.
/// 4. Leads with no assignee, or one outside the entity set, go to
///    `unattributed`.
/// 5. Sort by descending `total`. The sort is stable, so ties keep seeding
///    order.
pub fn aggregate(
    entities: &[Record],
    leads: &[Record],
    config: &WorkloadConfig,
) -> WorkloadSummary {
    let fields = &config.fields;
    let mut summaries: Vec<EntitySummary> = Vec::with_capacity(entities.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(entities.len());

    for entity in entities {
        if index.contains_key(entity.id.as_str()) {
            continue;
        }
        index.insert(entity.id.as_str(), summaries.len());
        summaries.push(EntitySummary::seeded(
            entity.id.clone(),
            entity.text(&fields.name).unwrap_or(UNKNOWN_NAME),
            avatar_of(entity, &fields.photo),
            &config.categories,
        ));
    }

    let mut unattributed = 0u64;
    for lead in leads {
        let Some(&slot) = lead
            .first_link(&fields.assigned)
            .and_then(|id| index.get(id))
        else {
            unattributed += 1;
            continue;
        };

        let summary = &mut summaries[slot];
        summary.total += 1;
        if let Some(stage) = lead.text(&fields.stage)
            && let Some(key) = config.category_for(stage)
            && let Some(count) = summary.counts.get_mut(key)
        {
            *count += 1;
        }
    }

    summaries.sort_by(|a, b| b.total.cmp(&a.total));

    if unattributed > 0 {
        warn!(unattributed, "leads not attributed to any entity");
    }
    debug!(entities = summaries.len(), leads = leads.len(), "aggregated workload");

    WorkloadSummary {
        entities: summaries,
        unattributed,
    }
}
