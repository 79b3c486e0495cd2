//! Aggregation outputs handed to the rendering surface.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Category;

/// Lead workload for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub identity: String,
    pub display_name: String,
    /// Small thumbnail URL, or empty when the entity has no photo.
    pub avatar_ref: String,
    pub total: u64,
    /// Per-category counts keyed by [`Category::key`].
    pub counts: BTreeMap<String, u64>,
}

impl EntitySummary {
    /// Zeroed summary with one bucket per category.
    pub fn seeded(
        identity: impl Into<String>,
        display_name: impl Into<String>,
        avatar_ref: impl Into<String>,
        categories: &[Category],
    ) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            avatar_ref: avatar_ref.into(),
            total: 0,
            counts: categories.iter().map(|c| (c.key.clone(), 0)).collect(),
        }
    }

    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Share of `total` held by the category, in percent. Zero when the
    /// entity has no leads.
    pub fn percent(&self, key: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(key) as f64 / self.total as f64 * 100.0
    }

    /// Leads counted in `total` that matched no configured category.
    pub fn uncategorized(&self) -> u64 {
        self.total.saturating_sub(self.counts.values().sum())
    }
}

/// Ordered summaries plus the leads that could not be attributed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSummary {
    /// Descending by `total`; ties keep the order entities were fetched in.
    pub entities: Vec<EntitySummary>,
    /// Leads with no assignee, or an assignee outside the entity set.
    pub unattributed: u64,
}

/// Result of one team workload run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadReport {
    pub department: String,
    pub department_id: String,
    pub summary: WorkloadSummary,
    pub generated_at: DateTime<Utc>,
}

/// Assigned versus unassigned leads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentCounts {
    pub assigned: u64,
    pub unassigned: u64,
}

impl AssignmentCounts {
    pub fn total(&self) -> u64 {
        self.assigned + self.unassigned
    }
}

/// `loading | error | ready` tag consumed by the rendering surface.
///
/// Errors cross this boundary as a single message; structured kinds stay
/// inside the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Error(e.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, WorkloadConfig};

    fn summary(total: u64, fresh: u64, follow: u64) -> EntitySummary {
        let cfg = WorkloadConfig::default();
        let mut s = EntitySummary::seeded("e1", "Alice", "", &cfg.categories);
        s.total = total;
        s.counts.insert("fresh".into(), fresh);
        s.counts.insert("follow".into(), follow);
        s
    }

    #[test]
    fn seeded_has_every_bucket() {
        let s = summary(0, 0, 0);
        assert_eq!(s.counts.len(), 3);
        assert_eq!(s.count("notConn"), 0);
        assert_eq!(s.count("unknown"), 0);
    }

    #[test]
    fn percent_is_zero_without_leads() {
        assert_eq!(summary(0, 0, 0).percent("fresh"), 0.0);
        assert_eq!(summary(4, 1, 2).percent("follow"), 50.0);
    }

    #[test]
    fn uncategorized_is_the_remainder() {
        assert_eq!(summary(5, 1, 2).uncategorized(), 2);
    }

    #[test]
    fn view_state_stringifies_errors() {
        let state: ViewState<u8> =
            ViewState::from_result(Err(Error::not_found("department 'Ops'")));
        assert_eq!(state, ViewState::Error("not found: department 'Ops'".into()));
        assert!(ViewState::<u8>::from_result(Ok::<_, Error>(1)).is_ready());
    }

    #[test]
    fn view_state_json_is_tagged() {
        let json = serde_json::to_value(ViewState::Ready(AssignmentCounts {
            assigned: 3,
            unassigned: 1,
        }))
        .unwrap();
        assert_eq!(json["state"], "ready");
        assert_eq!(json["data"]["assigned"], 3);
        let loading = serde_json::to_value(ViewState::<u8>::Loading).unwrap();
        assert_eq!(loading["state"], "loading");
    }
}
