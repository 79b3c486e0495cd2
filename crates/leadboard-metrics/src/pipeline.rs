//! Team workload pipeline.
//!
//! Steps run strictly in order, each awaited before the next:
//! department resolution → employee fetch and filter → lead fetch →
//! aggregation. Any failure ends the run without a report.

use chrono::Utc;
use leadboard_core::{Result, WorkloadConfig, WorkloadReport};
use leadboard_sync::{ListQuery, RecordSource, fetch_all};
use tracing::info;

use crate::joiner::{filter_linked, resolve_identity};
use crate::workload::aggregate;

pub async fn run_workload<S>(
    source: &S,
    config: &WorkloadConfig,
    page_size: Option<u32>,
) -> Result<WorkloadReport>
where
    S: RecordSource + ?Sized,
{
    config.validate()?;
    let tables = &config.tables;
    let fields = &config.fields;

    let department_id = resolve_identity(
        source,
        &tables.departments,
        &fields.department_name,
        &config.target_department,
        page_size,
    )
    .await?;

    let employees = fetch_all(
        source,
        &tables.employees,
        &ListQuery::fields([&fields.name, &fields.photo, &fields.department_link])
            .with_page_size(page_size),
    )
    .await?;
    let members = filter_linked(employees, &fields.department_link, &department_id);
    info!(
        department = %config.target_department,
        members = members.len(),
        "filtered department members"
    );

    let leads = fetch_all(
        source,
        &tables.leads,
        &ListQuery::fields([&fields.assigned, &fields.stage]).with_page_size(page_size),
    )
    .await?;

    let summary = aggregate(&members, &leads, config);
    info!(
        entities = summary.entities.len(),
        leads = leads.len(),
        unattributed = summary.unattributed,
        "workload report ready"
    );

    Ok(WorkloadReport {
        department: config.target_department.clone(),
        department_id,
        summary,
        generated_at: Utc::now(),
    })
}
