//! Text cards for workload, product detail, and assignment reports.
//!
//! Every renderer returns a `String` so output can be checked without a
//! terminal; `main` decides where it goes.

use std::fmt::Write;

use chrono::SecondsFormat;
use leadboard_core::{
    AssignmentCounts, Category, EntitySummary, ImageSelection, ProductDetail, ViewState,
    WorkloadReport,
};
use serde::Serialize;

const BAR_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 22;
const SUPPORT_HINT: &str = "Please check your Airtable configuration or contact support.";

// ── View state ──

/// Render any state: a loading line, the error banner, or the ready card.
pub fn render_state<T>(state: &ViewState<T>, loading: &str, ready: impl Fn(&T) -> String) -> String {
    match state {
        ViewState::Loading => format!("{loading}\n"),
        ViewState::Error(msg) => format!("Error: {msg}\n{SUPPORT_HINT}\n"),
        ViewState::Ready(value) => ready(value),
    }
}

// ── Workload ──

pub fn workload_card(report: &WorkloadReport, categories: &[Category]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Team Workload: {} ===", report.department);
    let _ = writeln!(
        out,
        "generated {}",
        report.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out);

    let summary = &report.summary;
    if summary.entities.is_empty() {
        let _ = writeln!(out, "No team data available");
    }
    for entity in &summary.entities {
        entity_card(&mut out, entity, categories);
    }

    if summary.unattributed > 0 {
        let _ = writeln!(out, "Unattributed leads: {}", summary.unattributed);
    }
    out
}

fn entity_card(out: &mut String, entity: &EntitySummary, categories: &[Category]) {
    let _ = writeln!(
        out,
        "{}  ({} Total Leads)",
        entity.display_name, entity.total
    );
    if !entity.avatar_ref.is_empty() {
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "photo", entity.avatar_ref);
    }
    for cat in categories {
        let pct = entity.percent(&cat.key);
        let _ = writeln!(
            out,
            "  {:<LABEL_WIDTH$} [{}] {:>4}  {:>5.1}%",
            cat.label,
            bar(pct),
            entity.count(&cat.key),
            pct
        );
    }
    let other = entity.uncategorized();
    if other > 0 {
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {:>4}", "other stages", other);
    }
    let _ = writeln!(out);
}

/// Fixed-width bar filled in proportion to `percent`.
fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

// ── Product detail ──

/// JSON shape of a product detail, with derived fields included.
#[derive(Serialize)]
pub struct DetailView<'a> {
    #[serde(flatten)]
    pub detail: &'a ProductDetail,
    pub margin: String,
    pub margin_percent: Option<f64>,
    pub selected_image: Option<&'a str>,
}

impl<'a> DetailView<'a> {
    pub fn new(detail: &'a ProductDetail, selection: ImageSelection) -> Self {
        Self {
            detail,
            margin: detail.margin().to_string(),
            margin_percent: detail.margin_percent(),
            selected_image: selection.current(detail).map(|i| i.url.as_str()),
        }
    }
}

pub fn detail_card(detail: &ProductDetail, selection: ImageSelection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", detail.name.as_deref().unwrap_or("N/A"));
    let _ = writeln!(
        out,
        "{}",
        detail
            .description
            .as_deref()
            .unwrap_or("No description available.")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "  {:<LABEL_WIDTH$} ${}", "cost price", detail.cost_price);
    let _ = writeln!(out, "  {:<LABEL_WIDTH$} ${}", "selling price", detail.selling_price);
    let _ = writeln!(
        out,
        "  {:<LABEL_WIDTH$} ${}",
        "profit per sale", detail.profit_per_sale
    );
    match detail.margin_percent() {
        Some(pct) => {
            let _ = writeln!(
                out,
                "  {:<LABEL_WIDTH$} ${} ({pct:.1}%)",
                "margin",
                detail.margin()
            );
        }
        None => {
            let _ = writeln!(out, "  {:<LABEL_WIDTH$} ${}", "margin", detail.margin());
        }
    }
    let _ = writeln!(out);

    if detail.images.is_empty() {
        let _ = writeln!(out, "Images: none");
        return out;
    }
    let _ = writeln!(out, "Images ({}):", detail.images.len());
    for (i, image) in detail.images.iter().enumerate() {
        let marker = if i == selection.index() { '*' } else { ' ' };
        let _ = writeln!(out, "  {marker} {}", image.url);
    }
    out
}

// ── Assignment ──

pub fn assignment_card(counts: &AssignmentCounts) -> String {
    format!(
        "  {:<LABEL_WIDTH$} {}\n  {:<LABEL_WIDTH$} {}\n",
        "Assigned Leads", counts.assigned, "Unassigned Leads", counts.unassigned
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use leadboard_core::{Money, ProductImage, WorkloadConfig, WorkloadSummary};

    fn report(entities: Vec<EntitySummary>, unattributed: u64) -> WorkloadReport {
        WorkloadReport {
            department: "Sales & Customer Success".into(),
            department_id: "dSales".into(),
            summary: WorkloadSummary {
                entities,
                unattributed,
            },
            generated_at: Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap(),
        }
    }

    fn alice() -> EntitySummary {
        let cfg = WorkloadConfig::default();
        let mut e = EntitySummary::seeded("e1", "Alice", "", &cfg.categories);
        e.total = 4;
        e.counts.insert("fresh".into(), 2);
        e.counts.insert("follow".into(), 1);
        e
    }

    #[test]
    fn bar_is_proportional() {
        assert_eq!(bar(0.0), "-".repeat(20));
        assert_eq!(bar(50.0), format!("{}{}", "#".repeat(10), "-".repeat(10)));
        assert_eq!(bar(100.0), "#".repeat(20));
        assert_eq!(bar(250.0), "#".repeat(20));
    }

    #[test]
    fn workload_card_lists_categories_and_remainders() {
        let cats = WorkloadConfig::default().categories;
        let text = workload_card(&report(vec![alice()], 3), &cats);
        assert!(text.starts_with("=== Team Workload: Sales & Customer Success ===\n"));
        assert!(text.contains("generated 2026-10-14T09:30:00Z"));
        assert!(text.contains("Alice  (4 Total Leads)"));
        assert!(text.contains(" 50.0%"));
        assert!(text.contains("Not Connected"));
        assert!(text.contains("other stages"));
        assert!(text.contains("Unattributed leads: 3"));
    }

    #[test]
    fn empty_workload_says_so() {
        let text = workload_card(&report(vec![], 0), &[]);
        assert!(text.contains("No team data available"));
        assert!(!text.contains("Unattributed"));
    }

    fn lamp() -> ProductDetail {
        ProductDetail {
            name: None,
            description: None,
            cost_price: Money(0.0),
            selling_price: Money(20.0),
            profit_per_sale: Money(5.0),
            images: vec![
                ProductImage {
                    url: "https://img/1.jpg".into(),
                    filename: None,
                },
                ProductImage {
                    url: "https://img/2.jpg".into(),
                    filename: None,
                },
            ],
        }
    }

    #[test]
    fn detail_card_uses_fallbacks_and_marks_selection() {
        let d = lamp();
        let mut sel = ImageSelection::default();
        assert!(sel.select(&d, 1));
        let text = detail_card(&d, sel);
        assert!(text.starts_with("=== N/A ===\nNo description available.\n"));
        assert!(text.contains("$0.00"));
        assert!(text.contains("$20.00 (100.0%)"));
        assert!(text.contains("    https://img/1.jpg"));
        assert!(text.contains("  * https://img/2.jpg"));
    }

    #[test]
    fn detail_view_json_includes_derived_fields() {
        let d = lamp();
        let json = serde_json::to_value(DetailView::new(&d, ImageSelection::default())).unwrap();
        assert_eq!(json["margin"], "20.00");
        assert_eq!(json["selected_image"], "https://img/1.jpg");
        assert_eq!(json["cost_price"], 0.0);
    }

    #[test]
    fn error_state_shows_banner() {
        let state: ViewState<AssignmentCounts> = ViewState::Error("remote API returned 401: x".into());
        let text = render_state(&state, "Loading...", assignment_card);
        assert_eq!(
            text,
            "Error: remote API returned 401: x\nPlease check your Airtable configuration or contact support.\n"
        );
        let loading: ViewState<AssignmentCounts> = ViewState::Loading;
        assert_eq!(render_state(&loading, "Loading...", assignment_card), "Loading...\n");
    }

    #[test]
    fn assignment_card_lists_both_counts() {
        let text = assignment_card(&AssignmentCounts {
            assigned: 7,
            unassigned: 2,
        });
        assert!(text.contains("Assigned Leads"));
        assert!(text.contains("Unassigned Leads"));
        assert!(text.lines().next().unwrap().ends_with(" 7"));
    }
}
