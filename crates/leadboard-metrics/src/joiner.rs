//! Resolving a grouping entity by name and filtering records linked to it.

use leadboard_core::{Error, Record, Result};
use leadboard_sync::{ListQuery, RecordSource, fetch_all};
use tracing::{info, warn};

/// `({<field>} = '<value>')` with quotes and backslashes in `value` escaped.
pub fn equals_formula(field: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("({{{field}}} = '{escaped}')")
}

/// Id of the first record in `collection` whose `match_field` equals
/// `match_value`.
///
/// The backend filters by formula; matches are re-checked here for exact
/// equality so sources that ignore formulas resolve the same way. When
/// several records match, the first in fetch order wins. Fetch order is
/// whatever the backend returns, so duplicates can resolve differently
/// across runs.
pub async fn resolve_identity<S>(
    source: &S,
    collection: &str,
    match_field: &str,
    match_value: &str,
    page_size: Option<u32>,
) -> Result<String>
where
    S: RecordSource + ?Sized,
{
    let query = ListQuery::fields([match_field])
        .with_filter(equals_formula(match_field, match_value))
        .with_page_size(page_size);
    let records = fetch_all(source, collection, &query).await?;

    let mut matches = records
        .iter()
        .filter(|r| r.text(match_field) == Some(match_value));
    let first = matches.next().ok_or_else(|| {
        Error::not_found(format!(
            "no {collection} record with {match_field} = '{match_value}'"
        ))
    })?;

    let extra = matches.count();
    if extra > 0 {
        warn!(
            collection,
            value = match_value,
            matches = extra + 1,
            chosen = %first.id,
            "several records match; using the first"
        );
    }
    info!(collection, value = match_value, id = %first.id, "resolved identity");
    Ok(first.id.clone())
}

/// Records whose `link_field` contains `target`. Records without the field
/// are dropped; order is preserved.
pub fn filter_linked(collection: Vec<Record>, link_field: &str, target: &str) -> Vec<Record> {
    collection
        .into_iter()
        .filter(|r| r.links(link_field).contains(&target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadboard_sync::{MemorySource, RequestLog};
    use serde_json::json;

    fn departments() -> Vec<Record> {
        vec![
            Record::new("dOps").with("Department Name", "Operations"),
            Record::new("dSales").with("Department Name", "Sales & Customer Success"),
            Record::new("dSales2").with("Department Name", "Sales & Customer Success"),
        ]
    }

    #[test]
    fn formula_escapes_quotes() {
        assert_eq!(
            equals_formula("Department Name", "Sales & Customer Success"),
            "({Department Name} = 'Sales & Customer Success')"
        );
        assert_eq!(equals_formula("Name", r"O'Brien\"), r"({Name} = 'O\'Brien\\')");
    }

    #[tokio::test]
    async fn resolves_first_match_in_fetch_order() {
        let src = MemorySource::new()
            .with_table("Departments", departments())
            .with_page_size(1);
        let id = resolve_identity(
            &src,
            "Departments",
            "Department Name",
            "Sales & Customer Success",
            None,
        )
        .await
        .unwrap();
        assert_eq!(id, "dSales");

        let requests = src.requests();
        let RequestLog::List { fields, filter, .. } = &requests[0] else {
            panic!("expected a listing request");
        };
        assert_eq!(fields, &vec!["Department Name".to_string()]);
        assert_eq!(
            filter.as_deref(),
            Some("({Department Name} = 'Sales & Customer Success')")
        );
    }

    #[tokio::test]
    async fn no_match_is_not_found() {
        let src = MemorySource::new().with_table("Departments", departments());
        let err = resolve_identity(
            &src,
            "Departments",
            "Department Name",
            "sales & customer success",
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)), "{err}");
    }

    #[tokio::test]
    async fn page_size_applies_to_the_lookup() {
        let src = MemorySource::new().with_table("Departments", departments());
        let id = resolve_identity(&src, "Departments", "Department Name", "Operations", Some(1))
            .await
            .unwrap();
        assert_eq!(id, "dOps");
        assert_eq!(src.requests().len(), 3);
    }

    #[test]
    fn filter_linked_keeps_members_only() {
        let employees = vec![
            Record::new("e1").with("Department", json!(["dSales"])),
            Record::new("e2").with("Department", json!(["dOps", "dSales"])),
            Record::new("e3").with("Department", json!(["dOps"])),
            Record::new("e4"),
            Record::new("e5").with("Department", "dSales"),
        ];
        let ids: Vec<String> = filter_linked(employees, "Department", "dSales")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }
}
