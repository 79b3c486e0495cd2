//! Product detail projection.

use leadboard_core::{
    DetailConfig, DetailFields, Error, Money, ProductDetail, ProductImage, Record, Result,
};
use leadboard_sync::RecordSource;
use tracing::info;

/// Build the detail view of a product record.
///
/// Absent or non-numeric prices become `0`; a missing image list becomes
/// empty.
pub fn project(record: &Record, fields: &DetailFields) -> ProductDetail {
    let money = |field: &str| Money(record.number(field).unwrap_or(0.0));
    ProductDetail {
        name: record.text(&fields.name).map(str::to_string),
        description: record.text(&fields.description).map(str::to_string),
        cost_price: money(&fields.cost_price),
        selling_price: money(&fields.selling_price),
        profit_per_sale: money(&fields.profit_per_sale),
        images: record
            .attachments(&fields.images)
            .into_iter()
            .map(|a| ProductImage {
                url: a.url,
                filename: a.filename,
            })
            .collect(),
    }
}

/// Fetch `record_id` from the configured table and project it.
pub async fn fetch_detail<S>(
    source: &S,
    config: &DetailConfig,
    record_id: &str,
) -> Result<ProductDetail>
where
    S: RecordSource + ?Sized,
{
    config.validate()?;
    if record_id.trim().is_empty() {
        return Err(Error::configuration("missing record id"));
    }

    let record = source.get_record(&config.table, record_id).await?;
    let detail = project(&record, &config.fields);
    info!(
        id = %record.id,
        images = detail.images.len(),
        "projected product detail"
    );
    Ok(detail)
}
