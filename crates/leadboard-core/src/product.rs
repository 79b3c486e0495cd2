//! Product detail view model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monetary amount shown with two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub f64);

impl Money {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cost_price: Money,
    pub selling_price: Money,
    pub profit_per_sale: Money,
    pub images: Vec<ProductImage>,
}

impl ProductDetail {
    /// Selling price minus cost price.
    pub fn margin(&self) -> Money {
        Money(self.selling_price.0 - self.cost_price.0)
    }

    /// Margin as a percentage of the selling price; `None` for a zero price.
    pub fn margin_percent(&self) -> Option<f64> {
        if self.selling_price.0 == 0.0 {
            return None;
        }
        Some(self.margin().0 / self.selling_price.0 * 100.0)
    }

    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }
}

/// Which product image is currently shown.
///
/// Pure view state: switching images never triggers a fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageSelection {
    index: usize,
}

impl ImageSelection {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Select image `index`. Out-of-range indices are rejected and the
    /// selection is left as it was.
    pub fn select(&mut self, detail: &ProductDetail, index: usize) -> bool {
        if index >= detail.images.len() {
            return false;
        }
        self.index = index;
        true
    }

    pub fn current<'a>(&self, detail: &'a ProductDetail) -> Option<&'a ProductImage> {
        detail.images.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(cost: f64, sell: f64, images: &[&str]) -> ProductDetail {
        ProductDetail {
            name: Some("Widget".into()),
            description: None,
            cost_price: Money(cost),
            selling_price: Money(sell),
            profit_per_sale: Money(sell - cost),
            images: images
                .iter()
                .map(|u| ProductImage {
                    url: u.to_string(),
                    filename: None,
                })
                .collect(),
        }
    }

    #[test]
    fn money_formats_two_decimals() {
        assert_eq!(Money(0.0).to_string(), "0.00");
        assert_eq!(Money(12.5).to_string(), "12.50");
        assert_eq!(Money(7.456).to_string(), "7.46");
    }

    #[test]
    fn margin_is_derived() {
        let d = detail(40.0, 100.0, &[]);
        assert_eq!(d.margin(), Money(60.0));
        let pct = d.margin_percent().unwrap();
        assert!((pct - 60.0).abs() < 1e-9, "got {pct}");
        assert_eq!(detail(10.0, 0.0, &[]).margin_percent(), None);
    }

    #[test]
    fn selection_starts_at_primary_image() {
        let d = detail(1.0, 2.0, &["a", "b", "c"]);
        let mut sel = ImageSelection::default();
        assert_eq!(sel.current(&d).map(|i| i.url.as_str()), Some("a"));
        assert!(sel.select(&d, 2));
        assert_eq!(sel.current(&d).map(|i| i.url.as_str()), Some("c"));
        assert!(!sel.select(&d, 3));
        assert_eq!(sel.index(), 2);
    }

    #[test]
    fn no_images_means_no_selection() {
        let d = detail(1.0, 2.0, &[]);
        let mut sel = ImageSelection::default();
        assert!(sel.current(&d).is_none());
        assert!(!sel.select(&d, 0));
        assert!(d.primary_image().is_none());
    }
}
