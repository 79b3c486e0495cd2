//! Explicit configuration for the remote source and each pipeline.
//!
//! Values are built once at process start (the CLI layer reads the
//! environment) and validated before any request is issued.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Credential and location of the remote base.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub api_url: String,
    pub base_id: String,
    pub api_key: String,
    /// Request timeout enforced by the HTTP transport. `None` leaves the
    /// transport default in place.
    pub timeout_secs: Option<u64>,
}

impl SourceConfig {
    pub fn new(base_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base_id: base_id.into(),
            api_key: api_key.into(),
            timeout_secs: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("api url", &self.api_url)?;
        require("base id", &self.base_id)?;
        require("api key", &self.api_key)
    }
}

/// A lead stage tracked as its own bucket in the workload summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable key used in summaries and JSON output (e.g. `fresh`).
    pub key: String,
    /// Exact stage label stored in the lead record (e.g. `Fresh`).
    pub label: String,
}

impl Category {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadTables {
    pub leads: String,
    pub employees: String,
    pub departments: String,
}

impl Default for WorkloadTables {
    fn default() -> Self {
        Self {
            leads: "Leads".into(),
            employees: "Employee Directory".into(),
            departments: "Departments".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadFields {
    /// Lead → employee link.
    pub assigned: String,
    /// Employee display name.
    pub name: String,
    /// Employee photo attachment.
    pub photo: String,
    /// Employee → department link.
    pub department_link: String,
    /// Department name, matched against the target department.
    pub department_name: String,
    /// Lead stage.
    pub stage: String,
}

impl Default for WorkloadFields {
    fn default() -> Self {
        Self {
            assigned: "Assigned To".into(),
            name: "Full Name".into(),
            photo: "Profile Photo".into(),
            department_link: "Department".into(),
            department_name: "Department Name".into(),
            stage: "Stage".into(),
        }
    }
}

/// Everything the team workload pipeline needs besides the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    pub tables: WorkloadTables,
    pub fields: WorkloadFields,
    pub categories: Vec<Category>,
    pub target_department: String,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            tables: WorkloadTables::default(),
            fields: WorkloadFields::default(),
            categories: vec![
                Category::new("fresh", "Fresh"),
                Category::new("follow", "Follow Up Required"),
                Category::new("notConn", "Not Connected"),
            ],
            target_department: "Sales & Customer Success".into(),
        }
    }
}

impl WorkloadConfig {
    pub fn validate(&self) -> Result<()> {
        require("leads table", &self.tables.leads)?;
        require("employees table", &self.tables.employees)?;
        require("departments table", &self.tables.departments)?;
        require("assigned field", &self.fields.assigned)?;
        require("name field", &self.fields.name)?;
        require("photo field", &self.fields.photo)?;
        require("department link field", &self.fields.department_link)?;
        require("department name field", &self.fields.department_name)?;
        require("stage field", &self.fields.stage)?;
        require("target department", &self.target_department)?;

        let mut seen = std::collections::HashSet::new();
        for cat in &self.categories {
            require("category key", &cat.key)?;
            require("category label", &cat.label)?;
            if !seen.insert(cat.key.as_str()) {
                return Err(Error::configuration(format!(
                    "duplicate category key '{}'",
                    cat.key
                )));
            }
        }
        Ok(())
    }

    /// Category key for an exact stage label.
    pub fn category_for(&self, stage: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.label == stage)
            .map(|c| c.key.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailFields {
    pub name: String,
    pub description: String,
    pub cost_price: String,
    pub selling_price: String,
    pub profit_per_sale: String,
    pub images: String,
}

impl Default for DetailFields {
    fn default() -> Self {
        Self {
            name: "product_name".into(),
            description: "description".into(),
            cost_price: "cost_price".into(),
            selling_price: "selling_price".into(),
            profit_per_sale: "profit_per_sale".into(),
            images: "product_images".into(),
        }
    }
}

/// Product detail pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailConfig {
    pub table: String,
    pub fields: DetailFields,
}

impl DetailConfig {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: DetailFields::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("products table", &self.table)?;
        require("product name field", &self.fields.name)?;
        require("description field", &self.fields.description)?;
        require("cost price field", &self.fields.cost_price)?;
        require("selling price field", &self.fields.selling_price)?;
        require("profit per sale field", &self.fields.profit_per_sale)?;
        require("images field", &self.fields.images)
    }
}

/// Assigned/unassigned lead count configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentConfig {
    pub table: String,
    pub assigned_field: String,
}

impl AssignmentConfig {
    pub fn validate(&self) -> Result<()> {
        require("leads table", &self.table)?;
        require("assigned field", &self.assigned_field)
    }
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::configuration(format!("missing {what}")));
    }
    Ok(())
}
