use serde::{Deserialize, Serialize};

/// A field that the backend serves either as a plain string or as a list of
/// strings. Older rows may carry a JSON-encoded list inside a string column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// Expand into displayable items. A scalar that parses as a JSON string
    /// array is treated as that list; any other string is shown raw.
    pub fn items(&self) -> Vec<String> {
        match self {
            FieldValue::Many(values) => values.clone(),
            FieldValue::Single(raw) => match serde_json::from_str::<Vec<String>>(raw) {
                Ok(values) => values,
                Err(_) => vec![raw.clone()],
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessCard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub phone: Option<FieldValue>,
    #[serde(default)]
    pub email: Option<FieldValue>,
    #[serde(default)]
    pub website: Option<FieldValue>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitorEntry {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub visitor_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub time_in: Option<String>,
    #[serde(default)]
    pub time_out: Option<String>,
}

/// The `{type, data}` payload returned by `/extract_validate/` and posted
/// back unchanged to `/store_data/` after user confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ExtractionResult {
    BusinessCard(BusinessCard),
    VisitorRegister(Vec<VisitorEntry>),
    Unknown,
}

impl ExtractionResult {
    /// An `unknown` result is never eligible for storage.
    pub fn is_storable(&self) -> bool {
        !matches!(self, ExtractionResult::Unknown)
    }

    /// Backend table the payload lands in, spelled the way the backend
    /// spells it.
    pub fn table_name(&self) -> Option<&'static str> {
        match self {
            ExtractionResult::BusinessCard(_) => Some("business_visting_cards"),
            ExtractionResult::VisitorRegister(_) => Some("visitor_log_book"),
            ExtractionResult::Unknown => None,
        }
    }
}

/// A stored business card row as served by `/get_business_cards/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredBusinessCard {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub phone: Option<FieldValue>,
    #[serde(default)]
    pub email: Option<FieldValue>,
    #[serde(default)]
    pub website: Option<FieldValue>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A stored visitor log row as served by `/get_visitor_logs/`. Entries
/// extracted from the same register image share a `batch_id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredVisitorLog {
    pub id: i64,
    #[serde(default)]
    pub batch_id: String,
    #[serde(default)]
    pub date_str: Option<String>,
    #[serde(default)]
    pub visitor_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub time_in: Option<String>,
    #[serde(default)]
    pub time_out: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreResponse {
    #[serde(default)]
    pub message: String,
}
