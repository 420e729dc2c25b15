use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A scalar cell from the issue export.
///
/// The export is a CSV converted to JSON by the server, so the same column can
/// arrive as a string in one row and a number in the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(Number),
    Flag(bool),
    Json(Value),
}

impl FieldValue {
    /// Display text for the value, or `None` when the cell counts as empty.
    ///
    /// Empty strings, zero, `false` and JSON null are all treated as "not
    /// provided".
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(text.clone()),
            Self::Number(number) => number_display(number),
            Self::Flag(false) => None,
            Self::Flag(true) => Some("true".to_string()),
            Self::Json(Value::Null) => None,
            Self::Json(value) => Some(value.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Renders integral floats without the trailing `.0` pandas adds to numeric
/// columns that contain gaps.
pub fn number_display(number: &Number) -> Option<String> {
    if let Some(value) = number.as_i64() {
        return (value != 0).then(|| value.to_string());
    }
    if let Some(value) = number.as_u64() {
        return (value != 0).then(|| value.to_string());
    }
    let value = number.as_f64()?;
    if value == 0.0 || value.is_nan() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return Some(format!("{}", value as i64));
    }
    Some(value.to_string())
}

/// One static-analysis finding.
///
/// Unknown columns are kept in `extra` so the record can be handed back to the
/// chat endpoint exactly as it was received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<FieldValue>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_status: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_code_attribute: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_code_attribute_category: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_range: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impacts: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Issue {
    pub fn severity_text(&self) -> Option<String> {
        self.severity.as_ref().and_then(FieldValue::display)
    }

    pub fn key_text(&self) -> Option<String> {
        self.key.as_ref().and_then(FieldValue::display)
    }
}

pub fn parse_issue_list(body: &str) -> serde_json::Result<Vec<Issue>> {
    serde_json::from_str(body)
}
