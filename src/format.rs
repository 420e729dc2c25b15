//! Display formatting for issue fields.
//!
//! Every formatter is total: malformed input degrades to a fallback string and
//! never escapes as an error. Results are plain text or structured data; styling
//! happens in `ui`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

use crate::issue::{FieldValue, number_display};

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_MESSAGE: &str = "No message provided";
pub const NO_TAGS: &str = "No tags";
pub const NO_IMPACTS: &str = "No impacts data";
pub const NO_FLOWS: &str = "No flows data";
pub const NO_LOCATIONS: &str = "No locations";
pub const NO_LOCATION_MESSAGE: &str = "No message";

const DATE_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationView {
    pub component: String,
    pub message: String,
    pub text_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowView {
    pub locations: Vec<LocationView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowsDisplay {
    Missing,
    Flows(Vec<FlowView>),
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactView {
    pub quality: String,
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImpactsDisplay {
    Missing,
    Impacts(Vec<ImpactView>),
    Raw(String),
}

enum Decoded {
    Absent,
    Parsed(Value),
    Malformed { raw: String, error: String },
}

/// Sub-fields arrive JSON-encoded inside a string column. Already-decoded
/// values are accepted as well.
fn decode(value: Option<&Value>) -> Decoded {
    let value = match value {
        None | Some(Value::Null) => return Decoded::Absent,
        Some(value) => value,
    };
    let raw = match value {
        Value::String(raw) => raw.trim(),
        Value::Array(items) if items.is_empty() => return Decoded::Absent,
        other => return Decoded::Parsed(other.clone()),
    };
    if raw.is_empty() || raw == "[]" {
        return Decoded::Absent;
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(parsed) => Decoded::Parsed(parsed),
        Err(error) => Decoded::Malformed {
            raw: raw.to_string(),
            error: error.to_string(),
        },
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number_display(number).unwrap_or_else(|| "0".to_string())),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

pub fn format_date(value: Option<&FieldValue>) -> String {
    format_date_in(value, &Local)
}

pub fn format_date_in<Tz>(value: Option<&FieldValue>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(value) = value else {
        return NOT_SPECIFIED.to_string();
    };
    let Some(raw) = value.display() else {
        return NOT_SPECIFIED.to_string();
    };
    let parsed = match value {
        FieldValue::Number(number) => number
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|utc| utc.with_timezone(zone)),
        _ => parse_date_text(raw.trim(), zone),
    };
    match parsed {
        Some(date) => date.format(DATE_DISPLAY).to_string(),
        None => raw,
    }
}

fn parse_date_text<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(zone));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(date) = DateTime::parse_from_str(raw, pattern) {
            return Some(date.with_timezone(zone));
        }
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return zone.from_local_datetime(&naive).earliest();
        }
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    zone.from_local_datetime(&day.and_hms_opt(0, 0, 0)?).earliest()
}

pub fn format_text_range(value: Option<&Value>) -> String {
    match decode(value) {
        Decoded::Absent => NOT_SPECIFIED.to_string(),
        Decoded::Malformed { raw, .. } => raw,
        Decoded::Parsed(parsed) => {
            text_range_parts(&parsed).unwrap_or_else(|| raw_text(value.unwrap_or(&parsed)))
        }
    }
}

fn text_range_parts(range: &Value) -> Option<String> {
    let range = range.as_object()?;
    let parts = [
        ("Start Line", "startLine"),
        ("End Line", "endLine"),
        ("Start Offset", "startOffset"),
        ("End Offset", "endOffset"),
    ]
    .into_iter()
    .filter_map(|(label, key)| {
        scalar_text(range.get(key)).map(|value| format!("{}: {}", label, value))
    })
    .collect::<Vec<String>>();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join(", "))
}

/// Compact form used inside flow locations: `Line 3-5, Offset 0-12`.
fn location_range(range: &Value) -> Option<String> {
    let range = range.as_object()?;
    let field = |key: &str| scalar_text(range.get(key)).unwrap_or_default();
    Some(format!(
        "Line {}-{}, Offset {}-{}",
        field("startLine"),
        field("endLine"),
        field("startOffset"),
        field("endOffset")
    ))
}

pub fn format_flows(value: Option<&Value>) -> FlowsDisplay {
    let parsed = match decode(value) {
        Decoded::Absent => return FlowsDisplay::Missing,
        Decoded::Malformed { error, .. } => {
            return FlowsDisplay::Invalid(format!("Error parsing flows: {}", error));
        }
        Decoded::Parsed(parsed) => parsed,
    };
    let Some(flows) = parsed.as_array() else {
        return FlowsDisplay::Invalid(
            "Error parsing flows: expected an array of flows".to_string(),
        );
    };
    if flows.is_empty() {
        return FlowsDisplay::Missing;
    }

    let flows = flows
        .iter()
        .map(|flow| FlowView {
            locations: flow
                .get("locations")
                .and_then(Value::as_array)
                .map(|locations| locations.iter().map(location_view).collect())
                .unwrap_or_default(),
        })
        .collect();
    FlowsDisplay::Flows(flows)
}

fn location_view(location: &Value) -> LocationView {
    let message = location
        .get("msg")
        .or_else(|| location.get("message"))
        .and_then(|value| scalar_text(Some(value)))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| NO_LOCATION_MESSAGE.to_string());
    LocationView {
        component: scalar_text(location.get("component")).unwrap_or_default(),
        message,
        text_range: location
            .get("textRange")
            .filter(|range| !range.is_null())
            .and_then(location_range),
    }
}

pub fn format_impacts(value: Option<&Value>) -> ImpactsDisplay {
    let parsed = match decode(value) {
        Decoded::Absent => return ImpactsDisplay::Missing,
        Decoded::Malformed { raw, .. } => return ImpactsDisplay::Raw(raw),
        Decoded::Parsed(parsed) => parsed,
    };
    let Some(impacts) = parsed.as_array() else {
        return ImpactsDisplay::Raw(raw_text(value.unwrap_or(&parsed)));
    };
    if impacts.is_empty() {
        return ImpactsDisplay::Missing;
    }
    ImpactsDisplay::Impacts(
        impacts
            .iter()
            .map(|impact| ImpactView {
                quality: scalar_text(impact.get("softwareQuality")).unwrap_or_default(),
                severity: scalar_text(impact.get("severity")).unwrap_or_default(),
            })
            .collect(),
    )
}

/// Splits the comma-separated tag column. Blank entries are dropped.
pub fn format_tags(value: Option<&FieldValue>) -> Vec<String> {
    let Some(raw) = value.and_then(FieldValue::display) else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

impl FlowsDisplay {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Missing => vec![NO_FLOWS.to_string()],
            Self::Invalid(message) => vec![message.clone()],
            Self::Flows(flows) => {
                let mut lines = Vec::new();
                for (flow_index, flow) in flows.iter().enumerate() {
                    lines.push(format!("Flow #{}", flow_index + 1));
                    if flow.locations.is_empty() {
                        lines.push(format!("  {}", NO_LOCATIONS));
                        continue;
                    }
                    for (location_index, location) in flow.locations.iter().enumerate() {
                        lines.extend(location.lines(location_index));
                    }
                }
                lines
            }
        }
    }
}

impl LocationView {
    fn lines(&self, index: usize) -> Vec<String> {
        let mut lines = vec![
            format!("  Location #{}", index + 1),
            format!("    Component: {}", self.component),
            format!("    Message: {}", self.message),
        ];
        if let Some(range) = &self.text_range {
            lines.push(format!("    Text Range: {}", range));
        }
        lines
    }
}

impl ImpactsDisplay {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Missing => vec![NO_IMPACTS.to_string()],
            Self::Raw(raw) => vec![raw.clone()],
            Self::Impacts(impacts) => impacts
                .iter()
                .map(|impact| format!("{}: {}", impact.quality, impact.severity))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn text(raw: &str) -> Value {
        Value::String(raw.to_string())
    }

    #[test]
    fn text_range_lists_lines_and_offsets() {
        let range = text(r#"{"startLine":5,"endLine":7,"startOffset":2,"endOffset":14}"#);
        assert_eq!(
            format_text_range(Some(&range)),
            "Start Line: 5, End Line: 7, Start Offset: 2, End Offset: 14"
        );
    }

    #[test]
    fn text_range_omits_missing_offsets() {
        let range = text(r#"{"startLine":5,"endLine":7}"#);
        let formatted = format_text_range(Some(&range));
        assert!(formatted.contains("Start Line: 5, End Line: 7"));
        assert!(!formatted.contains("Offset"));
    }

    #[test]
    fn text_range_empty_values_are_not_specified() {
        assert_eq!(format_text_range(Some(&text(""))), NOT_SPECIFIED);
        assert_eq!(format_text_range(Some(&text("[]"))), NOT_SPECIFIED);
        assert_eq!(format_text_range(None), NOT_SPECIFIED);
    }

    #[test]
    fn text_range_falls_back_to_raw_on_bad_json() {
        assert_eq!(format_text_range(Some(&text("line 4"))), "line 4");
    }

    #[test]
    fn text_range_accepts_decoded_object() {
        let range = json!({"startLine": 1.0, "endLine": 2});
        assert_eq!(
            format_text_range(Some(&range)),
            "Start Line: 1, End Line: 2"
        );
    }

    #[test]
    fn tags_are_trimmed_in_order() {
        let tags = FieldValue::from("a, b ,c");
        assert_eq!(format_tags(Some(&tags)), vec!["a", "b", "c"]);
        assert!(format_tags(Some(&FieldValue::from(""))).is_empty());
        assert!(format_tags(None).is_empty());
    }

    #[test]
    fn flows_report_parse_errors_instead_of_failing() {
        let display = format_flows(Some(&text("not json")));
        let FlowsDisplay::Invalid(message) = display else {
            panic!("expected invalid flows, got {:?}", display);
        };
        assert!(message.starts_with("Error parsing flows:"));
    }

    #[test]
    fn flows_non_array_is_a_parse_error() {
        let display = format_flows(Some(&text(r#"{"locations":[]}"#)));
        assert!(matches!(display, FlowsDisplay::Invalid(message) if message.starts_with("Error parsing flows:")));
    }

    #[test]
    fn flows_render_locations_and_missing_locations() {
        let flows = text(
            &json!([
                {"locations": [
                    {"component": "src/a.ts", "msg": "tainted here",
                     "textRange": {"startLine": 3, "endLine": 4, "startOffset": 0, "endOffset": 9}},
                    {"component": "src/b.ts"}
                ]},
                {}
            ])
            .to_string(),
        );
        let display = format_flows(Some(&flows));
        let FlowsDisplay::Flows(views) = &display else {
            panic!("expected flows, got {:?}", display);
        };
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].locations[0].message, "tainted here");
        assert_eq!(
            views[0].locations[0].text_range.as_deref(),
            Some("Line 3-4, Offset 0-9")
        );
        assert_eq!(views[0].locations[1].message, NO_LOCATION_MESSAGE);
        assert!(views[1].locations.is_empty());

        let lines = display.lines();
        assert_eq!(lines[0], "Flow #1");
        assert!(lines.contains(&"    Component: src/a.ts".to_string()));
        assert!(lines.contains(&format!("  {}", NO_LOCATIONS)));
    }

    #[test]
    fn flows_empty_is_missing() {
        assert_eq!(format_flows(Some(&text("[]"))), FlowsDisplay::Missing);
        assert_eq!(format_flows(None).lines(), vec![NO_FLOWS.to_string()]);
    }

    #[test]
    fn impacts_render_one_line_each() {
        let impacts = text(
            r#"[{"softwareQuality":"MAINTAINABILITY","severity":"HIGH"},{"softwareQuality":"SECURITY"}]"#,
        );
        assert_eq!(
            format_impacts(Some(&impacts)).lines(),
            vec!["MAINTAINABILITY: HIGH".to_string(), "SECURITY: ".to_string()]
        );
    }

    #[test]
    fn impacts_malformed_returns_raw() {
        assert_eq!(
            format_impacts(Some(&text("{oops"))),
            ImpactsDisplay::Raw("{oops".to_string())
        );
        assert_eq!(format_impacts(Some(&text("[]"))), ImpactsDisplay::Missing);
    }

    #[test]
    fn dates_render_in_requested_zone() {
        let value = FieldValue::from("2024-03-01T10:15:30+0000");
        assert_eq!(format_date_in(Some(&value), &Utc), "2024-03-01 10:15:30");

        let value = FieldValue::from("2024-03-01T10:15:30+02:00");
        assert_eq!(format_date_in(Some(&value), &Utc), "2024-03-01 08:15:30");
    }

    #[test]
    fn dates_accept_epoch_millis() {
        let value: FieldValue = serde_json::from_value(json!(1_700_000_000_000i64)).expect("number");
        assert_eq!(format_date_in(Some(&value), &Utc), "2023-11-14 22:13:20");
    }

    #[test]
    fn dates_fall_back_to_raw_or_placeholder() {
        let value = FieldValue::from("last tuesday");
        assert_eq!(format_date(Some(&value)), "last tuesday");
        assert_eq!(format_date(None), NOT_SPECIFIED);
        assert_eq!(format_date(Some(&FieldValue::from(""))), NOT_SPECIFIED);
    }
}
