//! Column type protocol
//!
//! The five supported column kinds and their validate/coerce, present, and
//! mask behavior. Everything dispatches over the `ColumnType` discriminant;
//! type-specific payloads (select options, the phone dial pool) are passed
//! in explicitly so the protocol stays independent of the storage layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::CellError;
use crate::permissions::Role;

/// Stored date format (ISO `yyyy-MM-dd`)
pub const DATE_STORAGE_FORMAT: &str = "%Y-%m-%d";

/// Accepted input formats, tried in order
const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Display format for date presentation
const DATE_DISPLAY_FORMAT: &str = "%d %b %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Date,
    Select,
    Phone,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Select => "select",
            ColumnType::Phone => "phone",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(ColumnType::Text),
            "number" => Some(ColumnType::Number),
            "date" => Some(ColumnType::Date),
            "select" => Some(ColumnType::Select),
            "phone" => Some(ColumnType::Phone),
            _ => None,
        }
    }
}

/// One entry of a Select column's option set. `value` is the stored token,
/// `label` what viewers see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Validate and coerce a raw cell value against its column definition.
///
/// `options` is consulted for Select columns, `pool` for Phone columns.
/// Null always passes through: a null write clears the cell, and required
/// fields are enforced at row level, not here.
pub fn validate_cell(
    column_type: ColumnType,
    options: &[SelectOption],
    pool: &[String],
    raw: &Value,
) -> Result<Value, CellError> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    match column_type {
        ColumnType::Text => match raw {
            Value::String(s) => Ok(Value::String(s.trim().to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            other => Err(CellError::NotAString(other.to_string())),
        },
        ColumnType::Number => match raw {
            Value::Number(n) => Ok(Value::Number(n.clone())),
            Value::String(s) => parse_number(s.trim()),
            other => Err(CellError::InvalidNumber(other.to_string())),
        },
        ColumnType::Date => match raw {
            Value::String(s) => parse_date(s.trim())
                .map(|d| Value::String(d.format(DATE_STORAGE_FORMAT).to_string()))
                .ok_or_else(|| CellError::InvalidDate(s.trim().to_string())),
            other => Err(CellError::InvalidDate(other.to_string())),
        },
        ColumnType::Select => match raw {
            Value::String(s) if options.iter().any(|o| o.value == *s) => {
                Ok(Value::String(s.clone()))
            }
            other => Err(CellError::InvalidOption(json_display(other))),
        },
        ColumnType::Phone => match raw {
            Value::String(s) if pool.iter().any(|p| p == s) => Ok(Value::String(s.clone())),
            Value::String(s) => Err(CellError::NotInPool(s.clone())),
            other => Err(CellError::NotAString(other.to_string())),
        },
    }
}

/// Format a stored cell value for a viewer.
///
/// Values already committed on rows are presented even if they no longer
/// validate (e.g. a phone number later removed from the pool under a type
/// change, or a select value whose option was edited away).
pub fn present_cell(
    column_type: ColumnType,
    options: &[SelectOption],
    viewer_role: Role,
    value: &Value,
) -> Value {
    if value.is_null() {
        return Value::Null;
    }

    match column_type {
        ColumnType::Text | ColumnType::Number => value.clone(),
        ColumnType::Date => match value.as_str().and_then(parse_date) {
            Some(d) => Value::String(d.format(DATE_DISPLAY_FORMAT).to_string()),
            None => value.clone(),
        },
        ColumnType::Select => match value
            .as_str()
            .and_then(|v| options.iter().find(|o| o.value == v))
        {
            Some(option) => json!(option),
            // Option no longer configured: fall back to the raw token
            None => value.clone(),
        },
        ColumnType::Phone => match value.as_str() {
            Some(s) if viewer_role.sees_full_phone() => Value::String(s.to_string()),
            Some(s) => Value::String(mask_phone(s)),
            None => value.clone(),
        },
    }
}

/// Mask a phone number for non-privileged viewers: the first 5 and last 1
/// characters stay visible, everything between is starred (`99450******3`).
/// Values too short to carry a masked middle are starred entirely.
pub fn mask_phone(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..5].iter().collect();
    let tail = chars[chars.len() - 1];
    format!("{}{}{}", head, "*".repeat(chars.len() - 6), tail)
}

fn parse_number(s: &str) -> Result<Value, CellError> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(Value::Number(i.into()));
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| CellError::InvalidNumber(s.to_string())),
        _ => Err(CellError::InvalidNumber(s.to_string())),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn json_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption {
                value: "ok".to_string(),
                label: "OK".to_string(),
                color: Some("#51cf66".to_string()),
            },
            SelectOption {
                value: "no".to_string(),
                label: "Not OK".to_string(),
                color: None,
            },
        ]
    }

    #[test]
    fn test_text_is_trimmed() {
        let v = validate_cell(ColumnType::Text, &[], &[], &json!("  hello  ")).unwrap();
        assert_eq!(v, json!("hello"));
    }

    #[test]
    fn test_number_accepts_numeric_string() {
        let v = validate_cell(ColumnType::Number, &[], &[], &json!("42")).unwrap();
        assert_eq!(v, json!(42));

        let v = validate_cell(ColumnType::Number, &[], &[], &json!("3.5")).unwrap();
        assert_eq!(v, json!(3.5));
    }

    #[test]
    fn test_number_rejects_non_finite() {
        assert!(validate_cell(ColumnType::Number, &[], &[], &json!("NaN")).is_err());
        assert!(validate_cell(ColumnType::Number, &[], &[], &json!("inf")).is_err());
        assert!(validate_cell(ColumnType::Number, &[], &[], &json!("forty")).is_err());
    }

    #[test]
    fn test_date_normalizes_to_iso() {
        let v = validate_cell(ColumnType::Date, &[], &[], &json!("2026-02-28")).unwrap();
        assert_eq!(v, json!("2026-02-28"));

        let v = validate_cell(ColumnType::Date, &[], &[], &json!("28/02/2026")).unwrap();
        assert_eq!(v, json!("2026-02-28"));

        assert!(validate_cell(ColumnType::Date, &[], &[], &json!("2026-02-30")).is_err());
    }

    #[test]
    fn test_select_requires_configured_option() {
        let opts = options();
        let v = validate_cell(ColumnType::Select, &opts, &[], &json!("ok")).unwrap();
        assert_eq!(v, json!("ok"));

        let err = validate_cell(ColumnType::Select, &opts, &[], &json!("maybe")).unwrap_err();
        assert_eq!(err, CellError::InvalidOption("maybe".to_string()));
    }

    #[test]
    fn test_phone_write_requires_pool_membership() {
        let pool = vec!["994500001123".to_string()];
        let v = validate_cell(ColumnType::Phone, &[], &pool, &json!("994500001123")).unwrap();
        assert_eq!(v, json!("994500001123"));

        let err = validate_cell(ColumnType::Phone, &[], &pool, &json!("994500009999")).unwrap_err();
        assert_eq!(err, CellError::NotInPool("994500009999".to_string()));
    }

    #[test]
    fn test_null_clears_any_type() {
        for t in [
            ColumnType::Text,
            ColumnType::Number,
            ColumnType::Date,
            ColumnType::Select,
            ColumnType::Phone,
        ] {
            assert_eq!(validate_cell(t, &[], &[], &Value::Null).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_mask_phone_shape() {
        assert_eq!(mask_phone("994500001123"), "99450******3");
        assert_eq!(mask_phone("1234567"), "12345*7");
        assert_eq!(mask_phone("123456"), "******");
        assert_eq!(mask_phone(""), "");
    }

    #[test]
    fn test_present_phone_masks_for_agents_only() {
        let value = json!("994500001123");
        let full = present_cell(ColumnType::Phone, &[], Role::Supervisor, &value);
        assert_eq!(full, json!("994500001123"));

        let masked = present_cell(ColumnType::Phone, &[], Role::Agent, &value);
        assert_eq!(masked, json!("99450******3"));

        let masked = present_cell(ColumnType::Phone, &[], Role::Partner, &value);
        assert_eq!(masked, json!("99450******3"));
    }

    #[test]
    fn test_present_select_resolves_label() {
        let opts = options();
        let shown = present_cell(ColumnType::Select, &opts, Role::Agent, &json!("ok"));
        assert_eq!(shown["label"], "OK");
        assert_eq!(shown["value"], "ok");
        assert_eq!(shown["color"], "#51cf66");

        // color is omitted when unset
        let shown = present_cell(ColumnType::Select, &opts, Role::Agent, &json!("no"));
        assert_eq!(shown.get("color"), None);
    }

    #[test]
    fn test_present_date_formats_for_display() {
        let shown = present_cell(ColumnType::Date, &[], Role::Agent, &json!("2026-02-28"));
        assert_eq!(shown, json!("28 Feb 2026"));
    }

    #[test]
    fn test_column_type_round_trip() {
        for t in ["text", "number", "date", "select", "phone"] {
            assert_eq!(ColumnType::parse(t).unwrap().as_str(), t);
        }
        assert!(ColumnType::parse("formula").is_none());
    }
}
