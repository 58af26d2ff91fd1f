//! Field formatter: projects a raw API record onto form-shaped values.
//!
//! Every declared field is present in the output. A field takes the record's value
//! when that value is truthy, otherwise the field's declared default. Numbers in
//! text-shaped fields (ids, phone numbers) become display strings so select and text
//! inputs can bind to them directly. Formatting never fails.

use serde_json::Value;

use crate::config::DefaultsConfig;
use crate::models::{RecordTab, Values};
use crate::schemas::{fields, FieldDefault, FieldSpec};

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn default_value(default: FieldDefault, defaults: &DefaultsConfig) -> Value {
    match default {
        FieldDefault::Empty => Value::String(String::new()),
        FieldDefault::Zero => Value::from(0),
        FieldDefault::Country => Value::String(defaults.country.clone()),
        FieldDefault::Nationality => Value::String(defaults.nationality.clone()),
    }
}

fn coerce(spec: &FieldSpec, value: &Value) -> Value {
    match (spec.default, value) {
        (FieldDefault::Zero, _) => value.clone(),
        (_, Value::Number(n)) => Value::String(n.to_string()),
        _ => value.clone(),
    }
}

/// Format `raw` against a field table.
pub fn format_values(specs: &[FieldSpec], raw: &Value, defaults: &DefaultsConfig) -> Values {
    specs
        .iter()
        .map(|spec| {
            let value = match raw.get(spec.name) {
                Some(v) if is_truthy(v) => coerce(spec, v),
                _ => default_value(spec.default, defaults),
            };
            (spec.name.to_string(), value)
        })
        .collect()
}

pub fn format_record(tab: RecordTab, raw: &Value, defaults: &DefaultsConfig) -> Values {
    format_values(fields(tab), raw, defaults)
}

pub fn format_basic_info(raw: &Value) -> Values {
    format_record(RecordTab::Basic, raw, &DefaultsConfig::default())
}

pub fn format_address_info(raw: &Value) -> Values {
    format_record(RecordTab::Address, raw, &DefaultsConfig::default())
}

pub fn format_personal_info(raw: &Value) -> Values {
    format_record(RecordTab::Personal, raw, &DefaultsConfig::default())
}

pub fn format_salary_info(raw: &Value) -> Values {
    format_record(RecordTab::Salary, raw, &DefaultsConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_defaults() {
        let formatted = format_address_info(&json!({"street": "X", "city": "Y"}));
        assert_eq!(
            Value::Object(formatted),
            json!({
                "street": "X",
                "city": "Y",
                "state": "",
                "zip_code": "",
                "country": "India",
                "permanent_address": ""
            })
        );
    }

    #[test]
    fn test_falsy_values_fall_back() {
        let formatted = format_salary_info(&json!({
            "basic_salary": 0,
            "hra": 1200,
            "bank_name": "",
            "account_number": null
        }));
        assert_eq!(formatted["basic_salary"], json!(0));
        assert_eq!(formatted["hra"], json!(1200));
        assert_eq!(formatted["bank_name"], json!(""));
        assert_eq!(formatted["account_number"], json!(""));
    }

    #[test]
    fn test_ids_become_display_strings() {
        let formatted = format_basic_info(&json!({
            "firstName": "Jane",
            "departmentId": 3,
            "designationId": 12,
            "phone": 9876543210u64
        }));
        assert_eq!(formatted["departmentId"], json!("3"));
        assert_eq!(formatted["designationId"], json!("12"));
        assert_eq!(formatted["phone"], json!("9876543210"));
        assert_eq!(formatted["lastName"], json!(""));
    }

    #[test]
    fn test_non_object_input_yields_defaults() {
        for raw in [Value::Null, json!("garbage"), json!([1, 2])] {
            let formatted = format_personal_info(&raw);
            assert_eq!(formatted["nationality"], json!("Indian"));
            assert_eq!(formatted["gender"], json!(""));
        }
    }

    #[test]
    fn test_configured_defaults() {
        let defaults = DefaultsConfig {
            country: "Nepal".to_string(),
            nationality: "Nepali".to_string(),
        };
        let formatted = format_record(RecordTab::Address, &json!({}), &defaults);
        assert_eq!(formatted["country"], json!("Nepal"));
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let formatted = format_address_info(&json!({"street": "X", "created_at": "2024-01-01"}));
        assert!(!formatted.contains_key("created_at"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(-1)));
    }
}
