//! URL layout of the HRMS REST API and the response envelope it wraps
//! payloads in.
//!
//! | Resource | Method | Path |
//! |----------|--------|------|
//! | basic record | `GET` / `PUT` | `/employees/{id}` |
//! | address, personal, salary | `GET` / `PUT` | `/employees/{id}/{address,personal-info,salary}` |
//! | documents | `GET` / `POST` | `/employees/{id}/documents` |
//! | one document | `DELETE` | `/employees/{id}/documents/{document_id}` |
//! | leave balances | `GET` / `PUT` | `/employees/{id}/leave-balances` |
//! | file upload | `POST` (multipart) | `/files/upload` |
//! | create employee | `POST` | `/employees` |
//! | lookups | `GET` | `/departments`, `/designations`, `/document-categories` |
//!
//! Successful responses look like `{"data": ..., "message": "..."}`; errors
//! carry at least `message`. Bare payloads without the envelope are accepted.

use serde::de::DeserializeOwned;
use serde_json::Value;
use store::{EmployeeId, RecordTab, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn employees(&self) -> String {
        format!("{}/employees", self.base)
    }

    pub fn employee(&self, employee_id: EmployeeId) -> String {
        format!("{}/employees/{employee_id}", self.base)
    }

    pub fn record(&self, employee_id: EmployeeId, tab: RecordTab) -> String {
        let employee = self.employee(employee_id);
        match tab {
            RecordTab::Basic => employee,
            RecordTab::Address => format!("{employee}/address"),
            RecordTab::Personal => format!("{employee}/personal-info"),
            RecordTab::Salary => format!("{employee}/salary"),
        }
    }

    pub fn documents(&self, employee_id: EmployeeId) -> String {
        format!("{}/documents", self.employee(employee_id))
    }

    pub fn document(&self, employee_id: EmployeeId, document_id: u64) -> String {
        format!("{}/{document_id}", self.documents(employee_id))
    }

    pub fn leave_balances(&self, employee_id: EmployeeId) -> String {
        format!("{}/leave-balances", self.employee(employee_id))
    }

    pub fn upload(&self) -> String {
        format!("{}/files/upload", self.base)
    }

    pub fn departments(&self) -> String {
        format!("{}/departments", self.base)
    }

    pub fn designations(&self) -> String {
        format!("{}/designations", self.base)
    }

    pub fn document_categories(&self) -> String {
        format!("{}/document-categories", self.base)
    }
}

/// Decode a success body, unwrapping `data` when present.
pub fn decode_data<T: DeserializeOwned>(body: &[u8]) -> Result<T, StoreError> {
    let value: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(body).map_err(|e| StoreError::Decode(e.to_string()))?
    };
    let data = match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or_default(),
        other => other,
    };
    serde_json::from_value(data).map_err(|e| StoreError::Decode(e.to_string()))
}

/// The `message` (or `error`) field of an error body, if it has one.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str())
        .map(str::to_string)
}

/// Turn an id the server may send as a number or a string into a string.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
