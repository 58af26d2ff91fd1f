//! # Domain models for the employee editor
//!
//! Plain data shared by every layer: the six editor tabs, the records the REST API
//! returns for them, and the reference data used to populate select fields. These
//! types are `Serialize + Deserialize` so the `api` crate can decode responses into
//! them directly and the `ui` crate can hold them in signals.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Tab`] | The closed set of editor tabs. Each maps to one remote resource. |
//! | [`RecordTab`] | The four tabs whose payload is a flat record of form values. |
//! | [`LeaveBalance`] | One leave-balance row plus the session-local `addon`/`subtract` deltas. |
//! | [`Document`] / [`PendingDocument`] | Uploaded documents and files picked locally but not yet uploaded. |
//! | [`ReferenceData`] | Departments, designations and document categories. |
//!
//! Form values are carried as a JSON object ([`Values`]) because the record tabs
//! send them to the server verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned employee identifier.
pub type EmployeeId = u64;

/// Form values keyed by field name.
pub type Values = serde_json::Map<String, Value>;

/// The editor tabs, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Basic,
    Address,
    Documents,
    Personal,
    Salary,
    Leave,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Basic,
        Tab::Address,
        Tab::Documents,
        Tab::Personal,
        Tab::Salary,
        Tab::Leave,
    ];

    /// Position in [`Tab::ALL`]; used to index per-tab arrays.
    pub fn index(self) -> usize {
        match self {
            Tab::Basic => 0,
            Tab::Address => 1,
            Tab::Documents => 2,
            Tab::Personal => 3,
            Tab::Salary => 4,
            Tab::Leave => 5,
        }
    }

    /// Human-readable tab title.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Basic => "Basic Information",
            Tab::Address => "Address",
            Tab::Documents => "Documents",
            Tab::Personal => "Personal Information",
            Tab::Salary => "Salary",
            Tab::Leave => "Leave",
        }
    }

    /// Lowercase identifier used in routes and query strings.
    pub fn slug(self) -> &'static str {
        match self {
            Tab::Basic => "basic",
            Tab::Address => "address",
            Tab::Documents => "documents",
            Tab::Personal => "personal",
            Tab::Salary => "salary",
            Tab::Leave => "leave",
        }
    }

    /// The record-shaped view of this tab, if it has one.
    pub fn as_record(self) -> Option<RecordTab> {
        match self {
            Tab::Basic => Some(RecordTab::Basic),
            Tab::Address => Some(RecordTab::Address),
            Tab::Personal => Some(RecordTab::Personal),
            Tab::Salary => Some(RecordTab::Salary),
            Tab::Documents | Tab::Leave => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown tab: {}", s))
    }
}

/// Tabs whose state is a flat record sent back verbatim on save.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordTab {
    Basic,
    Address,
    Personal,
    Salary,
}

impl RecordTab {
    pub const ALL: [RecordTab; 4] = [
        RecordTab::Basic,
        RecordTab::Address,
        RecordTab::Personal,
        RecordTab::Salary,
    ];

    pub fn tab(self) -> Tab {
        match self {
            RecordTab::Basic => Tab::Basic,
            RecordTab::Address => Tab::Address,
            RecordTab::Personal => Tab::Personal,
            RecordTab::Salary => Tab::Salary,
        }
    }
}

impl fmt::Display for RecordTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tab().fmt(f)
    }
}

/// Identity of a loaded record: which employee, and at which generation of the
/// employee's session it was fetched. A form reinitialises whenever this changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordIdentity {
    pub employee_id: EmployeeId,
    pub generation: u64,
}

/// A leave-balance row as returned by the API.
///
/// `addon` and `subtract` never come from the server; they are the pending
/// increments/decrements made in the current editing session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub id: u64,
    #[serde(alias = "leaveType")]
    pub leave_type: String,
    #[serde(default, alias = "totalCount")]
    pub total_count: f64,
    #[serde(default)]
    pub remaining: f64,
    #[serde(default)]
    pub used: f64,
    #[serde(default)]
    pub addon: u32,
    #[serde(default, alias = "subst")]
    pub subtract: u32,
}

impl LeaveBalance {
    pub fn new(id: u64, leave_type: &str, total_count: f64, remaining: f64, used: f64) -> Self {
        Self {
            id,
            leave_type: leave_type.to_string(),
            total_count,
            remaining,
            used,
            addon: 0,
            subtract: 0,
        }
    }

    /// Remaining balance once the pending deltas are applied.
    pub fn projected_remaining(&self) -> f64 {
        self.remaining + f64::from(self.addon) - f64::from(self.subtract)
    }

    pub fn has_delta(&self) -> bool {
        self.addon != 0 || self.subtract != 0
    }
}

/// A document already stored on the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    #[serde(alias = "document_category_id", alias = "categoryId")]
    pub category_id: u64,
    #[serde(default, alias = "fileName")]
    pub file_name: String,
    #[serde(default, alias = "fileUrl", alias = "url")]
    pub file_url: Option<String>,
}

/// File contents picked in the browser, not yet uploaded.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }
}

/// A document that exists only client-side until the documents tab is saved.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingDocument {
    /// Local key, unique within one editing session.
    pub key: u32,
    pub category_id: Option<u64>,
    pub file: PendingFile,
    pub preview_url: Option<String>,
}

/// One entry of the documents submit call, after the file is uploaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSubmission {
    pub document_category_id: u64,
    pub file_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designation {
    pub id: u64,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCategory {
    pub id: u64,
    pub r#type: String,
}

/// Lookup lists used to populate select fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub designations: Vec<Designation>,
    #[serde(default)]
    pub document_categories: Vec<DocumentCategory>,
}

impl ReferenceData {
    /// `(value, label)` pairs for the department select.
    pub fn department_options(&self) -> Vec<(String, String)> {
        self.departments
            .iter()
            .map(|d| (d.id.to_string(), d.name.clone()))
            .collect()
    }

    /// `(value, label)` pairs for the designation select.
    pub fn designation_options(&self) -> Vec<(String, String)> {
        self.designations
            .iter()
            .map(|d| (d.id.to_string(), d.title.clone()))
            .collect()
    }

    /// `(value, label)` pairs for the document category select.
    pub fn category_options(&self) -> Vec<(String, String)> {
        self.document_categories
            .iter()
            .map(|c| (c.id.to_string(), c.r#type.clone()))
            .collect()
    }

    pub fn category_name(&self, id: u64) -> Option<&str> {
        self.document_categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.r#type.as_str())
    }
}
