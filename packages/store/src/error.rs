//! Error types for the employee editor workflow.
//!
//! None of these are fatal: each one leaves the editor in a state the user can
//! retry from.

use thiserror::Error;

use crate::models::Tab;

/// Failure reported by a persistence collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("request failed with status {status}")]
    Http { status: u16, message: Option<String> },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not found")]
    NotFound,
    #[error("{0} is not supported by this store")]
    Unsupported(&'static str),
}

impl StoreError {
    /// The message the server sent back, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            StoreError::Http {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

/// A field failed one of its rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Loading a tab's data failed. The tab stays unloaded and shows defaults.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to load {tab} tab: {source}")]
pub struct FetchError {
    pub tab: Tab,
    #[source]
    pub source: StoreError,
}

/// Saving the active tab failed. Local edits are kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    #[error("Please fill all required fields")]
    Validation { tab: Tab },
    #[error("A save is already in progress")]
    InProgress,
    #[error("{} has not finished loading", .tab.label())]
    NotLoaded { tab: Tab },
    #[error("Failed to upload {file_name}")]
    Upload {
        file_name: String,
        #[source]
        source: StoreError,
    },
    #[error("{message}")]
    Persist { tab: Tab, message: String },
}

impl SaveError {
    /// Build a persist error from a store failure, preferring the server's text.
    pub fn persist(tab: Tab, source: &StoreError) -> Self {
        let message = source
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to update {}", tab.label()));
        SaveError::Persist { tab, message }
    }
}

/// Deleting an uploaded document failed; it stays in the list.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Failed to delete document {document_id}")]
pub struct DeleteError {
    pub document_id: u64,
    #[source]
    pub source: StoreError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_prefers_server_message() {
        let err = SaveError::persist(
            Tab::Salary,
            &StoreError::Http {
                status: 422,
                message: Some("Basic salary exceeds band".to_string()),
            },
        );
        assert_eq!(err.to_string(), "Basic salary exceeds band");
    }

    #[test]
    fn test_persist_falls_back_to_generic_message() {
        let blank = StoreError::Http {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(
            SaveError::persist(Tab::Address, &blank).to_string(),
            "Failed to update Address"
        );
        assert_eq!(
            SaveError::persist(Tab::Leave, &StoreError::Network("offline".into())).to_string(),
            "Failed to update Leave"
        );
    }

    #[test]
    fn test_validation_message() {
        assert_eq!(
            SaveError::Validation { tab: Tab::Basic }.to_string(),
            "Please fill all required fields"
        );
        assert_eq!(
            SaveError::NotLoaded { tab: Tab::Salary }.to_string(),
            "Salary has not finished loading"
        );
    }
}
