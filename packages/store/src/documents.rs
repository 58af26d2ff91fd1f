//! Editing state of the documents tab: uploaded documents from the server plus
//! files picked locally that only exist client-side until the tab is saved.

use std::collections::BTreeMap;

use crate::models::{Document, PendingDocument, PendingFile};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentsForm {
    uploaded: Vec<Document>,
    pending: Vec<PendingDocument>,
    next_key: u32,
    errors: BTreeMap<u32, String>,
    error: Option<String>,
}

impl DocumentsForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the uploaded list. Pending documents are local edits and survive.
    pub fn load(&mut self, documents: Vec<Document>) {
        self.uploaded = documents;
    }

    pub fn uploaded(&self) -> &[Document] {
        &self.uploaded
    }

    pub fn pending(&self) -> &[PendingDocument] {
        &self.pending
    }

    /// Tab-level error, e.g. nothing to save.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending_error(&self, key: u32) -> Option<&str> {
        self.errors.get(&key).map(String::as_str)
    }

    /// Queue a picked file. Returns its local key.
    pub fn add_pending(
        &mut self,
        category_id: Option<u64>,
        file: PendingFile,
        preview_url: Option<String>,
    ) -> u32 {
        self.next_key += 1;
        let key = self.next_key;
        self.pending.push(PendingDocument {
            key,
            category_id,
            file,
            preview_url,
        });
        self.error = None;
        key
    }

    pub fn set_pending_category(&mut self, key: u32, category_id: Option<u64>) -> bool {
        match self.pending.iter_mut().find(|d| d.key == key) {
            Some(doc) => {
                doc.category_id = category_id;
                if category_id.is_some() {
                    self.errors.remove(&key);
                }
                true
            }
            None => false,
        }
    }

    pub fn remove_pending(&mut self, key: u32) -> Option<PendingDocument> {
        let index = self.pending.iter().position(|d| d.key == key)?;
        self.errors.remove(&key);
        Some(self.pending.remove(index))
    }

    /// Drop an uploaded document after the server confirmed its deletion.
    pub fn remove_uploaded(&mut self, document_id: u64) -> Option<Document> {
        let index = self.uploaded.iter().position(|d| d.id == document_id)?;
        Some(self.uploaded.remove(index))
    }

    /// Forget pending documents once they have been submitted.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
        self.errors.clear();
        self.error = None;
    }

    /// At least one pending document, each with a category.
    pub fn validate(&mut self) -> bool {
        self.errors = self
            .pending
            .iter()
            .filter(|d| d.category_id.is_none())
            .map(|d| (d.key, "Document category is required".to_string()))
            .collect();
        self.error = self
            .pending
            .is_empty()
            .then(|| "Please add at least one document".to_string());
        self.errors.is_empty() && self.error.is_none()
    }
}
