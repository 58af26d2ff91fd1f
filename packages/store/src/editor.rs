//! # Employee editor: per-tab form state for one employee
//!
//! [`EmployeeEditor`] owns one form object per tab and the [`TabSession`] that
//! decides when a tab's data must be fetched. Activation is split so a UI can
//! run the fetch without borrowing the editor across an `await`:
//!
//! 1. [`EmployeeEditor::begin_activation`] switches the active tab and hands out
//!    a [`FetchTicket`] when a fetch is needed.
//! 2. [`fetch_tab`] performs the fetch against an [`EmployeeStore`].
//! 3. [`EmployeeEditor::apply_fetch`] loads the result into the tab's form, or
//!    drops it if the ticket went stale in the meantime.
//!
//! [`EmployeeEditor::activate`] runs all three steps for callers that can hold
//! `&mut` across the fetch.
//!
//! Switching to another tab discards that tab's unsaved edits: a cached tab
//! comes back with its last loaded values and no errors. The tab being saved
//! is locked until the save finishes, so the `editable_*` accessors return
//! `None` for it.

use serde_json::Value;

use crate::config::{DefaultsConfig, HrmsConfig};
use crate::documents::DocumentsForm;
use crate::error::{DeleteError, FetchError, StoreError};
use crate::formatter::format_record;
use crate::leave::LeaveForm;
use crate::models::{Document, EmployeeId, LeaveBalance, RecordIdentity, RecordTab, Tab};
use crate::repo::EmployeeStore;
use crate::schemas::schema;
use crate::session::{Activation, FetchTicket, TabSession};
use crate::validation::{FormEngine, FormOptions};

/// The state object behind one tab. Saving asks the active tab to validate
/// itself through this trait.
pub trait TabForm {
    fn tab(&self) -> Tab;
    /// Run the tab's validation, updating its visible errors.
    fn validate(&mut self) -> bool;
    /// Drop unsaved edits and errors, keeping the last loaded data.
    fn reset(&mut self);
}

/// Form state of a flat-record tab (basic, address, personal, salary).
#[derive(Clone, Debug, PartialEq)]
pub struct RecordForm {
    tab: RecordTab,
    engine: FormEngine,
}

impl RecordForm {
    pub fn new(tab: RecordTab, options: FormOptions, defaults: &DefaultsConfig) -> Self {
        Self {
            tab,
            engine: FormEngine::new(schema(tab), options, format_record(tab, &Value::Null, defaults)),
        }
    }

    pub fn record_tab(&self) -> RecordTab {
        self.tab
    }

    pub fn engine(&self) -> &FormEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FormEngine {
        &mut self.engine
    }

    /// Format `raw` and reinitialise the form if `identity` is new.
    pub fn load(&mut self, identity: RecordIdentity, raw: &Value, defaults: &DefaultsConfig) -> bool {
        self.engine
            .reinitialize(identity, format_record(self.tab, raw, defaults))
    }
}

impl TabForm for RecordForm {
    fn tab(&self) -> Tab {
        self.tab.tab()
    }

    fn validate(&mut self) -> bool {
        self.engine.validate_form()
    }

    fn reset(&mut self) {
        self.engine.reset();
    }
}

impl TabForm for DocumentsForm {
    fn tab(&self) -> Tab {
        Tab::Documents
    }

    fn validate(&mut self) -> bool {
        DocumentsForm::validate(self)
    }

    fn reset(&mut self) {
        self.clear_pending();
    }
}

impl TabForm for LeaveForm {
    fn tab(&self) -> Tab {
        Tab::Leave
    }

    fn validate(&mut self) -> bool {
        LeaveForm::validate(self)
    }

    fn reset(&mut self) {
        LeaveForm::reset(self)
    }
}

/// Data returned by a tab fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum TabData {
    Record(Value),
    Documents(Vec<Document>),
    Leave(Vec<LeaveBalance>),
}

/// Fetch the data a ticket asks for.
pub async fn fetch_tab<S: EmployeeStore>(store: &S, ticket: &FetchTicket) -> Result<TabData, FetchError> {
    let employee_id = ticket.employee_id;
    let result = match (ticket.tab, ticket.tab.as_record()) {
        (_, Some(record)) => store
            .fetch_record(employee_id, record)
            .await
            .map(TabData::Record),
        (Tab::Documents, None) => store
            .fetch_documents(employee_id)
            .await
            .map(TabData::Documents),
        (_, None) => store
            .fetch_leave_balances(employee_id)
            .await
            .map(TabData::Leave),
    };
    result.map_err(|source| FetchError {
        tab: ticket.tab,
        source,
    })
}

/// Delete an uploaded document through the store.
pub async fn delete_document<S: EmployeeStore>(
    store: &S,
    employee_id: EmployeeId,
    document_id: u64,
) -> Result<(), DeleteError> {
    store
        .delete_document(document_id, employee_id)
        .await
        .map_err(|source| {
            tracing::warn!(employee_id, document_id, error = %source, "document delete failed");
            DeleteError {
                document_id,
                source,
            }
        })
}

/// Everything the edit screen holds for one employee.
#[derive(Clone, Debug, PartialEq)]
pub struct EmployeeEditor {
    pub(crate) session: TabSession,
    pub(crate) config: HrmsConfig,
    pub(crate) basic: RecordForm,
    pub(crate) address: RecordForm,
    pub(crate) personal: RecordForm,
    pub(crate) salary: RecordForm,
    pub(crate) documents: DocumentsForm,
    pub(crate) leave: LeaveForm,
    /// Tab whose save is in flight.
    pub(crate) saving: Option<Tab>,
}

impl EmployeeEditor {
    pub fn new(employee_id: EmployeeId, config: HrmsConfig) -> Self {
        let options = config.form.options();
        let record = |tab| RecordForm::new(tab, options, &config.defaults);
        Self {
            session: TabSession::new(employee_id, config.session.invalidation),
            basic: record(RecordTab::Basic),
            address: record(RecordTab::Address),
            personal: record(RecordTab::Personal),
            salary: record(RecordTab::Salary),
            documents: DocumentsForm::new(),
            leave: LeaveForm::new(),
            saving: None,
            config,
        }
    }

    /// Point the editor at `employee_id`. A different employee discards every
    /// tab's state; the same employee is a no-op.
    pub fn open(&mut self, employee_id: EmployeeId) -> bool {
        if self.session.employee_id() == employee_id {
            return false;
        }
        let epoch = self.session.epoch() + 1;
        *self = Self::new(employee_id, self.config.clone());
        self.session = TabSession::new(employee_id, self.config.session.invalidation).with_epoch(epoch);
        true
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.session.employee_id()
    }

    pub fn session(&self) -> &TabSession {
        &self.session
    }

    pub fn config(&self) -> &HrmsConfig {
        &self.config
    }

    pub fn active_tab(&self) -> Tab {
        self.session.active_tab()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    /// Whether `tab` is being saved and must not be edited.
    pub fn is_locked(&self, tab: Tab) -> bool {
        self.saving == Some(tab)
    }

    pub fn record(&self, tab: RecordTab) -> &RecordForm {
        match tab {
            RecordTab::Basic => &self.basic,
            RecordTab::Address => &self.address,
            RecordTab::Personal => &self.personal,
            RecordTab::Salary => &self.salary,
        }
    }

    pub fn record_mut(&mut self, tab: RecordTab) -> &mut RecordForm {
        match tab {
            RecordTab::Basic => &mut self.basic,
            RecordTab::Address => &mut self.address,
            RecordTab::Personal => &mut self.personal,
            RecordTab::Salary => &mut self.salary,
        }
    }

    pub fn documents(&self) -> &DocumentsForm {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentsForm {
        &mut self.documents
    }

    pub fn leave(&self) -> &LeaveForm {
        &self.leave
    }

    pub fn leave_mut(&mut self) -> &mut LeaveForm {
        &mut self.leave
    }

    /// The record form of `tab`, unless it is being saved.
    pub fn editable_record(&mut self, tab: RecordTab) -> Option<&mut RecordForm> {
        if self.is_locked(tab.tab()) {
            return None;
        }
        Some(self.record_mut(tab))
    }

    pub fn editable_documents(&mut self) -> Option<&mut DocumentsForm> {
        (!self.is_locked(Tab::Documents)).then_some(&mut self.documents)
    }

    pub fn editable_leave(&mut self) -> Option<&mut LeaveForm> {
        (!self.is_locked(Tab::Leave)).then_some(&mut self.leave)
    }

    /// The state object of `tab`.
    pub fn form_mut(&mut self, tab: Tab) -> &mut dyn TabForm {
        match tab {
            Tab::Basic => &mut self.basic,
            Tab::Address => &mut self.address,
            Tab::Personal => &mut self.personal,
            Tab::Salary => &mut self.salary,
            Tab::Documents => &mut self.documents,
            Tab::Leave => &mut self.leave,
        }
    }

    /// "First Last" from the basic tab, if either part is known.
    pub fn employee_name(&self) -> Option<String> {
        let engine = self.basic.engine();
        let name = format!("{} {}", engine.text("firstName").trim(), engine.text("lastName").trim());
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Make `tab` active. Returns a ticket when its data must be fetched.
    ///
    /// Coming from another tab resets `tab`'s form to its last loaded state,
    /// unless a save of `tab` is still in flight.
    pub fn begin_activation(&mut self, tab: Tab) -> Option<FetchTicket> {
        if tab != self.active_tab() && !self.is_locked(tab) {
            self.form_mut(tab).reset();
        }
        match self.session.activate(tab) {
            Activation::Fetch(ticket) => Some(ticket),
            Activation::Pending | Activation::Cached => None,
        }
    }

    /// Load a finished fetch into its tab. Returns whether the data was used.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: Result<TabData, FetchError>) -> bool {
        let data = match result {
            Ok(data) => data,
            Err(error) => {
                self.session.fail(&ticket, &error);
                return false;
            }
        };
        if !self.session.complete(&ticket) {
            tracing::debug!(
                employee_id = ticket.employee_id,
                tab = %ticket.tab,
                "discarding stale fetch"
            );
            return false;
        }
        match (ticket.tab.as_record(), data) {
            (Some(tab), TabData::Record(raw)) => {
                let defaults = self.config.defaults.clone();
                self.record_mut(tab).load(ticket.identity(), &raw, &defaults);
            }
            (None, TabData::Documents(documents)) if ticket.tab == Tab::Documents => {
                self.documents.load(documents);
            }
            (None, TabData::Leave(rows)) if ticket.tab == Tab::Leave => {
                self.leave.load(rows);
            }
            (_, other) => {
                let error = FetchError {
                    tab: ticket.tab,
                    source: StoreError::Decode(format!("unexpected data for {}: {other:?}", ticket.tab)),
                };
                self.session.fail(&ticket, &error);
                return false;
            }
        }
        true
    }

    /// Activate `tab`, fetching its data if needed.
    pub async fn activate<S: EmployeeStore>(&mut self, store: &S, tab: Tab) -> bool {
        let Some(ticket) = self.begin_activation(tab) else {
            return false;
        };
        let result = fetch_tab(store, &ticket).await;
        self.apply_fetch(ticket, result)
    }

    /// Delete an uploaded document. On failure it stays listed.
    pub async fn delete_document<S: EmployeeStore>(
        &mut self,
        store: &S,
        document_id: u64,
    ) -> Result<(), DeleteError> {
        delete_document(store, self.employee_id(), document_id).await?;
        self.documents.remove_uploaded(document_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryStore, StoreOp};
    use crate::models::PendingFile;
    use crate::session::LoadState;
    use serde_json::json;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_employee(
            1,
            json!({"firstName": "Asha", "lastName": "Rao", "email": "asha@example.com", "departmentId": 3}),
        );
        store.add_employee(2, json!({"firstName": "Ben", "lastName": "Das"}));
        store.set_record(1, RecordTab::Address, json!({"street": "MG Road", "city": "Pune"}));
        store
    }

    #[tokio::test]
    async fn test_loaded_tab_fetches_once() {
        let store = store();
        let mut editor = EmployeeEditor::new(1, HrmsConfig::default());
        assert!(editor.activate(&store, Tab::Basic).await);
        assert!(!editor.activate(&store, Tab::Basic).await);
        editor.activate(&store, Tab::Address).await;
        editor.activate(&store, Tab::Basic).await;
        assert_eq!(store.count(StoreOp::FetchRecord(RecordTab::Basic)), 1);
        assert_eq!(store.count(StoreOp::FetchRecord(RecordTab::Address)), 1);
        assert_eq!(editor.record(RecordTab::Basic).engine().text("departmentId"), "3");
        assert_eq!(editor.record(RecordTab::Address).engine().text("country"), "India");
    }

    #[tokio::test]
    async fn test_switching_employee_discards_previous_values() {
        let store = store();
        let mut editor = EmployeeEditor::new(1, HrmsConfig::default());
        editor.activate(&store, Tab::Basic).await;
        editor.activate(&store, Tab::Address).await;
        editor
            .record_mut(RecordTab::Basic)
            .engine_mut()
            .handle_change("email", json!("edited@example.com"));

        assert!(editor.open(2));
        assert!(!editor.open(2));
        assert_eq!(editor.record(RecordTab::Address).engine().text("street"), "");
        editor.activate(&store, Tab::Basic).await;
        let basic = editor.record(RecordTab::Basic).engine();
        assert_eq!(basic.text("firstName"), "Ben");
        assert_eq!(basic.text("email"), "");
        assert_eq!(basic.text("departmentId"), "");
        assert_eq!(editor.employee_name().as_deref(), Some("Ben Das"));
    }

    #[tokio::test]
    async fn test_fetch_for_previous_employee_is_discarded() {
        let store = store();
        let mut editor = EmployeeEditor::new(1, HrmsConfig::default());
        let ticket = editor.begin_activation(Tab::Basic).unwrap();
        let late = fetch_tab(&store, &ticket).await;
        editor.open(2);
        assert!(!editor.apply_fetch(ticket, late));
        assert_eq!(editor.record(RecordTab::Basic).engine().text("firstName"), "");
    }

    #[tokio::test]
    async fn test_late_fetch_from_earlier_visit_is_discarded() {
        let store = store();
        let mut editor = EmployeeEditor::new(1, HrmsConfig::default());
        let late = editor.begin_activation(Tab::Basic).unwrap();
        editor.open(2);
        editor.open(1);
        let current = editor.begin_activation(Tab::Basic).unwrap();
        assert_eq!(late.generation, current.generation);

        let stale = json!({"firstName": "Old", "lastName": "Name"});
        assert!(!editor.apply_fetch(late, Ok(TabData::Record(stale))));
        assert!(editor.session().is_loading(Tab::Basic));
        let result = fetch_tab(&store, &current).await;
        assert!(editor.apply_fetch(current, result));
        assert_eq!(editor.record(RecordTab::Basic).engine().text("firstName"), "Asha");
    }

    #[tokio::test]
    async fn test_switching_tabs_discards_unsaved_edits() {
        let store = store();
        let mut editor = EmployeeEditor::new(1, HrmsConfig::default());
        editor.activate(&store, Tab::Basic).await;
        editor
            .record_mut(RecordTab::Basic)
            .engine_mut()
            .handle_change("firstName", json!(""));
        assert!(!editor.form_mut(Tab::Basic).validate());

        editor.activate(&store, Tab::Address).await;
        assert!(!editor.activate(&store, Tab::Basic).await);
        let basic = editor.record(RecordTab::Basic).engine();
        assert_eq!(basic.text("firstName"), "Asha");
        assert!(basic.errors().is_empty());
        assert!(basic.touched().is_empty());
        assert_eq!(store.count(StoreOp::FetchRecord(RecordTab::Basic)), 1);
    }

    #[tokio::test]
    async fn test_reactivating_same_tab_keeps_edits() {
        let store = store();
        let mut editor = EmployeeEditor::new(1, HrmsConfig::default());
        editor.activate(&store, Tab::Documents).await;
        editor
            .documents_mut()
            .add_pending(Some(1), PendingFile::new("pan.pdf", "application/pdf", vec![1]), None);
        editor.activate(&store, Tab::Documents).await;
        assert_eq!(editor.documents().pending().len(), 1);

        editor.activate(&store, Tab::Leave).await;
        editor.activate(&store, Tab::Documents).await;
        assert!(editor.documents().pending().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_defaults() {
        let store = store();
        store.fail_next(
            StoreOp::FetchRecord(RecordTab::Address),
            StoreError::Network("timeout".to_string()),
        );
        let mut editor = EmployeeEditor::new(1, HrmsConfig::default());
        assert!(!editor.activate(&store, Tab::Address).await);
        assert_eq!(editor.session().state(Tab::Address), LoadState::NotLoaded);
        assert_eq!(editor.record(RecordTab::Address).engine().text("country"), "India");
        assert!(editor.activate(&store, Tab::Address).await);
        assert_eq!(editor.record(RecordTab::Address).engine().text("city"), "Pune");
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_document() {
        let store = store();
        store.set_documents(
            1,
            vec![Document {
                id: 10,
                category_id: 1,
                file_name: "pan.pdf".to_string(),
                file_url: None,
            }],
        );
        let mut editor = EmployeeEditor::new(1, HrmsConfig::default());
        editor.activate(&store, Tab::Documents).await;
        store.fail_next(StoreOp::DeleteDocument, StoreError::Network("offline".to_string()));
        let err = editor.delete_document(&store, 10).await.unwrap_err();
        assert_eq!(err.document_id, 10);
        assert_eq!(editor.documents().uploaded().len(), 1);

        editor.delete_document(&store, 10).await.unwrap();
        assert!(editor.documents().uploaded().is_empty());
        assert!(store.documents(1).is_empty());
    }

    #[test]
    fn test_form_dispatch_by_tab() {
        let mut editor = EmployeeEditor::new(1, HrmsConfig::default());
        for tab in Tab::ALL {
            assert_eq!(editor.form_mut(tab).tab(), tab);
        }
        assert_eq!(editor.employee_name(), None);
    }
}
