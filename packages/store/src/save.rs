//! # Save orchestrator
//!
//! Saving only ever concerns the active tab. The flow is split in three so a UI
//! can release its borrow of the editor while requests are in flight:
//!
//! | Step | Where | What happens |
//! |------|-------|--------------|
//! | [`EmployeeEditor::prepare_save`] | sync | Refuse a second save, require the tab to be loaded, validate it, build a [`SavePlan`]. |
//! | [`execute_plan`] | async | Exactly one persistence call for the tab. Documents upload every file first and abort on the first failure. |
//! | [`EmployeeEditor::finish_save`] | sync | On success bump the generation and drop submitted edits; on failure keep every edit. |
//!
//! Between the first and last step the saved tab is locked (see
//! [`EmployeeEditor::is_locked`]), so nothing edited there can be lost to the
//! post-save reload. [`EmployeeEditor::save`] chains the three and reloads the
//! saved tab.

use crate::editor::EmployeeEditor;
use crate::error::SaveError;
use crate::leave::LeaveDelta;
use crate::models::{DocumentSubmission, EmployeeId, PendingFile, RecordTab, Tab, Values};
use crate::repo::EmployeeStore;
use crate::session::LoadState;

/// A pending document ready to upload; its category has been validated.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentUpload {
    pub key: u32,
    pub category_id: u64,
    pub file: PendingFile,
}

/// What gets sent for the saved tab.
#[derive(Clone, Debug, PartialEq)]
pub enum SavePayload {
    /// Form values sent verbatim.
    Record { tab: RecordTab, values: Values },
    Documents(Vec<DocumentUpload>),
    Leave(Vec<LeaveDelta>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SavePlan {
    pub employee_id: EmployeeId,
    pub tab: Tab,
    pub payload: SavePayload,
    pub employee_name: Option<String>,
}

/// A successful save, ready to show as a notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveReport {
    pub employee_id: EmployeeId,
    pub tab: Tab,
    pub message: String,
}

impl SaveReport {
    fn new(plan: &SavePlan) -> Self {
        let who = plan
            .employee_name
            .clone()
            .unwrap_or_else(|| format!("employee #{}", plan.employee_id));
        Self {
            employee_id: plan.employee_id,
            tab: plan.tab,
            message: format!("{} updated for {}", plan.tab.label(), who),
        }
    }
}

impl EmployeeEditor {
    /// Validate the active tab and build its save plan. Marks a save as in
    /// flight until [`finish_save`](Self::finish_save) is called.
    pub fn prepare_save(&mut self) -> Result<SavePlan, SaveError> {
        if self.saving.is_some() {
            return Err(SaveError::InProgress);
        }
        let tab = self.session.active_tab();
        let loaded = matches!(self.session.state(tab), LoadState::Loaded { .. });
        if tab != Tab::Documents && !loaded {
            return Err(SaveError::NotLoaded { tab });
        }
        if !self.form_mut(tab).validate() {
            tracing::debug!(employee_id = self.employee_id(), tab = %tab, "save blocked by validation");
            return Err(SaveError::Validation { tab });
        }

        let payload = match tab.as_record() {
            Some(record) => SavePayload::Record {
                tab: record,
                values: self.record(record).engine().values().clone(),
            },
            None if tab == Tab::Documents => SavePayload::Documents(
                self.documents
                    .pending()
                    .iter()
                    .filter_map(|doc| {
                        Some(DocumentUpload {
                            key: doc.key,
                            category_id: doc.category_id?,
                            file: doc.file.clone(),
                        })
                    })
                    .collect(),
            ),
            None => SavePayload::Leave(self.leave.payload()),
        };

        self.saving = Some(tab);
        Ok(SavePlan {
            employee_id: self.employee_id(),
            tab,
            payload,
            employee_name: self.employee_name(),
        })
    }

    /// Apply the outcome of [`execute_plan`]. Clears the in-flight flag either way.
    pub fn finish_save(
        &mut self,
        plan: &SavePlan,
        outcome: Result<(), SaveError>,
    ) -> Result<SaveReport, SaveError> {
        self.saving = None;
        if let Err(error) = outcome {
            tracing::warn!(employee_id = plan.employee_id, tab = %plan.tab, error = %error, "save failed");
            return Err(error);
        }
        let report = SaveReport::new(plan);
        tracing::info!(employee_id = plan.employee_id, tab = %plan.tab, "{}", report.message);
        if plan.employee_id != self.employee_id() {
            return Ok(report);
        }

        self.session.invalidate_after_save(plan.tab);
        match &plan.payload {
            SavePayload::Record { .. } => {}
            SavePayload::Documents(uploads) => {
                for upload in uploads {
                    self.documents.remove_pending(upload.key);
                }
            }
            SavePayload::Leave(_) => self.leave.clear_deltas(),
        }
        Ok(report)
    }

    /// Whether the tab saved by `plan` is still on screen and should be
    /// reloaded. A tab the user has since left is refetched when revisited.
    pub fn should_reload(&self, plan: &SavePlan) -> bool {
        plan.employee_id == self.employee_id() && plan.tab == self.active_tab()
    }

    /// Validate, persist and reload the active tab.
    pub async fn save<S: EmployeeStore>(&mut self, store: &S) -> Result<SaveReport, SaveError> {
        let plan = self.prepare_save()?;
        let outcome = execute_plan(store, &plan).await;
        let report = self.finish_save(&plan, outcome)?;
        if self.should_reload(&plan) {
            self.activate(store, plan.tab).await;
        }
        Ok(report)
    }
}

/// Send a save plan to the store.
pub async fn execute_plan<S: EmployeeStore>(store: &S, plan: &SavePlan) -> Result<(), SaveError> {
    let employee_id = plan.employee_id;
    tracing::debug!(employee_id, tab = %plan.tab, "saving tab");
    let result = match &plan.payload {
        SavePayload::Record { tab, values } => store.update_record(employee_id, *tab, values).await,
        SavePayload::Documents(uploads) => {
            let mut submissions = Vec::with_capacity(uploads.len());
            for upload in uploads {
                let file_id = store.upload_file(&upload.file).await.map_err(|source| {
                    tracing::warn!(employee_id, file = %upload.file.name, error = %source, "upload failed");
                    SaveError::Upload {
                        file_name: upload.file.name.clone(),
                        source,
                    }
                })?;
                submissions.push(DocumentSubmission {
                    document_category_id: upload.category_id,
                    file_id,
                });
            }
            store.submit_documents(employee_id, &submissions).await
        }
        SavePayload::Leave(deltas) => store.update_leave_balances(employee_id, deltas).await,
    };
    result.map_err(|source| SaveError::persist(plan.tab, &source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HrmsConfig;
    use crate::error::StoreError;
    use crate::memory::{MemoryStore, StoreOp};
    use crate::models::LeaveBalance;
    use crate::session::InvalidationPolicy;
    use serde_json::json;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_employee(
            7,
            json!({
                "firstName": "John",
                "lastName": "Doe",
                "email": "john@example.com",
                "phone": "9999999999",
                "departmentId": 1,
                "designationId": 2,
                "dateOfJoining": "2024-01-15"
            }),
        );
        store.set_leave_balances(
            7,
            vec![
                LeaveBalance::new(1, "Sick Leave", 12.0, 10.0, 2.0),
                LeaveBalance::new(2, "Casual Leave", 8.0, 8.0, 0.0),
            ],
        );
        store
    }

    async fn editor_on(store: &MemoryStore, tab: Tab) -> EmployeeEditor {
        let mut editor = EmployeeEditor::new(7, HrmsConfig::default());
        editor.activate(store, Tab::Basic).await;
        editor.activate(store, tab).await;
        editor
    }

    #[tokio::test]
    async fn test_missing_required_field_makes_no_calls() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Basic).await;
        editor
            .record_mut(RecordTab::Basic)
            .engine_mut()
            .handle_change("firstName", json!(""));
        store.clear_calls();

        let err = editor.save(&store).await.unwrap_err();
        assert_eq!(err, SaveError::Validation { tab: Tab::Basic });
        assert_eq!(err.to_string(), "Please fill all required fields");
        assert_eq!(store.write_count(), 0);
        assert!(!editor.is_saving());
        assert_eq!(
            editor.record(RecordTab::Basic).engine().visible_error("firstName"),
            Some("First name is required")
        );
    }

    #[tokio::test]
    async fn test_only_active_tab_is_validated() {
        let store = store();
        // Address is never loaded and would fail validation; basic is valid.
        let mut editor = editor_on(&store, Tab::Basic).await;
        let report = editor.save(&store).await.unwrap();
        assert_eq!(report.message, "Basic Information updated for John Doe");
        assert_eq!(store.count(StoreOp::UpdateRecord(RecordTab::Basic)), 1);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_record_save_sends_values_and_reloads() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Basic).await;
        editor
            .record_mut(RecordTab::Basic)
            .engine_mut()
            .handle_change("lastName", json!("Smith"));
        editor.save(&store).await.unwrap();

        let saved = store.record(7, RecordTab::Basic).unwrap();
        assert_eq!(saved["lastName"], json!("Smith"));
        assert_eq!(store.count(StoreOp::FetchRecord(RecordTab::Basic)), 2);
        assert_eq!(editor.session().generation(), 1);
        assert!(!editor.record(RecordTab::Basic).engine().is_dirty());
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_edits() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Basic).await;
        editor
            .record_mut(RecordTab::Basic)
            .engine_mut()
            .handle_change("lastName", json!("Smith"));
        store.fail_next(
            StoreOp::UpdateRecord(RecordTab::Basic),
            StoreError::Http {
                status: 409,
                message: Some("Email already in use".to_string()),
            },
        );

        let err = editor.save(&store).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already in use");
        assert_eq!(editor.record(RecordTab::Basic).engine().text("lastName"), "Smith");
        assert_eq!(editor.session().generation(), 0);
        assert!(!editor.is_saving());
    }

    #[tokio::test]
    async fn test_second_save_refused_while_in_flight() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Basic).await;
        let plan = editor.prepare_save().unwrap();
        assert!(editor.is_saving());
        assert_eq!(editor.prepare_save(), Err(SaveError::InProgress));
        let outcome = execute_plan(&store, &plan).await;
        editor.finish_save(&plan, outcome).unwrap();
        assert!(editor.prepare_save().is_ok());
    }

    #[tokio::test]
    async fn test_saved_tab_is_locked_until_finished() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Leave).await;
        assert!(editor.leave_mut().decrement(1));
        let plan = editor.prepare_save().unwrap();
        assert!(editor.is_locked(Tab::Leave));
        assert!(editor.editable_leave().is_none());
        assert!(editor.editable_record(RecordTab::Basic).is_some());

        // Leaving and returning mid-save does not reset the locked tab.
        editor.begin_activation(Tab::Basic);
        editor.begin_activation(Tab::Leave);
        assert_eq!(editor.leave().row(1).unwrap().subtract, 1);

        let outcome = execute_plan(&store, &plan).await;
        editor.finish_save(&plan, outcome).unwrap();
        assert!(!editor.is_locked(Tab::Leave));
        assert!(editor.editable_leave().is_some_and(|leave| leave.increment(1)));
        assert_eq!(store.leave_balances(7)[0].remaining, 9.0);
        assert_eq!(editor.leave().row(1).unwrap().addon, 1);
    }

    #[tokio::test]
    async fn test_failed_save_unlocks_and_keeps_edits() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Basic).await;
        editor
            .record_mut(RecordTab::Basic)
            .engine_mut()
            .handle_change("lastName", json!("Smith"));
        let plan = editor.prepare_save().unwrap();
        assert!(editor.editable_record(RecordTab::Basic).is_none());
        editor
            .finish_save(&plan, Err(SaveError::persist(Tab::Basic, &StoreError::NotFound)))
            .unwrap_err();
        let basic = editor.editable_record(RecordTab::Basic).unwrap();
        assert_eq!(basic.engine().text("lastName"), "Smith");
    }

    #[tokio::test]
    async fn test_reload_only_when_saved_tab_still_shown() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Basic).await;
        let plan = editor.prepare_save().unwrap();
        editor.begin_activation(Tab::Address);
        let outcome = execute_plan(&store, &plan).await;
        editor.finish_save(&plan, outcome).unwrap();
        assert!(!editor.should_reload(&plan));
        assert_eq!(editor.active_tab(), Tab::Address);

        editor.begin_activation(Tab::Basic);
        assert!(editor.should_reload(&plan));
        assert!(!editor.session().is_fresh(Tab::Basic));
    }

    #[tokio::test]
    async fn test_unloaded_tab_cannot_be_saved() {
        let store = store();
        store.fail_next(StoreOp::FetchLeave, StoreError::Network("offline".to_string()));
        let mut editor = editor_on(&store, Tab::Leave).await;
        assert_eq!(
            editor.prepare_save(),
            Err(SaveError::NotLoaded { tab: Tab::Leave })
        );
        assert!(!editor.is_saving());
    }

    #[tokio::test]
    async fn test_leave_save_reloads_server_balance() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Leave).await;
        let leave = editor.leave_mut();
        assert!(leave.decrement(1));
        assert!(leave.decrement(1));
        assert!(leave.increment(1));

        let report = editor.save(&store).await.unwrap();
        assert_eq!(report.message, "Leave updated for John Doe");
        assert_eq!(store.count(StoreOp::UpdateLeave), 1);
        assert_eq!(store.count(StoreOp::FetchLeave), 2);

        let sick = editor.leave().row(1).unwrap();
        assert_eq!(sick.remaining, 9.0);
        assert_eq!((sick.addon, sick.subtract), (0, 0));
        assert_eq!(editor.leave().row(2).unwrap().remaining, 8.0);
    }

    #[tokio::test]
    async fn test_documents_upload_failure_commits_nothing() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Documents).await;
        let documents = editor.documents_mut();
        documents.add_pending(Some(1), PendingFile::new("pan.pdf", "application/pdf", vec![1]), None);
        documents.add_pending(Some(2), PendingFile::new("id.png", "image/png", vec![2]), None);
        store.clear_calls();
        store.fail_next(StoreOp::UploadFile, StoreError::Network("reset".to_string()));

        let err = editor.save(&store).await.unwrap_err();
        assert!(matches!(err, SaveError::Upload { ref file_name, .. } if file_name == "pan.pdf"));
        assert_eq!(store.calls(), vec![StoreOp::UploadFile]);
        assert!(store.documents(7).is_empty());
        assert_eq!(editor.documents().pending().len(), 2);
    }

    #[tokio::test]
    async fn test_documents_save_uploads_then_submits_once() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Documents).await;
        let documents = editor.documents_mut();
        documents.add_pending(Some(1), PendingFile::new("pan.pdf", "application/pdf", vec![1]), None);
        documents.add_pending(Some(2), PendingFile::new("id.png", "image/png", vec![2]), None);
        store.clear_calls();

        let report = editor.save(&store).await.unwrap();
        assert_eq!(report.message, "Documents updated for John Doe");
        assert_eq!(
            store.calls(),
            vec![
                StoreOp::UploadFile,
                StoreOp::UploadFile,
                StoreOp::SubmitDocuments,
                StoreOp::FetchDocuments,
            ]
        );
        assert!(editor.documents().pending().is_empty());
        assert_eq!(editor.documents().uploaded().len(), 2);
    }

    #[tokio::test]
    async fn test_save_invalidates_only_saved_tab() {
        let store = store();
        let mut editor = editor_on(&store, Tab::Leave).await;
        editor.save(&store).await.unwrap();
        assert!(editor.session().is_fresh(Tab::Basic));

        let config = HrmsConfig::default().with_invalidation(InvalidationPolicy::AllTabs);
        let mut editor = EmployeeEditor::new(7, config);
        editor.activate(&store, Tab::Basic).await;
        editor.activate(&store, Tab::Leave).await;
        editor.save(&store).await.unwrap();
        assert!(!editor.session().is_fresh(Tab::Basic));
    }

    #[test]
    fn test_report_falls_back_to_employee_id() {
        let plan = SavePlan {
            employee_id: 42,
            tab: Tab::Salary,
            payload: SavePayload::Leave(Vec::new()),
            employee_name: None,
        };
        assert_eq!(SaveReport::new(&plan).message, "Salary updated for employee #42");
    }
}
