use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::error::StoreError;
use crate::leave::LeaveDelta;
use crate::models::{
    Document, DocumentSubmission, EmployeeId, LeaveBalance, PendingFile, RecordTab,
    ReferenceData, Values,
};
use crate::repo::{EmployeeStore, ReferenceStore};
use crate::validation::as_number;

/// A call made against [`MemoryStore`], recorded in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FetchRecord(RecordTab),
    UpdateRecord(RecordTab),
    FetchDocuments,
    UploadFile,
    SubmitDocuments,
    DeleteDocument,
    FetchLeave,
    UpdateLeave,
    CreateEmployee,
    FetchReference,
}

impl StoreOp {
    /// Whether this call writes to the server.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            StoreOp::UpdateRecord(_)
                | StoreOp::UploadFile
                | StoreOp::SubmitDocuments
                | StoreOp::DeleteDocument
                | StoreOp::UpdateLeave
                | StoreOp::CreateEmployee
        )
    }
}

#[derive(Debug, Default)]
struct Inner {
    employees: BTreeSet<EmployeeId>,
    records: HashMap<(EmployeeId, RecordTab), Value>,
    documents: HashMap<EmployeeId, Vec<Document>>,
    uploads: HashMap<String, PendingFile>,
    leave: HashMap<EmployeeId, Vec<LeaveBalance>>,
    reference: ReferenceData,
    next_id: u64,
    calls: Vec<StoreOp>,
    failures: Vec<(StoreOp, StoreError)>,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Record the call and return a scripted failure for it, if any.
    fn enter(&mut self, op: StoreOp) -> Result<(), StoreError> {
        self.calls.push(op);
        match self.failures.iter().position(|(failing, _)| *failing == op) {
            Some(index) => Err(self.failures.remove(index).1),
            None => Ok(()),
        }
    }

    fn require_employee(&self, employee_id: EmployeeId) -> Result<(), StoreError> {
        if self.employees.contains(&employee_id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

/// In-memory employee backend for tests and offline use.
///
/// Behaves like the REST API where it matters to the editor: leave deltas are
/// applied additively, salary saves recompute `net_salary`, and uploaded files
/// must exist before they can be submitted.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an employee with its basic record.
    pub fn add_employee(&self, employee_id: EmployeeId, basic: Value) {
        let mut inner = self.inner();
        inner.employees.insert(employee_id);
        inner.next_id = inner.next_id.max(employee_id);
        inner.records.insert((employee_id, RecordTab::Basic), basic);
    }

    pub fn set_record(&self, employee_id: EmployeeId, tab: RecordTab, record: Value) {
        self.inner().records.insert((employee_id, tab), record);
    }

    pub fn record(&self, employee_id: EmployeeId, tab: RecordTab) -> Option<Value> {
        self.inner().records.get(&(employee_id, tab)).cloned()
    }

    pub fn set_documents(&self, employee_id: EmployeeId, documents: Vec<Document>) {
        let mut inner = self.inner();
        let max = documents.iter().map(|d| d.id).max().unwrap_or(0);
        inner.next_id = inner.next_id.max(max);
        inner.documents.insert(employee_id, documents);
    }

    pub fn documents(&self, employee_id: EmployeeId) -> Vec<Document> {
        self.inner()
            .documents
            .get(&employee_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_leave_balances(&self, employee_id: EmployeeId, rows: Vec<LeaveBalance>) {
        self.inner().leave.insert(employee_id, rows);
    }

    pub fn leave_balances(&self, employee_id: EmployeeId) -> Vec<LeaveBalance> {
        self.inner()
            .leave
            .get(&employee_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_reference_data(&self, reference: ReferenceData) {
        self.inner().reference = reference;
    }

    /// Make the next call of kind `op` fail with `error`.
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        self.inner().failures.push((op, error));
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<StoreOp> {
        self.inner().calls.clone()
    }

    pub fn count(&self, op: StoreOp) -> usize {
        self.inner().calls.iter().filter(|c| **c == op).count()
    }

    pub fn write_count(&self) -> usize {
        self.inner().calls.iter().filter(|c| c.is_write()).count()
    }

    pub fn clear_calls(&self) {
        self.inner().calls.clear();
    }
}

fn net_salary(values: &Values) -> f64 {
    let amount = |field: &str| values.get(field).and_then(as_number).unwrap_or(0.0);
    amount("basic_salary") + amount("hra") + amount("allowances") - amount("deductions")
}

impl EmployeeStore for MemoryStore {
    async fn fetch_record(&self, employee_id: EmployeeId, tab: RecordTab) -> Result<Value, StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::FetchRecord(tab))?;
        inner.require_employee(employee_id)?;
        Ok(inner
            .records
            .get(&(employee_id, tab))
            .cloned()
            .unwrap_or_else(|| Value::Object(Values::new())))
    }

    async fn update_record(
        &self,
        employee_id: EmployeeId,
        tab: RecordTab,
        values: &Values,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::UpdateRecord(tab))?;
        inner.require_employee(employee_id)?;
        let mut record = values.clone();
        if tab == RecordTab::Salary {
            record.insert("net_salary".to_string(), Value::from(net_salary(values)));
        }
        inner
            .records
            .insert((employee_id, tab), Value::Object(record));
        Ok(())
    }

    async fn fetch_documents(&self, employee_id: EmployeeId) -> Result<Vec<Document>, StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::FetchDocuments)?;
        inner.require_employee(employee_id)?;
        Ok(inner
            .documents
            .get(&employee_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_file(&self, file: &PendingFile) -> Result<String, StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::UploadFile)?;
        let file_id = format!("file-{}", inner.next_id());
        inner.uploads.insert(file_id.clone(), file.clone());
        Ok(file_id)
    }

    async fn submit_documents(
        &self,
        employee_id: EmployeeId,
        documents: &[DocumentSubmission],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::SubmitDocuments)?;
        inner.require_employee(employee_id)?;
        if let Some(missing) = documents
            .iter()
            .find(|d| !inner.uploads.contains_key(&d.file_id))
        {
            return Err(StoreError::Http {
                status: 422,
                message: Some(format!("Unknown file {}", missing.file_id)),
            });
        }
        let mut created = Vec::with_capacity(documents.len());
        for submission in documents {
            let id = inner.next_id();
            let file_name = inner
                .uploads
                .get(&submission.file_id)
                .map(|f| f.name.clone())
                .unwrap_or_default();
            created.push(Document {
                id,
                category_id: submission.document_category_id,
                file_name,
                file_url: Some(format!("memory://{}", submission.file_id)),
            });
        }
        inner.documents.entry(employee_id).or_default().extend(created);
        Ok(())
    }

    async fn delete_document(&self, document_id: u64, employee_id: EmployeeId) -> Result<(), StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::DeleteDocument)?;
        let documents = inner
            .documents
            .get_mut(&employee_id)
            .ok_or(StoreError::NotFound)?;
        let index = documents
            .iter()
            .position(|d| d.id == document_id)
            .ok_or(StoreError::NotFound)?;
        documents.remove(index);
        Ok(())
    }

    async fn fetch_leave_balances(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<LeaveBalance>, StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::FetchLeave)?;
        inner.require_employee(employee_id)?;
        Ok(inner.leave.get(&employee_id).cloned().unwrap_or_default())
    }

    async fn update_leave_balances(
        &self,
        employee_id: EmployeeId,
        deltas: &[LeaveDelta],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::UpdateLeave)?;
        inner.require_employee(employee_id)?;
        let rows = inner.leave.entry(employee_id).or_default();
        if let Some(unknown) = deltas.iter().find(|d| rows.iter().all(|r| r.id != d.id)) {
            return Err(StoreError::Http {
                status: 422,
                message: Some(format!("Unknown leave balance {}", unknown.id)),
            });
        }
        for delta in deltas {
            if let Some(row) = rows.iter_mut().find(|r| r.id == delta.id) {
                delta.apply(row);
            }
        }
        Ok(())
    }

    async fn create_employee(&self, values: &Values) -> Result<EmployeeId, StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::CreateEmployee)?;
        let id = inner.next_id();
        inner.employees.insert(id);
        inner
            .records
            .insert((id, RecordTab::Basic), Value::Object(values.clone()));
        Ok(id)
    }
}

impl ReferenceStore for MemoryStore {
    async fn fetch_reference_data(&self) -> Result<ReferenceData, StoreError> {
        let mut inner = self.inner();
        inner.enter(StoreOp::FetchReference)?;
        Ok(inner.reference.clone())
    }
}
