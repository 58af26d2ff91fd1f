//! # Persistence collaborators
//!
//! The editor never talks to the network itself. Everything it reads or writes
//! goes through [`EmployeeStore`] (per-tab employee data) and [`ReferenceStore`]
//! (lookup lists). The `api` crate implements both over HTTP; [`crate::MemoryStore`]
//! implements them in memory for tests and offline demos.
//!
//! | Tab | Read | Write |
//! |-----|------|-------|
//! | basic, address, personal, salary | [`fetch_record`](EmployeeStore::fetch_record) | [`update_record`](EmployeeStore::update_record) |
//! | documents | [`fetch_documents`](EmployeeStore::fetch_documents) | [`upload_file`](EmployeeStore::upload_file), [`submit_documents`](EmployeeStore::submit_documents), [`delete_document`](EmployeeStore::delete_document) |
//! | leave | [`fetch_leave_balances`](EmployeeStore::fetch_leave_balances) | [`update_leave_balances`](EmployeeStore::update_leave_balances) |

use serde_json::Value;

use crate::error::StoreError;
use crate::leave::LeaveDelta;
use crate::models::{
    Document, DocumentSubmission, EmployeeId, LeaveBalance, PendingFile, RecordTab,
    ReferenceData, Values,
};

/// Async interface to the employee REST resources.
pub trait EmployeeStore {
    fn fetch_record(
        &self,
        employee_id: EmployeeId,
        tab: RecordTab,
    ) -> impl std::future::Future<Output = Result<Value, StoreError>>;
    fn update_record(
        &self,
        employee_id: EmployeeId,
        tab: RecordTab,
        values: &Values,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn fetch_documents(
        &self,
        employee_id: EmployeeId,
    ) -> impl std::future::Future<Output = Result<Vec<Document>, StoreError>>;
    /// Upload one file and return the server's file identifier.
    fn upload_file(
        &self,
        file: &PendingFile,
    ) -> impl std::future::Future<Output = Result<String, StoreError>>;
    fn submit_documents(
        &self,
        employee_id: EmployeeId,
        documents: &[DocumentSubmission],
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn delete_document(
        &self,
        document_id: u64,
        employee_id: EmployeeId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn fetch_leave_balances(
        &self,
        employee_id: EmployeeId,
    ) -> impl std::future::Future<Output = Result<Vec<LeaveBalance>, StoreError>>;
    fn update_leave_balances(
        &self,
        employee_id: EmployeeId,
        deltas: &[LeaveDelta],
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    /// Create an employee from the create form and return its id.
    fn create_employee(
        &self,
        values: &Values,
    ) -> impl std::future::Future<Output = Result<EmployeeId, StoreError>>;
}

/// Async interface to the lookup lists used by select fields.
pub trait ReferenceStore {
    fn fetch_reference_data(
        &self,
    ) -> impl std::future::Future<Output = Result<ReferenceData, StoreError>>;
}
