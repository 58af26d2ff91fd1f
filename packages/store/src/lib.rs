pub mod config;
pub mod create;
pub mod documents;
pub mod editor;
pub mod error;
pub mod formatter;
pub mod leave;
pub mod models;
pub mod repo;
pub mod save;
pub mod schemas;
pub mod session;
pub mod validation;

mod memory;
pub use memory::{MemoryStore, StoreOp};

pub use config::HrmsConfig;
pub use create::{create_employee, CreateEmployeeForm};
pub use documents::DocumentsForm;
pub use editor::{delete_document, fetch_tab, EmployeeEditor, RecordForm, TabData, TabForm};
pub use error::{DeleteError, FetchError, SaveError, StoreError, ValidationError};
pub use leave::{from_api_to_form, to_delta_payload, LeaveDelta, LeaveForm, LeaveKey, LeaveSummary};
pub use models::{EmployeeId, RecordTab, ReferenceData, Tab, Values};
pub use repo::{EmployeeStore, ReferenceStore};
pub use save::{execute_plan, SavePayload, SavePlan, SaveReport};
pub use session::{InvalidationPolicy, TabSession};
pub use validation::{FormEngine, FormOptions, RuleKind, Schema};
