mod modal_overlay;
pub use modal_overlay::{ConfirmDialog, ModalOverlay};

mod record_tab;
pub use record_tab::RecordTabView;

mod documents_tab;
pub use documents_tab::DocumentsTabView;

mod leave_tab;
pub use leave_tab::LeaveTabView;

mod edit_employee;
pub use edit_employee::EditEmployeeView;

mod create_employee;
pub use create_employee::CreateEmployeeView;
