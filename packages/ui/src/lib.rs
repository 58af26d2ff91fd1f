//! Dioxus components for the employee editor.
//!
//! Views drive the workflow types from `store` and talk to the server through
//! the [`api::HttpStore`] provided by [`BackendProvider`].

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod backend;
pub use backend::{use_backend, use_reference_data, Backend, BackendProvider};

pub mod field;
pub use field::{FieldGrid, FieldInput};

pub mod views;

mod navbar;
pub use navbar::Navbar;

pub mod activity_log;
pub use activity_log::{log_activity, use_activity_log, ActivityLog, LogLevel};

mod activity_log_panel;
pub use activity_log_panel::{ActivityLogPanel, ActivityLogProvider, ActivityLogToggle, Toast};
