//! Create-employee form: the basic fields of a new employee, validated with the
//! same rules as the basic tab.

use serde_json::Value;

use crate::config::HrmsConfig;
use crate::error::SaveError;
use crate::formatter::format_values;
use crate::models::{EmployeeId, Tab, Values};
use crate::repo::EmployeeStore;
use crate::schemas::{schema_for, CREATE_FIELDS};
use crate::validation::FormEngine;

#[derive(Clone, Debug, PartialEq)]
pub struct CreateEmployeeForm {
    engine: FormEngine,
    submitting: bool,
}

impl CreateEmployeeForm {
    pub fn new(config: &HrmsConfig) -> Self {
        let initial = format_values(CREATE_FIELDS, &Value::Null, &config.defaults);
        Self {
            engine: FormEngine::new(schema_for(CREATE_FIELDS), config.form.options(), initial),
            submitting: false,
        }
    }

    pub fn engine(&self) -> &FormEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FormEngine {
        &mut self.engine
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate and hand out the values to send.
    pub fn prepare_submit(&mut self) -> Result<Values, SaveError> {
        if self.submitting {
            return Err(SaveError::InProgress);
        }
        if !self.engine.validate_form() {
            return Err(SaveError::Validation { tab: Tab::Basic });
        }
        self.submitting = true;
        Ok(self.engine.values().clone())
    }

    /// Record the outcome of [`create_employee`]. A success clears the form.
    pub fn finish_submit(&mut self, outcome: &Result<EmployeeId, SaveError>) {
        self.submitting = false;
        if outcome.is_ok() {
            self.engine.reset();
        }
    }
}

/// Create the employee and return its id.
pub async fn create_employee<S: EmployeeStore>(store: &S, values: &Values) -> Result<EmployeeId, SaveError> {
    match store.create_employee(values).await {
        Ok(employee_id) => {
            tracing::info!(employee_id, "employee created");
            Ok(employee_id)
        }
        Err(source) => {
            tracing::warn!(error = %source, "employee create failed");
            let message = source
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| "Failed to create employee".to_string());
            Err(SaveError::Persist {
                tab: Tab::Basic,
                message,
            })
        }
    }
}
