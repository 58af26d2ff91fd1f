//! # Editor configuration: `hrms.toml`
//!
//! Optional TOML file that tunes how the employee editor behaves. A missing or
//! empty file is equivalent to [`HrmsConfig::default`].
//!
//! ## Structure
//!
//! ```toml
//! [form]
//! validate_on_change = true
//! validate_on_blur = true
//!
//! [defaults]
//! country = "India"
//! nationality = "Indian"
//!
//! [session]
//! invalidation = "active-tab"   # or "all-tabs"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`HrmsConfig`] | Top-level config with builder helpers and TOML (de)serialisation. |
//! | [`FormConfig`] | When fields are re-validated; converts into [`FormOptions`]. |
//! | [`DefaultsConfig`] | Literal defaults the field formatter fills in. |
//! | [`SessionConfig`] | Which cached tabs a successful save marks stale. |

use serde::{Deserialize, Serialize};

use crate::session::InvalidationPolicy;
use crate::validation::FormOptions;

/// Top-level configuration stored in `hrms.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HrmsConfig {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_true")]
    pub validate_on_change: bool,
    #[serde(default = "default_true")]
    pub validate_on_blur: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            validate_on_change: true,
            validate_on_blur: true,
        }
    }
}

impl FormConfig {
    pub fn options(&self) -> FormOptions {
        FormOptions {
            validate_on_change: self.validate_on_change,
            validate_on_blur: self.validate_on_blur,
        }
    }
}

/// Literal defaults used when a record is missing a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_nationality")]
    pub nationality: String,
}

fn default_country() -> String {
    "India".to_string()
}

fn default_nationality() -> String {
    "Indian".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            nationality: default_nationality(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub invalidation: InvalidationPolicy,
}

impl HrmsConfig {
    /// Builder method to toggle validation triggers.
    pub fn with_validation(mut self, on_change: bool, on_blur: bool) -> Self {
        self.form.validate_on_change = on_change;
        self.form.validate_on_blur = on_blur;
        self
    }

    /// Builder method to set the post-save invalidation policy.
    pub fn with_invalidation(mut self, policy: InvalidationPolicy) -> Self {
        self.session.invalidation = policy;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "hrms.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
