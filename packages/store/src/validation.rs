//! # Validation engine: declarative per-field rules over form values
//!
//! A [`Schema`] attaches an ordered list of [`FieldRule`]s to each field. A
//! [`FormEngine`] owns the live [`FormState`] of one form (values, error messages,
//! touched fields) and only changes it through the transitions below, so every UI
//! binding sees the same state machine.
//!
//! | Transition | Effect |
//! |------------|--------|
//! | [`handle_change`](FormEngine::handle_change) | Sets the value; re-validates that field when `validate_on_change`. |
//! | [`handle_blur`](FormEngine::handle_blur) | Marks the field touched; re-validates it when `validate_on_blur`. |
//! | [`set_field_value`](FormEngine::set_field_value) | Programmatic set, same validation behaviour as a change. |
//! | [`validate_form`](FormEngine::validate_form) | Evaluates every field, fills `errors`, marks everything touched. The only gate used before a save. |
//! | [`reinitialize`](FormEngine::reinitialize) | Replaces the state when the record identity changes, so edits never leak between records. |
//!
//! ## Rule semantics
//!
//! A field's rules run in declaration order and the first failing rule's message
//! wins. `required` rejects null, missing, and blank strings. The format rules
//! (`email`, `phone`, `zip`, `number`, `boolean`, `string`) only judge values that are
//! present; emptiness is `required`'s job. `optional` and unknown kinds always pass.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::models::{RecordIdentity, Values};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("phone pattern"));
static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6}$").expect("zip pattern"));

/// The kinds of check a field rule can perform.
///
/// Deserialising an unrecognised kind yields [`RuleKind::Unknown`], which always
/// passes, so schemas written for newer clients still load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Required,
    Email,
    Phone,
    Zip,
    Number,
    Boolean,
    String,
    Optional,
    #[serde(other)]
    Unknown,
}

impl RuleKind {
    /// Whether `value` satisfies this rule. `None` means the field is absent.
    ///
    /// The match is exhaustive on purpose: adding a kind without deciding how it
    /// evaluates is a compile error.
    pub fn check(self, value: Option<&Value>) -> bool {
        match self {
            RuleKind::Required => !is_blank(value),
            RuleKind::Email => present(value).is_none_or(|v| matches_text(&EMAIL_RE, v)),
            RuleKind::Phone => present(value).is_none_or(|v| matches_text(&PHONE_RE, v)),
            RuleKind::Zip => present(value).is_none_or(|v| matches_text(&ZIP_RE, v)),
            RuleKind::Number => present(value).is_none_or(|v| as_number(v).is_some()),
            RuleKind::Boolean => present(value).is_none_or(Value::is_boolean),
            RuleKind::String => present(value).is_none_or(Value::is_string),
            RuleKind::Optional | RuleKind::Unknown => true,
        }
    }
}

/// True for missing, null, and whitespace-only strings.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    if is_blank(value) {
        None
    } else {
        value
    }
}

fn matches_text(re: &Regex, value: &Value) -> bool {
    match value {
        Value::String(s) => re.is_match(s.trim()),
        Value::Number(n) => re.is_match(&n.to_string()),
        _ => false,
    }
}

/// Coerce a form value to a finite number, the way numeric inputs are read.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// One check attached to a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub kind: RuleKind,
    #[serde(default)]
    pub message: String,
}

impl FieldRule {
    pub fn new(kind: RuleKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// The rules for one field, in evaluation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<FieldRule>,
}

/// Per-field rule lists for one form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method appending a field with its rules.
    pub fn field(mut self, name: &str, rules: Vec<FieldRule>) -> Self {
        self.fields.push(FieldSchema {
            name: name.to_string(),
            rules,
        });
        self
    }

    pub fn rules_for(&self, field: &str) -> &[FieldRule] {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Evaluate one field; the first failing rule's message wins.
    pub fn validate_field(&self, field: &str, values: &Values) -> Option<ValidationError> {
        let value = values.get(field);
        self.rules_for(field)
            .iter()
            .find(|rule| !rule.kind.check(value))
            .map(|rule| ValidationError {
                field: field.to_string(),
                message: rule.message.clone(),
            })
    }

    /// Evaluate every field in the schema.
    pub fn validate(&self, values: &Values) -> Vec<ValidationError> {
        self.fields
            .iter()
            .filter_map(|f| self.validate_field(&f.name, values))
            .collect()
    }
}

/// When the engine re-validates a single field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormOptions {
    pub validate_on_change: bool,
    pub validate_on_blur: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_on_change: true,
            validate_on_blur: true,
        }
    }
}

/// Live state of one form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub values: Values,
    pub errors: BTreeMap<String, String>,
    pub touched: BTreeSet<String>,
}

/// A schema-driven form: state plus the transitions allowed on it.
#[derive(Clone, Debug, PartialEq)]
pub struct FormEngine {
    schema: Schema,
    options: FormOptions,
    initial: Values,
    identity: Option<RecordIdentity>,
    state: FormState,
}

impl FormEngine {
    pub fn new(schema: Schema, options: FormOptions, initial: Values) -> Self {
        Self {
            schema,
            options,
            state: FormState {
                values: initial.clone(),
                ..FormState::default()
            },
            initial,
            identity: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn values(&self) -> &Values {
        &self.state.values
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.state.values.get(field)
    }

    /// The value rendered as input text.
    pub fn text(&self, field: &str) -> String {
        match self.state.values.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.state.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.state.errors.get(field).map(String::as_str)
    }

    /// The error to show next to a field: only once the field has been touched.
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.state.touched.contains(field) {
            self.error(field)
        } else {
            None
        }
    }

    pub fn touched(&self) -> &BTreeSet<String> {
        &self.state.touched
    }

    pub fn identity(&self) -> Option<RecordIdentity> {
        self.identity
    }

    /// Whether any value differs from the last initial values.
    pub fn is_dirty(&self) -> bool {
        self.state.values != self.initial
    }

    pub fn handle_change(&mut self, field: &str, value: Value) {
        self.state.values.insert(field.to_string(), value);
        if self.options.validate_on_change {
            self.revalidate(field);
        }
    }

    pub fn handle_blur(&mut self, field: &str) {
        self.state.touched.insert(field.to_string());
        if self.options.validate_on_blur {
            self.revalidate(field);
        }
    }

    pub fn set_field_value(&mut self, field: &str, value: Value) {
        self.handle_change(field, value);
    }

    /// Validate every field. Returns `true` iff no field has an error.
    pub fn validate_form(&mut self) -> bool {
        let mut errors = BTreeMap::new();
        for error in self.schema.validate(&self.state.values) {
            errors.insert(error.field, error.message);
        }
        let fields = self
            .schema
            .fields
            .iter()
            .map(|f| f.name.clone())
            .chain(self.state.values.keys().cloned());
        self.state.touched.extend(fields);
        self.state.errors = errors;
        self.state.errors.is_empty()
    }

    /// Reset to `initial` if `identity` differs from the one currently loaded.
    /// Returns whether a reset happened.
    pub fn reinitialize(&mut self, identity: RecordIdentity, initial: Values) -> bool {
        if self.identity == Some(identity) {
            return false;
        }
        self.identity = Some(identity);
        self.initial = initial;
        self.reset();
        true
    }

    /// Discard edits, errors and touched state.
    pub fn reset(&mut self) {
        self.state = FormState {
            values: self.initial.clone(),
            ..FormState::default()
        };
    }

    fn revalidate(&mut self, field: &str) {
        match self.schema.validate_field(field, &self.state.values) {
            Some(error) => {
                self.state.errors.insert(error.field, error.message);
            }
            None => {
                self.state.errors.remove(field);
            }
        }
    }
}
