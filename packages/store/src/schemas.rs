//! Field catalogue for each form: names, labels, input kinds, formatter defaults
//! and validation rules. The formatter, the validation engine and the UI all read
//! from these tables so a field is declared exactly once.

use crate::models::RecordTab;
use crate::validation::{FieldRule, RuleKind, Schema};

/// Where a select field gets its options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionSource {
    Departments,
    Designations,
    Fixed(&'static [(&'static str, &'static str)]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Tel,
    Number,
    Date,
    Textarea,
    Select(OptionSource),
    /// Shown but computed by the server.
    ReadOnly,
}

/// Value the formatter falls back to when a record lacks the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldDefault {
    Empty,
    Zero,
    Country,
    Nationality,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub default: FieldDefault,
    pub rules: &'static [(RuleKind, &'static str)],
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|(kind, _)| *kind == RuleKind::Required)
    }
}

const GENDERS: &[(&str, &str)] = &[("male", "Male"), ("female", "Female"), ("other", "Other")];

const MARITAL_STATUSES: &[(&str, &str)] = &[
    ("single", "Single"),
    ("married", "Married"),
    ("divorced", "Divorced"),
    ("widowed", "Widowed"),
];

const BLOOD_GROUPS: &[(&str, &str)] = &[
    ("A+", "A+"),
    ("A-", "A-"),
    ("B+", "B+"),
    ("B-", "B-"),
    ("AB+", "AB+"),
    ("AB-", "AB-"),
    ("O+", "O+"),
    ("O-", "O-"),
];

const fn field(
    name: &'static str,
    label: &'static str,
    input: InputKind,
    default: FieldDefault,
    rules: &'static [(RuleKind, &'static str)],
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        input,
        default,
        rules,
    }
}

pub const BASIC_FIELDS: &[FieldSpec] = &[
    field(
        "firstName",
        "First Name",
        InputKind::Text,
        FieldDefault::Empty,
        &[(RuleKind::Required, "First name is required")],
    ),
    field(
        "lastName",
        "Last Name",
        InputKind::Text,
        FieldDefault::Empty,
        &[(RuleKind::Required, "Last name is required")],
    ),
    field(
        "email",
        "Email",
        InputKind::Email,
        FieldDefault::Empty,
        &[
            (RuleKind::Required, "Email is required"),
            (RuleKind::Email, "Invalid email address"),
        ],
    ),
    field(
        "phone",
        "Phone",
        InputKind::Tel,
        FieldDefault::Empty,
        &[
            (RuleKind::Required, "Phone number is required"),
            (RuleKind::Phone, "Phone number must be 10 digits"),
        ],
    ),
    field(
        "departmentId",
        "Department",
        InputKind::Select(OptionSource::Departments),
        FieldDefault::Empty,
        &[(RuleKind::Required, "Department is required")],
    ),
    field(
        "designationId",
        "Designation",
        InputKind::Select(OptionSource::Designations),
        FieldDefault::Empty,
        &[(RuleKind::Required, "Designation is required")],
    ),
    field(
        "dateOfJoining",
        "Date of Joining",
        InputKind::Date,
        FieldDefault::Empty,
        &[(RuleKind::Required, "Date of joining is required")],
    ),
    field(
        "employeeCode",
        "Employee Code",
        InputKind::Text,
        FieldDefault::Empty,
        &[(RuleKind::Optional, "")],
    ),
];

pub const ADDRESS_FIELDS: &[FieldSpec] = &[
    field(
        "street",
        "Street",
        InputKind::Text,
        FieldDefault::Empty,
        &[(RuleKind::Required, "Street is required")],
    ),
    field(
        "city",
        "City",
        InputKind::Text,
        FieldDefault::Empty,
        &[(RuleKind::Required, "City is required")],
    ),
    field(
        "state",
        "State",
        InputKind::Text,
        FieldDefault::Empty,
        &[(RuleKind::Required, "State is required")],
    ),
    field(
        "zip_code",
        "Zip Code",
        InputKind::Text,
        FieldDefault::Empty,
        &[
            (RuleKind::Required, "Zip code is required"),
            (RuleKind::Zip, "Zip code must be 6 digits"),
        ],
    ),
    field(
        "country",
        "Country",
        InputKind::Text,
        FieldDefault::Country,
        &[(RuleKind::Required, "Country is required")],
    ),
    field(
        "permanent_address",
        "Permanent Address",
        InputKind::Textarea,
        FieldDefault::Empty,
        &[(RuleKind::Optional, "")],
    ),
];

pub const PERSONAL_FIELDS: &[FieldSpec] = &[
    field(
        "date_of_birth",
        "Date of Birth",
        InputKind::Date,
        FieldDefault::Empty,
        &[(RuleKind::Required, "Date of birth is required")],
    ),
    field(
        "gender",
        "Gender",
        InputKind::Select(OptionSource::Fixed(GENDERS)),
        FieldDefault::Empty,
        &[(RuleKind::Required, "Gender is required")],
    ),
    field(
        "marital_status",
        "Marital Status",
        InputKind::Select(OptionSource::Fixed(MARITAL_STATUSES)),
        FieldDefault::Empty,
        &[],
    ),
    field(
        "blood_group",
        "Blood Group",
        InputKind::Select(OptionSource::Fixed(BLOOD_GROUPS)),
        FieldDefault::Empty,
        &[],
    ),
    field(
        "nationality",
        "Nationality",
        InputKind::Text,
        FieldDefault::Nationality,
        &[(RuleKind::Required, "Nationality is required")],
    ),
    field(
        "father_name",
        "Father's Name",
        InputKind::Text,
        FieldDefault::Empty,
        &[(RuleKind::String, "Father's name must be text")],
    ),
    field(
        "emergency_contact_name",
        "Emergency Contact Name",
        InputKind::Text,
        FieldDefault::Empty,
        &[],
    ),
    field(
        "emergency_contact_phone",
        "Emergency Contact Phone",
        InputKind::Tel,
        FieldDefault::Empty,
        &[(RuleKind::Phone, "Emergency contact must be 10 digits")],
    ),
];

pub const SALARY_FIELDS: &[FieldSpec] = &[
    field(
        "basic_salary",
        "Basic Salary",
        InputKind::Number,
        FieldDefault::Zero,
        &[
            (RuleKind::Required, "Basic salary is required"),
            (RuleKind::Number, "Basic salary must be a number"),
        ],
    ),
    field(
        "hra",
        "HRA",
        InputKind::Number,
        FieldDefault::Zero,
        &[(RuleKind::Number, "HRA must be a number")],
    ),
    field(
        "allowances",
        "Allowances",
        InputKind::Number,
        FieldDefault::Zero,
        &[(RuleKind::Number, "Allowances must be a number")],
    ),
    field(
        "deductions",
        "Deductions",
        InputKind::Number,
        FieldDefault::Zero,
        &[(RuleKind::Number, "Deductions must be a number")],
    ),
    field(
        "net_salary",
        "Net Salary",
        InputKind::ReadOnly,
        FieldDefault::Zero,
        &[],
    ),
    field(
        "bank_name",
        "Bank Name",
        InputKind::Text,
        FieldDefault::Empty,
        &[],
    ),
    field(
        "account_number",
        "Account Number",
        InputKind::Text,
        FieldDefault::Empty,
        &[(RuleKind::Number, "Account number must be numeric")],
    ),
    field(
        "ifsc_code",
        "IFSC Code",
        InputKind::Text,
        FieldDefault::Empty,
        &[],
    ),
];

/// Fields of the create-employee form.
pub const CREATE_FIELDS: &[FieldSpec] = BASIC_FIELDS;

pub fn fields(tab: RecordTab) -> &'static [FieldSpec] {
    match tab {
        RecordTab::Basic => BASIC_FIELDS,
        RecordTab::Address => ADDRESS_FIELDS,
        RecordTab::Personal => PERSONAL_FIELDS,
        RecordTab::Salary => SALARY_FIELDS,
    }
}

/// Build an owned validation schema from a field table.
pub fn schema_for(specs: &[FieldSpec]) -> Schema {
    specs.iter().fold(Schema::new(), |schema, spec| {
        let rules = spec
            .rules
            .iter()
            .map(|(kind, message)| FieldRule::new(*kind, message))
            .collect();
        schema.field(spec.name, rules)
    })
}

pub fn schema(tab: RecordTab) -> Schema {
    schema_for(fields(tab))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_unique_per_tab() {
        for tab in RecordTab::ALL {
            let specs = fields(tab);
            for (i, a) in specs.iter().enumerate() {
                assert!(
                    specs[i + 1..].iter().all(|b| b.name != a.name),
                    "duplicate {} in {tab}",
                    a.name
                );
            }
        }
    }

    #[test]
    fn test_schema_mirrors_field_table() {
        let schema = schema(RecordTab::Basic);
        assert_eq!(schema.fields.len(), BASIC_FIELDS.len());
        let email = schema.rules_for("email");
        assert_eq!(email[0].kind, RuleKind::Required);
        assert_eq!(email[1].message, "Invalid email address");
        assert!(schema.rules_for("nope").is_empty());
    }

    #[test]
    fn test_required_flags() {
        let zip = ADDRESS_FIELDS.iter().find(|f| f.name == "zip_code").unwrap();
        assert!(zip.is_required());
        let permanent = ADDRESS_FIELDS
            .iter()
            .find(|f| f.name == "permanent_address")
            .unwrap();
        assert!(!permanent.is_required());
    }
}
