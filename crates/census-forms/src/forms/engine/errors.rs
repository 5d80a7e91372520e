use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::forms::constants::NON_FIELD_ERRORS;

/// Broad classes of validation failure surfaced to form callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FieldRequired,
    FieldNotApplicable,
    FieldMustBeApplicable,
    StructuralPrecondition,
    StateConflict,
}

/// Machine-readable code attached to every reported error; serialized as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    RequiredFieldMissing,
    NotRequired,
    UnexpectedNotApplicable,
    UnexpectedAnswer,
    OtherSpecifyRequired,
    EnrollmentChecklistCompleted,
    HouseholdLogEntry,
    RefusedEnumeration,
    UseImportTool,
    InvalidReportDatetime,
    HeadOfHouseholdAge,
    InvalidRelation,
    InvalidInitials,
    ReportedDeceased,
    RepresentativeEligibilityRequired,
    HouseholdMemberHasMoved,
    MovedCommunityConflict,
}

impl ErrorCode {
    pub const fn kind(self) -> ErrorKind {
        match self {
            ErrorCode::RequiredFieldMissing | ErrorCode::OtherSpecifyRequired => {
                ErrorKind::FieldRequired
            }
            ErrorCode::NotRequired | ErrorCode::UnexpectedAnswer => ErrorKind::FieldNotApplicable,
            ErrorCode::UnexpectedNotApplicable => ErrorKind::FieldMustBeApplicable,
            ErrorCode::HouseholdLogEntry
            | ErrorCode::RefusedEnumeration
            | ErrorCode::RepresentativeEligibilityRequired
            | ErrorCode::InvalidReportDatetime => ErrorKind::StructuralPrecondition,
            ErrorCode::EnrollmentChecklistCompleted
            | ErrorCode::UseImportTool
            | ErrorCode::HeadOfHouseholdAge
            | ErrorCode::InvalidRelation
            | ErrorCode::InvalidInitials
            | ErrorCode::ReportedDeceased
            | ErrorCode::HouseholdMemberHasMoved
            | ErrorCode::MovedCommunityConflict => ErrorKind::StateConflict,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ErrorCode::RequiredFieldMissing => "required_field_missing",
            ErrorCode::NotRequired => "not_required",
            ErrorCode::UnexpectedNotApplicable => "unexpected_not_applicable",
            ErrorCode::UnexpectedAnswer => "unexpected_answer",
            ErrorCode::OtherSpecifyRequired => "other_specify_required",
            ErrorCode::EnrollmentChecklistCompleted => "enrollment_checklist_completed",
            ErrorCode::HouseholdLogEntry => "household_log_entry",
            ErrorCode::RefusedEnumeration => "refused_enumeration",
            ErrorCode::UseImportTool => "use_import_tool",
            ErrorCode::InvalidReportDatetime => "invalid_report_datetime",
            ErrorCode::HeadOfHouseholdAge => "head_of_household_age",
            ErrorCode::InvalidRelation => "invalid_relation",
            ErrorCode::InvalidInitials => "invalid_initials",
            ErrorCode::ReportedDeceased => "reported_deceased",
            ErrorCode::RepresentativeEligibilityRequired => "representative_eligibility_required",
            ErrorCode::HouseholdMemberHasMoved => "household_member_has_moved",
            ErrorCode::MovedCommunityConflict => "moved_community_conflict",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported violation, keyed by field or by [`NON_FIELD_ERRORS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub key: String,
    pub message: String,
    pub code: ErrorCode,
}

impl FieldError {
    pub fn field(field: &str, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            key: field.to_string(),
            message: message.into(),
            code,
        }
    }

    pub fn non_field(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::field(NON_FIELD_ERRORS, code, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

/// Insertion-ordered field → message mapping; the first message for a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorSet {
    entries: Vec<FieldError>,
}

impl FieldErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the key already carried a message.
    pub fn insert(&mut self, error: FieldError) -> bool {
        if self.contains(&error.key) {
            return false;
        }
        self.entries.push(error);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|error| error.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldError> {
        self.entries.iter().find(|error| error.key == key)
    }

    pub fn message(&self, key: &str) -> Option<&str> {
        self.get(key).map(|error| error.message.as_str())
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.entries.iter().any(|error| error.code == code)
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.entries.iter().map(|error| error.code).collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|error| error.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldErrorSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for error in &self.entries {
            map.serialize_entry(&error.key, &error.message)?;
        }
        map.end()
    }
}

impl fmt::Display for FieldErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .entries
            .iter()
            .map(|error| format!("{}: {}", error.key, error.message))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

/// Rejection raised by a form validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("form validation failed: {errors}")]
pub struct ValidationError {
    errors: FieldErrorSet,
}

impl ValidationError {
    pub fn new(errors: FieldErrorSet) -> Self {
        Self { errors }
    }

    pub fn single(error: FieldError) -> Self {
        let mut errors = FieldErrorSet::new();
        errors.insert(error);
        Self { errors }
    }

    pub fn errors(&self) -> &FieldErrorSet {
        &self.errors
    }

    pub fn into_errors(self) -> FieldErrorSet {
        self.errors
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.codes()
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.errors.has_code(code)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains(field)
    }
}
