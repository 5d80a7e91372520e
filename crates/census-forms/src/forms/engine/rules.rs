use std::borrow::Cow;

use super::errors::{ErrorCode, FieldError};
use crate::forms::constants::OTHER;
use crate::forms::record::CandidateRecord;

/// Declarative conditional check between two fields of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    RequiredIf {
        trigger: &'static str,
        field: &'static str,
        target: &'static str,
    },
    RequiredIfNotNone {
        field: &'static str,
        target: &'static str,
    },
    NotRequiredIf {
        trigger: &'static str,
        field: &'static str,
        target: &'static str,
    },
    ApplicableIf {
        trigger: &'static str,
        field: &'static str,
        target: &'static str,
    },
    NotApplicableIf {
        trigger: &'static str,
        field: &'static str,
        target: &'static str,
    },
    OtherSpecify {
        field: &'static str,
        other_field: Option<&'static str>,
    },
}

impl Rule {
    pub const fn required_if(
        trigger: &'static str,
        field: &'static str,
        target: &'static str,
    ) -> Self {
        Rule::RequiredIf {
            trigger,
            field,
            target,
        }
    }

    pub const fn required_if_not_none(field: &'static str, target: &'static str) -> Self {
        Rule::RequiredIfNotNone { field, target }
    }

    pub const fn not_required_if(
        trigger: &'static str,
        field: &'static str,
        target: &'static str,
    ) -> Self {
        Rule::NotRequiredIf {
            trigger,
            field,
            target,
        }
    }

    pub const fn applicable_if(
        trigger: &'static str,
        field: &'static str,
        target: &'static str,
    ) -> Self {
        Rule::ApplicableIf {
            trigger,
            field,
            target,
        }
    }

    pub const fn not_applicable_if(
        trigger: &'static str,
        field: &'static str,
        target: &'static str,
    ) -> Self {
        Rule::NotApplicableIf {
            trigger,
            field,
            target,
        }
    }

    pub const fn other_specify(field: &'static str) -> Self {
        Rule::OtherSpecify {
            field,
            other_field: None,
        }
    }

    pub const fn other_specify_with(field: &'static str, other_field: &'static str) -> Self {
        Rule::OtherSpecify {
            field,
            other_field: Some(other_field),
        }
    }

    /// Field an error from this rule is reported against.
    pub fn target(&self) -> Cow<'static, str> {
        match *self {
            Rule::RequiredIf { target, .. }
            | Rule::RequiredIfNotNone { target, .. }
            | Rule::NotRequiredIf { target, .. }
            | Rule::ApplicableIf { target, .. }
            | Rule::NotApplicableIf { target, .. } => Cow::Borrowed(target),
            Rule::OtherSpecify {
                other_field: Some(other_field),
                ..
            } => Cow::Borrowed(other_field),
            Rule::OtherSpecify {
                field,
                other_field: None,
            } => Cow::Owned(format!("{field}_other")),
        }
    }

    /// Evaluate against a record; `None` means the rule holds.
    pub fn check(&self, record: &CandidateRecord) -> Option<FieldError> {
        match *self {
            Rule::RequiredIf {
                trigger,
                field,
                target,
            } => (record.matches(field, trigger) && !record.is_provided(target))
                .then(|| required(target)),
            Rule::RequiredIfNotNone { field, target } => {
                (record.is_answered(field) && !record.is_provided(target))
                    .then(|| required(target))
            }
            Rule::NotRequiredIf {
                trigger,
                field,
                target,
            } => (record.matches(field, trigger) && record.is_provided(target)).then(|| {
                FieldError::field(target, ErrorCode::NotRequired, "This field is not required.")
            }),
            Rule::ApplicableIf {
                trigger,
                field,
                target,
            } => (record.matches(field, trigger) && record.is_not_applicable(target)).then(|| {
                FieldError::field(
                    target,
                    ErrorCode::UnexpectedNotApplicable,
                    "This field is applicable.",
                )
            }),
            Rule::NotApplicableIf {
                trigger,
                field,
                target,
            } => (record.matches(field, trigger)
                && record.is_answered(target)
                && !record.is_not_applicable(target))
            .then(|| {
                FieldError::field(
                    target,
                    ErrorCode::UnexpectedAnswer,
                    "This field is not applicable.",
                )
            }),
            Rule::OtherSpecify { field, .. } => {
                let other_field = self.target();
                (record.matches(field, OTHER) && !record.is_provided(&other_field)).then(|| {
                    FieldError::field(
                        &other_field,
                        ErrorCode::OtherSpecifyRequired,
                        "This field is required. Please specify.",
                    )
                })
            }
        }
    }
}

fn required(target: &str) -> FieldError {
    FieldError::field(
        target,
        ErrorCode::RequiredFieldMissing,
        "This field is required.",
    )
}
