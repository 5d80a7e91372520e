mod errors;
mod rules;

pub use errors::{ErrorCode, ErrorKind, FieldError, FieldErrorSet, ValidationError};
pub use rules::Rule;

use serde::{Deserialize, Serialize};

use super::record::CandidateRecord;

/// Whether evaluation stops at the first violation or reports every one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    #[default]
    FailFast,
    CollectAll,
}

impl ErrorMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail_fast" | "fail-fast" | "first" => Some(Self::FailFast),
            "collect_all" | "collect-all" | "all" => Some(Self::CollectAll),
            _ => None,
        }
    }
}

/// Read-only rule interpreter bound to one candidate record.
///
/// Rules run in declaration order. In [`ErrorMode::FailFast`] the first
/// violation is returned as `Err`; in [`ErrorMode::CollectAll`] violations are
/// recorded and surfaced by [`ConditionalFieldValidator::finish`].
pub struct ConditionalFieldValidator<'a> {
    record: &'a CandidateRecord,
    mode: ErrorMode,
    errors: FieldErrorSet,
}

impl<'a> ConditionalFieldValidator<'a> {
    pub fn new(record: &'a CandidateRecord, mode: ErrorMode) -> Self {
        Self {
            record,
            mode,
            errors: FieldErrorSet::new(),
        }
    }

    pub fn apply(&mut self, rule: &Rule) -> Result<(), ValidationError> {
        match rule.check(self.record) {
            Some(error) => self.report(error),
            None => Ok(()),
        }
    }

    pub fn apply_all(&mut self, rules: &[Rule]) -> Result<(), ValidationError> {
        for rule in rules {
            self.apply(rule)?;
        }
        Ok(())
    }

    pub fn required_if(
        &mut self,
        trigger: &'static str,
        field: &'static str,
        required_field: &'static str,
    ) -> Result<(), ValidationError> {
        self.apply(&Rule::required_if(trigger, field, required_field))
    }

    pub fn required_if_not_none(
        &mut self,
        field: &'static str,
        required_field: &'static str,
    ) -> Result<(), ValidationError> {
        self.apply(&Rule::required_if_not_none(field, required_field))
    }

    pub fn not_required_if(
        &mut self,
        trigger: &'static str,
        field: &'static str,
        target: &'static str,
    ) -> Result<(), ValidationError> {
        self.apply(&Rule::not_required_if(trigger, field, target))
    }

    pub fn applicable_if(
        &mut self,
        trigger: &'static str,
        field: &'static str,
        applicable_field: &'static str,
    ) -> Result<(), ValidationError> {
        self.apply(&Rule::applicable_if(trigger, field, applicable_field))
    }

    pub fn not_applicable_if(
        &mut self,
        trigger: &'static str,
        field: &'static str,
        applicable_field: &'static str,
    ) -> Result<(), ValidationError> {
        self.apply(&Rule::not_applicable_if(trigger, field, applicable_field))
    }

    pub fn validate_other_specify(
        &mut self,
        field: &'static str,
        other_field: Option<&'static str>,
    ) -> Result<(), ValidationError> {
        self.apply(&Rule::OtherSpecify { field, other_field })
    }

    /// Record-specific field check that honours the error mode like a rule.
    pub fn report(&mut self, error: FieldError) -> Result<(), ValidationError> {
        match self.mode {
            ErrorMode::FailFast => Err(ValidationError::single(error)),
            ErrorMode::CollectAll => {
                self.errors.insert(error);
                Ok(())
            }
        }
    }

    /// Structural rejection; always short-circuits, carrying anything collected so far.
    pub fn reject(&mut self, error: FieldError) -> ValidationError {
        let mut errors = std::mem::take(&mut self.errors);
        errors.insert(error);
        ValidationError::new(errors)
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::constants::{ALIVE, NOT_APPLICABLE, YES};

    const CASCADE: &[Rule] = &[
        Rule::applicable_if(ALIVE, "survival_status", "present_today"),
        Rule::applicable_if(ALIVE, "survival_status", "study_resident"),
        Rule::required_if(YES, "personal_details_changed", "details_change_reason"),
    ];

    fn record() -> CandidateRecord {
        CandidateRecord::new()
            .with("survival_status", ALIVE)
            .with("present_today", NOT_APPLICABLE)
            .with("study_resident", NOT_APPLICABLE)
            .with("personal_details_changed", YES)
    }

    #[test]
    fn fail_fast_stops_at_first_violation() {
        let record = record();
        let mut engine = ConditionalFieldValidator::new(&record, ErrorMode::FailFast);

        let error = engine.apply_all(CASCADE).expect_err("cascade fails");
        assert_eq!(error.errors().len(), 1);
        assert!(error.contains("present_today"));
    }

    #[test]
    fn collect_all_reports_every_violation_in_order() {
        let record = record();
        let mut engine = ConditionalFieldValidator::new(&record, ErrorMode::CollectAll);

        engine.apply_all(CASCADE).expect("collect mode defers errors");
        let error = engine.finish().expect_err("violations reported");
        let keys: Vec<&str> = error.errors().keys().collect();
        assert_eq!(
            keys,
            vec!["present_today", "study_resident", "details_change_reason"]
        );
    }

    #[test]
    fn reject_carries_collected_field_errors() {
        let record = record();
        let mut engine = ConditionalFieldValidator::new(&record, ErrorMode::CollectAll);
        engine
            .applicable_if(ALIVE, "survival_status", "present_today")
            .expect("deferred");

        let error = engine.reject(FieldError::non_field(
            ErrorCode::RepresentativeEligibilityRequired,
            "Please complete the Representative Eligibility form first.",
        ));
        assert_eq!(
            error.codes(),
            vec![
                ErrorCode::UnexpectedNotApplicable,
                ErrorCode::RepresentativeEligibilityRequired
            ]
        );
    }

    #[test]
    fn evaluation_leaves_record_untouched() {
        let record = record();
        let snapshot = record.clone();
        let mut engine = ConditionalFieldValidator::new(&record, ErrorMode::CollectAll);
        let _ = engine.apply_all(CASCADE);
        let _ = engine.finish();
        assert_eq!(record, snapshot);
    }

    #[test]
    fn parses_error_modes() {
        assert_eq!(ErrorMode::parse("collect_all"), Some(ErrorMode::CollectAll));
        assert_eq!(ErrorMode::parse(" Fail-Fast "), Some(ErrorMode::FailFast));
        assert_eq!(ErrorMode::parse("sometimes"), None);
    }
}
