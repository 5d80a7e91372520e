use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::MemberInstance;
use super::engine::{ErrorCode, ErrorMode, FieldErrorSet};
use super::record::CandidateRecord;
use super::store::{Clock, RecordStore, StoreError};
use super::validators::{
    DeceasedMemberFormValidator, FormError, FormValidator, HouseholdInfoFormValidator,
    HouseholdMemberFormValidator, HtcMemberFormValidator, MovedMemberFormValidator,
};
use crate::config::ValidationConfig;

/// Census forms with a registered rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    DeceasedMember,
    HouseholdInfo,
    HouseholdMember,
    HtcMember,
    MovedMember,
}

impl FormKind {
    pub const ALL: [FormKind; 5] = [
        FormKind::DeceasedMember,
        FormKind::HouseholdInfo,
        FormKind::HouseholdMember,
        FormKind::HtcMember,
        FormKind::MovedMember,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FormKind::DeceasedMember => "deceased_member",
            FormKind::HouseholdInfo => "household_info",
            FormKind::HouseholdMember => "household_member",
            FormKind::HtcMember => "htc_member",
            FormKind::MovedMember => "moved_member",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == normalized)
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Candidate record plus the context a form validator may consult.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub record: CandidateRecord,
    #[serde(default)]
    pub instance: Option<MemberInstance>,
    #[serde(default)]
    pub today_datetime: Option<DateTime<Utc>>,
}

impl FormSubmission {
    pub fn new(record: CandidateRecord) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn editing(mut self, instance: MemberInstance) -> Self {
        self.instance = Some(instance);
        self
    }

    pub fn today(mut self, today_datetime: DateTime<Utc>) -> Self {
        self.today_datetime = Some(today_datetime);
        self
    }
}

/// Caller-facing result of validating one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub form: FormKind,
    pub accepted: bool,
    pub errors: FieldErrorSet,
    pub codes: Vec<ErrorCode>,
}

impl ValidationReport {
    fn accepted(form: FormKind) -> Self {
        Self {
            form,
            accepted: true,
            errors: FieldErrorSet::new(),
            codes: Vec::new(),
        }
    }

    fn rejected(form: FormKind, errors: FieldErrorSet) -> Self {
        Self {
            form,
            accepted: false,
            codes: errors.codes(),
            errors,
        }
    }
}

/// Builds a fresh validator per submission against the shared store and clock.
pub struct FormValidationService<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
    config: ValidationConfig,
}

impl<S, C> FormValidationService<S, C>
where
    S: RecordStore + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<C>, config: ValidationConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Run the form's rule set, surfacing validation failures as `FormError::Invalid`.
    pub fn check(&self, form: FormKind, submission: &FormSubmission) -> Result<(), FormError> {
        let record = &submission.record;
        let instance = submission.instance.as_ref();
        let mode = self.config.error_mode;
        let store = self.store.as_ref();

        match form {
            FormKind::DeceasedMember => DeceasedMemberFormValidator::new(record).validate(mode),
            FormKind::HouseholdInfo => {
                HouseholdInfoFormValidator::new(record, store).validate(mode)
            }
            FormKind::HouseholdMember => HouseholdMemberFormValidator::new(
                record,
                instance,
                store,
                submission.today_datetime,
                self.clock.as_ref(),
            )
            .with_hoh_minimum_age(self.config.hoh_minimum_age)
            .validate(mode),
            FormKind::HtcMember => HtcMemberFormValidator::new(record).validate(mode),
            FormKind::MovedMember => {
                MovedMemberFormValidator::new(record, instance, self.config.moved_member_policy)
                    .validate(mode)
            }
        }
    }

    pub fn validate(
        &self,
        form: FormKind,
        submission: &FormSubmission,
    ) -> Result<ValidationReport, FormServiceError> {
        debug!(
            form = form.label(),
            fields = submission.record.len(),
            editing = submission.instance.is_some(),
            "validating submission"
        );

        match self.check(form, submission) {
            Ok(()) => Ok(ValidationReport::accepted(form)),
            Err(FormError::Invalid(error)) => {
                info!(form = form.label(), codes = ?error.codes(), "submission rejected");
                Ok(ValidationReport::rejected(form, error.into_errors()))
            }
            Err(FormError::Store(error)) => {
                warn!(form = form.label(), %error, "record store lookup failed");
                Err(FormServiceError::Store(error))
            }
        }
    }
}

/// Error raised by the form validation service.
#[derive(Debug, thiserror::Error)]
pub enum FormServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
