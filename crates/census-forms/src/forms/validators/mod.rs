//! Rule sets for each census form, built on the shared conditional engine.

mod deceased_member;
mod household_info;
mod household_member;
mod htc_member;
mod moved_member;

pub use deceased_member::{DeceasedMemberFormValidator, DECEASED_MEMBER_RULES};
pub use household_info::{HouseholdInfoFormValidator, HOUSEHOLD_INFO_RULES};
pub use household_member::{
    HouseholdMemberFormValidator, DEFAULT_HOH_MINIMUM_AGE, MOVED_MEMBER_FIELDS,
};
pub use htc_member::{HtcMemberFormValidator, HTC_MEMBER_RULES};
pub use moved_member::{MovedMemberFormValidator, MovedMemberPolicy};

use super::domain::HouseholdStructureId;
use super::engine::{ConditionalFieldValidator, ErrorMode, ValidationError};
use super::record::CandidateRecord;
use super::store::StoreError;

/// Outcome of running a form validator that did not accept the record.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A form-specific rule set evaluated against one candidate record.
pub trait FormValidator {
    fn record(&self) -> &CandidateRecord;

    fn clean(&self, engine: &mut ConditionalFieldValidator<'_>) -> Result<(), FormError>;

    fn validate(&self, mode: ErrorMode) -> Result<(), FormError> {
        let mut engine = ConditionalFieldValidator::new(self.record(), mode);
        self.clean(&mut engine)?;
        engine.finish()?;
        Ok(())
    }
}

pub(crate) fn household_structure_id(record: &CandidateRecord) -> Option<HouseholdStructureId> {
    record
        .text("household_structure")
        .map(|id| HouseholdStructureId(id.to_string()))
}
