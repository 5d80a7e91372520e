use super::{household_structure_id, FormError, FormValidator};
use crate::forms::domain::RepresentativeEligibility;
use crate::forms::engine::{ConditionalFieldValidator, ErrorCode, FieldError, Rule};
use crate::forms::record::CandidateRecord;
use crate::forms::store::RecordStore;

pub const HOUSEHOLD_INFO_RULES: &[Rule] = &[
    Rule::other_specify("flooring_type"),
    Rule::other_specify("water_source"),
    Rule::other_specify("energy_source"),
    Rule::other_specify("toilet_facility"),
];

/// Household composition may only be captured once the representative is confirmed eligible.
pub struct HouseholdInfoFormValidator<'a, S: ?Sized> {
    record: &'a CandidateRecord,
    store: &'a S,
}

impl<'a, S> HouseholdInfoFormValidator<'a, S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(record: &'a CandidateRecord, store: &'a S) -> Self {
        Self { record, store }
    }
}

impl<S> FormValidator for HouseholdInfoFormValidator<'_, S>
where
    S: RecordStore + ?Sized,
{
    fn record(&self) -> &CandidateRecord {
        self.record
    }

    fn clean(&self, engine: &mut ConditionalFieldValidator<'_>) -> Result<(), FormError> {
        let eligibility = match household_structure_id(self.record) {
            Some(id) => self.store.representative_eligibility(&id)?,
            None => None,
        };

        if eligibility.is_none() {
            return Err(engine
                .reject(FieldError::non_field(
                    ErrorCode::RepresentativeEligibilityRequired,
                    format!(
                        "Please complete the {} form first.",
                        RepresentativeEligibility::VERBOSE_NAME
                    ),
                ))
                .into());
        }

        engine.apply_all(HOUSEHOLD_INFO_RULES)?;
        Ok(())
    }
}
