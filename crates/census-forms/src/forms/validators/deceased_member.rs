use super::{FormError, FormValidator};
use crate::forms::engine::{ConditionalFieldValidator, Rule};
use crate::forms::record::CandidateRecord;

pub const DECEASED_MEMBER_RULES: &[Rule] = &[
    Rule::required_if_not_none("extra_death_info", "extra_death_info_date"),
    Rule::other_specify("death_cause"),
];

pub struct DeceasedMemberFormValidator<'a> {
    record: &'a CandidateRecord,
}

impl<'a> DeceasedMemberFormValidator<'a> {
    pub fn new(record: &'a CandidateRecord) -> Self {
        Self { record }
    }
}

impl FormValidator for DeceasedMemberFormValidator<'_> {
    fn record(&self) -> &CandidateRecord {
        self.record
    }

    fn clean(&self, engine: &mut ConditionalFieldValidator<'_>) -> Result<(), FormError> {
        engine.apply_all(DECEASED_MEMBER_RULES)?;
        Ok(())
    }
}
