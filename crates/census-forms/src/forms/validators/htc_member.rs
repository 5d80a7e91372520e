use super::{FormError, FormValidator};
use crate::forms::constants::{NO, YES};
use crate::forms::engine::{ConditionalFieldValidator, Rule};
use crate::forms::record::CandidateRecord;

pub const HTC_MEMBER_RULES: &[Rule] = &[
    Rule::required_if(NO, "accepted", "refusal_reason"),
    Rule::applicable_if(YES, "offered", "referred"),
    Rule::required_if(YES, "referred", "referral_clinic"),
];

pub struct HtcMemberFormValidator<'a> {
    record: &'a CandidateRecord,
}

impl<'a> HtcMemberFormValidator<'a> {
    pub fn new(record: &'a CandidateRecord) -> Self {
        Self { record }
    }
}

impl FormValidator for HtcMemberFormValidator<'_> {
    fn record(&self) -> &CandidateRecord {
        self.record
    }

    fn clean(&self, engine: &mut ConditionalFieldValidator<'_>) -> Result<(), FormError> {
        engine.apply_all(HTC_MEMBER_RULES)?;
        Ok(())
    }
}
