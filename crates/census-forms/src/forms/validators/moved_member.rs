use serde::{Deserialize, Serialize};

use super::household_member::MOVED_MEMBER_FIELDS;
use super::{FormError, FormValidator};
use crate::forms::constants::{NO, YES};
use crate::forms::domain::MemberInstance;
use crate::forms::engine::{ConditionalFieldValidator, ErrorCode, FieldError, Rule};
use crate::forms::record::CandidateRecord;

/// Which of the historical moved-member rule sets to enforce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovedMemberPolicy {
    /// Only the stored `has_moved` guard.
    GuardOnly,
    /// Guard passes when the stored member is either moved or absent today; community rules apply.
    PresenceGated,
    /// `has_moved` guard, community rules and the not-applicable cascade.
    #[default]
    Cascade,
}

impl MovedMemberPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "guard_only" | "guard-only" => Some(Self::GuardOnly),
            "presence_gated" | "presence-gated" => Some(Self::PresenceGated),
            "cascade" => Some(Self::Cascade),
            _ => None,
        }
    }
}

const COMMUNITY_RULES: &[Rule] = &[
    Rule::required_if(YES, "moved_community", "new_community"),
    Rule::required_if(YES, "moved_household", "moved_community"),
];

const DETAILS_CHANGE_REASON: &str = "details_change_reason";

const CASCADE_RULES: &[Rule] = &[
    Rule::not_required_if(NO, "moved_community", "new_community"),
    Rule::not_applicable_if(YES, "has_moved", DETAILS_CHANGE_REASON),
    Rule::not_applicable_if(YES, "has_moved", MOVED_MEMBER_FIELDS[1]),
    Rule::not_applicable_if(YES, "has_moved", MOVED_MEMBER_FIELDS[2]),
    Rule::not_applicable_if(YES, "has_moved", MOVED_MEMBER_FIELDS[3]),
    Rule::not_applicable_if(NO, "present_today", DETAILS_CHANGE_REASON),
    Rule::not_applicable_if(NO, "present_today", MOVED_MEMBER_FIELDS[1]),
    Rule::not_applicable_if(NO, "present_today", MOVED_MEMBER_FIELDS[2]),
    Rule::not_applicable_if(NO, "present_today", MOVED_MEMBER_FIELDS[3]),
];

/// Report on a member who left the household; only members already flagged as moved may be edited.
pub struct MovedMemberFormValidator<'a> {
    record: &'a CandidateRecord,
    instance: Option<&'a MemberInstance>,
    policy: MovedMemberPolicy,
}

impl<'a> MovedMemberFormValidator<'a> {
    pub fn new(
        record: &'a CandidateRecord,
        instance: Option<&'a MemberInstance>,
        policy: MovedMemberPolicy,
    ) -> Self {
        Self {
            record,
            instance,
            policy,
        }
    }

    fn guard_rejects(&self, instance: &MemberInstance) -> bool {
        let has_moved = instance.has_moved.as_deref() == Some(YES);
        match self.policy {
            MovedMemberPolicy::GuardOnly | MovedMemberPolicy::Cascade => !has_moved,
            MovedMemberPolicy::PresenceGated => {
                !has_moved && instance.present_today.as_deref() != Some(NO)
            }
        }
    }
}

impl FormValidator for MovedMemberFormValidator<'_> {
    fn record(&self) -> &CandidateRecord {
        self.record
    }

    fn clean(&self, engine: &mut ConditionalFieldValidator<'_>) -> Result<(), FormError> {
        if let Some(instance) = self.instance.filter(|instance| self.guard_rejects(instance)) {
            return Err(engine
                .reject(FieldError::non_field(
                    ErrorCode::HouseholdMemberHasMoved,
                    format!(
                        "Household Member {} does not indicate that this member has moved",
                        instance.id.0
                    ),
                ))
                .into());
        }

        if self.policy == MovedMemberPolicy::GuardOnly {
            return Ok(());
        }

        engine.apply_all(COMMUNITY_RULES)?;

        if self.policy == MovedMemberPolicy::Cascade {
            if self.record.matches("moved_household", NO)
                && self.record.matches("moved_community", YES)
            {
                engine.report(FieldError::field(
                    "moved_community",
                    ErrorCode::MovedCommunityConflict,
                    "You have indicated that the participant has NOT moved out of the household \
                     but HAS moved out of the community. Please correct.",
                ))?;
            }
            engine.apply_all(CASCADE_RULES)?;
        }
        Ok(())
    }
}
