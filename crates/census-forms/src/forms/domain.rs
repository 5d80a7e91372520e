use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one household's enumeration context for a survey round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseholdStructureId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseholdMemberId(pub String);

/// Household enumeration context linked to the iteration of the previous survey round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdStructure {
    pub id: HouseholdStructureId,
    pub survey_schedule: String,
    #[serde(default)]
    pub previous: Option<HouseholdStructureId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdStatus {
    EligibleRepresentativePresent,
    EligibleRepresentativeAbsent,
    NoHouseholdInformant,
    RefusedEnumeration,
}

/// Visit recorded against a household structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdLogEntry {
    pub household_structure: HouseholdStructureId,
    pub report_datetime: DateTime<Utc>,
    pub household_status: HouseholdStatus,
}

/// Previously persisted household member being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInstance {
    pub id: HouseholdMemberId,
    pub report_datetime: DateTime<Utc>,
    #[serde(default)]
    pub enrollment_checklist_completed: bool,
    #[serde(default)]
    pub eligible_hoh: bool,
    #[serde(default)]
    pub has_moved: Option<String>,
    #[serde(default)]
    pub present_today: Option<String>,
}

impl MemberInstance {
    pub fn new(id: &str, report_datetime: DateTime<Utc>) -> Self {
        Self {
            id: HouseholdMemberId(id.to_string()),
            report_datetime,
            enrollment_checklist_completed: false,
            eligible_hoh: false,
            has_moved: None,
            present_today: None,
        }
    }
}

/// Member enumerated in a household structure, as found by a store lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdMemberSummary {
    pub id: HouseholdMemberId,
    pub household_structure: HouseholdStructureId,
    pub first_name: String,
    pub initials: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeceasedMember {
    pub household_member: HouseholdMemberId,
    pub site_aware_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeEligibility {
    pub household_structure: HouseholdStructureId,
    pub report_datetime: DateTime<Utc>,
}

impl RepresentativeEligibility {
    pub const VERBOSE_NAME: &'static str = "Representative Eligibility";
}
