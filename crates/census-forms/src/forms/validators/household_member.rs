use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::{household_structure_id, FormError, FormValidator};
use crate::forms::constants::{ALIVE, DEAD, FEMALE, HEAD_OF_HOUSEHOLD, MALE, UNKNOWN, YES};
use crate::forms::domain::{HouseholdStatus, HouseholdStructure, MemberInstance};
use crate::forms::engine::{ConditionalFieldValidator, ErrorCode, FieldError, Rule};
use crate::forms::record::CandidateRecord;
use crate::forms::relations::is_valid_relation;
use crate::forms::store::{todays_log_entry, Clock, HouseholdLogRequired, RecordStore};

pub const DEFAULT_HOH_MINIMUM_AGE: i64 = 18;

/// Questions that no longer apply once a member has moved out.
pub const MOVED_MEMBER_FIELDS: [&str; 4] = [
    "present_today",
    "inability_to_participate",
    "study_resident",
    "personal_details_changed",
];

const SURVIVAL_RULES: &[Rule] = &[
    Rule::applicable_if(ALIVE, "survival_status", "present_today"),
    Rule::applicable_if(ALIVE, "survival_status", "inability_to_participate"),
    Rule::applicable_if(ALIVE, "survival_status", "study_resident"),
    Rule::applicable_if(ALIVE, "survival_status", "relation"),
    Rule::not_applicable_if(DEAD, "survival_status", "present_today"),
];

const HAS_MOVED_RULES: &[Rule] = &[
    Rule::not_applicable_if(YES, "has_moved", MOVED_MEMBER_FIELDS[0]),
    Rule::not_applicable_if(YES, "has_moved", MOVED_MEMBER_FIELDS[1]),
    Rule::not_applicable_if(YES, "has_moved", MOVED_MEMBER_FIELDS[2]),
    Rule::not_applicable_if(YES, "has_moved", MOVED_MEMBER_FIELDS[3]),
];

const PERSONAL_DETAILS_RULES: &[Rule] = &[
    Rule::applicable_if(ALIVE, "survival_status", "personal_details_changed"),
    Rule::required_if(YES, "personal_details_changed", "details_change_reason"),
];

/// Enumeration form for a member of a household structure.
pub struct HouseholdMemberFormValidator<'a, S: ?Sized> {
    record: &'a CandidateRecord,
    instance: Option<&'a MemberInstance>,
    store: &'a S,
    report_datetime: DateTime<Utc>,
    unreadable_report_datetime: bool,
    hoh_minimum_age: i64,
}

impl<'a, S> HouseholdMemberFormValidator<'a, S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(
        record: &'a CandidateRecord,
        instance: Option<&'a MemberInstance>,
        store: &'a S,
        today_datetime: Option<DateTime<Utc>>,
        clock: &dyn Clock,
    ) -> Self {
        let submitted = match instance {
            Some(_) => None,
            None => record.datetime("report_datetime"),
        };
        let unreadable_report_datetime =
            instance.is_none() && submitted.is_none() && record.is_answered("report_datetime");
        let report_datetime = match instance {
            Some(instance) => today_datetime.unwrap_or(instance.report_datetime),
            None => submitted.or(today_datetime).unwrap_or_else(|| clock.now()),
        };

        Self {
            record,
            instance,
            store,
            report_datetime,
            unreadable_report_datetime,
            hoh_minimum_age: DEFAULT_HOH_MINIMUM_AGE,
        }
    }

    pub fn with_hoh_minimum_age(mut self, age: i64) -> Self {
        self.hoh_minimum_age = age;
        self
    }

    pub fn report_datetime(&self) -> DateTime<Utc> {
        self.report_datetime
    }

    fn validate_household_log(
        &self,
        engine: &mut ConditionalFieldValidator<'_>,
        structure: Option<&HouseholdStructure>,
    ) -> Result<(), FormError> {
        let entry = match structure {
            Some(structure) => todays_log_entry(self.store, &structure.id, self.report_datetime)?,
            None => None,
        };

        let Some(entry) = entry else {
            let missing = HouseholdLogRequired::on(self.report_datetime);
            return Err(engine
                .reject(FieldError::non_field(
                    ErrorCode::HouseholdLogEntry,
                    missing.to_string(),
                ))
                .into());
        };

        if entry.household_status == HouseholdStatus::RefusedEnumeration {
            return Err(engine
                .reject(FieldError::non_field(
                    ErrorCode::RefusedEnumeration,
                    "Household log entry for today shows household status as refused \
                     therefore you cannot add a member",
                ))
                .into());
        }
        Ok(())
    }

    /// Rejects adding a member who was already enumerated in an earlier survey round.
    fn validate_member_integrity_with_previous(
        &self,
        engine: &mut ConditionalFieldValidator<'_>,
        structure: Option<&HouseholdStructure>,
    ) -> Result<(), FormError> {
        let (None, Some(structure)) = (self.instance, structure) else {
            return Ok(());
        };

        let first_name = self.record.text("first_name");
        let initials = self.record.text("initials");
        let mut visited = HashSet::from([structure.id.clone()]);
        let mut previous = structure.previous.clone();

        while let Some(previous_id) = previous {
            if !visited.insert(previous_id.clone()) {
                warn!(
                    household_structure = %previous_id.0,
                    "survey iteration chain loops back on itself"
                );
                break;
            }
            let Some(prior) = self.store.household_structure(&previous_id)? else {
                break;
            };
            if self
                .store
                .find_household_member(&prior.id, first_name, initials)?
                .is_some()
            {
                return Err(engine
                    .reject(FieldError::non_field(
                        ErrorCode::UseImportTool,
                        format!(
                            "{} with initials {} was enumerated in {}. Please use the import \
                             tool to add this member to the current survey.",
                            first_name.unwrap_or_default(),
                            initials.unwrap_or_default(),
                            prior.survey_schedule
                        ),
                    ))
                    .into());
            }
            previous = prior.previous;
        }
        Ok(())
    }

    fn validate_age(&self, engine: &mut ConditionalFieldValidator<'_>) -> Result<(), FormError> {
        let age_in_years = self.record.integer("age_in_years").unwrap_or(0);
        let eligible_hoh = self.instance.map(|instance| instance.eligible_hoh).unwrap_or(false);

        if self.record.matches("relation", HEAD_OF_HOUSEHOLD) && age_in_years < self.hoh_minimum_age
        {
            engine.report(FieldError::field(
                "age_in_years",
                ErrorCode::HeadOfHouseholdAge,
                format!(
                    "Head of Household must be {} years or older.",
                    self.hoh_minimum_age
                ),
            ))?;
        } else if eligible_hoh && age_in_years < self.hoh_minimum_age {
            engine.report(FieldError::field(
                "age_in_years",
                ErrorCode::HeadOfHouseholdAge,
                format!(
                    "This household member completed the HoH questionnaire. You cannot \
                     change their age to less than {}. Got {age_in_years}.",
                    self.hoh_minimum_age
                ),
            ))?;
        }
        Ok(())
    }

    fn validate_relation_and_gender(
        &self,
        engine: &mut ConditionalFieldValidator<'_>,
    ) -> Result<(), FormError> {
        let (Some(relation), Some(gender)) =
            (self.record.text("relation"), self.record.text("gender"))
        else {
            return Ok(());
        };

        if is_valid_relation(relation, gender) == Some(false) {
            let label = match gender {
                MALE => "male",
                FEMALE => "female",
                _ => gender,
            };
            engine.report(FieldError::field(
                "relation",
                ErrorCode::InvalidRelation,
                format!("Invalid relation for {label}."),
            ))?;
        }
        Ok(())
    }

    fn validate_initials(
        &self,
        engine: &mut ConditionalFieldValidator<'_>,
    ) -> Result<(), FormError> {
        let (Some(first_name), Some(initials)) =
            (self.record.text("first_name"), self.record.text("initials"))
        else {
            return Ok(());
        };

        if first_name.chars().next() != initials.chars().next() {
            engine.report(FieldError::field(
                "initials",
                ErrorCode::InvalidInitials,
                "Invalid initials. First name does not match first initial.",
            ))?;
        }
        Ok(())
    }

    fn validate_not_deceased(
        &self,
        engine: &mut ConditionalFieldValidator<'_>,
    ) -> Result<(), FormError> {
        let claims_alive = self.record.matches("survival_status", ALIVE)
            || self.record.matches("survival_status", UNKNOWN);
        let Some(instance) = self.instance.filter(|_| claims_alive) else {
            return Ok(());
        };

        if let Some(deceased) = self.store.deceased_member(&instance.id)? {
            engine.report(FieldError::field(
                "survival_status",
                ErrorCode::ReportedDeceased,
                format!(
                    "Member was reported as deceased on {}",
                    deceased.site_aware_date.format("%Y-%m-%d")
                ),
            ))?;
        }
        Ok(())
    }
}

impl<S> FormValidator for HouseholdMemberFormValidator<'_, S>
where
    S: RecordStore + ?Sized,
{
    fn record(&self) -> &CandidateRecord {
        self.record
    }

    fn clean(&self, engine: &mut ConditionalFieldValidator<'_>) -> Result<(), FormError> {
        if self
            .instance
            .map(|instance| instance.enrollment_checklist_completed)
            .unwrap_or(false)
        {
            return Err(engine
                .reject(FieldError::non_field(
                    ErrorCode::EnrollmentChecklistCompleted,
                    "Enrollment checklist exists. This member may not be changed.",
                ))
                .into());
        }

        if self.unreadable_report_datetime {
            return Err(engine
                .reject(FieldError::field(
                    "report_datetime",
                    ErrorCode::InvalidReportDatetime,
                    "Enter a valid date/time.",
                ))
                .into());
        }

        let structure = match household_structure_id(self.record) {
            Some(id) => self.store.household_structure(&id)?,
            None => None,
        };

        self.validate_household_log(engine, structure.as_ref())?;
        self.validate_member_integrity_with_previous(engine, structure.as_ref())?;
        self.validate_age(engine)?;
        self.validate_relation_and_gender(engine)?;
        self.validate_initials(engine)?;
        self.validate_not_deceased(engine)?;

        engine.apply_all(SURVIVAL_RULES)?;
        engine.apply_all(HAS_MOVED_RULES)?;
        if self.record.contains("personal_details_changed") {
            engine.apply_all(PERSONAL_DETAILS_RULES)?;
        }
        Ok(())
    }
}
