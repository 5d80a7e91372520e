use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::config::ValidationConfig;
use crate::forms::constants::{ABLE_TO_PARTICIPATE, ALIVE, MALE, YES};
use crate::forms::domain::{
    DeceasedMember, HouseholdLogEntry, HouseholdMemberId, HouseholdMemberSummary, HouseholdStatus,
    HouseholdStructure, HouseholdStructureId, MemberInstance, RepresentativeEligibility,
};
use crate::forms::engine::ValidationError;
use crate::forms::record::CandidateRecord;
use crate::forms::service::FormValidationService;
use crate::forms::store::{FixedClock, RecordStore, StoreError};
use crate::forms::validators::FormError;

pub(super) const CURRENT_STRUCTURE: &str = "hs-2026";
pub(super) const PREVIOUS_STRUCTURE: &str = "hs-2025";

pub(super) fn today() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn structure_id(id: &str) -> HouseholdStructureId {
    HouseholdStructureId(id.to_string())
}

#[derive(Default)]
pub(super) struct MemoryStore {
    structures: Mutex<HashMap<HouseholdStructureId, HouseholdStructure>>,
    log_entries: Mutex<Vec<HouseholdLogEntry>>,
    eligibility: Mutex<Vec<RepresentativeEligibility>>,
    deceased: Mutex<Vec<DeceasedMember>>,
    members: Mutex<Vec<HouseholdMemberSummary>>,
}

impl MemoryStore {
    pub(super) fn add_structure(&self, id: &str, survey_schedule: &str, previous: Option<&str>) {
        self.structures.lock().expect("store mutex poisoned").insert(
            structure_id(id),
            HouseholdStructure {
                id: structure_id(id),
                survey_schedule: survey_schedule.to_string(),
                previous: previous.map(structure_id),
            },
        );
    }

    pub(super) fn add_log_entry(
        &self,
        structure: &str,
        report_datetime: DateTime<Utc>,
        status: HouseholdStatus,
    ) {
        self.log_entries
            .lock()
            .expect("store mutex poisoned")
            .push(HouseholdLogEntry {
                household_structure: structure_id(structure),
                report_datetime,
                household_status: status,
            });
    }

    pub(super) fn add_representative_eligibility(&self, structure: &str) {
        self.eligibility
            .lock()
            .expect("store mutex poisoned")
            .push(RepresentativeEligibility {
                household_structure: structure_id(structure),
                report_datetime: today(),
            });
    }

    pub(super) fn add_deceased(&self, member: &str, site_aware_date: NaiveDate) {
        self.deceased
            .lock()
            .expect("store mutex poisoned")
            .push(DeceasedMember {
                household_member: HouseholdMemberId(member.to_string()),
                site_aware_date,
            });
    }

    pub(super) fn add_member(&self, id: &str, structure: &str, first_name: &str, initials: &str) {
        self.members
            .lock()
            .expect("store mutex poisoned")
            .push(HouseholdMemberSummary {
                id: HouseholdMemberId(id.to_string()),
                household_structure: structure_id(structure),
                first_name: first_name.to_string(),
                initials: initials.to_string(),
            });
    }
}

impl RecordStore for MemoryStore {
    fn household_structure(
        &self,
        id: &HouseholdStructureId,
    ) -> Result<Option<HouseholdStructure>, StoreError> {
        let guard = self.structures.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn household_log_entries(
        &self,
        household_structure: &HouseholdStructureId,
    ) -> Result<Vec<HouseholdLogEntry>, StoreError> {
        let guard = self.log_entries.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .filter(|entry| &entry.household_structure == household_structure)
            .cloned()
            .collect())
    }

    fn representative_eligibility(
        &self,
        household_structure: &HouseholdStructureId,
    ) -> Result<Option<RepresentativeEligibility>, StoreError> {
        let guard = self.eligibility.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| &record.household_structure == household_structure)
            .cloned())
    }

    fn deceased_member(
        &self,
        household_member: &HouseholdMemberId,
    ) -> Result<Option<DeceasedMember>, StoreError> {
        let guard = self.deceased.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| &record.household_member == household_member)
            .cloned())
    }

    fn find_household_member(
        &self,
        household_structure: &HouseholdStructureId,
        first_name: Option<&str>,
        initials: Option<&str>,
    ) -> Result<Option<HouseholdMemberSummary>, StoreError> {
        let guard = self.members.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .find(|member| {
                &member.household_structure == household_structure
                    && Some(member.first_name.as_str()) == first_name
                    && Some(member.initials.as_str()) == initials
            })
            .cloned())
    }
}

pub(super) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn household_structure(
        &self,
        _id: &HouseholdStructureId,
    ) -> Result<Option<HouseholdStructure>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn household_log_entries(
        &self,
        _household_structure: &HouseholdStructureId,
    ) -> Result<Vec<HouseholdLogEntry>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn representative_eligibility(
        &self,
        _household_structure: &HouseholdStructureId,
    ) -> Result<Option<RepresentativeEligibility>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn deceased_member(
        &self,
        _household_member: &HouseholdMemberId,
    ) -> Result<Option<DeceasedMember>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn find_household_member(
        &self,
        _household_structure: &HouseholdStructureId,
        _first_name: Option<&str>,
        _initials: Option<&str>,
    ) -> Result<Option<HouseholdMemberSummary>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Current-round household linked to its previous-round iteration, with a log entry for today.
pub(super) fn household_ready_for_enumeration() -> MemoryStore {
    let store = MemoryStore::default();
    store.add_structure(PREVIOUS_STRUCTURE, "bcpp-year-1", None);
    store.add_structure(CURRENT_STRUCTURE, "bcpp-year-2", Some(PREVIOUS_STRUCTURE));
    store.add_log_entry(
        CURRENT_STRUCTURE,
        today() - Duration::hours(1),
        HouseholdStatus::EligibleRepresentativePresent,
    );
    store
}

pub(super) fn member_record() -> CandidateRecord {
    CandidateRecord::new()
        .with("household_structure", CURRENT_STRUCTURE)
        .with("first_name", "ERIK")
        .with("initials", "EX")
        .with("gender", MALE)
        .with("relation", "husband")
        .with("age_in_years", 34)
        .with("survival_status", ALIVE)
        .with("present_today", YES)
        .with("inability_to_participate", ABLE_TO_PARTICIPATE)
        .with("study_resident", YES)
}

pub(super) fn existing_member(id: &str) -> MemberInstance {
    MemberInstance::new(id, today() - Duration::days(30))
}

pub(super) fn rejection(result: Result<(), FormError>) -> ValidationError {
    match result {
        Err(FormError::Invalid(error)) => error,
        other => panic!("expected validation failure, got {other:?}"),
    }
}

pub(super) fn build_service(
    store: MemoryStore,
    config: ValidationConfig,
) -> FormValidationService<MemoryStore, FixedClock> {
    FormValidationService::new(Arc::new(store), Arc::new(FixedClock(today())), config)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
