use chrono::{DateTime, Utc};

use super::domain::{
    DeceasedMember, HouseholdLogEntry, HouseholdMemberId, HouseholdMemberSummary,
    HouseholdStructure, HouseholdStructureId, RepresentativeEligibility,
};

/// Read-only point queries against the census data store.
pub trait RecordStore: Send + Sync {
    fn household_structure(
        &self,
        id: &HouseholdStructureId,
    ) -> Result<Option<HouseholdStructure>, StoreError>;

    fn household_log_entries(
        &self,
        household_structure: &HouseholdStructureId,
    ) -> Result<Vec<HouseholdLogEntry>, StoreError>;

    fn representative_eligibility(
        &self,
        household_structure: &HouseholdStructureId,
    ) -> Result<Option<RepresentativeEligibility>, StoreError>;

    fn deceased_member(
        &self,
        household_member: &HouseholdMemberId,
    ) -> Result<Option<DeceasedMember>, StoreError>;

    fn find_household_member(
        &self,
        household_structure: &HouseholdStructureId,
        first_name: Option<&str>,
        initials: Option<&str>,
    ) -> Result<Option<HouseholdMemberSummary>, StoreError>;
}

/// Failure reported by the backing store; never retried by validators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("multiple records returned for {0}")]
    MultipleObjectsReturned(&'static str),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Household log entry for today is required. Got report date {report_date}.")]
pub struct HouseholdLogRequired {
    pub report_date: String,
}

impl HouseholdLogRequired {
    pub fn on(report_datetime: DateTime<Utc>) -> Self {
        Self {
            report_date: report_datetime.date_naive().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Most recent log entry recorded on the same calendar day as `report_datetime`.
pub fn todays_log_entry<S>(
    store: &S,
    household_structure: &HouseholdStructureId,
    report_datetime: DateTime<Utc>,
) -> Result<Option<HouseholdLogEntry>, StoreError>
where
    S: RecordStore + ?Sized,
{
    let report_date = report_datetime.date_naive();
    let entry = store
        .household_log_entries(household_structure)?
        .into_iter()
        .filter(|entry| entry.report_datetime.date_naive() == report_date)
        .max_by_key(|entry| entry.report_datetime);
    Ok(entry)
}

/// Source of the current timestamp for defaulted report datetimes.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::domain::HouseholdStatus;
    use chrono::TimeZone;

    struct LogOnlyStore {
        entries: Vec<HouseholdLogEntry>,
    }

    impl RecordStore for LogOnlyStore {
        fn household_structure(
            &self,
            _id: &HouseholdStructureId,
        ) -> Result<Option<HouseholdStructure>, StoreError> {
            Ok(None)
        }

        fn household_log_entries(
            &self,
            household_structure: &HouseholdStructureId,
        ) -> Result<Vec<HouseholdLogEntry>, StoreError> {
            Ok(self
                .entries
                .iter()
                .filter(|entry| &entry.household_structure == household_structure)
                .cloned()
                .collect())
        }

        fn representative_eligibility(
            &self,
            _household_structure: &HouseholdStructureId,
        ) -> Result<Option<RepresentativeEligibility>, StoreError> {
            Ok(None)
        }

        fn deceased_member(
            &self,
            _household_member: &HouseholdMemberId,
        ) -> Result<Option<DeceasedMember>, StoreError> {
            Ok(None)
        }

        fn find_household_member(
            &self,
            _household_structure: &HouseholdStructureId,
            _first_name: Option<&str>,
            _initials: Option<&str>,
        ) -> Result<Option<HouseholdMemberSummary>, StoreError> {
            Ok(None)
        }
    }

    fn entry(day: u32, hour: u32, status: HouseholdStatus) -> HouseholdLogEntry {
        HouseholdLogEntry {
            household_structure: HouseholdStructureId("hs-1".to_string()),
            report_datetime: Utc
                .with_ymd_and_hms(2026, 3, day, hour, 0, 0)
                .single()
                .expect("valid timestamp"),
            household_status: status,
        }
    }

    #[test]
    fn picks_latest_entry_on_report_day() {
        let store = LogOnlyStore {
            entries: vec![
                entry(1, 9, HouseholdStatus::EligibleRepresentativePresent),
                entry(2, 8, HouseholdStatus::EligibleRepresentativeAbsent),
                entry(2, 15, HouseholdStatus::RefusedEnumeration),
            ],
        };
        let report = Utc
            .with_ymd_and_hms(2026, 3, 2, 17, 0, 0)
            .single()
            .expect("valid timestamp");

        let found = todays_log_entry(&store, &HouseholdStructureId("hs-1".to_string()), report)
            .expect("lookup succeeds")
            .expect("entry for today");
        assert_eq!(found.household_status, HouseholdStatus::RefusedEnumeration);
    }

    #[test]
    fn returns_none_without_entry_for_day() {
        let store = LogOnlyStore {
            entries: vec![entry(1, 9, HouseholdStatus::EligibleRepresentativePresent)],
        };
        let report = Utc
            .with_ymd_and_hms(2026, 3, 5, 9, 0, 0)
            .single()
            .expect("valid timestamp");

        let found = todays_log_entry(&store, &HouseholdStructureId("hs-1".to_string()), report)
            .expect("lookup succeeds");
        assert!(found.is_none());
        assert_eq!(
            HouseholdLogRequired::on(report).to_string(),
            "Household log entry for today is required. Got report date 2026-03-05."
        );
    }
}
