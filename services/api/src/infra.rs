use census_forms::error::AppError;
use census_forms::forms::{
    DeceasedMember, ErrorMode, FormKind, HouseholdLogEntry, HouseholdMemberId,
    HouseholdMemberSummary, HouseholdStructure, HouseholdStructureId, MovedMemberPolicy,
    RecordStore, RepresentativeEligibility, StoreError,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Related survey records loaded from a JSON fixture file.
#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct RecordFixtures {
    #[serde(default)]
    pub(crate) structures: Vec<HouseholdStructure>,
    #[serde(default)]
    pub(crate) log_entries: Vec<HouseholdLogEntry>,
    #[serde(default)]
    pub(crate) representative_eligibility: Vec<RepresentativeEligibility>,
    #[serde(default)]
    pub(crate) deceased_members: Vec<DeceasedMember>,
    #[serde(default)]
    pub(crate) members: Vec<HouseholdMemberSummary>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    records: Arc<RwLock<RecordFixtures>>,
}

impl InMemoryRecordStore {
    pub(crate) fn from_fixtures(fixtures: RecordFixtures) -> Self {
        Self {
            records: Arc::new(RwLock::new(fixtures)),
        }
    }

    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let fixtures: RecordFixtures = serde_json::from_str(&raw)?;
        Ok(Self::from_fixtures(fixtures))
    }

    /// Empty store unless a fixture path was supplied.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    fn read<T>(&self, lookup: impl FnOnce(&RecordFixtures) -> T) -> Result<T, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".to_string()))?;
        Ok(lookup(&guard))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn household_structure(
        &self,
        id: &HouseholdStructureId,
    ) -> Result<Option<HouseholdStructure>, StoreError> {
        self.read(|records| {
            records
                .structures
                .iter()
                .find(|structure| &structure.id == id)
                .cloned()
        })
    }

    fn household_log_entries(
        &self,
        household_structure: &HouseholdStructureId,
    ) -> Result<Vec<HouseholdLogEntry>, StoreError> {
        self.read(|records| {
            records
                .log_entries
                .iter()
                .filter(|entry| &entry.household_structure == household_structure)
                .cloned()
                .collect()
        })
    }

    fn representative_eligibility(
        &self,
        household_structure: &HouseholdStructureId,
    ) -> Result<Option<RepresentativeEligibility>, StoreError> {
        let matches = self.read(|records| {
            records
                .representative_eligibility
                .iter()
                .filter(|record| &record.household_structure == household_structure)
                .cloned()
                .collect::<Vec<_>>()
        })?;
        if matches.len() > 1 {
            return Err(StoreError::MultipleObjectsReturned("representative eligibility"));
        }
        Ok(matches.into_iter().next())
    }

    fn deceased_member(
        &self,
        household_member: &HouseholdMemberId,
    ) -> Result<Option<DeceasedMember>, StoreError> {
        self.read(|records| {
            records
                .deceased_members
                .iter()
                .find(|record| &record.household_member == household_member)
                .cloned()
        })
    }

    fn find_household_member(
        &self,
        household_structure: &HouseholdStructureId,
        first_name: Option<&str>,
        initials: Option<&str>,
    ) -> Result<Option<HouseholdMemberSummary>, StoreError> {
        self.read(|records| {
            records
                .members
                .iter()
                .find(|member| {
                    &member.household_structure == household_structure
                        && Some(member.first_name.as_str()) == first_name
                        && Some(member.initials.as_str()) == initials
                })
                .cloned()
        })
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

pub(crate) fn parse_form(raw: &str) -> Result<FormKind, String> {
    FormKind::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = FormKind::ALL.iter().map(|kind| kind.label()).collect();
        format!("unknown form '{raw}' (expected one of {})", known.join(", "))
    })
}

pub(crate) fn parse_error_mode(raw: &str) -> Result<ErrorMode, String> {
    ErrorMode::parse(raw).ok_or_else(|| format!("unknown error mode '{raw}'"))
}

pub(crate) fn parse_policy(raw: &str) -> Result<MovedMemberPolicy, String> {
    MovedMemberPolicy::parse(raw).ok_or_else(|| format!("unknown moved member policy '{raw}'"))
}
