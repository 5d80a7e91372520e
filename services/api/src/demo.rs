use crate::infra::{
    parse_error_mode, parse_form, parse_policy, parse_timestamp, InMemoryRecordStore,
    RecordFixtures,
};
use census_forms::config::{AppConfig, ValidationConfig};
use census_forms::error::AppError;
use census_forms::forms::{
    CandidateRecord, ErrorMode, FormKind, FormSubmission, FormValidationService,
    HouseholdLogEntry, HouseholdMemberId, HouseholdMemberSummary, HouseholdStatus,
    HouseholdStructure, HouseholdStructureId, MemberInstance, MovedMemberPolicy, SystemClock,
    ValidationReport,
};
use census_forms::forms::{Clock, FixedClock};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Form to validate (e.g. household_member, moved-member)
    #[arg(long, value_parser = parse_form)]
    pub(crate) form: FormKind,
    /// JSON submission: {"record": {...}, "instance": {...}, "today_datetime": "..."}
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// JSON file with related survey records backing the store lookups
    #[arg(long)]
    pub(crate) fixtures: Option<PathBuf>,
    /// Override the configured error mode (fail_fast or collect_all)
    #[arg(long, value_parser = parse_error_mode)]
    pub(crate) mode: Option<ErrorMode>,
    /// Override the configured moved member policy
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<MovedMemberPolicy>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Visit timestamp (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) today: Option<DateTime<Utc>>,
    /// Report every violation instead of stopping at the first one.
    #[arg(long)]
    pub(crate) collect_all: bool,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs {
        form,
        record,
        fixtures,
        mode,
        policy,
    } = args;

    let mut validation = AppConfig::load()?.validation;
    if let Some(mode) = mode {
        validation.error_mode = mode;
    }
    if let Some(policy) = policy {
        validation.moved_member_policy = policy;
    }

    let raw = fs::read_to_string(&record)?;
    let submission: FormSubmission = serde_json::from_str(&raw)?;
    let store = Arc::new(InMemoryRecordStore::load(fixtures.as_deref())?);
    let service = FormValidationService::new(store, Arc::new(SystemClock), validation);

    let report = service.validate(form, &submission)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, collect_all } = args;
    let today = today.unwrap_or_else(|| SystemClock.now());

    let validation = ValidationConfig {
        error_mode: if collect_all {
            ErrorMode::CollectAll
        } else {
            ErrorMode::FailFast
        },
        ..ValidationConfig::default()
    };
    let store = Arc::new(demo_household(today));
    let service = FormValidationService::new(store, Arc::new(FixedClock(today)), validation);

    println!("Household census form demo");
    println!("Visit recorded {} ({:?})", today.to_rfc3339(), service.config().error_mode);

    for scenario in scenarios(today) {
        let report = service.validate(scenario.form, &scenario.submission)?;
        render_report(scenario.title, &report);
    }
    Ok(())
}

struct Scenario {
    title: &'static str,
    form: FormKind,
    submission: FormSubmission,
}

fn demo_household(today: DateTime<Utc>) -> InMemoryRecordStore {
    let previous = HouseholdStructureId("plot-0117-y1".to_string());
    let current = HouseholdStructureId("plot-0117-y2".to_string());

    InMemoryRecordStore::from_fixtures(RecordFixtures {
        structures: vec![
            HouseholdStructure {
                id: previous.clone(),
                survey_schedule: "bcpp-year-1".to_string(),
                previous: None,
            },
            HouseholdStructure {
                id: current.clone(),
                survey_schedule: "bcpp-year-2".to_string(),
                previous: Some(previous.clone()),
            },
        ],
        log_entries: vec![HouseholdLogEntry {
            household_structure: current,
            report_datetime: today,
            household_status: HouseholdStatus::EligibleRepresentativePresent,
        }],
        members: vec![HouseholdMemberSummary {
            id: HouseholdMemberId("hm-0117-01".to_string()),
            household_structure: previous,
            first_name: "TEBOGO".to_string(),
            initials: "TK".to_string(),
        }],
        ..RecordFixtures::default()
    })
}

fn member(first_name: &str, initials: &str) -> CandidateRecord {
    CandidateRecord::new()
        .with("household_structure", "plot-0117-y2")
        .with("first_name", first_name)
        .with("initials", initials)
        .with("gender", "M")
        .with("relation", "son")
        .with("age_in_years", 23)
        .with("survival_status", "alive")
        .with("present_today", "Yes")
        .with("inability_to_participate", "ABLE to participate")
        .with("study_resident", "Yes")
}

fn scenarios(today: DateTime<Utc>) -> Vec<Scenario> {
    let mut moved = MemberInstance::new("hm-0117-04", today - Duration::days(90));
    moved.has_moved = Some("Yes".to_string());

    vec![
        Scenario {
            title: "New member enumerated",
            form: FormKind::HouseholdMember,
            submission: FormSubmission::new(member("OARABILE", "OK")),
        },
        Scenario {
            title: "Member already enumerated last round",
            form: FormKind::HouseholdMember,
            submission: FormSubmission::new(member("TEBOGO", "TK")),
        },
        Scenario {
            title: "Alive member with inconsistent answers",
            form: FormKind::HouseholdMember,
            submission: FormSubmission::new(
                member("OARABILE", "XK")
                    .with("present_today", "N/A")
                    .with("relation", "daughter"),
            ),
        },
        Scenario {
            title: "Household info before representative eligibility",
            form: FormKind::HouseholdInfo,
            submission: FormSubmission::new(
                CandidateRecord::new().with("household_structure", "plot-0117-y2"),
            ),
        },
        Scenario {
            title: "Moved member leaving the community",
            form: FormKind::MovedMember,
            submission: FormSubmission::new(
                CandidateRecord::new()
                    .with("moved_household", "Yes")
                    .with("moved_community", "Yes")
                    .with("new_community", "Mmathethe"),
            )
            .editing(moved),
        },
        Scenario {
            title: "HTC referral without clinic",
            form: FormKind::HtcMember,
            submission: FormSubmission::new(
                CandidateRecord::new()
                    .with("offered", "Yes")
                    .with("accepted", "Yes")
                    .with("referred", "Yes"),
            ),
        },
    ]
}

fn render_report(title: &str, report: &ValidationReport) {
    let verdict = if report.accepted { "accepted" } else { "rejected" };
    println!("\n{title} [{}] -> {verdict}", report.form);
    for error in report.errors.iter() {
        println!("  - {} ({}): {}", error.key, error.code, error.message);
    }
}
