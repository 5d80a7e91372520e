use super::common::rejection;
use crate::forms::constants::{NO, NOT_APPLICABLE, OTHER, YES};
use crate::forms::engine::{ErrorCode, ErrorMode};
use crate::forms::record::CandidateRecord;
use crate::forms::validators::{
    DeceasedMemberFormValidator, FormValidator, HtcMemberFormValidator,
};

fn deceased_report() -> CandidateRecord {
    CandidateRecord::new()
        .with("household_member", "hm-1")
        .with("report_datetime", "2026-03-02T09:30:00Z")
        .with("death_date", "2026-02-20")
        .with("site_aware_date", "2026-02-21")
        .with("death_cause", "Natural")
        .with("duration_of_illness", 60)
        .with("relationship_death_study", "Definitely not related")
        .with("extra_death_info", "blah blah")
        .with("extra_death_info_date", "2026-02-22")
}

fn htc_report() -> CandidateRecord {
    CandidateRecord::new()
        .with("offered", YES)
        .with("accepted", YES)
        .with("referred", YES)
        .with("referral_clinic", "Molepolole clinic")
}

#[test]
fn deceased_report_accepted() {
    let record = deceased_report();
    DeceasedMemberFormValidator::new(&record)
        .validate(ErrorMode::FailFast)
        .expect("deceased report accepted");
}

#[test]
fn extra_death_info_requires_date() {
    let record = deceased_report().with("extra_death_info_date", None::<&str>);
    let error = rejection(DeceasedMemberFormValidator::new(&record).validate(ErrorMode::FailFast));
    assert!(error.contains("extra_death_info_date"));
}

#[test]
fn missing_extra_death_info_skips_date() {
    let record = deceased_report()
        .with("extra_death_info", None::<&str>)
        .with("extra_death_info_date", None::<&str>);
    DeceasedMemberFormValidator::new(&record)
        .validate(ErrorMode::FailFast)
        .expect("no extra info, no date");
}

#[test]
fn other_death_cause_requires_specification() {
    let record = deceased_report().with("death_cause", OTHER);
    let error = rejection(DeceasedMemberFormValidator::new(&record).validate(ErrorMode::FailFast));
    assert!(error.contains("death_cause_other"));
    assert!(error.has_code(ErrorCode::OtherSpecifyRequired));
}

#[test]
fn htc_report_accepted() {
    let record = htc_report();
    HtcMemberFormValidator::new(&record)
        .validate(ErrorMode::FailFast)
        .expect("htc report accepted");
}

#[test]
fn refusal_reason_required_when_testing_declined() {
    let record = htc_report().with("accepted", NO);
    let error = rejection(HtcMemberFormValidator::new(&record).validate(ErrorMode::FailFast));
    assert!(error.contains("refusal_reason"));
}

#[test]
fn referral_applicable_when_testing_offered() {
    let record = htc_report().with("referred", NOT_APPLICABLE);
    let error = rejection(HtcMemberFormValidator::new(&record).validate(ErrorMode::FailFast));
    assert!(error.contains("referred"));
    assert!(error.has_code(ErrorCode::UnexpectedNotApplicable));
}

#[test]
fn referral_clinic_required_when_referred() {
    let record = htc_report().with("referral_clinic", "");
    let error = rejection(HtcMemberFormValidator::new(&record).validate(ErrorMode::FailFast));
    assert!(error.contains("referral_clinic"));
}

#[test]
fn htc_collect_all_reports_refusal_and_clinic() {
    let record = htc_report()
        .with("accepted", NO)
        .with("referral_clinic", None::<&str>);
    let error = rejection(HtcMemberFormValidator::new(&record).validate(ErrorMode::CollectAll));
    let keys: Vec<&str> = error.errors().keys().collect();
    assert_eq!(keys, vec!["refusal_reason", "referral_clinic"]);
}
