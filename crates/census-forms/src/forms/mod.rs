//! Conditional field validation for the household census member forms.
//!
//! Each form supplies an ordered rule list interpreted by
//! [`engine::ConditionalFieldValidator`], plus a few structural checks that
//! consult related records through [`store::RecordStore`].

pub mod constants;
pub mod domain;
pub mod engine;
pub mod record;
pub mod relations;
pub mod router;
pub mod service;
pub mod store;
pub mod validators;

#[cfg(test)]
mod tests;

pub use domain::{
    DeceasedMember, HouseholdLogEntry, HouseholdMemberId, HouseholdMemberSummary, HouseholdStatus,
    HouseholdStructure, HouseholdStructureId, MemberInstance, RepresentativeEligibility,
};
pub use engine::{
    ConditionalFieldValidator, ErrorCode, ErrorKind, ErrorMode, FieldError, FieldErrorSet, Rule,
    ValidationError,
};
pub use record::{CandidateRecord, FieldValue};
pub use router::form_router;
pub use service::{
    FormKind, FormServiceError, FormSubmission, FormValidationService, ValidationReport,
};
pub use store::{
    todays_log_entry, Clock, FixedClock, HouseholdLogRequired, RecordStore, StoreError,
    SystemClock,
};
pub use validators::{FormError, FormValidator, MovedMemberPolicy};
