//! Response vocabulary shared by every census form.

pub const YES: &str = "Yes";
pub const NO: &str = "No";

/// Reserved answer meaning the question does not apply given other answers.
pub const NOT_APPLICABLE: &str = "N/A";

/// Categorical answer that requires a free-text companion field.
pub const OTHER: &str = "OTHER";

pub const ALIVE: &str = "alive";
pub const DEAD: &str = "dead";
pub const UNKNOWN: &str = "UNKNOWN";

pub const MALE: &str = "M";
pub const FEMALE: &str = "F";

pub const HEAD_OF_HOUSEHOLD: &str = "HEAD";
pub const ABLE_TO_PARTICIPATE: &str = "ABLE to participate";

/// Error key used for messages that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "__all__";
