//! Relation-to-head-of-household vocabulary and its gendered subsets.

use super::constants::{FEMALE, HEAD_OF_HOUSEHOLD, MALE, NOT_APPLICABLE, UNKNOWN};

pub const RELATIONS: &[(&str, &str)] = &[
    (HEAD_OF_HOUSEHOLD, "Head of household"),
    ("wife", "Wife"),
    ("husband", "Husband"),
    ("partner", "Partner"),
    ("son", "Son"),
    ("daughter", "Daughter"),
    ("son_in_law", "Son-in-law"),
    ("daughter_in_law", "Daughter-in-law"),
    ("grandson", "Grandson"),
    ("granddaughter", "Granddaughter"),
    ("brother", "Brother"),
    ("sister", "Sister"),
    ("brother_in_law", "Brother-in-law"),
    ("sister_in_law", "Sister-in-law"),
    ("father", "Father"),
    ("mother", "Mother"),
    ("father_in_law", "Father-in-law"),
    ("mother_in_law", "Mother-in-law"),
    ("grandfather", "Grandfather"),
    ("grandmother", "Grandmother"),
    ("nephew", "Nephew"),
    ("niece", "Niece"),
    ("cousin", "Cousin"),
    ("unrelated", "Not related"),
    (UNKNOWN, "Unknown"),
];

pub const MALE_RELATIONS: &[&str] = &[
    "husband",
    "son",
    "son_in_law",
    "grandson",
    "brother",
    "brother_in_law",
    "father",
    "father_in_law",
    "grandfather",
    "nephew",
];

pub const FEMALE_RELATIONS: &[&str] = &[
    "wife",
    "daughter",
    "daughter_in_law",
    "granddaughter",
    "sister",
    "sister_in_law",
    "mother",
    "mother_in_law",
    "grandmother",
    "niece",
];

/// Relations a member of the given gender may hold.
pub fn relations_for(gender: &str) -> Vec<&'static str> {
    let excluded = match gender {
        MALE => FEMALE_RELATIONS,
        FEMALE => MALE_RELATIONS,
        _ => &[],
    };
    RELATIONS
        .iter()
        .map(|(value, _)| *value)
        .filter(|value| !excluded.contains(value))
        .collect()
}

/// `None` when the gender places no constraint on the relation.
pub fn is_valid_relation(relation: &str, gender: &str) -> Option<bool> {
    if relation == NOT_APPLICABLE || (gender != MALE && gender != FEMALE) {
        return None;
    }
    Some(relations_for(gender).contains(&relation))
}
