use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::constants::NOT_APPLICABLE;

/// Single answer captured on a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Null and blank text count as "no answer"; every other value is an answer.
    pub fn is_answered(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Text(value) => !value.trim().is_empty(),
            FieldValue::Boolean(_) | FieldValue::Integer(_) | FieldValue::Decimal(_) => true,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        self.as_text() == Some(NOT_APPLICABLE)
    }

    pub fn matches(&self, expected: &str) -> bool {
        self.as_text() == Some(expected)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Cleaned input of one in-progress submission, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl CandidateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// True when the field was submitted at all, even as null.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_answered(&self, field: &str) -> bool {
        self.get(field).map(FieldValue::is_answered).unwrap_or(false)
    }

    /// An answer that satisfies a requirement: present and not `N/A`.
    pub fn is_provided(&self, field: &str) -> bool {
        self.get(field)
            .map(|value| value.is_answered() && !value.is_not_applicable())
            .unwrap_or(false)
    }

    pub fn is_not_applicable(&self, field: &str) -> bool {
        self.get(field)
            .map(FieldValue::is_not_applicable)
            .unwrap_or(false)
    }

    pub fn matches(&self, field: &str, expected: &str) -> bool {
        self.get(field)
            .map(|value| value.matches(expected))
            .unwrap_or(false)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(FieldValue::as_text)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_integer)
    }

    /// RFC 3339 timestamps, or `YYYY-MM-DD` dates taken as UTC midnight.
    pub fn datetime(&self, field: &str) -> Option<DateTime<Utc>> {
        let raw = self.text(field)?.trim();
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CandidateRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}
