use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Older form builds posted the school fields with a numeric prefix.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("tenth_board", "10th_board"),
    ("tenth_marks", "10th_marks"),
    ("tenth_year", "10th_year"),
    ("twelfth_board", "12th_board"),
    ("twelfth_marks", "12th_marks"),
    ("twelfth_year", "12th_year"),
];

/// Applicant answers as posted by the form. No schema is enforced:
/// every lookup degrades to the empty string when a field is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserData(BTreeMap<String, String>);

impl UserData {
    /// Returns the trimmed value of `field`, falling back to its legacy alias
    /// and, for `state`, to the state component of `address`.
    pub fn get(&self, field: &str) -> String {
        if let Some(value) = self.raw(field) {
            return value.to_string();
        }

        if let Some((_, alias)) = FIELD_ALIASES.iter().find(|(key, _)| *key == field) {
            if let Some(value) = self.raw(alias) {
                return value.to_string();
            }
        }

        if field == "state" {
            return state_from_address(&self.get("address"));
        }

        String::new()
    }

    /// Like [`UserData::get`] but substitutes `default` for an empty value.
    pub fn get_or(&self, field: &str, default: &str) -> String {
        let value = self.get(field);
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Applicant name used in filenames and document metadata.
    pub fn display_name(&self) -> String {
        self.get_or("name", "unnamed")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn raw(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for UserData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// "12 MG Road, Pune, Maharashtra, 411001" -> "Maharashtra".
fn state_from_address(address: &str) -> String {
    let parts: Vec<&str> = address.split(',').collect();
    if parts.len() >= 2 {
        parts[parts.len() - 2].trim().to_string()
    } else {
        String::new()
    }
}
