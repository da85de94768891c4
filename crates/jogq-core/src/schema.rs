//! Field whitelists: which fields a query is allowed to reference.

use std::collections::BTreeSet;

use strsim::levenshtein;

use crate::record::Record;

/// Maximum Levenshtein distance to consider a field name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Fields of a jog entry.
pub const JOG_FIELDS: &[&str] = &["id", "date", "distance", "time", "user"];

/// Fields of a user account exposed to queries.
pub const USER_FIELDS: &[&str] = &[
    "id",
    "email",
    "first_name",
    "last_name",
    "role",
    "is_active",
];

/// Role value for administrators.
pub const ROLE_ADMIN: i64 = 1;

/// Role value for user managers.
pub const ROLE_USER_MANAGER: i64 = 2;

/// Role value for regular users (the default).
pub const ROLE_USER: i64 = 3;

/// The set of field names a query may reference.
///
/// Referencing a field outside the whitelist is rejected when the query is
/// compiled, before any record is looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldWhitelist {
    fields: BTreeSet<String>,
}

impl FieldWhitelist {
    /// Creates a whitelist from field names.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Whitelist for jog records.
    pub fn jogs() -> Self {
        Self::new(JOG_FIELDS.iter().copied())
    }

    /// Whitelist for user records.
    pub fn users() -> Self {
        Self::new(USER_FIELDS.iter().copied())
    }

    /// Derives a whitelist from the union of field names in `records`.
    pub fn from_records(records: &[Record]) -> Self {
        Self::new(
            records
                .iter()
                .flat_map(|r| r.field_names())
                .map(str::to_string),
        )
    }

    /// Returns true if `field` may be referenced.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Finds the closest whitelisted name for a rejected field, if any is close enough.
    pub fn suggest(&self, field: &str) -> Option<&str> {
        let (best, distance) = self
            .fields
            .iter()
            .map(|name| (name.as_str(), levenshtein(field, name)))
            .min_by_key(|(_, d)| *d)?;

        (distance > 0 && distance <= MAX_SUGGESTION_DISTANCE).then_some(best)
    }

    /// Iterates over the whitelisted names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Number of whitelisted fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if nothing is whitelisted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schemas() {
        let jogs = FieldWhitelist::jogs();
        assert!(jogs.contains("date"));
        assert!(jogs.contains("distance"));
        assert!(!jogs.contains("email"));

        let users = FieldWhitelist::users();
        assert!(users.contains("role"));
        assert!(!users.contains("password"));
    }

    #[test]
    fn test_from_records_is_union_of_keys() {
        let records = vec![
            Record::new().with("date", "2016-05-01"),
            Record::new().with("distance", 3).with("time", 1.5),
        ];
        let whitelist = FieldWhitelist::from_records(&records);
        let names: Vec<_> = whitelist.iter().collect();
        assert_eq!(names, vec!["date", "distance", "time"]);
    }

    #[test]
    fn test_suggest_close_match() {
        let whitelist = FieldWhitelist::jogs();
        assert_eq!(whitelist.suggest("distanc"), Some("distance"));
        assert_eq!(whitelist.suggest("dat"), Some("date"));
    }

    #[test]
    fn test_suggest_none_when_far_or_exact() {
        let whitelist = FieldWhitelist::jogs();
        assert_eq!(whitelist.suggest("unknown_field"), None);
        assert_eq!(whitelist.suggest("date"), None);
        assert_eq!(FieldWhitelist::default().suggest("date"), None);
    }
}
