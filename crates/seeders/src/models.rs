//! User records as read from the seed CSV.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Column holding the identifier recorded in the CSV. Never inserted.
pub const ID_COLUMN: &str = "id";

/// Column used to match seeded rows on revert.
pub const EMAIL_COLUMN: &str = "email";

/// One CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Identifier as recorded in the CSV, if the file has an `id` column.
    pub id: Option<String>,
    pub email: String,
    /// Remaining columns in header order.
    pub attributes: Vec<(String, String)>,
}

impl UserRecord {
    /// Copies the record into an insertable row, leaving the CSV id behind
    /// so the database assigns a fresh one.
    pub fn without_id(&self) -> NewUser {
        NewUser {
            email: self.email.clone(),
            attributes: self.attributes.clone(),
        }
    }

    /// Looks up a column value by name, `id` and `email` included.
    pub fn get(&self, column: &str) -> Option<&str> {
        match column {
            ID_COLUMN => self.id.as_deref(),
            EMAIL_COLUMN => Some(&self.email),
            _ => lookup(&self.attributes, column),
        }
    }
}

/// A user row ready for insertion. Has no `id` field at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub attributes: Vec<(String, String)>,
}

impl NewUser {
    /// Column names in insertion order: `email` first, then the attributes.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(EMAIL_COLUMN).chain(self.attributes.iter().map(|(name, _)| name.as_str()))
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        match column {
            EMAIL_COLUMN => Some(&self.email),
            _ => lookup(&self.attributes, column),
        }
    }
}

impl Serialize for NewUser {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len() + 1))?;
        map.serialize_entry(EMAIL_COLUMN, &self.email)?;
        for (name, value) in &self.attributes {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn lookup<'a>(attributes: &'a [(String, String)], column: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(name, _)| name == column)
        .map(|(_, value)| value.as_str())
}

/// The records loaded from the seed CSV for a single `apply` or `revert`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedBatch {
    records: Vec<UserRecord>,
}

impl SeedBatch {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insertable copies of every record, in CSV order.
    pub fn without_ids(&self) -> Vec<NewUser> {
        self.records.iter().map(UserRecord::without_id).collect()
    }

    /// Distinct emails in first-seen order.
    pub fn emails(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.email.as_str()))
            .map(|r| r.email.clone())
            .collect()
    }
}

/// Longest identifier PostgreSQL keeps; longer names are silently truncated.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Whether `name` can be used as a table or column name without escaping
/// beyond double quotes: ASCII letters, digits and `_`, not starting with a
/// digit, at most [`MAX_IDENTIFIER_LEN`] bytes.
pub fn is_identifier(name: &str) -> bool {
    if name.len() > MAX_IDENTIFIER_LEN {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
