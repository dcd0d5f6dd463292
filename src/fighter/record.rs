use std::fmt;

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::{Map, Value};

use super::value::{coerce, FieldValue};

/// One CSV line as read from the export: column name to raw text, in column order.
///
/// Column names are unique. When a header repeats, the last value wins and
/// the column keeps the place of its first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    position: usize,
    fields: Vec<(String, String)>,
}

impl RawRow {
    /// `position` is the 1-based index of the row among the data rows of the file.
    pub fn new(position: usize, fields: Vec<(String, String)>) -> Self {
        let mut unique: Vec<(String, String)> = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            match unique.iter_mut().find(|(name, _)| *name == key) {
                Some(slot) => slot.1 = value,
                None => unique.push((key, value)),
            }
        }
        Self {
            position,
            fields: unique,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// A raw row with every value coerced to its type.
///
/// Blank column names and absent values are left out, so a typed row never
/// holds a null or an empty key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedRow {
    fields: Vec<(String, FieldValue)>,
}

impl TypedRow {
    pub fn from_raw(row: &RawRow) -> Self {
        let fields = row
            .fields()
            .filter(|(key, _)| !key.trim().is_empty())
            .filter_map(|(key, text)| coerce(Some(text)).map(|value| (key.to_string(), value)))
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Key of a document in the destination collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity used when a row carries neither `_id` nor `fighterCode`.
    pub fn positional(position: usize) -> Self {
        Self(format!("fighter_{position}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document ready to be stored: its identity and its payload.
///
/// The payload never contains `_id`; the identity is stored there instead.
/// It serializes as one JSON object with `_id` first.
#[derive(Debug, Clone, PartialEq)]
pub struct FighterDocument {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
}

impl FighterDocument {
    pub fn new(id: DocumentId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }
}

impl Serialize for FighterDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("_id", self.id.as_str())?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use crate::fighter::value::FieldValue;

    use super::{DocumentId, FighterDocument, RawRow, TypedRow};

    fn row(fields: &[(&str, &str)]) -> RawRow {
        RawRow::new(
            1,
            fields
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn last_duplicate_column_wins_in_first_place() {
        let row = row(&[("Wins", "1"), ("Losses", "0"), ("Wins", "")]);

        assert_eq!(row.get("Wins"), Some(""));
        assert_eq!(row.get("Draws"), None);
        let keys: Vec<&str> = row.fields().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["Wins", "Losses"]);
    }

    #[test]
    fn typed_row_drops_blank_keys_and_absent_values() {
        let typed = TypedRow::from_raw(&row(&[
            ("", "x"),
            ("  ", "y"),
            ("Wins", "10"),
            ("Losses", ""),
            ("Stance", "Orthodox"),
        ]));

        assert_eq!(typed.len(), 2);
        assert_eq!(typed.get("Wins"), Some(&FieldValue::Integer(10)));
        assert_eq!(typed.get("Losses"), None);
        assert!(typed.iter().all(|(key, _)| !key.trim().is_empty()));
    }

    #[test]
    fn serializes_identity_first() {
        let mut fields = Map::new();
        fields.insert("Wins".to_string(), json!(10));
        let document = FighterDocument::new(DocumentId::new("42"), fields);

        assert_eq!(
            serde_json::to_string(&document).unwrap(),
            r#"{"_id":"42","Wins":10}"#
        );
    }

    #[test]
    fn positional_identity() {
        assert_eq!(DocumentId::positional(5).as_str(), "fighter_5");
    }
}
