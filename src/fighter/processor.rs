use log::warn;
use serde_json::{Map, Value};

use crate::core::item::{ItemProcessor, ItemProcessorResult};

use super::{
    category::CategoryTable,
    names::NameIndex,
    record::{DocumentId, FighterDocument, RawRow, TypedRow},
};

/// Column used as document identity; never stored in the payload.
pub const ID_FIELD: &str = "_id";
/// Fallback identity column, also the key into the name index.
pub const FIGHTER_CODE_FIELD: &str = "fighterCode";
/// Field attached from the name index.
pub const FIGHTER_NAME_FIELD: &str = "fighterName";

/// Derives the identity of a row: `_id`, then `fighterCode`, then the
/// positional `fighter_<position>`.
pub fn document_id(typed: &TypedRow, position: usize) -> DocumentId {
    typed
        .get(ID_FIELD)
        .or_else(|| typed.get(FIGHTER_CODE_FIELD))
        .map(|value| DocumentId::new(value.to_key()))
        .unwrap_or_else(|| DocumentId::positional(position))
}

/// Turns raw CSV rows into fighter documents.
///
/// Without a category table every typed field stays at the top level. With
/// one, category fields move under their category name and the remaining
/// fields keep their column order ahead of the groups.
pub struct FighterDocumentProcessor<'a> {
    categories: Option<&'a CategoryTable>,
    names: Option<&'a NameIndex>,
}

impl ItemProcessor<RawRow, FighterDocument> for FighterDocumentProcessor<'_> {
    fn process(&self, row: &RawRow) -> ItemProcessorResult<FighterDocument> {
        let typed = TypedRow::from_raw(row);
        let id = document_id(&typed, row.position());

        let mut fields = match self.categories {
            Some(categories) => categorize(&typed, categories, row.position()),
            None => typed
                .iter()
                .filter(|(key, _)| *key != ID_FIELD)
                .map(|(key, value)| (key.to_string(), Value::from(value.clone())))
                .collect(),
        };

        if let Some(name) = self.fighter_name(&typed) {
            fields.insert(
                FIGHTER_NAME_FIELD.to_string(),
                Value::String(name.to_string()),
            );
        }

        Ok(FighterDocument::new(id, fields))
    }
}

impl FighterDocumentProcessor<'_> {
    fn fighter_name(&self, typed: &TypedRow) -> Option<&str> {
        let code = typed.get(FIGHTER_CODE_FIELD)?;
        self.names?.get(&code.to_key())
    }
}

/// A column named like a category is replaced by that category's group when
/// the group has data, and kept as it is otherwise.
fn categorize(typed: &TypedRow, categories: &CategoryTable, position: usize) -> Map<String, Value> {
    let mut fields: Map<String, Value> = typed
        .iter()
        .filter(|(key, _)| *key != ID_FIELD && !categories.contains_field(key))
        .map(|(key, value)| (key.to_string(), Value::from(value.clone())))
        .collect();

    for category in categories.categories() {
        let group: Map<String, Value> = category
            .fields
            .iter()
            .filter(|field| categories.owns(category, field))
            .filter_map(|field| {
                typed
                    .get(field)
                    .map(|value| (field.to_string(), Value::from(value.clone())))
            })
            .collect();

        if group.is_empty() {
            continue;
        }

        if let Some(column) = fields.insert(category.name.to_string(), Value::Object(group)) {
            warn!(
                "Row {}: column '{}' ({}) replaced by the category of the same name",
                position, category.name, column
            );
        }
    }

    fields
}

#[derive(Default)]
pub struct FighterDocumentProcessorBuilder<'a> {
    categories: Option<&'a CategoryTable>,
    names: Option<&'a NameIndex>,
}

impl<'a> FighterDocumentProcessorBuilder<'a> {
    pub fn new() -> Self {
        Self {
            categories: None,
            names: None,
        }
    }

    /// Groups the fields listed in `categories` under their category name.
    pub fn categories(mut self, categories: &'a CategoryTable) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Attaches `fighterName` when `names` knows the row's `fighterCode`.
    pub fn names(mut self, names: &'a NameIndex) -> Self {
        self.names = Some(names);
        self
    }

    pub fn build(self) -> FighterDocumentProcessor<'a> {
        FighterDocumentProcessor {
            categories: self.categories,
            names: self.names,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::{
        core::item::ItemProcessor,
        fighter::{
            category::CategoryTable,
            names::NameIndex,
            record::{FighterDocument, RawRow},
        },
    };

    use super::FighterDocumentProcessorBuilder;

    fn row(position: usize, fields: &[(&str, &str)]) -> RawRow {
        RawRow::new(
            position,
            fields
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    fn as_json(document: &FighterDocument) -> Value {
        Value::Object(document.fields.clone())
    }

    #[test]
    fn explicit_id_becomes_the_identity_and_leaves_the_payload() {
        let processor = FighterDocumentProcessorBuilder::new().build();

        let document = processor
            .process(&row(1, &[("_id", "42"), ("fighterCode", "F1"), ("Wins", "10")]))
            .unwrap();

        assert_eq!(document.id.as_str(), "42");
        assert_eq!(as_json(&document), json!({"fighterCode": "F1", "Wins": 10}));
    }

    #[test]
    fn identity_falls_back_to_code_then_position() {
        let processor = FighterDocumentProcessorBuilder::new().build();

        let by_code = processor
            .process(&row(2, &[("_id", ""), ("fighterCode", "F7")]))
            .unwrap();
        let by_position = processor.process(&row(5, &[("Wins", "3")])).unwrap();
        let numeric_code = processor
            .process(&row(6, &[("fighterCode", "1234")]))
            .unwrap();

        assert_eq!(by_code.id.as_str(), "F7");
        assert_eq!(by_position.id.as_str(), "fighter_5");
        assert_eq!(numeric_code.id.as_str(), "1234");
        assert_eq!(as_json(&numeric_code), json!({"fighterCode": 1234}));
    }

    #[test]
    fn plain_processor_keeps_every_field_at_top_level() {
        let processor = FighterDocumentProcessorBuilder::new().build();

        let document = processor
            .process(&row(1, &[("FighterWins", "12"), ("JabsAA", "0.45"), ("", "x")]))
            .unwrap();

        assert_eq!(as_json(&document), json!({"FighterWins": 12, "JabsAA": 0.45}));
    }

    #[test]
    fn category_fields_are_nested_and_removed_from_top_level() {
        let table = CategoryTable::fighter_stats();
        let processor = FighterDocumentProcessorBuilder::new()
            .categories(&table)
            .build();

        let document = processor
            .process(&row(
                1,
                &[
                    ("fighterCode", "F1"),
                    ("JabsAA", "0.45"),
                    ("FighterWins", "12"),
                    ("Stance", "Orthodox"),
                    ("BodyKicksAA", "0.1"),
                    ("FighterLoss", ""),
                ],
            ))
            .unwrap();

        assert_eq!(
            serde_json::to_string(&document.fields).unwrap(),
            json!({
                "fighterCode": "F1",
                "Stance": "Orthodox",
                "striking_stats": {"BodyKicksAA": 0.1, "JabsAA": 0.45},
                "fight_outcome_stats": {"FighterWins": 12}
            })
            .to_string()
        );
        assert!(!document.fields.contains_key("JabsAA"));
        assert!(!document.fields.contains_key("submission_stats"));
    }

    #[test]
    fn every_category_field_lands_under_exactly_one_category() {
        let table = CategoryTable::fighter_stats();
        let processor = FighterDocumentProcessorBuilder::new()
            .categories(&table)
            .build();
        let fields: Vec<(String, String)> = table
            .categories()
            .iter()
            .flat_map(|category| category.fields.iter())
            .map(|field| (field.to_string(), "1".to_string()))
            .collect();

        let document = processor.process(&RawRow::new(1, fields)).unwrap();

        for category in table.categories() {
            let group = document.fields[category.name].as_object().unwrap();
            assert_eq!(group.len(), category.fields.len());
            for field in category.fields {
                assert!(!document.fields.contains_key(*field));
            }
        }
        assert_eq!(document.fields.len(), table.categories().len());
    }

    #[test]
    fn attaches_fighter_name_from_the_index() {
        let names: NameIndex = [("F1", "Jon Jones"), ("77", "Numeric Code")]
            .into_iter()
            .collect();
        let processor = FighterDocumentProcessorBuilder::new().names(&names).build();

        let known = processor.process(&row(1, &[("fighterCode", "F1")])).unwrap();
        let numeric = processor.process(&row(2, &[("fighterCode", "77")])).unwrap();
        let unknown = processor.process(&row(3, &[("fighterCode", "F9")])).unwrap();

        assert_eq!(known.fields["fighterName"], json!("Jon Jones"));
        assert_eq!(numeric.fields["fighterName"], json!("Numeric Code"));
        assert!(!unknown.fields.contains_key("fighterName"));
    }

    #[test]
    fn category_group_replaces_a_column_of_the_same_name() {
        let table = CategoryTable::fighter_stats();
        let processor = FighterDocumentProcessorBuilder::new()
            .categories(&table)
            .build();

        let document = processor
            .process(&row(
                1,
                &[
                    ("fighterCode", "F1"),
                    ("Wins", "10"),
                    ("striking_stats", "x"),
                    ("JabsAA", "1"),
                ],
            ))
            .unwrap();

        assert_eq!(document.id.as_str(), "F1");
        assert_eq!(
            serde_json::to_string(&document.fields).unwrap(),
            json!({
                "fighterCode": "F1",
                "Wins": 10,
                "striking_stats": {"JabsAA": 1}
            })
            .to_string()
        );
    }

    #[test]
    fn zero_id_is_a_present_identity() {
        let processor = FighterDocumentProcessorBuilder::new().build();

        let integer = processor
            .process(&row(1, &[("_id", "0"), ("fighterCode", "F1")]))
            .unwrap();
        let float = processor
            .process(&row(2, &[("_id", "0.0"), ("fighterCode", "F2")]))
            .unwrap();

        assert_eq!(integer.id.as_str(), "0");
        assert_eq!(float.id.as_str(), "0.0");
        assert_eq!(as_json(&integer), json!({"fighterCode": "F1"}));
    }

    #[test]
    fn column_named_like_an_empty_category_passes_through() {
        let table = CategoryTable::fighter_stats();
        let processor = FighterDocumentProcessorBuilder::new()
            .categories(&table)
            .build();

        let document = processor
            .process(&row(1, &[("striking_stats", "legacy")]))
            .unwrap();

        assert_eq!(as_json(&document), json!({"striking_stats": "legacy"}));
    }
}
