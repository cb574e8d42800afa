//! Fixture entities and index helpers.
//!
//! [`TestEntity`] serializes with camel-cased field names, so its paths
//! are `property1`, `property5.nestedProperty1`, `property6.nestedProperty2`
//! and so on.

use pathdex_core::{CompoundQuery, EntityKey, Indexable, PageIndex, Query, SearchFilter};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::NamedTempFile;

/// Nested object used by [`TestEntity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedObject {
    /// Text field.
    pub nested_property1: String,
    /// Number field.
    pub nested_property2: i32,
}

impl NestedObject {
    /// Creates a nested object.
    pub fn new(nested_property1: impl Into<String>, nested_property2: i32) -> Self {
        Self {
            nested_property1: nested_property1.into(),
            nested_property2,
        }
    }
}

/// Entity with scalars, a scalar list, a nested object and a list of
/// nested objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEntity {
    /// Identity token.
    pub id: String,
    /// Text field.
    pub property1: Option<String>,
    /// Number field.
    pub property2: i32,
    /// Boolean field.
    pub property3: bool,
    /// Scalar list.
    pub property4: Vec<String>,
    /// Singular nested object.
    pub property5: Option<NestedObject>,
    /// List of nested objects.
    pub property6: Vec<NestedObject>,
}

impl TestEntity {
    /// Creates an entity with only its id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets `property1`.
    #[must_use]
    pub fn property1(mut self, value: impl Into<String>) -> Self {
        self.property1 = Some(value.into());
        self
    }

    /// Sets `property2`.
    #[must_use]
    pub fn property2(mut self, value: i32) -> Self {
        self.property2 = value;
        self
    }

    /// Sets `property3`.
    #[must_use]
    pub fn property3(mut self, value: bool) -> Self {
        self.property3 = value;
        self
    }

    /// Sets `property4`.
    #[must_use]
    pub fn property4<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property4 = values.into_iter().map(Into::into).collect();
        self
    }

    /// Sets `property5`.
    #[must_use]
    pub fn property5(mut self, nested: NestedObject) -> Self {
        self.property5 = Some(nested);
        self
    }

    /// Sets `property6`.
    #[must_use]
    pub fn property6(mut self, nested: impl IntoIterator<Item = NestedObject>) -> Self {
        self.property6 = nested.into_iter().collect();
        self
    }
}

impl Indexable for TestEntity {
    fn entity_key(&self) -> EntityKey {
        EntityKey::new(self.id.clone())
    }
}

/// Builds an index holding `entities`.
///
/// # Panics
///
/// Panics if indexing fails.
pub fn index_of(entities: impl IntoIterator<Item = TestEntity>) -> PageIndex<TestEntity> {
    PageIndex::from_entities(entities).expect("Failed to index fixtures")
}

/// Shorthand for an ungrouped filter.
pub fn filter<const N: usize>(field: &str, values: [&str; N]) -> SearchFilter {
    SearchFilter::new(field, values)
}

/// Shorthand for a filter grouped under `prefix`.
pub fn nested_filter<const N: usize>(prefix: &str, field: &str, values: [&str; N]) -> SearchFilter {
    SearchFilter::new(field, values).nested(prefix)
}

/// A single-clause query with only required filters.
pub fn must(filters: impl IntoIterator<Item = SearchFilter>) -> Query {
    Query::from(filters.into_iter().fold(CompoundQuery::new(), CompoundQuery::must))
}

/// Collects entity ids, sorted.
pub fn ids<'a>(entities: impl IntoIterator<Item = &'a TestEntity>) -> Vec<&'a str> {
    let mut ids: Vec<&str> = entities.into_iter().map(|e| e.id.as_str()).collect();
    ids.sort_unstable();
    ids
}

/// The two-entity set used by the search scenarios.
pub fn complex_pair() -> [TestEntity; 2] {
    [
        TestEntity::new("1")
            .property1("Test1")
            .property2(42)
            .property3(true)
            .property4(["one", "two", "three"])
            .property5(NestedObject::new("NestedTest1", 123))
            .property6([
                NestedObject::new("NestedTest2", 123),
                NestedObject::new("NestedTest3", 789),
            ]),
        TestEntity::new("2")
            .property1("Test2")
            .property2(24)
            .property3(false)
            .property4(["four", "five", "six"])
            .property5(NestedObject::new("NestedTest2", 567))
            .property6([
                NestedObject::new("NestedTest3", 789),
                NestedObject::new("NestedTest4", 101112),
            ]),
    ]
}

/// `count` entities with ids `1..=count` and `property1 = Test{id}`.
///
/// `property2` is the id and `property3` is true for odd ids.
pub fn numbered(count: usize) -> Vec<TestEntity> {
    (1..=count)
        .map(|n| {
            let id = i32::try_from(n).expect("fixture count fits in i32");
            TestEntity::new(n.to_string())
                .property1(format!("Test{n}"))
                .property2(id)
                .property3(n % 2 == 1)
        })
        .collect()
}

/// Writes `records` as JSON lines into a temporary file.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn jsonl_file<T: Serialize>(records: &[T]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for record in records {
        let line = serde_json::to_string(record).expect("Failed to serialize record");
        writeln!(file, "{line}").expect("Failed to write record");
    }
    file.flush().expect("Failed to flush temp file");
    file
}
