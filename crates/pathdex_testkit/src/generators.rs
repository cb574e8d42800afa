//! Property-based test generators using proptest.
//!
//! Values are drawn from small domains so that random queries actually
//! hit random entities.

use crate::fixtures::{NestedObject, TestEntity};
use pathdex_core::{CompoundQuery, Query, SearchFilter};
use proptest::prelude::*;

/// Paths a [`TestEntity`] can produce.
pub static TEST_ENTITY_PATHS: [&str; 8] = [
    "property1",
    "property2",
    "property3",
    "property4",
    "property5.nestedProperty1",
    "property5.nestedProperty2",
    "property6.nestedProperty1",
    "property6.nestedProperty2",
];

/// Paths that sit under a nested object, with that object's path.
pub static NESTED_PATHS: [(&str, &str); 4] = [
    ("property5", "property5.nestedProperty1"),
    ("property5", "property5.nestedProperty2"),
    ("property6", "property6.nestedProperty1"),
    ("property6", "property6.nestedProperty2"),
];

static WORDS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

/// Strategy for one word of the shared vocabulary.
pub fn word_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(&WORDS[..]).prop_map(str::to_string)
}

/// Strategy for small numbers.
pub fn number_strategy() -> impl Strategy<Value = i32> {
    0..4i32
}

/// Strategy for a nested object.
pub fn nested_object_strategy() -> impl Strategy<Value = NestedObject> {
    (word_strategy(), number_strategy()).prop_map(|(text, n)| NestedObject::new(text, n))
}

/// Strategy for an entity. The id is assigned by the caller.
pub fn test_entity_strategy() -> impl Strategy<Value = TestEntity> {
    (
        prop::option::of(word_strategy()),
        number_strategy(),
        any::<bool>(),
        prop::collection::vec(word_strategy(), 0..3),
        prop::option::of(nested_object_strategy()),
        prop::collection::vec(nested_object_strategy(), 0..4),
    )
        .prop_map(|(p1, p2, p3, p4, p5, p6)| TestEntity {
            id: String::new(),
            property1: p1,
            property2: p2,
            property3: p3,
            property4: p4,
            property5: p5,
            property6: p6,
        })
}

/// Strategy for up to `max` entities with distinct ids `0..n`.
pub fn entities_strategy(max: usize) -> impl Strategy<Value = Vec<TestEntity>> {
    prop::collection::vec(test_entity_strategy(), 0..=max).prop_map(|entities| {
        entities
            .into_iter()
            .enumerate()
            .map(|(i, mut e)| {
                e.id = i.to_string();
                e
            })
            .collect()
    })
}

/// Strategy for the rendered values a filter may accept at `path`.
fn values_for(path: &'static str) -> BoxedStrategy<Vec<String>> {
    let single: BoxedStrategy<String> = if path.ends_with("property2") || path.ends_with("Property2") {
        number_strategy().prop_map(|n| n.to_string()).boxed()
    } else if path == "property3" {
        any::<bool>()
            .prop_map(|b| (if b { "True" } else { "False" }).to_string())
            .boxed()
    } else {
        word_strategy().boxed()
    };
    prop::collection::vec(single, 1..3).boxed()
}

/// Strategy for an ungrouped filter over [`TEST_ENTITY_PATHS`].
pub fn plain_filter_strategy() -> impl Strategy<Value = SearchFilter> {
    prop::sample::select(&TEST_ENTITY_PATHS[..])
        .prop_flat_map(|path| values_for(path).prop_map(move |values| SearchFilter::new(path, values)))
}

/// Strategy for a filter grouped under its nested object.
pub fn grouped_filter_strategy() -> impl Strategy<Value = SearchFilter> {
    prop::sample::select(&NESTED_PATHS[..]).prop_flat_map(|(prefix, path)| {
        values_for(path).prop_map(move |values| SearchFilter::new(path, values).nested(prefix))
    })
}

/// Strategy for any filter, grouped about a third of the time.
pub fn filter_strategy() -> impl Strategy<Value = SearchFilter> {
    prop_oneof![
        2 => plain_filter_strategy(),
        1 => grouped_filter_strategy(),
    ]
}

/// Strategy for one clause.
pub fn clause_strategy() -> impl Strategy<Value = CompoundQuery> {
    (
        prop::collection::vec(filter_strategy(), 0..4),
        prop::collection::vec(filter_strategy(), 0..3),
    )
        .prop_map(|(must, must_not)| CompoundQuery { must, must_not })
}

/// Strategy for a query of one to three clauses.
pub fn query_strategy() -> impl Strategy<Value = Query> {
    prop::collection::vec(clause_strategy(), 1..4).prop_map(|clauses| Query { clauses })
}
