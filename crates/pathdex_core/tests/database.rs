//! Database façade over the fixture model.

use pathdex_core::{Database, Handle, IndexConfig};
use pathdex_testkit::prelude::*;

#[test]
fn index_then_search() {
    let db = Database::new();
    db.index_all(complex_pair()).unwrap();

    let found: Vec<TestEntity> = db
        .search(&must([nested_filter(
            "property6",
            "property6.nestedProperty1",
            ["NestedTest4"],
        )]))
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "2");
}

#[test]
fn borrowed_access_through_with_index() {
    let db = Database::new();
    db.index_all(numbered(6)).unwrap();

    let odd = db
        .with_index(|index: &pathdex_core::PageIndex<TestEntity>| {
            index.matches("property3", "True").unwrap().len()
        })
        .unwrap();
    assert_eq!(odd, 3);

    let paths = db
        .with_index(|index: &pathdex_core::PageIndex<TestEntity>| index.paths())
        .unwrap();
    assert!(paths.contains(&"property1".to_string()));
}

#[test]
fn reindex_through_database() {
    let db = Database::new();
    let first = db.index(TestEntity::new("a").property1("x")).unwrap();
    let second = db.index(TestEntity::new("a").property1("x")).unwrap();

    assert_eq!(first, second);
    assert_eq!(db.len::<TestEntity>(), 1);
    assert_eq!(
        db.get::<TestEntity>(Handle::new(0)).map(|e| e.id),
        Some("a".to_string())
    );
}

#[test]
fn config_reaches_every_index() {
    let db = Database::with_config(IndexConfig::new().max_pooled_sets(0));
    db.index_all(numbered(2)).unwrap();

    let cap = db
        .with_index(|index: &pathdex_core::PageIndex<TestEntity>| index.config().max_pooled_sets)
        .unwrap();
    assert_eq!(cap, 0);

    db.search::<TestEntity>(&must([filter("property1", ["Test1"])]))
        .unwrap();
    let hits = db
        .with_index(|index: &pathdex_core::PageIndex<TestEntity>| index.stats().pool_hits())
        .unwrap();
    assert_eq!(hits, 0);
}
