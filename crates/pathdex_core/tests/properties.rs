//! Property tests: the indexed evaluator against a linear scan.

use pathdex_core::{Handle, PageIndex, Query};
use pathdex_testkit::prelude::*;
use proptest::prelude::*;

fn handles(index: &PageIndex<TestEntity>, query: &Query) -> Vec<usize> {
    let mut out: Vec<usize> = index
        .search_handles(query)
        .unwrap()
        .into_iter()
        .map(Handle::index)
        .collect();
    out.sort_unstable();
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn agrees_with_reference(entities in entities_strategy(16), query in query_strategy()) {
        let index = index_of(entities.clone());
        let reference = ReferenceIndex::of(&entities);

        prop_assert_eq!(handles(&index, &query), reference.evaluate(&query));
    }

    #[test]
    fn reindexing_is_idempotent(entities in entities_strategy(12), query in query_strategy()) {
        let once = index_of(entities.clone());
        let mut twice = index_of(entities.clone());
        twice.index_all(entities.clone()).unwrap();

        prop_assert_eq!(twice.len(), once.len());
        prop_assert_eq!(twice.field_rows(), once.field_rows());
        prop_assert_eq!(handles(&twice, &query), handles(&once, &query));
    }

    #[test]
    fn clause_order_does_not_matter(entities in entities_strategy(12), query in query_strategy()) {
        let index = index_of(entities);
        let mut reversed = query.clone();
        reversed.clauses.reverse();

        prop_assert_eq!(handles(&index, &reversed), handles(&index, &query));
    }

    #[test]
    fn filter_order_does_not_matter(entities in entities_strategy(12), query in query_strategy()) {
        let index = index_of(entities);
        let mut shuffled = query.clone();
        for clause in &mut shuffled.clauses {
            clause.must.reverse();
            let shift = clause.must_not.len().min(1);
            clause.must_not.rotate_left(shift);
        }

        prop_assert_eq!(handles(&index, &shuffled), handles(&index, &query));
    }

    #[test]
    fn union_covers_each_clause(entities in entities_strategy(12), query in query_strategy()) {
        let index = index_of(entities);
        let all = handles(&index, &query);

        for clause in &query.clauses {
            let part = handles(&index, &Query::from(clause.clone()));
            prop_assert!(part.iter().all(|h| all.contains(h)));
        }
    }
}
