//! Query evaluation.
//!
//! A query is the union of its clauses. Each clause is evaluated as
//! `must \ must_not`:
//!
//! - `must` intersects one term per ungrouped filter and one term per
//!   nested prefix. Terms are intersected smallest first and evaluation
//!   stops as soon as the running result is empty.
//! - `must_not` is the union of its terms and is skipped when `must` is
//!   already empty.
//!
//! Every intermediate set comes from the [`SetPool`] and goes back to it.
//! The set returned to the caller is owned by the caller.

use super::{CompoundQuery, Query, SearchFilter, SetPool};
use crate::entity::HandleSet;
use crate::index::{NestedGroups, NodeId, PathTrie};
use crate::stats::IndexStats;
use tracing::trace;

/// Grouped criteria for one nested prefix: full field path and accepted values.
type Criteria<'q> = Vec<(&'q str, &'q [String])>;

/// A `must` term waiting to be intersected.
enum Term<'q> {
    /// Ungrouped filter, materialized on demand.
    Path { node: NodeId, values: &'q [String] },
    /// Instance-grouped filters, already materialized.
    Ready(HandleSet),
}

pub(crate) struct Evaluator<'a> {
    trie: &'a PathTrie,
    groups: &'a NestedGroups,
    pool: &'a mut SetPool,
    stats: &'a IndexStats,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(
        trie: &'a PathTrie,
        groups: &'a NestedGroups,
        pool: &'a mut SetPool,
        stats: &'a IndexStats,
    ) -> Self {
        Self {
            trie,
            groups,
            pool,
            stats,
        }
    }

    /// Evaluates every clause and returns the union of their matches.
    pub(crate) fn evaluate(&mut self, query: &Query) -> HandleSet {
        let mut clauses = query.clauses.iter();
        let Some(first) = clauses.next() else {
            return HandleSet::new();
        };

        let mut result = self.evaluate_clause(first);
        for clause in clauses {
            let matched = self.evaluate_clause(clause);
            result.extend(matched.iter().copied());
            self.release(matched);
        }
        result
    }

    fn evaluate_clause(&mut self, clause: &CompoundQuery) -> HandleSet {
        let mut matched = self.resolve_all(&clause.must);
        if matched.is_empty() || clause.must_not.is_empty() {
            return matched;
        }

        let excluded = self.resolve_any(&clause.must_not);
        matched.retain(|handle| !excluded.contains(handle));
        self.release(excluded);
        matched
    }

    /// Intersection of all filters. An empty list matches nothing.
    fn resolve_all<'q>(&mut self, filters: &'q [SearchFilter]) -> HandleSet {
        let mut terms: Vec<(usize, Term<'q>)> = Vec::with_capacity(filters.len());

        for filter in filters.iter().filter(|f| f.nested_prefix.is_none()) {
            let estimate = self
                .trie
                .lookup_path(&filter.field)
                .map(|node| (node, self.trie.count_matching(node, &filter.values)));
            match estimate {
                Some((node, count)) if count > 0 => terms.push((
                    count,
                    Term::Path {
                        node,
                        values: &filter.values,
                    },
                )),
                _ => {
                    trace!(field = %filter.field, "Filter has no candidates");
                    return self.short_circuit(terms);
                }
            }
        }

        for (prefix, criteria) in group_by_prefix(filters) {
            let mut set = self.acquire();
            self.groups.match_instances(prefix, &criteria, &mut set);
            if set.is_empty() {
                trace!(prefix, "Nested group has no candidates");
                self.release(set);
                return self.short_circuit(terms);
            }
            terms.push((set.len(), Term::Ready(set)));
        }

        // stable, so equal estimates keep filter order
        terms.sort_by_key(|(estimate, _)| *estimate);

        let mut pending = terms.into_iter();
        let Some((_, first)) = pending.next() else {
            return self.acquire();
        };
        let mut running = self.materialize(first);

        for (_, term) in pending.by_ref() {
            let next = self.materialize(term);
            running = self.intersect(running, next);
            if running.is_empty() {
                trace!("Intersection emptied early");
                break;
            }
        }

        let rest: Vec<(usize, Term<'q>)> = pending.collect();
        if !rest.is_empty() {
            self.stats.record_short_circuit();
            self.discard(rest);
        }
        running
    }

    /// Union of all filters, grouped prefixes counting as one filter each.
    fn resolve_any(&mut self, filters: &[SearchFilter]) -> HandleSet {
        let mut out = self.acquire();

        for filter in filters.iter().filter(|f| f.nested_prefix.is_none()) {
            if let Some(node) = self.trie.lookup_path(&filter.field) {
                self.trie.values_matching(node, &filter.values, &mut out);
            }
        }
        for (prefix, criteria) in group_by_prefix(filters) {
            self.groups.match_instances(prefix, &criteria, &mut out);
        }
        out
    }

    fn materialize(&mut self, term: Term<'_>) -> HandleSet {
        match term {
            Term::Path { node, values } => {
                let mut set = self.acquire();
                self.trie.values_matching(node, values, &mut set);
                set
            }
            Term::Ready(set) => set,
        }
    }

    /// Keeps the smaller set, filtered by the larger one.
    fn intersect(&mut self, a: HandleSet, b: HandleSet) -> HandleSet {
        let (mut small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        small.retain(|handle| large.contains(handle));
        self.release(large);
        small
    }

    fn short_circuit(&mut self, pending: Vec<(usize, Term<'_>)>) -> HandleSet {
        self.stats.record_short_circuit();
        self.discard(pending);
        self.acquire()
    }

    fn discard(&mut self, pending: Vec<(usize, Term<'_>)>) {
        for (_, term) in pending {
            if let Term::Ready(set) = term {
                self.release(set);
            }
        }
    }

    fn acquire(&mut self) -> HandleSet {
        self.stats.record_acquire(self.pool.idle() > 0);
        self.pool.acquire()
    }

    fn release(&mut self, set: HandleSet) {
        self.pool.release(set);
    }
}

/// Collects grouped filters by nested prefix, in order of first appearance.
fn group_by_prefix(filters: &[SearchFilter]) -> Vec<(&str, Criteria<'_>)> {
    let mut groups: Vec<(&str, Criteria<'_>)> = Vec::new();
    for filter in filters {
        let Some(prefix) = filter.nested_prefix.as_deref() else {
            continue;
        };
        let criterion = (filter.field.as_str(), filter.values.as_slice());
        match groups.iter_mut().find(|(p, _)| *p == prefix) {
            Some((_, criteria)) => criteria.push(criterion),
            None => groups.push((prefix, vec![criterion])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Handle;
    use crate::index::InstanceSnapshot;

    fn h(n: u32) -> Handle {
        Handle::new(n)
    }

    struct Fixture {
        trie: PathTrie,
        groups: NestedGroups,
        pool: SetPool,
        stats: IndexStats,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                trie: PathTrie::new(),
                groups: NestedGroups::new(),
                pool: SetPool::new(16),
                stats: IndexStats::new(),
            }
        }

        fn put(&mut self, path: &str, value: &str, handle: Handle) {
            let segments: Vec<&str> = path.split('.').collect();
            self.trie.insert(&segments, value, handle);
        }

        fn occurrence(&mut self, prefix: &str, pairs: &[(&str, &str)], handle: Handle) {
            let snapshot: InstanceSnapshot = pairs.iter().copied().collect();
            for (path, value) in pairs {
                self.put(path, value, handle);
            }
            self.groups.record_instance(prefix, snapshot, handle);
        }

        fn run(&mut self, query: &Query) -> Vec<Handle> {
            let mut evaluator =
                Evaluator::new(&self.trie, &self.groups, &mut self.pool, &self.stats);
            let mut out: Vec<Handle> = evaluator.evaluate(query).into_iter().collect();
            out.sort();
            out
        }
    }

    fn property_fixture() -> Fixture {
        let mut f = Fixture::new();
        f.put("id", "1", h(0));
        f.put("property1", "foo", h(0));
        f.put("id", "2", h(1));
        f.put("property1", "bar", h(1));
        f.put("id", "3", h(2));
        f.put("property1", "baz", h(2));
        f
    }

    fn clause(filters: &[SearchFilter]) -> CompoundQuery {
        filters
            .iter()
            .cloned()
            .fold(CompoundQuery::new(), CompoundQuery::must)
    }

    #[test]
    fn or_within_filter() {
        let mut f = property_fixture();
        let q = Query::from(clause(&[SearchFilter::new("property1", ["bar", "baz"])]));
        assert_eq!(f.run(&q), vec![h(1), h(2)]);
    }

    #[test]
    fn and_across_filters() {
        let mut f = property_fixture();
        let q = Query::from(clause(&[
            SearchFilter::new("property1", ["foo", "bar"]),
            SearchFilter::new("id", ["2", "3"]),
        ]));
        assert_eq!(f.run(&q), vec![h(1)]);
    }

    #[test]
    fn must_not_excludes() {
        let mut f = property_fixture();
        let q = Query::from(
            CompoundQuery::new()
                .must(SearchFilter::new("property1", ["foo"]))
                .must_not(SearchFilter::new("property1", ["foo"])),
        );
        assert!(f.run(&q).is_empty());
    }

    #[test]
    fn empty_must_matches_nothing() {
        let mut f = property_fixture();
        let only_not = Query::from(
            CompoundQuery::new().must_not(SearchFilter::new("property1", ["foo"])),
        );
        assert!(f.run(&only_not).is_empty());
        assert!(f.run(&Query::from(CompoundQuery::new())).is_empty());
        assert!(f.run(&Query::new()).is_empty());
    }

    #[test]
    fn unknown_path_or_value_empties_clause() {
        let mut f = property_fixture();
        let missing_path = Query::from(clause(&[
            SearchFilter::new("property1", ["foo"]),
            SearchFilter::new("nope", ["foo"]),
        ]));
        let missing_value = Query::from(clause(&[SearchFilter::new("property1", ["zzz"])]));

        assert!(f.run(&missing_path).is_empty());
        assert!(f.run(&missing_value).is_empty());
        assert_eq!(f.stats.short_circuits(), 2);
    }

    #[test]
    fn clauses_union_without_duplicates() {
        let mut f = property_fixture();
        let q = Query::new()
            .or(clause(&[SearchFilter::new("id", ["1", "2"])]))
            .or(clause(&[SearchFilter::new("property1", ["bar", "baz"])]));
        assert_eq!(f.run(&q), vec![h(0), h(1), h(2)]);
    }

    #[test]
    fn grouped_filters_need_one_occurrence() {
        let mut f = Fixture::new();
        // h0: the two values sit in different occurrences
        f.occurrence("nested", &[("nested.f1", "Nested1"), ("nested.f2", "12344")], h(0));
        f.occurrence("nested", &[("nested.f1", "Other"), ("nested.f2", "12345")], h(0));
        // h1: both in one occurrence
        f.occurrence("nested", &[("nested.f1", "Nested1"), ("nested.f2", "12345")], h(1));

        let grouped = Query::from(clause(&[
            SearchFilter::new("nested.f1", ["Nested1"]).nested("nested"),
            SearchFilter::new("nested.f2", ["12345"]).nested("nested"),
        ]));
        let ungrouped = Query::from(clause(&[
            SearchFilter::new("nested.f1", ["Nested1"]),
            SearchFilter::new("nested.f2", ["12345"]),
        ]));

        assert_eq!(f.run(&grouped), vec![h(1)]);
        assert_eq!(f.run(&ungrouped), vec![h(0), h(1)]);
    }

    #[test]
    fn grouped_must_not_is_one_term() {
        let mut f = Fixture::new();
        f.put("id", "a", h(0));
        f.put("id", "b", h(1));
        f.occurrence("n", &[("n.x", "1"), ("n.y", "2")], h(0));
        f.occurrence("n", &[("n.x", "1"), ("n.y", "3")], h(1));

        let q = Query::from(
            CompoundQuery::new()
                .must(SearchFilter::new("id", ["a", "b"]))
                .must_not(SearchFilter::new("n.x", ["1"]).nested("n"))
                .must_not(SearchFilter::new("n.y", ["2"]).nested("n")),
        );
        assert_eq!(f.run(&q), vec![h(1)]);
    }

    #[test]
    fn mixed_grouped_and_plain() {
        let mut f = Fixture::new();
        f.put("kind", "k", h(0));
        f.put("kind", "k", h(1));
        f.occurrence("n", &[("n.x", "1")], h(0));
        f.occurrence("n", &[("n.x", "1")], h(2));

        let q = Query::from(clause(&[
            SearchFilter::new("kind", ["k"]),
            SearchFilter::new("n.x", ["1"]).nested("n"),
        ]));
        assert_eq!(f.run(&q), vec![h(0)]);
    }

    #[test]
    fn filter_order_does_not_matter() {
        let mut f = property_fixture();
        f.put("flag", "True", h(0));
        f.put("flag", "True", h(1));
        f.put("flag", "True", h(2));

        let a = SearchFilter::new("flag", ["True"]);
        let b = SearchFilter::new("property1", ["foo", "baz"]);
        let c = SearchFilter::new("id", ["3"]);

        let forward = f.run(&Query::from(clause(&[a.clone(), b.clone(), c.clone()])));
        let backward = f.run(&Query::from(clause(&[c, b, a])));
        assert_eq!(forward, vec![h(2)]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn working_sets_return_to_pool() {
        let mut f = property_fixture();
        let q = Query::new()
            .or(clause(&[
                SearchFilter::new("property1", ["foo", "bar"]),
                SearchFilter::new("id", ["1", "2"]),
            ]))
            .or(CompoundQuery::new()
                .must(SearchFilter::new("id", ["3"]))
                .must_not(SearchFilter::new("property1", ["zzz"])));

        f.run(&q);
        let idle = f.pool.idle();
        assert!(idle > 0);

        f.run(&q);
        assert!(f.stats.pool_hits() > 0);
        // the result set leaves the pool each time, the rest comes back
        assert_eq!(f.pool.idle(), idle);
    }
}
