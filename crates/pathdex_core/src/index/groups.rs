//! Nested instance grouping.

use crate::entity::{Handle, HandleSet};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Every scalar recorded inside one occurrence of a nested object.
///
/// Keys are full dotted paths (`meta.facility.region`), values are the
/// stringified scalars found at that path inside the occurrence. A path
/// holds several values when the occurrence itself contains a list of
/// scalars. Two snapshots are equal iff they have the same paths with
/// the same values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstanceSnapshot {
    fields: BTreeMap<String, BTreeSet<String>>,
}

impl InstanceSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one value at `path`.
    pub fn insert(&mut self, path: &str, value: &str) {
        match self.fields.get_mut(path) {
            Some(values) => {
                if !values.contains(value) {
                    values.insert(value.to_string());
                }
            }
            None => {
                self.fields
                    .insert(path.to_string(), BTreeSet::from([value.to_string()]));
            }
        }
    }

    /// Returns the values recorded at `path`.
    pub fn get(&self, path: &str) -> Option<&BTreeSet<String>> {
        self.fields.get(path)
    }

    /// Returns true if the snapshot holds `path` with at least one
    /// accepted value.
    pub fn satisfies<S: AsRef<str>>(&self, path: &str, accepted: &[S]) -> bool {
        self.fields
            .get(path)
            .is_some_and(|values| accepted.iter().any(|v| values.contains(v.as_ref())))
    }

    /// Returns the number of distinct paths.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates paths and their values in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InstanceSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (k, v) in iter {
            snapshot.insert(&k.into(), &v.into());
        }
        snapshot
    }
}

/// Secondary index over nested object occurrences.
///
/// Keyed by the nested field's path prefix; under each prefix, every
/// distinct [`InstanceSnapshot`] maps to the handles of the entities that
/// contain an occurrence with exactly that snapshot.
#[derive(Debug, Default)]
pub struct NestedGroups {
    groups: HashMap<String, HashMap<InstanceSnapshot, HandleSet>>,
}

impl NestedGroups {
    /// Creates an empty grouper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `handle` under `snapshot` for `prefix`.
    ///
    /// Returns false if that exact association already existed.
    pub fn record_instance(
        &mut self,
        prefix: &str,
        snapshot: InstanceSnapshot,
        handle: Handle,
    ) -> bool {
        let instances = match self.groups.get_mut(prefix) {
            Some(instances) => instances,
            None => self.groups.entry(prefix.to_string()).or_default(),
        };
        instances.entry(snapshot).or_default().insert(handle)
    }

    /// Adds to `out` every handle owning an occurrence under `prefix` that
    /// satisfies all `criteria` at once.
    ///
    /// Each criterion is a path and its accepted values. Unknown prefixes
    /// contribute nothing.
    pub fn match_instances<S: AsRef<str>>(
        &self,
        prefix: &str,
        criteria: &[(&str, &[S])],
        out: &mut HandleSet,
    ) {
        let Some(instances) = self.groups.get(prefix) else {
            return;
        };

        for (snapshot, holders) in instances {
            if criteria
                .iter()
                .all(|(path, accepted)| snapshot.satisfies(path, accepted))
            {
                out.extend(holders.iter().copied());
            }
        }
    }

    /// Returns the number of distinct snapshots under `prefix`.
    pub fn instance_count(&self, prefix: &str) -> usize {
        self.groups.get(prefix).map_or(0, HashMap::len)
    }

    /// Returns every known prefix, sorted.
    pub fn prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        prefixes.sort_unstable();
        prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(pairs: &[(&str, &str)]) -> InstanceSnapshot {
        pairs.iter().copied().collect()
    }

    #[test]
    fn snapshot_equality_is_structural() {
        let a = snap(&[("p.x", "1"), ("p.y", "2")]);
        let b = snap(&[("p.y", "2"), ("p.x", "1")]);
        let c = snap(&[("p.x", "1")]);
        let d = snap(&[("p.x", "1"), ("p.y", "3")]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn snapshot_collects_list_values() {
        let s = snap(&[("p.tags", "a"), ("p.tags", "b"), ("p.tags", "a")]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("p.tags").unwrap().len(), 2);
        assert!(s.satisfies("p.tags", &["b"]));
        assert!(!s.satisfies("p.tags", &["c"]));
        assert!(!s.satisfies("p.other", &["a"]));
    }

    #[test]
    fn identical_occurrences_merge() {
        let mut groups = NestedGroups::new();
        assert!(groups.record_instance("p", snap(&[("p.x", "1")]), Handle::new(0)));
        assert!(groups.record_instance("p", snap(&[("p.x", "1")]), Handle::new(1)));
        assert!(!groups.record_instance("p", snap(&[("p.x", "1")]), Handle::new(1)));

        assert_eq!(groups.instance_count("p"), 1);
    }

    #[test]
    fn conditions_must_hold_in_one_occurrence() {
        let mut groups = NestedGroups::new();
        // entity 0 has both values, but in different occurrences
        groups.record_instance(
            "meta.facility",
            snap(&[("meta.facility.facility", "1234"), ("meta.facility.region", "BURBON")]),
            Handle::new(0),
        );
        groups.record_instance(
            "meta.facility",
            snap(&[("meta.facility.facility", "1233"), ("meta.facility.region", "AMISH")]),
            Handle::new(0),
        );
        // entity 1 has both in one occurrence
        groups.record_instance(
            "meta.facility",
            snap(&[("meta.facility.facility", "1234"), ("meta.facility.region", "AMISH")]),
            Handle::new(1),
        );

        let facility = ["1234".to_string()];
        let region = ["AMISH".to_string()];
        let criteria: [(&str, &[String]); 2] = [
            ("meta.facility.facility", &facility),
            ("meta.facility.region", &region),
        ];
        let mut out = HandleSet::new();
        groups.match_instances("meta.facility", &criteria, &mut out);

        assert_eq!(out, HandleSet::from([Handle::new(1)]));
    }

    #[test]
    fn unknown_prefix_matches_nothing() {
        let groups = NestedGroups::new();
        let mut out = HandleSet::new();
        groups.match_instances("nope", &[("nope.x", &["1"][..])], &mut out);
        assert!(out.is_empty());
        assert_eq!(groups.instance_count("nope"), 0);
    }

    #[test]
    fn prefixes_are_sorted() {
        let mut groups = NestedGroups::new();
        groups.record_instance("b", snap(&[("b.x", "1")]), Handle::new(0));
        groups.record_instance("a", snap(&[("a.x", "1")]), Handle::new(0));
        assert_eq!(groups.prefixes(), vec!["a", "b"]);
    }
}
