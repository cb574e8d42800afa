//! Stats command.

use super::load::{load, Document};
use pathdex_core::{HandleSet, IndexConfig, PageIndex, StatsSnapshot};
use serde::Serialize;
use std::path::Path;

/// Summary of an indexed documents file.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Distinct documents.
    pub documents: usize,
    /// Nodes in the path trie, root included.
    pub trie_nodes: usize,
    /// One entry per indexed path, sorted by path.
    pub paths: Vec<PathStats>,
    /// Nested object paths and how many distinct occurrences each holds.
    pub nested: Vec<NestedStats>,
    /// Indexing counters.
    pub counters: StatsSnapshot,
}

/// Statistics for one path.
#[derive(Debug, Serialize)]
pub struct PathStats {
    /// Dotted path.
    pub path: String,
    /// Distinct values seen at the path.
    pub distinct_values: usize,
    /// Documents holding at least one value at the path.
    pub documents: usize,
}

/// Statistics for one nested object path.
#[derive(Debug, Serialize)]
pub struct NestedStats {
    /// Dotted path of the nested object.
    pub prefix: String,
    /// Distinct occurrences recorded.
    pub instances: usize,
}

/// Run the stats command.
pub fn run(input: &Path, key_field: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let index = load(input, key_field, IndexConfig::new())?;
    let report = collect(&index);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print_text_output(&report);
        }
    }

    Ok(())
}

/// Builds the report for `index`.
pub fn collect(index: &PageIndex<Document>) -> StatsReport {
    let trie = index.trie();
    let paths = trie
        .leaf_paths()
        .into_iter()
        .map(|(path, node)| {
            let mut holders = HandleSet::new();
            let mut distinct_values = 0;
            for (_, handles) in trie.values(node) {
                distinct_values += 1;
                holders.extend(handles.iter().copied());
            }
            PathStats {
                path,
                distinct_values,
                documents: holders.len(),
            }
        })
        .collect();

    let groups = index.groups();
    let nested = groups
        .prefixes()
        .into_iter()
        .map(|prefix| NestedStats {
            prefix: prefix.to_string(),
            instances: groups.instance_count(prefix),
        })
        .collect();

    StatsReport {
        documents: index.len(),
        trie_nodes: trie.node_count(),
        paths,
        nested,
        counters: index.stats().snapshot(),
    }
}

fn print_text_output(report: &StatsReport) {
    println!("pathdex Index Statistics");
    println!("========================");
    println!();
    println!("Documents:   {}", report.documents);
    println!("Paths:       {}", report.paths.len());
    println!("Trie nodes:  {}", report.trie_nodes);

    if !report.paths.is_empty() {
        println!();
        println!("{:<40} {:>10} {:>10}", "Path", "Values", "Documents");
        for p in &report.paths {
            println!("{:<40} {:>10} {:>10}", p.path, p.distinct_values, p.documents);
        }
    }

    if !report.nested.is_empty() {
        println!();
        println!("{:<40} {:>10}", "Nested object", "Instances");
        for n in &report.nested {
            println!("{:<40} {:>10}", n.prefix, n.instances);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathdex_testkit::fixtures::jsonl_file;
    use serde_json::json;

    #[test]
    fn counts_values_and_holders() {
        let file = jsonl_file(&[
            json!({"id": "1", "tags": ["x", "y"], "owner": {"name": "ann"}}),
            json!({"id": "2", "tags": ["x"], "owner": {"name": "bob"}}),
            json!({"id": "3", "owner": {"name": "ann"}}),
        ]);
        let index = load(file.path(), "id", IndexConfig::new()).unwrap();
        let report = collect(&index);

        assert_eq!(report.documents, 3);
        let names: Vec<&str> = report.paths.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(names, vec!["id", "owner.name", "tags"]);

        let tags = &report.paths[2];
        assert_eq!((tags.distinct_values, tags.documents), (2, 2));
        let owner = &report.paths[1];
        assert_eq!((owner.distinct_values, owner.documents), (2, 3));

        assert_eq!(report.nested.len(), 1);
        assert_eq!(report.nested[0].prefix, "owner");
        assert_eq!(report.nested[0].instances, 2);
        assert_eq!(report.counters.entities_indexed, 3);
    }

    #[test]
    fn empty_file() {
        let file = jsonl_file::<serde_json::Value>(&[]);
        let report = collect(&load(file.path(), "id", IndexConfig::new()).unwrap());

        assert_eq!(report.documents, 0);
        assert!(report.paths.is_empty());
        assert_eq!(report.trie_nodes, 1);
    }
}
