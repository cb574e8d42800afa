//! Query command.

use super::load::{load, Document};
use pathdex_core::{CompoundQuery, CoreResult, IndexConfig, PageIndex, Query};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Query results.
#[derive(Debug, Serialize)]
pub struct QueryResult<'a> {
    /// Documents in the file.
    pub total: usize,
    /// Matching documents in file order.
    pub matches: Vec<Match<'a>>,
}

/// One matching document.
#[derive(Debug, Serialize)]
pub struct Match<'a> {
    /// Identity token.
    pub key: &'a str,
    /// The document as read.
    pub document: &'a serde_json::Value,
}

/// Run the query command.
pub fn run(
    input: &Path,
    query_path: &Path,
    key_field: &str,
    camel_case: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = if camel_case {
        IndexConfig::new().camel_case()
    } else {
        IndexConfig::new()
    };
    let index = load(input, key_field, config)?;

    info!("Reading query from {:?}", query_path);
    let query = parse_query(&fs::read_to_string(query_path)?)?;
    let result = execute(&index, &query)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Parses a query file.
///
/// Accepts a full query (`{"clauses": [...]}`), a bare array of clauses,
/// or a single clause object.
pub fn parse_query(text: &str) -> Result<Query, serde_json::Error> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    if raw.is_array() {
        let clauses: Vec<CompoundQuery> = serde_json::from_value(raw)?;
        Ok(clauses.into_iter().collect())
    } else if raw.get("clauses").is_some() {
        serde_json::from_value(raw)
    } else {
        serde_json::from_value::<CompoundQuery>(raw).map(Query::from)
    }
}

/// Runs `query` against `index`.
pub fn execute<'a>(index: &'a PageIndex<Document>, query: &Query) -> CoreResult<QueryResult<'a>> {
    let matches = index
        .search(query)?
        .into_iter()
        .map(|doc| Match {
            key: doc.key(),
            document: doc.body(),
        })
        .collect();
    Ok(QueryResult {
        total: index.len(),
        matches,
    })
}

fn print_text_output(result: &QueryResult<'_>) {
    println!("Matched {} of {} documents", result.matches.len(), result.total);
    for m in &result.matches {
        println!("  {}\t{}", m.key, m.document);
    }
}
