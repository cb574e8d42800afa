//! Query model.

use crate::error::{CoreError, CoreResult};
use crate::index::{split_path, PATH_SEPARATOR};
use serde::{Deserialize, Serialize};

/// One field constraint.
///
/// Matches an entity holding any of `values` at `field`. With a nested
/// prefix, the filter is evaluated together with every other filter of
/// the same clause that names the same prefix, and all of them must be
/// satisfied by one occurrence of the nested object at that prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Dotted field path.
    pub field: String,
    /// Accepted stringified values.
    pub values: Vec<String>,
    /// Path of the nested object this filter is grouped under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_prefix: Option<String>,
}

impl SearchFilter {
    /// Creates an ungrouped filter.
    pub fn new<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            nested_prefix: None,
        }
    }

    /// Groups this filter under the nested object at `prefix`.
    #[must_use]
    pub fn nested(mut self, prefix: impl Into<String>) -> Self {
        self.nested_prefix = Some(prefix.into());
        self
    }

    /// Checks the filter for malformed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] for an empty field, an empty
    /// path segment, an empty value list, or a nested prefix that is not
    /// a parent path of the field.
    pub fn validate(&self) -> CoreResult<()> {
        if self.field.is_empty() {
            return Err(CoreError::invalid_input("filter field is empty"));
        }
        if split_path(&self.field).any(str::is_empty) {
            return Err(CoreError::invalid_input(format!(
                "filter field {:?} has an empty segment",
                self.field
            )));
        }
        if self.values.is_empty() {
            return Err(CoreError::invalid_input(format!(
                "filter on {:?} has no values",
                self.field
            )));
        }
        if let Some(prefix) = &self.nested_prefix {
            if prefix.is_empty() {
                return Err(CoreError::invalid_input(format!(
                    "filter on {:?} has an empty nested prefix",
                    self.field
                )));
            }
            let parent = self
                .field
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR));
            if !parent {
                return Err(CoreError::invalid_input(format!(
                    "nested prefix {prefix:?} is not a parent of {:?}",
                    self.field
                )));
            }
        }
        Ok(())
    }
}

/// One AND group: every `must` filter holds and no `must_not` filter does.
///
/// A clause with no `must` filters matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundQuery {
    /// Filters that must all match.
    #[serde(default, alias = "oneOf")]
    pub must: Vec<SearchFilter>,
    /// Filters of which none may match.
    #[serde(default, alias = "notOneOf")]
    pub must_not: Vec<SearchFilter>,
}

impl CompoundQuery {
    /// Creates an empty clause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required filter.
    #[must_use]
    pub fn must(mut self, filter: SearchFilter) -> Self {
        self.must.push(filter);
        self
    }

    /// Adds an excluding filter.
    #[must_use]
    pub fn must_not(mut self, filter: SearchFilter) -> Self {
        self.must_not.push(filter);
        self
    }

    /// Checks every filter of the clause.
    ///
    /// # Errors
    ///
    /// Returns the first filter error found.
    pub fn validate(&self) -> CoreResult<()> {
        self.must
            .iter()
            .chain(&self.must_not)
            .try_for_each(SearchFilter::validate)
    }
}

/// Union of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Clauses OR'd together.
    #[serde(default)]
    pub clauses: Vec<CompoundQuery>,
}

impl Query {
    /// Creates a query with no clauses. It matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause.
    #[must_use]
    pub fn or(mut self, clause: CompoundQuery) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Checks every clause.
    ///
    /// # Errors
    ///
    /// Returns the first filter error found.
    pub fn validate(&self) -> CoreResult<()> {
        self.clauses.iter().try_for_each(CompoundQuery::validate)
    }
}

impl From<CompoundQuery> for Query {
    fn from(clause: CompoundQuery) -> Self {
        Self {
            clauses: vec![clause],
        }
    }
}

impl FromIterator<CompoundQuery> for Query {
    fn from_iter<I: IntoIterator<Item = CompoundQuery>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}
