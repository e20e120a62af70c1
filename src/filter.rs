use std::collections::HashMap;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{instrument, trace};

use crate::domain::TVError;
use crate::table::{Cell, Table};

/// A single search action. Built per request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Column name to needle, all pairs must match (case-sensitive).
    Columns(HashMap<String, String>),
    /// Free text that must occur in any column (case-insensitive).
    Term(String),
}

impl FilterSpec {
    pub fn apply(&self, source: &Table) -> Result<Table, TVError> {
        match self {
            FilterSpec::Columns(spec) => filter_by_columns(source, spec),
            FilterSpec::Term(term) => Ok(filter_by_term(source, term)),
        }
    }
}

/// Keep rows whose cells contain every needle in the named column.
#[instrument(level = "trace", skip(source), fields(rows = source.nrows()))]
pub fn filter_by_columns(source: &Table, spec: &HashMap<String, String>) -> Result<Table, TVError> {
    // Resolve all names before touching any row
    let predicates = spec
        .iter()
        .map(|(column, needle)| {
            source
                .column_index(column)
                .map(|idx| (idx, needle.as_str()))
                .ok_or_else(|| TVError::UnknownColumn(column.clone()))
        })
        .collect::<Result<Vec<(usize, &str)>, TVError>>()?;

    let start_time = Instant::now();
    let rows = select_rows(source, |row| {
        predicates
            .iter()
            .all(|&(idx, needle)| row[idx].to_string().contains(needle))
    });
    trace!(
        "Column filter kept {}/{} rows in {}ms",
        rows.len(),
        source.nrows(),
        start_time.elapsed().as_millis()
    );
    Ok(source.with_rows(rows))
}

/// Keep rows where any cell contains `term`, ignoring case.
///
/// An empty term matches every row. Callers that treat an empty search as
/// "no filter" should reset the view instead of calling this.
#[instrument(level = "trace", skip(source), fields(rows = source.nrows()))]
pub fn filter_by_term(source: &Table, term: &str) -> Table {
    let needle = term.to_lowercase();

    let start_time = Instant::now();
    let rows = select_rows(source, |row| {
        row.iter()
            .any(|cell| cell.to_string().to_lowercase().contains(&needle))
    });
    trace!(
        "Search kept {}/{} rows in {}ms",
        rows.len(),
        source.nrows(),
        start_time.elapsed().as_millis()
    );
    source.with_rows(rows)
}

// Rows are tested in parallel, the indexed collect keeps source order.
fn select_rows<F>(source: &Table, keep: F) -> Vec<Vec<Cell>>
where
    F: Fn(&[Cell]) -> bool + Sync,
{
    source
        .rows()
        .par_iter()
        .filter(|row| keep(row))
        .cloned()
        .collect()
}
