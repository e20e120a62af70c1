use tracing::{debug, trace};

use crate::domain::TVError;
use crate::table::{Cell, Table};

/// Owns the last loaded table and the view derived from it.
///
/// The source only changes through a successful load, which replaces both
/// source and view. Filters publish a new view via `apply_view` and leave
/// the source untouched.
#[derive(Debug, Default)]
pub struct TableStore {
    source: Table,
    view: Table,
    filtered: bool,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<(), TVError> {
        let table = Table::new(columns, rows)?;
        self.load_table(table);
        Ok(())
    }

    pub fn load_table(&mut self, table: Table) {
        debug!(
            "Loading table with {} columns and {} rows",
            table.ncols(),
            table.nrows()
        );
        self.view = table.clone();
        self.source = table;
        self.filtered = false;
    }

    pub fn view(&self) -> &Table {
        &self.view
    }

    pub fn source(&self) -> &Table {
        &self.source
    }

    pub fn reset(&mut self) {
        trace!("Reset view to source");
        self.view = self.source.clone();
        self.filtered = false;
    }

    pub fn apply_view(&mut self, new_view: Table) {
        trace!(
            "Publish view with {}/{} rows",
            new_view.nrows(),
            self.source.nrows()
        );
        self.view = new_view;
        self.filtered = true;
    }

    /// Whether the view was published by a filter since the last load or reset.
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["name".into(), "city".into(), "age".into()]
    }

    fn rows() -> Vec<Vec<Cell>> {
        vec![
            vec!["Ann".into(), "Vienna".into(), Cell::Int(31)],
            vec!["Bob".into(), "Graz".into(), Cell::Null],
        ]
    }

    #[test]
    fn load_sets_source_and_view() {
        let mut store = TableStore::new();
        store.load(columns(), rows()).unwrap();
        assert_eq!(store.view().nrows(), 2);
        assert_eq!(store.view(), store.source());
        assert!(!store.is_filtered());
    }

    #[test]
    fn rejected_load_keeps_previous_table() {
        let mut store = TableStore::new();
        store.load(columns(), rows()).unwrap();
        let first = store.view().clone();

        let err = store
            .load(columns(), vec![vec!["Eve".into(), "Linz".into()]])
            .unwrap_err();
        assert!(matches!(
            err,
            TVError::SchemaMismatch {
                row: 0,
                expected: 3,
                found: 2
            }
        ));
        assert_eq!(store.view(), &first);
        assert_eq!(store.source(), &first);
    }

    #[test]
    fn reset_restores_source_and_is_idempotent() {
        let mut store = TableStore::new();
        store.load(columns(), rows()).unwrap();
        let narrowed = store.source().with_rows(rows()[..1].to_vec());
        store.apply_view(narrowed);
        assert!(store.is_filtered());
        assert_eq!(store.view().nrows(), 1);
        assert_eq!(store.source().nrows(), 2);

        store.reset();
        let once = store.view().clone();
        store.reset();
        assert_eq!(store.view(), &once);
        assert_eq!(store.view(), store.source());
    }

    #[test]
    fn nan_table_is_not_filtered_after_load_or_reset() {
        let mut store = TableStore::new();
        store
            .load(vec!["x".into()], vec![vec![Cell::Float(f64::NAN)]])
            .unwrap();
        assert!(!store.is_filtered());
        assert_eq!(store.view(), store.source());

        store.apply_view(store.source().clone());
        assert!(store.is_filtered());
        store.reset();
        assert!(!store.is_filtered());
    }

    #[test]
    fn new_load_discards_old_view() {
        let mut store = TableStore::new();
        store.load(columns(), rows()).unwrap();
        store.apply_view(store.source().with_rows(Vec::new()));

        store
            .load(vec!["x".into()], vec![vec![Cell::Int(1)]])
            .unwrap();
        assert!(!store.is_filtered());
        assert_eq!(store.view().columns(), ["x".to_string()]);
        assert_eq!(store.view().nrows(), 1);
    }
}
