//! In-memory table of student rows kept in step with the database.
//!
//! Every mutation reloads the full record set instead of patching rows, so the
//! displayed table can never drift from what is stored.

use std::collections::HashSet;

use tracing::trace;

use crate::db::RecordStore;
use crate::error::Result;
use crate::models::StudentRecord;

/// What the command handlers need from whatever is displaying the records.
pub trait RecordView {
    /// Replace the displayed rows with a fresh copy of the store's contents.
    fn refresh(&mut self, store: &RecordStore) -> Result<()>;

    /// Mark the rows with these ids as the active selection.
    fn highlight(&mut self, ids: &[i64]);

    /// Look up a displayed row by id.
    fn record(&self, id: i64) -> Option<&StudentRecord>;
}

#[derive(Debug, Default)]
pub struct RecordTable {
    rows: Vec<StudentRecord>,
    cursor: Option<usize>,
    highlighted: HashSet<i64>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table already populated from `store`.
    pub fn load(store: &RecordStore) -> Result<Self> {
        let mut table = Self::new();
        table.refresh(store)?;
        Ok(table)
    }

    pub fn rows(&self) -> &[StudentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The record under the cursor; this is the "selected record" edit and
    /// delete operate on.
    pub fn selected(&self) -> Option<&StudentRecord> {
        self.cursor.and_then(|idx| self.rows.get(idx))
    }

    pub fn is_highlighted(&self, id: i64) -> bool {
        self.highlighted.contains(&id)
    }

    pub fn highlighted_count(&self) -> usize {
        self.highlighted.len()
    }

    pub fn select_next(&mut self) {
        self.move_cursor(1);
    }

    pub fn select_previous(&mut self) {
        self.move_cursor(-1);
    }

    /// Put the cursor on the row with `id`. Returns false when no such row is
    /// displayed.
    pub fn select_id(&mut self, id: i64) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.cursor = Some(idx);
                true
            }
            None => false,
        }
    }

    fn move_cursor(&mut self, offset: isize) {
        if self.rows.is_empty() {
            self.cursor = None;
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = Some(match self.cursor {
            None if offset >= 0 => 0,
            None => last,
            Some(idx) => idx.saturating_add_signed(offset).min(last),
        });
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Swap in a new row set, keeping the cursor on the same record when it
    /// survived and clamping it otherwise.
    fn replace_rows(&mut self, rows: Vec<StudentRecord>) {
        let focus_id = self.selected().map(|record| record.id);
        self.rows = rows;
        self.highlighted.clear();

        if self.rows.is_empty() {
            self.cursor = None;
            return;
        }

        if let Some(idx) = focus_id.and_then(|id| self.position(id)) {
            self.cursor = Some(idx);
        } else if let Some(idx) = self.cursor {
            self.cursor = Some(idx.min(self.rows.len() - 1));
        }
    }
}

impl RecordView for RecordTable {
    fn refresh(&mut self, store: &RecordStore) -> Result<()> {
        let rows = store.read_all()?;
        trace!(rows = rows.len(), "refreshing student table");
        self.replace_rows(rows);
        Ok(())
    }

    fn highlight(&mut self, ids: &[i64]) {
        self.highlighted = ids
            .iter()
            .copied()
            .filter(|id| self.position(*id).is_some())
            .collect();
        if let Some(idx) = self
            .rows
            .iter()
            .position(|row| self.highlighted.contains(&row.id))
        {
            self.cursor = Some(idx);
        }
    }

    fn record(&self, id: i64) -> Option<&StudentRecord> {
        self.rows.iter().find(|row| row.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;

    fn record(id: i64, name: &str) -> StudentRecord {
        StudentRecord {
            id,
            name: name.to_string(),
            course: Course::Math,
            mobile: String::new(),
        }
    }

    fn table_with(ids: &[i64]) -> RecordTable {
        let mut table = RecordTable::new();
        table.replace_rows(ids.iter().map(|id| record(*id, "x")).collect());
        table
    }

    #[test]
    fn cursor_starts_unset_and_stays_in_bounds() {
        let mut table = table_with(&[1, 2, 3]);
        assert!(table.selected().is_none());

        table.select_next();
        assert_eq!(table.cursor(), Some(0));
        table.select_previous();
        assert_eq!(table.cursor(), Some(0));
        for _ in 0..5 {
            table.select_next();
        }
        assert_eq!(table.cursor(), Some(2));
    }

    #[test]
    fn replacing_rows_follows_the_selected_id() {
        let mut table = table_with(&[1, 2, 3]);
        assert!(table.select_id(3));

        table.replace_rows(vec![record(3, "x"), record(4, "y")]);
        assert_eq!(table.selected().map(|r| r.id), Some(3));
    }

    #[test]
    fn replacing_rows_clamps_when_selection_vanishes() {
        let mut table = table_with(&[1, 2, 3]);
        table.select_id(3);

        table.replace_rows(vec![record(1, "x")]);
        assert_eq!(table.cursor(), Some(0));

        table.replace_rows(Vec::new());
        assert_eq!(table.cursor(), None);
    }

    #[test]
    fn highlight_ignores_unknown_ids_and_moves_cursor() {
        let mut table = table_with(&[1, 2, 3]);
        table.highlight(&[3, 2, 99]);

        assert_eq!(table.highlighted_count(), 2);
        assert!(table.is_highlighted(2));
        assert!(!table.is_highlighted(99));
        assert_eq!(table.cursor(), Some(1));
    }

    #[test]
    fn replacing_rows_clears_highlights() {
        let mut table = table_with(&[1, 2]);
        table.highlight(&[1]);
        table.replace_rows(vec![record(1, "x"), record(2, "y")]);
        assert_eq!(table.highlighted_count(), 0);
    }
}
