//! Change notifications for list models.

use railmenu_core::Signal;

use super::field::SortDirection;

/// The field and direction a list is currently sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    /// Name of the field the list is sorted on.
    pub field: &'static str,
    /// Direction of the sort.
    pub direction: SortDirection,
}

/// Signals emitted by list models.
///
/// Views connect to these to keep their rows in step with the model. Row
/// signals carry `(first, last)` inclusive ranges.
pub struct ListSignals {
    /// Rows `(first, last)` are about to appear.
    pub rows_about_to_be_inserted: Signal<(usize, usize)>,
    /// Rows `(first, last)` appeared.
    pub rows_inserted: Signal<(usize, usize)>,
    /// Rows `(first, last)` are about to go.
    pub rows_about_to_be_removed: Signal<(usize, usize)>,
    /// Rows `(first, last)` are gone. Later rows moved up.
    pub rows_removed: Signal<(usize, usize)>,
    /// Records in `(first, last)` were edited in place.
    pub data_changed: Signal<(usize, usize)>,
    /// The row order is about to change.
    pub layout_about_to_change: Signal<()>,
    /// Rows were reordered; row indices held by views are stale.
    pub layout_changed: Signal<()>,
    /// All records are about to be replaced.
    pub model_about_to_reset: Signal<()>,
    /// All records were replaced.
    pub model_reset: Signal<()>,
    /// The list was sorted (`Some`) or stopped being sorted (`None`).
    pub sort_changed: Signal<Option<SortState>>,
}

impl Default for ListSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSignals {
    pub fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            data_changed: Signal::new(),
            layout_about_to_change: Signal::new(),
            layout_changed: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
            sort_changed: Signal::new(),
        }
    }

    /// Runs `insert` between the two insertion signals.
    pub fn emit_rows_inserted(&self, first: usize, last: usize, insert: impl FnOnce()) {
        self.rows_about_to_be_inserted.emit((first, last));
        insert();
        self.rows_inserted.emit((first, last));
    }

    /// Runs `remove` between the two removal signals.
    pub fn emit_rows_removed(&self, first: usize, last: usize, remove: impl FnOnce()) {
        self.rows_about_to_be_removed.emit((first, last));
        remove();
        self.rows_removed.emit((first, last));
    }

    /// `data_changed` for one row.
    pub fn emit_data_changed_single(&self, row: usize) {
        self.data_changed.emit((row, row));
    }

    /// Runs `replace` between the two reset signals.
    pub fn emit_reset(&self, replace: impl FnOnce()) {
        self.model_about_to_reset.emit(());
        replace();
        self.model_reset.emit(());
    }

    /// Runs `reorder` between the two layout signals.
    pub fn emit_layout_changed(&self, reorder: impl FnOnce()) {
        self.layout_about_to_change.emit(());
        reorder();
        self.layout_changed.emit(());
    }
}

static_assertions::assert_impl_all!(ListSignals: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_starts_unconnected() {
        let signals = ListSignals::new();
        assert_eq!(signals.rows_inserted.connection_count(), 0);
        assert_eq!(signals.sort_changed.connection_count(), 0);
    }

    #[test]
    fn test_emit_rows_inserted_order() {
        let signals = ListSignals::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let l = log.clone();
        signals
            .rows_about_to_be_inserted
            .connect(move |&(first, last)| l.lock().push(format!("before {first}..{last}")));
        let l = log.clone();
        signals
            .rows_inserted
            .connect(move |&(first, last)| l.lock().push(format!("after {first}..{last}")));

        let l = log.clone();
        signals.emit_rows_inserted(2, 3, || l.lock().push("insert".into()));

        assert_eq!(*log.lock(), vec!["before 2..3", "insert", "after 2..3"]);
    }

    #[test]
    fn test_emit_layout_changed_wraps_change() {
        let signals = ListSignals::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let l = log.clone();
        signals.layout_about_to_change.connect(move |_| l.lock().push("about"));
        let l = log.clone();
        signals.layout_changed.connect(move |_| l.lock().push("changed"));

        let l = log.clone();
        signals.emit_layout_changed(|| l.lock().push("sort"));

        assert_eq!(*log.lock(), vec!["about", "sort", "changed"]);
    }
}
