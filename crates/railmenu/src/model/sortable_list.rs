//! Observable list that can be sorted by a named field.
//!
//! `SortableList<T>` backs the launcher's route, activity and saved-game
//! grids. Rows are kept in caller order until [`SortableList::apply_sort`] is
//! called; the list then remembers the field and direction so the view can
//! draw its sort glyph. Clearing the sort leaves rows where they are.

use std::cmp::Ordering;
use std::ops::Deref;

use parking_lot::RwLock;
use railmenu_core::logging::targets;

use super::field::{FieldSet, Record, SortDirection};
use super::signals::{ListSignals, SortState};

/// A list of records that can be stably sorted by any orderable field.
///
/// # Example
///
/// ```
/// use railmenu::model::{FieldSet, Record, SortDirection, SortableList};
///
/// struct Activity {
///     name: &'static str,
///     duration_min: u32,
/// }
///
/// impl Record for Activity {
///     fn fields() -> FieldSet<Self> {
///         FieldSet::new()
///             .orderable("name", |a: &Activity| a.name)
///             .orderable("duration", |a: &Activity| a.duration_min)
///     }
/// }
///
/// let list = SortableList::from_items(vec![
///     Activity { name: "Yard shunt", duration_min: 30 },
///     Activity { name: "Express", duration_min: 90 },
///     Activity { name: "Branch local", duration_min: 45 },
/// ]);
///
/// list.apply_sort("duration", SortDirection::Descending);
/// assert!(list.is_sorted());
/// assert_eq!(list.items()[0].name, "Express");
///
/// list.remove_sort();
/// assert!(!list.is_sorted());
/// assert_eq!(list.items()[0].name, "Express");
/// ```
pub struct SortableList<T> {
    items: RwLock<Vec<T>>,
    fields: FieldSet<T>,
    sort: RwLock<Option<SortState>>,
    signals: ListSignals,
}

impl<T: Record> SortableList<T> {
    /// Creates an empty list using the record type's registered fields.
    pub fn new() -> Self {
        Self::with_fields(Vec::new(), T::fields())
    }

    /// Creates an unsorted list holding `items` in the given order.
    pub fn from_items(items: Vec<T>) -> Self {
        Self::with_fields(items, T::fields())
    }
}

impl<T: Record> Default for SortableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> SortableList<T> {
    /// Creates an unsorted list with an explicit field set.
    pub fn with_fields(items: Vec<T>, fields: FieldSet<T>) -> Self {
        Self {
            items: RwLock::new(items),
            fields,
            sort: RwLock::new(None),
            signals: ListSignals::new(),
        }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the list holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Appends a record.
    pub fn push(&self, item: T) {
        let row = self.len();
        self.insert(row, item);
    }

    /// Inserts a record at `index`. Returns `false`, and emits nothing, if
    /// `index > len()`.
    ///
    /// The list is not re-sorted. If the new record breaks the recorded
    /// order, the list is already unsorted when `rows_inserted` fires.
    pub fn insert(&self, index: usize, item: T) -> bool {
        let len = self.len();
        if index > len {
            tracing::debug!(target: targets::MODEL, index, len, "insert index out of range");
            return false;
        }

        let mut unsorted = false;
        self.signals.emit_rows_inserted(index, index, || {
            self.items.write().insert(index, item);
            unsorted = self.forget_sort_if_out_of_order(index);
        });
        if unsorted {
            self.signals.sort_changed.emit(None);
        }
        true
    }

    /// Removes and returns the record at `index`, or `None` if out of range.
    ///
    /// Removing a record never breaks the order, so the sort state is kept.
    pub fn remove(&self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        let mut removed = None;
        self.signals.emit_rows_removed(index, index, || {
            let mut items = self.items.write();
            if index < items.len() {
                removed = Some(items.remove(index));
            }
        });
        removed
    }

    /// Removes all records. An empty list is trivially in order, so the sort
    /// state is kept.
    pub fn clear(&self) {
        self.signals.emit_reset(|| {
            self.items.write().clear();
        });
    }

    /// Replaces every record and clears the sort state.
    pub fn set_items(&self, items: Vec<T>) {
        self.signals.emit_reset(|| {
            *self.items.write() = items;
        });
        self.drop_sort("contents replaced");
    }

    /// Returns a read guard over the records.
    pub fn items(&self) -> impl Deref<Target = Vec<T>> + '_ {
        self.items.read()
    }

    /// Returns a clone of the record at `index`.
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.items.read().get(index).cloned()
    }

    /// Modifies the record at `index` in place.
    ///
    /// Returns `None` if `index` is out of range. If the change moves the
    /// record out of order, the list becomes unsorted.
    pub fn modify<F, R>(&self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut items = self.items.write();
        let item = items.get_mut(index)?;
        let result = f(item);
        drop(items);

        let unsorted = self.forget_sort_if_out_of_order(index);
        self.signals.emit_data_changed_single(index);
        if unsorted {
            self.signals.sort_changed.emit(None);
        }
        Some(result)
    }

    /// Sorts the records by `field` in `direction`.
    ///
    /// The sort is stable in both directions: records that compare equal keep
    /// their relative order. Sorting by an unknown or opaque field does
    /// nothing. Sorting an empty list, or sorting again by the same field,
    /// is fine.
    pub fn apply_sort(&self, field: &str, direction: SortDirection) {
        let Some(sort_field) = self.fields.get(field) else {
            tracing::debug!(target: targets::MODEL, field, "sort requested on unknown field");
            return;
        };
        let Some(compare) = sort_field.comparator() else {
            tracing::debug!(target: targets::MODEL, field, "sort requested on non-orderable field");
            return;
        };

        let state = SortState {
            field: sort_field.name(),
            direction,
        };
        self.signals.emit_layout_changed(|| {
            self.items
                .write()
                .sort_by(|a, b| direction.apply(compare(a, b)));
            *self.sort.write() = Some(state);
        });

        tracing::debug!(
            target: targets::MODEL,
            field = state.field,
            ?direction,
            rows = self.len(),
            "list sorted"
        );
        self.signals.sort_changed.emit(Some(state));
    }

    /// Forgets the sort state. Records stay in their current order.
    pub fn remove_sort(&self) {
        self.drop_sort("sort removed");
    }

    /// Returns `true` if `field` is registered and can be sorted on.
    pub fn is_orderable(&self, field: &str) -> bool {
        self.fields.is_orderable(field)
    }

    /// Returns `true` if the records are ordered by the recorded field.
    pub fn is_sorted(&self) -> bool {
        self.sort.read().is_some()
    }

    /// The field the list is sorted by, if sorted.
    pub fn sort_field(&self) -> Option<&'static str> {
        self.sort.read().map(|s| s.field)
    }

    /// The direction of the current sort, if sorted.
    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort.read().map(|s| s.direction)
    }

    /// The current sort state, if sorted.
    pub fn sort_state(&self) -> Option<SortState> {
        *self.sort.read()
    }

    /// Renders `field` of the record at `row` with the field's display
    /// accessor.
    pub fn display_text(&self, row: usize, field: &str) -> Option<String> {
        let field = self.fields.get(field)?;
        let items = self.items.read();
        field.display(items.get(row)?)
    }

    /// The record type's registered fields.
    pub fn fields(&self) -> &FieldSet<T> {
        &self.fields
    }

    /// Returns the list's signals.
    pub fn signals(&self) -> &ListSignals {
        &self.signals
    }

    fn drop_sort(&self, reason: &'static str) {
        if self.forget_sort(reason) {
            self.signals.sort_changed.emit(None);
        }
    }

    /// Clears the sort state without emitting. Returns `true` if the list
    /// was sorted.
    fn forget_sort(&self, reason: &'static str) -> bool {
        let was_sorted = self.sort.write().take().is_some();
        if was_sorted {
            tracing::debug!(target: targets::MODEL, reason, "list no longer sorted");
        }
        was_sorted
    }

    /// Clears the sort state, without emitting, if the record at `row` is out
    /// of order with its neighbours. Returns `true` if the state was cleared.
    fn forget_sort_if_out_of_order(&self, row: usize) -> bool {
        let Some(state) = self.sort_state() else {
            return false;
        };
        let Some(compare) = self.fields.get(state.field).and_then(|f| f.comparator()) else {
            return false;
        };

        let in_order = {
            let items = self.items.read();
            let follows = |a: &T, b: &T| state.direction.apply(compare(a, b)) != Ordering::Greater;
            row >= items.len()
                || ((row == 0 || follows(&items[row - 1], &items[row]))
                    && (row + 1 == items.len() || follows(&items[row], &items[row + 1])))
        };

        !in_order && self.forget_sort("row out of order")
    }
}

static_assertions::assert_impl_all!(SortableList<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Route {
        name: &'static str,
        length_km: f64,
        activities: u32,
        tags: Vec<&'static str>,
    }

    impl Record for Route {
        fn fields() -> FieldSet<Self> {
            FieldSet::new()
                .orderable("name", |r: &Route| r.name)
                .partially_orderable("length", |r: &Route| r.length_km)
                .orderable("activities", |r: &Route| r.activities)
                .opaque("tags")
                .display("tags", |r: &Route| r.tags.join(", "))
                .display("name", |r: &Route| r.name.to_string())
        }
    }

    fn route(name: &'static str, length_km: f64, activities: u32) -> Route {
        Route {
            name,
            length_km,
            activities,
            tags: vec![],
        }
    }

    fn sample() -> SortableList<Route> {
        SortableList::from_items(vec![
            route("Marias Pass", 120.0, 3),
            route("Settle Carlisle", 116.0, 5),
            route("Bernina", 61.0, 3),
            route("Chiltern", 180.0, 1),
            route("Arlberg", 61.0, 5),
        ])
    }

    fn names(list: &SortableList<Route>) -> Vec<&'static str> {
        list.items().iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_new_list_is_unsorted() {
        let list = sample();
        assert!(!list.is_sorted());
        assert_eq!(list.sort_field(), None);
        assert_eq!(list.sort_direction(), None);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_ascending_sort_is_non_decreasing() {
        let list = sample();
        list.apply_sort("name", SortDirection::Ascending);

        assert!(list.is_sorted());
        assert_eq!(list.sort_field(), Some("name"));
        assert_eq!(list.sort_direction(), Some(SortDirection::Ascending));
        assert_eq!(
            names(&list),
            vec!["Arlberg", "Bernina", "Chiltern", "Marias Pass", "Settle Carlisle"]
        );
    }

    #[test]
    fn test_descending_sort_is_non_increasing() {
        let list = sample();
        list.apply_sort("length", SortDirection::Descending);

        let lengths: Vec<f64> = list.items().iter().map(|r| r.length_km).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let list = sample();
        // Bernina precedes Arlberg and both are 61 km.
        list.apply_sort("length", SortDirection::Ascending);
        assert_eq!(&names(&list)[..2], &["Bernina", "Arlberg"]);

        let list = sample();
        list.apply_sort("length", SortDirection::Descending);
        assert_eq!(&names(&list)[3..], &["Bernina", "Arlberg"]);

        let list = sample();
        list.apply_sort("activities", SortDirection::Descending);
        assert_eq!(
            names(&list),
            vec!["Settle Carlisle", "Arlberg", "Marias Pass", "Bernina", "Chiltern"]
        );
    }

    #[test]
    fn test_repeated_sort_is_idempotent() {
        let list = sample();
        list.apply_sort("activities", SortDirection::Ascending);
        let once = names(&list);
        list.apply_sort("activities", SortDirection::Ascending);
        assert_eq!(names(&list), once);
    }

    #[test]
    fn test_remove_sort_keeps_order() {
        let list = sample();
        list.apply_sort("name", SortDirection::Descending);
        let sorted = names(&list);

        list.remove_sort();
        assert!(!list.is_sorted());
        assert_eq!(list.sort_field(), None);
        assert_eq!(names(&list), sorted);
    }

    #[test]
    fn test_sort_on_opaque_or_unknown_field_is_noop() {
        let list = sample();
        let before = names(&list);

        list.apply_sort("tags", SortDirection::Ascending);
        assert!(!list.is_sorted());
        assert_eq!(names(&list), before);

        list.apply_sort("name", SortDirection::Ascending);
        let sorted = names(&list);
        list.apply_sort("no_such_field", SortDirection::Descending);
        assert_eq!(list.sort_field(), Some("name"));
        assert_eq!(list.sort_direction(), Some(SortDirection::Ascending));
        assert_eq!(names(&list), sorted);
    }

    #[test]
    fn test_is_orderable() {
        let list = sample();
        assert!(list.is_orderable("name"));
        assert!(list.is_orderable("length"));
        assert!(!list.is_orderable("tags"));
        assert!(!list.is_orderable("unknown"));
    }

    #[test]
    fn test_sort_empty_list() {
        let list = SortableList::<Route>::new();
        list.apply_sort("name", SortDirection::Descending);
        assert!(list.is_sorted());
        assert!(list.is_empty());
    }

    #[test]
    fn test_nan_lengths_sort_last() {
        let items: Vec<Route> = (0..200)
            .map(|i| {
                let length = if i % 3 == 0 { f64::NAN } else { ((i * 37) % 101) as f64 };
                route("r", length, 0)
            })
            .collect();
        let list = SortableList::from_items(items);
        list.apply_sort("length", SortDirection::Ascending);
        assert!(list.is_sorted());

        let lengths: Vec<f64> = list.items().iter().map(|r| r.length_km).collect();
        let first_nan = lengths.iter().position(|l| l.is_nan()).unwrap();
        assert_eq!(first_nan, 200 - 67);
        assert!(lengths[first_nan..].iter().all(|l| l.is_nan()));
        assert!(lengths[..first_nan].windows(2).all(|w| w[0] <= w[1]));

        list.apply_sort("length", SortDirection::Descending);
        let lengths: Vec<f64> = list.items().iter().map(|r| r.length_km).collect();
        assert!(lengths[..67].iter().all(|l| l.is_nan()));
        assert!(lengths[67..].windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_insert_in_order_keeps_sort() {
        let list = sample();
        list.apply_sort("name", SortDirection::Ascending);
        list.insert(1, route("Avon Valley", 10.0, 2));

        assert!(list.is_sorted());
        assert_eq!(list.items()[1].name, "Avon Valley");
    }

    #[test]
    fn test_insert_out_of_order_drops_sort() {
        let list = sample();
        list.apply_sort("name", SortDirection::Ascending);
        list.push(route("Aachen", 10.0, 2));

        assert!(!list.is_sorted());
        assert_eq!(list.items()[5].name, "Aachen");
    }

    #[test]
    fn test_insert_out_of_range_is_rejected() {
        let list = sample();
        let signalled = Arc::new(Mutex::new(0));
        let s = signalled.clone();
        list.signals().rows_about_to_be_inserted.connect(move |_| *s.lock() += 1);

        assert!(!list.insert(6, route("Nowhere", 1.0, 1)));
        assert_eq!(list.len(), 5);
        assert_eq!(*signalled.lock(), 0);

        assert!(list.insert(5, route("Zillertal", 32.0, 2)));
        assert_eq!(list.items()[5].name, "Zillertal");
        assert_eq!(*signalled.lock(), 1);
    }

    #[test]
    fn test_rows_inserted_slot_sees_dropped_sort() {
        let list = Arc::new(sample());
        list.apply_sort("name", SortDirection::Ascending);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner = list.clone();
        let s = seen.clone();
        list.signals().rows_inserted.connect(move |_| s.lock().push(inner.is_sorted()));
        let inner = list.clone();
        let s = seen.clone();
        list.signals().data_changed.connect(move |_| s.lock().push(inner.is_sorted()));

        // In order: stays sorted.
        list.insert(0, route("Aachen", 10.0, 2));
        // Out of order.
        list.push(route("Abtal", 10.0, 2));
        assert_eq!(*seen.lock(), vec![true, false]);

        list.apply_sort("name", SortDirection::Ascending);
        list.modify(0, |r| r.name = "Zug");
        assert_eq!(*seen.lock(), vec![true, false, false]);
    }

    #[test]
    fn test_modify_out_of_order_drops_sort() {
        let list = sample();
        list.apply_sort("activities", SortDirection::Ascending);
        assert_eq!(list.modify(0, |r| r.activities = 9), Some(()));
        assert!(!list.is_sorted());
        assert_eq!(list.modify(99, |r| r.activities = 1), None);
    }

    #[test]
    fn test_remove_keeps_sort() {
        let list = sample();
        list.apply_sort("name", SortDirection::Ascending);

        let removed = list.remove(2);
        assert_eq!(removed.map(|r| r.name), Some("Chiltern"));
        assert!(list.is_sorted());
        assert!(list.remove(10).is_none());
    }

    #[test]
    fn test_set_items_clears_sort() {
        let list = sample();
        list.apply_sort("name", SortDirection::Ascending);
        list.set_items(vec![route("Zermatt", 5.0, 1), route("Albula", 6.0, 1)]);

        assert!(!list.is_sorted());
        assert_eq!(names(&list), vec!["Zermatt", "Albula"]);
    }

    #[test]
    fn test_display_text() {
        let list = SortableList::from_items(vec![Route {
            tags: vec!["mountain", "electric"],
            ..route("Bernina", 61.0, 3)
        }]);
        assert_eq!(list.display_text(0, "tags"), Some("mountain, electric".into()));
        assert_eq!(list.display_text(0, "name"), Some("Bernina".into()));
        assert_eq!(list.display_text(0, "activities"), None);
        assert_eq!(list.display_text(1, "name"), None);
    }

    #[test]
    fn test_sort_signals() {
        let list = sample();
        let log = Arc::new(Mutex::new(Vec::new()));

        let l = log.clone();
        list.signals().layout_about_to_change.connect(move |_| l.lock().push("about".to_string()));
        let l = log.clone();
        list.signals().layout_changed.connect(move |_| l.lock().push("changed".to_string()));
        let l = log.clone();
        list.signals().sort_changed.connect(move |state| {
            l.lock().push(format!("sort {:?}", state.map(|s| s.field)));
        });

        list.apply_sort("tags", SortDirection::Ascending);
        assert!(log.lock().is_empty());

        list.apply_sort("name", SortDirection::Ascending);
        list.remove_sort();
        list.remove_sort();

        assert_eq!(
            *log.lock(),
            vec!["about", "changed", "sort Some(\"name\")", "sort None"]
        );
    }

    #[test]
    fn test_layout_changed_slot_sees_sorted_state() {
        let list = Arc::new(sample());
        let seen = Arc::new(Mutex::new(None));

        let inner = list.clone();
        let s = seen.clone();
        list.signals().layout_changed.connect(move |_| {
            *s.lock() = Some((inner.is_sorted(), inner.items()[0].name));
        });

        list.apply_sort("name", SortDirection::Descending);
        assert_eq!(*seen.lock(), Some((true, "Settle Carlisle")));
    }
}
