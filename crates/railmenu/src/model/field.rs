//! Sortable field registry.
//!
//! A record type describes its sortable columns once, as named accessors.
//! Each field either knows how to compare two records (it is *orderable*) or
//! it does not (it is *opaque*); views can ask before offering a sort.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Type alias for a record comparison function.
pub type CompareFn<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Type alias for a field display function.
pub type DisplayFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest value first (A-Z, 0-9).
    #[default]
    Ascending,
    /// Largest value first (Z-A, 9-0).
    Descending,
}

impl SortDirection {
    /// Applies this direction to a comparison result.
    ///
    /// Descending reverses the comparison itself, never the sorted sequence,
    /// so a stable sort still keeps equal records in their prior order.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// A named field of a record type.
pub struct SortField<T> {
    name: &'static str,
    compare: Option<CompareFn<T>>,
    display: Option<DisplayFn<T>>,
}

impl<T> SortField<T> {
    /// The field's name, as used by [`SortableList::apply_sort`](super::SortableList::apply_sort).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if records can be ordered by this field.
    pub fn is_orderable(&self) -> bool {
        self.compare.is_some()
    }

    /// The comparison function, if the field is orderable.
    pub fn comparator(&self) -> Option<&CompareFn<T>> {
        self.compare.as_ref()
    }

    /// Renders the field of `record` for display, if a display accessor was registered.
    pub fn display(&self, record: &T) -> Option<String> {
        self.display.as_ref().map(|display| display(record))
    }
}

impl<T> Clone for SortField<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            compare: self.compare.clone(),
            display: self.display.clone(),
        }
    }
}

impl<T> fmt::Debug for SortField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortField")
            .field("name", &self.name)
            .field("orderable", &self.is_orderable())
            .field("displayable", &self.display.is_some())
            .finish()
    }
}

/// The set of fields registered for a record type.
///
/// # Example
///
/// ```
/// use railmenu::model::FieldSet;
///
/// struct Route {
///     name: String,
///     length_km: f64,
///     tags: Vec<String>,
/// }
///
/// let fields = FieldSet::<Route>::new()
///     .orderable("name", |r| r.name.clone())
///     .partially_orderable("length", |r| r.length_km)
///     .opaque("tags")
///     .display("name", |r| r.name.clone());
///
/// assert!(fields.is_orderable("name"));
/// assert!(!fields.is_orderable("tags"));
/// assert!(!fields.is_orderable("missing"));
/// ```
pub struct FieldSet<T> {
    fields: Vec<SortField<T>>,
}

impl<T: 'static> FieldSet<T> {
    /// Creates an empty field set.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Registers a field whose value type has a total order.
    pub fn orderable<K, F>(self, name: &'static str, accessor: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.compared_by(name, move |a, b| accessor(a).cmp(&accessor(b)))
    }

    /// Registers a field whose value type only has a partial order.
    ///
    /// A value that is not comparable with itself (such as `NaN`) sorts after
    /// every comparable value, and all such values compare equal, so the
    /// comparison stays a total order.
    pub fn partially_orderable<K, F>(self, name: &'static str, accessor: F) -> Self
    where
        K: PartialOrd,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.compared_by(name, move |a, b| total_cmp(&accessor(a), &accessor(b)))
    }

    /// Registers a field with an explicit comparison function.
    pub fn compared_by<F>(mut self, name: &'static str, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.entry(name).compare = Some(Arc::new(compare));
        self
    }

    /// Registers a field that cannot be sorted on.
    pub fn opaque(mut self, name: &'static str) -> Self {
        self.entry(name).compare = None;
        self
    }

    /// Attaches a display accessor to a field, registering it as opaque if
    /// it is not known yet.
    pub fn display<F>(mut self, name: &'static str, display: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.entry(name).display = Some(Arc::new(display));
        self
    }

    fn entry(&mut self, name: &'static str) -> &mut SortField<T> {
        let index = match self.fields.iter().position(|f| f.name == name) {
            Some(index) => index,
            None => {
                self.fields.push(SortField {
                    name,
                    compare: None,
                    display: None,
                });
                self.fields.len() - 1
            }
        };
        &mut self.fields[index]
    }
}

fn total_cmp<K: PartialOrd>(a: &K, b: &K) -> Ordering {
    a.partial_cmp(b).unwrap_or_else(|| {
        let unordered = |k: &K| k.partial_cmp(k).is_none();
        unordered(a).cmp(&unordered(b))
    })
}

impl<T> FieldSet<T> {
    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&SortField<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns `true` if `name` is a registered, orderable field.
    pub fn is_orderable(&self, name: &str) -> bool {
        self.get(name).is_some_and(SortField::is_orderable)
    }

    /// The registered field names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Iterates over the registered fields.
    pub fn iter(&self) -> impl Iterator<Item = &SortField<T>> {
        self.fields.iter()
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T: 'static> Default for FieldSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FieldSet<T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

/// A record type that can live in a [`SortableList`](super::SortableList).
///
/// Implementors register their fields once; the list consults the registry
/// instead of inspecting the type at runtime.
pub trait Record: Send + Sync + 'static {
    /// Returns the fields of this record type.
    fn fields() -> FieldSet<Self>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Consist {
        name: &'static str,
        max_speed: f32,
        cars: u32,
    }

    fn fields() -> FieldSet<Consist> {
        FieldSet::new()
            .orderable("name", |c: &Consist| c.name)
            .partially_orderable("max_speed", |c: &Consist| c.max_speed)
            .opaque("cars")
            .display("cars", |c: &Consist| c.cars.to_string())
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(SortDirection::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortDirection::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Descending.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
    }

    #[test]
    fn test_orderable_lookup() {
        let fields = fields();
        assert!(fields.is_orderable("name"));
        assert!(fields.is_orderable("max_speed"));
        assert!(!fields.is_orderable("cars"));
        assert!(!fields.is_orderable("unknown"));
        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["name", "max_speed", "cars"]);
    }

    #[test]
    fn test_display_does_not_change_orderability() {
        let fields = fields().display("name", |c: &Consist| c.name.to_uppercase());
        assert!(fields.is_orderable("name"));
        assert_eq!(fields.len(), 3);

        let consist = Consist { name: "freight", max_speed: 80.0, cars: 40 };
        assert_eq!(fields.get("name").and_then(|f| f.display(&consist)), Some("FREIGHT".into()));
        assert_eq!(fields.get("cars").and_then(|f| f.display(&consist)), Some("40".into()));
        assert_eq!(fields.get("max_speed").and_then(|f| f.display(&consist)), None);
    }

    #[test]
    fn test_partial_order_puts_nan_last() {
        let fields = fields();
        let compare = fields.get("max_speed").and_then(|f| f.comparator()).cloned().unwrap();
        let nan = Consist { name: "a", max_speed: f32::NAN, cars: 1 };
        let other_nan = Consist { name: "b", max_speed: f32::NAN, cars: 1 };
        let slow = Consist { name: "c", max_speed: 10.0, cars: 1 };
        let fast = Consist { name: "d", max_speed: 160.0, cars: 1 };

        assert_eq!(compare(&nan, &slow), Ordering::Greater);
        assert_eq!(compare(&slow, &nan), Ordering::Less);
        assert_eq!(compare(&nan, &other_nan), Ordering::Equal);
        assert_eq!(compare(&slow, &fast), Ordering::Less);
    }

    #[test]
    fn test_reregistering_replaces_field() {
        let fields = fields().opaque("name");
        assert!(!fields.is_orderable("name"));
        assert_eq!(fields.len(), 3);
    }
}
