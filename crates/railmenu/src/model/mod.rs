//! List models for the launcher's grids.
//!
//! - [`SortableList`]: observable list sortable by a named field
//! - [`FieldSet`] / [`Record`]: static registry of a record type's fields
//! - [`ListSignals`]: change notifications consumed by views

mod field;
mod signals;
mod sortable_list;

pub use field::{CompareFn, DisplayFn, FieldSet, Record, SortDirection, SortField};
pub use signals::{ListSignals, SortState};
pub use sortable_list::SortableList;
