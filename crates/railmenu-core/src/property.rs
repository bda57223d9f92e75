//! Values with change detection.
//!
//! A [`Property`] only reports a write as a change when the new value differs
//! from the stored one. Owners pair it with a [`Signal`](crate::Signal) and
//! emit only on real changes:
//!
//! ```
//! use railmenu_core::{Property, Signal};
//!
//! struct Binding {
//!     descriptor: Property<String>,
//!     changed: Signal<String>,
//! }
//!
//! impl Binding {
//!     fn assign(&self, descriptor: &str) {
//!         if self.descriptor.set(descriptor.to_string()) {
//!             self.changed.emit(descriptor.to_string());
//!         }
//!     }
//! }
//!
//! let binding = Binding { descriptor: Property::new("57,0,0,0,0".into()), changed: Signal::new() };
//! binding.assign("35,0,0,0,0");
//! assert_eq!(binding.descriptor.get(), "35,0,0,0,0");
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value behind a lock that knows when a write changed it.
///
/// `Property<T>` is `Send + Sync` whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A clone of the stored value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Runs `f` on the stored value without cloning it.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Stores `value`. Returns `true` if it differs from the previous value.
    pub fn set(&self, value: T) -> bool {
        let mut stored = self.value.write();
        if *stored == value {
            return false;
        }
        *stored = value;
        true
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}

static_assertions::assert_impl_all!(Property<String>: Send, Sync);
