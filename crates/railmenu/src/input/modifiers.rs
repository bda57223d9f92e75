//! Keyboard modifier sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A combination of Shift, Control and Alt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeyModifiers {
    /// Shift is part of the combination.
    pub shift: bool,
    /// Control is part of the combination.
    pub control: bool,
    /// Alt is part of the combination.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: KeyModifiers = KeyModifiers::new(false, false, false);
    /// Shift only.
    pub const SHIFT: KeyModifiers = KeyModifiers::new(true, false, false);
    /// Control only.
    pub const CONTROL: KeyModifiers = KeyModifiers::new(false, true, false);
    /// Alt only.
    pub const ALT: KeyModifiers = KeyModifiers::new(false, false, true);

    /// Creates a modifier set.
    pub const fn new(shift: bool, control: bool, alt: bool) -> Self {
        Self {
            shift,
            control,
            alt,
        }
    }

    /// Returns `true` if no modifier is set.
    pub fn is_empty(self) -> bool {
        !(self.shift || self.control || self.alt)
    }

    /// Returns the modifiers set in either `self` or `other`.
    pub fn union(self, other: KeyModifiers) -> Self {
        Self::new(
            self.shift || other.shift,
            self.control || other.control,
            self.alt || other.alt,
        )
    }

    /// Returns the modifiers set in both `self` and `other`.
    pub fn intersection(self, other: KeyModifiers) -> Self {
        Self::new(
            self.shift && other.shift,
            self.control && other.control,
            self.alt && other.alt,
        )
    }

    /// Returns `self` without the modifiers set in `other`.
    pub fn difference(self, other: KeyModifiers) -> Self {
        Self::new(
            self.shift && !other.shift,
            self.control && !other.control,
            self.alt && !other.alt,
        )
    }

    /// Names of the set modifiers, in Shift, Control, Alt order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        [
            (self.shift, "Shift"),
            (self.control, "Control"),
            (self.alt, "Alt"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
    }
}

impl fmt::Display for KeyModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}
