//! A command's current and default binding.

use railmenu_core::Property;

use super::descriptor::KeyInput;

/// The binding of one user command.
///
/// The default never changes; the current binding is what the user has
/// configured. Both are the same kind of [`KeyInput`].
#[derive(Debug)]
pub struct KeyBinding {
    current: Property<KeyInput>,
    default: KeyInput,
}

impl KeyBinding {
    /// Creates a binding set to its default.
    pub fn new(default: KeyInput) -> Self {
        Self {
            current: Property::new(default.clone()),
            default,
        }
    }

    /// The current binding.
    pub fn current(&self) -> KeyInput {
        self.current.get()
    }

    /// The default binding.
    pub fn default_input(&self) -> &KeyInput {
        &self.default
    }

    /// Replaces the current binding. Returns `true` if it changed.
    pub fn set(&self, input: KeyInput) -> bool {
        self.current.set(input)
    }

    /// Restores the default. Returns `true` if the binding changed.
    pub fn reset(&self) -> bool {
        self.current.set(self.default.clone())
    }

    /// Returns `true` if the current binding equals the default.
    pub fn is_default(&self) -> bool {
        self.current.with(|current| *current == self.default)
    }
}

impl Clone for KeyBinding {
    fn clone(&self) -> Self {
        Self {
            current: Property::new(self.current()),
            default: self.default.clone(),
        }
    }
}

static_assertions::assert_impl_all!(KeyBinding: Send, Sync);
