//! Keyboard input: key codes, bindings and the binding capture control.
//!
//! - [`KeyInput`]: a command's binding and its persistent descriptor
//! - [`KeyBinding`]: current plus default binding of one command
//! - [`InputHook`]: the exclusive keyboard slot a capture session holds
//! - [`KeyInputControl`]: the capture control used by the options dialog

mod binding;
mod capture;
mod descriptor;
mod error;
mod hook;
pub mod keys;
mod modifiers;

pub use binding::KeyBinding;
pub use capture::{
    CaptureOutcome, CaptureState, DisplayStyle, KeyAction, KeyDisposition, KeyEvent,
    KeyInputControl,
};
pub use descriptor::{Key, KeyInput, KeyInputKind, KeyStroke};
pub use error::{DescriptorError, DescriptorResult, HookError};
pub use hook::{HookGuard, InputHook};
pub use keys::VirtualKey;
pub use modifiers::KeyModifiers;
