//! railmenu - launcher front-end models for a train simulator.
//!
//! The crate holds the parts of the launcher's option dialogs that are not
//! drawing code:
//!
//! - [`model`]: [`SortableList`](model::SortableList), a list model that
//!   sorts by named record fields for the content grids
//! - [`input`]: key bindings and the [`KeyInputControl`](input::KeyInputControl)
//!   that captures a new binding from the keyboard
//! - [`settings`]: settings stores and the user's
//!   [`InputSettings`](settings::InputSettings)
//!
//! # Example
//!
//! ```
//! use railmenu::input::{InputHook, KeyEvent, KeyInputControl};
//! use railmenu::settings::{InputSettings, UserCommand};
//!
//! let settings = InputSettings::new();
//! let hook = InputHook::new();
//! let mut control =
//!     KeyInputControl::with_hook(settings.binding(UserCommand::ControlHorn), &hook);
//!
//! assert!(control.begin_capture());
//! control.handle_key(KeyEvent::press(0x23));
//! control.handle_key(KeyEvent::release(0x23));
//! assert_eq!(control.text(), "H");
//! ```

pub mod input;
pub mod model;
pub mod settings;

pub use railmenu_core::{Property, Signal};
