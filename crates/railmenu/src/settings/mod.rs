//! Persistent settings: typed stores and the user's key bindings.
//!
//! - [`SettingsStore`]: the storage abstraction, with [`MemoryStore`],
//!   [`IniStore`] and [`JsonStore`] implementations
//! - [`UserCommand`]: the bindable commands and their defaults
//! - [`InputSettings`]: every command's [`KeyBinding`](crate::input::KeyBinding),
//!   loaded from and saved to a store

mod commands;
mod error;
mod ini_store;
mod input_settings;
mod json_store;
mod store;

pub use commands::{CommandGroup, UnknownCommand, UserCommand, pretty_command_name};
pub use error::{SettingsError, SettingsResult};
pub use ini_store::{DEFAULT_SECTION, IniStore};
pub use input_settings::{BindingConflict, INPUT_SECTION, InputSettings, KeyCategory, KeyMapEntry};
pub use json_store::JsonStore;
pub use store::{MemoryStore, SettingValue, SettingsStore};
