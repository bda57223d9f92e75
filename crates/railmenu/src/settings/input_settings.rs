//! The user's key bindings and their persistence.

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use railmenu_core::logging::targets;

use super::commands::{UserCommand, modulation};
use super::error::{SettingsError, SettingsResult};
use super::store::{SettingValue, SettingsStore};
use crate::input::keys::{KeyboardKey, keyboard_keys, pretty_unique_input};
use crate::input::{Key, KeyBinding, KeyInput};

/// Name of the INI section key bindings are stored in.
pub const INPUT_SECTION: &str = "Keys";

/// A problem found by [`InputSettings::check_for_errors`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingConflict {
    /// A modifiable key requires a modifier that its modulators also use.
    RequiredAndIgnored {
        command: UserCommand,
        modifier: &'static str,
    },
    /// Two commands react to the same key combination.
    SharedInput {
        first: UserCommand,
        second: UserCommand,
        /// The shared unique input, e.g. `Shift+0x1E`.
        input: String,
    },
}

impl fmt::Display for BindingConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingConflict::RequiredAndIgnored { command, modifier } => write!(
                f,
                "{} requires and is modified by {modifier}",
                command.pretty_name()
            ),
            BindingConflict::SharedInput {
                first,
                second,
                input,
            } => write!(
                f,
                "{} and {} both match {}",
                first.pretty_name(),
                second.pretty_name(),
                pretty_unique_input(input)
            ),
        }
    }
}

/// How a key is highlighted on the keyboard map, by what it mostly does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCategory {
    /// Reverser and throttle.
    Power,
    /// Any of the brakes.
    Brake,
    /// Other locomotive controls.
    Control,
    Camera,
    Display,
    /// Game and debug commands.
    Other,
}

/// Command name prefixes and their category, in priority order.
const CATEGORY_PREFIXES: [(&str, KeyCategory); 14] = [
    ("ControlReverser", KeyCategory::Power),
    ("ControlThrottle", KeyCategory::Power),
    ("ControlTrainBrake", KeyCategory::Brake),
    ("ControlEngineBrake", KeyCategory::Brake),
    ("ControlBrakemanBrake", KeyCategory::Brake),
    ("ControlDynamicBrake", KeyCategory::Brake),
    ("ControlBrakeHose", KeyCategory::Brake),
    ("ControlEmergency", KeyCategory::Brake),
    ("ControlBailOff", KeyCategory::Brake),
    ("ControlInitializeBrakes", KeyCategory::Brake),
    ("Control", KeyCategory::Control),
    ("Camera", KeyCategory::Camera),
    ("Display", KeyCategory::Display),
    ("", KeyCategory::Other),
];

/// One key of the keyboard map with the commands bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapEntry {
    pub key: KeyboardKey,
    pub commands: Vec<UserCommand>,
    /// `None` when nothing is bound to the key.
    pub category: Option<KeyCategory>,
}

/// Every user command's key binding.
///
/// Bindings start at their defaults. [`load`](Self::load) applies stored
/// descriptors and [`save`](Self::save) writes back only what differs from
/// the defaults, so a default binding never appears in the settings file.
///
/// # Example
///
/// ```
/// use railmenu::settings::{InputSettings, MemoryStore, SettingsStore, UserCommand};
///
/// let settings = InputSettings::new();
/// let store = MemoryStore::new();
///
/// let horn = settings.binding(UserCommand::ControlHorn);
/// horn.set("35,0,0,0,0".parse().unwrap());
/// settings.save(&store).unwrap();
/// assert_eq!(store.names(), vec!["ControlHorn".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct InputSettings {
    bindings: Vec<KeyBinding>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSettings {
    /// Creates settings with every command on its default binding.
    pub fn new() -> Self {
        Self {
            bindings: UserCommand::ALL
                .iter()
                .map(|command| KeyBinding::new(command.default_input()))
                .collect(),
        }
    }

    /// The binding of `command`.
    pub fn binding(&self, command: UserCommand) -> &KeyBinding {
        &self.bindings[command as usize]
    }

    /// Every command with its binding, in declaration order.
    pub fn bindings(&self) -> impl Iterator<Item = (UserCommand, &KeyBinding)> {
        UserCommand::ALL.iter().copied().zip(self.bindings.iter())
    }

    /// The current input of `command`.
    pub fn input(&self, command: UserCommand) -> KeyInput {
        self.binding(command).current()
    }

    /// Applies the bindings stored in `store`.
    ///
    /// A command with no stored value, or with a value that does not parse,
    /// keeps its default.
    pub fn load(&self, store: &dyn SettingsStore) {
        for (command, binding) in self.bindings() {
            let Some(value) = store.get(command.name()) else {
                binding.reset();
                continue;
            };
            match parse_binding(binding, command, &value) {
                Ok(input) => {
                    binding.set(input);
                }
                Err(err) => {
                    tracing::warn!(target: targets::SETTINGS, "{err}; keeping default");
                    binding.reset();
                }
            }
        }
        self.synchronize_combine();
        tracing::debug!(target: targets::SETTINGS, "input settings loaded");
    }

    /// Writes every non-default binding to `store`, removes the entries of
    /// default bindings, and flushes the store.
    pub fn save(&self, store: &dyn SettingsStore) -> SettingsResult<()> {
        self.synchronize_combine();
        let mut written = 0usize;
        for (command, binding) in self.bindings() {
            if binding.is_default() {
                store.remove(command.name());
            } else {
                store.set(command.name(), SettingValue::String(binding.current().to_descriptor()));
                written += 1;
            }
        }
        tracing::debug!(target: targets::SETTINGS, written, "input settings saved");
        store.flush()
    }

    /// Puts every binding back on its default.
    pub fn reset(&self) {
        for binding in &self.bindings {
            binding.reset();
        }
    }

    /// Recomputes the ignored modifiers of modulated keys from the current
    /// bindings of their modulators.
    pub fn synchronize_combine(&self) {
        for (command, binding) in self.bindings() {
            let modulators = command.modulators();
            if modulators.is_empty() {
                continue;
            }
            let ignore = modulation(modulators.iter().map(|&m| self.input(m)));
            binding.set(binding.current().with_ignored(ignore));
        }
    }

    /// Finds bindings that cannot work as configured.
    ///
    /// Reports modifiable keys that require a modifier they also ignore, and
    /// every unique input shared by two non-modifier commands unless both
    /// commands are on their defaults.
    pub fn check_for_errors(&self) -> Vec<BindingConflict> {
        self.synchronize_combine();

        let mut conflicts = Vec::new();
        for (command, binding) in self.bindings() {
            let input = binding.current();
            let required = input.modifiers().intersection(input.ignored_modifiers());
            for modifier in required.names() {
                conflicts.push(BindingConflict::RequiredAndIgnored { command, modifier });
            }
        }

        let keyed: Vec<(UserCommand, &KeyBinding, Vec<String>)> = self
            .bindings()
            .filter(|(_, binding)| !binding.default_input().is_modifier())
            .map(|(command, binding)| (command, binding, binding.current().unique_inputs()))
            .collect();

        for (i, (first, first_binding, first_inputs)) in keyed.iter().enumerate() {
            for (second, second_binding, second_inputs) in &keyed[i + 1..] {
                if first_binding.is_default() && second_binding.is_default() {
                    continue;
                }
                for input in first_inputs.iter().filter(|i| second_inputs.contains(*i)) {
                    conflicts.push(BindingConflict::SharedInput {
                        first: *first,
                        second: *second,
                        input: input.clone(),
                    });
                }
            }
        }

        if !conflicts.is_empty() {
            tracing::debug!(target: targets::SETTINGS, count = conflicts.len(), "binding conflicts found");
        }
        conflicts
    }

    /// Commands whose key binding uses the scan code `code`.
    pub fn commands_for_scan_code(&self, code: u16) -> Vec<UserCommand> {
        self.bindings()
            .filter(|(_, binding)| {
                binding
                    .current()
                    .stroke()
                    .is_some_and(|stroke| stroke.key == Key::Scan(code))
            })
            .map(|(command, _)| command)
            .collect()
    }

    /// The highlight category of the key with scan code `code`, or `None`
    /// when no command uses it.
    pub fn scan_code_category(&self, code: u16) -> Option<KeyCategory> {
        let commands = self.commands_for_scan_code(code);
        CATEGORY_PREFIXES
            .iter()
            .find(|(prefix, _)| commands.iter().any(|c| c.name().starts_with(prefix)))
            .map(|&(_, category)| category)
    }

    /// Every key of the keyboard layout with the commands bound to it.
    pub fn keyboard_map(&self) -> Vec<KeyMapEntry> {
        keyboard_keys()
            .map(|key| KeyMapEntry {
                key,
                commands: self.commands_for_scan_code(key.scan_code),
                category: self.scan_code_category(key.scan_code),
            })
            .collect()
    }

    /// Writes a plain-text table of every command, its binding and its
    /// unique inputs.
    pub fn dump_to_text(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer, "{:<40}{:<40}{}", "Command", "Key", "Unique Inputs")?;
        writeln!(writer, "{}", "=".repeat(40 * 3))?;
        for (command, binding) in self.bindings() {
            let input = binding.current();
            let mut unique = input.unique_inputs();
            unique.sort();
            writeln!(
                writer,
                "{:<40}{:<40}{}",
                command.pretty_name(),
                input.to_string(),
                unique.join(", ")
            )?;
        }
        Ok(())
    }

    /// Writes [`dump_to_text`](Self::dump_to_text) to a file.
    pub fn dump_to_file(&self, path: impl AsRef<Path>) -> SettingsResult<()> {
        let path = path.as_ref();
        let mut file = std::fs::File::create(path).map_err(|e| SettingsError::io(path, e))?;
        self.dump_to_text(&mut file).map_err(|e| SettingsError::io(path, e))
    }
}

static_assertions::assert_impl_all!(InputSettings: Send, Sync);

fn parse_binding(
    binding: &KeyBinding,
    command: UserCommand,
    value: &SettingValue,
) -> SettingsResult<KeyInput> {
    let invalid = || SettingsError::invalid_value(command.name(), value.to_string());
    let descriptor = value.as_str().ok_or_else(invalid)?;
    binding
        .default_input()
        .with_descriptor(descriptor)
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyModifiers, KeyStroke};
    use crate::settings::MemoryStore;

    fn scan_with(code: u16, modifiers: KeyModifiers) -> KeyInput {
        KeyInput::Key(KeyStroke::scan(code).with_modifiers(modifiers))
    }

    #[test]
    fn test_defaults_have_no_errors() {
        let settings = InputSettings::new();
        assert_eq!(settings.check_for_errors(), Vec::new());
        assert!(settings.bindings().all(|(_, b)| b.is_default()));
    }

    #[test]
    fn test_shared_input_reported() {
        let settings = InputSettings::new();
        // Throttle Increase onto Throttle Decrease's key.
        settings
            .binding(UserCommand::ControlThrottleIncrease)
            .set(KeyInput::Key(KeyStroke::scan(0x1E)));

        let conflicts = settings.check_for_errors();
        assert_eq!(
            conflicts,
            vec![BindingConflict::SharedInput {
                first: UserCommand::ControlThrottleIncrease,
                second: UserCommand::ControlThrottleDecrease,
                input: "0x1E".to_string(),
            }]
        );
        assert_eq!(
            conflicts[0].to_string(),
            "Control Throttle Increase and Control Throttle Decrease both match A"
        );
    }

    #[test]
    fn test_default_duplicates_are_ignored() {
        let settings = InputSettings::new();
        assert_eq!(
            settings.input(UserCommand::ControlInjector1),
            settings.input(UserCommand::ControlCircuitBreakerOpeningOrder)
        );
        assert!(settings.check_for_errors().is_empty());

        settings
            .binding(UserCommand::ControlInjector1)
            .set(scan_with(0x17, KeyModifiers::SHIFT));
        settings
            .binding(UserCommand::ControlInjector1)
            .set(scan_with(0x17, KeyModifiers::NONE));
        assert!(settings.check_for_errors().is_empty());
    }

    #[test]
    fn test_modulated_key_conflicts() {
        let settings = InputSettings::new();
        // Move-fast on Alt makes Camera Rotate (Alt + arrow) ignore Alt too.
        settings
            .binding(UserCommand::CameraMoveFast)
            .set(KeyInput::Modifier(KeyModifiers::ALT));

        let conflicts = settings.check_for_errors();
        assert!(conflicts.contains(&BindingConflict::RequiredAndIgnored {
            command: UserCommand::CameraRotateLeft,
            modifier: "Alt",
        }));
        let message = conflicts
            .iter()
            .find(|c| matches!(c, BindingConflict::RequiredAndIgnored { .. }))
            .map(ToString::to_string);
        assert_eq!(
            message.as_deref(),
            Some("Camera Rotate Left requires and is modified by Alt")
        );

        // Pan Left now matches Alt + Left, which Camera Scroll Left requires.
        assert!(conflicts.contains(&BindingConflict::SharedInput {
            first: UserCommand::CameraPanLeft,
            second: UserCommand::CameraScrollLeft,
            input: "Alt+0x4B".to_string(),
        }));
    }

    #[test]
    fn test_synchronize_combine_follows_modulators() {
        let settings = InputSettings::new();
        settings
            .binding(UserCommand::DisplayNextWindowTab)
            .set(KeyInput::Modifier(KeyModifiers::CONTROL));
        settings.synchronize_combine();

        let help = settings.input(UserCommand::DisplayHelpWindow);
        assert_eq!(help.ignored_modifiers(), KeyModifiers::CONTROL);
        assert_eq!(help.to_descriptor(), "59,0,0,0,0,0,1,0");

        settings.reset();
        assert_eq!(
            settings.input(UserCommand::DisplayHelpWindow).ignored_modifiers(),
            KeyModifiers::SHIFT
        );
    }

    #[test]
    fn test_save_writes_only_changes() {
        let settings = InputSettings::new();
        let store = MemoryStore::new();
        store.set("ControlBell", "48,0,1,0,0".into());

        settings
            .binding(UserCommand::ControlHorn)
            .set(scan_with(0x23, KeyModifiers::NONE));
        settings.save(&store).unwrap();

        assert_eq!(store.names(), vec!["ControlHorn".to_string()]);
        assert_eq!(store.get("ControlHorn"), Some("35,0,0,0,0".into()));
    }

    #[test]
    fn test_load_applies_and_keeps_defaults() {
        let store = MemoryStore::new();
        store.set("ControlHorn", "35,0,0,0,0".into());
        store.set("ControlBell", "garbage".into());
        store.set("ControlWiper", SettingValue::Int(3));
        store.set("CameraMoveFast", "0,0,0,0,1".into());

        let settings = InputSettings::new();
        settings.binding(UserCommand::ControlSander).set(KeyInput::Key(KeyStroke::UNBOUND));
        settings.load(&store);

        assert_eq!(settings.input(UserCommand::ControlHorn), scan_with(0x23, KeyModifiers::NONE));
        assert!(settings.binding(UserCommand::ControlBell).is_default());
        assert!(settings.binding(UserCommand::ControlWiper).is_default());
        assert!(settings.binding(UserCommand::ControlSander).is_default());
        assert_eq!(
            settings.input(UserCommand::CameraMoveFast),
            KeyInput::Modifier(KeyModifiers::ALT)
        );
        assert_eq!(
            settings.input(UserCommand::CameraPanUp).ignored_modifiers(),
            KeyModifiers::new(false, true, true)
        );
    }

    #[test]
    fn test_load_keeps_kind_of_command() {
        let store = MemoryStore::new();
        // A plain five-field descriptor on a modifiable key.
        store.set("CameraZoomIn", "73,0,0,1,0".into());

        let settings = InputSettings::new();
        settings.load(&store);
        let zoom = settings.input(UserCommand::CameraZoomIn);
        assert!(matches!(zoom, KeyInput::ModifiableKey { .. }));
        assert_eq!(zoom.modifiers(), KeyModifiers::CONTROL);
        assert_eq!(
            settings.check_for_errors(),
            vec![BindingConflict::RequiredAndIgnored {
                command: UserCommand::CameraZoomIn,
                modifier: "Control",
            }]
        );
    }

    #[test]
    fn test_commands_for_scan_code() {
        let settings = InputSettings::new();
        assert_eq!(
            settings.commands_for_scan_code(0x22),
            vec![
                UserCommand::GameSwitchAhead,
                UserCommand::GameSwitchBehind,
                UserCommand::GameSwitchPicked,
                UserCommand::GameSignalPicked,
            ]
        );
        assert!(settings.commands_for_scan_code(0x59).is_empty());
    }

    #[test]
    fn test_scan_code_category() {
        let settings = InputSettings::new();
        assert_eq!(settings.scan_code_category(0x1E), Some(KeyCategory::Power));
        assert_eq!(settings.scan_code_category(0x27), Some(KeyCategory::Brake));
        assert_eq!(settings.scan_code_category(0x39), Some(KeyCategory::Control));
        assert_eq!(settings.scan_code_category(0x4B), Some(KeyCategory::Camera));
        assert_eq!(settings.scan_code_category(0x22), Some(KeyCategory::Other));
        assert_eq!(settings.scan_code_category(0x59), None);

        let map = settings.keyboard_map();
        let horn = map.iter().find(|e| e.key.scan_code == 0x39).unwrap();
        assert_eq!(horn.commands, vec![UserCommand::ControlHorn]);
    }

    #[test]
    fn test_dump_to_text() {
        let settings = InputSettings::new();
        let mut out = Vec::new();
        settings.dump_to_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], format!("{:<40}{:<40}{}", "Command", "Key", "Unique Inputs"));
        assert_eq!(lines[1], "=".repeat(120));
        assert_eq!(lines.len(), UserCommand::ALL.len() + 2);

        let pan = lines
            .iter()
            .find(|l| l.starts_with("Camera Pan Left "))
            .unwrap();
        assert!(pan.ends_with("0x4B, Control+0x4B, Shift+0x4B, Shift+Control+0x4B"));
        assert!(pan.contains("Left (+ Shift) (+ Control)"));
    }
}
