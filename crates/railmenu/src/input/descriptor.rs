//! Key input descriptors.
//!
//! A [`KeyInput`] is what a user command is bound to. It persists as a
//! comma-separated descriptor:
//!
//! ```text
//! scan,virtual,shift,control,alt[,ignoreShift,ignoreControl,ignoreAlt]
//! ```
//!
//! Flags are `0` or `1`; any value other than `0` reads as set.
//!
//! # Example
//!
//! ```
//! use railmenu::input::{KeyInput, KeyModifiers, KeyStroke};
//!
//! let quit = KeyInput::Key(KeyStroke::scan(0x3E).with_modifiers(KeyModifiers::ALT));
//! assert_eq!(quit.to_descriptor(), "62,0,0,0,1");
//! assert_eq!(quit.to_string(), "Alt + F4");
//!
//! let parsed: KeyInput = "62,0,0,0,1".parse().unwrap();
//! assert_eq!(parsed, quit);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{DescriptorError, DescriptorResult};
use super::keys::{VirtualKey, scan_code_name};
use super::modifiers::KeyModifiers;

/// The key part of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Key {
    /// No key: the binding is erased.
    #[default]
    None,
    /// A physical key, by scan code.
    Scan(u16),
    /// A logical key, by virtual key code.
    Virtual(VirtualKey),
}

impl Key {
    /// Builds a key from descriptor codes. A virtual key wins over a scan code.
    pub fn from_codes(scan_code: u16, virtual_key: VirtualKey) -> Self {
        if !virtual_key.is_none() {
            Key::Virtual(virtual_key)
        } else if scan_code != 0 {
            Key::Scan(scan_code)
        } else {
            Key::None
        }
    }

    /// Returns `true` for [`Key::None`].
    pub fn is_none(self) -> bool {
        matches!(self, Key::None)
    }

    /// The scan code, or 0 for virtual keys and no key.
    pub fn scan_code(self) -> u16 {
        match self {
            Key::Scan(code) => code,
            _ => 0,
        }
    }

    /// The virtual key, or [`VirtualKey::NONE`].
    pub fn virtual_key(self) -> VirtualKey {
        match self {
            Key::Virtual(key) => key,
            _ => VirtualKey::NONE,
        }
    }

    fn unique_token(self) -> Option<String> {
        match self {
            Key::None => None,
            Key::Scan(code) => Some(format!("0x{code:02X}")),
            Key::Virtual(key) => Some(key.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::None => Ok(()),
            Key::Scan(code) => f.write_str(&scan_code_name(*code)),
            Key::Virtual(key) => fmt::Display::fmt(key, f),
        }
    }
}

/// A key together with the exact modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyStroke {
    /// The key.
    pub key: Key,
    /// Modifiers that must be held.
    pub modifiers: KeyModifiers,
}

impl KeyStroke {
    /// The erased binding: no key, no modifiers.
    pub const UNBOUND: KeyStroke = KeyStroke {
        key: Key::None,
        modifiers: KeyModifiers::NONE,
    };

    /// A key stroke by scan code, without modifiers.
    pub const fn scan(code: u16) -> Self {
        Self {
            key: Key::Scan(code),
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A key stroke by virtual key, without modifiers.
    pub const fn virtual_key(key: VirtualKey) -> Self {
        Self {
            key: Key::Virtual(key),
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Returns this stroke with `modifiers` required.
    pub const fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Returns `true` if no key is bound.
    pub fn is_unbound(&self) -> bool {
        self.key.is_none()
    }

    fn descriptor_prefix(&self) -> String {
        format!(
            "{},{},{}",
            self.key.scan_code(),
            self.key.virtual_key().0,
            flags(self.modifiers)
        )
    }
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbound() {
            return Ok(());
        }
        for name in self.modifiers.names() {
            write!(f, "{name} + ")?;
        }
        fmt::Display::fmt(&self.key, f)
    }
}

/// The three kinds of binding a user command can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInputKind {
    /// Modifiers only.
    Modifier,
    /// A key plus exact modifiers.
    Key,
    /// A key plus exact modifiers, with some modifiers ignored.
    ModifiableKey,
}

/// A user command's keyboard binding.
///
/// Equality is by value: two inputs are equal when they have the same kind,
/// key and modifier flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum KeyInput {
    /// A modifier-only binding, such as Shift for "move fast".
    Modifier(KeyModifiers),
    /// A key with exact modifiers, such as Alt + F4.
    Key(KeyStroke),
    /// A key whose command is modulated, not replaced, by the `ignore`
    /// modifiers. Up (+ Shift) matches both Up and Shift + Up.
    ModifiableKey {
        /// The key and its required modifiers.
        stroke: KeyStroke,
        /// Modifiers that may additionally be held.
        ignore: KeyModifiers,
    },
}

impl KeyInput {
    /// Which kind of binding this is.
    pub fn kind(&self) -> KeyInputKind {
        match self {
            KeyInput::Modifier(_) => KeyInputKind::Modifier,
            KeyInput::Key(_) => KeyInputKind::Key,
            KeyInput::ModifiableKey { .. } => KeyInputKind::ModifiableKey,
        }
    }

    /// Returns `true` for modifier-only bindings.
    pub fn is_modifier(&self) -> bool {
        matches!(self, KeyInput::Modifier(_))
    }

    /// The modifiers that must be held.
    pub fn modifiers(&self) -> KeyModifiers {
        match self {
            KeyInput::Modifier(modifiers) => *modifiers,
            KeyInput::Key(stroke) | KeyInput::ModifiableKey { stroke, .. } => stroke.modifiers,
        }
    }

    /// The modifiers that are ignored. Empty unless this is a modifiable key.
    pub fn ignored_modifiers(&self) -> KeyModifiers {
        match self {
            KeyInput::ModifiableKey { ignore, .. } => *ignore,
            _ => KeyModifiers::NONE,
        }
    }

    /// The key stroke, unless this is a modifier-only binding.
    pub fn stroke(&self) -> Option<KeyStroke> {
        match self {
            KeyInput::Modifier(_) => None,
            KeyInput::Key(stroke) | KeyInput::ModifiableKey { stroke, .. } => Some(*stroke),
        }
    }

    /// Returns `true` if nothing is bound.
    pub fn is_unbound(&self) -> bool {
        match self {
            KeyInput::Modifier(modifiers) => modifiers.is_empty(),
            KeyInput::Key(stroke) | KeyInput::ModifiableKey { stroke, .. } => stroke.is_unbound(),
        }
    }

    /// The erased binding of the same kind.
    pub fn unbound(&self) -> KeyInput {
        match self {
            KeyInput::Modifier(_) => KeyInput::Modifier(KeyModifiers::NONE),
            KeyInput::Key(_) => KeyInput::Key(KeyStroke::UNBOUND),
            KeyInput::ModifiableKey { ignore, .. } => KeyInput::ModifiableKey {
                stroke: KeyStroke::UNBOUND,
                ignore: *ignore,
            },
        }
    }

    /// Returns this binding with a different key stroke, keeping its kind.
    ///
    /// For modifier bindings only the stroke's modifiers are kept.
    pub fn with_stroke(&self, new_stroke: KeyStroke) -> KeyInput {
        match self {
            KeyInput::Modifier(_) => KeyInput::Modifier(new_stroke.modifiers),
            KeyInput::Key(_) => KeyInput::Key(new_stroke),
            KeyInput::ModifiableKey { ignore, .. } => KeyInput::ModifiableKey {
                stroke: new_stroke,
                ignore: *ignore,
            },
        }
    }

    /// Returns this binding with different ignored modifiers. Only modifiable
    /// keys change.
    pub fn with_ignored(&self, ignore: KeyModifiers) -> KeyInput {
        match self {
            KeyInput::ModifiableKey { stroke, .. } => KeyInput::ModifiableKey {
                stroke: *stroke,
                ignore,
            },
            other => other.clone(),
        }
    }

    /// Formats the persistent descriptor.
    pub fn to_descriptor(&self) -> String {
        match self {
            KeyInput::Modifier(modifiers) => format!("0,0,{}", flags(*modifiers)),
            KeyInput::Key(stroke) => stroke.descriptor_prefix(),
            KeyInput::ModifiableKey { stroke, ignore } => {
                format!("{},{}", stroke.descriptor_prefix(), flags(*ignore))
            }
        }
    }

    /// Parses `descriptor` as a binding of the same kind as `self`.
    ///
    /// This is how stored settings are applied: the command decides the kind
    /// and the descriptor only supplies the values. A modifiable key read
    /// from a five-field descriptor keeps its current ignored modifiers.
    pub fn with_descriptor(&self, descriptor: &str) -> DescriptorResult<KeyInput> {
        let raw = RawDescriptor::parse(descriptor)?;
        let stroke = raw.stroke();
        Ok(match self {
            KeyInput::Modifier(_) => KeyInput::Modifier(raw.modifiers),
            KeyInput::Key(_) => KeyInput::Key(stroke),
            KeyInput::ModifiableKey { ignore, .. } => KeyInput::ModifiableKey {
                stroke,
                ignore: raw.ignore.unwrap_or(*ignore),
            },
        })
    }

    /// The distinct key combinations this binding reacts to, formatted as
    /// `Shift+Control+Alt+key`. Scan codes are written as `0xNN`.
    ///
    /// A modifiable key expands to every combination of its ignored
    /// modifiers. An unbound key has no inputs.
    pub fn unique_inputs(&self) -> Vec<String> {
        match self {
            KeyInput::Modifier(modifiers) => {
                if modifiers.is_empty() {
                    Vec::new()
                } else {
                    vec![modifiers.names().collect::<Vec<_>>().join("+")]
                }
            }
            KeyInput::Key(stroke) => {
                let Some(token) = stroke.key.unique_token() else {
                    return Vec::new();
                };
                let mut input = String::new();
                for name in stroke.modifiers.names() {
                    input.push_str(name);
                    input.push('+');
                }
                input.push_str(&token);
                vec![input]
            }
            KeyInput::ModifiableKey { stroke, ignore } => {
                let Some(token) = stroke.key.unique_token() else {
                    return Vec::new();
                };
                let required = stroke.modifiers;
                // Prefix from Alt outwards so the result reads Shift+Control+Alt+key.
                let steps = [
                    (ignore.alt, required.alt, "Alt+"),
                    (ignore.control, required.control, "Control+"),
                    (ignore.shift, required.shift, "Shift+"),
                ];
                steps
                    .into_iter()
                    .fold(vec![token], |inputs, (ignored, needed, prefix)| {
                        if ignored {
                            inputs
                                .into_iter()
                                .flat_map(|i| [i.clone(), format!("{prefix}{i}")])
                                .collect()
                        } else if needed {
                            inputs.into_iter().map(|i| format!("{prefix}{i}")).collect()
                        } else {
                            inputs
                        }
                    })
            }
        }
    }
}

impl fmt::Display for KeyInput {
    /// Human-readable binding text, e.g. `Control + Alt + F4` or
    /// `Left (+ Shift) (+ Control)`. Unbound inputs display as nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyInput::Modifier(modifiers) => fmt::Display::fmt(modifiers, f),
            KeyInput::Key(stroke) => fmt::Display::fmt(stroke, f),
            KeyInput::ModifiableKey { stroke, ignore } => {
                if stroke.is_unbound() {
                    return Ok(());
                }
                fmt::Display::fmt(stroke, f)?;
                for name in ignore.names() {
                    write!(f, " (+ {name})")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for KeyInput {
    type Err = DescriptorError;

    /// Parses a descriptor, inferring the kind: eight fields make a
    /// modifiable key, no key with modifiers makes a modifier binding, and
    /// everything else is a key binding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = RawDescriptor::parse(s)?;
        let stroke = raw.stroke();
        Ok(match raw.ignore {
            Some(ignore) => KeyInput::ModifiableKey { stroke, ignore },
            None if stroke.is_unbound() && !raw.modifiers.is_empty() => {
                KeyInput::Modifier(raw.modifiers)
            }
            None => KeyInput::Key(stroke),
        })
    }
}

impl From<KeyInput> for String {
    fn from(input: KeyInput) -> Self {
        input.to_descriptor()
    }
}

impl TryFrom<String> for KeyInput {
    type Error = DescriptorError;

    fn try_from(descriptor: String) -> Result<Self, Self::Error> {
        descriptor.parse()
    }
}

fn flags(modifiers: KeyModifiers) -> String {
    format!(
        "{},{},{}",
        u8::from(modifiers.shift),
        u8::from(modifiers.control),
        u8::from(modifiers.alt)
    )
}

struct RawDescriptor {
    scan_code: u16,
    virtual_key: VirtualKey,
    modifiers: KeyModifiers,
    ignore: Option<KeyModifiers>,
}

impl RawDescriptor {
    fn parse(descriptor: &str) -> DescriptorResult<Self> {
        let fields: Vec<&str> = descriptor.split(',').map(str::trim).collect();
        if fields.len() < 5 {
            return Err(DescriptorError::TooFewFields {
                descriptor: descriptor.to_string(),
                found: fields.len(),
            });
        }

        let number = |field: &'static str, value: &str| {
            value
                .parse::<u16>()
                .map_err(|_| DescriptorError::InvalidNumber {
                    field,
                    value: value.to_string(),
                })
        };
        let flag = |value: &str| value != "0";

        Ok(Self {
            scan_code: number("scan code", fields[0])?,
            virtual_key: VirtualKey(number("virtual key", fields[1])?),
            modifiers: KeyModifiers::new(flag(fields[2]), flag(fields[3]), flag(fields[4])),
            ignore: (fields.len() >= 8)
                .then(|| KeyModifiers::new(flag(fields[5]), flag(fields[6]), flag(fields[7]))),
        })
    }

    fn stroke(&self) -> KeyStroke {
        KeyStroke {
            key: Key::from_codes(self.scan_code, self.virtual_key),
            modifiers: self.modifiers,
        }
    }
}
