//! Keyboard scan codes, virtual keys and their display names.
//!
//! Bindings refer to the main keyboard area by scan code (the physical key
//! position, independent of layout) and to a few special keys by virtual key.
//! Extended scan codes are stored with bit 8 set, e.g. `0x11D` for Pause.

use std::fmt;

use super::modifiers::KeyModifiers;

/// Scan codes with special meaning to the capture control and settings.
pub mod scan {
    /// Escape.
    pub const ESCAPE: u16 = 0x01;
    /// Backspace.
    pub const BACKSPACE: u16 = 0x0E;
    /// Left Control (Right Control shares the code in low-level hooks).
    pub const CONTROL: u16 = 0x1D;
    /// Left Shift.
    pub const LEFT_SHIFT: u16 = 0x2A;
    /// Right Shift.
    pub const RIGHT_SHIFT: u16 = 0x36;
    /// Left Alt.
    pub const ALT: u16 = 0x38;
    /// Print Screen, extended.
    pub const PRINT_SCREEN: u16 = 0x137;
    /// Pause/Break, extended.
    pub const PAUSE: u16 = 0x11D;
}

/// Returns the modifier a scan code represents, if any.
pub fn modifier_for_scan_code(code: u16) -> Option<KeyModifiers> {
    match code {
        scan::LEFT_SHIFT | scan::RIGHT_SHIFT => Some(KeyModifiers::SHIFT),
        scan::CONTROL => Some(KeyModifiers::CONTROL),
        scan::ALT => Some(KeyModifiers::ALT),
        _ => None,
    }
}

/// Returns `true` if the scan code is Shift, Control or Alt.
pub fn is_modifier_scan_code(code: u16) -> bool {
    modifier_for_scan_code(code).is_some()
}

/// Returns the display name of a scan code on a US keyboard.
///
/// Unknown codes render as ` [sc=0xNN]` so that they remain identifiable in
/// bug reports.
pub fn scan_code_name(code: u16) -> String {
    match known_scan_code_name(code) {
        Some(name) => name.to_string(),
        None => format!(" [sc=0x{code:02X}]"),
    }
}

fn known_scan_code_name(code: u16) -> Option<&'static str> {
    const MAIN: [&str; 0x59] = [
        "", "Escape", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", "Backspace",
        "Tab", "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "[", "]", "Enter", "Ctrl", "A",
        "S", "D", "F", "G", "H", "J", "K", "L", ";", "'", "`", "Shift", "\\", "Z", "X", "C", "V",
        "B", "N", "M", ",", ".", "/", "Right Shift", "Num *", "Alt", "Space", "Caps Lock", "F1",
        "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "Num Lock", "Scroll Lock", "Home",
        "Up", "PageUp", "Num -", "Left", "Num 5", "Right", "Num +", "End", "Down", "PageDown",
        "Insert", "Delete", "", "", "", "F11", "F12",
    ];

    match code {
        scan::PRINT_SCREEN => Some("PrintScreen"),
        scan::PAUSE => Some("Pause"),
        _ => MAIN
            .get(usize::from(code))
            .copied()
            .filter(|name| !name.is_empty()),
    }
}

/// A logical (virtual) key code.
///
/// Used for keys whose position is irrelevant, such as Pause and Print
/// Screen. `VirtualKey::NONE` means the binding uses its scan code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    /// No virtual key.
    pub const NONE: VirtualKey = VirtualKey(0);
    /// Backspace.
    pub const BACK: VirtualKey = VirtualKey(0x08);
    /// Tab.
    pub const TAB: VirtualKey = VirtualKey(0x09);
    /// Enter.
    pub const ENTER: VirtualKey = VirtualKey(0x0D);
    /// Pause/Break.
    pub const PAUSE: VirtualKey = VirtualKey(0x13);
    /// Escape.
    pub const ESCAPE: VirtualKey = VirtualKey(0x1B);
    /// Space bar.
    pub const SPACE: VirtualKey = VirtualKey(0x20);
    /// Print Screen.
    pub const PRINT_SCREEN: VirtualKey = VirtualKey(0x2C);

    /// Returns `true` for [`VirtualKey::NONE`].
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns the key's name, if it is a known key.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0x08 => "Back",
            0x09 => "Tab",
            0x0D => "Enter",
            0x13 => "Pause",
            0x14 => "CapsLock",
            0x1B => "Escape",
            0x20 => "Space",
            0x21 => "PageUp",
            0x22 => "PageDown",
            0x23 => "End",
            0x24 => "Home",
            0x25 => "Left",
            0x26 => "Up",
            0x27 => "Right",
            0x28 => "Down",
            0x2C => "PrintScreen",
            0x2D => "Insert",
            0x2E => "Delete",
            code @ 0x70..=0x7B => return Some(FUNCTION_KEYS[usize::from(code - 0x70)]),
            _ => return None,
        };
        Some(name)
    }
}

const FUNCTION_KEYS: [&str; 12] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "VK{}", self.0),
        }
    }
}

/// Turns a unique input such as `Shift+Alt+0x1E` into `Shift + Alt + A`.
pub fn pretty_unique_input(unique: &str) -> String {
    let mut parts: Vec<String> = unique.split('+').map(str::to_string).collect();
    if let Some(last) = parts.last_mut()
        && let Some(hex) = last.strip_prefix("0x")
        && let Ok(code) = u16::from_str_radix(hex, 16)
    {
        *last = scan_code_name(code);
    }
    parts.join(" + ")
}

/// Rows of the physical keyboard, by scan code, for drawing a keyboard map.
///
/// Each `[..]` cell is one key; its width in characters is the key's width.
/// Blank cells are keys with no scan code worth binding.
pub const KEYBOARD_LAYOUT: [&str; 7] = [
    "[01 ]   [3B ][3C ][3D ][3E ]   [3F ][40 ][41 ][42 ]   [43 ][44 ][57 ][58 ]   [37 ][46 ][11D]",
    "                                                                                            ",
    "[29 ][02 ][03 ][04 ][05 ][06 ][07 ][08 ][09 ][0A ][0B ][0C ][0D ][0E     ]   [52 ][47 ][49 ]",
    "[0F   ][10 ][11 ][12 ][13 ][14 ][15 ][16 ][17 ][18 ][19 ][1A ][1B ][2B   ]   [53 ][4F ][51 ]",
    "[3A     ][1E ][1F ][20 ][21 ][22 ][23 ][24 ][25 ][26 ][27 ][28 ][1C      ]                  ",
    "[2A       ][2C ][2D ][2E ][2F ][30 ][31 ][32 ][33 ][34 ][35 ][36         ]        [48 ]     ",
    "[1D   ][    ][38  ][39                          ][    ][    ][    ][1D   ]   [4B ][50 ][4D ]",
];

/// One key of [`KEYBOARD_LAYOUT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardKey {
    /// Row index, top to bottom.
    pub row: usize,
    /// Left edge, in layout characters.
    pub column: usize,
    /// Width, in layout characters.
    pub width: usize,
    /// Scan code of the key.
    pub scan_code: u16,
}

/// Iterates over the bindable keys of [`KEYBOARD_LAYOUT`].
pub fn keyboard_keys() -> impl Iterator<Item = KeyboardKey> {
    KEYBOARD_LAYOUT.iter().enumerate().flat_map(|(row, line)| {
        let mut keys = Vec::new();
        let mut rest = line.char_indices();
        while let Some((start, c)) = rest.next() {
            if c != '[' {
                continue;
            }
            let Some((end, _)) = rest.by_ref().find(|&(_, c)| c == ']') else {
                break;
            };
            let cell = line[start + 1..end].trim();
            if let Ok(scan_code) = u16::from_str_radix(cell, 16) {
                keys.push(KeyboardKey {
                    row,
                    column: start,
                    width: end - start + 1,
                    scan_code,
                });
            }
        }
        keys
    })
}
