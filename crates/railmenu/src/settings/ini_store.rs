//! INI file settings store.
//!
//! One [`IniStore`] owns one section of an INI file. Every entry is written
//! as `type:value`:
//!
//! ```ini
//! [Keys]
//! ControlHorn=string:57%2C0%2C0%2C0%2C0
//! Alerter=bool:true
//! SoundVolume=int:80
//! Menu_Selection=string[]:Explorer,Demo%20Route
//! ```
//!
//! Strings are percent-escaped so separators never appear inside a value.
//! An entry that does not decode is logged and reads as missing. A list
//! holding one empty string is written as `string[]:`, the same as an empty
//! list, and reads back empty.

use std::path::{Path, PathBuf};

use ini::Ini;
use parking_lot::RwLock;
use railmenu_core::logging::targets;

use super::error::{SettingsError, SettingsResult};
use super::store::{SettingValue, SettingsStore};

/// Section used when none is given.
pub const DEFAULT_SECTION: &str = "ORTS";

/// A settings store backed by one section of an INI file.
#[derive(Debug)]
pub struct IniStore {
    path: PathBuf,
    section: String,
    ini: RwLock<Ini>,
}

impl IniStore {
    /// Opens `path` using the [`DEFAULT_SECTION`].
    pub fn open(path: impl AsRef<Path>) -> SettingsResult<Self> {
        Self::open_section(path, DEFAULT_SECTION)
    }

    /// Opens `path` and binds the store to `section`.
    ///
    /// A missing file is not an error; it is created on the first
    /// [`flush`](SettingsStore::flush).
    pub fn open_section(path: impl AsRef<Path>, section: impl Into<String>) -> SettingsResult<Self> {
        let path = path.as_ref().to_path_buf();
        let ini = if path.exists() {
            Ini::load_from_file(&path).map_err(|e| SettingsError::ini(&path, e))?
        } else {
            tracing::debug!(target: targets::SETTINGS, path = %path.display(), "settings file not found, starting empty");
            Ini::new()
        };

        Ok(Self {
            path,
            section: section.into(),
            ini: RwLock::new(ini),
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The section this store reads and writes.
    pub fn section(&self) -> &str {
        &self.section
    }
}

impl SettingsStore for IniStore {
    fn get(&self, name: &str) -> Option<SettingValue> {
        let ini = self.ini.read();
        let raw = ini.section(Some(self.section.as_str()))?.get(name)?;
        match decode_value(name, raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(target: targets::SETTINGS, section = %self.section, "{err}");
                None
            }
        }
    }

    fn set(&self, name: &str, value: SettingValue) {
        self.ini
            .write()
            .with_section(Some(self.section.as_str()))
            .set(name, encode_value(&value));
    }

    fn remove(&self, name: &str) {
        self.ini.write().delete_from(Some(self.section.as_str()), name);
    }

    fn names(&self) -> Vec<String> {
        self.ini
            .read()
            .section(Some(self.section.as_str()))
            .map(|props| props.iter().map(|(key, _)| key.to_string()).collect())
            .unwrap_or_default()
    }

    fn flush(&self) -> SettingsResult<()> {
        self.ini
            .read()
            .write_to_file(&self.path)
            .map_err(|e| SettingsError::io(&self.path, e))?;
        tracing::debug!(target: targets::SETTINGS, path = %self.path.display(), "settings written");
        Ok(())
    }
}

static_assertions::assert_impl_all!(IniStore: Send, Sync);

/// Encodes a value as `type:value`.
pub(crate) fn encode_value(value: &SettingValue) -> String {
    let body = match value {
        SettingValue::Bool(v) => v.to_string(),
        SettingValue::Int(v) => v.to_string(),
        SettingValue::String(v) => escape(v),
        SettingValue::IntList(v) => v.iter().map(i64::to_string).collect::<Vec<_>>().join(","),
        SettingValue::StringList(v) => v.iter().map(|s| escape(s)).collect::<Vec<_>>().join(","),
    };
    format!("{}:{}", value.type_name(), body)
}

/// Decodes a `type:value` entry.
pub(crate) fn decode_value(name: &str, raw: &str) -> SettingsResult<SettingValue> {
    let invalid = || SettingsError::invalid_value(name, raw);

    let (kind, body) = raw.split_once(':').ok_or_else(invalid)?;
    if body.contains(':') {
        return Err(invalid());
    }

    let value = match kind {
        "bool" => SettingValue::Bool(parse_bool(body).ok_or_else(invalid)?),
        "int" => SettingValue::Int(body.trim().parse().map_err(|_| invalid())?),
        "string" => SettingValue::String(unescape(body).ok_or_else(invalid)?),
        "int[]" => SettingValue::IntList(
            split_list(body)
                .map(|part| part.trim().parse().map_err(|_| invalid()))
                .collect::<SettingsResult<_>>()?,
        ),
        "string[]" => SettingValue::StringList(
            split_list(body)
                .map(|part| unescape(part).ok_or_else(invalid))
                .collect::<SettingsResult<_>>()?,
        ),
        _ => return Err(invalid()),
    };
    Ok(value)
}

fn parse_bool(body: &str) -> Option<bool> {
    match body.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn split_list(body: &str) -> impl Iterator<Item = &str> {
    body.split(',').filter(move |_| !body.is_empty())
}

/// Percent-escapes everything outside the unreserved URI set.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

fn unescape(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = text.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_value() {
        assert_eq!(encode_value(&true.into()), "bool:true");
        assert_eq!(encode_value(&80.into()), "int:80");
        assert_eq!(encode_value(&"30,0,0,0,0".into()), "string:30%2C0%2C0%2C0%2C0");
        assert_eq!(encode_value(&vec![1i64, 2].into()), "int[]:1,2");
        assert_eq!(
            encode_value(&vec!["Demo Route".to_string(), "a:b".to_string()].into()),
            "string[]:Demo%20Route,a%3Ab"
        );
    }

    #[test]
    fn test_decode_value() {
        assert_eq!(decode_value("a", "bool:True").unwrap(), SettingValue::Bool(true));
        assert_eq!(decode_value("a", "int:-3").unwrap(), SettingValue::Int(-3));
        assert_eq!(
            decode_value("a", "string:Shift%20%2B%20A").unwrap(),
            SettingValue::String("Shift + A".to_string())
        );
        assert_eq!(decode_value("a", "string[]:").unwrap(), SettingValue::StringList(Vec::new()));
        assert_eq!(
            decode_value("a", "int[]:4,5").unwrap(),
            SettingValue::IntList(vec![4, 5])
        );
    }

    #[test]
    fn test_empty_string_lists() {
        let single_empty = SettingValue::StringList(vec![String::new()]);
        assert_eq!(encode_value(&single_empty), "string[]:");
        assert_eq!(
            decode_value("a", &encode_value(&single_empty)).unwrap(),
            SettingValue::StringList(Vec::new())
        );

        let two_empty = SettingValue::StringList(vec![String::new(), String::new()]);
        assert_eq!(decode_value("a", &encode_value(&two_empty)).unwrap(), two_empty);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        for raw in ["30,0,0,0,0", "bool:yes", "int:x", "float:1.5", "string:a:b", "string:%4"] {
            let err = decode_value("ControlHorn", raw).unwrap_err();
            assert!(matches!(err, SettingsError::InvalidValue { .. }), "{raw}");
        }
    }

    #[test]
    fn test_unescape_utf8() {
        let text = "Zürich Hbf";
        assert_eq!(unescape(&escape(text)).as_deref(), Some(text));
    }

    #[test]
    fn test_store_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");

        let store = IniStore::open_section(&path, "Keys").unwrap();
        assert!(store.names().is_empty());
        store.set("ControlHorn", "57,0,0,0,0".into());
        store.set("Alerter", false.into());
        store.flush().unwrap();

        let reopened = IniStore::open_section(&path, "Keys").unwrap();
        assert_eq!(reopened.get("ControlHorn"), Some("57,0,0,0,0".into()));
        assert_eq!(reopened.get("Alerter"), Some(false.into()));

        let other = IniStore::open(&path).unwrap();
        assert_eq!(other.section(), DEFAULT_SECTION);
        assert_eq!(other.get("ControlHorn"), None);
    }

    #[test]
    fn test_invalid_entry_reads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        std::fs::write(&path, "[Keys]\nControlHorn=57,0,0,0,0\n").unwrap();

        let store = IniStore::open_section(&path, "Keys").unwrap();
        assert_eq!(store.names(), vec!["ControlHorn".to_string()]);
        assert_eq!(store.get("ControlHorn"), None);
    }
}
