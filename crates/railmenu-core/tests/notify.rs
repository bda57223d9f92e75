//! Integration tests for properties paired with change signals.

use railmenu_core::{Property, Signal};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Setting {
    value: Property<String>,
    value_changed: Signal<String>,
}

impl Setting {
    fn new(value: &str) -> Self {
        Self {
            value: Property::new(value.to_string()),
            value_changed: Signal::new(),
        }
    }

    fn set_value(&self, value: &str) {
        if self.value.set(value.to_string()) {
            self.value_changed.emit(value.to_string());
        }
    }
}

#[test]
fn test_signal_fires_only_on_change() {
    let setting = Setting::new("bool:true");
    let fired = Arc::new(AtomicUsize::new(0));

    let f = fired.clone();
    setting.value_changed.connect(move |_| {
        f.fetch_add(1, Ordering::SeqCst);
    });

    setting.set_value("bool:true");
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    setting.set_value("bool:false");
    setting.set_value("bool:false");
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(setting.value.get(), "bool:false");
}

#[test]
fn test_blocked_signal_still_updates_property() {
    let setting = Setting::new("int:1");
    let fired = Arc::new(AtomicUsize::new(0));

    let f = fired.clone();
    setting.value_changed.connect(move |_| {
        f.fetch_add(1, Ordering::SeqCst);
    });

    setting.value_changed.set_blocked(true);
    setting.set_value("int:2");
    setting.value_changed.set_blocked(false);

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(setting.value.get(), "int:2");
}

#[test]
fn test_scoped_connection_follows_guard_lifetime() {
    let setting = Setting::new("");
    let seen = Arc::new(AtomicUsize::new(0));

    {
        let seen = seen.clone();
        let _guard = setting.value_changed.connect_scoped(move |v| {
            seen.fetch_add(v.len(), Ordering::SeqCst);
        });
        setting.set_value("abc");
    }
    setting.set_value("abcdef");

    assert_eq!(seen.load(Ordering::SeqCst), 3);
}
