//! Exclusive keyboard hook.
//!
//! Only one capture session may intercept keyboard input at a time. The
//! [`InputHook`] is that slot: a session [`acquire`](InputHook::acquire)s it
//! and holds the returned [`HookGuard`] for as long as it captures. Dropping
//! the guard releases the slot on every exit path, including unwinding.

use std::sync::atomic::{AtomicBool, Ordering};

use railmenu_core::logging::targets;

use super::error::HookError;

static GLOBAL_HOOK: InputHook = InputHook::new();

/// An exclusive keyboard input slot.
///
/// # Example
///
/// ```
/// use railmenu::input::InputHook;
///
/// let hook = InputHook::new();
/// let guard = hook.acquire().unwrap();
/// assert!(hook.is_hooked());
/// assert!(hook.acquire().is_err());
///
/// drop(guard);
/// assert!(!hook.is_hooked());
/// ```
#[derive(Debug)]
pub struct InputHook {
    hooked: AtomicBool,
}

impl InputHook {
    /// Creates a free hook slot.
    pub const fn new() -> Self {
        Self {
            hooked: AtomicBool::new(false),
        }
    }

    /// The process-wide hook used by the launcher's dialogs.
    pub fn global() -> &'static InputHook {
        &GLOBAL_HOOK
    }

    /// Takes the hook, failing if another session holds it.
    pub fn acquire(&self) -> Result<HookGuard<'_>, HookError> {
        self.hooked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| HookError::AlreadyHooked)?;
        tracing::debug!(target: targets::INPUT, "keyboard hooked");
        Ok(HookGuard { hook: self })
    }

    /// Returns `true` while a session holds the hook.
    pub fn is_hooked(&self) -> bool {
        self.hooked.load(Ordering::Acquire)
    }
}

impl Default for InputHook {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of holding the [`InputHook`]. Releases it when dropped.
#[derive(Debug)]
pub struct HookGuard<'a> {
    hook: &'a InputHook,
}

impl Drop for HookGuard<'_> {
    fn drop(&mut self) {
        self.hook.hooked.store(false, Ordering::Release);
        tracing::debug!(target: targets::INPUT, "keyboard unhooked");
    }
}

static_assertions::assert_impl_all!(InputHook: Send, Sync);
