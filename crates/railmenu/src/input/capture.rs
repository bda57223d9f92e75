//! Key binding capture control.
//!
//! [`KeyInputControl`] shows one command's binding in the options dialog and
//! lets the user record a new one. Activating the control starts a capture
//! session that takes the exclusive [`InputHook`]; every key event is then
//! swallowed and turned into a candidate binding until the session ends.
//!
//! # Behavior
//!
//! While capturing:
//! - Shift, Control and Alt accumulate into the held modifiers
//! - A key binding's candidate is the pressed key plus the held modifiers;
//!   releasing that key commits it
//! - A modifier binding's candidate is the held modifiers; releasing the
//!   last of them commits it
//! - Backspace with no modifiers held erases the binding
//! - Escape with no modifiers held cancels without changing anything
//!
//! # Example
//!
//! ```
//! use railmenu::input::{
//!     DisplayStyle, InputHook, KeyBinding, KeyEvent, KeyInput, KeyInputControl, KeyStroke,
//! };
//!
//! let binding = KeyBinding::new(KeyInput::Key(KeyStroke::scan(0x1E)));
//! let hook = InputHook::new();
//! let mut control = KeyInputControl::with_hook(&binding, &hook);
//! assert_eq!(control.text(), "A");
//!
//! assert!(control.begin_capture());
//! control.handle_key(KeyEvent::press(0x1D));
//! control.handle_key(KeyEvent::press(0x1E));
//! control.handle_key(KeyEvent::release(0x1E));
//!
//! assert!(!control.is_capturing());
//! assert_eq!(control.text(), "Control + A");
//! assert_eq!(control.display_style(), DisplayStyle::Modified);
//! ```

use railmenu_core::Signal;
use railmenu_core::logging::targets;

use super::binding::KeyBinding;
use super::descriptor::{Key, KeyInput, KeyStroke};
use super::hook::{HookGuard, InputHook};
use super::keys::{VirtualKey, modifier_for_scan_code, scan};
use super::modifiers::KeyModifiers;

/// Whether a control is recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Showing the binding; key events pass through.
    Idle,
    /// Recording; key events are consumed.
    Capturing,
}

/// Direction of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Key went down.
    Press,
    /// Key went up.
    Release,
}

/// A low-level keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Hardware scan code.
    pub scan_code: u16,
    /// Virtual key reported with the event, if any.
    pub virtual_key: VirtualKey,
    /// Press or release.
    pub action: KeyAction,
}

impl KeyEvent {
    /// A key-down event for `scan_code`.
    pub fn press(scan_code: u16) -> Self {
        Self {
            scan_code,
            virtual_key: VirtualKey::NONE,
            action: KeyAction::Press,
        }
    }

    /// A key-up event for `scan_code`.
    pub fn release(scan_code: u16) -> Self {
        Self {
            action: KeyAction::Release,
            ..Self::press(scan_code)
        }
    }

    /// Sets the virtual key reported with the event.
    pub fn with_virtual_key(mut self, virtual_key: VirtualKey) -> Self {
        self.virtual_key = virtual_key;
        self
    }

    /// The scan code to bind. Print Screen arrives as `0x37` (keypad `*`)
    /// and is told apart by its virtual key.
    fn bindable_scan_code(&self) -> u16 {
        if self.virtual_key == VirtualKey::PRINT_SCREEN && self.scan_code == 0x37 {
            scan::PRINT_SCREEN
        } else {
            self.scan_code
        }
    }
}

/// What the host should do with a key event after the control saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The control captured the event; do not process it further.
    Consumed,
    /// The control is idle; process the event normally.
    PassThrough,
}

/// How a capture session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A new binding was written (possibly the erased binding).
    Committed(KeyInput),
    /// The session ended without changing the binding.
    Cancelled,
    /// The binding was restored to its default.
    Reset,
}

/// How the control should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStyle {
    /// The binding equals its default.
    Normal,
    /// The binding differs from its default; drawn highlighted.
    Modified,
}

/// State of an active capture session.
struct Session<'a> {
    _guard: HookGuard<'a>,
    held: KeyModifiers,
    candidate: Option<KeyInput>,
    primary: Option<u16>,
}

enum Step {
    Continue,
    Commit,
    Erase,
    Cancel,
}

impl Session<'_> {
    fn press(&mut self, scan_code: u16, current: &KeyInput) -> Step {
        if let Some(modifier) = modifier_for_scan_code(scan_code) {
            self.held = self.held.union(modifier);
            if current.is_modifier() {
                self.candidate = Some(KeyInput::Modifier(self.held));
            }
            return Step::Continue;
        }

        if self.held.is_empty() {
            match scan_code {
                scan::ESCAPE => return Step::Cancel,
                scan::BACKSPACE => return Step::Erase,
                _ => {}
            }
        }

        // Modifier bindings ignore ordinary keys.
        if !current.is_modifier() {
            let stroke = KeyStroke {
                key: Key::Scan(scan_code),
                modifiers: self.held,
            };
            self.candidate = Some(current.with_stroke(stroke));
            self.primary = Some(scan_code);
        }
        Step::Continue
    }

    fn release(&mut self, scan_code: u16, current: &KeyInput) -> Step {
        if let Some(modifier) = modifier_for_scan_code(scan_code) {
            self.held = self.held.difference(modifier);
            if current.is_modifier() && self.held.is_empty() && self.candidate.is_some() {
                return Step::Commit;
            }
            return Step::Continue;
        }

        if self.primary == Some(scan_code) && self.candidate.is_some() {
            Step::Commit
        } else {
            Step::Continue
        }
    }
}

/// Displays and edits one command's key binding.
///
/// The control borrows the binding and the hook for its whole life. A
/// session never outlives the control: dropping the control releases the
/// hook.
///
/// # Signals
///
/// - `binding_changed(KeyInput)`: the binding was written
/// - `capture_started`: a session began
/// - `capture_finished(CaptureOutcome)`: a session ended
pub struct KeyInputControl<'a> {
    binding: &'a KeyBinding,
    hook: &'a InputHook,
    session: Option<Session<'a>>,
    placeholder: String,

    /// Emitted after the binding changed.
    pub binding_changed: Signal<KeyInput>,
    /// Emitted when a capture session starts.
    pub capture_started: Signal<()>,
    /// Emitted when a capture session ends.
    pub capture_finished: Signal<CaptureOutcome>,
}

impl<'a> KeyInputControl<'a> {
    /// Creates a control using the process-wide input hook.
    pub fn new(binding: &'a KeyBinding) -> Self {
        Self::with_hook(binding, InputHook::global())
    }

    /// Creates a control using a specific input hook.
    pub fn with_hook(binding: &'a KeyBinding, hook: &'a InputHook) -> Self {
        Self {
            binding,
            hook,
            session: None,
            placeholder: "Press a key...".to_string(),
            binding_changed: Signal::new(),
            capture_started: Signal::new(),
            capture_finished: Signal::new(),
        }
    }

    /// Sets the text shown while capturing with nothing pressed.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// The text shown while capturing with nothing pressed.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The edited binding.
    pub fn binding(&self) -> &'a KeyBinding {
        self.binding
    }

    /// The control's state.
    pub fn state(&self) -> CaptureState {
        if self.session.is_some() {
            CaptureState::Capturing
        } else {
            CaptureState::Idle
        }
    }

    /// Returns `true` while a capture session is active.
    pub fn is_capturing(&self) -> bool {
        self.session.is_some()
    }

    /// The text to draw.
    ///
    /// Idle controls show the current binding. While capturing, the control
    /// shows the candidate, else the held modifiers, else the placeholder.
    pub fn text(&self) -> String {
        let Some(session) = &self.session else {
            return self.binding.current().to_string();
        };
        match &session.candidate {
            Some(candidate) => candidate.to_string(),
            None if !session.held.is_empty() => format!("{} + ...", session.held),
            None => self.placeholder.clone(),
        }
    }

    /// Highlighted when the binding differs from its default.
    pub fn display_style(&self) -> DisplayStyle {
        if self.binding.is_default() {
            DisplayStyle::Normal
        } else {
            DisplayStyle::Modified
        }
    }

    /// Starts a capture session.
    ///
    /// Returns `false` and leaves everything unchanged if another session
    /// holds the input hook. Returns `true` if this control is capturing
    /// afterwards.
    pub fn begin_capture(&mut self) -> bool {
        if self.session.is_some() {
            return true;
        }

        let hook = self.hook;
        let guard = match hook.acquire() {
            Ok(guard) => guard,
            Err(err) => {
                tracing::warn!(target: targets::INPUT, %err, "capture rejected");
                return false;
            }
        };

        self.session = Some(Session {
            _guard: guard,
            held: KeyModifiers::NONE,
            candidate: None,
            primary: None,
        });
        tracing::debug!(
            target: targets::INPUT,
            current = %self.binding.current(),
            "capture started"
        );
        self.capture_started.emit(());
        true
    }

    /// Feeds a key event to the control.
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyDisposition {
        let current = self.binding.current();
        let Some(session) = self.session.as_mut() else {
            return KeyDisposition::PassThrough;
        };

        let scan_code = event.bindable_scan_code();
        let step = match event.action {
            KeyAction::Press => session.press(scan_code, &current),
            KeyAction::Release => session.release(scan_code, &current),
        };

        match step {
            Step::Continue => {}
            Step::Commit => self.commit(),
            Step::Erase => self.finish(Some(current.unbound())),
            Step::Cancel => self.cancel(),
        }
        KeyDisposition::Consumed
    }

    /// Accepts the session: writes the candidate, if any, and ends capture.
    ///
    /// With no candidate the session ends as cancelled.
    pub fn commit(&mut self) {
        let candidate = self.session.as_mut().and_then(|s| s.candidate.take());
        self.finish(candidate);
    }

    /// Ends the session without writing anything.
    pub fn cancel(&mut self) {
        self.finish(None);
    }

    /// The control lost keyboard focus; same as [`cancel`](Self::cancel).
    pub fn focus_lost(&mut self) {
        self.cancel();
    }

    /// Restores the default binding, ending any session.
    pub fn reset_to_default(&mut self) {
        let was_capturing = self.session.take().is_some();

        if self.binding.reset() {
            tracing::debug!(target: targets::INPUT, "binding reset to default");
            self.binding_changed.emit(self.binding.current());
        }
        if was_capturing {
            self.capture_finished.emit(CaptureOutcome::Reset);
        }
    }

    fn finish(&mut self, input: Option<KeyInput>) {
        // Release the hook before any slot runs.
        if self.session.take().is_none() {
            return;
        }

        let outcome = match input {
            Some(input) => {
                if self.binding.set(input.clone()) {
                    self.binding_changed.emit(input.clone());
                }
                CaptureOutcome::Committed(input)
            }
            None => CaptureOutcome::Cancelled,
        };
        tracing::debug!(target: targets::INPUT, ?outcome, "capture finished");
        self.capture_finished.emit(outcome);
    }
}
