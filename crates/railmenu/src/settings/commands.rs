//! The bindable user commands and their default keys.

use std::fmt;
use std::str::FromStr;

use crate::input::{KeyInput, KeyModifiers, KeyStroke, VirtualKey};

/// Declares [`UserCommand`] from `Command = default_input;` lines.
///
/// A modifiable key may name the modifier commands that modulate it with
/// `modulated by [..]`; its ignored modifiers follow their bindings.
macro_rules! user_commands {
    ($($command:ident = $default:expr $(, modulated by [$($modulator:ident),+])?;)+) => {
        /// A command the user can bind a key to.
        ///
        /// The variant name is the persisted setting name. Commands are
        /// grouped by their name prefix (see [`CommandGroup`]).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum UserCommand {
            $(
                #[allow(missing_docs)]
                $command,
            )+
        }

        impl UserCommand {
            /// Every command, in declaration order.
            pub const ALL: &'static [UserCommand] = &[$(UserCommand::$command,)+];

            /// The persisted setting name.
            pub fn name(self) -> &'static str {
                match self {
                    $(UserCommand::$command => stringify!($command),)+
                }
            }

            /// Modifier commands whose bindings decide which modifiers this
            /// command ignores. Empty for everything but modifiable keys.
            pub fn modulators(self) -> &'static [UserCommand] {
                match self {
                    $(UserCommand::$command => &[$($(UserCommand::$modulator),+)?],)+
                }
            }

            fn base_input(self) -> KeyInput {
                match self {
                    $(UserCommand::$command => $default,)+
                }
            }
        }
    };
}

fn key(code: u16) -> KeyInput {
    KeyInput::Key(KeyStroke::scan(code))
}

fn key_with(code: u16, modifiers: KeyModifiers) -> KeyInput {
    KeyInput::Key(KeyStroke::scan(code).with_modifiers(modifiers))
}

fn virtual_key(key: VirtualKey) -> KeyInput {
    KeyInput::Key(KeyStroke::virtual_key(key))
}

fn modifier(modifiers: KeyModifiers) -> KeyInput {
    KeyInput::Modifier(modifiers)
}

fn modifiable(code: u16) -> KeyInput {
    modifiable_with(code, KeyModifiers::NONE)
}

fn modifiable_with(code: u16, modifiers: KeyModifiers) -> KeyInput {
    KeyInput::ModifiableKey {
        stroke: KeyStroke::scan(code).with_modifiers(modifiers),
        ignore: KeyModifiers::NONE,
    }
}

const SHIFT: KeyModifiers = KeyModifiers::SHIFT;
const CONTROL: KeyModifiers = KeyModifiers::CONTROL;
const ALT: KeyModifiers = KeyModifiers::ALT;
const CONTROL_ALT: KeyModifiers = KeyModifiers::new(false, true, true);
const CONTROL_SHIFT: KeyModifiers = KeyModifiers::new(true, true, false);

user_commands! {
    GamePauseMenu = key(0x01);
    GameSave = key(0x3C);
    GameQuit = key_with(0x3E, ALT);
    GamePause = virtual_key(VirtualKey::PAUSE);
    GameScreenshot = virtual_key(VirtualKey::PRINT_SCREEN);
    GameFullscreen = key_with(0x1C, ALT);
    GameSwitchAhead = key(0x22);
    GameSwitchBehind = key_with(0x22, SHIFT);
    GameSwitchPicked = key_with(0x22, ALT);
    GameSignalPicked = key_with(0x22, CONTROL);
    GameSwitchWithMouse = modifier(ALT);
    GameUncoupleWithMouse = key(0x16);
    GameChangeCab = key_with(0x12, CONTROL);
    GameRequestControl = key_with(0x12, ALT);
    GameClearSignalForward = key(0x0F);
    GameClearSignalBackward = key_with(0x0F, SHIFT);
    GameResetSignalForward = key_with(0x0F, CONTROL);
    GameResetSignalBackward = key_with(0x0F, CONTROL_SHIFT);
    GameAutopilotMode = key_with(0x1E, ALT);
    GameSuspendOldPlayer = modifier(SHIFT);

    DisplayNextWindowTab = modifier(SHIFT);
    DisplayHelpWindow = modifiable(0x3B), modulated by [DisplayNextWindowTab];
    DisplayTrackMonitorWindow = modifiable(0x3E), modulated by [DisplayNextWindowTab];
    DisplayHUD = modifiable_with(0x3F, ALT), modulated by [DisplayNextWindowTab];
    DisplayTrainDrivingWindow = modifiable(0x3F), modulated by [DisplayNextWindowTab];
    DisplayStationLabels = modifiable(0x40), modulated by [DisplayNextWindowTab];
    DisplayCarLabels = modifiable(0x41), modulated by [DisplayNextWindowTab];
    DisplaySwitchWindow = key(0x42);
    DisplayTrainOperationsWindow = key_with(0x43, CONTROL_ALT);
    DisplayTrainListWindow = key_with(0x43, ALT);
    DisplayNextStationWindow = key(0x44);
    DisplayCompassWindow = key(0x0B);

    DebugSpeedUp = key_with(0x49, CONTROL_ALT);
    DebugSpeedDown = key_with(0x51, CONTROL_ALT);
    DebugSpeedReset = key_with(0x47, CONTROL_ALT);
    DebugOvercastIncrease = key_with(0x0D, CONTROL);
    DebugOvercastDecrease = key_with(0x0C, CONTROL);
    DebugFogIncrease = key_with(0x0D, SHIFT);
    DebugFogDecrease = key_with(0x0C, SHIFT);
    DebugClockForwards = key(0x0D);
    DebugClockBackwards = key(0x0C);
    DebugLogger = key(0x58);
    DebugDumpKeymap = key_with(0x3B, ALT);
    DebugSignalling = key_with(0x57, CONTROL_ALT);

    CameraCab = key(0x02);
    CameraToggleShowCab = key_with(0x02, SHIFT);
    CameraHeadOutForward = key(0x47);
    CameraHeadOutBackward = key(0x4F);
    CameraOutsideFront = key(0x03);
    CameraOutsideRear = key(0x04);
    CameraTrackside = key(0x05);
    CameraPassenger = key(0x06);
    CameraBrakeman = key(0x07);
    CameraFree = key(0x09);
    CameraPreviousFree = key_with(0x09, SHIFT);
    CameraReset = key_with(0x09, CONTROL);
    CameraMoveFast = modifier(SHIFT);
    CameraMoveSlow = modifier(CONTROL);
    CameraPanLeft = modifiable(0x4B), modulated by [CameraMoveFast, CameraMoveSlow];
    CameraPanRight = modifiable(0x4D), modulated by [CameraMoveFast, CameraMoveSlow];
    CameraPanUp = modifiable(0x48), modulated by [CameraMoveFast, CameraMoveSlow];
    CameraPanDown = modifiable(0x50), modulated by [CameraMoveFast, CameraMoveSlow];
    CameraRotateLeft = modifiable_with(0x4B, ALT), modulated by [CameraMoveFast, CameraMoveSlow];
    CameraRotateRight = modifiable_with(0x4D, ALT), modulated by [CameraMoveFast, CameraMoveSlow];
    CameraRotateUp = modifiable_with(0x48, ALT), modulated by [CameraMoveFast, CameraMoveSlow];
    CameraRotateDown = modifiable_with(0x50, ALT), modulated by [CameraMoveFast, CameraMoveSlow];
    CameraScrollLeft = modifiable_with(0x4B, ALT);
    CameraScrollRight = modifiable_with(0x4D, ALT);
    CameraZoomIn = modifiable(0x49), modulated by [CameraMoveFast, CameraMoveSlow];
    CameraZoomOut = modifiable(0x51), modulated by [CameraMoveFast, CameraMoveSlow];

    ControlForwards = key(0x11);
    ControlBackwards = key(0x1F);
    ControlThrottleIncrease = key(0x20);
    ControlThrottleDecrease = key(0x1E);
    ControlThrottleZero = key_with(0x1E, CONTROL);
    ControlTrainBrakeIncrease = key(0x28);
    ControlTrainBrakeDecrease = key(0x27);
    ControlTrainBrakeZero = key_with(0x27, CONTROL);
    ControlEngineBrakeIncrease = key(0x1B);
    ControlEngineBrakeDecrease = key(0x1A);
    ControlDynamicBrakeIncrease = key(0x34);
    ControlDynamicBrakeDecrease = key(0x33);
    ControlBailOff = key(0x35);
    ControlInitializeBrakes = key_with(0x35, SHIFT);
    ControlHandbrakeFull = key_with(0x28, SHIFT);
    ControlHandbrakeNone = key_with(0x27, SHIFT);
    ControlRetainersOn = key_with(0x1B, SHIFT);
    ControlRetainersOff = key_with(0x1A, SHIFT);
    ControlBrakeHoseConnect = key(0x2B);
    ControlBrakeHoseDisconnect = key_with(0x2B, SHIFT);
    ControlAlerter = key(0x2C);
    ControlEmergencyPushButton = key(0x0E);
    ControlSander = key(0x2D);
    ControlSanderToggle = key_with(0x2D, SHIFT);
    ControlWiper = key(0x2F);
    ControlMirror = key_with(0x2F, SHIFT);
    ControlHorn = key(0x39);
    ControlBell = key(0x30);
    ControlBellToggle = key_with(0x30, SHIFT);
    ControlDoorLeft = key(0x10);
    ControlDoorRight = key_with(0x10, SHIFT);
    ControlLight = key(0x26);
    ControlPantograph1 = key(0x19);
    ControlPantograph2 = key_with(0x19, SHIFT);
    ControlCircuitBreakerClosingOrder = key(0x18);
    ControlCircuitBreakerOpeningOrder = key(0x17);
    ControlHeadlightIncrease = key(0x23);
    ControlHeadlightDecrease = key_with(0x23, SHIFT);
    ControlInjector1 = key(0x17);
    ControlInjector2 = key(0x18);
    ControlCylinderCocks = key(0x2E);
    ControlFiringRateIncrease = key(0x13);
    ControlFiringRateDecrease = key_with(0x13, SHIFT);
    ControlRefill = key(0x14);
    ControlWaterScoop = key(0x15);
}

impl UserCommand {
    /// The factory binding.
    ///
    /// Modulated keys ignore whatever modifiers their modulators are bound
    /// to by default.
    pub fn default_input(self) -> KeyInput {
        let input = self.base_input();
        let modulators = self.modulators();
        if modulators.is_empty() {
            return input;
        }
        input.with_ignored(modulation(modulators.iter().map(|m| m.base_input())))
    }

    /// The name split into words, e.g. `Control Throttle Increase`.
    pub fn pretty_name(self) -> String {
        pretty_command_name(self.name())
    }

    /// The command's group.
    pub fn group(self) -> CommandGroup {
        CommandGroup::ALL
            .iter()
            .copied()
            .find(|group| self.name().starts_with(group.prefix()))
            .unwrap_or(CommandGroup::Game)
    }
}

impl fmt::Display for UserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown command name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown user command '{0}'")]
pub struct UnknownCommand(pub String);

impl FromStr for UserCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserCommand::ALL
            .iter()
            .copied()
            .find(|command| command.name() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// The option-page groups commands are listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandGroup {
    Game,
    Display,
    Debug,
    Camera,
    Control,
}

impl CommandGroup {
    /// All groups in display order.
    pub const ALL: [CommandGroup; 5] = [
        CommandGroup::Game,
        CommandGroup::Display,
        CommandGroup::Debug,
        CommandGroup::Camera,
        CommandGroup::Control,
    ];

    /// The command name prefix shared by the group's commands.
    pub fn prefix(self) -> &'static str {
        match self {
            CommandGroup::Game => "Game",
            CommandGroup::Display => "Display",
            CommandGroup::Debug => "Debug",
            CommandGroup::Camera => "Camera",
            CommandGroup::Control => "Control",
        }
    }

    /// Commands in this group, in declaration order.
    pub fn commands(self) -> impl Iterator<Item = UserCommand> {
        UserCommand::ALL
            .iter()
            .copied()
            .filter(move |command| command.group() == self)
    }
}

/// The modifiers a modulated key ignores: every modifier any of its
/// modulators is bound to.
pub(crate) fn modulation(modulators: impl IntoIterator<Item = KeyInput>) -> KeyModifiers {
    modulators
        .into_iter()
        .fold(KeyModifiers::NONE, |acc, input| acc.union(input.modifiers()))
}

/// Inserts a space at each case change of a command name.
///
/// A space goes before a character that follows a lowercase letter and is
/// not itself lowercase, or that is uppercase and follows a character that
/// is not. `ControlPantograph1` becomes `Control Pantograph 1`.
pub fn pretty_command_name(name: &str) -> String {
    let mut pretty = String::with_capacity(name.len() + 8);
    let mut previous: Option<char> = None;
    for c in name.chars() {
        if let Some(p) = previous {
            let after_lower = p.is_lowercase() && !c.is_lowercase();
            let upper_after_other = !p.is_uppercase() && c.is_uppercase();
            if after_lower || upper_after_other {
                pretty.push(' ');
            }
        }
        pretty.push(c);
        previous = Some(c);
    }
    pretty
}
