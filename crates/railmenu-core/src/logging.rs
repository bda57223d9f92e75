//! Logging facilities for railmenu.
//!
//! railmenu uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in the launcher binary:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("railmenu=debug")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "railmenu_core::signal";
    /// List models and sorting.
    pub const MODEL: &str = "railmenu::model";
    /// Keyboard input, hooks and key capture.
    pub const INPUT: &str = "railmenu::input";
    /// Settings stores and input settings.
    pub const SETTINGS: &str = "railmenu::settings";
}

#[cfg(test)]
mod tests {
    use super::targets;

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::SIGNAL, targets::MODEL, targets::INPUT, targets::SETTINGS] {
            assert!(target.starts_with("railmenu"));
            assert!(target.contains("::"));
        }
    }
}
