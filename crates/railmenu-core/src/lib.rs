//! Core systems for railmenu.
//!
//! This crate provides the foundational pieces the launcher's models and
//! controls are built on:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Property System**: Values with change detection
//! - **Logging**: `tracing` targets per subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use railmenu_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
