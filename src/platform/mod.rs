//! Platform abstraction layer
//!
//! Turns raw browser input (key names, touch coordinates, button ids) into
//! game commands. Kept free of `web_sys` so it runs in native tests.

pub mod input;

pub use input::{Command, SwipeTracker, button_command, key_command, pause_label};
