//! Platform abstraction layer
//!
//! Handles the parts of the outside world the game loop touches:
//! - Input events and key bindings
//! - Turning held keys into per-tick input (with edge detection)
//! - Time (simulated for headless runs, realtime otherwise)
//!
//! Event polling itself belongs to whatever window/terminal backend feeds an
//! `InputSource`.

mod clock;
mod input;

pub use clock::{FrameClock, RealtimeClock, SimulatedClock};
pub use input::{Controls, InputEvent, InputSource, Key, KeyBindings, ScriptedInput};
