//! Platform abstraction layer
//!
//! Handles the boundary with whatever hosts the simulation:
//! - Time (monotonic clock, frame pacing)
//! - Input events (pointer, keyboard, resize, quit)
//! - Event sources (scripted replays, demo autopilot)

pub mod input;
pub mod time;

pub use input::{AutoPilot, EventSource, InputEvent, Key, MouseButton, ScriptedEvents};
pub use time::{Clock, ManualClock, SystemClock};
