//! Input events and the sources that produce them
//!
//! Events are platform-neutral: a windowing backend maps its own events
//! into [`InputEvent`] and hands them over through an [`EventSource`].

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use crate::driver::Frame;

/// Physical mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button: pop
    Left,
    /// Secondary button: reload labels
    Right,
    Middle,
    Other,
}

/// Keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Other,
}

impl Key {
    /// Case-insensitive character match
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// Input delivered to the frame driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Button pressed at a viewport position
    PointerDown { pos: Vec2, button: MouseButton },
    /// Window resized
    Resize { width: f32, height: f32 },
    /// Key pressed
    KeyPress(Key),
    /// Stop the loop
    Quit,
}

impl InputEvent {
    /// Primary-button click at (x, y)
    pub fn click(x: f32, y: f32) -> Self {
        InputEvent::PointerDown {
            pos: Vec2::new(x, y),
            button: MouseButton::Left,
        }
    }
}

/// Something that produces input once per frame
pub trait EventSource {
    /// Append pending events to `out`. `frame` is the last rendered frame.
    fn poll(&mut self, frame: &Frame<'_>, out: &mut Vec<InputEvent>);
}

impl<T: EventSource + ?Sized> EventSource for Box<T> {
    fn poll(&mut self, frame: &Frame<'_>, out: &mut Vec<InputEvent>) {
        (**self).poll(frame, out);
    }
}

/// Pre-recorded events, one batch per frame
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    frames: VecDeque<Vec<InputEvent>>,
    quit_when_done: bool,
}

impl ScriptedEvents {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            quit_when_done: false,
        }
    }

    /// Emit `Quit` once the script runs out
    pub fn then_quit(mut self) -> Self {
        self.quit_when_done = true;
        self
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, _frame: &Frame<'_>, out: &mut Vec<InputEvent>) {
        match self.frames.pop_front() {
            Some(batch) => out.extend(batch),
            None if self.quit_when_done => out.push(InputEvent::Quit),
            None => {}
        }
    }
}

/// Demo mode - clicks a random idle bubble at a fixed interval
#[derive(Debug, Clone)]
pub struct AutoPilot {
    rng: Pcg32,
    interval: f32,
    next_click: f32,
    quit_when_empty: bool,
}

impl AutoPilot {
    pub fn new(seed: u64, interval: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            interval: interval.max(0.0),
            next_click: interval.max(0.0),
            quit_when_empty: true,
        }
    }

    /// Keep running on an empty field
    pub fn keep_running(mut self) -> Self {
        self.quit_when_empty = false;
        self
    }
}

impl EventSource for AutoPilot {
    fn poll(&mut self, frame: &Frame<'_>, out: &mut Vec<InputEvent>) {
        if frame.bubbles.is_empty() {
            if self.quit_when_empty {
                log::info!("Autopilot: field cleared after {:.1}s", frame.time);
                out.push(InputEvent::Quit);
            }
            return;
        }

        if frame.time < self.next_click {
            return;
        }

        let idle: Vec<_> = frame.bubbles.iter().filter(|b| b.is_idle()).collect();
        if let Some(target) = idle.choose(&mut self.rng) {
            log::debug!("Autopilot: clicking bubble {}", target.id);
            out.push(InputEvent::PointerDown {
                pos: target.pos(),
                button: MouseButton::Left,
            });
        }
        self.next_click = frame.time + self.interval;
    }
}
