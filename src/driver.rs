//! Frame driver
//!
//! One synchronous loop, once per frame:
//!
//! ```text
//!   poll events ──> handle (click / reload / add / resize / quit)
//!        │
//!        └──> tick(dt) ──> pop sounds ──> render snapshot ──> wait for next frame
//! ```
//!
//! `dt` is measured from the clock and clamped, so a stalled frame slows the
//! simulation down instead of teleporting bubbles.

use crate::audio::AudioManager;
use crate::consts::MAX_FRAME_DT;
use crate::loader::TextSource;
use crate::platform::{Clock, EventSource, InputEvent, Key, MouseButton};
use crate::renderer::RenderSink;
use crate::settings::Settings;
use crate::sim::{Bubble, BubbleManager, SimEvent, Viewport};

/// Snapshot handed to renderers and event sources
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub index: u64,
    /// Simulated seconds since the loop started
    pub time: f32,
    /// Step used for this frame
    pub dt: f32,
    pub viewport: Viewport,
    /// Live bubbles, bottom first
    pub bubbles: &'a [Bubble],
}

/// Whether the loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub pops: u64,
    pub pruned: u64,
    pub reloads: u64,
}

/// Everything the loop mutates besides its collaborators
pub struct DriverContext {
    pub manager: BubbleManager,
    pub audio: AudioManager,
    pub texts: Box<dyn TextSource>,
    pub settings: Settings,
}

impl DriverContext {
    /// Build a context and spawn the first set of labels
    pub fn new(
        settings: Settings,
        mut texts: Box<dyn TextSource>,
        audio: AudioManager,
        seed: u64,
    ) -> Self {
        let viewport = Viewport::new(settings.width, settings.height);
        let mut manager = BubbleManager::new(viewport, settings.tuning.clone(), seed);
        manager.replace_all(crate::loader::initial_texts(texts.as_mut()));
        Self {
            manager,
            audio,
            texts,
            settings,
        }
    }

    /// Reload labels from the text source.
    ///
    /// A failed or empty load keeps the current bubbles.
    pub fn reload(&mut self) -> bool {
        match self.texts.load_texts() {
            Ok(texts) if !texts.is_empty() => {
                self.manager.replace_all(texts);
                true
            }
            Ok(_) => {
                log::info!("Reload returned no labels, keeping current bubbles");
                false
            }
            Err(e) => {
                log::warn!("Reload failed, keeping current bubbles: {e:#}");
                false
            }
        }
    }
}

/// Runs the input → update → render loop
pub struct FrameDriver<E, R, C> {
    ctx: DriverContext,
    events: E,
    renderer: R,
    clock: C,
    frame_index: u64,
    time: f32,
    last_dt: f32,
    last_now: Option<f64>,
    stats: RunStats,
}

impl<E: EventSource, R: RenderSink, C: Clock> FrameDriver<E, R, C> {
    pub fn new(ctx: DriverContext, events: E, renderer: R, clock: C) -> Self {
        Self {
            ctx,
            events,
            renderer,
            clock,
            frame_index: 0,
            time: 0.0,
            last_dt: 0.0,
            last_now: None,
            stats: RunStats::default(),
        }
    }

    pub fn context(&self) -> &DriverContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut DriverContext {
        &mut self.ctx
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Snapshot of the last rendered frame
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            index: self.frame_index,
            time: self.time,
            dt: self.last_dt,
            viewport: self.ctx.manager.viewport(),
            bubbles: self.ctx.manager.bubbles(),
        }
    }

    /// Run one frame
    pub fn step(&mut self) -> LoopControl {
        let frame_start = self.clock.now();
        let dt = match self.last_now {
            Some(last) => ((frame_start - last) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_now = Some(frame_start);

        // 1. Input
        let mut pending = Vec::new();
        let shown = Frame {
            index: self.frame_index,
            time: self.time,
            dt: self.last_dt,
            viewport: self.ctx.manager.viewport(),
            bubbles: self.ctx.manager.bubbles(),
        };
        self.events.poll(&shown, &mut pending);
        let mut control = LoopControl::Continue;
        for event in pending {
            if self.handle_event(event) == LoopControl::Quit {
                control = LoopControl::Quit;
                break;
            }
        }
        self.play_sounds();
        if control == LoopControl::Quit {
            log::info!("Quit after {} frames", self.stats.frames);
            return LoopControl::Quit;
        }

        // 2. Update
        self.ctx.manager.tick(dt);
        self.time += dt;
        self.last_dt = dt;
        self.play_sounds();

        // 3. Render
        self.frame_index += 1;
        self.stats.frames += 1;
        let frame = Frame {
            index: self.frame_index,
            time: self.time,
            dt,
            viewport: self.ctx.manager.viewport(),
            bubbles: self.ctx.manager.bubbles(),
        };
        self.renderer.render(&frame);

        let frame_dt = self.ctx.settings.frame_dt() as f64;
        self.clock.wait_until(frame_start + frame_dt);
        LoopControl::Continue
    }

    /// Run until quit or `max_frames` frames have been rendered
    pub fn run_for(&mut self, max_frames: u64) -> RunStats {
        while self.stats.frames < max_frames {
            if self.step() == LoopControl::Quit {
                break;
            }
        }
        self.stats
    }

    fn handle_event(&mut self, event: InputEvent) -> LoopControl {
        match event {
            InputEvent::Quit => return LoopControl::Quit,
            InputEvent::Resize { width, height } => {
                self.ctx.manager.set_viewport(Viewport::new(width, height));
            }
            InputEvent::PointerDown { pos, button } => match button {
                MouseButton::Left => {
                    self.ctx.manager.handle_click(pos);
                }
                MouseButton::Right => {
                    if self.ctx.reload() {
                        self.stats.reloads += 1;
                    }
                }
                MouseButton::Middle | MouseButton::Other => {}
            },
            InputEvent::KeyPress(Key::Escape) => return LoopControl::Quit,
            InputEvent::KeyPress(key) => {
                if key.is_char('n') {
                    self.ctx.manager.add_generated();
                }
            }
        }
        LoopControl::Continue
    }

    /// Turn simulation events into side effects
    fn play_sounds(&mut self) {
        for event in self.ctx.manager.drain_events() {
            match event {
                SimEvent::Popped { .. } => {
                    self.stats.pops += 1;
                    self.ctx.audio.play_pop();
                }
                SimEvent::Pruned { .. } => self.stats.pruned += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticSource;
    use crate::platform::{ManualClock, ScriptedEvents};
    use crate::renderer::MeshRenderer;

    fn context(texts: &[&str]) -> DriverContext {
        DriverContext::new(
            Settings::default(),
            Box::new(StaticSource::new(texts.iter().copied())),
            AudioManager::disabled(),
            7,
        )
    }

    fn driver(
        texts: &[&str],
        script: Vec<Vec<InputEvent>>,
    ) -> FrameDriver<ScriptedEvents, MeshRenderer, ManualClock> {
        FrameDriver::new(
            context(texts),
            ScriptedEvents::new(script),
            MeshRenderer::default(),
            ManualClock::new(),
        )
    }

    #[test]
    fn test_empty_source_spawns_placeholders() {
        let ctx = context(&[]);
        assert_eq!(ctx.manager.len(), 3);
    }

    #[test]
    fn test_quit_stops_before_update() {
        let mut d = driver(&["a"], vec![vec![InputEvent::Quit]]);
        assert_eq!(d.step(), LoopControl::Quit);
        assert_eq!(d.renderer().frames(), 0);
    }

    #[test]
    fn test_key_n_adds_bubble() {
        let mut d = driver(&["a"], vec![vec![InputEvent::KeyPress(Key::Char('N'))]]);
        d.step();
        assert_eq!(d.context().manager.len(), 2);
        assert_eq!(d.context().manager.bubbles()[1].text(), "Bubble 2");
    }

    #[test]
    fn test_click_pops_and_prunes() {
        let mut d = driver(&["a"], Vec::new());
        let pos = d.context().manager.bubbles()[0].pos();
        d.context_mut().manager.handle_click(pos);
        let stats = d.run_for(120);
        assert!(d.context().manager.is_empty());
        assert_eq!(stats.pops, 1);
        assert_eq!(stats.pruned, 1);
    }

    #[test]
    fn test_right_click_reloads() {
        let mut d = driver(
            &["a", "b"],
            vec![vec![InputEvent::PointerDown {
                pos: glam::Vec2::ZERO,
                button: MouseButton::Right,
            }]],
        );
        d.step();
        assert_eq!(d.stats().reloads, 1);
        assert_eq!(d.context().manager.len(), 2);
    }

    #[test]
    fn test_resize_updates_viewport() {
        let mut d = driver(&["a"], vec![vec![InputEvent::Resize { width: 300.0, height: 200.0 }]]);
        d.step();
        let viewport = d.context().manager.viewport();
        assert_eq!(viewport, Viewport::new(300.0, 200.0));
        for b in d.context().manager.bubbles() {
            assert!(viewport.contains_circle(b.pos(), b.radius()));
        }
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut d = driver(&["a"], Vec::new());
        d.step();
        // ManualClock sits at the frame deadline; jump far ahead
        d.clock.advance(5.0);
        d.step();
        assert!(d.frame().dt <= MAX_FRAME_DT);
        assert!(d.frame().time <= MAX_FRAME_DT + 1.0 / 60.0 + 1e-4);
    }
}
