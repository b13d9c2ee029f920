//! Bubble collection and click resolution
//!
//! Insertion order is z-order: the last bubble in the list is drawn last and
//! therefore sits on top. Clicks are resolved against that same order, so the
//! bubble you see on top is the one that pops.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::spawn::{Spawner, generated_label};
use super::state::{Bubble, Viewport};
use crate::settings::SimTuning;

/// Things the simulation reports to the outside world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// A bubble was clicked and started bursting
    Popped { id: u32, pos: Vec2 },
    /// A finished bubble left the collection
    Pruned { id: u32 },
}

/// Owns every live bubble
#[derive(Debug)]
pub struct BubbleManager<R = Pcg32> {
    bubbles: Vec<Bubble>,
    viewport: Viewport,
    tuning: SimTuning,
    spawner: Spawner,
    rng: R,
    events: Vec<SimEvent>,
    next_id: u32,
}

impl BubbleManager<Pcg32> {
    /// Empty manager with a seeded RNG
    pub fn new(viewport: Viewport, tuning: SimTuning, seed: u64) -> Self {
        Self::with_rng(viewport, tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> BubbleManager<R> {
    /// Empty manager drawing randomness from `rng`
    pub fn with_rng(viewport: Viewport, tuning: SimTuning, rng: R) -> Self {
        let tuning = tuning.sanitized();
        Self {
            bubbles: Vec::new(),
            viewport,
            spawner: Spawner::from_tuning(&tuning),
            tuning,
            rng,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Live bubbles in z-order (bottom first)
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Bubbles outside the new bounds are clamped on their next advance
    pub fn set_viewport(&mut self, viewport: Viewport) {
        log::debug!("Viewport {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put a pre-built bubble on top of the stack, returning its new id
    pub fn insert(&mut self, mut bubble: Bubble) -> u32 {
        bubble.id = self.next_entity_id();
        let id = bubble.id;
        self.bubbles.push(bubble);
        id
    }

    /// Spawn a bubble for `text` on top of the stack
    pub fn add_bubble(&mut self, text: &str) -> u32 {
        let bubble = self.spawner.spawn(text, &self.viewport, &mut self.rng);
        self.insert(bubble)
    }

    /// Spawn a bubble with a generated label
    pub fn add_generated(&mut self) -> u32 {
        let label = generated_label(self.bubbles.len() + 1);
        self.add_bubble(&label)
    }

    /// Discard every bubble, bursting ones included, and spawn `texts`.
    ///
    /// In-flight burst animations are dropped without a `Pruned` event.
    pub fn replace_all<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dropped = self.bubbles.len();
        self.bubbles.clear();
        for text in texts {
            self.add_bubble(text.as_ref());
        }
        log::info!("Replaced {} bubbles with {}", dropped, self.bubbles.len());
    }

    /// Pop the topmost idle bubble under `point`.
    ///
    /// At most one bubble changes state per call.
    pub fn handle_click(&mut self, point: Vec2) -> bool {
        let tolerance = self.tuning.hit_tolerance;
        let hit = self
            .bubbles
            .iter_mut()
            .rev()
            .find(|b| b.is_idle() && b.hit_test(point, tolerance));

        match hit {
            Some(bubble) => {
                if bubble.burst() {
                    log::debug!("Popped bubble {} '{}'", bubble.id, bubble.text());
                    self.events.push(SimEvent::Popped {
                        id: bubble.id,
                        pos: bubble.pos(),
                    });
                }
                true
            }
            None => false,
        }
    }

    /// Advance every bubble, then drop the finished ones (order preserved).
    ///
    /// Returns the number of bubbles pruned.
    pub fn tick(&mut self, dt: f32) -> usize {
        for bubble in &mut self.bubbles {
            bubble.advance(dt, &self.viewport, &self.tuning);
        }

        let before = self.bubbles.len();
        let events = &mut self.events;
        self.bubbles.retain(|b| {
            if b.is_removable() {
                events.push(SimEvent::Pruned { id: b.id });
                false
            } else {
                true
            }
        });
        before - self.bubbles.len()
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BubbleState;

    const RED: [f32; 3] = [1.0, 0.0, 0.0];

    fn manager() -> BubbleManager {
        BubbleManager::new(Viewport::new(800.0, 600.0), SimTuning::default(), 12345)
    }

    fn still(text: &str, x: f32, y: f32, radius: f32) -> Bubble {
        Bubble::new(text, Vec2::new(x, y), Vec2::ZERO, radius, RED)
    }

    fn texts(m: &BubbleManager) -> Vec<&str> {
        m.bubbles().iter().map(|b| b.text()).collect()
    }

    #[test]
    fn test_overlap_picks_topmost() {
        let mut m = manager();
        let bottom = m.insert(still("bottom", 300.0, 300.0, 50.0));
        let top = m.insert(still("top", 330.0, 300.0, 50.0));

        assert!(m.handle_click(Vec2::new(315.0, 300.0)));
        assert!(m.get(bottom).unwrap().is_idle());
        assert!(matches!(m.get(top).unwrap().state(), BubbleState::Bursting { .. }));

        // Second click on the same spot falls through to the one below
        assert!(m.handle_click(Vec2::new(315.0, 300.0)));
        assert!(!m.get(bottom).unwrap().is_idle());
    }

    #[test]
    fn test_miss_changes_nothing() {
        let mut m = manager();
        m.insert(still("a", 100.0, 100.0, 40.0));
        m.insert(still("b", 500.0, 400.0, 40.0));
        let before: Vec<_> = m.bubbles().iter().map(|b| (b.pos(), b.state())).collect();

        assert!(!m.handle_click(Vec2::new(300.0, 300.0)));
        let after: Vec<_> = m.bubbles().iter().map(|b| (b.pos(), b.state())).collect();
        assert_eq!(before, after);
        assert!(m.drain_events().is_empty());
    }

    #[test]
    fn test_click_emits_one_pop() {
        let mut m = manager();
        let id = m.insert(still("a", 100.0, 100.0, 40.0));
        assert!(m.handle_click(Vec2::new(100.0, 100.0)));
        assert!(!m.handle_click(Vec2::new(100.0, 100.0)));
        let events = m.drain_events();
        assert_eq!(
            events,
            vec![SimEvent::Popped {
                id,
                pos: Vec2::new(100.0, 100.0)
            }]
        );
    }

    #[test]
    fn test_tolerance_eases_edge_clicks() {
        let mut m = manager();
        m.insert(still("a", 100.0, 100.0, 40.0));
        // 42px away: outside the body, inside the 1.1x hit radius
        assert!(m.handle_click(Vec2::new(142.0, 100.0)));
    }

    #[test]
    fn test_three_bubbles_end_to_end() {
        let mut m = manager();
        m.insert(still("one", 100.0, 100.0, 40.0));
        let second = m.insert(still("two", 400.0, 300.0, 40.0));
        m.insert(still("three", 700.0, 500.0, 40.0));

        assert!(m.handle_click(Vec2::new(400.0, 300.0)));
        for b in m.bubbles() {
            if b.id == second {
                assert!(matches!(b.state(), BubbleState::Bursting { .. }));
            } else {
                assert!(b.is_idle());
            }
        }

        let dt = 1.0 / 60.0;
        let mut ticks = 0;
        while m.get(second).is_some() {
            let progress = m.get(second).unwrap().burst_progress();
            assert!(progress < 1.0);
            m.tick(dt);
            ticks += 1;
            assert!(ticks <= 40, "burst never finished");
        }

        assert_eq!(texts(&m), vec!["one", "three"]);
        assert!(m.bubbles().iter().all(|b| b.is_idle()));
        assert_eq!(m.bubbles()[0].pos(), Vec2::new(100.0, 100.0));
        assert!(m.drain_events().contains(&SimEvent::Pruned { id: second }));
    }

    #[test]
    fn test_replace_all_drops_in_flight_bursts() {
        let mut m = manager();
        m.add_bubble("old");
        let pos = m.bubbles()[0].pos();
        m.handle_click(pos);
        m.drain_events();

        m.replace_all(["x", "y"]);
        assert_eq!(texts(&m), vec!["x", "y"]);
        assert!(m.bubbles().iter().all(|b| b.is_idle()));
        assert!(m.drain_events().is_empty());
    }

    #[test]
    fn test_replace_all_empty_then_tick() {
        let mut m = manager();
        m.add_bubble("a");
        m.replace_all(Vec::<String>::new());
        assert_eq!(m.tick(1.0 / 60.0), 0);
        assert!(m.is_empty());
        assert!(!m.handle_click(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_ids_are_stable_and_unique() {
        let mut m = manager();
        let a = m.add_bubble("a");
        let b = m.add_bubble("b");
        assert_ne!(a, b);
        m.replace_all(["c"]);
        assert!(m.bubbles()[0].id > b);
    }

    #[test]
    fn test_generated_label_counts_live_bubbles() {
        let mut m = manager();
        m.add_bubble("a");
        let id = m.add_generated();
        assert_eq!(m.get(id).unwrap().text(), "Bubble 2");
    }

    #[test]
    fn test_add_bubble_truncates() {
        let mut m = manager();
        let id = m.add_bubble("a label that is far too long to fit");
        assert_eq!(m.get(id).unwrap().text().chars().count(), 20);
    }

    #[test]
    fn test_determinism() {
        let mut m1 = manager();
        let mut m2 = manager();
        for m in [&mut m1, &mut m2] {
            m.replace_all(["a", "b", "c"]);
            for _ in 0..120 {
                m.tick(1.0 / 60.0);
            }
        }
        let p1: Vec<_> = m1.bubbles().iter().map(|b| b.pos()).collect();
        let p2: Vec<_> = m2.bubbles().iter().map(|b| b.pos()).collect();
        assert_eq!(p1, p2);
    }
}
