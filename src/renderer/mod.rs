//! CPU rendering module
//!
//! Turns a frame snapshot into colored triangles plus label placements.
//! The result is backend-agnostic: `Vertex` is `Pod`, so any GPU layer can
//! upload `FrameMesh::vertices` as-is and draw labels with its own text stack.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use vertex::{Vertex, colors};

use crate::driver::Frame;
use crate::settings::Settings;
use crate::sim::animation::{
    SPOKE_COUNT, burst_alpha, particle_layout, spoke_color, spoke_length,
};
use crate::sim::{Bubble, BubbleState};
use crate::{direction, lerp_rgb};

/// Consumer of rendered frames
pub trait RenderSink {
    fn render(&mut self, frame: &Frame<'_>);
}

/// A label to draw centered at `pos`
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub bubble_id: u32,
    pub text: String,
    pub pos: Vec2,
    pub font_size: f32,
    pub color: [f32; 4],
}

/// Everything needed to draw one frame, back to front
#[derive(Debug, Clone, Default)]
pub struct FrameMesh {
    /// Color to clear the target with before drawing
    pub clear_color: [f32; 4],
    pub vertices: Vec<Vertex>,
    pub labels: Vec<Label>,
    /// Bubbles skipped because their geometry was unusable
    pub skipped: usize,
}

/// Visual options derived from settings
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub circle_segments: u32,
    pub burst_particles: u32,
    pub highlights: bool,
    /// Halve spoke reach
    pub reduced_motion: bool,
}

/// Spoke reach multiplier with reduced motion on
const REDUCED_SPOKE_SCALE: f32 = 0.5;

impl RenderOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            circle_segments: settings.quality.circle_segments(),
            burst_particles: settings.burst_particles(),
            highlights: settings.highlights,
            reduced_motion: settings.reduced_motion,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Font size for a bubble label
pub fn font_size(radius: f32) -> f32 {
    (radius / 2.0).max(16.0)
}

/// Finite, positive geometry only
fn drawable(bubble: &Bubble) -> bool {
    bubble.radius().is_finite()
        && bubble.radius() > 0.0
        && bubble.pos().is_finite()
        && bubble.burst_progress().is_finite()
}

/// Tessellate a whole frame in z-order
pub fn tessellate(bubbles: &[Bubble], options: &RenderOptions) -> FrameMesh {
    let mut mesh = FrameMesh {
        clear_color: colors::BACKGROUND,
        ..FrameMesh::default()
    };
    for bubble in bubbles {
        if !drawable(bubble) {
            log::trace!("Skipping degenerate bubble {}", bubble.id);
            mesh.skipped += 1;
            continue;
        }
        match bubble.state() {
            BubbleState::Idle => idle_bubble(bubble, options, &mut mesh),
            BubbleState::Bursting { progress } => {
                bursting_bubble(bubble, progress, options, &mut mesh)
            }
            BubbleState::Removed => {}
        }
    }
    mesh
}

fn idle_bubble(bubble: &Bubble, options: &RenderOptions, mesh: &mut FrameMesh) {
    let center = bubble.pos();
    let r = bubble.radius();
    let body = lerp_rgb(bubble.color(), [1.0, 1.0, 1.0], 0.2);

    let segments = options.circle_segments;
    mesh.vertices
        .extend(shapes::circle(center, r, colors::with_alpha(body, 0.8), segments));
    mesh.vertices
        .extend(shapes::ring(center, r * 0.92, r, colors::RIM, segments));

    if options.highlights {
        let spot = center + Vec2::new(-0.35 * r, -0.4 * r);
        let spot_segments = (segments / 2).max(6);
        mesh.vertices
            .extend(shapes::circle(spot, r * 0.18, colors::HIGHLIGHT, spot_segments));
    }

    mesh.labels.push(Label {
        bubble_id: bubble.id,
        text: bubble.text().to_string(),
        pos: center,
        font_size: font_size(r),
        color: colors::LABEL,
    });
}

fn bursting_bubble(bubble: &Bubble, progress: f32, options: &RenderOptions, mesh: &mut FrameMesh) {
    let center = bubble.pos();
    let r = bubble.radius();
    let alpha = burst_alpha(progress);
    let color = colors::with_alpha(spoke_color(bubble.color(), progress), alpha);
    let mut length = spoke_length(r, progress);
    if options.reduced_motion {
        length *= REDUCED_SPOKE_SCALE;
    }

    for i in 0..SPOKE_COUNT {
        let theta = std::f32::consts::TAU * i as f32 / SPOKE_COUNT as f32;
        let tip = center + direction(theta) * length;
        mesh.vertices.extend(shapes::line(center, tip, 3.0, color));
    }

    let particle_rgb = lerp_rgb(bubble.color(), [1.0, 1.0, 1.0], 0.5);
    for particle in particle_layout(bubble.id, options.burst_particles) {
        if let Some(sample) = particle.sample(progress, r) {
            mesh.vertices.extend(shapes::circle(
                center + sample.offset,
                sample.size,
                colors::with_alpha(particle_rgb, sample.alpha),
                8,
            ));
        }
    }
}

/// Render sink that keeps the latest tessellated frame
#[derive(Debug, Default)]
pub struct MeshRenderer {
    options: RenderOptions,
    last: FrameMesh,
    frames: u64,
}

impl MeshRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            last: FrameMesh::default(),
            frames: 0,
        }
    }

    /// Most recent frame
    pub fn last(&self) -> &FrameMesh {
        &self.last
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for MeshRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        self.last = tessellate(frame.bubbles, &self.options);
        self.frames += 1;
        if self.last.skipped > 0 {
            log::debug!("Frame {}: skipped {} bubbles", frame.index, self.last.skipped);
        }
    }
}
