//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Size of one vertex in a GPU buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// View a vertex list as raw bytes for upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for scene elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [240.0 / 255.0, 240.0 / 255.0, 240.0 / 255.0, 1.0];
    pub const LABEL: [f32; 4] = [30.0 / 255.0, 30.0 / 255.0, 30.0 / 255.0, 1.0];
    pub const HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.55];
    pub const RIM: [f32; 4] = [1.0, 1.0, 1.0, 0.35];

    /// Attach an alpha channel
    pub fn with_alpha(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
        [rgb[0], rgb[1], rgb[2], alpha.clamp(0.0, 1.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::STRIDE, 24);
        let verts = [Vertex::new(1.0, 2.0, [0.0; 4]); 3];
        assert_eq!(as_bytes(&verts).len(), 72);
    }
}
