//! What the simulation hands to whoever draws it.

use nalgebra::Vector2;
use palette::Srgba;
use smallvec::SmallVec;
use std::f32::consts::PI;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    Circle,
    /// Polygon alternating between the outer radius and `inner_ratio` times it.
    Star { points: u8, inner_ratio: f32 },
}

impl Shape {
    /// Ratio between inner and outer corners of a sparkle.
    pub const STAR_INNER_RATIO: f32 = 0.5;

    pub fn star(points: u8) -> Self {
        Shape::Star {
            points,
            inner_ratio: Self::STAR_INNER_RATIO,
        }
    }
}

/// A single shape to draw, `size` is its radius in world units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub shape: Shape,
    pub position: Vector2<f32>,
    pub color: Srgba<u8>,
    pub size: f32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Layer {
    Points,
    /// Drawn on top of the points.
    Sparkles,
}

/// Corners of a star around the origin, starting with an outer corner on the x axis.
pub fn star_outline(points: u8, radius: f32, inner_ratio: f32) -> SmallVec<[Vector2<f32>; 16]> {
    let corners = points as usize * 2;
    (0..corners)
        .map(|i| {
            let angle = i as f32 * PI / points as f32;
            let r = if i % 2 == 0 { radius } else { radius * inner_ratio };
            Vector2::new(angle.cos(), angle.sin()) * r
        })
        .collect()
}

/// Window side of the frame loop.
///
/// The simulation calls these once per frame, from one thread, after every point
/// has been updated.
pub trait Renderer {
    type Error;

    fn clear(&mut self);

    fn draw(&mut self, layer: Layer, commands: &[DrawCommand]);

    fn draw_text(&mut self, text: &str);

    /// Presents everything drawn since the last `clear`.
    fn display(&mut self) -> Result<(), Self::Error>;
}
