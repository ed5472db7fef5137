//! One bid riding the spiral.
//!
//! A particle owns no geometry of its own: it stores an angle and derives
//! position and size from the [`Spiral`](crate::spiral::Spiral) it is
//! passed each frame. Rotation only ever decrements the angle, so a
//! particle spawned at the outer edge (`theta == max_theta`) spirals
//! inward, hits the center at `theta == 0`, and — if the simulation keeps
//! driving it — continues onto the negative branch and spirals back out.
//! Crossing the center permanently switches the render shape from a
//! filled circle to a stroked trail segment.

use crate::color::{ColorTuple, DEFAULT_COLOR};
use crate::spiral::Spiral;
use crate::surface::{DrawSurface, Rect, Rgba};
use glam::Vec2;

/// Alpha gained per simulation frame until fully faded in.
const ALPHA_STEP: f32 = 0.005;

/// Particles farther out than this multiple of the spiral radius, and
/// off-canvas, are dropped.
const ESCAPE_RADIUS_FACTOR: f32 = 1.3;

/// Peak opacity for stroked trail segments.
const STROKE_OPACITY: f32 = 0.5;

/// Render shape. Circles for inbound particles, strokes once a particle
/// has crossed the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Stroke,
}

/// Spawn parameters. `b_factor` spreads particles across lanes of the
/// same spiral; `initial_radial_distance` of infinity means "outer edge".
#[derive(Debug, Clone)]
pub struct ParticleConfig {
    pub value: f32,
    pub color: ColorTuple,
    pub theta_offset: f32,
    pub b_factor: f32,
    pub initial_radial_distance: f32,
    pub initial_alpha: f32,
    pub scale_factor: f32,
    pub shape: Shape,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            value: 0.0,
            color: DEFAULT_COLOR,
            theta_offset: 0.0,
            b_factor: 1.0,
            initial_radial_distance: f32::INFINITY,
            initial_alpha: 0.0,
            scale_factor: 1.0,
            shape: Shape::Circle,
        }
    }
}

pub struct Particle {
    value: f32,
    color: ColorTuple,
    theta_offset: f32,
    b_factor: f32,
    theta: f32,
    radial_distance: f32,
    alpha: f32,
    scale_factor: f32,
    shape: Shape,
    last_coordinates: Vec2,
    swallowed: bool,
}

impl Particle {
    pub fn new(spiral: &Spiral, config: ParticleConfig) -> Self {
        let radial_distance = if config.initial_radial_distance.is_finite() {
            config.initial_radial_distance
        } else {
            spiral.max_radial_distance()
        };
        let theta = spiral.theta_at(radial_distance, config.b_factor, false);
        let last_coordinates = spiral.coordinates(radial_distance, theta, config.theta_offset);
        Self {
            value: config.value,
            color: config.color,
            theta_offset: config.theta_offset,
            b_factor: config.b_factor,
            theta,
            radial_distance,
            alpha: config.initial_alpha,
            scale_factor: config.scale_factor,
            shape: config.shape,
            last_coordinates,
            swallowed: false,
        }
    }

    /// Advance one frame of angular motion, including the fade-in alpha:
    /// a particle held off-screen or behind the kill zone keeps fading
    /// even though it is not drawn.
    ///
    /// Per-particle speed is the spiral's rotate speed damped by the
    /// square root of the scale factor (big bids move slower), times the
    /// caller's multiplier (gravitational pull near the kill zone).
    /// The angle snaps to exactly 0 on the frame it would cross, so every
    /// particle touches the center once; the next step lands it on the
    /// negative branch and flips the shape to a stroke.
    pub fn rotate(&mut self, spiral: &Spiral, speed_multiplier: f32) {
        self.alpha = (self.alpha + ALPHA_STEP).min(1.0);
        let speed = spiral.rotate_speed() / self.scale_factor.sqrt() * speed_multiplier;
        // Signed comparison: a negative speed (reversed spiral during the
        // collapse stages) never snaps, it only pushes theta outward.
        if self.theta != 0.0 && self.theta.abs() < speed {
            self.theta = 0.0;
        } else {
            self.theta -= speed;
            if self.theta < 0.0 {
                self.theta -= speed;
                self.shape = Shape::Stroke;
            }
        }
        self.radial_distance = spiral.radial_distance(self.theta, self.b_factor);
    }

    fn escaped_at(&self, spiral: &Spiral, bounds: Rect, coordinates: Vec2) -> bool {
        self.radial_distance.abs() > ESCAPE_RADIUS_FACTOR * spiral.max_radial_distance()
            && !bounds.contains(coordinates)
    }

    /// Whether the particle has left the spiral: far beyond the outer
    /// radius AND off-canvas. Both are required so particles never vanish
    /// mid-screen.
    pub fn has_escaped(&self, spiral: &Spiral, bounds: Rect) -> bool {
        let coordinates = spiral.coordinates(self.radial_distance, self.theta, self.theta_offset);
        self.escaped_at(spiral, bounds, coordinates)
    }

    /// Draw one frame. Returns `true` if the particle has escaped the
    /// spiral and should be dropped; nothing is drawn in that case.
    pub fn draw(&mut self, spiral: &Spiral, surface: &mut dyn DrawSurface) -> bool {
        let coordinates = spiral.coordinates(self.radial_distance, self.theta, self.theta_offset);
        if self.escaped_at(spiral, surface.size(), coordinates) {
            return true;
        }

        let base_size = spiral.particle_size_for_theta(self.theta, Some(self.b_factor)) * self.alpha;

        match self.shape {
            Shape::Circle => {
                let size = base_size * self.scale_factor * self.scale_factor;
                let color = Rgba::new(self.color, self.alpha);
                surface.fill_circle(coordinates, size, color);
            }
            Shape::Stroke => {
                let size = base_size * self.scale_factor;
                let color = Rgba::new(self.color, self.alpha * STROKE_OPACITY);
                surface.line_segment(self.last_coordinates, coordinates, size, color);
            }
        }
        self.last_coordinates = coordinates;
        false
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn radial_distance(&self) -> f32 {
        self.radial_distance
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn last_coordinates(&self) -> Vec2 {
        self.last_coordinates
    }

    pub fn color(&self) -> ColorTuple {
        self.color
    }

    pub fn theta_offset(&self) -> f32 {
        self.theta_offset
    }

    pub fn b_factor(&self) -> f32 {
        self.b_factor
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn is_swallowed(&self) -> bool {
        self.swallowed
    }

    pub fn mark_swallowed(&mut self) {
        self.swallowed = true;
    }
}
