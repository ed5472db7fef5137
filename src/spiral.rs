//! Generalized polar spiral geometry.
//!
//! The curve family is `r = a + b * |theta|^p` with the exponent branch
//! chosen by the sign of `theta`: `p = c` for `theta <= 0` and `p = 1/c`
//! for `theta > 0`. The asymmetry is intentional curve shaping — particles
//! that pass through the center (theta going negative) follow a different
//! curvature on the way out than they did on the way in.
//!
//! Angle, not radius, is the primary simulation variable: rotation speed is
//! just "angle decremented per frame", and the nonlinear `r(theta)` mapping
//! produces the accelerating inward spiral. `rotate_speed` is calibrated so
//! a particle starting at the outer edge with `b_factor == 1` completes its
//! traverse in roughly `base_frame_count` frames.

use crate::interp::{self, Range};
use crate::random::RandomSource;
use crate::surface::Rect;
use glam::Vec2;

/// Loop count baked into the radial-growth coefficient: a particle entering
/// at `b_divisor` radians of angular extent reaches the outer edge.
const B_DIVISOR: f32 = 50.0;

/// Static shape parameters for one spiral, fixed per animation cycle.
#[derive(Debug, Clone)]
pub struct SpiralConfig {
    /// Shape exponent. 1 is Archimedean, 2 is Fermat; the screensaver
    /// default sits between.
    pub c: f32,
    /// Max particle size as a fraction of the spiral radius.
    pub particle_size_ratio: f32,
    /// Frames for an edge-to-center traverse at multiplier 1.
    pub base_frame_count: f32,
    /// Handedness: flips the x-component of every coordinate.
    pub clockwise: bool,
    /// Center placement as a fraction of the half-extent, per axis.
    /// 1.0 centers the spiral; cycle setup randomizes these for
    /// off-center placement.
    pub center_x_factor: f32,
    pub center_y_factor: f32,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            c: 1.25,
            particle_size_ratio: 1.0 / 40.0,
            base_frame_count: 3000.0,
            clockwise: false,
            center_x_factor: 1.0,
            center_y_factor: 1.0,
        }
    }
}

/// A parametric spiral bound to a canvas rectangle.
///
/// Mutable state: center, center offset, max radial distance, and the
/// rotate-speed multiplier. Everything derived (`b`, angular extents,
/// rotate speed, seed particle size) is recomputed on mutation.
pub struct Spiral {
    /// Pole offset; always 0 for this curve family.
    a: f32,
    b: f32,
    c: f32,
    max_radial_distance: f32,
    max_theta: f32,
    inverse_max_theta: f32,
    rotate_speed: f32,
    seed_max_particle_size: f32,
    particle_size_multiplier: f32,
    rotate_speed_multiplier: f32,
    base_frame_count: f32,
    clockwise_sign: f32,
    center: Vec2,
    center_offset: Vec2,
    nearest_edge: f32,
    center_x_factor: f32,
    center_y_factor: f32,
    rect: Rect,
}

impl Spiral {
    /// Build a spiral for the given canvas rect. The random source fixes
    /// the per-cycle particle-size seed factor in [1, 2).
    pub fn new(rect: Rect, config: SpiralConfig, rng: &mut dyn RandomSource) -> Self {
        let particle_size_random_factor = rng.next_f32() + 1.0;
        let mut spiral = Self {
            a: 0.0,
            b: 0.0,
            c: config.c,
            max_radial_distance: 0.0,
            max_theta: 0.0,
            inverse_max_theta: 0.0,
            rotate_speed: 0.0,
            seed_max_particle_size: 0.0,
            particle_size_multiplier: particle_size_random_factor * config.particle_size_ratio,
            rotate_speed_multiplier: 1.0,
            base_frame_count: config.base_frame_count,
            clockwise_sign: if config.clockwise { -1.0 } else { 1.0 },
            center: Vec2::ZERO,
            center_offset: Vec2::ZERO,
            nearest_edge: 0.0,
            center_x_factor: config.center_x_factor,
            center_y_factor: config.center_y_factor,
            rect,
        };
        spiral.set_size(rect);
        spiral
    }

    /// Re-seed all size-dependent parameters from a new canvas rect:
    /// center (per-axis fractions of the half-extent) and max radial
    /// distance (half the rect diagonal). Idempotent for identical rects.
    pub fn set_size(&mut self, rect: Rect) {
        self.rect = rect;
        self.set_center(Vec2::new(
            rect.width / 2.0 * self.center_x_factor,
            rect.height / 2.0 * self.center_y_factor,
        ));
        self.set_max_radial_distance(rect.half_diagonal());
    }

    /// Set the outer radius, cascading into every derived parameter.
    /// Clamped to at least 1.
    pub fn set_max_radial_distance(&mut self, max_radial_distance: f32) {
        self.max_radial_distance = max_radial_distance.max(1.0);
        self.b = self.max_radial_distance / B_DIVISOR.powf(1.0 / self.c);
        self.seed_max_particle_size = self.max_radial_distance * self.particle_size_multiplier;
        self.max_theta = self.theta_at(self.max_radial_distance, 1.0, false);
        self.inverse_max_theta = self.theta_at(self.max_radial_distance, 1.0, true);
        self.rotate_speed = self.base_rotate_speed();
    }

    /// Scale the angular speed. Kill stages drive this negative to spin
    /// particles back out.
    pub fn set_rotate_speed_multiplier(&mut self, multiplier: f32) {
        self.rotate_speed_multiplier = multiplier;
        self.rotate_speed = self.base_rotate_speed();
    }

    /// Change the overall speed calibration.
    pub fn set_base_frame_count(&mut self, count: f32) {
        self.base_frame_count = count;
        self.rotate_speed = self.base_rotate_speed();
    }

    fn base_rotate_speed(&self) -> f32 {
        self.rotate_speed_multiplier * self.max_theta / self.base_frame_count
    }

    /// Radial distance for an angle: `a + b_factor * b * |theta|^p`, with
    /// the exponent branch selected by the sign of `theta`.
    pub fn radial_distance(&self, theta: f32, b_factor: f32) -> f32 {
        let abs_theta = theta.abs();
        if abs_theta == 0.0 {
            return self.a;
        }
        self.a + b_factor * self.b * abs_theta.powf(self.adjusted_c(theta))
    }

    fn adjusted_c(&self, theta: f32) -> f32 {
        if theta <= 0.0 {
            self.c
        } else {
            1.0 / self.c
        }
    }

    /// Inverse of [`radial_distance`](Self::radial_distance). `inverse`
    /// selects which exponent branch to invert — `true` gives the angular
    /// extent on the post-center side.
    pub fn theta_at(&self, radial_distance: f32, b_factor: f32, inverse: bool) -> f32 {
        if radial_distance == self.a {
            return 0.0;
        }
        let power = if inverse { 1.0 / self.c } else { self.c };
        ((radial_distance - self.a) / (b_factor * self.b)).abs().powf(power)
    }

    /// Polar → Cartesian around the (offset-adjusted) center.
    ///
    /// Negative theta subtracts the lengths instead of adding (the
    /// post-center trajectory mirrors through the center); the clockwise
    /// sign flips the x-component only.
    pub fn coordinates(&self, radial_distance: f32, theta: f32, theta_offset: f32) -> Vec2 {
        let mut point = self.center();
        let angle = theta.abs() + theta_offset;
        let x_length = radial_distance * angle.cos();
        let y_length = radial_distance * angle.sin();
        if theta < 0.0 {
            point.x -= x_length * self.clockwise_sign;
            point.y -= y_length;
        } else {
            point.x += x_length * self.clockwise_sign;
            point.y += y_length;
        }
        point
    }

    /// Particle size at an angular position: linear from 1 at the center
    /// up to the seed max at the (`b_factor`-adjusted) angular extent.
    pub fn particle_size_for_theta(&self, theta: f32, b_factor: Option<f32>) -> f32 {
        let mut max_theta = self.max_theta;
        if let Some(b_factor) = b_factor {
            max_theta = if theta < 0.0 {
                self.inverse_max_theta / b_factor.powf(1.0 / self.c)
            } else {
                self.max_theta / b_factor.powf(self.c)
            };
        }
        interp::linear(
            theta.abs(),
            Range::new(0.0, max_theta.abs()),
            Range::new(1.0, self.seed_max_particle_size),
        )
    }

    /// Particle size at a radial distance (inverts the curve first).
    pub fn particle_size_for_radius(&self, radial_distance: f32) -> f32 {
        let theta = self.theta_at(radial_distance, 1.0, false);
        self.particle_size_for_theta(theta, None)
    }

    /// Effective center: base center plus drift offset.
    pub fn center(&self) -> Vec2 {
        self.center + self.center_offset
    }

    /// Base center, without the drift offset.
    pub fn base_center(&self) -> Vec2 {
        self.center
    }

    /// Move the base center, tracking the distance to the nearest canvas
    /// edge (used to bound center drift).
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
        self.nearest_edge = center
            .x
            .min(center.y)
            .min(self.rect.width - center.x)
            .min(self.rect.height - center.y);
    }

    pub fn center_offset(&self) -> Vec2 {
        self.center_offset
    }

    pub fn set_center_offset(&mut self, offset: Vec2) {
        self.center_offset = offset;
    }

    pub fn max_radial_distance(&self) -> f32 {
        self.max_radial_distance
    }

    pub fn max_theta(&self) -> f32 {
        self.max_theta
    }

    pub fn inverse_max_theta(&self) -> f32 {
        self.inverse_max_theta
    }

    /// Angle decremented per frame per particle (before per-particle
    /// scale damping).
    pub fn rotate_speed(&self) -> f32 {
        self.rotate_speed
    }

    pub fn seed_max_particle_size(&self) -> f32 {
        self.seed_max_particle_size
    }

    pub fn base_frame_count(&self) -> f32 {
        self.base_frame_count
    }

    pub fn nearest_edge(&self) -> f32 {
        self.nearest_edge
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_clockwise(&self) -> bool {
        self.clockwise_sign < 0.0
    }
}
