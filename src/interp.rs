//! Interpolation utilities for parameter shaping.
//!
//! Everything in the engine that maps one quantity onto another — particle
//! size from angle, ring alpha from radius, stage targets from frame
//! counters — goes through one of these three mappings:
//!
//! - [`linear`]: plain affine remap between two ranges.
//! - [`hyperbolic`]: affine remap with the normalized value raised to
//!   `1/power`, bending the curve toward one end of the output range.
//! - [`bell`]: a Box-Muller normal sample folded into the range, with a
//!   skew exponent pushing the hump toward `min`.

use crate::random::RandomSource;
use std::f32::consts::TAU;

/// A closed value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// The unit range [0, 1].
    pub const UNIT: Range = Range::new(0.0, 1.0);

    /// Width of the range (`max - min`).
    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

/// Map `value` from `input` onto `output` linearly.
///
/// Values outside `input` extrapolate; callers clamp when they need to.
#[inline]
pub fn linear(value: f32, input: Range, output: Range) -> f32 {
    let normalized = (value - input.min) / input.span();
    output.min + normalized * output.span()
}

/// Map `value` from `input` onto `output` with power-curve shaping.
///
/// The normalized value is raised to `1/power` before scaling: `power > 1`
/// front-loads the output (fast start, slow finish), `power < 1` back-loads
/// it. `power == 1` reduces to [`linear`].
#[inline]
pub fn hyperbolic(value: f32, input: Range, output: Range, power: f32) -> f32 {
    let normalized = (value - input.min) / input.span();
    let transformed = normalized.powf(1.0 / power);
    output.min + transformed * output.span()
}

/// Draw a bell-curve random value from `range`.
///
/// Box-Muller transform folded into [0, 1] (samples landing outside are
/// redrawn), then raised to `skew`: `skew > 1` biases toward `range.min`,
/// `skew == 1` keeps the hump centered.
pub fn bell(rng: &mut dyn RandomSource, range: Range, skew: f32) -> f32 {
    let normalized = loop {
        let mut u = 0.0;
        while u == 0.0 {
            u = rng.next_f32();
        }
        let mut v = 0.0;
        while v == 0.0 {
            v = rng.next_f32();
        }
        let sample = (-2.0 * u.ln()).sqrt() * (TAU * v).cos();
        // Fold the standard normal into [0, 1]; ~0.01% of samples fall
        // outside and are redrawn.
        let folded = sample / 10.0 + 0.5;
        if (0.0..=1.0).contains(&folded) {
            break folded;
        }
    };
    range.min + normalized.powf(skew) * range.span()
}
