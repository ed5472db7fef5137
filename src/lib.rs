//! # spiralsink - particle black hole screensaver engine
//!
//! An animation engine for a decorative "black hole" visual: incoming bid
//! events become particles that spiral inward along a parametric curve
//! toward a value-accumulating kill zone. When the accumulated value
//! crosses the jackpot threshold, the zone runs a multi-stage collapse
//! and ejection sequence, after which the cycle restarts with fresh
//! random parameters.
//!
//! The engine is renderer-agnostic: it draws through the [`surface::DrawSurface`]
//! trait and is driven one frame at a time. The optional `egui` feature
//! adds an eframe shell and a `screensaver` binary.
//!
//! ## Quick Start
//!
//! ```no_run
//! use spiralsink::prelude::*;
//! use std::time::Instant;
//!
//! let rect = Rect::new(1280.0, 800.0);
//! let mut hole = BlackHole::new(
//!     rect,
//!     BlackHoleConfig::default(),
//!     Box::new(ThreadRandom::new()),
//! );
//! hole.add_particle(Bid { value: 250.0, color: [22, 163, 74] });
//!
//! let mut surface = NullSurface::new(rect);
//! loop {
//!     hole.frame(&mut surface, Instant::now());
//!     if hole.stage() == Stage::Done {
//!         break;
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Spiral
//!
//! The curve family `r = b * |theta|^p`, with the exponent branch chosen
//! by the sign of `theta`. Angle is the simulation variable: particles
//! only ever decrement their angle, and the curve maps that onto an
//! accelerating inward (or, past center, outward) path.
//!
//! ### Kill zone
//!
//! The disc at the center accumulates the value of every swallowed
//! particle with equal-area growth, up to a per-cycle random cap.
//! Crossing the jackpot is edge-triggered and starts the collapse.
//!
//! ### Stages
//!
//! `Growing → Expanding → Collapsing → Ejecting → Done`, all frame-counter
//! driven. `Done` fires an optional completion hook exactly once; the
//! caller constructs the next cycle.
//!
//! ### Feeding bids
//!
//! Either run [`generator::spawn`] for a synthetic bell-distributed feed,
//! or push decoded JSON messages through
//! [`black_hole::BlackHole::on_bid_message`].

pub mod black_hole;
pub mod color;
pub mod error;
pub mod generator;
pub mod interp;
pub mod kill_zone;
pub mod particle;
pub mod random;
#[cfg(feature = "egui")]
pub mod shell;
pub mod spiral;
pub mod surface;

/// Common imports for typical use.
pub mod prelude {
    pub use crate::black_hole::{BlackHole, BlackHoleConfig, Stage};
    pub use crate::color::{ColorTuple, DEFAULT_COLOR};
    pub use crate::error::FeedError;
    pub use crate::generator::{parse_bid, Bid, GeneratorConfig, ParticleGenerator};
    pub use crate::interp::Range;
    pub use crate::kill_zone::{KillZone, KillZoneConfig};
    pub use crate::particle::{Particle, ParticleConfig, Shape};
    pub use crate::random::{RandomSource, SequenceRandom, ThreadRandom};
    pub use crate::spiral::{Spiral, SpiralConfig};
    pub use crate::surface::{DrawSurface, NullSurface, Rect, Rgba};
}
