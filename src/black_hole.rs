//! The animation orchestrator.
//!
//! A [`BlackHole`] is one animation cycle: a main spiral carrying the live
//! particles, a slow center-drift spiral that wanders the main spiral's
//! center, a counter-rotating ejection spiral for the post-jackpot replay,
//! the kill zone, and the stage state machine that sequences the collapse.
//!
//! Stages run `Growing → Expanding → Collapsing → Ejecting → Done`.
//! Transitions are frame-counter driven, with thresholds derived from the
//! spiral's base frame count so stage pacing scales with the configured
//! speed. `Done` is a terminal state; the shell constructs a fresh
//! `BlackHole` with new random parameters to restart, rather than the
//! cycle restarting itself.
//!
//! The particle list grows without bound under event bursts. That is a
//! known, accepted gap: the intended visual behavior under overload is
//! unspecified, so nothing here defends against it.

use crate::color::ColorTuple;
use crate::error::FeedError;
use crate::generator::{parse_bid, Bid};
use crate::interp::{self, Range};
use crate::kill_zone::{KillZone, KillZoneConfig};
use crate::particle::{Particle, ParticleConfig, Shape};
use crate::random::{pick, RandomSource};
use crate::spiral::{Spiral, SpiralConfig};
use crate::surface::{DrawSurface, Rect, Rgba};
use glam::Vec2;
use log::warn;
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

/// Expanding-stage frame cap; short cycles use base_frame_count / 10.
const STAGE1_MAX_FRAMES: f32 = 150.0;

/// Extra frames granted to the ejection replay after the collapse.
const EJECTION_GRACE_FRAMES: u32 = 50;

/// Full-screen darkening per frame during the expanding stage (fast) and
/// the collapsing stage (slow).
const STAGE1_FADE_ALPHA: f32 = 0.15;
const STAGE2_FADE_ALPHA: f32 = 0.04;

/// Rotate-speed multiplier ramp target: the spiral ends up spinning hard
/// in reverse, flinging particles outward.
const SPEED_RAMP_TARGET: f32 = -20.0;
const SPEED_RAMP_POWER: f32 = 0.25;

/// Effective spiral radius collapse shaping during the kill stages.
const SPIRAL_COLLAPSE_POWER: f32 = 0.2;

/// Zone radius shaping: fast blow-up outward, then a slow pinch to zero.
const ZONE_EXPAND_POWER: f32 = 1.0 / 3.0;
const ZONE_COLLAPSE_POWER: f32 = 5.0;

/// Center drift only runs once the zone is visibly present.
const DRIFT_GATE_RADIUS: f32 = 10.0;

/// Gravitational speed-up near the zone: pull term capped, then mapped
/// onto a modest multiplier.
const GRAV_PULL_CAP: f32 = 10.0;
const GRAV_INPUT: Range = Range::new(0.0, 20.0);
const GRAV_OUTPUT: Range = Range::new(1.0, 1.5);

/// Phase of the post-jackpot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Normal operation: accepting particles, zone accumulating.
    Growing,
    /// Zone blows up toward canvas size, screen darkens fast.
    Expanding,
    /// Zone pinches back to nothing, screen darkens slowly.
    Collapsing,
    /// Swallowed particles replay outward on the counter-rotating spiral.
    Ejecting,
    /// Cycle finished; the completion hook has fired.
    Done,
}

#[derive(Debug, Clone)]
pub struct BlackHoleConfig {
    /// Accumulated value that triggers the collapse.
    pub jackpot: f32,
    pub spiral: SpiralConfig,
    /// Motion-trail length; the per-frame fade alpha is its reciprocal.
    pub trail_length: f32,
    /// Frames between spiral-radius breathing retargets.
    pub breath_interval: u32,
    pub resize_debounce: Duration,
    /// Ring color; `None` picks a random palette entry.
    pub kill_color: Option<ColorTuple>,
    /// Rotate-speed multiplier of the ejection spiral.
    pub ejection_speed_multiplier: f32,
}

impl Default for BlackHoleConfig {
    fn default() -> Self {
        Self {
            jackpot: 10_000.0,
            spiral: SpiralConfig::default(),
            trail_length: 20.0,
            breath_interval: 1500,
            resize_debounce: Duration::from_millis(100),
            kill_color: None,
            ejection_speed_multiplier: 20.0,
        }
    }
}

pub struct BlackHole {
    config: BlackHoleConfig,
    rng: Box<dyn RandomSource>,
    spiral: Spiral,
    center_spiral: Spiral,
    kill_spiral: Spiral,
    kill_zone: KillZone,
    particles: Vec<Particle>,
    swallowed: Vec<Particle>,
    stage: Stage,
    kill_count: u32,
    stage1: u32,
    stage2: u32,
    stage3: u32,
    /// Spiral radius at cycle start / after resize; breathing and the
    /// collapse ramps are expressed relative to it.
    base_max: f32,
    breath_count: u32,
    last_breath_target: f32,
    next_breath_target: f32,
    expand_start_radius: f32,
    expand_peak_radius: f32,
    drift_theta: f32,
    drift_theta_offset: f32,
    drift_radial_distance: f32,
    drift_direction: f32,
    pending_resize: Option<(Rect, Instant)>,
    paused: bool,
    on_done: Option<Box<dyn FnOnce()>>,
}

impl BlackHole {
    pub fn new(rect: Rect, config: BlackHoleConfig, mut rng: Box<dyn RandomSource>) -> Self {
        let spiral = Spiral::new(rect, config.spiral.clone(), rng.as_mut());
        let center_spiral = Spiral::new(
            rect,
            SpiralConfig {
                base_frame_count: config.spiral.base_frame_count,
                ..SpiralConfig::default()
            },
            rng.as_mut(),
        );
        let mut kill_spiral = Spiral::new(
            rect,
            SpiralConfig {
                clockwise: !config.spiral.clockwise,
                ..config.spiral.clone()
            },
            rng.as_mut(),
        );
        kill_spiral.set_rotate_speed_multiplier(config.ejection_speed_multiplier);

        let base_max = spiral.max_radial_distance();
        let kill_color = config.kill_color.unwrap_or_else(|| {
            let palette = crate::color::palette();
            pick(rng.as_mut(), &palette)
                .copied()
                .unwrap_or(crate::color::DEFAULT_COLOR)
        });
        let kill_zone = KillZone::new(
            KillZoneConfig {
                ring_color: kill_color,
                max_kill_radius: base_max / 2.0,
                center: spiral.base_center(),
                kill_value: config.jackpot,
            },
            rng.as_mut(),
        );

        let stage1 = (config.spiral.base_frame_count / 10.0)
            .min(STAGE1_MAX_FRAMES)
            .max(1.0) as u32;
        let drift_theta = rng.next_f32() * TAU;
        let drift_theta_offset = rng.next_f32() * TAU;

        Self {
            spiral,
            center_spiral,
            kill_spiral,
            kill_zone,
            particles: Vec::new(),
            swallowed: Vec::new(),
            stage: Stage::Growing,
            kill_count: 0,
            stage1,
            stage2: 2 * stage1,
            stage3: 2 * stage1 + EJECTION_GRACE_FRAMES,
            base_max,
            breath_count: 0,
            last_breath_target: 0.1 * base_max,
            next_breath_target: 0.5 * base_max,
            expand_start_radius: 0.0,
            expand_peak_radius: 0.0,
            drift_theta,
            drift_theta_offset,
            drift_radial_distance: 0.0,
            drift_direction: 1.0,
            pending_resize: None,
            paused: false,
            on_done: None,
            config,
            rng,
        }
    }

    /// Register the completion hook; fires exactly once, on entering
    /// [`Stage::Done`].
    pub fn on_done(&mut self, hook: impl FnOnce() + 'static) {
        self.on_done = Some(Box::new(hook));
    }

    /// Enqueue a bid as a new particle at the spiral's outer edge.
    /// Bursts grow the list without bound; that is accepted.
    pub fn add_particle(&mut self, bid: Bid) {
        let scale_factor = interp::hyperbolic(
            bid.value,
            Range::new(0.0, bid.value.max(10_000.0)),
            Range::new(1.0, 3.0),
            2.0,
        );
        let config = ParticleConfig {
            value: bid.value,
            color: bid.color,
            theta_offset: self.rng.next_f32() * TAU,
            b_factor: self.rng.in_range(0.5, 1.0),
            scale_factor,
            ..ParticleConfig::default()
        };
        self.particles.push(Particle::new(&self.spiral, config));
    }

    /// Live-feed entry point: decode a JSON bid message and enqueue it.
    /// A malformed message is an error for the caller to log and drop.
    pub fn on_bid_message(&mut self, message: &str) -> Result<(), FeedError> {
        let bid = parse_bid(message)?;
        self.add_particle(bid);
        Ok(())
    }

    /// Cancel the cycle externally: the zone is force-killed and the
    /// collapse sequence starts on the next frame.
    pub fn kill(&mut self) {
        self.kill_zone.force_kill();
        self.begin_kill();
    }

    pub fn is_kill(&self) -> bool {
        self.stage != Stage::Growing
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn spiral(&self) -> &Spiral {
        &self.spiral
    }

    pub fn kill_zone(&self) -> &KillZone {
        &self.kill_zone
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn swallowed_count(&self) -> usize {
        self.swallowed.len()
    }

    /// Pass-through to the main spiral; settable live.
    pub fn set_rotate_speed_multiplier(&mut self, multiplier: f32) {
        self.spiral.set_rotate_speed_multiplier(multiplier);
    }

    /// Note a canvas resize. Application is debounced: drawing pauses and
    /// the new rect takes effect once no further resize arrives within
    /// the debounce window.
    pub fn handle_resize(&mut self, rect: Rect, now: Instant) {
        self.paused = true;
        self.pending_resize = Some((rect, now));
    }

    fn apply_resize(&mut self, rect: Rect) {
        self.center_spiral.set_size(rect);
        self.kill_spiral.set_size(rect);
        self.spiral.set_size(rect);
        self.base_max = self.spiral.max_radial_distance();
        self.kill_zone.update_max_kill_radius(self.base_max / 2.0);
        self.kill_zone.set_center(self.spiral.base_center());
        self.pending_resize = None;
        self.paused = false;
    }

    /// Advance one animation frame: resize bookkeeping, trail fade,
    /// breathing, center drift, stage ramps, particle motion, zone draw,
    /// ejection replay.
    pub fn frame(&mut self, surface: &mut dyn DrawSurface, now: Instant) {
        if let Some((rect, at)) = self.pending_resize {
            if now.duration_since(at) >= self.config.resize_debounce {
                self.apply_resize(rect);
            }
        }
        if self.stage == Stage::Done {
            return;
        }

        if self.stage == Stage::Growing {
            surface.fill_screen(Rgba::black(1.0 / self.config.trail_length));
            let breath = self.step_breathing();
            self.spiral.set_max_radial_distance(breath);
            self.kill_zone.update_max_kill_radius(breath / 2.0);
        }
        if self.kill_zone.current_radius() > DRIFT_GATE_RADIUS {
            self.step_center_drift();
        }
        if self.stage != Stage::Growing {
            self.step_kill_stage(surface);
        }
        self.step_particles(surface);
        if !matches!(self.stage, Stage::Ejecting | Stage::Done) {
            let Self { spiral, kill_zone, .. } = self;
            kill_zone.draw(surface, &|radius| spiral.particle_size_for_radius(radius));
        }
        if self.stage == Stage::Ejecting {
            self.step_ejection(surface);
        }
    }

    /// Drift `max_radial_distance` toward a periodically re-picked target,
    /// so the spiral "breathes" instead of holding a fixed radius. Target
    /// ranges are biased by where the previous target sat relative to the
    /// base radius, keeping the motion inside [0.4, 1.0] of it.
    fn step_breathing(&mut self) -> f32 {
        let interval = self.config.breath_interval;
        if self.breath_count > interval + interval / 2 {
            self.last_breath_target = self.next_breath_target;
            let base = self.base_max;
            let range = if self.last_breath_target > 0.8 * base
                || self.last_breath_target < 0.6 * base
            {
                Range::new(0.6 * base, 0.8 * base)
            } else if self.rng.next_f32() > 0.3 {
                Range::new(0.8 * base, base)
            } else {
                Range::new(0.4 * base, 0.6 * base)
            };
            self.next_breath_target = interp::linear(self.rng.next_f32(), Range::UNIT, range);
            self.breath_count = 0;
        } else {
            self.breath_count += 1;
        }
        interp::linear(
            self.breath_count.min(interval) as f32,
            Range::new(0.0, interval as f32),
            Range::new(self.last_breath_target, self.next_breath_target),
        )
    }

    /// Wander the main spiral's center along the drift spiral: the angle
    /// walks outward slowly, turns around at half the base radius, and
    /// speeds up through the middle band (slow near the extremes). The
    /// resulting offset is clamped against the nearest canvas edge; the
    /// kill zone follows with its own lagging clamp.
    fn step_center_drift(&mut self) {
        let max_change = self.center_spiral.rotate_speed();
        let min_change = max_change / 5.0;
        let inflection = 0.25 * self.base_max;
        let max_distance = 0.5 * self.base_max;

        let mut change = if self.drift_radial_distance >= inflection {
            interp::hyperbolic(
                self.drift_radial_distance.min(max_distance),
                Range::new(inflection, max_distance),
                Range::new(max_change, min_change),
                1.0 / 3.0,
            )
        } else {
            interp::hyperbolic(
                self.drift_radial_distance.max(0.0),
                Range::new(0.0, inflection),
                Range::new(min_change, max_change),
                3.0,
            )
        };
        if self.drift_radial_distance >= max_distance {
            self.drift_direction = -1.0;
            change = min_change;
        }
        if self.drift_theta <= 0.0 {
            self.drift_direction = 1.0;
        }
        self.drift_theta += change * self.drift_direction;
        self.drift_radial_distance = self.center_spiral.radial_distance(self.drift_theta, 1.0);

        let coordinates = self.center_spiral.coordinates(
            self.drift_radial_distance,
            self.drift_theta,
            self.drift_theta_offset,
        );
        let mut offset = coordinates - self.center_spiral.base_center();
        let limit = 0.5 * self.spiral.nearest_edge();
        let length = offset.length();
        if length > limit && length > 0.0 {
            offset *= limit.max(0.0) / length;
        }
        self.spiral.set_center_offset(offset);
        self.kill_zone.set_center_offset(offset);
    }

    /// Collapse-stage ramps and transitions. The zone radius update is
    /// isolated: a non-finite target is logged and skipped for the frame
    /// instead of poisoning the zone.
    fn step_kill_stage(&mut self, surface: &mut dyn DrawSurface) {
        let k = self.kill_count as f32;
        match self.stage {
            Stage::Expanding | Stage::Collapsing => {
                let fade = if self.stage == Stage::Expanding {
                    STAGE1_FADE_ALPHA
                } else {
                    STAGE2_FADE_ALPHA
                };
                surface.fill_screen(Rgba::black(fade));

                let ramp_span = Range::new(0.0, self.stage2 as f32);
                let multiplier =
                    interp::hyperbolic(k, ramp_span, Range::new(1.0, SPEED_RAMP_TARGET), SPEED_RAMP_POWER);
                self.spiral.set_rotate_speed_multiplier(multiplier);
                let collapsed = interp::hyperbolic(
                    k,
                    ramp_span,
                    Range::new(self.base_max, 0.0),
                    SPIRAL_COLLAPSE_POWER,
                );
                self.spiral.set_max_radial_distance(collapsed);

                let target = if self.stage == Stage::Expanding {
                    interp::hyperbolic(
                        k,
                        Range::new(0.0, self.stage1 as f32),
                        Range::new(self.expand_start_radius, 2.0 * self.base_max),
                        ZONE_EXPAND_POWER,
                    )
                } else {
                    interp::hyperbolic(
                        k - self.stage1 as f32,
                        Range::new(0.0, (self.stage2 - self.stage1) as f32),
                        Range::new(self.expand_peak_radius, 0.0),
                        ZONE_COLLAPSE_POWER,
                    )
                };
                if target.is_finite() {
                    self.kill_zone.update_max_kill_radius(target.max(0.0));
                } else {
                    warn!(
                        "skipping zone radius update at kill frame {}: non-finite target",
                        self.kill_count
                    );
                }
            }
            Stage::Ejecting => {
                surface.fill_screen(Rgba::black(1.0 / self.config.trail_length));
            }
            _ => {}
        }

        self.kill_count += 1;
        match self.stage {
            Stage::Expanding if self.kill_count >= self.stage1 => {
                self.stage = Stage::Collapsing;
                self.expand_peak_radius = self.kill_zone.kill_radius();
            }
            Stage::Collapsing if self.kill_count >= self.stage2 => {
                self.stage = Stage::Ejecting;
            }
            Stage::Ejecting if self.kill_count >= self.stage3 && self.swallowed.is_empty() => {
                self.stage = Stage::Done;
                if let Some(done) = self.on_done.take() {
                    done();
                }
            }
            _ => {}
        }
    }

    fn step_particles(&mut self, surface: &mut dyn DrawSurface) {
        let bounds = surface.size();
        let mut index = 0;
        while index < self.particles.len() {
            let is_kill = self.stage != Stage::Growing;
            let radial = self.particles[index].radial_distance();
            let theta = self.particles[index].theta();
            let last = self.particles[index].last_coordinates();
            let zone_radius = self.kill_zone.current_radius();

            if !is_kill
                && !self.particles[index].is_swallowed()
                && (radial < zone_radius || theta == 0.0)
            {
                let value = self.particles[index].value();
                self.particles[index].mark_swallowed();
                self.spawn_ejection_clone(index);
                if self.kill_zone.add_value(value) {
                    self.begin_kill();
                }
            }

            let paused = self.paused
                || ((is_kill || self.particles[index].is_swallowed())
                    && radial < self.kill_zone.current_radius());
            let multiplier = if is_kill {
                1.0
            } else {
                self.gravitational_multiplier(last)
            };
            self.particles[index].rotate(&self.spiral, multiplier);
            if self.particles[index].has_escaped(&self.spiral, bounds) {
                self.particles.remove(index);
                continue;
            }
            if !paused {
                self.particles[index].draw(&self.spiral, surface);
            }
            index += 1;
        }
    }

    /// Reincarnate a swallowed particle at the ejection spiral's center;
    /// it replays outward during [`Stage::Ejecting`].
    fn spawn_ejection_clone(&mut self, index: usize) {
        let particle = &self.particles[index];
        let clone = Particle::new(
            &self.kill_spiral,
            ParticleConfig {
                value: particle.value(),
                color: particle.color(),
                theta_offset: particle.theta_offset(),
                b_factor: particle.b_factor(),
                initial_radial_distance: 0.0,
                initial_alpha: 1.0,
                scale_factor: particle.scale_factor(),
                shape: Shape::Stroke,
            },
        );
        self.swallowed.push(clone);
    }

    fn step_ejection(&mut self, surface: &mut dyn DrawSurface) {
        let bounds = surface.size();
        let mut index = 0;
        while index < self.swallowed.len() {
            self.swallowed[index].rotate(&self.kill_spiral, 1.0);
            if self.swallowed[index].has_escaped(&self.kill_spiral, bounds) {
                self.swallowed.remove(index);
                continue;
            }
            self.swallowed[index].draw(&self.kill_spiral, surface);
            index += 1;
        }
    }

    /// Speed-up for particles near the zone edge, a visual gravity cue.
    fn gravitational_multiplier(&self, last_coordinates: Vec2) -> f32 {
        let pull = (2.0 * self.kill_zone.current_radius()
            - self.kill_zone.distance_from_center(last_coordinates))
        .clamp(0.0, GRAV_PULL_CAP);
        interp::linear(pull, GRAV_INPUT, GRAV_OUTPUT)
    }

    fn begin_kill(&mut self) {
        if self.stage != Stage::Growing {
            return;
        }
        self.stage = Stage::Expanding;
        self.kill_count = 0;
        self.expand_start_radius = self.kill_zone.kill_radius();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;
    use crate::surface::NullSurface;
    use std::cell::Cell;
    use std::rc::Rc;

    const RECT: Rect = Rect::new(800.0, 600.0);

    fn fast_config(jackpot: f32) -> BlackHoleConfig {
        BlackHoleConfig {
            jackpot,
            spiral: SpiralConfig {
                base_frame_count: 100.0,
                ..SpiralConfig::default()
            },
            ..BlackHoleConfig::default()
        }
    }

    fn test_hole(jackpot: f32) -> BlackHole {
        BlackHole::new(
            RECT,
            fast_config(jackpot),
            Box::new(SequenceRandom::constant(0.5)),
        )
    }

    fn run_frames(hole: &mut BlackHole, frames: u32) {
        let mut surface = NullSurface::new(RECT);
        let start = Instant::now();
        for i in 0..frames {
            hole.frame(&mut surface, start + Duration::from_millis(u64::from(i) * 16));
        }
    }

    #[test]
    fn test_jackpot_crossing_is_strict() {
        // 40 + 40 = 80 stays below a jackpot of 100; the third particle
        // crosses (120 > 100) and starts the collapse.
        let mut hole = test_hole(100.0);
        for _ in 0..3 {
            hole.add_particle(Bid {
                value: 40.0,
                color: [22, 163, 74],
            });
        }
        assert_eq!(hole.particle_count(), 3);

        let mut surface = NullSurface::new(RECT);
        let start = Instant::now();
        for i in 0..2_000_u64 {
            if hole.stage() != Stage::Growing {
                break;
            }
            hole.frame(&mut surface, start + Duration::from_millis(i * 16));
        }
        assert_eq!(hole.stage(), Stage::Expanding);
        assert!(hole.kill_zone().is_kill());
        assert!((hole.kill_zone().current_value() - 120.0).abs() < 1e-3);
        assert_eq!(hole.swallowed_count(), 3);
    }

    #[test]
    fn test_cycle_reaches_done_and_fires_hook_once() {
        let mut hole = test_hole(100.0);
        let fired = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&fired);
        hole.on_done(move || counter.set(counter.get() + 1));

        for _ in 0..3 {
            hole.add_particle(Bid {
                value: 40.0,
                color: [22, 163, 74],
            });
        }
        run_frames(&mut hole, 2_000);
        assert_eq!(hole.stage(), Stage::Done);
        assert_eq!(hole.swallowed_count(), 0);
        assert_eq!(fired.get(), 1);
        run_frames(&mut hole, 100);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_stage_sequence_order() {
        let mut hole = test_hole(1.0);
        hole.add_particle(Bid {
            value: 40.0,
            color: [22, 163, 74],
        });
        let mut surface = NullSurface::new(RECT);
        let start = Instant::now();
        let mut seen = vec![hole.stage()];
        for i in 0..2_000_u64 {
            hole.frame(&mut surface, start + Duration::from_millis(i * 16));
            if *seen.last().unwrap() != hole.stage() {
                seen.push(hole.stage());
            }
        }
        assert_eq!(
            seen,
            vec![
                Stage::Growing,
                Stage::Expanding,
                Stage::Collapsing,
                Stage::Ejecting,
                Stage::Done
            ]
        );
    }

    #[test]
    fn test_external_kill_forces_collapse() {
        let mut hole = test_hole(10_000.0);
        hole.kill();
        assert_eq!(hole.stage(), Stage::Expanding);
        assert!(hole.kill_zone().is_kill());
        run_frames(&mut hole, 500);
        assert_eq!(hole.stage(), Stage::Done);
    }

    #[test]
    fn test_breathing_stays_below_base_radius() {
        let mut hole = test_hole(f32::MAX);
        let base = hole.spiral().max_radial_distance();
        let mut surface = NullSurface::new(RECT);
        let start = Instant::now();
        let mut seen_change = false;
        let mut last = 0.0_f32;
        for i in 0..5_000_u64 {
            hole.frame(&mut surface, start + Duration::from_millis(i * 16));
            let max = hole.spiral().max_radial_distance();
            assert!(max <= base + 1e-3, "breathing must not exceed the base radius");
            assert!(max >= 1.0);
            if i > 0 && (max - last).abs() > 1e-6 {
                seen_change = true;
            }
            last = max;
        }
        assert!(seen_change, "radius should breathe, not sit still");
    }

    #[test]
    fn test_resize_is_debounced_and_idempotent() {
        let run = |resizes: u32| {
            let mut hole = test_hole(10_000.0);
            let mut surface = NullSurface::new(RECT);
            let start = Instant::now();
            hole.frame(&mut surface, start);
            let rect = Rect::new(1024.0, 768.0);
            for _ in 0..resizes {
                hole.handle_resize(rect, start);
            }
            // within the debounce window: old geometry still in place.
            hole.frame(&mut surface, start + Duration::from_millis(50));
            assert_eq!(hole.spiral().rect(), RECT);
            hole.frame(&mut surface, start + Duration::from_millis(200));
            assert_eq!(hole.spiral().rect(), rect);
            (
                hole.spiral().base_center(),
                hole.spiral().max_radial_distance(),
                hole.spiral().rotate_speed(),
                hole.kill_zone().kill_radius(),
            )
        };
        assert_eq!(run(1), run(3));
    }

    #[test]
    fn test_malformed_feed_message_is_dropped() {
        let mut hole = test_hole(10_000.0);
        assert!(hole.on_bid_message("{ not json").is_err());
        assert!(hole
            .on_bid_message(r#"{"amount": -3, "auction_type_code": "1"}"#)
            .is_err());
        assert_eq!(hole.particle_count(), 0);
        assert!(hole
            .on_bid_message(r#"{"amount": 12, "auction_type_code": "9"}"#)
            .is_ok());
        assert_eq!(hole.particle_count(), 1);
    }

    #[test]
    fn test_zone_radius_bounded_through_collapse() {
        let mut hole = test_hole(100.0);
        for _ in 0..3 {
            hole.add_particle(Bid {
                value: 40.0,
                color: [22, 163, 74],
            });
        }
        let mut surface = NullSurface::new(RECT);
        let start = Instant::now();
        for i in 0..2_000_u64 {
            hole.frame(&mut surface, start + Duration::from_millis(i * 16));
            assert!(
                hole.kill_zone().current_radius() <= hole.kill_zone().kill_radius() + 1e-3
            );
        }
    }
}
