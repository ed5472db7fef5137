//! The value-accumulating disc at the spiral center.
//!
//! The zone's area grows in proportion to the value swallowed, so the
//! radius grows with the square root of accumulated value and is capped
//! at a per-cycle kill radius (a random fraction of the allowed maximum).
//! Crossing the kill value is edge-triggered: [`KillZone::add_value`]
//! returns `true` exactly once, after which further deposits are ignored
//! and the cycle's collapse stages take over.
//!
//! The rendered radius trails the target radius with an eased catch-up,
//! so a large bid swells the ring over many frames instead of popping.

use crate::color::ColorTuple;
use crate::interp::{self, Range};
use crate::random::RandomSource;
use crate::surface::{DrawSurface, Rgba};
use glam::Vec2;

/// Per-cycle kill radius as a random fraction of the maximum.
const KILL_RADIUS_FACTOR_RANGE: Range = Range::new(0.75, 0.95);

/// Center-offset magnitude, per axis, beyond which the zone walks its
/// offset back instead of following.
const OFFSET_FOLLOW_FACTOR: f32 = 0.2;

/// Ring alpha range over [0, kill radius].
const RING_ALPHA: Range = Range::new(0.2, 0.7);

#[derive(Debug, Clone)]
pub struct KillZoneConfig {
    pub ring_color: ColorTuple,
    pub max_kill_radius: f32,
    pub center: Vec2,
    /// Accumulated value that triggers the kill.
    pub kill_value: f32,
}

pub struct KillZone {
    ring_color: ColorTuple,
    kill_value: f32,
    kill_radius_factor: f32,
    kill_radius: f32,
    is_kill: bool,
    radius_when_kill: f32,
    current_value: f32,
    grow_radius: f32,
    current_radius: f32,
    center: Vec2,
    center_offset: Vec2,
}

impl KillZone {
    pub fn new(config: KillZoneConfig, rng: &mut dyn RandomSource) -> Self {
        let kill_radius_factor =
            rng.in_range(KILL_RADIUS_FACTOR_RANGE.min, KILL_RADIUS_FACTOR_RANGE.max);
        Self {
            ring_color: config.ring_color,
            kill_value: config.kill_value,
            kill_radius_factor,
            kill_radius: (config.max_kill_radius * kill_radius_factor).max(1.0),
            is_kill: false,
            radius_when_kill: 0.0,
            current_value: 0.0,
            grow_radius: 0.0,
            current_radius: 0.0,
            center: config.center,
            center_offset: Vec2::ZERO,
        }
    }

    /// Deposit a swallowed particle's value. Returns `true` on the call
    /// that crosses the kill value (strictly greater); no-op once killed.
    pub fn add_value(&mut self, value: f32) -> bool {
        if self.is_kill {
            return false;
        }
        self.current_value += value;
        self.grow_radius = self.target_radius();
        if self.current_value > self.kill_value {
            self.is_kill = true;
            self.radius_when_kill = self.current_radius;
            return true;
        }
        false
    }

    /// Target radius for the accumulated value: equal-area growth, capped
    /// at the kill radius.
    fn target_radius(&self) -> f32 {
        let area_fraction = self.current_value / self.kill_value * self.kill_area();
        (area_fraction / std::f32::consts::PI).sqrt().min(self.kill_radius)
    }

    /// Rescale after a canvas resize. A killed zone pins both radii at the
    /// new kill radius so the collapse stages restart from a full ring.
    pub fn update_max_kill_radius(&mut self, max_kill_radius: f32) {
        self.kill_radius = max_kill_radius * self.kill_radius_factor;
        if self.is_kill {
            self.current_radius = self.kill_radius;
            self.grow_radius = self.kill_radius;
        } else {
            self.grow_radius = self.target_radius();
        }
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Effective center: base center plus the (possibly lagging) offset.
    pub fn center(&self) -> Vec2 {
        self.center + self.center_offset
    }

    pub fn center_offset(&self) -> Vec2 {
        self.center_offset
    }

    /// Follow the spiral's drift offset, but only within a fraction of the
    /// kill radius: beyond that the zone walks its offset back one pixel
    /// per frame, anchoring the ring while the spiral wanders.
    pub fn set_center_offset(&mut self, offset: Vec2) {
        let limit = OFFSET_FOLLOW_FACTOR * self.kill_radius;
        if offset.x.abs() > limit {
            self.center_offset.x += if offset.x > 0.0 { -1.0 } else { 1.0 };
        } else {
            self.center_offset.x = offset.x;
        }
        if offset.y.abs() > limit {
            self.center_offset.y += if offset.y > 0.0 { -1.0 } else { 1.0 };
        } else {
            self.center_offset.y = offset.y;
        }
    }

    pub fn distance_from_center(&self, point: Vec2) -> f32 {
        (point - self.center()).length()
    }

    pub fn kill_radius(&self) -> f32 {
        self.kill_radius
    }

    pub fn kill_area(&self) -> f32 {
        std::f32::consts::PI * self.kill_radius * self.kill_radius
    }

    pub fn current_radius(&self) -> f32 {
        self.current_radius
    }

    /// Rendered radius at the moment the kill triggered.
    pub fn radius_when_kill(&self) -> f32 {
        self.radius_when_kill
    }

    pub fn current_value(&self) -> f32 {
        self.current_value
    }

    pub fn is_kill(&self) -> bool {
        self.is_kill
    }

    /// Trigger the kill externally, without crossing the value threshold.
    /// Idempotent.
    pub fn force_kill(&mut self) {
        if self.is_kill {
            return;
        }
        self.is_kill = true;
        self.radius_when_kill = self.current_radius;
    }

    /// Render the zone: an opaque black disc (the hole) under a colored
    /// ring whose alpha scales with the radius. `line_width_for` maps the
    /// ring radius to a stroke width, normally the spiral's particle size
    /// curve. Skipped entirely while the ring is thinner than its stroke.
    pub fn draw(&mut self, surface: &mut dyn DrawSurface, line_width_for: &dyn Fn(f32) -> f32) {
        if self.current_radius < 0.0 {
            return;
        }
        if self.grow_radius > self.current_radius && !self.is_kill {
            let delta = self.grow_radius - self.current_radius;
            self.current_radius += (delta / 10.0).min(0.5);
        } else {
            self.current_radius = self.grow_radius;
        }

        let line_width = line_width_for(self.current_radius).max(2.0);
        if self.current_radius <= line_width {
            return;
        }
        let center = self.center();
        let alpha = interp::linear(
            self.current_radius,
            Range::new(0.0, self.kill_radius),
            RING_ALPHA,
        );
        surface.fill_circle(center, self.current_radius + line_width / 2.0, Rgba::BLACK);
        surface.stroke_circle(
            center,
            self.current_radius,
            line_width,
            Rgba::new(self.ring_color, alpha),
        );
    }

    /// Force the rendered and target radii, bypassing the eased catch-up.
    #[cfg(test)]
    fn set_radius(&mut self, radius: f32) {
        self.current_radius = radius;
        self.grow_radius = radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;
    use crate::surface::recording::{DrawCall, RecordingSurface};
    use crate::surface::Rect;

    fn test_zone(max_kill_radius: f32, kill_value: f32) -> KillZone {
        // factor = 0.75 + 0.5 * 0.2 = 0.85
        let mut rng = SequenceRandom::constant(0.5);
        KillZone::new(
            KillZoneConfig {
                ring_color: [185, 28, 28],
                max_kill_radius,
                center: Vec2::new(400.0, 300.0),
                kill_value,
            },
            &mut rng,
        )
    }

    #[test]
    fn test_kill_radius_from_factor() {
        let zone = test_zone(100.0, 10_000.0);
        assert!((zone.kill_radius() - 85.0).abs() < 1e-4);
    }

    #[test]
    fn test_kill_radius_floor() {
        let zone = test_zone(0.0, 10_000.0);
        assert_eq!(zone.kill_radius(), 1.0);
    }

    #[test]
    fn test_equal_area_growth() {
        let mut zone = test_zone(100.0, 10_000.0);
        zone.add_value(2_500.0);
        // quarter of the value => half the radius.
        let expected = zone.kill_radius() * 0.5;
        for _ in 0..1000 {
            zone.draw(&mut RecordingSurface::new(Rect::new(800.0, 600.0)), &|_| 2.0);
        }
        assert!((zone.current_radius() - expected).abs() < 0.01);
    }

    #[test]
    fn test_kill_is_edge_triggered_and_strict() {
        let mut zone = test_zone(100.0, 10_000.0);
        assert!(!zone.add_value(10_000.0), "exactly at threshold is no kill");
        assert!(!zone.is_kill());
        assert!(zone.add_value(0.01), "crossing fires once");
        assert!(zone.is_kill());
        assert!(!zone.add_value(1_000.0), "further deposits ignored");
        assert!((zone.current_value() - 10_000.01).abs() < 1e-2);
    }

    #[test]
    fn test_radius_when_kill_snapshots_rendered_radius() {
        let mut zone = test_zone(100.0, 10_000.0);
        zone.add_value(5_000.0);
        for _ in 0..40 {
            zone.draw(&mut RecordingSurface::new(Rect::new(800.0, 600.0)), &|_| 2.0);
        }
        let rendered = zone.current_radius();
        zone.add_value(10_000.0);
        assert_eq!(zone.radius_when_kill(), rendered);
    }

    #[test]
    fn test_growth_eases_toward_target() {
        let mut zone = test_zone(100.0, 10_000.0);
        zone.add_value(10_000.0);
        let mut surface = RecordingSurface::new(Rect::new(800.0, 600.0));
        zone.draw(&mut surface, &|_| 2.0);
        // far from target: capped at 0.5 per frame.
        assert!((zone.current_radius() - 0.5).abs() < 1e-5);
        zone.draw(&mut surface, &|_| 2.0);
        assert!((zone.current_radius() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_draw_skipped_while_tiny() {
        let mut zone = test_zone(100.0, 10_000.0);
        zone.add_value(10.0);
        let mut surface = RecordingSurface::new(Rect::new(800.0, 600.0));
        zone.draw(&mut surface, &|_| 4.0);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_draw_disc_then_ring() {
        let mut zone = test_zone(100.0, 10_000.0);
        zone.set_radius(50.0);
        let mut surface = RecordingSurface::new(Rect::new(800.0, 600.0));
        zone.draw(&mut surface, &|_| 4.0);
        assert_eq!(surface.calls.len(), 2);
        match &surface.calls[0] {
            DrawCall::FillCircle { radius, color, .. } => {
                assert_eq!(*radius, 52.0);
                assert_eq!(*color, Rgba::BLACK);
            }
            other => panic!("expected disc, got {other:?}"),
        }
        match &surface.calls[1] {
            DrawCall::StrokeCircle { radius, width, color, .. } => {
                assert_eq!(*radius, 50.0);
                assert_eq!(*width, 4.0);
                let expected =
                    interp::linear(50.0, Range::new(0.0, zone.kill_radius()), RING_ALPHA);
                assert!((color.alpha - expected).abs() < 1e-5);
            }
            other => panic!("expected ring, got {other:?}"),
        }
    }

    #[test]
    fn test_center_offset_follows_within_limit() {
        let mut zone = test_zone(100.0, 10_000.0);
        let offset = Vec2::new(5.0, -3.0);
        zone.set_center_offset(offset);
        assert_eq!(zone.center_offset(), offset);
        assert_eq!(zone.center(), Vec2::new(405.0, 297.0));
    }

    #[test]
    fn test_center_offset_walks_back_beyond_limit() {
        let mut zone = test_zone(100.0, 10_000.0);
        // limit = 0.2 * 85 = 17
        zone.set_center_offset(Vec2::new(30.0, -30.0));
        assert_eq!(zone.center_offset(), Vec2::new(-1.0, 1.0));
        zone.set_center_offset(Vec2::new(30.0, -30.0));
        assert_eq!(zone.center_offset(), Vec2::new(-2.0, 2.0));
    }

    #[test]
    fn test_force_kill_is_idempotent() {
        let mut zone = test_zone(100.0, 10_000.0);
        zone.add_value(5_000.0);
        for _ in 0..20 {
            zone.draw(&mut RecordingSurface::new(Rect::new(800.0, 600.0)), &|_| 2.0);
        }
        let rendered = zone.current_radius();
        zone.force_kill();
        assert!(zone.is_kill());
        assert_eq!(zone.radius_when_kill(), rendered);
        zone.force_kill();
        assert_eq!(zone.radius_when_kill(), rendered);
        assert!(!zone.add_value(100.0));
    }

    #[test]
    fn test_current_radius_never_exceeds_kill_radius() {
        let mut zone = test_zone(100.0, 10_000.0);
        let mut surface = RecordingSurface::new(Rect::new(800.0, 600.0));
        for step in 0..200 {
            if step % 10 == 0 {
                zone.add_value(1_000.0);
            }
            zone.draw(&mut surface, &|_| 2.0);
            assert!(zone.current_radius() <= zone.kill_radius() + 1e-4);
        }
        assert!(zone.is_kill());
    }

    #[test]
    fn test_resize_rescales_killed_zone_to_full_ring() {
        let mut zone = test_zone(100.0, 10_000.0);
        zone.add_value(10_001.0);
        zone.update_max_kill_radius(200.0);
        assert!((zone.kill_radius() - 170.0).abs() < 1e-3);
        assert_eq!(zone.current_radius(), zone.kill_radius());
    }
}
