//! Drawing-surface contract.
//!
//! The engine draws through [`DrawSurface`], a minimal immediate-mode 2D
//! interface: filled and stroked circles, thick line segments, and a
//! full-canvas translucent fill (used for motion-trail fade and the
//! kill-stage darkening overlays). Coordinates are logical pixels with the
//! origin at the top-left; device-pixel-ratio scaling is a backend concern.
//!
//! Backends: the `egui` feature provides a painter-backed surface in
//! [`crate::shell`]; [`NullSurface`] drives the engine headless.

use crate::color::ColorTuple;
use glam::Vec2;

/// Logical canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a point lies inside the canvas (edges inclusive).
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }

    /// Half the rectangle diagonal; the natural outer radius of a spiral
    /// centered in this rect.
    #[inline]
    pub fn half_diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt() / 2.0
    }
}

/// A color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub color: ColorTuple,
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(color: ColorTuple, alpha: f32) -> Self {
        Self { color, alpha }
    }

    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new([0, 0, 0], 1.0);

    /// Translucent black, for fades and overlays.
    pub const fn black(alpha: f32) -> Self {
        Self::new([0, 0, 0], alpha)
    }
}

/// Immediate-mode 2D drawing contract required by the engine.
pub trait DrawSurface {
    /// Current logical canvas size.
    fn size(&self) -> Rect;

    /// Filled disc.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroked ring of the given line width.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);

    /// Thick line segment.
    fn line_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Fill the whole canvas. Translucent black here is the motion-trail
    /// fade; backends without a persistent backing store emulate it by
    /// decaying retained content.
    fn fill_screen(&mut self, color: Rgba);
}

/// A surface that swallows every draw call. Headless runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct NullSurface {
    rect: Rect,
}

impl NullSurface {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

impl DrawSurface for NullSurface {
    fn size(&self) -> Rect {
        self.rect
    }

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Rgba) {}

    fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _width: f32, _color: Rgba) {}

    fn line_segment(&mut self, _from: Vec2, _to: Vec2, _width: f32, _color: Rgba) {}

    fn fill_screen(&mut self, _color: Rgba) {}
}

/// Records draw calls for assertions. Test-build only.
#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        FillCircle { center: Vec2, radius: f32, color: Rgba },
        StrokeCircle { center: Vec2, radius: f32, width: f32, color: Rgba },
        LineSegment { from: Vec2, to: Vec2, width: f32, color: Rgba },
        FillScreen { color: Rgba },
    }

    pub struct RecordingSurface {
        rect: Rect,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(rect: Rect) -> Self {
            Self { rect, calls: Vec::new() }
        }
    }

    impl DrawSurface for RecordingSurface {
        fn size(&self) -> Rect {
            self.rect
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
            self.calls.push(DrawCall::FillCircle { center, radius, color });
        }

        fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
            self.calls.push(DrawCall::StrokeCircle { center, radius, width, color });
        }

        fn line_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
            self.calls.push(DrawCall::LineSegment { from, to, width, color });
        }

        fn fill_screen(&mut self, color: Rgba) {
            self.calls.push(DrawCall::FillScreen { color });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(100.0, 50.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(100.0, 50.0)));
        assert!(!rect.contains(Vec2::new(-0.1, 10.0)));
        assert!(!rect.contains(Vec2::new(10.0, 50.1)));
    }

    #[test]
    fn test_half_diagonal() {
        let rect = Rect::new(300.0, 400.0);
        assert!((rect.half_diagonal() - 250.0).abs() < 1e-4);
    }
}
