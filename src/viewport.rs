//! Pan/zoom viewport controller.
//!
//! Owns the canvas-to-screen transform and nothing else: the scene model is
//! never touched from here. Screen position `s` of a canvas point `p` is
//! `s = p * scale + offset`.

use serde::{Deserialize, Serialize};

use crate::model::Point;

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 3.0;
/// Per-wheel-notch zoom factor (~10%).
pub const ZOOM_STEP: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f32,
    pub offset: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::new(0.0, 0.0),
        }
    }
}

impl Viewport {
    /// Canvas-space point under a screen position.
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Screen position of a canvas-space point.
    pub fn to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.offset.x,
            canvas.y * self.scale + self.offset.y,
        )
    }

    /// Wheel zoom towards the pointer. `delta_sign > 0` zooms in by one step,
    /// `delta_sign < 0` zooms out. A step that would leave
    /// [`MIN_SCALE`]..=[`MAX_SCALE`] is rejected outright (no clamping), so
    /// the transform only ever changes to an in-range state. On acceptance
    /// the offset is re-solved so the canvas point under the pointer stays
    /// under the pointer.
    pub fn on_wheel(&mut self, pointer_screen: Point, delta_sign: i32) {
        if delta_sign == 0 {
            return;
        }
        let new_scale = if delta_sign > 0 {
            self.scale * ZOOM_STEP
        } else {
            self.scale / ZOOM_STEP
        };
        if !(MIN_SCALE..=MAX_SCALE).contains(&new_scale) {
            return;
        }
        let anchor = self.to_canvas(pointer_screen);
        self.scale = new_scale;
        self.offset = Point::new(
            pointer_screen.x - anchor.x * new_scale,
            pointer_screen.y - anchor.y * new_scale,
        );
    }

    /// Dragging the canvas replaces the offset unconditionally; no clamping.
    pub fn on_drag_move(&mut self, new_offset: Point) {
        self.offset = new_offset;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_to_cursor_keeps_point_under_pointer() {
        let pointer = Point::new(200.0, 150.0);
        for start in [0.5f32, 0.9, 1.0, 1.7, 2.7] {
            for sign in [1, -1] {
                let mut vp = Viewport {
                    scale: start,
                    offset: Point::new(33.0, -12.0),
                };
                let before = vp.to_canvas(pointer);
                let old = vp;
                vp.on_wheel(pointer, sign);
                if vp == old {
                    continue; // rejected at the range edge
                }
                let after = vp.to_screen(before);
                assert!(
                    after.distance(pointer) < 1e-3,
                    "start={start} sign={sign}: pointer drifted to {after:?}"
                );
            }
        }
    }

    #[test]
    fn wheel_rejects_out_of_range() {
        let mut vp = Viewport {
            scale: 2.9,
            offset: Point::new(5.0, 5.0),
        };
        vp.on_wheel(Point::new(100.0, 100.0), 1);
        assert_eq!(vp.scale, 2.9);
        assert_eq!(vp.offset, Point::new(5.0, 5.0));

        vp.scale = 0.52;
        vp.on_wheel(Point::new(100.0, 100.0), -1);
        assert_eq!(vp.scale, 0.52);
    }

    #[test]
    fn wheel_steps_by_ten_percent() {
        let mut vp = Viewport::default();
        vp.on_wheel(Point::new(0.0, 0.0), 1);
        assert!((vp.scale - 1.1).abs() < 1e-6);
        vp.on_wheel(Point::new(0.0, 0.0), -1);
        assert!((vp.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn drag_replaces_offset() {
        let mut vp = Viewport::default();
        vp.on_drag_move(Point::new(-4000.0, 9999.0));
        assert_eq!(vp.offset, Point::new(-4000.0, 9999.0));
        assert_eq!(vp.scale, 1.0);
    }

    #[test]
    fn reset_restores_identity() {
        let mut vp = Viewport {
            scale: 2.0,
            offset: Point::new(10.0, 20.0),
        };
        vp.reset();
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn transform_roundtrip() {
        let vp = Viewport {
            scale: 1.8,
            offset: Point::new(-30.0, 44.0),
        };
        let p = Point::new(123.0, 456.0);
        let back = vp.to_canvas(vp.to_screen(p));
        assert!(back.distance(p) < 1e-3);
    }
}
