//! Ring layout engine.
//!
//! Pure functions mapping (slot index, slot count, spacing) to canvas
//! positions. Slots sit evenly on a circle around the canvas center; the
//! radius grows with the count so adjacent slots never overlap.

use std::f32::consts::PI;

use crate::model::{MIN_RING_RADIUS, Point, SLOT_RADIUS, canvas_center};

/// Ring radius for `total` slots with the given radial `spacing`.
///
/// For `total` points evenly spaced on a circle of radius R, adjacent points
/// are `2R·sin(π/total)` apart. Solving for tangency of two slot circles
/// (center distance `2·SLOT_RADIUS`) gives the base radius, floored at
/// [`MIN_RING_RADIUS`] so sparse rings stay readable. `spacing` is a pure
/// radial offset: zero spacing means adjacent slots touch (once the floor is
/// inactive), larger values separate them without changing angles.
pub fn ring_radius(total: usize, spacing: f32) -> f32 {
    let min_distance = 2.0 * SLOT_RADIUS;
    let base = (min_distance / (2.0 * (PI / total as f32).sin())).max(MIN_RING_RADIUS);
    base + spacing
}

/// Canvas position of slot `index` out of `total` slots.
///
/// Index 0 sits due east of the center; angles increase by `2π/total` with
/// no phase offset. Deterministic, no hidden state.
pub fn slot_position(index: usize, total: usize, spacing: f32) -> Point {
    let center = canvas_center();
    let radius = ring_radius(total, spacing);
    let angle = 2.0 * PI * index as f32 / total as f32;
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}
