//! The scene model: the single owner of all persistent editable state.
//!
//! Every mutation is a direct, synchronous method; none can leave the model
//! violating an invariant. Dangling references (connections to dropped slots
//! or deleted types) are allowed by design and resolved away at render time.

use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result};
use crate::layout;
use crate::model::{
    Bitmap, Connection, LegendConfig, LogoOverlay, Point, RingStyle, SLOT_COUNT_RANGE,
    SPACING_RANGE, Slot,
};
use crate::registry::TypeRegistry;

pub const DEFAULT_SLOT_COUNT: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    slots: Vec<Slot>,
    connections: Vec<Connection>,
    pub registry: TypeRegistry,
    pub legend: LegendConfig,
    pub logo: LogoOverlay,
    pub style: RingStyle,
}

impl Default for Scene {
    fn default() -> Self {
        let mut scene = Self {
            slots: Vec::new(),
            connections: Vec::new(),
            registry: TypeRegistry::default(),
            legend: LegendConfig::default(),
            logo: LogoOverlay::default(),
            style: RingStyle::default(),
        };
        // Cannot fail: the default count is in range.
        let _ = scene.set_slot_count(DEFAULT_SLOT_COUNT);
        scene
    }
}

impl Scene {
    // ── slots ──────────────────────────────────────────────────────────

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Replace the slot batch with `n` fresh slots.
    ///
    /// All slot images are discarded, even when growing (matching the
    /// original tool). Connections referencing indices past the new count
    /// are left dangling and simply skipped by the renderer.
    pub fn set_slot_count(&mut self, n: usize) -> Result<()> {
        if !SLOT_COUNT_RANGE.contains(&n) {
            return Err(EditError::Invariant(format!(
                "slot count {n} outside {}..={}",
                SLOT_COUNT_RANGE.start(),
                SLOT_COUNT_RANGE.end()
            )));
        }
        self.slots = (0..n).map(|index| Slot { index, image: None }).collect();
        Ok(())
    }

    pub fn set_slot_image(&mut self, index: usize, image: Bitmap) -> Result<()> {
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            EditError::Invariant(format!("no slot with index {index}"))
        })?;
        slot.image = Some(image);
        Ok(())
    }

    pub fn clear_slot_image(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.image = None;
        }
    }

    /// Canvas position of a slot under the current count and spacing.
    pub fn slot_position(&self, index: usize) -> Point {
        layout::slot_position(index, self.slots.len(), self.style.spacing)
    }

    pub fn set_spacing(&mut self, spacing: f32) {
        self.style.spacing = spacing.clamp(*SPACING_RANGE.start(), *SPACING_RANGE.end());
    }

    // ── connections ────────────────────────────────────────────────────

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Append a connection and return its fresh id (`max(existing) + 1`,
    /// or 1 for the first one). Duplicate and self edges are legal.
    pub fn add_connection(&mut self, from: usize, to: usize, type_id: u32) -> u32 {
        let id = self
            .connections
            .iter()
            .map(|c| c.id)
            .max()
            .unwrap_or(0)
            + 1;
        self.connections.push(Connection {
            id,
            from,
            to,
            type_id,
        });
        id
    }

    pub fn remove_connection(&mut self, id: u32) {
        self.connections.retain(|c| c.id != id);
    }

    /// Change the type of an existing connection.
    pub fn update_connection(&mut self, id: u32, type_id: u32) -> Result<()> {
        let conn = self
            .connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EditError::Invariant(format!("no connection with id {id}")))?;
        conn.type_id = type_id;
        Ok(())
    }

    pub fn connection(&self, id: u32) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// A connection is renderable when both endpoints are live slots and its
    /// type still exists. Everything else is silently skipped, never an
    /// error.
    pub fn is_renderable(&self, conn: &Connection) -> bool {
        conn.from < self.slots.len()
            && conn.to < self.slots.len()
            && self.registry.get(conn.type_id).is_some()
    }

    // ── logo ───────────────────────────────────────────────────────────

    pub fn set_logo_image(&mut self, image: Option<Bitmap>) {
        self.logo.image = image;
    }

    pub fn set_logo_position(&mut self, position: Point) {
        self.logo.position = position;
    }

    pub fn set_logo_scale(&mut self, scale: f32) {
        self.logo.scale = scale.clamp(0.1, 3.0);
    }

    pub fn set_logo_opacity(&mut self, opacity: f32) {
        self.logo.opacity = opacity.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_has_six_slots() {
        let scene = Scene::default();
        assert_eq!(scene.slot_count(), 6);
        assert_eq!(scene.registry.len(), 4);
        assert!(scene.connections().is_empty());
    }

    #[test]
    fn set_slot_count_validates_range() {
        let mut scene = Scene::default();
        assert!(scene.set_slot_count(2).is_err());
        assert!(scene.set_slot_count(21).is_err());
        assert_eq!(scene.slot_count(), 6);
        scene.set_slot_count(20).unwrap();
        assert_eq!(scene.slot_count(), 20);
    }

    #[test]
    fn slot_count_change_discards_images() {
        let mut scene = Scene::default();
        let bmp = Bitmap {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        };
        scene.set_slot_image(2, bmp).unwrap();
        assert!(scene.slots()[2].image.is_some());
        // Growing the ring still rebuilds the batch imageless.
        scene.set_slot_count(8).unwrap();
        assert!(scene.slots().iter().all(|s| s.image.is_none()));
    }

    #[test]
    fn set_slot_image_rejects_unknown_index() {
        let mut scene = Scene::default();
        let bmp = Bitmap::default();
        assert!(scene.set_slot_image(6, bmp).is_err());
    }

    #[test]
    fn connection_ids_are_monotonic() {
        let mut scene = Scene::default();
        assert_eq!(scene.add_connection(0, 1, 1), 1);
        assert_eq!(scene.add_connection(0, 3, 2), 2);
        scene.remove_connection(2);
        assert_eq!(scene.add_connection(1, 2, 1), 2);
    }

    #[test]
    fn duplicate_and_self_edges_are_legal() {
        let mut scene = Scene::default();
        scene.add_connection(0, 1, 1);
        scene.add_connection(0, 1, 1);
        scene.add_connection(3, 3, 2);
        assert_eq!(scene.connections().len(), 3);
    }

    #[test]
    fn update_connection_retypes() {
        let mut scene = Scene::default();
        let id = scene.add_connection(0, 1, 1);
        scene.update_connection(id, 3).unwrap();
        assert_eq!(scene.connection(id).unwrap().type_id, 3);
        assert!(scene.update_connection(99, 1).is_err());
    }

    #[test]
    fn dangling_connections_are_not_renderable() {
        let mut scene = Scene::default();
        let ok = scene.add_connection(0, 5, 1);
        let dropped_slot = scene.add_connection(0, 7, 1);
        let dropped_type = scene.add_connection(0, 1, 4);
        scene.set_slot_count(6).unwrap(); // 7 is now out of range (it already was)
        scene.registry.remove(4).unwrap();

        let get = |id| scene.connection(id).copied().unwrap();
        assert!(scene.is_renderable(&get(ok)));
        assert!(!scene.is_renderable(&get(dropped_slot)));
        assert!(!scene.is_renderable(&get(dropped_type)));
        // Still present in the data: removal never cascades.
        assert_eq!(scene.connections().len(), 3);
    }

    #[test]
    fn type_removal_does_not_cascade_to_edges() {
        let mut scene = Scene::default();
        scene.add_connection(0, 1, 2);
        scene.registry.remove(2).unwrap();
        assert_eq!(scene.connections().len(), 1);
        assert_eq!(scene.connections()[0].type_id, 2);
    }

    #[test]
    fn spacing_and_logo_setters_clamp() {
        let mut scene = Scene::default();
        scene.set_spacing(999.0);
        assert_eq!(scene.style.spacing, 200.0);
        scene.set_logo_scale(5.0);
        assert_eq!(scene.logo.scale, 3.0);
        scene.set_logo_opacity(-1.0);
        assert_eq!(scene.logo.opacity, 0.0);
    }

    #[test]
    fn scene_json_roundtrip_without_bitmaps() {
        let mut scene = Scene::default();
        scene.add_connection(0, 3, 2);
        scene.style.spacing = 42.0;
        let json = serde_json::to_string(&scene).unwrap();
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(back.slot_count(), 6);
        assert_eq!(back.connections(), scene.connections());
        assert_eq!(back.style, scene.style);
    }
}
