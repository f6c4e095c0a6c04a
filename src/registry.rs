//! Connection type registry.
//!
//! A mutable catalog of edge styles plus the "currently selected type" used
//! when authoring new connections. At least one type must exist at all
//! times, and the selection must always point at a live type.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::color;
use crate::error::{EditError, Result};
use crate::model::ConnectionType;

pub const MIN_THICKNESS: f32 = 1.0;
pub const MAX_THICKNESS: f32 = 10.0;
/// Thickness assigned to freshly created types.
pub const DEFAULT_THICKNESS: f32 = 2.0;

/// Partial update for [`TypeRegistry::update`]; unset fields keep their
/// current value.
#[derive(Debug, Clone, Default)]
pub struct TypePatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub thickness: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRegistry {
    /// Keyed by id; insertion order is meaningful (legend rows, fallback
    /// selection after a delete).
    types: IndexMap<u32, ConnectionType>,
    selected: u32,
}

impl Default for TypeRegistry {
    /// The four seed types every new scene starts with.
    fn default() -> Self {
        let mut types = IndexMap::new();
        for (id, color, name) in [
            (1u32, "#ff0000", "Adore"),
            (2, "#ffc400", "Like"),
            (3, "#fbff00", "Neutral"),
            (4, "#000000", "Avoid"),
        ] {
            types.insert(
                id,
                ConnectionType {
                    id,
                    color: color.to_string(),
                    thickness: DEFAULT_THICKNESS,
                    name: name.to_string(),
                },
            );
        }
        Self { types, selected: 1 }
    }
}

impl TypeRegistry {
    /// Add a new type with a fresh id, a palette color not yet in use, and
    /// default thickness. `name` defaults to "Link {id}". Returns the id.
    pub fn add(&mut self, name: Option<&str>) -> u32 {
        let id = self.types.keys().max().copied().unwrap_or(0) + 1;
        let existing: Vec<String> = self.types.values().map(|t| t.color.clone()).collect();
        let ty = ConnectionType {
            id,
            color: color::color_for(&existing),
            thickness: DEFAULT_THICKNESS,
            name: name.map_or_else(|| format!("Link {id}"), str::to_string),
        };
        self.types.insert(id, ty);
        id
    }

    /// Apply a partial update. Thickness is clamped to [1, 10].
    pub fn update(&mut self, id: u32, patch: TypePatch) -> Result<()> {
        let ty = self
            .types
            .get_mut(&id)
            .ok_or_else(|| EditError::Invariant(format!("no connection type with id {id}")))?;
        if let Some(name) = patch.name {
            ty.name = name;
        }
        if let Some(color) = patch.color {
            ty.color = color;
        }
        if let Some(th) = patch.thickness {
            ty.thickness = th.clamp(MIN_THICKNESS, MAX_THICKNESS);
        }
        Ok(())
    }

    /// Remove a type. Refused when it is the last one; edges referencing the
    /// removed id are left alone (the renderer skips them). If the removed
    /// type was selected, selection moves to the first remaining type.
    pub fn remove(&mut self, id: u32) -> Result<()> {
        if !self.types.contains_key(&id) {
            return Err(EditError::Invariant(format!(
                "no connection type with id {id}"
            )));
        }
        if self.types.len() == 1 {
            return Err(EditError::Invariant(
                "cannot delete the last connection type".to_string(),
            ));
        }
        self.types.shift_remove(&id);
        if self.selected == id {
            if let Some(first) = self.types.keys().next() {
                self.selected = *first;
            }
        }
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<&ConnectionType> {
        self.types.get(&id)
    }

    /// Types in insertion order (legend row order).
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn selected_id(&self) -> u32 {
        self.selected
    }

    pub fn selected(&self) -> Option<&ConnectionType> {
        self.types.get(&self.selected)
    }

    /// Select a type for new-edge authoring; ignored if the id is unknown.
    pub fn select(&mut self, id: u32) {
        if self.types.contains_key(&id) {
            self.selected = id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_four_types() {
        let reg = TypeRegistry::default();
        assert_eq!(reg.len(), 4);
        assert_eq!(reg.selected_id(), 1);
        assert_eq!(reg.get(4).unwrap().name, "Avoid");
    }

    #[test]
    fn add_assigns_max_plus_one() {
        let mut reg = TypeRegistry::default();
        assert_eq!(reg.add(None), 5);
        assert_eq!(reg.get(5).unwrap().name, "Link 5");
        assert_eq!(reg.get(5).unwrap().thickness, DEFAULT_THICKNESS);
    }

    #[test]
    fn add_after_removals_still_monotonic() {
        let mut reg = TypeRegistry::default();
        reg.remove(4).unwrap();
        // max remaining is 3, so the next id is 4 again
        assert_eq!(reg.add(Some("again")), 4);
    }

    #[test]
    fn add_picks_unused_palette_color() {
        let mut reg = TypeRegistry::default();
        let id = reg.add(None);
        let color = &reg.get(id).unwrap().color;
        assert_eq!(color, crate::color::PRESET_PALETTE[0]);
    }

    #[test]
    fn add_to_empty_registry_yields_id_one() {
        // An empty registry cannot be built through the API (the last type
        // cannot be deleted), but the id rule must still hold for one.
        let mut reg: TypeRegistry = serde_json::from_str(r#"{"types":{},"selected":0}"#).unwrap();
        assert_eq!(reg.add(None), 1);
    }

    #[test]
    fn update_patches_fields() {
        let mut reg = TypeRegistry::default();
        reg.update(
            2,
            TypePatch {
                name: Some("Renamed".to_string()),
                thickness: Some(99.0),
                ..Default::default()
            },
        )
        .unwrap();
        let ty = reg.get(2).unwrap();
        assert_eq!(ty.name, "Renamed");
        assert_eq!(ty.thickness, MAX_THICKNESS); // clamped
        assert_eq!(ty.color, "#ffc400"); // untouched
    }

    #[test]
    fn update_unknown_id_is_refused() {
        let mut reg = TypeRegistry::default();
        assert!(reg.update(77, TypePatch::default()).is_err());
    }

    #[test]
    fn remove_last_type_is_refused() {
        let mut reg = TypeRegistry::default();
        for id in [2, 3, 4] {
            reg.remove(id).unwrap();
        }
        assert_eq!(reg.len(), 1);
        let err = reg.remove(1).unwrap_err();
        assert!(matches!(err, EditError::Invariant(_)));
        assert_eq!(reg.len(), 1);
        assert!(reg.get(1).is_some());
    }

    #[test]
    fn removing_selected_type_reselects_first_remaining() {
        let mut reg = TypeRegistry::default();
        reg.select(3);
        reg.remove(3).unwrap();
        assert_eq!(reg.selected_id(), 1);
        assert!(reg.selected().is_some());
    }

    #[test]
    fn removing_unselected_type_keeps_selection() {
        let mut reg = TypeRegistry::default();
        reg.select(2);
        reg.remove(4).unwrap();
        assert_eq!(reg.selected_id(), 2);
    }

    #[test]
    fn select_unknown_id_is_ignored() {
        let mut reg = TypeRegistry::default();
        reg.select(123);
        assert_eq!(reg.selected_id(), 1);
    }
}
