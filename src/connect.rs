//! Connection-authoring state machine.
//!
//! Lifecycle: `Idle` (slot clicks assign images) → `Armed` (authoring mode,
//! no anchor) → `Anchored` (first slot chosen, pointer tracked for the
//! dashed preview) → back to `Armed` on commit or cancel. Committing writes
//! the finished edge into the scene; this module owns nothing persistent.

use crate::model::Point;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectState {
    /// Not authoring; slot clicks route to image assignment.
    Idle,
    /// Authoring mode on, waiting for the anchor slot.
    Armed,
    /// Anchor chosen, waiting for the far end.
    Anchored(usize),
}

/// What a slot click meant, so the caller can react (open the image picker,
/// refresh the preview, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Idle mode: the click selects this slot for image assignment.
    AssignImage(usize),
    /// The clicked slot became the anchor.
    AnchorSet(usize),
    /// Clicking the anchor again cancelled it; no edge was created.
    AnchorCancelled,
    /// An edge was committed with this id.
    Committed(u32),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Connector {
    state: ConnectState,
    /// Canvas-space pointer position while anchored; drives the dashed
    /// preview edge.
    pointer: Option<Point>,
}

impl Default for ConnectState {
    fn default() -> Self {
        Self::Idle
    }
}

impl Connector {
    pub fn state(&self) -> ConnectState {
        self.state
    }

    pub fn is_authoring(&self) -> bool {
        self.state != ConnectState::Idle
    }

    pub fn anchor(&self) -> Option<usize> {
        match self.state {
            ConnectState::Anchored(s) => Some(s),
            _ => None,
        }
    }

    /// Preview pointer position, present only while anchored.
    pub fn preview_pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Toggle authoring mode. Turning it off discards any pending anchor
    /// without creating an edge.
    pub fn set_authoring(&mut self, on: bool) {
        self.state = if on {
            match self.state {
                ConnectState::Idle => ConnectState::Armed,
                s => s,
            }
        } else {
            ConnectState::Idle
        };
        if !on {
            self.pointer = None;
        }
    }

    /// Handle a click on slot `slot`. In authoring mode this advances the
    /// state machine and may commit an edge (typed with the registry's
    /// current selection) into `scene`; when idle it routes to image
    /// assignment instead.
    pub fn click_slot(&mut self, slot: usize, scene: &mut Scene) -> ClickOutcome {
        match self.state {
            ConnectState::Idle => ClickOutcome::AssignImage(slot),
            ConnectState::Armed => {
                self.state = ConnectState::Anchored(slot);
                ClickOutcome::AnchorSet(slot)
            }
            ConnectState::Anchored(anchor) if anchor == slot => {
                self.state = ConnectState::Armed;
                self.pointer = None;
                ClickOutcome::AnchorCancelled
            }
            ConnectState::Anchored(anchor) => {
                let id = scene.add_connection(anchor, slot, scene.registry.selected_id());
                self.state = ConnectState::Armed;
                self.pointer = None;
                ClickOutcome::Committed(id)
            }
        }
    }

    /// Track the pointer for the preview edge; only meaningful while
    /// anchored.
    pub fn pointer_moved(&mut self, canvas_pos: Point) {
        if matches!(self.state, ConnectState::Anchored(_)) {
            self.pointer = Some(canvas_pos);
        }
    }

    /// Pointer left the canvas: drop the preview but keep the anchor.
    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }
}
