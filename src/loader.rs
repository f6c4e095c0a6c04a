//! Image loading with explicit single-shot tickets.
//!
//! Decoding is the system's only suspension point: a slot (or the logo)
//! stays imageless until its bytes finish decoding. Each request gets a
//! ticket; whichever ticket finishes last wins, regardless of request order.
//! A ticket whose slot no longer exists (the count changed in between) is
//! dropped silently.

use crate::error::Result;
use crate::model::Bitmap;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    Slot(usize),
    Logo,
}

/// Handle for one in-flight load. Consumed by [`ImageLoader::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub target: LoadTarget,
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct ImageLoader {
    next_seq: u64,
}

impl ImageLoader {
    /// Register a load request for a target. The returned ticket is handed
    /// back with the bytes once they are available.
    pub fn begin(&mut self, target: LoadTarget) -> LoadTicket {
        self.next_seq += 1;
        LoadTicket {
            target,
            seq: self.next_seq,
        }
    }

    /// Resolve a ticket: decode and write the bitmap into the scene.
    ///
    /// Last-to-finish wins: the result always lands, even if a later-issued
    /// ticket already resolved. The only exception is a slot index that no
    /// longer exists, which is ignored. Decode failures surface as
    /// `Resource` errors and leave the scene untouched.
    pub fn finish(&self, scene: &mut Scene, ticket: LoadTicket, bytes: &[u8]) -> Result<()> {
        let bitmap = Bitmap::decode(bytes)?;
        self.apply(scene, ticket, bitmap);
        Ok(())
    }

    /// Resolve a ticket with an already-decoded bitmap (crop tool output).
    pub fn apply(&self, scene: &mut Scene, ticket: LoadTicket, bitmap: Bitmap) {
        match ticket.target {
            LoadTarget::Slot(index) => {
                // Stale index after a count change: drop.
                let _ = scene.set_slot_image(index, bitmap);
            }
            LoadTarget::Logo => scene.set_logo_image(Some(bitmap)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png(gray: u8) -> Vec<u8> {
        Bitmap {
            width: 1,
            height: 1,
            rgba: vec![gray, gray, gray, 255],
        }
        .encode_png()
        .unwrap()
    }

    #[test]
    fn finish_populates_slot() {
        let mut scene = Scene::default();
        let mut loader = ImageLoader::default();
        let ticket = loader.begin(LoadTarget::Slot(1));
        loader.finish(&mut scene, ticket, &tiny_png(10)).unwrap();
        assert!(scene.slots()[1].image.is_some());
    }

    #[test]
    fn last_to_finish_wins() {
        let mut scene = Scene::default();
        let mut loader = ImageLoader::default();
        let first = loader.begin(LoadTarget::Slot(0));
        let second = loader.begin(LoadTarget::Slot(0));
        // The later request resolves first; the earlier one still overwrites
        // it when it lands afterwards.
        loader.finish(&mut scene, second, &tiny_png(20)).unwrap();
        loader.finish(&mut scene, first, &tiny_png(10)).unwrap();
        let img = scene.slots()[0].image.as_ref().unwrap();
        assert_eq!(img.rgba[0], 10);
    }

    #[test]
    fn stale_slot_ticket_is_dropped() {
        let mut scene = Scene::default();
        scene.set_slot_count(10).unwrap();
        let mut loader = ImageLoader::default();
        let ticket = loader.begin(LoadTarget::Slot(9));
        scene.set_slot_count(3).unwrap();
        loader.finish(&mut scene, ticket, &tiny_png(10)).unwrap();
        assert!(scene.slots().iter().all(|s| s.image.is_none()));
    }

    #[test]
    fn decode_failure_leaves_scene_untouched() {
        let mut scene = Scene::default();
        let mut loader = ImageLoader::default();
        let ticket = loader.begin(LoadTarget::Slot(0));
        assert!(loader.finish(&mut scene, ticket, b"junk").is_err());
        assert!(scene.slots()[0].image.is_none());
    }

    #[test]
    fn logo_ticket_sets_logo() {
        let mut scene = Scene::default();
        let mut loader = ImageLoader::default();
        let ticket = loader.begin(LoadTarget::Logo);
        loader.finish(&mut scene, ticket, &tiny_png(30)).unwrap();
        assert!(scene.logo.image.is_some());
    }
}
