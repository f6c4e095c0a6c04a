//! Image-crop collaborator: square region in, circular-masked bitmap out.
//!
//! The caller (slot image assignment, table cells) picks a square region of
//! a decoded source image; the result is that square with everything
//! outside the inscribed circle made transparent. Cancelling is simply not
//! calling [`circular_crop`].

use crate::error::{EditError, Result};
use crate::model::Bitmap;

/// Fraction of the shorter source dimension covered by the default region.
pub const DEFAULT_REGION_FRACTION: f32 = 0.8;

/// A square region within a source bitmap, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl CropRegion {
    /// The default selection: a centered square covering 80% of the shorter
    /// dimension.
    pub fn centered_default(width: u32, height: u32) -> Self {
        let size = ((width.min(height) as f32) * DEFAULT_REGION_FRACTION).round() as u32;
        let size = size.max(1);
        Self {
            x: (width.saturating_sub(size)) / 2,
            y: (height.saturating_sub(size)) / 2,
            size,
        }
    }

    fn fits(&self, width: u32, height: u32) -> bool {
        self.size > 0
            && self.x.checked_add(self.size).is_some_and(|r| r <= width)
            && self.y.checked_add(self.size).is_some_and(|b| b <= height)
    }
}

/// Crop `region` out of `source` and apply a circular alpha mask: pixels
/// outside the inscribed circle become fully transparent.
pub fn circular_crop(source: &Bitmap, region: CropRegion) -> Result<Bitmap> {
    if !region.fits(source.width, source.height) {
        return Err(EditError::Invariant(format!(
            "crop region {region:?} outside {}x{} image",
            source.width, source.height
        )));
    }
    let size = region.size as usize;
    let radius = region.size as f32 / 2.0;
    let center = radius - 0.5;
    let src_stride = source.width as usize * 4;

    let mut rgba = vec![0u8; size * size * 4];
    for row in 0..size {
        let src_off = (region.y as usize + row) * src_stride + region.x as usize * 4;
        let dst_off = row * size * 4;
        rgba[dst_off..dst_off + size * 4]
            .copy_from_slice(&source.rgba[src_off..src_off + size * 4]);
        for col in 0..size {
            let dx = col as f32 - center;
            let dy = row as f32 - center;
            if dx * dx + dy * dy > radius * radius {
                rgba[dst_off + col * 4 + 3] = 0;
            }
        }
    }
    Ok(Bitmap {
        width: region.size,
        height: region.size,
        rgba,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> Bitmap {
        Bitmap {
            width,
            height,
            rgba: (0..width * height)
                .flat_map(|_| [200u8, 100, 50, 255])
                .collect(),
        }
    }

    #[test]
    fn default_region_is_centered_eighty_percent() {
        let r = CropRegion::centered_default(100, 60);
        assert_eq!(r.size, 48);
        assert_eq!(r.x, 26);
        assert_eq!(r.y, 6);
    }

    #[test]
    fn crop_masks_corners_keeps_center() {
        let src = solid(50, 50);
        let out = circular_crop(&src, CropRegion { x: 5, y: 5, size: 40 }).unwrap();
        assert_eq!((out.width, out.height), (40, 40));

        let alpha = |x: usize, y: usize| out.rgba[(y * 40 + x) * 4 + 3];
        assert_eq!(alpha(0, 0), 0, "corner must be transparent");
        assert_eq!(alpha(39, 39), 0);
        assert_eq!(alpha(20, 20), 255, "center must stay opaque");
        // Color channels survive the crop.
        assert_eq!(&out.rgba[(20 * 40 + 20) * 4..(20 * 40 + 20) * 4 + 3], &[200, 100, 50]);
    }

    #[test]
    fn crop_rejects_out_of_bounds_region() {
        let src = solid(30, 30);
        assert!(circular_crop(&src, CropRegion { x: 20, y: 0, size: 20 }).is_err());
        assert!(circular_crop(&src, CropRegion { x: 0, y: 0, size: 0 }).is_err());
    }

    #[test]
    fn crop_reads_correct_region() {
        // Two-tone source: left half red, right half blue.
        let mut src = solid(20, 10);
        for y in 0..10usize {
            for x in 10..20usize {
                let off = (y * 20 + x) * 4;
                src.rgba[off..off + 4].copy_from_slice(&[0, 0, 255, 255]);
            }
        }
        let out = circular_crop(&src, CropRegion { x: 10, y: 0, size: 10 }).unwrap();
        let center = (5usize * 10 + 5) * 4;
        assert_eq!(&out.rgba[center..center + 3], &[0, 0, 255]);
    }
}
