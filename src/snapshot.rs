use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// Immutable capture of every pixel on a surface at one instant.
///
/// Clones share the same pixel buffer; nothing can write through a snapshot.
#[derive(Clone)]
pub struct Snapshot {
    pixels: Arc<RgbaImage>,
}

impl Snapshot {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Pixel at `(x, y)`, or `None` outside the snapshot
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
            || (self.pixels.dimensions() == other.pixels.dimensions()
                && self.pixels.as_raw() == other.pixels.as_raw())
    }
}

impl Eq for Snapshot {}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
