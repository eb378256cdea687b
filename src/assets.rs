//! Sprite image manifests and CPU-side loading.
//!
//! Every slot of a manifest always yields an image: files that are missing or
//! fail to decode become a 1x1 white texel, which draws the quad in its plain
//! vertex colour.

use std::path::Path;

use crate::error::TextureError;

/// Keyboard-variant texture slots. Indexed by `Clip::frames`.
pub const KEYBOARD_MANIFEST: [&str; 12] = [
    "right_walk_1.png",
    "right_walk_2.png",
    "right_walk_3.png",
    "attack_1.png",
    "attack_2.png",
    "attack_3.png",
    "skill_1.png",
    "skill_2.png",
    "left_walk_1.png",
    "left_walk_2.png",
    "left_walk_3.png",
    "right_walk_1.png",
];

/// Auto-variant base layer.
pub const AUTO_SPRITE_MANIFEST: [&str; 3] = [
    "right_walk_1.png",
    "right_walk_2.png",
    "right_walk_3.png",
];

/// Auto-variant effect layer, added over the base.
pub const AUTO_EFFECT_MANIFEST: [&str; 4] = [
    "glow_1.png",
    "glow_2.png",
    "glow_3.png",
    "glow_4.png",
];

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl SpriteImage {
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255, 255, 255, 255],
        }
    }

    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image::load_from_memory(&bytes)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }
}

/// Immutable, ordered set of images for one manifest.
pub struct TextureSet {
    images: Vec<SpriteImage>,
    missing: usize,
}

impl TextureSet {
    /// Load every file of `manifest` from `dir`, substituting white for failures.
    pub fn load(dir: &Path, manifest: &[&str]) -> Self {
        let mut missing = 0;
        let images = manifest
            .iter()
            .map(|name| match SpriteImage::load(&dir.join(name)) {
                Ok(img) => img,
                Err(e) => {
                    log::warn!("texture skipped: {e}");
                    missing += 1;
                    SpriteImage::white()
                }
            })
            .collect();
        Self { images, missing }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Number of slots that fell back to white.
    pub fn missing(&self) -> usize {
        self.missing
    }

    pub fn images(&self) -> &[SpriteImage] {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, rgba: [u8; 4]) {
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba(rgba));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn loads_png_as_rgba8() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "a.png", [10, 20, 30, 40]);

        let img = SpriteImage::load(&tmp.path().join("a.png")).unwrap();
        assert_eq!((img.width, img.height), (2, 3));
        assert_eq!(img.pixels.len(), 2 * 3 * 4);
        assert_eq!(&img.pixels[..4], &[10, 20, 30, 40]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = SpriteImage::load(&tmp.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("bad.png"), b"not a png").unwrap();
        let err = SpriteImage::load(&tmp.path().join("bad.png")).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }

    #[test]
    fn set_keeps_manifest_order_and_fills_gaps() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "one.png", [1, 1, 1, 255]);
        write_png(tmp.path(), "three.png", [3, 3, 3, 255]);

        let set = TextureSet::load(tmp.path(), &["one.png", "two.png", "three.png"]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.missing(), 1);
        assert_eq!(set.images()[0].pixels[0], 1);
        assert_eq!(set.images()[1], SpriteImage::white());
        assert_eq!(set.images()[2].pixels[0], 3);
    }

    #[test]
    fn empty_dir_loads_all_white() {
        let tmp = TempDir::new().unwrap();
        let set = TextureSet::load(tmp.path(), &KEYBOARD_MANIFEST);
        assert_eq!(set.len(), KEYBOARD_MANIFEST.len());
        assert_eq!(set.missing(), KEYBOARD_MANIFEST.len());
        assert!(set.images().iter().all(|img| *img == SpriteImage::white()));
    }
}
