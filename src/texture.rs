use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Pixel};
use log::{debug, error};
use thiserror::Error;

/// Channel layout of the decoded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    R8,
    /// Stored expanded to four channels since wgpu has no RGB8 format.
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    /// Bytes per texel in the uploaded mip data.
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::R8 => 1,
            PixelFormat::Rgb8 | PixelFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode texture {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decoded pixels plus a full mip chain ready for `queue.write_texture`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub mips: Vec<Vec<u8>>,
}

impl TextureImage {
    pub fn decode(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let texture = Self::from_dynamic(image);
        debug!(
            "decoded {} ({}x{}, {:?}, {} mips)",
            path.display(),
            texture.width,
            texture.height,
            texture.format,
            texture.mip_level_count()
        );
        Ok(texture)
    }

    /// Decodes `path`, falling back to [`TextureImage::placeholder`] so the
    /// caller always has something to bind.
    pub fn load_or_placeholder(path: &Path) -> Self {
        match Self::decode(path) {
            Ok(texture) => texture,
            Err(err) => {
                error!("{}", load_failure_line(path));
                debug!("{err:?}");
                Self::placeholder()
            }
        }
    }

    /// Opaque white 1x1 texel.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            format: PixelFormat::Rgba8,
            mips: vec![vec![255; 4]],
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (format, mips) = match image.color().channel_count() {
            1 => (PixelFormat::R8, mip_chain(image.into_luma8())),
            3 => (PixelFormat::Rgb8, mip_chain(image.into_rgba8())),
            _ => (PixelFormat::Rgba8, mip_chain(image.into_rgba8())),
        };
        Self {
            width,
            height,
            format,
            mips,
        }
    }

    pub fn mip_level_count(&self) -> u32 {
        self.mips.len() as u32
    }

    /// Size of mip `level`, never smaller than 1x1.
    pub fn level_size(&self, level: u32) -> (u32, u32) {
        ((self.width >> level).max(1), (self.height >> level).max(1))
    }
}

pub fn mip_level_count(width: u32, height: u32) -> u32 {
    let mut levels = 1u32;
    let mut w = width.max(1);
    let mut h = height.max(1);

    while w > 1 || h > 1 {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        levels += 1;
    }

    levels
}

fn mip_chain<P>(base: ImageBuffer<P, Vec<u8>>) -> Vec<Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let levels = mip_level_count(base.width(), base.height());
    let mut mips = Vec::with_capacity(levels as usize);
    let mut width = base.width().max(1);
    let mut height = base.height().max(1);
    let mut level_image = base;

    for level in 0..levels {
        if level + 1 < levels {
            width = (width / 2).max(1);
            height = (height / 2).max(1);
            let next = imageops::resize(&level_image, width, height, FilterType::Triangle);
            mips.push(std::mem::replace(&mut level_image, next).into_raw());
        } else {
            mips.push(std::mem::take(&mut level_image).into_raw());
        }
    }

    mips
}

fn load_failure_line(path: &Path) -> String {
    format!("Texture failed to load at path: {}", path.display())
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn rgb_png_expands_to_four_channels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("salt.png");
        RgbImage::from_pixel(4, 2, Rgb([10, 20, 30])).save(&path).unwrap();

        let texture = TextureImage::decode(&path).unwrap();
        assert_eq!(texture.format, PixelFormat::Rgb8);
        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(texture.mip_level_count(), 3);
        assert_eq!(texture.mips[0].len(), 4 * 2 * 4);
        assert_eq!(&texture.mips[0][..4], &[10, 20, 30, 255]);
        assert_eq!(texture.mips[2].len(), 4);
    }

    #[test]
    fn grayscale_png_stays_single_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vinyl.png");
        GrayImage::from_pixel(3, 3, Luma([128])).save(&path).unwrap();

        let texture = TextureImage::decode(&path).unwrap();
        assert_eq!(texture.format, PixelFormat::R8);
        assert_eq!(texture.format.bytes_per_pixel(), 1);
        assert_eq!(texture.mips.len(), 2);
        assert_eq!(texture.mips[0], vec![128; 9]);
        assert_eq!(texture.level_size(1), (1, 1));
    }

    #[test]
    fn rgba_png_keeps_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lid.png");
        RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4])).save(&path).unwrap();

        let texture = TextureImage::decode(&path).unwrap();
        assert_eq!(texture.format, PixelFormat::Rgba8);
        assert_eq!(texture.mips, vec![vec![1, 2, 3, 4]]);
    }

    #[test]
    fn missing_file_falls_back_to_placeholder() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.png");
        assert!(matches!(
            TextureImage::decode(&path),
            Err(TextureError::Decode { .. })
        ));
        assert_eq!(
            TextureImage::load_or_placeholder(&path),
            TextureImage::placeholder()
        );
    }

    #[test]
    fn failure_line_names_the_path() {
        assert_eq!(
            load_failure_line(Path::new("assets/flour.jpg")),
            "Texture failed to load at path: assets/flour.jpg"
        );
    }

    #[test]
    fn mip_counts_reach_one_texel() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(800, 3), 10);
    }
}
