//! Texture decoding (PNG, JPEG) into tightly packed RGBA8.

use std::path::Path;

use super::AssetError;

/// Decoded RGBA8 image, row-major from the top-left.
#[derive(Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Read and decode an image file. The format is sniffed from the content.
pub fn load_texture(path: &Path) -> Result<Texture, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_texture(&bytes)
}

/// Decode an in-memory PNG or JPEG.
pub fn decode_texture(bytes: &[u8]) -> Result<Texture, AssetError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    Ok(Texture {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(image: &image::DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_png_is_lossless() {
        let mut img = RgbaImage::new(4, 2);
        img.put_pixel(3, 1, Rgba([10, 20, 30, 40]));
        let bytes = encode(&image::DynamicImage::ImageRgba8(img), ImageFormat::Png);

        let texture = decode_texture(&bytes).unwrap();
        assert_eq!((texture.width, texture.height), (4, 2));
        let last = &texture.pixels[(7 * 4)..(8 * 4)];
        assert_eq!(last, &[10, 20, 30, 40]);
    }

    #[test]
    fn test_jpeg_decodes_to_opaque_rgba() {
        let img = RgbImage::from_pixel(8, 8, Rgb([200, 100, 50]));
        let bytes = encode(&image::DynamicImage::ImageRgb8(img), ImageFormat::Jpeg);

        let texture = decode_texture(&bytes).unwrap();
        assert_eq!(texture.pixels.len(), 8 * 8 * 4);
        assert_eq!(texture.pixels[3], 255);
        // Lossy, but close
        assert!((texture.pixels[0] as i32 - 200).abs() < 8);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            decode_texture(b"not an image"),
            Err(AssetError::Decode(_))
        ));
    }
}
