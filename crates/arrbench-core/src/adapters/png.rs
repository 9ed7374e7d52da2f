//! Lossless PNG raster via the `image` crate.
//!
//! The array's raw bytes become an 8-bit grayscale image. Row 0 is a layout
//! header; every following pixel row holds one array row:
//!
//! ```text
//! row 0:    [dtype code: u8][rows: u32 LE][cols: u32 LE][zero padding]
//! row 1..:  [cols * width little-endian element bytes][zero padding]
//! ```
//!
//! The image is at least [`LAYOUT_LEN`] pixels wide so the header always fits.
//!
//! Loads read the image dimensions first and raise the decoder's allocation
//! limit to cover the full raster, so any array that saves also loads.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, Limits};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::array::{Array, DType};
use crate::durable::{write_durably, Compression};
use crate::error::{Error, Result};
use crate::method::StorageMethod;

/// Bytes taken by the layout header in pixel row 0.
pub const LAYOUT_LEN: usize = 9;

/// Decoder working memory allowed on top of the raster itself.
const DECODE_HEADROOM: u64 = 64 * 1024 * 1024;

/// Decoder limits for a `width x height` 8-bit grayscale image.
pub(crate) fn decode_limits(width: u32, height: u32) -> Limits {
    let raster = u64::from(width) * u64::from(height);
    let mut limits = Limits::default();
    limits.max_alloc = Some(raster.saturating_add(DECODE_HEADROOM));
    limits
}

/// Grayscale PNG image of the array bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Png;

impl Png {
    fn dimension(&self, value: usize) -> Result<u32> {
        u32::try_from(value).map_err(|_| {
            Error::codec(self.name(), format!("{value} exceeds the PNG dimension range"))
        })
    }

    fn raster(&self, array: &Array) -> Result<(Vec<u8>, u32, u32)> {
        let (rows, cols) = array.shape();
        let row_len = cols * array.dtype().width();
        let width = row_len.max(LAYOUT_LEN);
        let height = rows + 1;

        let mut pixels = vec![0u8; width * height];
        pixels[0] = array.dtype().code();
        pixels[1..5].copy_from_slice(&self.dimension(rows)?.to_le_bytes());
        pixels[5..9].copy_from_slice(&self.dimension(cols)?.to_le_bytes());

        let bytes = array.to_le_bytes();
        for (r, row) in bytes.chunks_exact(row_len).enumerate() {
            let start = (r + 1) * width;
            pixels[start..start + row_len].copy_from_slice(row);
        }

        Ok((pixels, self.dimension(width)?, self.dimension(height)?))
    }

    fn unraster(&self, pixels: &[u8], width: usize, height: usize) -> Result<Array> {
        let corrupt = |what: String| Error::codec(self.name(), what);
        if width < LAYOUT_LEN || height < 2 {
            return Err(corrupt(format!("{width}x{height} image has no layout header")));
        }

        let dtype = DType::from_code(pixels[0])
            .ok_or_else(|| corrupt(format!("unknown element type code {}", pixels[0])))?;
        let rows = u32::from_le_bytes([pixels[1], pixels[2], pixels[3], pixels[4]]) as usize;
        let cols = u32::from_le_bytes([pixels[5], pixels[6], pixels[7], pixels[8]]) as usize;
        let row_len = cols * dtype.width();
        if rows + 1 != height || row_len > width {
            return Err(corrupt(format!(
                "layout {rows}x{cols} {dtype} does not fit a {width}x{height} image"
            )));
        }

        let mut bytes = Vec::with_capacity(rows * row_len);
        for r in 1..height {
            let start = r * width;
            bytes.extend_from_slice(&pixels[start..start + row_len]);
        }
        Array::from_le_bytes(dtype, rows, cols, &bytes)
    }
}

impl StorageMethod for Png {
    fn name(&self) -> &'static str {
        "Png"
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        let (pixels, width, height) = self.raster(array)?;
        write_durably(path, Compression::None, |out| {
            PngEncoder::new(out)
                .write_image(&pixels, width, height, ExtendedColorType::L8)
                .map_err(|e| Error::codec(self.name(), e))
        })
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let open = || -> Result<_> {
            Ok(ImageReader::with_format(
                BufReader::new(File::open(path)?),
                ImageFormat::Png,
            ))
        };

        let (width, height) = open()?
            .into_dimensions()
            .map_err(|e| Error::codec(self.name(), e))?;
        let mut reader = open()?;
        reader.limits(decode_limits(width, height));
        let image = reader
            .decode()
            .map_err(|e| Error::codec(self.name(), e))?
            .into_luma8();
        let (width, height) = image.dimensions();
        self.unraster(image.as_raw(), width as usize, height as usize)
    }
}
