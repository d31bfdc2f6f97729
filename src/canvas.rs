//! Square RGB raster used as physical storage for a container.
//!
//! Pixels are filled in row-major order: the x coordinate advances fastest
//! and wraps to the next row at `dimension`. [`read_channels`] returns the
//! channels of a PNG in the same order, so encode and decode always agree.

use crate::bytes::pixel_bytes;
use crate::config::{PngCompression, CHANNEL_COUNT};
use crate::error::{Error, Result};
use png::{BitDepth, ColorType, Transformations};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Smallest side `d` of a square canvas with `3 * d * d >= total_bytes`.
///
/// ```
/// use pixpack::canvas::dimension_for;
///
/// assert_eq!(dimension_for(0), 0);
/// assert_eq!(dimension_for(23), 3);
/// assert_eq!(dimension_for(27), 3);
/// assert_eq!(dimension_for(28), 4);
/// ```
pub fn dimension_for(total_bytes: u64) -> u64 {
    let pixels = total_bytes.div_ceil(CHANNEL_COUNT as u64);
    let mut dim = (pixels as f64).sqrt() as u64;
    while dim.saturating_mul(dim) < pixels {
        dim += 1;
    }
    while dim > 0 && (dim - 1) * (dim - 1) >= pixels {
        dim -= 1;
    }
    dim
}

/// An in-memory square RGB canvas with a sequential fill cursor.
#[derive(Debug)]
pub struct PixelCanvas {
    dimension: u32,
    /// Packed RGB channels, row-major.
    data: Vec<u8>,
    /// Index of the next pixel to write.
    cursor: usize,
}

impl PixelCanvas {
    /// Create a zero-filled canvas of `dimension x dimension` pixels.
    pub fn new(dimension: u32) -> Self {
        let pixels = dimension as usize * dimension as usize;
        Self {
            dimension,
            data: vec![0; pixels * CHANNEL_COUNT],
            cursor: 0,
        }
    }

    /// Side length in pixels.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.dimension as usize * self.dimension as usize
    }

    /// Byte capacity (`3 * dimension^2`).
    pub fn capacity(&self) -> u64 {
        self.data.len() as u64
    }

    /// Number of pixels written so far.
    pub fn pixels_written(&self) -> usize {
        self.cursor
    }

    /// Whether every pixel has been written.
    pub fn is_full(&self) -> bool {
        self.cursor >= self.pixel_count()
    }

    /// Write a `0xRRGGBB` value at the cursor and advance it.
    ///
    /// Panics if the canvas is already full.
    pub fn write_pixel(&mut self, rgb: u32) {
        assert!(
            !self.is_full(),
            "canvas overflow: all {} pixels already written",
            self.pixel_count()
        );
        let offset = self.cursor * CHANNEL_COUNT;
        self.data[offset..offset + CHANNEL_COUNT].copy_from_slice(&pixel_bytes(rgb));
        self.cursor += 1;
    }

    /// Raw channel bytes in fill order.
    pub fn channels(&self) -> &[u8] {
        &self.data
    }

    /// Persist the canvas as an 8-bit RGB PNG.
    ///
    /// A file left half-written by a failed save is removed.
    pub fn save(&self, path: &Path, compression: PngCompression) -> Result<()> {
        write_or_remove(path, |out| self.write_png(out, compression))?;

        log::debug!(
            "saved {}x{} canvas to {}",
            self.dimension,
            self.dimension,
            path.display()
        );
        Ok(())
    }

    fn write_png<W: Write>(
        &self,
        out: &mut W,
        compression: PngCompression,
    ) -> std::result::Result<(), String> {
        let mut encoder = png::Encoder::new(&mut *out, self.dimension, self.dimension);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(compression.into());

        let mut writer = encoder
            .write_header()
            .map_err(|e| format!("png encode header failed: {}", e))?;
        writer
            .write_image_data(&self.data)
            .map_err(|e| format!("png encode data failed: {}", e))?;
        writer
            .finish()
            .map_err(|e| format!("png finish failed: {}", e))?;
        out.flush().map_err(|e| e.to_string())
    }
}

/// Create `path` and fill it with `write`; on failure the file is deleted.
fn write_or_remove<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::result::Result<(), String>,
{
    let image_err = |reason: String| Error::ImageWrite {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::create(path).map_err(|e| image_err(e.to_string()))?;
    let mut out = BufWriter::new(file);
    let result = write(&mut out);
    drop(out);

    result.map_err(|reason| {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("could not remove partial image {}: {}", path.display(), e);
        }
        image_err(reason)
    })
}

/// Decode a PNG and return its pixels as 8-bit RGB channels in fill order.
///
/// Palette, grayscale, alpha and 16-bit images are normalised to 8-bit RGB;
/// alpha is dropped. Images whose RGB buffer would exceed `max_bytes` are
/// rejected before the pixel data is read.
pub fn read_channels(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let image_err = |reason: String| Error::ImageRead {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| image_err(e.to_string()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| image_err(format!("png decode header failed: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        (info.width as u64, info.height as u64)
    };
    let rgb_len = width * height * CHANNEL_COUNT as u64;
    if rgb_len > max_bytes {
        return Err(image_err(format!(
            "decoded image exceeds maximum size ({} > {} bytes)",
            rgb_len, max_bytes
        )));
    }

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| image_err(format!("png decode frame failed: {}", e)))?;
    let bytes = &buf[..info.buffer_size()];

    let mut rgb = Vec::with_capacity(rgb_len as usize);
    match (info.color_type, info.bit_depth) {
        (ColorType::Rgb, BitDepth::Eight) => rgb.extend_from_slice(bytes),
        (ColorType::Rgba, BitDepth::Eight) => {
            for chunk in bytes.chunks_exact(4) {
                rgb.extend_from_slice(&chunk[..3]);
            }
        }
        (ColorType::Grayscale, BitDepth::Eight) => {
            for &g in bytes {
                rgb.extend_from_slice(&[g, g, g]);
            }
        }
        (ColorType::GrayscaleAlpha, BitDepth::Eight) => {
            for chunk in bytes.chunks_exact(2) {
                rgb.extend_from_slice(&[chunk[0], chunk[0], chunk[0]]);
            }
        }
        (ct, bd) => {
            return Err(image_err(format!(
                "unsupported png output format: color={:?} depth={:?}",
                ct, bd
            )))
        }
    }

    Ok(rgb)
}
