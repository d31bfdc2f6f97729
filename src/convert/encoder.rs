//! Packing files into a canvas.

use crate::bytes::int_of;
use crate::canvas::{dimension_for, PixelCanvas};
use crate::collect::{collect_files, CollectedFile};
use crate::config::{ConvertConfig, CHANNEL_COUNT, MAX_CONTENT_LEN};
use crate::container::{record_size, write_record};
use crate::error::{Error, Result};
use crate::progress::{ProgressObserver, COMPLETE_LABEL};
use std::path::{Path, PathBuf};

/// Outcome of an encode run.
#[derive(Debug, Clone)]
pub struct EncodeSummary {
    /// Image path the canvas was saved to (or should have been).
    pub output: PathBuf,
    /// Side length of the canvas in pixels.
    pub dimension: u32,
    /// Bytes the canvas was sized for.
    pub total_bytes: u64,
    /// Record bytes actually written.
    pub bytes_written: u64,
    /// Files packed into the canvas.
    pub files_packed: usize,
    /// Files left out because of a reported error.
    pub files_skipped: usize,
    /// Whether the image was written to disk.
    pub saved: bool,
}

/// Streaming packer state for a single run.
///
/// Records are appended to a small pending buffer; every complete 3-byte
/// group is drained into the next pixel straight away, so at most two bytes
/// are carried from one record to the next.
#[derive(Debug)]
pub struct Packer {
    canvas: PixelCanvas,
    pending: Vec<u8>,
    total_bytes: u64,
    bytes_written: u64,
}

impl Packer {
    /// Allocate a canvas large enough for `total_bytes` of records.
    pub fn with_capacity(total_bytes: u64) -> Result<Self> {
        if total_bytes == 0 {
            return Err(Error::FatalEncode("no valid input files".to_string()));
        }
        let dimension = u32::try_from(dimension_for(total_bytes)).map_err(|_| {
            Error::FatalEncode(format!("{} bytes do not fit a single image", total_bytes))
        })?;

        Ok(Self {
            canvas: PixelCanvas::new(dimension),
            pending: Vec::with_capacity(CHANNEL_COUNT),
            total_bytes,
            bytes_written: 0,
        })
    }

    /// Side length of the canvas.
    pub fn dimension(&self) -> u32 {
        self.canvas.dimension()
    }

    /// Bytes the canvas was sized for.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Record bytes written so far, including any still pending.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Canvas bytes not yet claimed by a record.
    pub fn remaining(&self) -> u64 {
        self.canvas.capacity() - self.bytes_written
    }

    /// Fraction of the sized total written so far.
    pub fn fraction(&self) -> f64 {
        (self.bytes_written as f64 / self.total_bytes as f64).min(1.0)
    }

    /// Append one record and drain complete pixels onto the canvas.
    ///
    /// Returns `false` without writing anything if the record does not fit
    /// in the remaining capacity or its content is too long for a record.
    pub fn push(&mut self, name: &str, content: &[u8]) -> bool {
        if !record_fits(self.remaining(), name, content.len() as u64) {
            return false;
        }
        let size = record_size(name.len(), content.len() as u64);

        write_record(&mut self.pending, name, content);
        self.bytes_written += size;

        let full = self.pending.len() / CHANNEL_COUNT * CHANNEL_COUNT;
        for group in self.pending[..full].chunks_exact(CHANNEL_COUNT) {
            self.canvas.write_pixel(int_of(group));
        }
        self.pending.drain(..full);
        true
    }

    /// Zero-pad the last partial pixel, if any, and hand over the canvas.
    pub fn finish(mut self) -> PixelCanvas {
        if !self.pending.is_empty() {
            self.pending.resize(CHANNEL_COUNT, 0);
            self.canvas.write_pixel(int_of(&self.pending));
        }
        self.canvas
    }
}

fn record_fits(remaining: u64, name: &str, content_len: u64) -> bool {
    content_len <= MAX_CONTENT_LEN && record_size(name.len(), content_len) <= remaining
}

/// Total serialized size of the records for `files`.
pub fn required_bytes(files: &[CollectedFile]) -> u64 {
    files
        .iter()
        .map(|f| record_size(f.name.len(), f.size))
        .sum()
}

/// Pack every file reachable from `inputs` into a PNG at `output`.
///
/// Only an empty input (no file contributes a byte) or a canvas too large
/// for one image fails the call; per-file read failures and a failed save
/// are reported to `observer` and reflected in the returned summary.
///
/// Files are packed in collection order; the order of files inside a
/// directory depends on the filesystem.
pub fn encode<P, O>(
    inputs: &[P],
    output: &Path,
    config: &ConvertConfig,
    observer: &mut O,
) -> Result<EncodeSummary>
where
    P: AsRef<Path>,
    O: ProgressObserver + ?Sized,
{
    let collection = collect_files(inputs);
    for error in &collection.errors {
        observer.on_error(error);
    }
    let files = collection.items;
    let mut files_skipped = collection.errors.len();

    let total_bytes = required_bytes(&files);
    let mut packer = match Packer::with_capacity(total_bytes) {
        Ok(packer) => packer,
        Err(e) => {
            observer.on_error(&e);
            return Err(e);
        }
    };

    log::info!(
        "packing {} file(s), {} bytes, into a {}x{} canvas",
        files.len(),
        total_bytes,
        packer.dimension(),
        packer.dimension()
    );

    let mut files_packed = 0;
    for file in &files {
        let content = match std::fs::read(&file.path) {
            Ok(content) => content,
            Err(e) => {
                files_skipped += 1;
                observer.on_error(&Error::file_read(&file.path, e));
                continue;
            }
        };

        if !packer.push(&file.name, &content) {
            files_skipped += 1;
            observer.on_error(&Error::FileRead {
                path: file.path.clone(),
                reason: format!(
                    "file changed to {} bytes after sizing ({} bytes expected)",
                    content.len(),
                    file.size
                ),
                source: None,
            });
            continue;
        }

        files_packed += 1;
        log::debug!("packed {} ({} bytes)", file.name, content.len());
        observer.on_progress(&file.name, packer.fraction());
    }

    let mut summary = EncodeSummary {
        output: output.to_path_buf(),
        dimension: packer.dimension(),
        total_bytes,
        bytes_written: packer.bytes_written(),
        files_packed,
        files_skipped,
        saved: false,
    };

    let canvas = packer.finish();
    match canvas.save(output, config.compression) {
        Ok(()) => {
            summary.saved = true;
            log::info!("created {}", output.display());
            observer.on_progress(COMPLETE_LABEL, 1.0);
        }
        Err(e) => observer.on_error(&e),
    }

    Ok(summary)
}
