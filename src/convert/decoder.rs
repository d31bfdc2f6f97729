//! Unpacking images back into files.

use crate::canvas::read_channels;
use crate::collect::collect_images;
use crate::config::ConvertConfig;
use crate::container::{parse_records, ContainerRecord};
use crate::error::{Error, Result};
use crate::progress::{ProgressObserver, COMPLETE_LABEL};
use std::path::{Path, PathBuf};

/// Outcome of a decode run.
#[derive(Debug, Clone, Default)]
pub struct DecodeSummary {
    /// Candidate images examined.
    pub images_processed: usize,
    /// Candidate images that could not be read or parsed.
    pub images_failed: usize,
    /// Files written, in extraction order.
    pub files_written: Vec<PathBuf>,
}

impl DecodeSummary {
    /// Whether at least one file was extracted.
    pub fn success(&self) -> bool {
        !self.files_written.is_empty()
    }
}

/// Read one image and parse its container.
///
/// Either every record of the image is returned or none is.
pub fn read_image(path: &Path, max_image_bytes: u64) -> Result<Vec<ContainerRecord>> {
    let channels = read_channels(path, max_image_bytes)?;
    parse_records(&channels).map_err(|e| e.in_image(path))
}

/// Extract the files carried by every candidate image in `inputs` into
/// `output_dir`.
///
/// Failures are scoped to one image or one file and go to `observer`; an
/// image that fails to parse contributes no files at all.
pub fn decode<P, O>(
    inputs: &[P],
    output_dir: &Path,
    config: &ConvertConfig,
    observer: &mut O,
) -> DecodeSummary
where
    P: AsRef<Path>,
    O: ProgressObserver + ?Sized,
{
    let collection = collect_images(inputs);
    for error in &collection.errors {
        observer.on_error(error);
    }
    let images = collection.items;
    let mut summary = DecodeSummary::default();

    log::info!(
        "unpacking {} image(s) into {}",
        images.len(),
        output_dir.display()
    );

    for (index, image) in images.iter().enumerate() {
        summary.images_processed += 1;

        let records = match read_image(image, config.max_image_bytes) {
            Ok(records) => records,
            Err(e) => {
                summary.images_failed += 1;
                observer.on_error(&e);
                continue;
            }
        };
        log::debug!("{}: {} record(s)", image.display(), records.len());

        let count = records.len();
        for (done, record) in records.into_iter().enumerate() {
            match write_record_file(output_dir, &record, config.overwrite) {
                Ok(path) => {
                    summary.files_written.push(path);
                    let fraction =
                        (index as f64 + (done + 1) as f64 / count as f64) / images.len() as f64;
                    observer.on_progress(&record.name, fraction);
                }
                Err(e) => observer.on_error(&e),
            }
        }
    }

    if summary.success() {
        observer.on_progress(COMPLETE_LABEL, 1.0);
    } else {
        log::info!("no files were extracted");
    }
    summary
}

/// Write one record under `output_dir`, creating parent directories.
fn write_record_file(output_dir: &Path, record: &ContainerRecord, overwrite: bool) -> Result<PathBuf> {
    let relative = record.relative_path().ok_or_else(|| Error::CorruptContainer {
        path: None,
        offset: 0,
        reason: format!("name {:?} is not a safe relative path", record.name),
    })?;
    let target = output_dir.join(relative);
    let write_err = |source: std::io::Error| Error::FileWrite {
        path: target.clone(),
        source,
    };

    if !overwrite && target.exists() {
        return Err(write_err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "file already exists",
        )));
    }
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(&target, &record.content).map_err(write_err)?;

    log::debug!("wrote {} ({} bytes)", target.display(), record.content.len());
    Ok(target)
}
