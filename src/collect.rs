//! Input path collection.
//!
//! Turns a caller-supplied list of files and directories into the flat list
//! of regular files to process. Inputs that do not exist are skipped.
//! Directory traversal order is whatever the filesystem yields and is not
//! stable across platforms.

use crate::config::{IMAGE_EXTENSION, MAX_CONTENT_LEN, NAME_SEPARATOR};
use crate::container::validate_name;
use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A regular file selected for packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    /// Name stored in the container, components joined with `/`.
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
    /// File length at collection time.
    pub size: u64,
}

/// Items gathered from the inputs, plus the per-item problems found on the way.
#[derive(Debug)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub errors: Vec<Error>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Collect every existing regular file reachable from `inputs`.
///
/// A file input is stored under its base name. Files inside a directory
/// input are stored under the directory's own name followed by their path
/// relative to it, so `photos/2019/a.jpg` comes back as `photos/2019/a.jpg`.
///
/// Files whose name cannot be stored in a record (empty, longer than 255
/// bytes, not UTF-8) or whose content exceeds `u32::MAX` bytes are reported
/// in [`Collection::errors`] and left out.
pub fn collect_files<P: AsRef<Path>>(inputs: &[P]) -> Collection<CollectedFile> {
    let mut collection = Collection::default();

    for input in inputs {
        let input: &Path = input.as_ref();
        if !input.exists() {
            continue;
        }
        if input.is_file() {
            let name = input
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| invalid_name(input, "file name is not valid UTF-8"));
            push_file(&mut collection, name, input);
        } else if input.is_dir() {
            let root = namespace_root(input);
            for entry in WalkDir::new(input).follow_links(true).min_depth(1) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        let path = e.path().unwrap_or(input).to_path_buf();
                        collection.errors.push(Error::FileRead {
                            path,
                            reason: e.to_string(),
                            source: e.into_io_error(),
                        });
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let name = container_name(root.as_deref(), input, entry.path());
                push_file(&mut collection, name, entry.path());
            }
        } else {
            log::debug!("skipping {}: not a regular file or directory", input.display());
        }
    }

    collection
}

/// Collect candidate images: existing files with a `.png` extension (any
/// case), including those found recursively inside directory inputs.
pub fn collect_images<P: AsRef<Path>>(inputs: &[P]) -> Collection<PathBuf> {
    let mut collection = Collection::default();

    for input in inputs {
        let input: &Path = input.as_ref();
        if !input.exists() {
            continue;
        }
        if input.is_dir() {
            for entry in WalkDir::new(input).follow_links(true).min_depth(1) {
                match entry {
                    Ok(entry) if entry.file_type().is_file() && has_image_extension(entry.path()) => {
                        collection.items.push(entry.into_path())
                    }
                    Ok(_) => {}
                    Err(e) => collection.errors.push(Error::ImageRead {
                        path: e.path().unwrap_or(input).to_path_buf(),
                        reason: e.to_string(),
                    }),
                }
            }
        } else if input.is_file() && has_image_extension(input) {
            collection.items.push(input.to_path_buf());
        }
    }

    collection
}

/// Whether `path` has the image extension, compared case-insensitively.
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(IMAGE_EXTENSION))
        .unwrap_or(false)
}

fn push_file(collection: &mut Collection<CollectedFile>, name: Result<String>, path: &Path) {
    match name.and_then(|name| check_file(name, path)) {
        Ok(file) => collection.items.push(file),
        Err(e) => {
            log::debug!("rejected {}: {}", path.display(), e);
            collection.errors.push(e);
        }
    }
}

fn check_file(name: String, path: &Path) -> Result<CollectedFile> {
    validate_name(&name).map_err(|reason| invalid_name(path, &reason))?;

    let size = std::fs::metadata(path)
        .map_err(|e| Error::file_read(path, e))?
        .len();
    if size > MAX_CONTENT_LEN {
        return Err(Error::FileRead {
            path: path.to_path_buf(),
            reason: format!("file is {} bytes, limit is {}", size, MAX_CONTENT_LEN),
            source: None,
        });
    }

    Ok(CollectedFile {
        name,
        path: path.to_path_buf(),
        size,
    })
}

/// Name a directory input contributes as the first component of its files.
fn namespace_root(dir: &Path) -> Option<String> {
    let name = match dir.file_name() {
        Some(name) => Some(name.to_os_string()),
        // `.`, `..` and the like only have a name once resolved.
        None => dir
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_os_string())),
    };
    name.and_then(|n| n.into_string().ok())
}

fn container_name(root: Option<&str>, dir: &Path, file: &Path) -> Result<String> {
    let relative = file
        .strip_prefix(dir)
        .map_err(|_| invalid_name(file, "file is outside its input directory"))?;

    let mut parts: Vec<&str> = root.into_iter().collect();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(
                part.to_str()
                    .ok_or_else(|| invalid_name(file, "path is not valid UTF-8"))?,
            ),
            _ => return Err(invalid_name(file, "unexpected path component")),
        }
    }

    Ok(parts.join(&NAME_SEPARATOR.to_string()))
}

fn invalid_name(path: &Path, reason: &str) -> Error {
    Error::InvalidName {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
