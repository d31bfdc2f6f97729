//! Shared helpers for integration tests.

#![allow(dead_code)]

use pixpack::{Error, ErrorKind, ProgressObserver};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Observer that keeps every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub progress: Vec<(String, f64)>,
    pub errors: Vec<ErrorKind>,
    pub messages: Vec<String>,
}

impl ProgressObserver for RecordingObserver {
    fn on_progress(&mut self, label: &str, fraction: f64) {
        self.progress.push((label.to_string(), fraction));
    }

    fn on_error(&mut self, error: &Error) {
        self.errors.push(error.kind());
        self.messages.push(error.to_string());
    }
}

/// Every regular file under `root`, keyed by `/`-joined relative path.
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    if !root.exists() {
        return files;
    }
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.expect("Failed to walk directory");
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap();
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        files.insert(key, fs::read(entry.path()).expect("Failed to read file"));
    }
    files
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent");
    fs::write(&path, content).expect("Failed to write file");
}
