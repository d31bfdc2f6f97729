//! Container records and their serialization.

use crate::bytes::length_bytes;
use crate::config::{LENGTH_FIELD_WIDTH, MAX_CONTENT_LEN, MAX_NAME_LEN, NAME_SEPARATOR};
use std::path::{Component, Path, PathBuf};

/// One file carried by a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Container-relative name, components separated by `/`.
    pub name: String,
    /// File content.
    pub content: Vec<u8>,
}

impl ContainerRecord {
    /// Create a record.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Serialized size of this record.
    pub fn size(&self) -> u64 {
        record_size(self.name.len(), self.content.len() as u64)
    }

    /// Serialize this record, appending to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        write_record(out, &self.name, &self.content);
    }

    /// Relative path this record extracts to, or `None` if the name could
    /// escape the output directory.
    pub fn relative_path(&self) -> Option<PathBuf> {
        let mut path = PathBuf::new();
        for part in self.name.split(NAME_SEPARATOR) {
            let mut components = Path::new(part).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(c)), None) if c == part => path.push(c),
                _ => return None,
            }
        }
        Some(path)
    }
}

/// Serialized size of a record: name length byte, name, length field, content.
pub fn record_size(name_len: usize, content_len: u64) -> u64 {
    1 + name_len as u64 + LENGTH_FIELD_WIDTH as u64 + content_len
}

/// Check that `name` can be carried by a record.
///
/// The zero length is reserved for the end-of-stream sentinel.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name is empty".to_string());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!(
            "name is {} bytes, limit is {}",
            name.len(),
            MAX_NAME_LEN
        ));
    }
    Ok(())
}

/// Append one serialized record to `out`.
///
/// Panics if the name or content cannot be represented; callers validate
/// both before sizing the canvas.
pub fn write_record(out: &mut Vec<u8>, name: &str, content: &[u8]) {
    assert!(validate_name(name).is_ok(), "unrepresentable name: {:?}", name);
    assert!(
        content.len() as u64 <= MAX_CONTENT_LEN,
        "content too large: {} bytes",
        content.len()
    );

    out.reserve(record_size(name.len(), content.len() as u64) as usize);
    out.push(name.len() as u8);
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&length_bytes(content.len() as u32));
    out.extend_from_slice(content);
}
