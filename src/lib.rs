//! pixpack
//!
//! Packs any set of files and directory trees into a single lossless PNG by
//! laying their serialized bytes onto RGB channels, and unpacks such images
//! back into the original files.
//!
//! # Architecture
//!
//! ```text
//! inputs → collect → records → pixels (canvas) → PNG → pixels → records → files
//! ```
//!
//! Each record is `[name len: u8][name][content len: u32 BE][content]`. The
//! canvas is the smallest square holding every record; unused capacity is
//! zero-filled and reads back as the end-of-stream marker.
//!
//! # Example
//!
//! ```rust,no_run
//! use pixpack::progress::LogObserver;
//! use pixpack::{decode, encode, ConvertConfig};
//! use std::path::Path;
//!
//! let config = ConvertConfig::default();
//!
//! encode(&["notes.txt", "photos"], Path::new("packed.png"), &config, &mut LogObserver)
//!     .unwrap();
//!
//! let summary = decode(&["packed.png"], Path::new("restored"), &config, &mut LogObserver);
//! assert!(summary.success());
//! ```

pub mod bytes;
pub mod canvas;
pub mod collect;
pub mod config;
pub mod container;
pub mod convert;
pub mod error;
pub mod progress;

pub use config::ConvertConfig;
pub use convert::{decode, encode, DecodeSummary, EncodeSummary};
pub use error::{Error, ErrorKind, Result};
pub use progress::ProgressObserver;
