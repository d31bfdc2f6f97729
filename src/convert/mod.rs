//! Encode and decode runs.
//!
//! Each run owns its canvas, pending bytes and counters; nothing is shared
//! between runs, so independent runs may execute on separate threads.

mod decoder;
mod encoder;

pub use decoder::{decode, read_image, DecodeSummary};
pub use encoder::{encode, required_bytes, EncodeSummary, Packer};

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::progress::ProgressObserver;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

/// Run [`encode`] on a background thread.
///
/// The observer is moved into the thread and handed back with the result.
pub fn spawn_encode<O>(
    inputs: Vec<PathBuf>,
    output: PathBuf,
    config: ConvertConfig,
    mut observer: O,
) -> JoinHandle<(Result<EncodeSummary>, O)>
where
    O: ProgressObserver + Send + 'static,
{
    thread::spawn(move || {
        let result = encode(&inputs, &output, &config, &mut observer);
        (result, observer)
    })
}

/// Run [`decode`] on a background thread.
pub fn spawn_decode<O>(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    config: ConvertConfig,
    mut observer: O,
) -> JoinHandle<(DecodeSummary, O)>
where
    O: ProgressObserver + Send + 'static,
{
    thread::spawn(move || {
        let summary = decode(&inputs, &output_dir, &config, &mut observer);
        (summary, observer)
    })
}
