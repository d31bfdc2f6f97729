//! Container wire format.
//!
//! A container is the byte stream carried by an image's pixels:
//!
//! ```text
//! [name len: u8][name: UTF-8][content len: u32 BE][content] ... [0x00 padding]
//! ```
//!
//! A name length of zero marks the end of the stream. Unused canvas capacity
//! is zero-filled, so it always reads back as that sentinel.

mod parser;
mod record;

pub use parser::parse_records;
pub use record::{record_size, validate_name, write_record, ContainerRecord};
