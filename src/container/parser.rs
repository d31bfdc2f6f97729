//! Record parser for raw, untrusted container bytes.

use crate::bytes::int_of;
use crate::config::LENGTH_FIELD_WIDTH;
use crate::container::record::ContainerRecord;
use crate::error::{Error, Result};

/// Read cursor over a container buffer.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Take the next `len` bytes, or fail without consuming anything.
    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.corrupt(format!(
                "{} of {} bytes runs past end of data ({} bytes left)",
                what,
                len,
                self.data.len() - self.pos
            )))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn corrupt(&self, reason: String) -> Error {
        Error::CorruptContainer {
            path: None,
            offset: self.pos,
            reason,
        }
    }
}

/// Parse every record in `data`, stopping at the end-of-stream sentinel or
/// when the buffer is exhausted.
///
/// Any truncated field, or a name that is not UTF-8 or would resolve outside
/// the output directory, fails the whole buffer with
/// [`Error::CorruptContainer`]; no partial record list is returned.
///
/// # Example
///
/// ```
/// use pixpack::container::{parse_records, ContainerRecord};
///
/// let mut data = Vec::new();
/// ContainerRecord::new("a.txt", vec![1, 2, 3]).write_to(&mut data);
/// data.extend_from_slice(&[0, 0, 0]);
///
/// let records = parse_records(&data).unwrap();
/// assert_eq!(records, vec![ContainerRecord::new("a.txt", vec![1, 2, 3])]);
/// ```
pub fn parse_records(data: &[u8]) -> Result<Vec<ContainerRecord>> {
    let mut cursor = Cursor::new(data);
    let mut records = Vec::new();

    while !cursor.is_exhausted() {
        let start = cursor.pos;
        let name_len = cursor.take(1, "name length")?[0] as usize;

        // EOF
        if name_len == 0 {
            break;
        }

        let name_bytes = cursor.take(name_len, "name")?;
        let content_len = int_of(cursor.take(LENGTH_FIELD_WIDTH, "content length")?) as usize;
        let content = cursor.take(content_len, "content")?;

        let name = String::from_utf8(name_bytes.to_vec()).map_err(|_| Error::CorruptContainer {
            path: None,
            offset: start,
            reason: "name is not valid UTF-8".to_string(),
        })?;

        let record = ContainerRecord::new(name, content);
        if record.relative_path().is_none() {
            return Err(Error::CorruptContainer {
                path: None,
                offset: start,
                reason: format!("name {:?} is not a safe relative path", record.name),
            });
        }

        log::debug!(
            "parsed record {:?} ({} bytes) at offset {}",
            record.name,
            record.content.len(),
            start
        );
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(records: &[ContainerRecord], padding: usize) -> Vec<u8> {
        let mut data = Vec::new();
        for record in records {
            record.write_to(&mut data);
        }
        data.extend(std::iter::repeat(0).take(padding));
        data
    }

    #[test]
    fn test_two_records_then_sentinel() {
        let records = vec![
            ContainerRecord::new("a.txt", vec![1, 2, 3]),
            ContainerRecord::new("b.txt", Vec::new()),
        ];
        let data = container(&records, 4);
        assert_eq!(data.len(), 27);
        assert_eq!(parse_records(&data).unwrap(), records);
    }

    #[test]
    fn test_exhausted_without_sentinel() {
        let records = vec![ContainerRecord::new("x", vec![0, 0, 0])];
        let data = container(&records, 0);
        assert_eq!(parse_records(&data).unwrap(), records);
    }

    #[test]
    fn test_zero_filled_buffer_is_empty() {
        assert!(parse_records(&[0u8; 12]).unwrap().is_empty());
        assert!(parse_records(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_content_with_zero_bytes_not_sentinel() {
        let records = vec![
            ContainerRecord::new("zeros.bin", vec![0u8; 9]),
            ContainerRecord::new("after.bin", vec![7]),
        ];
        let data = container(&records, 3);
        assert_eq!(parse_records(&data).unwrap(), records);
    }

    #[test]
    fn test_truncated_name() {
        let data = [10u8, b'a', b'b'];
        let err = parse_records(&data).unwrap_err();
        assert!(matches!(err, Error::CorruptContainer { offset: 1, .. }));
    }

    #[test]
    fn test_truncated_length_field() {
        let data = [1u8, b'a', 0, 0];
        assert!(matches!(
            parse_records(&data),
            Err(Error::CorruptContainer { .. })
        ));
    }

    #[test]
    fn test_truncated_content_discards_earlier_records() {
        let mut data = container(&[ContainerRecord::new("ok.txt", vec![5; 4])], 0);
        data.extend_from_slice(&[3, b'b', b'a', b'd', 0, 0, 1, 0, 9, 9]);
        assert!(matches!(
            parse_records(&data),
            Err(Error::CorruptContainer { .. })
        ));
    }

    #[test]
    fn test_huge_length_does_not_overflow() {
        let data = [1u8, b'a', 0xFF, 0xFF, 0xFF, 0xFF, 1];
        assert!(matches!(
            parse_records(&data),
            Err(Error::CorruptContainer { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_name() {
        let data = [2u8, 0xC3, 0x28, 0, 0, 0, 0];
        assert!(matches!(
            parse_records(&data),
            Err(Error::CorruptContainer { offset: 0, .. })
        ));
    }

    #[test]
    fn test_traversal_name_rejected() {
        let data = container(&[ContainerRecord::new("../../etc/cron", vec![1])], 3);
        let err = parse_records(&data).unwrap_err();
        assert!(err.to_string().contains("safe relative path"));
    }
}
