//! Conversion between unsigned integers and fixed-width big-endian bytes.
//!
//! Width 3 is one RGB pixel (`0xRRGGBB`), width 4 is a record's content
//! length. Any other width is a programming error and panics.

/// Big-endian bytes of `value`, truncated to its low `width` bytes.
///
/// ```
/// use pixpack::bytes::bytes_of;
///
/// assert_eq!(bytes_of(0x0102_0304, 4), vec![1, 2, 3, 4]);
/// assert_eq!(bytes_of(0x0102_0304, 3), vec![2, 3, 4]);
/// ```
pub fn bytes_of(value: u32, width: usize) -> Vec<u8> {
    assert!(
        width == 3 || width == 4,
        "unsupported integer width: {}",
        width
    );
    value.to_be_bytes()[4 - width..].to_vec()
}

/// Reassemble a big-endian integer from 3 or 4 bytes.
pub fn int_of(bytes: &[u8]) -> u32 {
    match *bytes {
        [r, g, b] => u32::from_be_bytes([0, r, g, b]),
        [a, b, c, d] => u32::from_be_bytes([a, b, c, d]),
        _ => panic!("unsupported integer width: {}", bytes.len()),
    }
}

/// Channel bytes of a `0xRRGGBB` pixel value.
pub fn pixel_bytes(rgb: u32) -> [u8; 3] {
    let [_, r, g, b] = rgb.to_be_bytes();
    [r, g, b]
}

/// The 4-byte length prefix for `len`.
pub fn length_bytes(len: u32) -> [u8; 4] {
    len.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_byte_drops_high_bits() {
        assert_eq!(bytes_of(0xFF12_3456, 3), vec![0x12, 0x34, 0x56]);
        assert_eq!(int_of(&[0x12, 0x34, 0x56]), 0x0012_3456);
    }

    #[test]
    fn test_four_byte_length() {
        assert_eq!(bytes_of(3, 4), vec![0, 0, 0, 3]);
        assert_eq!(int_of(&[0xFF, 0xFF, 0xFF, 0xFF]), u32::MAX);
        assert_eq!(length_bytes(258), [0, 0, 1, 2]);
    }

    #[test]
    fn test_pixel_bytes_matches_bytes_of() {
        for value in [0u32, 1, 0x00AB_CDEF, 0x00FF_FFFF] {
            assert_eq!(pixel_bytes(value).to_vec(), bytes_of(value, 3));
            assert_eq!(int_of(&pixel_bytes(value)), value);
        }
    }

    #[test]
    #[should_panic(expected = "unsupported integer width")]
    fn test_int_of_rejects_other_widths() {
        int_of(&[1, 2]);
    }

    #[test]
    #[should_panic(expected = "unsupported integer width")]
    fn test_bytes_of_rejects_other_widths() {
        bytes_of(1, 2);
    }
}
