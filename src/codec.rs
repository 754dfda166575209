//! Entry codec: every entry is stored as `[header][payload]`, where the header
//! is an LEB128 varint holding the size of the whole entry, header included.

use core::ops::Range;

/// Offset 0 is never written; it marks "no such entry" for callers that
/// store offsets.
pub const LEFT_MARGIN_INDEX: usize = 1;

/// Encoded size of an entry with an empty payload.
pub const MINIMUM_HEADER_SIZE: usize = 1;

/// Longest LEB128 encoding of a `u64`.
pub(crate) const MAX_HEADER_SIZE: usize = 10;

/// Returns the number of bytes an entry with a payload of `length` bytes
/// occupies in the queue.
///
/// The breakpoints sit one unit below each varint width boundary
/// (2^7, 2^14, 2^21, 2^28) minus the header width, so the header always
/// has the width assumed here once it encodes the total.
///
/// ```
/// use bytesqueue::needed_size;
///
/// assert_eq!(needed_size(0), 1);
/// assert_eq!(needed_size(126), 127);
/// assert_eq!(needed_size(127), 129);
/// ```
#[must_use]
pub const fn needed_size(length: usize) -> usize {
    let header = if length < 127 {
        1
    } else if length < 16382 {
        2
    } else if length < 2_097_149 {
        3
    } else if length < 268_435_452 {
        4
    } else {
        5
    };
    length + header
}

/// Writes `value` as an LEB128 varint into `out`, returning the number of
/// bytes used.
#[allow(clippy::cast_possible_truncation, clippy::indexing_slicing)]
pub(crate) fn encode_header(value: usize, out: &mut [u8; MAX_HEADER_SIZE]) -> usize {
    let mut value = value as u64;
    let mut n = 0;
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out[n] = byte;
            return n + 1;
        }
        out[n] = byte | 0x80;
        n += 1;
    }
}

/// Reads an LEB128 varint from the start of `data`.
///
/// Returns `(value, width)`, or `None` if the varint is truncated or does
/// not fit into `usize`.
pub(crate) fn decode_header(data: &[u8]) -> Option<(usize, usize)> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    for (i, &b) in data.iter().take(MAX_HEADER_SIZE).enumerate() {
        result |= u64::from(b & 0x7f).checked_shl(shift)?;
        if b & 0x80 == 0 {
            return usize::try_from(result).ok().map(|v| (v, i + 1));
        }
        shift += 7;
    }
    None
}

/// Decodes the entry starting at `index`.
///
/// Returns the payload range within `buffer` and the total entry size.
/// `None` means the bytes at `index` cannot be an entry: the header is
/// truncated, claims less than its own width, or runs past the buffer.
pub(crate) fn decode_entry(buffer: &[u8], index: usize) -> Option<(Range<usize>, usize)> {
    let (block_size, width) = decode_header(buffer.get(index..)?)?;
    if block_size < width {
        return None;
    }
    let end = index.checked_add(block_size)?;
    if end > buffer.len() {
        return None;
    }
    Some((index + width..end, block_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: usize) -> Vec<u8> {
        let mut out = [0u8; MAX_HEADER_SIZE];
        let n = encode_header(value, &mut out);
        out[..n].to_vec()
    }

    #[test]
    fn test_needed_size_breakpoints() {
        assert_eq!(needed_size(0), 1);
        assert_eq!(needed_size(126), 127);
        assert_eq!(needed_size(127), 129);
        assert_eq!(needed_size(16381), 16383);
        assert_eq!(needed_size(16382), 16385);
        assert_eq!(needed_size(2_097_148), 2_097_151);
        assert_eq!(needed_size(2_097_149), 2_097_153);
        assert_eq!(needed_size(268_435_451), 268_435_455);
        assert_eq!(needed_size(268_435_452), 268_435_457);
    }

    #[test]
    fn test_needed_size_header_is_self_consistent() {
        for length in [
            0usize,
            1,
            126,
            127,
            128,
            16381,
            16382,
            16383,
            2_097_148,
            2_097_149,
            268_435_451,
            268_435_452,
        ] {
            let total = needed_size(length);
            assert_eq!(encode(total).len(), total - length, "payload length {length}");
        }
    }

    #[test]
    fn test_minimum_header_size_matches_empty_entry() {
        assert_eq!(needed_size(0), MINIMUM_HEADER_SIZE);
    }

    #[test]
    fn test_encode_header_known_values() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(127), vec![0x7f]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xac, 0x02]);
        assert_eq!(encode(16384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn test_decode_header_reads_width() {
        assert_eq!(decode_header(&[0x05, 0xff]), Some((5, 1)));
        assert_eq!(decode_header(&[0xac, 0x02, 0x00]), Some((300, 2)));
    }

    #[test]
    fn test_decode_header_truncated() {
        assert_eq!(decode_header(&[]), None);
        assert_eq!(decode_header(&[0x80]), None);
        assert_eq!(decode_header(&[0xff; MAX_HEADER_SIZE]), None);
    }

    #[test]
    fn test_decode_entry() {
        let buffer = [0u8, 4, b'a', b'b', b'c', 0];
        let (payload, block_size) = decode_entry(&buffer, 1).unwrap();
        assert_eq!(&buffer[payload], b"abc");
        assert_eq!(block_size, 4);
    }

    #[test]
    fn test_decode_entry_rejects_bad_sizes() {
        // A zeroed region claims a zero-sized entry.
        assert_eq!(decode_entry(&[0u8; 8], 1), None);
        // Entry runs past the end of the buffer.
        assert_eq!(decode_entry(&[0u8, 9, 1, 2], 1), None);
        assert_eq!(decode_entry(&[0u8, 1], 2), None);
    }
}
