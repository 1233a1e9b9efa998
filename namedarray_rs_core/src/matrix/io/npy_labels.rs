//! Labels of one axis as a one-dimensional `.npy` record array.
//!
//! Every record holds the label's length in chars (`len`, `<u4`) and its code
//! points (`label`, `<U{width}`), NUL-padded to the longest label. NumPy reads
//! `entry["label"]` as a plain string array; `len` keeps labels that end with NUL
//! characters intact.

use std::io;

use bytes::{Buf, BufMut};

use super::invalid_data;
use crate::matrix::labels::Labels;

const MAGIC: &[u8] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;
const CODE_POINT_NBYTES: usize = 4;

fn header(width: usize, len: usize) -> String {
    format!(
        "{{'descr': [('len', '<u4'), ('label', '<U{width}')], 'fortran_order': False, 'shape': ({len},), }}"
    )
}

fn between<'a>(header: &'a str, start: &str, end: char) -> Option<&'a str> {
    let from = header.find(start)? + start.len();
    let rest = &header[from..];
    Some(&rest[..rest.find(end)?])
}

/// `(width, len)` of a header written by [`encode`].
fn parse_header(header: &str) -> io::Result<(usize, usize)> {
    let width = between(header, "('label', '<U", '\'').and_then(|w| w.parse().ok());
    let len = between(header, "'shape': (", ')')
        .and_then(|shape| shape.trim().strip_suffix(','))
        .and_then(|n| n.trim().parse().ok());
    match (width, len) {
        (Some(width), Some(len))
            if header.contains("('len', '<u4')") && header.contains("'fortran_order': False") =>
        {
            Ok((width, len))
        }
        _ => Err(invalid_data(format!("unsupported label entry header {header:?}"))),
    }
}

pub(super) fn encode(labels: &Labels) -> io::Result<Vec<u8>> {
    let width = labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    let mut header = header(width, labels.len()).into_bytes();
    // magic, version (2) and header length (2) precede the header, which ends with '\n'
    let unpadded = MAGIC.len() + 4 + header.len() + 1;
    header.resize(header.len() + (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT, b' ');
    header.push(b'\n');
    let header_len = u16::try_from(header.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "label header is too long"))?;

    let record_nbytes = CODE_POINT_NBYTES * (1 + width);
    let mut bytes = Vec::with_capacity(MAGIC.len() + 4 + header.len() + record_nbytes * labels.len());
    bytes.put_slice(MAGIC);
    bytes.put_u8(1);
    bytes.put_u8(0);
    bytes.put_u16_le(header_len);
    bytes.put_slice(&header);
    for label in labels {
        let nchars = label.chars().count();
        let len = u32::try_from(nchars).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "label is too long to be saved")
        })?;
        bytes.put_u32_le(len);
        label.chars().for_each(|c| bytes.put_u32_le(c as u32));
        bytes.put_bytes(0, CODE_POINT_NBYTES * (width - nchars));
    }
    Ok(bytes)
}

pub(super) fn decode(mut bytes: &[u8]) -> io::Result<Vec<String>> {
    if bytes.len() < MAGIC.len() + 4 || !bytes.starts_with(MAGIC) {
        return Err(invalid_data("label entry is not an .npy array"));
    }
    bytes.advance(MAGIC.len());
    let major = bytes.get_u8();
    bytes.advance(1);
    let header_len = match major {
        1 => bytes.get_u16_le() as usize,
        2 | 3 if bytes.remaining() >= 4 => bytes.get_u32_le() as usize,
        _ => return Err(invalid_data(format!("unsupported .npy version {major}"))),
    };
    if bytes.remaining() < header_len {
        return Err(invalid_data("label entry header is truncated"));
    }
    let header = std::str::from_utf8(&bytes[..header_len]).map_err(invalid_data)?;
    let (width, len) = parse_header(header)?;
    bytes.advance(header_len);

    let expected = width
        .checked_add(1)
        .and_then(|n| n.checked_mul(CODE_POINT_NBYTES))
        .and_then(|n| n.checked_mul(len));
    if expected != Some(bytes.remaining()) {
        return Err(invalid_data(format!(
            "label entry holds {} bytes, which does not fit {len} labels of width {width}",
            bytes.remaining()
        )));
    }
    (0..len)
        .map(|_| -> io::Result<String> {
            let nchars = bytes.get_u32_le() as usize;
            let codes = (0..width).map(|_| bytes.get_u32_le()).collect::<Vec<_>>();
            if nchars > width {
                return Err(invalid_data(format!(
                    "label length {nchars} exceeds the entry width {width}"
                )));
            }
            codes[..nchars]
                .iter()
                .map(|&code| {
                    char::from_u32(code)
                        .ok_or_else(|| invalid_data(format!("invalid code point {code:#x}")))
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::meta::tests::strings;

    fn round_trip(names: &[&str]) -> Vec<String> {
        let labels = Labels::new(0, strings(names), names.len()).unwrap();
        decode(&encode(&labels).unwrap()).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let names = ["a", "longer", "数据", "", "b\0", "\0", "\0c\0\0"];
        assert_eq!(round_trip(&names), strings(&names));
        assert_eq!(round_trip(&[]), Vec::<String>::new());
    }

    #[test]
    fn test_layout() {
        let labels = Labels::new(0, strings(&["ab", "c"]), 2).unwrap();
        let bytes = encode(&labels).unwrap();
        assert!(bytes.starts_with(MAGIC));
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        let data_offset = MAGIC.len() + 4 + header_len;
        assert_eq!(data_offset % ALIGNMENT, 0);

        let header = std::str::from_utf8(&bytes[10..data_offset]).unwrap();
        assert!(header.ends_with('\n'));
        assert!(header.contains("'shape': (2,)"));
        assert_eq!(parse_header(header).unwrap(), (2, 2));
        assert_eq!(
            &bytes[data_offset..],
            &[
                2, 0, 0, 0, b'a', 0, 0, 0, b'b', 0, 0, 0, //
                1, 0, 0, 0, b'c', 0, 0, 0, 0, 0, 0, 0,
            ]
        );
    }

    #[test]
    fn test_corrupt_entries() {
        let labels = Labels::new(0, strings(&["x", "y"]), 2).unwrap();
        let bytes = encode(&labels).unwrap();
        let invalid = |bytes: &[u8]| decode(bytes).unwrap_err().kind();

        assert_eq!(invalid(b"not an npy"), io::ErrorKind::InvalidData);
        assert_eq!(invalid(&bytes[..bytes.len() - 1]), io::ErrorKind::InvalidData);
        assert_eq!(invalid(&bytes[..20]), io::ErrorKind::InvalidData);

        let mut too_long = bytes.clone();
        let data_offset = bytes.len() - 16;
        too_long[data_offset] = 9;
        assert_eq!(invalid(&too_long), io::ErrorKind::InvalidData);

        let mut surrogate = bytes.clone();
        surrogate[data_offset + 4..data_offset + 8].copy_from_slice(&0xd800u32.to_le_bytes());
        assert_eq!(invalid(&surrogate), io::ErrorKind::InvalidData);

        let mut two_dims = bytes;
        let header_end = two_dims.len() - 16;
        let header = String::from_utf8(two_dims[10..header_end].to_vec())
            .unwrap()
            .replace("(2,)", "(1,2)");
        two_dims.splice(10..header_end, header.into_bytes());
        assert_eq!(invalid(&two_dims), io::ErrorKind::InvalidData);
    }
}
