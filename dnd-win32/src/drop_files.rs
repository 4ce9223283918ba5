//! In-memory `CF_HDROP` lists backing the mock media.
//!
//! The structure is a 20 byte `DROPFILES` header followed, at offset `pFiles`, by a list of
//! null-terminated UTF-16 paths that ends with an empty one.

use crate::platform::QUERY_FILE_COUNT;

const HEADER_SIZE: usize = 20;
const WIDE_OFFSET: usize = 16;

/// A parsed wide `CF_HDROP` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropFiles {
    names: Vec<Vec<u16>>,
}

impl DropFiles {
    /// Parse a `CF_HDROP` block. Returns `None` if the header is truncated, points outside the
    /// block, or describes a single-byte list.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..HEADER_SIZE)?;
        let offset = u32::from_le_bytes(header[..4].try_into().ok()?) as usize;
        if i32::from_le_bytes(header[WIDE_OFFSET..].try_into().ok()?) == 0 {
            return None;
        }

        let units: Vec<u16> = bytes
            .get(offset..)?
            .chunks_exact(2)
            .map(|unit| u16::from_le_bytes([unit[0], unit[1]]))
            .collect();
        let names = units
            .split(|unit| *unit == 0)
            .take_while(|name| !name.is_empty())
            .map(<[u16]>::to_vec)
            .collect();

        Some(Self { names })
    }

    /// Same contract as [`GlobalMemory::query_file`].
    ///
    /// [`GlobalMemory::query_file`]: crate::platform::GlobalMemory::query_file
    pub fn query_file(&self, index: u32, buffer: Option<&mut [u16]>) -> u32 {
        if index == QUERY_FILE_COUNT {
            return self.names.len() as u32;
        }

        let Some(name) = self.names.get(index as usize) else {
            return 0;
        };

        match buffer {
            None => name.len() as u32,
            Some([]) => 0,
            Some(buffer) => {
                let copied = name.len().min(buffer.len() - 1);
                buffer[..copied].copy_from_slice(&name[..copied]);
                buffer[copied] = 0;
                copied as u32
            },
        }
    }
}

/// Build a wide `CF_HDROP` payload out of `paths`.
pub fn bundle_files<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
    // pt and fNC
    bytes.extend_from_slice(&[0; 12]);
    bytes.extend_from_slice(&1i32.to_le_bytes());

    for path in paths {
        for unit in path.encode_utf16().chain(Some(0)) {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
    }
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_copies_names() {
        let files = DropFiles::parse(&bundle_files(["C:\\a.txt", "D:\\dir\\b.png"])).unwrap();
        assert_eq!(files.query_file(QUERY_FILE_COUNT, None), 2);
        assert_eq!(files.query_file(1, None), 12);

        let mut buffer = vec![0xffff; 13];
        assert_eq!(files.query_file(1, Some(buffer.as_mut_slice())), 12);
        assert_eq!(String::from_utf16(&buffer[..12]).unwrap(), "D:\\dir\\b.png");
        assert_eq!(buffer[12], 0);
    }

    #[test]
    fn truncates_to_buffer() {
        let files = DropFiles::parse(&bundle_files(["abcdef"])).unwrap();
        let mut buffer = [0xffff; 4];
        assert_eq!(files.query_file(0, Some(&mut buffer[..])), 3);
        assert_eq!(buffer, [b'a' as u16, b'b' as u16, b'c' as u16, 0]);
        assert_eq!(files.query_file(0, Some(&mut [][..])), 0);
        assert_eq!(files.query_file(7, None), 0);
    }

    #[test]
    fn rejects_bad_headers() {
        assert_eq!(DropFiles::parse(&[0; 8]), None);

        let mut bytes = bundle_files(["a"]);
        bytes[..4].copy_from_slice(&1000u32.to_le_bytes());
        assert_eq!(DropFiles::parse(&bytes), None);

        let mut narrow = bundle_files([] as [&str; 0]);
        narrow[WIDE_OFFSET..HEADER_SIZE].copy_from_slice(&0i32.to_le_bytes());
        assert_eq!(DropFiles::parse(&narrow), None);
    }
}
