//! The container header
//!
//! The first twenty bytes of every file. Unlike every other section it has
//! no size prefix, and nothing points to it.

use types::{Tag, BIG_ENDIAN_BOM, CFNU_TAG, FFNT_TAG, LITTLE_ENDIAN_BOM};

use crate::{FontData, FontRead, ReadError};

/// The size of the container header, in bytes.
pub const FFNT_HEADER_LEN: usize = 20;

/// The container header.
#[derive(Clone, Copy, Debug)]
pub struct Ffnt<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Ffnt<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let data = data
            .slice(..FFNT_HEADER_LEN)
            .ok_or(ReadError::TruncatedInput)?;
        let magic: Tag = data.read_at(0)?;
        if magic != FFNT_TAG && magic != CFNU_TAG {
            return Err(ReadError::InvalidMagic {
                expected: FFNT_TAG,
                found: magic,
            });
        }
        match data.read_at::<u16>(4)? {
            BIG_ENDIAN_BOM => (),
            LITTLE_ENDIAN_BOM => {
                return Err(ReadError::MalformedData(
                    "little-endian containers are not supported",
                ))
            }
            other => return Err(ReadError::InvalidFormat(other.into())),
        }
        if data.read_at::<u16>(6)? as usize != FFNT_HEADER_LEN {
            return Err(ReadError::MalformedData("unexpected container header size"));
        }
        Ok(Ffnt { data })
    }
}

impl<'a> Ffnt<'a> {
    /// Either `FFNT` or `CFNU`.
    pub fn magic(&self) -> Tag {
        self.data.read_at(0).unwrap_or_default()
    }

    /// The byte order mark, always [`BIG_ENDIAN_BOM`] for data we can read.
    pub fn bom(&self) -> u16 {
        self.data.read_at(4).unwrap_or_default()
    }

    pub fn header_size(&self) -> u16 {
        self.data.read_at(6).unwrap_or_default()
    }

    pub fn version(&self) -> u32 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// The total size of the file, as recorded in the header.
    pub fn file_size(&self) -> u32 {
        self.data.read_at(12).unwrap_or_default()
    }

    /// A hint for the runtime's block reader.
    ///
    /// Always observed to be a multiple of `0x10000`; we preserve it as-is.
    pub fn block_read_hint(&self) -> u32 {
        self.data.read_at(16).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bffnt_test_data::bebuffer::BeBuffer;

    fn header(magic: &[u8; 4], bom: u16, size: u16) -> BeBuffer {
        BeBuffer::new()
            .push(Tag::new(magic))
            .push(bom)
            .push(size)
            .push(0x0300_0000u32)
            .push(0x110u32)
            .push(0x0006_0000u32)
    }

    #[test]
    fn read_header() {
        let buf = header(b"FFNT", 0xFEFF, 20);
        let ffnt = Ffnt::read(FontData::new(buf.as_slice())).unwrap();
        assert_eq!(ffnt.magic(), FFNT_TAG);
        assert_eq!(ffnt.bom(), BIG_ENDIAN_BOM);
        assert_eq!(ffnt.header_size(), 20);
        assert_eq!(ffnt.version(), 0x0300_0000);
        assert_eq!(ffnt.file_size(), 0x110);
        assert_eq!(ffnt.block_read_hint(), 0x0006_0000);

        let buf = header(b"CFNU", 0xFEFF, 20);
        assert!(Ffnt::read(FontData::new(buf.as_slice())).is_ok());
    }

    #[test]
    fn bad_headers() {
        let buf = header(b"FFNT", 0xFEFF, 20);
        assert_eq!(
            Ffnt::read(FontData::new(&buf.as_slice()[..19])).err(),
            Some(ReadError::TruncatedInput)
        );

        let buf = header(b"ffnt", 0xFEFF, 20);
        assert!(matches!(
            Ffnt::read(FontData::new(buf.as_slice())),
            Err(ReadError::InvalidMagic { .. })
        ));

        let buf = header(b"FFNT", 0xFFFE, 20);
        assert!(Ffnt::read(FontData::new(buf.as_slice()))
            .unwrap_err()
            .is_format_error());

        let buf = header(b"FFNT", 0xFEFF, 16);
        assert!(Ffnt::read(FontData::new(buf.as_slice())).is_err());
    }
}
