//! Locating sections by offset

use types::Tag;

use crate::{FontData, ReadError, Section};

/// The length of the tag and size at the start of every section.
pub const SECTION_HEADER_LEN: usize = 8;

/// The position, size and kind of a section within a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionRecord {
    pub tag: Tag,
    /// Absolute position of the section's tag.
    pub position: usize,
    /// The declared size, including the tag and size fields.
    pub size: usize,
}

impl SectionRecord {
    /// The position one past the last byte of the section.
    pub fn end(&self) -> usize {
        self.position + self.size
    }
}

/// Convert a stored forward offset into the position of the section's tag.
///
/// Offsets stored in the container point past the eight byte section
/// header, to the start of the section's payload.
pub fn section_position(offset: u32) -> Result<usize, ReadError> {
    (offset as usize)
        .checked_sub(SECTION_HEADER_LEN)
        .ok_or(ReadError::MalformedData("offset points before a section header"))
}

/// Read the section starting at `position`.
///
/// This checks the tag and ensures the whole declared size is available
/// before handing the section bytes to the section's reader.
pub fn read_section<'a, T: Section<'a>>(
    file: FontData<'a>,
    position: usize,
) -> Result<T, ReadError> {
    let record = read_section_record(file, position, T::TAG)?;
    if record.size < T::HEADER_LEN {
        return Err(ReadError::MalformedData("section smaller than its header"));
    }
    let data = file
        .slice(record.position..record.end())
        .ok_or(ReadError::TruncatedInput)?;
    T::read_section(data, position)
}

pub(crate) fn read_section_record(
    file: FontData,
    position: usize,
    expected: Tag,
) -> Result<SectionRecord, ReadError> {
    let found: Tag = file.read_at(position)?;
    if found != expected {
        return Err(ReadError::InvalidMagic { expected, found });
    }
    let size = file.read_at::<u32>(position + 4)? as usize;
    if size < SECTION_HEADER_LEN {
        return Err(ReadError::MalformedData("section size smaller than header"));
    }
    position
        .checked_add(size)
        .filter(|end| *end <= file.len())
        .ok_or(ReadError::TruncatedInput)?;
    Ok(SectionRecord {
        tag: found,
        position,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bffnt_test_data::bebuffer::BeBuffer;

    #[test]
    fn positions() {
        assert_eq!(section_position(0x3C).unwrap(), 0x34);
        assert!(section_position(4).is_err());
    }

    #[test]
    fn record_checks() {
        let buf = BeBuffer::new()
            .push(Tag::new(b"CWDH"))
            .push(12u32)
            .extend([0u8; 4]);
        let data = FontData::new(buf.as_slice());
        let record = read_section_record(data, 0, Tag::new(b"CWDH")).unwrap();
        assert_eq!(record.end(), 12);

        assert_eq!(
            read_section_record(data, 0, Tag::new(b"CMAP")),
            Err(ReadError::InvalidMagic {
                expected: Tag::new(b"CMAP"),
                found: Tag::new(b"CWDH")
            })
        );
        // declared size runs past the end of the data
        let short = FontData::new(&buf.as_slice()[..10]);
        assert_eq!(
            read_section_record(short, 0, Tag::new(b"CWDH")),
            Err(ReadError::TruncatedInput)
        );
        assert_eq!(
            read_section_record(data, 10, Tag::new(b"CWDH")),
            Err(ReadError::TruncatedInput)
        );
    }
}
