//! Character width blocks
//!
//! Each block covers a contiguous range of glyph indices; blocks are linked
//! through their next offset.

use types::{BigEndian, FixedSize, Tag};

use crate::{chain::ChainLink, FontData, ReadError, Section};

/// 'CWDH'
pub const TAG: Tag = Tag::new(b"CWDH");

/// The size of the block header, including the section header.
pub const CWDH_HEADER_LEN: usize = 16;

/// The horizontal metrics of a single glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct CharWidths {
    /// Space to the left of the glyph's pixels; may be negative.
    pub left: BigEndian<i8>,
    /// Width of the glyph's pixels within its cell.
    pub glyph_width: BigEndian<u8>,
    /// The advance.
    pub char_width: BigEndian<u8>,
}

impl CharWidths {
    pub fn left(&self) -> i8 {
        self.left.get()
    }

    pub fn glyph_width(&self) -> u8 {
        self.glyph_width.get()
    }

    pub fn char_width(&self) -> u8 {
        self.char_width.get()
    }
}

/// Note: this requires `CharWidths` to be `repr(packed)`.
impl FixedSize for CharWidths {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();
}

/// A single block in the width chain.
#[derive(Clone, Copy, Debug)]
pub struct Cwdh<'a> {
    data: FontData<'a>,
    position: usize,
    widths: &'a [CharWidths],
}

impl<'a> Section<'a> for Cwdh<'a> {
    const TAG: Tag = TAG;
    const HEADER_LEN: usize = CWDH_HEADER_LEN;

    fn read_section(data: FontData<'a>, position: usize) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(8);
        let start = cursor.read::<u16>()?;
        let end = cursor.read::<u16>()?;
        let _next = cursor.read::<u32>()?;
        if end < start {
            return Err(ReadError::MalformedData("CWDH end index before start index"));
        }
        let widths = cursor.read_array((end - start) as usize + 1)?;
        Ok(Cwdh {
            data,
            position,
            widths,
        })
    }
}

impl<'a> Cwdh<'a> {
    /// The absolute position of this block in the file.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn section_size(&self) -> u32 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// The first glyph index covered by this block.
    pub fn start_index(&self) -> u16 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// The last glyph index covered by this block (inclusive).
    pub fn end_index(&self) -> u16 {
        self.data.read_at(10).unwrap_or_default()
    }

    pub fn next_offset(&self) -> u32 {
        self.data.read_at(12).unwrap_or_default()
    }

    /// One entry per glyph in `start_index..=end_index`.
    pub fn widths(&self) -> &'a [CharWidths] {
        self.widths
    }

    /// The widths of `glyph`, if it is covered by this block.
    pub fn widths_for(&self, glyph: u16) -> Option<CharWidths> {
        let idx = glyph.checked_sub(self.start_index())?;
        self.widths.get(idx as usize).copied()
    }

    /// Bytes after the width entries, up to the declared section size.
    pub fn padding(&self) -> &'a [u8] {
        let used = CWDH_HEADER_LEN + std::mem::size_of_val(self.widths);
        self.data
            .split_off(used)
            .map(|data| data.as_bytes())
            .unwrap_or_default()
    }
}

impl ChainLink for Cwdh<'_> {
    fn next_offset(&self) -> u32 {
        Cwdh::next_offset(self)
    }

    fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::read_section;
    use bffnt_test_data::bebuffer::BeBuffer;

    #[test]
    fn read_block() {
        let buf = BeBuffer::new()
            .push(TAG)
            .push(28u32)
            .push(0u16)
            .push(2u16)
            .push(0u32)
            .extend([0i8, 8, 9, 1, 6, 8, -1, 7, 7])
            .extend([0u8; 3]);
        let cwdh: Cwdh = read_section(FontData::new(buf.as_slice()), 0).unwrap();
        assert_eq!(cwdh.start_index(), 0);
        assert_eq!(cwdh.end_index(), 2);
        assert_eq!(cwdh.widths().len(), 3);
        let last = cwdh.widths_for(2).unwrap();
        assert_eq!(
            (last.left(), last.glyph_width(), last.char_width()),
            (-1, 7, 7)
        );
        assert!(cwdh.widths_for(3).is_none());
        assert_eq!(cwdh.padding(), [0, 0, 0]);
    }

    #[test]
    fn widths_past_section_end() {
        let buf = BeBuffer::new()
            .push(TAG)
            .push(20u32)
            .push(0u16)
            .push(9u16)
            .push(0u32)
            .extend([0u8; 4]);
        assert_eq!(
            read_section::<Cwdh>(FontData::new(buf.as_slice()), 0).unwrap_err(),
            ReadError::TruncatedInput
        );
    }

    #[test]
    fn inverted_range() {
        let buf = BeBuffer::new()
            .push(TAG)
            .push(16u32)
            .push(5u16)
            .push(4u16)
            .push(0u32);
        assert!(read_section::<Cwdh>(FontData::new(buf.as_slice()), 0)
            .unwrap_err()
            .is_format_error());
    }
}
