//! The texture glyph page
//!
//! Describes the grid of glyph cells on each texture sheet, followed by the
//! sheets themselves. The sheet data is opaque to us.

use std::ops::Range;

use types::Tag;

use crate::{FontData, ReadError, Section};

/// 'TGLP'
pub const TAG: Tag = Tag::new(b"TGLP");

/// The size of the geometry header, including the section header.
pub const TGLP_HEADER_LEN: usize = 32;

/// The texture glyph page section.
#[derive(Clone, Debug)]
pub struct Tglp<'a> {
    data: FontData<'a>,
    position: usize,
    sheets: Range<usize>,
}

impl<'a> Section<'a> for Tglp<'a> {
    const TAG: Tag = TAG;
    const HEADER_LEN: usize = TGLP_HEADER_LEN;

    fn read_section(data: FontData<'a>, position: usize) -> Result<Self, ReadError> {
        let sheet_count = data.read_at::<u8>(10)? as usize;
        let sheet_size = data.read_at::<u32>(12)? as usize;
        let data_offset = data.read_at::<u32>(28)? as usize;
        let start = data_offset
            .checked_sub(position)
            .filter(|start| *start >= TGLP_HEADER_LEN)
            .ok_or(ReadError::MalformedData(
                "sheet data overlaps the TGLP header",
            ))?;
        let end = sheet_size
            .checked_mul(sheet_count)
            .and_then(|len| len.checked_add(start))
            .ok_or(ReadError::TruncatedInput)?;
        if end > data.len() {
            return Err(ReadError::TruncatedInput);
        }
        Ok(Tglp {
            data,
            position,
            sheets: start..end,
        })
    }
}

impl<'a> Tglp<'a> {
    /// The absolute position of this section in the file.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn section_size(&self) -> u32 {
        self.data.read_at(4).unwrap_or_default()
    }

    pub fn cell_width(&self) -> u8 {
        self.data.read_at(8).unwrap_or_default()
    }

    pub fn cell_height(&self) -> u8 {
        self.data.read_at(9).unwrap_or_default()
    }

    pub fn sheet_count(&self) -> u8 {
        self.data.read_at(10).unwrap_or_default()
    }

    pub fn max_char_width(&self) -> u8 {
        self.data.read_at(11).unwrap_or_default()
    }

    /// The size of a single sheet, in bytes.
    pub fn sheet_size(&self) -> u32 {
        self.data.read_at(12).unwrap_or_default()
    }

    pub fn baseline_position(&self) -> u16 {
        self.data.read_at(16).unwrap_or_default()
    }

    /// The pixel format of the sheets.
    pub fn sheet_format(&self) -> u16 {
        self.data.read_at(18).unwrap_or_default()
    }

    pub fn num_columns(&self) -> u16 {
        self.data.read_at(20).unwrap_or_default()
    }

    pub fn num_rows(&self) -> u16 {
        self.data.read_at(22).unwrap_or_default()
    }

    pub fn sheet_width(&self) -> u16 {
        self.data.read_at(24).unwrap_or_default()
    }

    pub fn sheet_height(&self) -> u16 {
        self.data.read_at(26).unwrap_or_default()
    }

    /// The absolute position of the first sheet in the file.
    pub fn sheet_data_offset(&self) -> u32 {
        self.data.read_at(28).unwrap_or_default()
    }

    /// The bytes of all sheets, back to back.
    pub fn sheet_data(&self) -> &'a [u8] {
        self.data
            .slice(self.sheets.clone())
            .map(|data| data.as_bytes())
            .unwrap_or_default()
    }

    /// Bytes between the header and the sheet data.
    pub fn leading_padding(&self) -> &'a [u8] {
        self.data
            .slice(TGLP_HEADER_LEN..self.sheets.start)
            .map(|data| data.as_bytes())
            .unwrap_or_default()
    }

    /// Bytes after the sheet data, up to the declared section size.
    pub fn trailing_padding(&self) -> &'a [u8] {
        self.data
            .split_off(self.sheets.end)
            .map(|data| data.as_bytes())
            .unwrap_or_default()
    }
}
