//! The font info section
//!
//! Global metrics, plus the offsets of the texture page and of the heads of
//! the width and character map chains.

use types::Tag;

use super::cwdh::CharWidths;
use crate::{FontData, ReadError, Section};

/// 'FINF'
pub const TAG: Tag = Tag::new(b"FINF");

/// The size of the font info section, including its section header.
pub const FINF_SECTION_LEN: usize = 32;

/// The font info section.
#[derive(Clone, Copy, Debug)]
pub struct Finf<'a> {
    data: FontData<'a>,
}

impl<'a> Section<'a> for Finf<'a> {
    const TAG: Tag = TAG;
    const HEADER_LEN: usize = FINF_SECTION_LEN;

    fn read_section(data: FontData<'a>, _position: usize) -> Result<Self, ReadError> {
        let data = data
            .slice(..FINF_SECTION_LEN)
            .ok_or(ReadError::TruncatedInput)?;
        for field in [20, 24, 28] {
            if data.read_at::<u32>(field)? < 8 {
                return Err(ReadError::MalformedData("FINF offset is null"));
            }
        }
        Ok(Finf { data })
    }
}

impl<'a> Finf<'a> {
    pub fn section_size(&self) -> u32 {
        self.data.read_at(4).unwrap_or_default()
    }

    pub fn font_type(&self) -> u8 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// The line height.
    pub fn height(&self) -> u8 {
        self.data.read_at(9).unwrap_or_default()
    }

    pub fn width(&self) -> u8 {
        self.data.read_at(10).unwrap_or_default()
    }

    pub fn ascent(&self) -> u8 {
        self.data.read_at(11).unwrap_or_default()
    }

    /// The leading, in pixels.
    pub fn line_feed(&self) -> u16 {
        self.data.read_at(12).unwrap_or_default()
    }

    /// The glyph used for characters missing from the font.
    pub fn alter_char_index(&self) -> u16 {
        self.data.read_at(14).unwrap_or_default()
    }

    /// Widths used for glyphs without an entry in the width chain.
    pub fn default_widths(&self) -> CharWidths {
        self.data
            .read_array::<CharWidths>(16..19)
            .ok()
            .and_then(|widths| widths.first().copied())
            .unwrap_or_default()
    }

    pub fn encoding(&self) -> u8 {
        self.data.read_at(19).unwrap_or_default()
    }

    /// Offset to the texture page payload (just past the `TGLP` header).
    pub fn tglp_offset(&self) -> u32 {
        self.data.read_at(20).unwrap_or_default()
    }

    /// Offset to the first width block payload.
    pub fn cwdh_offset(&self) -> u32 {
        self.data.read_at(24).unwrap_or_default()
    }

    /// Offset to the first character map block payload.
    pub fn cmap_offset(&self) -> u32 {
        self.data.read_at(28).unwrap_or_default()
    }
}
