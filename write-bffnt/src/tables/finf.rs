//! The font info section

use read::tables::finf as read_finf;

pub use read_finf::{FINF_SECTION_LEN, TAG};

use super::{cwdh::CharWidths, ffnt::FFNT_HEADER_LEN};
use crate::{
    error::RangeError,
    from_obj::FromTableRef,
    round::scale,
    write::{stored_offset, FontWrite, TableWriter},
};

/// Global font metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Finf {
    pub font_type: u8,
    pub height: u8,
    pub width: u8,
    pub ascent: u8,
    pub line_feed: u16,
    pub alter_char_index: u16,
    pub default_widths: CharWidths,
    pub encoding: u8,
}

/// The absolute positions of the sections that `FINF` points to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionOffsets {
    pub tglp: usize,
    pub cwdh: usize,
    pub cmap: usize,
}

impl Finf {
    /// Return a copy with the metrics multiplied by `factor`.
    ///
    /// The font type, alternate glyph and encoding are unchanged.
    pub fn scaled(&self, factor: f64) -> Result<Self, RangeError> {
        Ok(Finf {
            height: scale(self.height, factor, "height")?,
            width: scale(self.width, factor, "width")?,
            ascent: scale(self.ascent, factor, "ascent")?,
            line_feed: scale(self.line_feed, factor, "line_feed")?,
            default_widths: self.default_widths.scaled(factor)?,
            ..self.clone()
        })
    }

    /// Encode the section, which always directly follows the header.
    pub fn encode(&self, offsets: SectionOffsets) -> Result<Vec<u8>, RangeError> {
        let tglp = stored_offset(offsets.tglp, "tglp offset")?;
        let cwdh = stored_offset(offsets.cwdh, "cwdh offset")?;
        let cmap = stored_offset(offsets.cmap, "cmap offset")?;
        let mut writer = TableWriter::at(FFNT_HEADER_LEN);
        writer.section(TAG, |writer| {
            self.font_type.write_into(writer);
            self.height.write_into(writer);
            self.width.write_into(writer);
            self.ascent.write_into(writer);
            self.line_feed.write_into(writer);
            self.alter_char_index.write_into(writer);
            self.default_widths.write_into(writer);
            self.encoding.write_into(writer);
            tglp.write_into(writer);
            cwdh.write_into(writer);
            cmap.write_into(writer);
        });
        debug_assert_eq!(writer.len(), FINF_SECTION_LEN);
        Ok(writer.into_data())
    }
}

impl FromTableRef<read_finf::Finf<'_>> for Finf {
    fn from_table_ref(from: &read_finf::Finf) -> Self {
        Finf {
            font_type: from.font_type(),
            height: from.height(),
            width: from.width(),
            ascent: from.ascent(),
            line_feed: from.line_feed(),
            alter_char_index: from.alter_char_index(),
            default_widths: CharWidths::from_table_ref(&from.default_widths()),
            encoding: from.encoding(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bffnt_test_data::SIMPLE;
    use read::BffntRef;

    fn simple() -> Finf {
        Finf::from_table_ref(&BffntRef::new(SIMPLE).unwrap().finf())
    }

    #[test]
    fn encode_offsets() {
        let offsets = SectionOffsets {
            tglp: 0x34,
            cwdh: 0x64,
            cmap: 0x98,
        };
        let bytes = simple().encode(offsets).unwrap();
        assert_eq!(bytes, &SIMPLE[FFNT_HEADER_LEN..FFNT_HEADER_LEN + FINF_SECTION_LEN]);
    }

    #[test]
    fn scale_metrics() {
        let finf = simple();
        let scaled = finf.scaled(1.5).unwrap();
        assert_eq!(scaled.height, 18);
        assert_eq!(scaled.width, 15);
        assert_eq!(scaled.ascent, 15);
        assert_eq!(scaled.line_feed, 21);
        assert_eq!(scaled.default_widths, CharWidths::new(0, 15, 17));
        assert_eq!(scaled.alter_char_index, finf.alter_char_index);
        assert_eq!(scaled.encoding, finf.encoding);
        assert!(finf.scaled(30.0).is_err());
    }
}
