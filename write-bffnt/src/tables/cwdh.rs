//! Character width blocks

use read::tables::cwdh as read_cwdh;
use types::Tag;

use crate::{
    error::RangeError,
    from_obj::FromTableRef,
    round::scale,
    validate::{Validate, ValidationCtx},
    write::{ChainBlock, FontWrite, TableWriter},
};

pub use read_cwdh::TAG;

/// The horizontal metrics of a single glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharWidths {
    /// Space to the left of the glyph's pixels; may be negative.
    pub left: i8,
    /// Width of the glyph's pixels within its cell.
    pub glyph_width: u8,
    /// The advance.
    pub char_width: u8,
}

impl CharWidths {
    pub fn new(left: i8, glyph_width: u8, char_width: u8) -> Self {
        CharWidths {
            left,
            glyph_width,
            char_width,
        }
    }

    /// Return a copy with every field multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Result<Self, RangeError> {
        Ok(CharWidths {
            left: scale(self.left, factor, "left")?,
            glyph_width: scale(self.glyph_width, factor, "glyph_width")?,
            char_width: scale(self.char_width, factor, "char_width")?,
        })
    }
}

/// A block of widths for the contiguous glyph range `start_index..=end_index`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cwdh {
    pub start_index: u16,
    pub end_index: u16,
    /// One entry per glyph in the range.
    pub widths: Vec<CharWidths>,
}

impl Cwdh {
    /// Create a block starting at `start_index`, covering one glyph per entry.
    ///
    /// Fails if the last glyph would be past `0xFFFF`.
    pub fn new(start_index: u16, widths: Vec<CharWidths>) -> Result<Self, RangeError> {
        let end = (start_index as usize + widths.len()).saturating_sub(1);
        let end_index = u16::try_from(end).map_err(|_| RangeError::new("end_index", end as f64))?;
        Ok(Cwdh {
            start_index,
            end_index,
            widths,
        })
    }

    /// `true` if `glyph` falls in this block's range.
    pub fn contains(&self, glyph: u16) -> bool {
        (self.start_index..=self.end_index).contains(&glyph)
    }

    pub fn get(&self, glyph: u16) -> Option<&CharWidths> {
        self.widths
            .get(glyph.checked_sub(self.start_index)? as usize)
            .filter(|_| self.contains(glyph))
    }

    pub fn get_mut(&mut self, glyph: u16) -> Option<&mut CharWidths> {
        if !self.contains(glyph) {
            return None;
        }
        self.widths.get_mut((glyph - self.start_index) as usize)
    }

    /// Return a copy with every width multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Result<Self, RangeError> {
        Ok(Cwdh {
            start_index: self.start_index,
            end_index: self.end_index,
            widths: self
                .widths
                .iter()
                .map(|widths| widths.scaled(factor))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl FontWrite for CharWidths {
    fn write_into(&self, writer: &mut TableWriter) {
        self.left.write_into(writer);
        self.glyph_width.write_into(writer);
        self.char_width.write_into(writer);
    }
}

impl FontWrite for Cwdh {
    fn write_into(&self, writer: &mut TableWriter) {
        self.start_index.write_into(writer);
        self.end_index.write_into(writer);
        // next offset, patched in when the chain is written
        0u32.write_into(writer);
        self.widths.write_into(writer);
    }
}

impl ChainBlock for Cwdh {
    const TAG: Tag = TAG;
    const NEXT_FIELD: usize = 12;
}

impl Validate for Cwdh {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("Cwdh", |ctx| {
            if self.end_index < self.start_index {
                ctx.in_field("end_index", |ctx| {
                    ctx.report(format!(
                        "end index {} is before start index {}",
                        self.end_index, self.start_index
                    ))
                });
                return;
            }
            let expected = (self.end_index - self.start_index) as usize + 1;
            if self.widths.len() != expected {
                ctx.in_field("widths", |ctx| {
                    ctx.report(format!(
                        "expected {expected} entries for glyphs {}..={}, found {}",
                        self.start_index,
                        self.end_index,
                        self.widths.len()
                    ))
                });
            }
        })
    }
}

/// Check that a sequence of blocks covers one contiguous range of glyphs.
pub(crate) fn validate_chain(blocks: &[Cwdh], ctx: &mut ValidationCtx) {
    if blocks.is_empty() {
        ctx.report("the width chain must contain at least one block");
        return;
    }
    ctx.in_array(|ctx| {
        let mut prev: Option<&Cwdh> = None;
        for block in blocks {
            ctx.array_item(|ctx| {
                let Some(prev) = prev else {
                    return;
                };
                if block.start_index as u32 != prev.end_index as u32 + 1 {
                    ctx.in_field("start_index", |ctx| {
                        ctx.report(format!(
                            "block [{}-{}] does not follow [{}-{}]",
                            block.start_index, block.end_index, prev.start_index, prev.end_index
                        ))
                    });
                }
            });
            prev = Some(block);
        }
    });
}

impl FromTableRef<read_cwdh::CharWidths> for CharWidths {
    fn from_table_ref(from: &read_cwdh::CharWidths) -> Self {
        CharWidths {
            left: from.left(),
            glyph_width: from.glyph_width(),
            char_width: from.char_width(),
        }
    }
}

impl FromTableRef<read_cwdh::Cwdh<'_>> for Cwdh {
    fn from_table_ref(from: &read_cwdh::Cwdh) -> Self {
        Cwdh {
            start_index: from.start_index(),
            end_index: from.end_index(),
            widths: from
                .widths()
                .iter()
                .map(CharWidths::from_table_ref)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::encode_chain;
    use bffnt_test_data::bebuffer::BeBuffer;
    use read::{chain::Chain, FontData};

    fn block(start: u16, end: u16) -> Cwdh {
        let widths = (start..=end)
            .map(|i| CharWidths::new(0, i as u8, i as u8 + 1))
            .collect();
        Cwdh {
            start_index: start,
            end_index: end,
            widths,
        }
    }

    fn validate_blocks(blocks: &[Cwdh]) -> Result<(), crate::validate::ValidationReport> {
        struct Blocks<'a>(&'a [Cwdh]);
        impl Validate for Blocks<'_> {
            fn validate_impl(&self, ctx: &mut ValidationCtx) {
                ctx.in_table("Document", |ctx| {
                    ctx.in_field("cwdhs", |ctx| {
                        self.0.to_vec().validate_impl(ctx);
                        validate_chain(self.0, ctx);
                    })
                })
            }
        }
        Blocks(blocks).validate()
    }

    #[test]
    fn contiguous_chain() {
        assert!(validate_blocks(&[block(0, 9), block(10, 19)]).is_ok());
        let report = validate_blocks(&[block(0, 9), block(11, 19)]).unwrap_err();
        assert_eq!(report.len(), 1);
        let report = validate_blocks(&[block(0, 9), block(5, 19)]).unwrap_err();
        assert_eq!(report.len(), 1);
        assert!(validate_blocks(&[]).is_err());
    }

    #[test]
    fn width_count_mismatch() {
        let mut bad = block(0, 3);
        bad.widths.pop();
        assert!(bad.validate().is_err());
        bad.end_index = 2;
        assert!(bad.validate().is_ok());
    }

    #[test]
    fn lookup() {
        let mut cwdh = Cwdh::new(3, vec![CharWidths::new(1, 2, 3); 2]).unwrap();
        assert_eq!(cwdh.end_index, 4);
        assert!(cwdh.get(2).is_none());
        assert!(cwdh.get(5).is_none());
        cwdh.get_mut(4).unwrap().char_width = 9;
        assert_eq!(cwdh.get(4), Some(&CharWidths::new(1, 2, 9)));
    }

    #[test]
    fn glyph_range_overflow() {
        let last = Cwdh::new(0xFFFE, vec![CharWidths::default(); 2]).unwrap();
        assert_eq!(last.end_index, 0xFFFF);
        let err = Cwdh::new(0xFFFF, vec![CharWidths::default(); 2]).unwrap_err();
        assert_eq!(err, RangeError::new("end_index", 0x1_0000 as f64));
    }

    #[test]
    fn encode_and_read_back() {
        let blocks = vec![block(0, 2), block(3, 4)];
        let bytes = encode_chain(&blocks, 0).unwrap();
        let expected = BeBuffer::new()
            .push(TAG)
            .push(28u32)
            .extend([0u16, 2])
            .push(36u32)
            .extend([0u8, 0, 1, 0, 1, 2, 0, 2, 3])
            .pad4()
            .push(TAG)
            .push(24u32)
            .extend([3u16, 4])
            .push(0u32)
            .extend([0u8, 3, 4, 0, 4, 5])
            .pad4();
        assert_eq!(bytes, expected.as_slice());

        let read_back = Chain::<read_cwdh::Cwdh>::new(FontData::new(&bytes), 8)
            .map(|block| Cwdh::from_table_ref(&block.unwrap()))
            .collect::<Vec<_>>();
        assert_eq!(read_back, blocks);
    }

    #[test]
    fn scale_widths() {
        let widths = CharWidths::new(-1, 5, 6).scaled(2.0).unwrap();
        assert_eq!(widths, CharWidths::new(-2, 10, 12));
        assert!(CharWidths::new(0, 200, 6).scaled(2.0).is_err());
    }
}
