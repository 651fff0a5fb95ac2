//! An owned, editable container

use std::collections::BTreeMap;

use read::{BffntRef, ReadError};
use types::{GlyphIndex, Tag};

use crate::{
    error::{Error, RangeError},
    from_obj::{FromTableRef, ToOwnedTable},
    tables::{
        cmap::{self, Cmap},
        cwdh::{self, CharWidths, Cwdh},
        ffnt::Ffnt,
        finf::{Finf, SectionOffsets},
        krng::Krng,
        tglp::{SheetLayout, Tglp, TGLP_POSITION},
    },
    validate::{Validate, ValidationCtx, ValidationReport},
    write::encode_chain,
};

/// A complete font container.
///
/// Sections are stored in the order they are written. Offsets between
/// sections are not stored; they are recomputed on [`encode`](Self::encode).
///
/// A valid document survives `decode(encode(doc))` unchanged, with the
/// exception of `header.file_size`, which always holds the size of the file
/// that was last decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub header: Ffnt,
    pub finf: Finf,
    pub tglp: Tglp,
    pub cwdhs: Vec<Cwdh>,
    pub cmaps: Vec<Cmap>,
    /// Empty if the container has no kerning.
    pub krng: Krng,
}

impl Document {
    /// Parse a container into an owned document.
    pub fn decode(data: &[u8]) -> Result<Self, ReadError> {
        let font = BffntRef::new(data)?;
        if log::log_enabled!(log::Level::Debug) {
            for record in font.section_records()? {
                log::debug!(
                    "'{}' at {:#X}..{:#X}",
                    record.tag,
                    record.position,
                    record.end()
                );
            }
        }
        let header: Ffnt = font.header().to_owned_table();
        if header.file_size as usize != data.len() {
            log::warn!(
                "header records a file size of {:#X}, but the file is {:#X} bytes",
                header.file_size,
                data.len()
            );
        }

        let tglp = font.tglp()?;
        check_padding(read::tables::tglp::TAG, tglp.position(), tglp.leading_padding());
        check_padding(read::tables::tglp::TAG, tglp.position(), tglp.trailing_padding());

        let cwdhs = font
            .cwdhs()
            .map(|block| {
                let block = block?;
                check_padding(cwdh::TAG, block.position(), block.padding());
                Ok(Cwdh::from_table_ref(&block))
            })
            .collect::<Result<_, ReadError>>()?;
        let cmaps = font
            .cmaps()
            .map(|block| {
                let block = block?;
                check_padding(cmap::TAG, block.position(), block.padding());
                Ok(Cmap::from_table_ref(&block))
            })
            .collect::<Result<_, ReadError>>()?;
        let krng = match font.krng()? {
            Some(krng) => {
                check_padding(read::tables::krng::TAG, krng.position(), krng.padding());
                Krng::from_table_ref(&krng)
            }
            None => Krng::default(),
        };

        Ok(Document {
            header,
            finf: font.finf().to_owned_table(),
            tglp: tglp.to_owned_table(),
            cwdhs,
            cmaps,
            krng,
        })
    }

    /// Validate the document and write it out.
    ///
    /// Sections are written in a fixed order: header, `FINF`, `TGLP`, the
    /// width chain, the character map chain and finally `KRNG`, if there are
    /// any kerning pairs.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        self.validate()?;

        let tglp_position = TGLP_POSITION;
        let tglp = self.tglp.encode(tglp_position)?;
        let cwdh_position = tglp_position + tglp.len();
        let cwdhs = encode_chain(&self.cwdhs, cwdh_position)?;
        let cmap_position = cwdh_position + cwdhs.len();
        let cmaps = encode_chain(&self.cmaps, cmap_position)?;
        let krng_position = cmap_position + cmaps.len();
        let krng = self.krng.encode(krng_position)?;

        let total_len = krng_position + krng.len();
        let file_size = u32::try_from(total_len)
            .map_err(|_| RangeError::new("file size", total_len as f64))?;
        let finf = self.finf.encode(SectionOffsets {
            tglp: tglp_position,
            cwdh: cwdh_position,
            cmap: cmap_position,
        })?;

        let mut data = Vec::with_capacity(total_len);
        data.extend(self.header.encode(file_size));
        for section in [finf, tglp, cwdhs, cmaps, krng] {
            data.extend(section);
        }
        debug_assert_eq!(data.len(), total_len);
        log::debug!("encoded {total_len:#X} bytes");
        Ok(data)
    }

    /// Scale every metric in the document by `factor`.
    ///
    /// This covers the global metrics, the cell and sheet geometry, every
    /// glyph's widths and every kerning value. The sheets themselves are not
    /// touched; see [`replace_sheets`](Self::replace_sheets).
    ///
    /// If any scaled value does not fit its field the document is left
    /// unchanged.
    pub fn scale(&mut self, factor: f64) -> Result<(), RangeError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(RangeError::new("scale factor", factor));
        }
        let finf = self.finf.scaled(factor)?;
        let tglp = self.tglp.scaled(factor)?;
        let cwdhs = self
            .cwdhs
            .iter()
            .map(|block| block.scaled(factor))
            .collect::<Result<_, _>>()?;
        let krng = self.krng.scaled(factor)?;
        log::debug!("scaled document by {factor}");
        self.finf = finf;
        self.tglp = tglp;
        self.cwdhs = cwdhs;
        self.krng = krng;
        Ok(())
    }

    /// Every mapped `(code, glyph)` pair, ordered by glyph and then by code.
    pub fn glyph_indexes(&self) -> Vec<(u16, GlyphIndex)> {
        let mut pairs = self
            .cmaps
            .iter()
            .flat_map(Cmap::mappings)
            .collect::<Vec<_>>();
        pairs.sort_unstable_by_key(|(code, glyph)| (*glyph, *code));
        pairs
    }

    /// A lookup from character code to glyph.
    pub fn char_map(&self) -> BTreeMap<u16, GlyphIndex> {
        self.cmaps.iter().flat_map(Cmap::mappings).collect()
    }

    /// The widths of `glyph`, if it is covered by the width chain.
    pub fn widths(&self, glyph: GlyphIndex) -> Option<CharWidths> {
        self.cwdhs
            .iter()
            .find_map(|block| block.get(glyph.to_u16()))
            .copied()
    }

    pub fn widths_mut(&mut self, glyph: GlyphIndex) -> Option<&mut CharWidths> {
        self.cwdhs
            .iter_mut()
            .find(|block| block.contains(glyph.to_u16()))
            .and_then(|block| block.get_mut(glyph.to_u16()))
    }

    /// Replace the texture sheets, along with the layout that describes them.
    pub fn replace_sheets(
        &mut self,
        layout: SheetLayout,
        data: Vec<u8>,
    ) -> Result<(), ValidationReport> {
        self.tglp.replace_sheets(layout, data)
    }

    /// The kerning adjustment between two characters, or zero.
    pub fn kern(&self, first: u16, second: u16) -> i16 {
        self.krng.kern(first, second)
    }
}

fn check_padding(tag: Tag, position: usize, padding: &[u8]) {
    if padding.iter().any(|byte| *byte != 0) {
        log::warn!("non-zero padding in '{tag}' at {position:#X}");
    }
}

impl Validate for Document {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("Document", |ctx| {
            ctx.in_field("header", |ctx| self.header.validate_impl(ctx));
            ctx.in_field("tglp", |ctx| self.tglp.validate_impl(ctx));
            ctx.in_field("cwdhs", |ctx| {
                self.cwdhs.validate_impl(ctx);
                cwdh::validate_chain(&self.cwdhs, ctx);
            });
            ctx.in_field("cmaps", |ctx| {
                self.cmaps.validate_impl(ctx);
                cmap::validate_chain(&self.cmaps, ctx);
                for (code, glyph) in self.glyph_indexes() {
                    if !self.cwdhs.iter().any(|block| block.contains(glyph.to_u16())) {
                        ctx.report(format!(
                            "code {code:#06X} maps to {glyph}, which has no widths"
                        ));
                    }
                }
            });
            ctx.in_field("krng", |ctx| self.krng.validate_impl(ctx));
        })
    }
}
