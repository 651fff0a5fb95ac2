//! Character map blocks

use std::collections::BTreeMap;

use read::tables::cmap as read_cmap;
use types::{GlyphIndex, Tag};

pub use read_cmap::{MappingMethod, TAG};

use crate::{
    from_obj::FromTableRef,
    validate::{Validate, ValidationCtx},
    write::{ChainBlock, FontWrite, TableWriter},
};

/// A single entry in a [`CmapMapping::Scan`] block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanEntry {
    pub code: u16,
    pub glyph: GlyphIndex,
}

/// The three ways a block can map its codes to glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CmapMapping {
    /// Codes map to consecutive glyphs, starting at the given glyph.
    Direct(u16),
    /// One glyph per code, [`GlyphIndex::NOT_MAPPED`] for gaps.
    Table(Vec<GlyphIndex>),
    /// Pairs sorted by code.
    Scan(Vec<ScanEntry>),
}

/// A block mapping the codes in `code_begin..=code_end` to glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cmap {
    pub code_begin: u16,
    pub code_end: u16,
    pub mapping: CmapMapping,
}

impl ScanEntry {
    pub fn new(code: u16, glyph: u16) -> Self {
        ScanEntry {
            code,
            glyph: GlyphIndex::new(glyph),
        }
    }
}

impl CmapMapping {
    pub fn method(&self) -> MappingMethod {
        match self {
            CmapMapping::Direct(_) => MappingMethod::Direct,
            CmapMapping::Table(_) => MappingMethod::Table,
            CmapMapping::Scan(_) => MappingMethod::Scan,
        }
    }
}

impl Cmap {
    pub fn new(code_begin: u16, code_end: u16, mapping: CmapMapping) -> Self {
        Cmap {
            code_begin,
            code_end,
            mapping,
        }
    }

    /// Map a single code to a glyph, if this block maps it.
    pub fn map_code(&self, code: u16) -> Option<GlyphIndex> {
        if code < self.code_begin || code > self.code_end {
            return None;
        }
        let glyph = match &self.mapping {
            CmapMapping::Direct(base) => {
                GlyphIndex::new(base.checked_add(code - self.code_begin)?)
            }
            CmapMapping::Table(glyphs) => *glyphs.get((code - self.code_begin) as usize)?,
            CmapMapping::Scan(entries) => entries
                .iter()
                .find(|entry| entry.code == code)
                .map(|entry| entry.glyph)?,
        };
        glyph.is_mapped().then_some(glyph)
    }

    /// Every `(code, glyph)` pair mapped by this block.
    ///
    /// Codes whose glyph is [`GlyphIndex::NOT_MAPPED`] are skipped.
    pub fn mappings(&self) -> Vec<(u16, GlyphIndex)> {
        let codes = self.code_begin..=self.code_end;
        let pairs: Vec<_> = match &self.mapping {
            CmapMapping::Direct(base) => codes
                .map_while(|code| {
                    let glyph = base.checked_add(code - self.code_begin)?;
                    Some((code, GlyphIndex::new(glyph)))
                })
                .collect(),
            CmapMapping::Table(glyphs) => codes.zip(glyphs.iter().copied()).collect(),
            CmapMapping::Scan(entries) => entries
                .iter()
                .map(|entry| (entry.code, entry.glyph))
                .collect(),
        };
        pairs
            .into_iter()
            .filter(|(_, glyph)| glyph.is_mapped())
            .collect()
    }
}

impl FontWrite for ScanEntry {
    fn write_into(&self, writer: &mut TableWriter) {
        self.code.write_into(writer);
        self.glyph.write_into(writer);
    }
}

impl FontWrite for Cmap {
    fn write_into(&self, writer: &mut TableWriter) {
        self.code_begin.write_into(writer);
        self.code_end.write_into(writer);
        self.mapping.method().to_u16().write_into(writer);
        // reserved
        0u16.write_into(writer);
        // next offset, patched in when the chain is written
        0u32.write_into(writer);
        match &self.mapping {
            CmapMapping::Direct(base) => base.write_into(writer),
            CmapMapping::Table(glyphs) => glyphs.write_into(writer),
            CmapMapping::Scan(entries) => {
                (entries.len() as u16).write_into(writer);
                entries.write_into(writer);
            }
        }
    }
}

impl ChainBlock for Cmap {
    const TAG: Tag = TAG;
    const NEXT_FIELD: usize = 16;
}

impl Validate for Cmap {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("Cmap", |ctx| {
            if self.code_end < self.code_begin {
                ctx.in_field("code_end", |ctx| {
                    ctx.report(format!(
                        "code end {:#06X} is before code begin {:#06X}",
                        self.code_end, self.code_begin
                    ))
                });
                return;
            }
            let range_len = (self.code_end - self.code_begin) as usize + 1;
            ctx.in_field("mapping", |ctx| match &self.mapping {
                CmapMapping::Direct(base) => {
                    if *base as usize + range_len > GlyphIndex::NOT_MAPPED.to_u16() as usize {
                        ctx.report(format!(
                            "direct mapping from glyph {base} overflows for {range_len} codes"
                        ));
                    }
                }
                CmapMapping::Table(glyphs) => {
                    if glyphs.len() != range_len {
                        ctx.report(format!(
                            "expected {range_len} table entries, found {}",
                            glyphs.len()
                        ));
                    }
                }
                CmapMapping::Scan(entries) => {
                    if entries.len() > u16::MAX as usize {
                        ctx.report("too many scan entries");
                    }
                    if entries
                        .iter()
                        .any(|entry| entry.code < self.code_begin || entry.code > self.code_end)
                    {
                        ctx.report("scan entry code outside the block's range");
                    }
                    if entries.windows(2).any(|pair| pair[0].code >= pair[1].code) {
                        ctx.report("scan entries must be strictly ascending by code");
                    }
                }
            });
        })
    }
}

/// Check the chain as a whole: it must not be empty, and no code may be
/// mapped by more than one block.
///
/// The raw code ranges of blocks are allowed to overlap, as long as only one
/// of them actually maps each code.
pub(crate) fn validate_chain(blocks: &[Cmap], ctx: &mut ValidationCtx) {
    if blocks.is_empty() {
        ctx.report("the character map chain must contain at least one block");
        return;
    }
    let mut seen = BTreeMap::new();
    ctx.in_array(|ctx| {
        for (i, block) in blocks.iter().enumerate() {
            ctx.array_item(|ctx| {
                for (code, _) in block.mappings() {
                    if let Some(first) = seen.insert(code, i) {
                        ctx.report(format!(
                            "code {code:#06X} is already mapped by block {first}"
                        ));
                    }
                }
            })
        }
    });
}

impl FromTableRef<read_cmap::ScanEntry> for ScanEntry {
    fn from_table_ref(from: &read_cmap::ScanEntry) -> Self {
        ScanEntry {
            code: from.code(),
            glyph: from.glyph(),
        }
    }
}

impl FromTableRef<read_cmap::Cmap<'_>> for Cmap {
    fn from_table_ref(from: &read_cmap::Cmap) -> Self {
        let mapping = match from.mapping() {
            read_cmap::CmapMapping::Direct(base) => CmapMapping::Direct(base),
            read_cmap::CmapMapping::Table(glyphs) => {
                CmapMapping::Table(glyphs.iter().map(GlyphIndex::from_table_ref).collect())
            }
            read_cmap::CmapMapping::Scan(entries) => {
                CmapMapping::Scan(entries.iter().map(ScanEntry::from_table_ref).collect())
            }
        };
        Cmap {
            code_begin: from.code_begin(),
            code_end: from.code_end(),
            mapping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::encode_chain;
    use read::{chain::Chain, FontData};

    fn gids(raw: &[u16]) -> Vec<GlyphIndex> {
        raw.iter().copied().map(GlyphIndex::new).collect()
    }

    fn validate_blocks(blocks: &[Cmap]) -> Result<(), crate::validate::ValidationReport> {
        struct Blocks<'a>(&'a [Cmap]);
        impl Validate for Blocks<'_> {
            fn validate_impl(&self, ctx: &mut ValidationCtx) {
                ctx.in_table("Document", |ctx| {
                    ctx.in_field("cmaps", |ctx| {
                        self.0.to_vec().validate_impl(ctx);
                        validate_chain(self.0, ctx);
                    })
                })
            }
        }
        Blocks(blocks).validate()
    }

    #[test]
    fn sentinel_is_not_a_mapping() {
        let table = Cmap::new(0x61, 0x63, CmapMapping::Table(gids(&[2, 0xFFFF, 3])));
        assert_eq!(table.map_code(0x62), None);
        assert_eq!(
            table.mappings(),
            [(0x61, GlyphIndex::new(2)), (0x63, GlyphIndex::new(3))]
        );
        let scan = Cmap::new(
            0x20,
            0x7E,
            CmapMapping::Scan(vec![ScanEntry::new(0x20, 4), ScanEntry::new(0x7E, 0xFFFF)]),
        );
        assert_eq!(scan.mappings(), [(0x20, GlyphIndex::new(4))]);
    }

    #[test]
    fn table_length() {
        let table = Cmap::new(0x61, 0x63, CmapMapping::Table(gids(&[2, 3])));
        assert!(table.validate().is_err());
    }

    #[test]
    fn scan_order_and_range() {
        let unsorted = Cmap::new(
            0x20,
            0x7E,
            CmapMapping::Scan(vec![ScanEntry::new(0x30, 1), ScanEntry::new(0x20, 2)]),
        );
        assert!(unsorted.validate().is_err());
        let outside = Cmap::new(0x20, 0x7E, CmapMapping::Scan(vec![ScanEntry::new(0x7F, 1)]));
        assert!(outside.validate().is_err());
    }

    #[test]
    fn direct_overflow() {
        // the last code may map to 0xFFFE, but not to the sentinel
        assert!(Cmap::new(0, 0xF, CmapMapping::Direct(0xFFEF)).validate().is_ok());
        assert!(Cmap::new(0, 0xF, CmapMapping::Direct(0xFFF0)).validate().is_err());
    }

    #[test]
    fn overlapping_ranges_are_fine_duplicate_codes_are_not() {
        let direct = Cmap::new(0x41, 0x42, CmapMapping::Direct(0));
        let scan = Cmap::new(0x20, 0x7E, CmapMapping::Scan(vec![ScanEntry::new(0x20, 4)]));
        assert!(validate_blocks(&[direct.clone(), scan]).is_ok());

        let clash = Cmap::new(0x20, 0x7E, CmapMapping::Scan(vec![ScanEntry::new(0x41, 4)]));
        let report = validate_blocks(&[direct, clash]).unwrap_err();
        assert_eq!(report.len(), 1);
        assert!(validate_blocks(&[]).is_err());
    }

    #[test]
    fn encode_and_read_back() {
        let blocks = vec![
            Cmap::new(0x41, 0x42, CmapMapping::Direct(0)),
            Cmap::new(0x61, 0x63, CmapMapping::Table(gids(&[2, 0xFFFF, 3]))),
            Cmap::new(
                0x20,
                0x7E,
                CmapMapping::Scan(vec![ScanEntry::new(0x20, 4), ScanEntry::new(0x7E, 0xFFFF)]),
            ),
        ];
        // the same blocks as in the shared sample, which starts them at 0x98
        let bytes = encode_chain(&blocks, 0x98).unwrap();
        assert_eq!(bytes, &bffnt_test_data::SIMPLE[0x98..0xEC]);

        let data = FontData::new(bffnt_test_data::SIMPLE);
        let read_back = Chain::<read_cmap::Cmap>::new(data, 0xA0)
            .map(|block| Cmap::from_table_ref(&block.unwrap()))
            .collect::<Vec<_>>();
        assert_eq!(read_back, blocks);
    }
}
