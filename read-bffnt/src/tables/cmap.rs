//! Character map blocks
//!
//! Each block maps the character codes in `code_begin..=code_end` to glyph
//! indices, using one of three methods. Blocks are linked through their
//! next offset.

use types::{BigEndian, FixedSize, GlyphIndex, Tag};

use crate::{chain::ChainLink, FontData, ReadError, Section};

/// 'CMAP'
pub const TAG: Tag = Tag::new(b"CMAP");

/// The size of the block header, including the section header.
pub const CMAP_HEADER_LEN: usize = 20;

/// How the codes of a block are mapped to glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum MappingMethod {
    /// Codes map to consecutive glyphs, starting at a base index.
    Direct = 0,
    /// One glyph entry per code in the range.
    Table = 1,
    /// An explicit list of code and glyph pairs.
    Scan = 2,
}

impl MappingMethod {
    pub fn new(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(MappingMethod::Direct),
            1 => Some(MappingMethod::Table),
            2 => Some(MappingMethod::Scan),
            _ => None,
        }
    }

    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// A single entry in a [`CmapMapping::Scan`] block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct ScanEntry {
    pub code: BigEndian<u16>,
    pub glyph: BigEndian<GlyphIndex>,
}

impl ScanEntry {
    pub fn code(&self) -> u16 {
        self.code.get()
    }

    pub fn glyph(&self) -> GlyphIndex {
        self.glyph.get()
    }
}

impl FixedSize for ScanEntry {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN + GlyphIndex::RAW_BYTE_LEN;
}

/// The method-specific payload of a block.
#[derive(Clone, Copy, Debug)]
pub enum CmapMapping<'a> {
    /// The glyph for `code_begin`; subsequent codes map to subsequent glyphs.
    Direct(u16),
    /// One glyph per code, [`GlyphIndex::NOT_MAPPED`] for gaps.
    Table(&'a [BigEndian<GlyphIndex>]),
    /// Pairs sorted by code.
    Scan(&'a [ScanEntry]),
}

/// A single block in the character map chain.
#[derive(Clone, Copy, Debug)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    position: usize,
    mapping: CmapMapping<'a>,
    payload_len: usize,
}

impl<'a> Section<'a> for Cmap<'a> {
    const TAG: Tag = TAG;
    const HEADER_LEN: usize = CMAP_HEADER_LEN;

    fn read_section(data: FontData<'a>, position: usize) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(8);
        let code_begin = cursor.read::<u16>()?;
        let code_end = cursor.read::<u16>()?;
        let method = cursor.read::<u16>()?;
        cursor.advance_by(6);
        if code_end < code_begin {
            return Err(ReadError::MalformedData("CMAP code end before code begin"));
        }
        let mapping = match MappingMethod::new(method) {
            Some(MappingMethod::Direct) => {
                let base = cursor.read::<u16>()?;
                let last = base as u32 + (code_end - code_begin) as u32;
                if last >= GlyphIndex::NOT_MAPPED.to_u16() as u32 {
                    return Err(ReadError::MalformedData("direct mapping overflows"));
                }
                CmapMapping::Direct(base)
            }
            Some(MappingMethod::Table) => {
                CmapMapping::Table(cursor.read_array((code_end - code_begin) as usize + 1)?)
            }
            Some(MappingMethod::Scan) => {
                let count = cursor.read::<u16>()?;
                CmapMapping::Scan(cursor.read_array(count as usize)?)
            }
            None => return Err(ReadError::InvalidFormat(method.into())),
        };
        Ok(Cmap {
            data,
            position,
            mapping,
            payload_len: cursor.position(),
        })
    }
}

impl<'a> Cmap<'a> {
    /// The absolute position of this block in the file.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn section_size(&self) -> u32 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// The first code covered by this block.
    pub fn code_begin(&self) -> u16 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// The last code covered by this block (inclusive).
    pub fn code_end(&self) -> u16 {
        self.data.read_at(10).unwrap_or_default()
    }

    pub fn method(&self) -> MappingMethod {
        match self.mapping {
            CmapMapping::Direct(_) => MappingMethod::Direct,
            CmapMapping::Table(_) => MappingMethod::Table,
            CmapMapping::Scan(_) => MappingMethod::Scan,
        }
    }

    /// Always zero in observed files.
    pub fn reserved(&self) -> u16 {
        self.data.read_at(14).unwrap_or_default()
    }

    pub fn next_offset(&self) -> u32 {
        self.data.read_at(16).unwrap_or_default()
    }

    pub fn mapping(&self) -> CmapMapping<'a> {
        self.mapping
    }

    /// Map a single code to a glyph, if this block maps it.
    pub fn map_code(&self, code: u16) -> Option<GlyphIndex> {
        if code < self.code_begin() || code > self.code_end() {
            return None;
        }
        let glyph = match self.mapping {
            CmapMapping::Direct(base) => GlyphIndex::new(base + (code - self.code_begin())),
            CmapMapping::Table(glyphs) => glyphs.get((code - self.code_begin()) as usize)?.get(),
            CmapMapping::Scan(entries) => entries
                .binary_search_by_key(&code, |entry| entry.code())
                .ok()
                .map(|idx| entries[idx].glyph())?,
        };
        glyph.is_mapped().then_some(glyph)
    }

    /// Iterate over all `(code, glyph)` pairs in this block.
    ///
    /// Codes without a glyph are skipped.
    pub fn iter_mappings(&self) -> impl Iterator<Item = (u16, GlyphIndex)> + 'a {
        let begin = self.code_begin();
        let end = self.code_end();
        let (direct, table, scan) = match self.mapping {
            CmapMapping::Direct(base) => (Some(base), None, None),
            CmapMapping::Table(glyphs) => (None, Some(glyphs), None),
            CmapMapping::Scan(entries) => (None, None, Some(entries)),
        };
        let direct = direct.into_iter().flat_map(move |base| {
            (begin..=end).map(move |code| (code, GlyphIndex::new(base + (code - begin))))
        });
        let table = table.into_iter().flat_map(move |glyphs| {
            (begin..=end)
                .zip(glyphs.iter())
                .map(|(code, glyph)| (code, glyph.get()))
        });
        let scan = scan.into_iter().flat_map(|entries| {
            entries
                .iter()
                .map(|entry| (entry.code(), entry.glyph()))
        });
        direct
            .chain(table)
            .chain(scan)
            .filter(|(_, glyph)| glyph.is_mapped())
    }

    /// Bytes after the mapping payload, up to the declared section size.
    pub fn padding(&self) -> &'a [u8] {
        self.data
            .split_off(self.payload_len)
            .map(|data| data.as_bytes())
            .unwrap_or_default()
    }
}

impl ChainLink for Cmap<'_> {
    fn next_offset(&self) -> u32 {
        Cmap::next_offset(self)
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

    fn header(begin: u16, end: u16, method: u16, size: u32) -> BeBuffer {
        BeBuffer::new()
            .push(TAG)
            .push(size)
            .push(begin)
            .push(end)
            .push(method)
            .push(0u16)
            .push(0u32)
    }

    fn read(buf: &BeBuffer) -> Result<Cmap, ReadError> {
        read_section(FontData::new(buf.as_slice()), 0)
    }

    #[test]
    fn direct() {
        let buf = header(0x30, 0x39, 0, 24).push(10u16).pad4();
        let cmap = read(&buf).unwrap();
        assert_eq!(cmap.method(), MappingMethod::Direct);
        assert_eq!(cmap.map_code(0x30), Some(GlyphIndex::new(10)));
        assert_eq!(cmap.map_code(0x39), Some(GlyphIndex::new(19)));
        assert_eq!(cmap.map_code(0x3A), None);
        assert_eq!(cmap.iter_mappings().count(), 10);
        assert_eq!(cmap.padding(), [0, 0]);
    }

    #[test]
    fn direct_overflow() {
        let buf = header(0, 0x10, 0, 24).push(0xFFF0u16).pad4();
        assert!(read(&buf).unwrap_err().is_format_error());
    }

    #[test]
    fn table() {
        let buf = header(0x61, 0x63, 1, 28)
            .extend([2u16, 0xFFFF, 3])
            .pad4();
        let cmap = read(&buf).unwrap();
        assert_eq!(cmap.map_code(0x61), Some(GlyphIndex::new(2)));
        assert_eq!(cmap.map_code(0x62), None);
        assert_eq!(
            cmap.iter_mappings().collect::<Vec<_>>(),
            [(0x61, GlyphIndex::new(2)), (0x63, GlyphIndex::new(3))]
        );
    }

    #[test]
    fn scan() {
        let buf = header(0x20, 0x7E, 2, 32)
            .push(2u16)
            .extend([0x20u16, 4, 0x7E, 0xFFFF])
            .pad4();
        let cmap = read(&buf).unwrap();
        assert_eq!(cmap.map_code(0x20), Some(GlyphIndex::new(4)));
        assert_eq!(cmap.map_code(0x21), None);
        assert_eq!(cmap.map_code(0x7E), None);
        assert_eq!(cmap.iter_mappings().count(), 1);
    }

    #[test]
    fn unknown_method() {
        let buf = header(0x20, 0x7E, 3, 24).push(0u32);
        assert_eq!(read(&buf).unwrap_err(), ReadError::InvalidFormat(3));
    }

    #[test]
    fn short_table() {
        let buf = header(0x20, 0x7E, 1, 24).push(0u32);
        assert_eq!(read(&buf).unwrap_err(), ReadError::TruncatedInput);
    }
}
