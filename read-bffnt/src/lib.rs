//! Reading Wii U BFFNT font containers
//!
//! This crate provides memory safe zero-allocation parsing of `.bffnt`
//! files. It is unopinionated, and attempts to provide raw access to the
//! sections of a container as they are laid out on disk.
//!
//! A container is a fixed header followed by a series of tagged,
//! size-prefixed sections:
//!
//! - `FINF`, global metrics and the offsets of the sections below
//! - `TGLP`, the texture sheet geometry and the sheets themselves
//! - a chain of `CWDH` blocks, glyph widths
//! - a chain of `CMAP` blocks, mapping character codes to glyphs
//! - an optional `KRNG` section, kerning pairs
//!
//! For an owned, editable representation, see the companion `write-bffnt`
//! crate.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use read_bffnt::BffntRef;
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = BffntRef::new(&font_bytes).expect("failed to read font data");
//! let tglp = font.tglp().expect("missing 'TGLP' section");
//! println!(
//!     "line height {}, {} sheets of {}x{}",
//!     font.finf().height(),
//!     tglp.sheet_count(),
//!     tglp.sheet_width(),
//!     tglp.sheet_height(),
//! );
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod chain;
mod font_data;
mod read;
pub mod section;
pub mod tables;

pub use chain::{Chain, ChainLink};
pub use font_data::{Cursor, FontData};
pub use read::{FontRead, ReadError, Section};
pub use section::SectionRecord;

/// Public re-export of the bffnt-types crate.
pub extern crate bffnt_types as types;

use section::{read_section, section_position};
use tables::{
    cmap::Cmap,
    cwdh::Cwdh,
    ffnt::{Ffnt, FFNT_HEADER_LEN},
    finf::Finf,
    krng::Krng,
    tglp::Tglp,
};

/// Reference to an in-memory container.
///
/// Only the header and `FINF` are read up front; everything else is read on
/// request, so a damaged section does not prevent access to the others.
#[derive(Clone, Copy, Debug)]
pub struct BffntRef<'a> {
    data: FontData<'a>,
    header: Ffnt<'a>,
    finf: Finf<'a>,
}

impl<'a> BffntRef<'a> {
    /// Creates a new reference to an in-memory container.
    ///
    /// The data must begin with a valid `FFNT` header, immediately followed
    /// by the `FINF` section.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let header = Ffnt::read(data)?;
        let finf = read_section(data, FFNT_HEADER_LEN).map_err(|e| match e {
            ReadError::TruncatedInput => ReadError::MalformedData("missing FINF"),
            e => e,
        })?;
        Ok(BffntRef { data, header, finf })
    }

    /// Returns the underlying container data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    pub fn header(&self) -> Ffnt<'a> {
        self.header
    }

    pub fn finf(&self) -> Finf<'a> {
        self.finf
    }

    pub fn tglp(&self) -> Result<Tglp<'a>, ReadError> {
        read_section(self.data, section_position(self.finf.tglp_offset())?)
    }

    /// Returns an iterator over the width blocks, in chain order.
    pub fn cwdhs(&self) -> Chain<'a, Cwdh<'a>> {
        Chain::new(self.data, self.finf.cwdh_offset())
    }

    /// Returns an iterator over the character map blocks, in chain order.
    pub fn cmaps(&self) -> Chain<'a, Cmap<'a>> {
        Chain::new(self.data, self.finf.cmap_offset())
    }

    /// Returns the kerning section, if there is one.
    ///
    /// The search for the `KRNG` tag starts after the last section that is
    /// reachable by offset, so that sheet data can never be mistaken for it.
    pub fn krng(&self) -> Result<Option<Krng<'a>>, ReadError> {
        Krng::locate(self.data, self.addressed_end()?)
    }

    /// The position one past the end of the last section reachable from
    /// `FINF`.
    pub fn addressed_end(&self) -> Result<usize, ReadError> {
        let mut end = FFNT_HEADER_LEN + self.finf.section_size() as usize;
        let tglp = self.tglp()?;
        end = end.max(tglp.position() + tglp.section_size() as usize);
        for cwdh in self.cwdhs() {
            let cwdh = cwdh?;
            end = end.max(cwdh.position() + cwdh.section_size() as usize);
        }
        for cmap in self.cmaps() {
            let cmap = cmap?;
            end = end.max(cmap.position() + cmap.section_size() as usize);
        }
        Ok(end)
    }

    /// Returns the location of every section, ordered by position.
    pub fn section_records(&self) -> Result<Vec<SectionRecord>, ReadError> {
        fn record(tag: types::Tag, position: usize, size: u32) -> SectionRecord {
            SectionRecord {
                tag,
                position,
                size: size as usize,
            }
        }

        let mut records = vec![record(
            tables::finf::TAG,
            FFNT_HEADER_LEN,
            self.finf.section_size(),
        )];
        let tglp = self.tglp()?;
        records.push(record(tables::tglp::TAG, tglp.position(), tglp.section_size()));
        for cwdh in self.cwdhs() {
            let cwdh = cwdh?;
            records.push(record(tables::cwdh::TAG, cwdh.position(), cwdh.section_size()));
        }
        for cmap in self.cmaps() {
            let cmap = cmap?;
            records.push(record(tables::cmap::TAG, cmap.position(), cmap.section_size()));
        }
        if let Some(krng) = self.krng()? {
            records.push(record(tables::krng::TAG, krng.position(), krng.section_size()));
        }
        records.sort_by_key(|record| record.position);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bffnt_test_data::SIMPLE;
    use types::GlyphIndex;

    #[test]
    fn read_simple() {
        let font = BffntRef::new(SIMPLE).unwrap();
        assert_eq!(font.header().file_size() as usize, SIMPLE.len());

        let finf = font.finf();
        assert_eq!(finf.height(), 12);
        assert_eq!(finf.line_feed(), 14);
        assert_eq!(finf.default_widths().char_width(), 11);
        assert_eq!(finf.encoding(), 1);

        let tglp = font.tglp().unwrap();
        assert_eq!(tglp.position(), 0x34);
        assert_eq!(tglp.sheet_count(), 1);
        assert_eq!(tglp.sheet_data().len(), 16);
        assert_eq!(tglp.sheet_data()[15], 0xFF);
        assert!(tglp.leading_padding().is_empty());
        assert!(tglp.trailing_padding().is_empty());

        let cwdhs = font.cwdhs().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(
            cwdhs
                .iter()
                .map(|b| (b.start_index(), b.end_index()))
                .collect::<Vec<_>>(),
            [(0, 2), (3, 4)]
        );
        assert_eq!(cwdhs[1].widths_for(4).unwrap().left(), 2);

        let cmaps = font.cmaps().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(cmaps.len(), 3);
        let mapped = cmaps
            .iter()
            .flat_map(|cmap| cmap.iter_mappings())
            .collect::<Vec<_>>();
        assert_eq!(
            mapped,
            [
                (0x41, GlyphIndex::new(0)),
                (0x42, GlyphIndex::new(1)),
                (0x61, GlyphIndex::new(2)),
                (0x63, GlyphIndex::new(3)),
                (0x20, GlyphIndex::new(4)),
            ]
        );

        let krng = font.krng().unwrap().unwrap();
        assert_eq!(krng.kern(0x41, 0x57), -2);
    }

    #[test]
    fn section_layout() {
        let font = BffntRef::new(SIMPLE).unwrap();
        let records = font.section_records().unwrap();
        let tags = records
            .iter()
            .map(|record| record.tag.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            tags,
            ["FINF", "TGLP", "CWDH", "CWDH", "CMAP", "CMAP", "CMAP", "KRNG"]
        );
        // sections are contiguous and fill the file
        for pair in records.windows(2) {
            assert_eq!(pair[0].end(), pair[1].position);
        }
        assert_eq!(records.last().unwrap().end(), SIMPLE.len());
        assert_eq!(
            font.addressed_end().unwrap(),
            bffnt_test_data::SIMPLE_KRNG_POSITION
        );
    }

    #[test]
    fn without_kerning() {
        let data = &SIMPLE[..bffnt_test_data::SIMPLE_KRNG_POSITION];
        let font = BffntRef::new(data).unwrap();
        assert!(font.krng().unwrap().is_none());
        assert_eq!(font.section_records().unwrap().len(), 7);
    }

    #[test]
    fn truncated_chain() {
        // cut the file in the middle of the second character map block
        let font = BffntRef::new(&SIMPLE[..0xC0]).unwrap();
        let mut cmaps = font.cmaps();
        assert!(cmaps.next().unwrap().is_ok());
        assert_eq!(cmaps.next().unwrap().unwrap_err(), ReadError::TruncatedInput);
        assert!(cmaps.next().is_none());
        assert!(font.cwdhs().all(|block| block.is_ok()));
    }

    #[test]
    fn bad_header() {
        let mut data = SIMPLE.to_vec();
        data[4] = 0xFF;
        data[5] = 0xFE;
        assert!(BffntRef::new(&data).unwrap_err().is_format_error());
        assert_eq!(
            BffntRef::new(&SIMPLE[..12]).err(),
            Some(ReadError::TruncatedInput)
        );
    }

    #[test]
    fn missing_font_info() {
        // a complete header, followed by part of FINF
        for len in [20, 24, 30, 51] {
            let err = BffntRef::new(&SIMPLE[..len]).unwrap_err();
            assert_eq!(err, ReadError::MalformedData("missing FINF"));
            assert!(err.is_format_error());
        }
    }
}
