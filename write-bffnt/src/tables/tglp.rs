//! The texture glyph page

use read::tables::tglp as read_tglp;

pub use read_tglp::{TAG, TGLP_HEADER_LEN};

use super::{ffnt::FFNT_HEADER_LEN, finf::FINF_SECTION_LEN};
use crate::{
    error::RangeError,
    from_obj::FromTableRef,
    round::scale,
    validate::{Validate, ValidationCtx, ValidationReport},
    write::{FontWrite, TableWriter},
};

const MIN_SHEET_ALIGNMENT: u32 = 4;
const MAX_SHEET_ALIGNMENT: u32 = 0x10000;

/// Where the texture page is written: right after the header and `FINF`.
pub const TGLP_POSITION: usize = FFNT_HEADER_LEN + FINF_SECTION_LEN;
const TGLP_HEADER_END: usize = TGLP_POSITION + TGLP_HEADER_LEN;

/// The arrangement of glyph cells on the texture sheets.
///
/// Used to replace the sheets wholesale, for instance after re-rendering
/// the glyphs at a new size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetLayout {
    pub sheet_count: u8,
    pub sheet_size: u32,
    pub sheet_format: u16,
    pub num_columns: u16,
    pub num_rows: u16,
    pub sheet_width: u16,
    pub sheet_height: u16,
}

/// The texture glyph page: cell geometry plus the raw sheet bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tglp {
    pub cell_width: u8,
    pub cell_height: u8,
    pub max_char_width: u8,
    pub baseline_position: u16,
    pub layout: SheetLayout,
    /// The sheet data is placed at the next multiple of this, in the file.
    ///
    /// Several alignments can place the sheets at the same position; only
    /// the largest of them is kept. Use [`Tglp::set_sheet_alignment`] to
    /// pick it.
    pub sheet_alignment: u32,
    /// All sheets, back to back.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub sheet_data: Vec<u8>,
}

impl Default for Tglp {
    fn default() -> Self {
        Tglp {
            cell_width: 0,
            cell_height: 0,
            max_char_width: 0,
            baseline_position: 0,
            layout: SheetLayout::default(),
            sheet_alignment: MIN_SHEET_ALIGNMENT,
            sheet_data: Vec::new(),
        }
    }
}

/// Find the alignment that places sheet data following a header ending at
/// `header_end` at `data_offset`.
///
/// Prefers the largest power of two that works, so that sheets that were
/// aligned for the GPU stay aligned when the preceding sections grow.
pub fn derive_sheet_alignment(header_end: usize, data_offset: usize) -> u32 {
    let mut align = MAX_SHEET_ALIGNMENT;
    while align >= MIN_SHEET_ALIGNMENT {
        if header_end.next_multiple_of(align as usize) == data_offset {
            return align;
        }
        align /= 2;
    }
    log::warn!(
        "sheet data at {data_offset:#X} is not at an aligned position after {header_end:#X}, \
        using {MIN_SHEET_ALIGNMENT}-byte alignment"
    );
    MIN_SHEET_ALIGNMENT
}

/// The largest alignment that puts the sheets where `align` does, when the
/// page is written at [`TGLP_POSITION`].
///
/// Values that are not a valid alignment are returned unchanged.
fn canonical_alignment(align: u32) -> u32 {
    if !is_valid_alignment(align) {
        return align;
    }
    let data_offset = TGLP_HEADER_END.next_multiple_of(align as usize);
    derive_sheet_alignment(TGLP_HEADER_END, data_offset)
}

fn is_valid_alignment(align: u32) -> bool {
    align.is_power_of_two() && (MIN_SHEET_ALIGNMENT..=MAX_SHEET_ALIGNMENT).contains(&align)
}

impl Tglp {
    /// Align the sheet data to (at least) `align` bytes.
    pub fn set_sheet_alignment(&mut self, align: u32) {
        self.sheet_alignment = canonical_alignment(align);
    }

    /// Return a copy with the cell geometry and sheet dimensions multiplied
    /// by `factor`.
    ///
    /// The sheet bytes are left alone; the caller is expected to provide
    /// re-rendered sheets via [`Tglp::replace_sheets`].
    pub fn scaled(&self, factor: f64) -> Result<Self, RangeError> {
        Ok(Tglp {
            cell_width: scale(self.cell_width, factor, "cell_width")?,
            cell_height: scale(self.cell_height, factor, "cell_height")?,
            max_char_width: scale(self.max_char_width, factor, "max_char_width")?,
            baseline_position: scale(self.baseline_position, factor, "baseline_position")?,
            layout: SheetLayout {
                sheet_width: scale(self.layout.sheet_width, factor, "sheet_width")?,
                sheet_height: scale(self.layout.sheet_height, factor, "sheet_height")?,
                ..self.layout
            },
            ..self.clone()
        })
    }

    /// Replace the sheets and the layout describing them.
    ///
    /// `data` must hold exactly `sheet_count` sheets of `sheet_size` bytes;
    /// on failure nothing is changed.
    pub fn replace_sheets(
        &mut self,
        layout: SheetLayout,
        data: Vec<u8>,
    ) -> Result<(), ValidationReport> {
        let candidate = Tglp {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            max_char_width: self.max_char_width,
            baseline_position: self.baseline_position,
            layout,
            sheet_alignment: canonical_alignment(self.sheet_alignment),
            sheet_data: data,
        };
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// Encode the section, to be placed at the absolute `position`.
    pub fn encode(&self, position: usize) -> Result<Vec<u8>, RangeError> {
        let data_offset = (position + TGLP_HEADER_LEN)
            .next_multiple_of(self.sheet_alignment.max(MIN_SHEET_ALIGNMENT) as usize);
        let data_offset = u32::try_from(data_offset)
            .map_err(|_| RangeError::new("sheet data offset", data_offset as f64))?;
        let mut writer = TableWriter::at(position);
        writer.section(TAG, |writer| {
            self.cell_width.write_into(writer);
            self.cell_height.write_into(writer);
            self.layout.sheet_count.write_into(writer);
            self.max_char_width.write_into(writer);
            self.layout.sheet_size.write_into(writer);
            self.baseline_position.write_into(writer);
            self.layout.sheet_format.write_into(writer);
            self.layout.num_columns.write_into(writer);
            self.layout.num_rows.write_into(writer);
            self.layout.sheet_width.write_into(writer);
            self.layout.sheet_height.write_into(writer);
            data_offset.write_into(writer);
            writer.pad_to(self.sheet_alignment.max(MIN_SHEET_ALIGNMENT) as usize);
            writer.write_slice(&self.sheet_data);
        });
        if writer.len() > u32::MAX as usize {
            return Err(RangeError::new("TGLP size", writer.len() as f64));
        }
        Ok(writer.into_data())
    }
}

impl Validate for Tglp {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("Tglp", |ctx| {
            let expected = self.layout.sheet_count as u64 * self.layout.sheet_size as u64;
            if self.sheet_data.len() as u64 != expected {
                ctx.in_field("sheet_data", |ctx| {
                    ctx.report(format!(
                        "expected {} sheets of {} bytes, found {} bytes",
                        self.layout.sheet_count,
                        self.layout.sheet_size,
                        self.sheet_data.len()
                    ))
                });
            }
            ctx.in_field("sheet_alignment", |ctx| {
                let align = self.sheet_alignment;
                if !is_valid_alignment(align) {
                    ctx.report(format!(
                        "alignment {align} is not a power of two between {MIN_SHEET_ALIGNMENT} and {MAX_SHEET_ALIGNMENT}"
                    ))
                } else if canonical_alignment(align) != align {
                    ctx.report(format!(
                        "alignment {align:#X} places the sheets at the same position as {:#X}",
                        canonical_alignment(align)
                    ))
                }
            });
        })
    }
}

impl FromTableRef<read_tglp::Tglp<'_>> for Tglp {
    fn from_table_ref(from: &read_tglp::Tglp) -> Self {
        let header_end = from.position() + TGLP_HEADER_LEN;
        Tglp {
            cell_width: from.cell_width(),
            cell_height: from.cell_height(),
            max_char_width: from.max_char_width(),
            baseline_position: from.baseline_position(),
            layout: SheetLayout {
                sheet_count: from.sheet_count(),
                sheet_size: from.sheet_size(),
                sheet_format: from.sheet_format(),
                num_columns: from.num_columns(),
                num_rows: from.num_rows(),
                sheet_width: from.sheet_width(),
                sheet_height: from.sheet_height(),
            },
            sheet_alignment: canonical_alignment(derive_sheet_alignment(
                header_end,
                from.sheet_data_offset() as usize,
            )),
            sheet_data: from.sheet_data().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bffnt_test_data::SIMPLE;
    use read::BffntRef;


    fn simple() -> Tglp {
        Tglp::from_table_ref(&BffntRef::new(SIMPLE).unwrap().tglp().unwrap())
    }

    #[test]
    fn alignment() {
        assert_eq!(derive_sheet_alignment(0x54, 0x54), 4);
        assert_eq!(derive_sheet_alignment(0x54, 0x80), 0x80);
        assert_eq!(derive_sheet_alignment(0x54, 0x1000), 0x1000);
        assert_eq!(derive_sheet_alignment(0x54, 0x10000), 0x10000);
        // not reachable by rounding up
        assert_eq!(derive_sheet_alignment(0x54, 0x58), 4);
    }

    #[test]
    fn read_and_encode() {
        let tglp = simple();
        assert_eq!(tglp.sheet_alignment, 4);
        assert_eq!(tglp.layout.sheet_count, 1);
        assert_eq!(tglp.sheet_data.len(), 16);
        assert_eq!(
            tglp.encode(TGLP_POSITION).unwrap(),
            &SIMPLE[TGLP_POSITION..0x64]
        );
    }

    #[test]
    fn aligned_sheets() {
        let mut tglp = simple();
        tglp.sheet_alignment = 0x100;
        let bytes = tglp.encode(TGLP_POSITION).unwrap();
        // header ends at 0x54, sheets start at 0x100
        assert_eq!(&bytes[28..32], &[0, 0, 1, 0]);
        assert_eq!(bytes.len(), 0x100 + 16 - TGLP_POSITION);
        assert!(bytes[32..0x100 - TGLP_POSITION].iter().all(|b| *b == 0));
        assert_eq!(&bytes[0x100 - TGLP_POSITION..], tglp.sheet_data.as_slice());
    }

    #[test]
    fn equivalent_alignments() {
        let mut tglp = simple();
        // both put the sheets at 0x60
        tglp.set_sheet_alignment(0x10);
        assert_eq!(tglp.sheet_alignment, 0x20);
        // both put the sheets at 0x80
        tglp.set_sheet_alignment(0x40);
        assert_eq!(tglp.sheet_alignment, 0x80);
        tglp.set_sheet_alignment(8);
        assert_eq!(tglp.sheet_alignment, 8);
        assert!(tglp.validate().is_ok());

        tglp.sheet_alignment = 0x10;
        let report = tglp.validate().unwrap_err();
        assert!(report.to_string().contains("sheet_alignment"));
        tglp.sheet_alignment = 12;
        assert!(tglp.validate().is_err());
        tglp.set_sheet_alignment(12);
        assert_eq!(tglp.sheet_alignment, 12);
    }

    #[test]
    fn sheet_length() {
        let mut tglp = simple();
        assert!(tglp.validate().is_ok());
        tglp.sheet_data.push(0);
        assert!(tglp.validate().is_err());
    }

    #[test]
    fn replace() {
        let mut tglp = simple();
        let layout = SheetLayout {
            sheet_count: 2,
            sheet_size: 8,
            ..tglp.layout
        };
        assert!(tglp.replace_sheets(layout, vec![0; 15]).is_err());
        assert_eq!(tglp, simple());
        tglp.replace_sheets(layout, vec![1; 16]).unwrap();
        assert_eq!(tglp.layout.sheet_count, 2);
        assert!(tglp.validate().is_ok());
    }

    #[test]
    fn scale_geometry() {
        let scaled = simple().scaled(2.0).unwrap();
        assert_eq!(scaled.cell_width, 20);
        assert_eq!(scaled.cell_height, 24);
        assert_eq!(scaled.max_char_width, 22);
        assert_eq!(scaled.baseline_position, 18);
        assert_eq!(scaled.layout.sheet_width, 16);
        assert_eq!(scaled.layout.sheet_height, 8);
        assert_eq!(scaled.layout.sheet_size, 16);
        assert_eq!(scaled.sheet_data, simple().sheet_data);
    }
}
