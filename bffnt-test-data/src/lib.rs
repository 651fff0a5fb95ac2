//! test data shared between the bffnt crates.

pub mod bebuffer;

/// A small, complete container.
///
/// Five glyphs in two width blocks, one character map block of each kind,
/// and three kerning pairs. The single sheet is 16 bytes of opaque data.
///
/// | code  | glyph |
/// |-------|-------|
/// | `A`   | 0     |
/// | `B`   | 1     |
/// | `a`   | 2     |
/// | `c`   | 3     |
/// | space | 4     |
#[rustfmt::skip]
pub static SIMPLE: &[u8] = &[
    // FFNT @ 0x00
    b'F', b'F', b'N', b'T',
    0xFE, 0xFF,             // bom
    0x00, 0x14,             // header size
    0x03, 0x00, 0x00, 0x00, // version
    0x00, 0x00, 0x01, 0x10, // file size
    0x00, 0x06, 0x00, 0x00, // block read hint

    // FINF @ 0x14
    b'F', b'I', b'N', b'F',
    0x00, 0x00, 0x00, 0x20, // section size
    0x01,                   // font type
    0x0C,                   // height
    0x0A,                   // width
    0x0A,                   // ascent
    0x00, 0x0E,             // line feed
    0x00, 0x00,             // alter char index
    0x00, 0x0A, 0x0B,       // default widths: left, glyph, char
    0x01,                   // encoding
    0x00, 0x00, 0x00, 0x3C, // TGLP offset
    0x00, 0x00, 0x00, 0x6C, // CWDH offset
    0x00, 0x00, 0x00, 0xA0, // CMAP offset

    // TGLP @ 0x34
    b'T', b'G', b'L', b'P',
    0x00, 0x00, 0x00, 0x30, // section size
    0x0A, 0x0C,             // cell width, cell height
    0x01,                   // sheet count
    0x0B,                   // max char width
    0x00, 0x00, 0x00, 0x10, // sheet size
    0x00, 0x09,             // baseline
    0x00, 0x01,             // sheet format
    0x00, 0x04, 0x00, 0x02, // columns, rows
    0x00, 0x08, 0x00, 0x04, // sheet width, sheet height
    0x00, 0x00, 0x00, 0x54, // sheet data offset
    // sheet data
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
    0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,

    // CWDH @ 0x64
    b'C', b'W', b'D', b'H',
    0x00, 0x00, 0x00, 0x1C, // section size
    0x00, 0x00, 0x00, 0x02, // start index, end index
    0x00, 0x00, 0x00, 0x88, // next
    0x00, 0x08, 0x09,       // glyph 0
    0x01, 0x06, 0x08,       // glyph 1
    0xFF, 0x07, 0x07,       // glyph 2
    0x00, 0x00, 0x00,       // padding

    // CWDH @ 0x80
    b'C', b'W', b'D', b'H',
    0x00, 0x00, 0x00, 0x18, // section size
    0x00, 0x03, 0x00, 0x04, // start index, end index
    0x00, 0x00, 0x00, 0x00, // next
    0x00, 0x05, 0x06,       // glyph 3
    0x02, 0x04, 0x07,       // glyph 4
    0x00, 0x00,             // padding

    // CMAP @ 0x98, direct
    b'C', b'M', b'A', b'P',
    0x00, 0x00, 0x00, 0x18, // section size
    0x00, 0x41, 0x00, 0x42, // code begin, code end
    0x00, 0x00,             // method
    0x00, 0x00,             // reserved
    0x00, 0x00, 0x00, 0xB8, // next
    0x00, 0x00,             // base glyph
    0x00, 0x00,             // padding

    // CMAP @ 0xB0, table
    b'C', b'M', b'A', b'P',
    0x00, 0x00, 0x00, 0x1C, // section size
    0x00, 0x61, 0x00, 0x63, // code begin, code end
    0x00, 0x01,             // method
    0x00, 0x00,             // reserved
    0x00, 0x00, 0x00, 0xD4, // next
    0x00, 0x02,             // 'a'
    0xFF, 0xFF,             // 'b', not mapped
    0x00, 0x03,             // 'c'
    0x00, 0x00,             // padding

    // CMAP @ 0xCC, scan
    b'C', b'M', b'A', b'P',
    0x00, 0x00, 0x00, 0x20, // section size
    0x00, 0x20, 0x00, 0x7E, // code begin, code end
    0x00, 0x02,             // method
    0x00, 0x00,             // reserved
    0x00, 0x00, 0x00, 0x00, // next
    0x00, 0x02,             // entry count
    0x00, 0x20, 0x00, 0x04, // ' ' -> 4
    0x00, 0x7E, 0xFF, 0xFF, // '~', not mapped
    0x00, 0x00,             // padding

    // KRNG @ 0xEC
    b'K', b'R', b'N', b'G',
    0x00, 0x00, 0x00, 0x24, // section size
    0x00, 0x02,             // first char count
    0x00, 0x41, 0x00, 0x05, // 'A', offset 10
    0x00, 0x56, 0x00, 0x0A, // 'V', offset 20
    0x00, 0x02,             // 'A' pair count
    0x00, 0x56, 0xFF, 0xFF, // 'V' -1
    0x00, 0x57, 0xFF, 0xFE, // 'W' -2
    0x00, 0x01,             // 'V' pair count
    0x00, 0x41, 0xFF, 0xFF, // 'A' -1
    0x00, 0x00,             // padding
];

/// The position of the `KRNG` section in [`SIMPLE`]; everything before it is
/// a valid container without kerning.
pub const SIMPLE_KRNG_POSITION: usize = 0xEC;
