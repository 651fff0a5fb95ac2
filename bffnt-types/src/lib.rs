//! Common scalar data types used in BFFNT font containers
//!
//! Every multi-byte field in a Wii U font container is stored big-endian.
//! The types here describe how those fields are laid out on disk, and are
//! shared by the reading and writing crates.

#![deny(rustdoc::broken_intra_doc_links)]

mod glyph_index;
mod raw;
mod tag;

pub use glyph_index::GlyphIndex;
pub use raw::{BigEndian, FixedSize, Scalar};
pub use tag::{InvalidTag, Tag};

/// The magic for a container with the `FFNT` header.
pub const FFNT_TAG: Tag = Tag::new(b"FFNT");
/// The magic used by older Wii U (`bcfnt`-derived) containers.
pub const CFNU_TAG: Tag = Tag::new(b"CFNU");

/// Byte order mark for big-endian containers, as read big-endian.
pub const BIG_ENDIAN_BOM: u16 = 0xFEFF;
/// Byte order mark for little-endian containers, as read big-endian.
pub const LITTLE_ENDIAN_BOM: u16 = 0xFFFE;

/// Round `len` up to the next multiple of four.
#[inline]
pub const fn round4(len: usize) -> usize {
    (len + 3) & !3
}
