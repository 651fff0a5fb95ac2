//! Glyph indices
//!
//! A glyph index is the position of a glyph's cell in the texture sheets and
//! of its entry in the width chain. It is distinct from the character code
//! that maps to it.

/// A 16-bit glyph index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct GlyphIndex(u16);

impl GlyphIndex {
    /// The value stored in character maps for codes that have no glyph.
    pub const NOT_MAPPED: GlyphIndex = GlyphIndex(0xFFFF);

    /// Construct a new `GlyphIndex`.
    pub const fn new(raw: u16) -> Self {
        GlyphIndex(raw)
    }

    /// The index as a u16.
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    /// `true` unless this is the [`NOT_MAPPED`](Self::NOT_MAPPED) sentinel.
    pub const fn is_mapped(self) -> bool {
        self.0 != Self::NOT_MAPPED.0
    }

    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<u16> for GlyphIndex {
    fn from(value: u16) -> Self {
        GlyphIndex(value)
    }
}

impl std::fmt::Display for GlyphIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_mapped() {
            write!(f, "GI_{}", self.0)
        } else {
            write!(f, "GI_NONE")
        }
    }
}

impl crate::raw::Scalar for GlyphIndex {
    type Raw = [u8; 2];

    fn to_raw(self) -> [u8; 2] {
        crate::raw::Scalar::to_raw(self.0)
    }

    fn from_raw(raw: [u8; 2]) -> Self {
        Self(crate::raw::Scalar::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel() {
        assert!(!GlyphIndex::NOT_MAPPED.is_mapped());
        assert!(GlyphIndex::new(0).is_mapped());
        assert_eq!(GlyphIndex::NOT_MAPPED.to_string(), "GI_NONE");
        assert_eq!(GlyphIndex::new(12).to_string(), "GI_12");
    }
}
