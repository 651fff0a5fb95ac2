use types::{GlyphIndex, Scalar, Tag};

use read::section::SECTION_HEADER_LEN;

use crate::error::RangeError;

/// A type that that can be written out as part of a container.
pub trait FontWrite {
    /// Write our data into this [TableWriter].
    fn write_into(&self, writer: &mut TableWriter);
}

/// A block that is a member of a linked chain of sections.
pub trait ChainBlock: FontWrite {
    /// The magic at the start of each block.
    const TAG: Tag;

    /// The position of the next offset within the block, relative to the
    /// block's tag.
    const NEXT_FIELD: usize;
}

/// Accumulates the bytes of one or more consecutive sections.
///
/// The writer knows the absolute position in the file at which its first
/// byte will land, so that alignment and offsets can be expressed in terms
/// of the final file.
#[derive(Debug, Default)]
pub struct TableWriter {
    base: usize,
    data: Vec<u8>,
}

impl TableWriter {
    /// Create a writer whose first byte lands at `base` in the final file.
    pub fn at(base: usize) -> Self {
        TableWriter {
            base,
            data: Vec::new(),
        }
    }

    /// The absolute position of the next byte to be written.
    pub fn position(&self) -> usize {
        self.base + self.data.len()
    }

    /// Write raw bytes into this table.
    ///
    /// The caller is responsible for ensuring bytes are in big-endian order.
    #[inline]
    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes)
    }

    /// Write zeros until the absolute position is a multiple of `align`.
    pub fn pad_to(&mut self, align: usize) {
        let padded = self.position().next_multiple_of(align.max(1));
        self.data.resize(padded - self.base, 0);
    }

    /// Write a complete section.
    ///
    /// This writes the tag and a placeholder size, then the payload via `f`,
    /// pads to a four byte boundary and finally patches in the real size.
    /// Returns the absolute position of the section.
    pub fn section(&mut self, tag: Tag, f: impl FnOnce(&mut TableWriter)) -> usize {
        let start = self.position();
        tag.write_into(self);
        0u32.write_into(self);
        f(self);
        self.pad_to(4);
        let size = (self.position() - start) as u32;
        self.patch(start + 4, size);
        log::debug!("wrote '{tag}' at {start:#X}..{:#X}", self.position());
        start
    }

    /// Overwrite a previously written scalar at the absolute `position`.
    pub fn patch(&mut self, position: usize, value: impl Scalar) {
        let raw = value.to_raw();
        let bytes: &[u8] = raw.as_ref();
        let slot = position
            .checked_sub(self.base)
            .and_then(|start| self.data.get_mut(start..start + bytes.len()));
        match slot {
            Some(slot) => slot.copy_from_slice(bytes),
            None => debug_assert!(false, "patch at {position:#X} is outside the written data"),
        }
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the writer, returning the bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Convert an absolute section position into the offset stored on disk,
/// which points past the section header.
pub(crate) fn stored_offset(
    position: usize,
    field: &'static str,
) -> Result<u32, RangeError> {
    u32::try_from(position + SECTION_HEADER_LEN)
        .map_err(|_| RangeError::new(field, position as f64))
}

/// Write `blocks` as a chain starting at the absolute `position`.
///
/// The next offset of each block is derived from the position of the block
/// after it; the last block's is zero.
pub fn encode_chain<T: ChainBlock>(blocks: &[T], position: usize) -> Result<Vec<u8>, RangeError> {
    let mut writer = TableWriter::at(position);
    let starts = blocks
        .iter()
        .map(|block| writer.section(T::TAG, |writer| block.write_into(writer)))
        .collect::<Vec<_>>();
    for pair in starts.windows(2) {
        let next = stored_offset(pair[1], "next offset")?;
        log::trace!("'{}' at {:#X} links to {next:#X}", T::TAG, pair[0]);
        writer.patch(pair[0] + T::NEXT_FIELD, next);
    }
    Ok(writer.into_data())
}

macro_rules! write_be_bytes {
    ($ty:ty) => {
        impl FontWrite for $ty {
            #[inline]
            fn write_into(&self, writer: &mut TableWriter) {
                writer.write_slice(&self.to_be_bytes())
            }
        }
    };
}

write_be_bytes!(u8);
write_be_bytes!(i8);
write_be_bytes!(u16);
write_be_bytes!(i16);
write_be_bytes!(u32);
write_be_bytes!(i32);
write_be_bytes!(Tag);
write_be_bytes!(GlyphIndex);

impl<T: FontWrite> FontWrite for [T] {
    fn write_into(&self, writer: &mut TableWriter) {
        self.iter().for_each(|item| item.write_into(writer))
    }
}

impl<T: FontWrite> FontWrite for Vec<T> {
    fn write_into(&self, writer: &mut TableWriter) {
        self.iter().for_each(|item| item.write_into(writer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_padding_is_absolute() {
        let mut writer = TableWriter::at(2);
        let start = writer.section(Tag::new(b"TEST"), |writer| 7u8.write_into(writer));
        assert_eq!(start, 2);
        // 2 + 8 + 1 rounds up to 12
        assert_eq!(writer.position(), 12);
        assert_eq!(
            writer.into_data(),
            [b'T', b'E', b'S', b'T', 0, 0, 0, 10, 7, 0]
        );
    }

    #[test]
    fn pad_to_alignment() {
        let mut writer = TableWriter::at(0x54);
        writer.pad_to(0x20);
        assert_eq!(writer.position(), 0x60);
        writer.pad_to(0x20);
        assert_eq!(writer.len(), 0x0C);
    }
}
