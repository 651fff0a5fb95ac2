//! raw container bytes

use std::ops::{Bound, Range, RangeBounds};

use types::{FixedSize, Scalar};

use crate::read::ReadError;

/// A reference to raw binary container data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data. It is cheap to copy, and every
/// section reader borrows from the same source buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// # Note
///
/// reads past the end of the data fail with [`ReadError::TruncatedInput`];
/// nothing is consumed on failure.
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData { bytes })
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds: (Bound<usize>, Bound<usize>) =
            (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::TruncatedInput)?;
        self.bytes
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ReadError::TruncatedInput)
    }

    /// Interpret the bytes in `range` as a slice of records.
    pub fn read_array<T>(&self, range: Range<usize>) -> Result<&'a [T], ReadError>
    where
        T: bytemuck::AnyBitPattern + FixedSize,
    {
        let bytes = self
            .bytes
            .get(range)
            .ok_or(ReadError::TruncatedInput)?;
        bytemuck::try_cast_slice(bytes)
            .map_err(|_| ReadError::MalformedData("array length not a multiple of item size"))
    }

    /// Return the position of the first occurrence of `needle` at or after `from`.
    pub fn find(&self, needle: &[u8], from: usize) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.bytes
            .get(from..)?
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|pos| pos + from)
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos)?;
        self.pos += T::RAW_BYTE_LEN;
        Ok(temp)
    }

    pub fn read_array<T>(&mut self, len: usize) -> Result<&'a [T], ReadError>
    where
        T: bytemuck::AnyBitPattern + FixedSize,
    {
        let len = len
            .checked_mul(T::RAW_BYTE_LEN)
            .ok_or(ReadError::TruncatedInput)?;
        let end = self
            .pos
            .checked_add(len)
            .ok_or(ReadError::TruncatedInput)?;
        let temp = self.data.read_array(self.pos..end)?;
        self.pos = end;
        Ok(temp)
    }

    /// The current position, relative to the start of the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::BigEndian;

    #[test]
    fn read_at_bounds() {
        let data = FontData::new(&[0, 1, 0, 2, 0xFF]);
        assert_eq!(data.read_at::<u16>(0).unwrap(), 1);
        assert_eq!(data.read_at::<u16>(2).unwrap(), 2);
        assert_eq!(data.read_at::<i8>(4).unwrap(), -1);
        assert!(matches!(
            data.read_at::<u16>(4),
            Err(ReadError::TruncatedInput)
        ));
        assert!(matches!(
            data.read_at::<u32>(usize::MAX - 1),
            Err(ReadError::TruncatedInput)
        ));
    }

    #[test]
    fn cursor_arrays() {
        let data = FontData::new(&[0, 3, 0, 1, 0, 2, 0, 3]);
        let mut cursor = data.cursor();
        let len = cursor.read::<u16>().unwrap();
        let items = cursor.read_array::<BigEndian<u16>>(len as usize).unwrap();
        assert_eq!(
            items.iter().map(|x| x.get()).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert_eq!(cursor.remaining_bytes(), 0);
        assert!(cursor.read::<u8>().is_err());
    }

    #[test]
    fn find_needle() {
        let data = FontData::new(b"..KRNG..KRNG");
        assert_eq!(data.find(b"KRNG", 0), Some(2));
        assert_eq!(data.find(b"KRNG", 3), Some(8));
        assert_eq!(data.find(b"KRNG", 9), None);
        assert_eq!(data.find(b"KRNG", 100), None);
    }

    #[test]
    fn slice_bounds() {
        let data = FontData::new(&[1, 2, 3, 4]);
        assert_eq!(data.slice(1..3).unwrap().as_bytes(), &[2, 3]);
        assert!(data.slice(2..5).is_none());
        assert!(data.split_off(4).unwrap().is_empty());
        assert!(data.split_off(5).is_none());
    }
}
