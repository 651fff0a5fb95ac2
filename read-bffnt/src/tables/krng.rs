//! The kerning section
//!
//! Nothing points to `KRNG`; it follows the other sections and is found by
//! searching for its tag. The payload is a list of first characters, each
//! with the offset of a list of `(second character, adjustment)` pairs.
//! Offsets are relative to the start of the payload and stored halved.

use types::{BigEndian, FixedSize, Tag};

use crate::{
    section::{read_section, SECTION_HEADER_LEN},
    FontData, ReadError, Section,
};

/// 'KRNG'
pub const TAG: Tag = Tag::new(b"KRNG");

/// A first character and the location of its pair list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct FirstCharRecord {
    pub first_char: BigEndian<u16>,
    pub halved_offset: BigEndian<u16>,
}

impl FirstCharRecord {
    pub fn first_char(&self) -> u16 {
        self.first_char.get()
    }

    /// The position of the pair list, relative to the start of the payload.
    pub fn table_offset(&self) -> usize {
        self.halved_offset.get() as usize * 2
    }
}

impl FixedSize for FirstCharRecord {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN * 2;
}

/// A kerning adjustment between a first character and `second_char`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct KerningPair {
    pub second_char: BigEndian<u16>,
    pub value: BigEndian<i16>,
}

impl KerningPair {
    pub fn second_char(&self) -> u16 {
        self.second_char.get()
    }

    /// The horizontal adjustment, in pixels.
    pub fn value(&self) -> i16 {
        self.value.get()
    }
}

impl FixedSize for KerningPair {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN + i16::RAW_BYTE_LEN;
}

/// The kerning section.
#[derive(Clone, Copy, Debug)]
pub struct Krng<'a> {
    data: FontData<'a>,
    position: usize,
    first_chars: &'a [FirstCharRecord],
    payload_len: usize,
}

impl<'a> Section<'a> for Krng<'a> {
    const TAG: Tag = TAG;
    const HEADER_LEN: usize = SECTION_HEADER_LEN + 2;

    fn read_section(data: FontData<'a>, position: usize) -> Result<Self, ReadError> {
        let payload = data
            .split_off(SECTION_HEADER_LEN)
            .ok_or(ReadError::TruncatedInput)?;
        let mut cursor = payload.cursor();
        let count = cursor.read::<u16>()?;
        let first_chars: &[FirstCharRecord] = cursor.read_array(count as usize)?;
        let records_end = cursor.position();
        let mut payload_end = records_end;
        for record in first_chars {
            let start = record.table_offset();
            if start < records_end {
                return Err(ReadError::MalformedData(
                    "kerning pair list overlaps first character records",
                ));
            }
            let pair_count = payload.read_at::<u16>(start)? as usize;
            let end = start + u16::RAW_BYTE_LEN + pair_count * KerningPair::RAW_BYTE_LEN;
            if end > payload.len() {
                return Err(ReadError::TruncatedInput);
            }
            payload_end = payload_end.max(end);
        }
        Ok(Krng {
            data,
            position,
            first_chars,
            payload_len: SECTION_HEADER_LEN + payload_end,
        })
    }
}

impl<'a> Krng<'a> {
    /// Find and read the kerning section, searching from `from`.
    ///
    /// Returns `Ok(None)` if there is no `KRNG` tag at or after `from`.
    pub fn locate(file: FontData<'a>, from: usize) -> Result<Option<Self>, ReadError> {
        match file.find(&TAG.to_be_bytes(), from) {
            Some(position) => read_section(file, position).map(Some),
            None => Ok(None),
        }
    }

    /// The absolute position of this section in the file.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn section_size(&self) -> u32 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// The first character records, in file order.
    pub fn first_chars(&self) -> &'a [FirstCharRecord] {
        self.first_chars
    }

    /// The pairs whose first character is `record.first_char()`.
    pub fn pairs(&self, record: &FirstCharRecord) -> &'a [KerningPair] {
        let payload = self.data.split_off(SECTION_HEADER_LEN).unwrap_or_default();
        let start = record.table_offset();
        let count = payload.read_at::<u16>(start).unwrap_or_default() as usize;
        let start = start + u16::RAW_BYTE_LEN;
        payload
            .read_array(start..start + count * KerningPair::RAW_BYTE_LEN)
            .unwrap_or_default()
    }

    /// Iterate over each first character along with its pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &'a [KerningPair])> + '_ {
        self.first_chars
            .iter()
            .map(move |record| (record.first_char(), self.pairs(record)))
    }

    /// The adjustment between `first` and `second`, or zero if the pair is
    /// not kerned.
    pub fn kern(&self, first: u16, second: u16) -> i16 {
        self.first_chars
            .iter()
            .find(|record| record.first_char() == first)
            .and_then(|record| {
                self.pairs(record)
                    .iter()
                    .find(|pair| pair.second_char() == second)
            })
            .map(KerningPair::value)
            .unwrap_or_default()
    }

    /// Bytes after the last pair list, up to the declared section size.
    pub fn padding(&self) -> &'a [u8] {
        self.data
            .split_off(self.payload_len)
            .map(|data| data.as_bytes())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bffnt_test_data::bebuffer::BeBuffer;

    #[test]
    fn read_pairs() {
        let data = FontData::new(bffnt_test_data::SIMPLE);
        let krng = Krng::locate(data, 0).unwrap().unwrap();
        assert_eq!(krng.position(), bffnt_test_data::SIMPLE_KRNG_POSITION);
        assert_eq!(krng.first_chars().len(), 2);
        assert_eq!(krng.kern(b'A' as u16, b'V' as u16), -1);
        assert_eq!(krng.kern(b'A' as u16, b'W' as u16), -2);
        assert_eq!(krng.kern(b'V' as u16, b'A' as u16), -1);
        assert_eq!(krng.kern(b'W' as u16, b'A' as u16), 0);
        assert_eq!(krng.kern(b'A' as u16, b'A' as u16), 0);
        let firsts = krng.iter().map(|(first, pairs)| (first, pairs.len()));
        assert_eq!(firsts.collect::<Vec<_>>(), [(0x41, 2), (0x56, 1)]);
        assert_eq!(krng.padding(), [0, 0]);
    }

    #[test]
    fn no_kerning() {
        let end = bffnt_test_data::SIMPLE_KRNG_POSITION;
        let data = FontData::new(&bffnt_test_data::SIMPLE[..end]);
        assert!(Krng::locate(data, 0).unwrap().is_none());
    }

    #[test]
    fn overlapping_offset() {
        let buf = BeBuffer::new()
            .push(TAG)
            .push(16u32)
            .push(1u16)
            .push(0x41u16)
            .push(1u16)
            .push(0u16);
        assert!(Krng::locate(FontData::new(buf.as_slice()), 0)
            .unwrap_err()
            .is_format_error());
    }

    #[test]
    fn pairs_past_end() {
        let buf = BeBuffer::new()
            .push(TAG)
            .push(20u32)
            .push(1u16)
            .push(0x41u16)
            .push(3u16)
            .push(4u16)
            .extend([0u8; 4]);
        assert_eq!(
            Krng::locate(FontData::new(buf.as_slice()), 0).unwrap_err(),
            ReadError::TruncatedInput
        );
    }
}
