//! The kerning section

use std::collections::BTreeMap;

use read::tables::krng as read_krng;

pub use read_krng::TAG;

use crate::{
    error::RangeError,
    from_obj::FromTableRef,
    round::RoundChecked,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// A kerning adjustment between a first character and `second_char`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KerningPair {
    pub second_char: u16,
    pub value: i16,
}

/// The kerning section: pairs grouped by first character.
///
/// First characters are kept in ascending order, which is also the order in
/// which they are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Krng {
    pub pairs: BTreeMap<u16, Vec<KerningPair>>,
}

impl KerningPair {
    pub fn new(second_char: u16, value: i16) -> Self {
        KerningPair { second_char, value }
    }
}

impl Krng {
    /// `true` if there are no kerning pairs; nothing is written in this case.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The adjustment between `first` and `second`, or zero if the pair is
    /// not kerned.
    pub fn kern(&self, first: u16, second: u16) -> i16 {
        self.pairs
            .get(&first)
            .and_then(|pairs| pairs.iter().find(|pair| pair.second_char == second))
            .map(|pair| pair.value)
            .unwrap_or_default()
    }

    /// Return a copy with every value multiplied by `factor`, rounded up.
    pub fn scaled(&self, factor: f64) -> Result<Self, RangeError> {
        let pairs = self
            .pairs
            .iter()
            .map(|(first, pairs)| {
                let pairs = pairs
                    .iter()
                    .map(|pair| {
                        let value = (pair.value as f64 * factor).ceil_checked("kerning value")?;
                        Ok(KerningPair::new(pair.second_char, value))
                    })
                    .collect::<Result<_, RangeError>>()?;
                Ok((*first, pairs))
            })
            .collect::<Result<_, RangeError>>()?;
        Ok(Krng { pairs })
    }

    /// Encode the section, to be placed at the absolute `position`.
    ///
    /// Returns an empty buffer if there are no pairs.
    pub fn encode(&self, position: usize) -> Result<Vec<u8>, RangeError> {
        let mut writer = TableWriter::at(position);
        if self.is_empty() {
            return Ok(writer.into_data());
        }
        let count = u16::try_from(self.pairs.len())
            .map_err(|_| RangeError::new("first char count", self.pairs.len() as f64))?;
        // offsets are relative to the start of the payload, which begins with
        // the count and the first char records
        let mut offset = 2 + 4 * self.pairs.len();
        let mut records = Vec::with_capacity(self.pairs.len());
        for (first, pairs) in &self.pairs {
            let halved = u16::try_from(offset / 2)
                .map_err(|_| RangeError::new("kerning offset", offset as f64))?;
            u16::try_from(pairs.len())
                .map_err(|_| RangeError::new("kerning pair count", pairs.len() as f64))?;
            records.push((*first, halved));
            offset += 2 + 4 * pairs.len();
        }
        writer.section(TAG, |writer| {
            count.write_into(writer);
            for (first, halved) in &records {
                first.write_into(writer);
                halved.write_into(writer);
            }
            for pairs in self.pairs.values() {
                (pairs.len() as u16).write_into(writer);
                pairs.write_into(writer);
            }
        });
        Ok(writer.into_data())
    }
}

impl FontWrite for KerningPair {
    fn write_into(&self, writer: &mut TableWriter) {
        self.second_char.write_into(writer);
        self.value.write_into(writer);
    }
}

impl Validate for Krng {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("Krng", |ctx| {
            ctx.in_field("pairs", |ctx| {
                if self.pairs.len() > u16::MAX as usize {
                    ctx.report("too many first characters");
                }
                if self.pairs.values().any(|pairs| pairs.len() > u16::MAX as usize) {
                    ctx.report("too many pairs for a single first character");
                }
            })
        })
    }
}

impl FromTableRef<read_krng::KerningPair> for KerningPair {
    fn from_table_ref(from: &read_krng::KerningPair) -> Self {
        KerningPair::new(from.second_char(), from.value())
    }
}

impl FromTableRef<read_krng::Krng<'_>> for Krng {
    fn from_table_ref(from: &read_krng::Krng) -> Self {
        let mut pairs = BTreeMap::new();
        for (first, list) in from.iter() {
            let list = list.iter().map(KerningPair::from_table_ref).collect();
            if pairs.insert(first, list).is_some() {
                log::warn!("duplicate kerning entry for {first:#06X}, keeping the last");
            }
        }
        Krng { pairs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bffnt_test_data::{SIMPLE, SIMPLE_KRNG_POSITION};
    use read::FontData;

    fn sample() -> Krng {
        let mut krng = Krng::default();
        krng.pairs.insert(0x56, vec![KerningPair::new(0x41, -1)]);
        krng.pairs.insert(
            0x41,
            vec![KerningPair::new(0x56, -1), KerningPair::new(0x57, -2)],
        );
        krng
    }

    #[test]
    fn encode_ascending() {
        let bytes = sample().encode(SIMPLE_KRNG_POSITION).unwrap();
        assert_eq!(bytes, &SIMPLE[SIMPLE_KRNG_POSITION..]);
    }

    #[test]
    fn read_back() {
        let read = read_krng::Krng::locate(FontData::new(SIMPLE), SIMPLE_KRNG_POSITION)
            .unwrap()
            .unwrap();
        assert_eq!(Krng::from_table_ref(&read), sample());
    }

    #[test]
    fn padding_depends_on_position() {
        // 8 byte header + 2 + 4 + 2 + 4 = 20 bytes of content
        let mut krng = Krng::default();
        krng.pairs.insert(1, vec![KerningPair::new(2, 3)]);
        assert_eq!(krng.encode(0).unwrap().len(), 20);
        assert_eq!(krng.encode(2).unwrap().len(), 22);
    }

    #[test]
    fn empty_table() {
        let krng = Krng::default();
        assert!(krng.encode(0x100).unwrap().is_empty());
        assert_eq!(krng.kern(0x41, 0x56), 0);
    }

    #[test]
    fn lookup() {
        let krng = sample();
        assert_eq!(krng.kern(0x41, 0x57), -2);
        assert_eq!(krng.kern(0x57, 0x41), 0);
    }

    #[test]
    fn offset_overflow() {
        let mut krng = Krng::default();
        // the second list starts past 2 * u16::MAX
        krng.pairs.insert(0, vec![KerningPair::new(0, 0); 0x8000]);
        krng.pairs.insert(1, vec![]);
        let err = krng.encode(0).unwrap_err();
        assert_eq!(err.field, "kerning offset");
    }

    #[test]
    fn scale_rounds_up() {
        let scaled = sample().scaled(1.5).unwrap();
        // -1.5 and -3.0
        assert_eq!(scaled.kern(0x41, 0x56), -1);
        assert_eq!(scaled.kern(0x41, 0x57), -3);
        let mut big = Krng::default();
        big.pairs.insert(0, vec![KerningPair::new(1, i16::MAX)]);
        assert!(big.scaled(2.0).is_err());
    }
}
