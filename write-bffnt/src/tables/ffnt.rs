//! The container header

use read::tables::ffnt as read_ffnt;
use types::{Tag, BIG_ENDIAN_BOM, CFNU_TAG, FFNT_TAG};

pub use read_ffnt::FFNT_HEADER_LEN;

use crate::{
    from_obj::FromTableRef,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// The container header.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ffnt {
    /// Either `FFNT` or `CFNU`.
    pub magic: Tag,
    pub version: u32,
    /// The file size recorded when this header was read.
    ///
    /// This is not trusted; the real size is written on encode.
    pub file_size: u32,
    pub block_read_hint: u32,
}

impl Default for Ffnt {
    fn default() -> Self {
        Ffnt {
            magic: FFNT_TAG,
            version: 0x0300_0000,
            file_size: 0,
            block_read_hint: 0,
        }
    }
}

impl Ffnt {
    /// Encode the header for a file of `file_size` bytes.
    pub fn encode(&self, file_size: u32) -> Vec<u8> {
        let mut writer = TableWriter::at(0);
        self.magic.write_into(&mut writer);
        BIG_ENDIAN_BOM.write_into(&mut writer);
        (FFNT_HEADER_LEN as u16).write_into(&mut writer);
        self.version.write_into(&mut writer);
        file_size.write_into(&mut writer);
        self.block_read_hint.write_into(&mut writer);
        writer.into_data()
    }
}

impl Validate for Ffnt {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("Ffnt", |ctx| {
            if self.magic != FFNT_TAG && self.magic != CFNU_TAG {
                ctx.in_field("magic", |ctx| {
                    ctx.report(format!("unknown magic '{}'", self.magic))
                });
            }
        })
    }
}

impl FromTableRef<read_ffnt::Ffnt<'_>> for Ffnt {
    fn from_table_ref(from: &read_ffnt::Ffnt) -> Self {
        Ffnt {
            magic: from.magic(),
            version: from.version(),
            file_size: from.file_size(),
            block_read_hint: from.block_read_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bffnt_test_data::SIMPLE;
    use read::{FontData, FontRead};

    #[test]
    fn encode_header() {
        let read = read_ffnt::Ffnt::read(FontData::new(SIMPLE)).unwrap();
        let header = Ffnt::from_table_ref(&read);
        assert_eq!(header.file_size, 0x110);
        assert_eq!(header.encode(0x110), &SIMPLE[..FFNT_HEADER_LEN]);
        // the recorded size is only informational
        let bytes = header.encode(0x200);
        assert_eq!(&bytes[12..16], &[0, 0, 2, 0]);
    }

    #[test]
    fn magic() {
        let mut header = Ffnt::default();
        assert!(header.validate().is_ok());
        header.magic = CFNU_TAG;
        assert!(header.validate().is_ok());
        header.magic = Tag::new(b"FNTA");
        assert!(header.validate().is_err());
    }
}
