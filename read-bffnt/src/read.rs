//! Traits for interpreting container data

use types::Tag;

use crate::font_data::FontData;

/// A type that can be read from raw container data.
///
/// This is implemented for structures that are self-describing: that is,
/// structures that do not require any external state in order to interpret
/// their underlying bytes.
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing validation.
    ///
    /// Implementations are responsible for ensuring the input data is
    /// consistent: every array length and offset that an accessor relies on
    /// is checked here, so that accessors themselves cannot fail.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// A section of the container: a tagged, size-prefixed region of bytes.
///
/// Every section starts with its four byte tag and a `u32` size which
/// includes those eight bytes. Offsets elsewhere in the file point just past
/// this header.
pub trait Section<'a>: Sized {
    /// The magic at the start of the section.
    const TAG: Tag;

    /// The length of the fixed part of the section, including the tag and size.
    const HEADER_LEN: usize;

    /// Read the section.
    ///
    /// `data` covers exactly the declared size of the section, starting at its
    /// tag; `position` is the absolute position of that tag in the file.
    fn read_section(data: FontData<'a>, position: usize) -> Result<Self, ReadError>;
}

/// An error that occurs when reading container data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The buffer is shorter than a section declares or requires.
    TruncatedInput,
    /// A section did not start with the expected magic.
    InvalidMagic { expected: Tag, found: Tag },
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    MalformedData(&'static str),
}

impl ReadError {
    /// `true` for errors that indicate corrupt or unsupported data, as
    /// opposed to data that ends too early.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, ReadError::TruncatedInput)
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReadError::TruncatedInput => write!(f, "Unexpected end of data"),
            ReadError::InvalidMagic { expected, found } => {
                write!(f, "Expected section '{expected}', found '{found}'")
            }
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}
