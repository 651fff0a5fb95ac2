//! Errors that occur during editing and writing

use read::ReadError;

use crate::validate::ValidationReport;

/// A value does not fit in the field that stores it.
///
/// Returned by scaling, and by encoding when a computed offset or count
/// overflows its on-disk width.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeError {
    /// The name of the field.
    pub field: &'static str,
    /// The value that did not fit.
    pub value: f64,
}

/// An error occured while decoding or writing a container
#[derive(Debug)]
pub enum Error {
    Read(ReadError),
    OutOfRange(RangeError),
    ValidationFailed(ValidationReport),
}

impl RangeError {
    pub fn new(field: &'static str, value: impl Into<f64>) -> Self {
        RangeError {
            field,
            value: value.into(),
        }
    }
}

impl From<ReadError> for Error {
    fn from(value: ReadError) -> Self {
        Error::Read(value)
    }
}

impl From<RangeError> for Error {
    fn from(value: RangeError) -> Self {
        Error::OutOfRange(value)
    }
}

impl From<ValidationReport> for Error {
    fn from(value: ValidationReport) -> Self {
        Error::ValidationFailed(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Read(error) => error.fmt(f),
            Error::OutOfRange(error) => error.fmt(f),
            Error::ValidationFailed(report) => report.fmt(f),
        }
    }
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Value {} is out of range for '{}'", self.value, self.field)
    }
}

impl std::error::Error for RangeError {}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read(error) => Some(error),
            Error::OutOfRange(error) => Some(error),
            Error::ValidationFailed(_) => None,
        }
    }
}
