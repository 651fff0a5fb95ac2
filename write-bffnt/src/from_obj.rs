//! Traits for converting from parsed sections to their owned equivalents

use types::{BigEndian, Scalar};

/// A conversion from a parsed container object to its owned version.
///
/// Parsed objects are validated when they are read, so this conversion
/// cannot fail. The result may still violate invariants that only matter
/// when writing; this can be checked by calling [`validate`][] on it.
///
/// [`validate`]: crate::validate::Validate::validate
pub trait FromTableRef<T: ?Sized>: Sized {
    fn from_table_ref(from: &T) -> Self;
}

/// A conversion from a parsed container object to its owned equivalent.
///
/// You should avoid implementing this trait manually. Like [`std::convert::Into`],
/// it is provided as a blanket impl when you implement [`FromTableRef<T>`].
pub trait ToOwnedTable<T> {
    fn to_owned_table(&self) -> T;
}

impl<U, T> ToOwnedTable<U> for T
where
    U: FromTableRef<T>,
{
    fn to_owned_table(&self) -> U {
        U::from_table_ref(self)
    }
}

impl<T> FromTableRef<BigEndian<T>> for T
where
    T: Scalar,
    BigEndian<T>: Copy,
{
    fn from_table_ref(from: &BigEndian<T>) -> Self {
        from.get()
    }
}
