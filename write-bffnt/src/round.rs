//! Rounding scaled metrics back into their on-disk fields.

use crate::error::RangeError;

/// Convert a scaled value to an integer field, failing if it does not fit.
pub trait RoundChecked<U>: Sized {
    /// Round to the nearest integer, with halves rounded up.
    fn round_checked(self, field: &'static str) -> Result<U, RangeError>;

    /// Round towards positive infinity.
    fn ceil_checked(self, field: &'static str) -> Result<U, RangeError>;
}

macro_rules! round_checked {
    ($ty:ty) => {
        impl RoundChecked<$ty> for f64 {
            #[inline]
            fn round_checked(self, field: &'static str) -> Result<$ty, RangeError> {
                checked((self + 0.5).floor(), field)
            }

            #[inline]
            fn ceil_checked(self, field: &'static str) -> Result<$ty, RangeError> {
                checked(self.ceil(), field)
            }
        }
    };
}

round_checked!(u8);
round_checked!(i8);
round_checked!(u16);
round_checked!(i16);

fn checked<U>(rounded: f64, field: &'static str) -> Result<U, RangeError>
where
    U: TryFrom<i64>,
{
    if !rounded.is_finite() {
        return Err(RangeError::new(field, rounded));
    }
    U::try_from(rounded as i64).map_err(|_| RangeError::new(field, rounded))
}

/// Scale an unsigned or signed integer field by `factor`, rounding to nearest.
pub(crate) fn scale<T, U>(value: T, factor: f64, field: &'static str) -> Result<U, RangeError>
where
    T: Into<f64>,
    f64: RoundChecked<U>,
{
    (value.into() * factor).round_checked(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_up() {
        let x: u8 = 2.5f64.round_checked("x").unwrap();
        assert_eq!(x, 3);
        let x: i8 = (-2.5f64).round_checked("x").unwrap();
        assert_eq!(x, -2);
        let x: i16 = (-2.5f64).ceil_checked("x").unwrap();
        assert_eq!(x, -2);
    }

    #[test]
    fn out_of_range() {
        let err = <f64 as RoundChecked<u8>>::round_checked(255.6, "width").unwrap_err();
        assert_eq!(err, RangeError::new("width", 256.0));
        assert!(<f64 as RoundChecked<u8>>::round_checked(-1.0, "width").is_err());
        assert!(<f64 as RoundChecked<i16>>::ceil_checked(f64::NAN, "kern").is_err());
        assert!(<f64 as RoundChecked<u16>>::round_checked(f64::INFINITY, "h").is_err());
    }

    #[test]
    fn scale_fields() {
        assert_eq!(scale::<u8, u8>(12, 1.5, "height"), Ok(18));
        assert_eq!(scale::<i8, i8>(-3, 2.0, "left"), Ok(-6));
        assert!(scale::<u8, u8>(200, 2.0, "height").is_err());
    }
}
