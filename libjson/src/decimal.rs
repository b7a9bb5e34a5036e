//! Arbitrary-precision decimal numbers.
//!
//! Used for JSON numbers whose magnitude does not fit in an `f64`. The value
//! is `unscaled × 10^(-scale)`.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use thiserror::Error;

/// Error returned when a string is not a decimal literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDecimalError {
    #[error("invalid decimal literal")]
    Invalid,
    #[error("decimal exponent out of range")]
    ExponentOutOfRange,
}

/// An arbitrary-precision decimal.
///
/// Equality is numeric: `2.50e400` and `2.5e400` compare equal even though
/// their scales differ.
#[derive(Clone, Debug)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: i64,
}

impl BigDecimal {
    pub fn new(unscaled: BigInt, scale: i64) -> Self {
        Self { unscaled, scale }
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Nearest `f64`; infinite when the magnitude is out of range.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Strip trailing zeros from the unscaled value.
    fn normalized(&self) -> (BigInt, i128) {
        if self.unscaled.is_zero() {
            return (BigInt::zero(), 0);
        }
        let ten = BigInt::from(10);
        let mut unscaled = self.unscaled.clone();
        let mut scale = i128::from(self.scale);
        while (&unscaled % &ten).is_zero() {
            unscaled /= &ten;
            scale -= 1;
        }
        (unscaled, scale)
    }
}

impl From<BigInt> for BigDecimal {
    fn from(n: BigInt) -> Self {
        Self::new(n, 0)
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for BigDecimal {}

impl FromStr for BigDecimal {
    type Err = ParseDecimalError;

    /// Parse `[-+]digits[.digits][(e|E)[-+]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
            Some(i) => (&s[..i], &s[i + 1..]),
            None => (s, "0"),
        };
        let exponent: i64 = exponent.parse().map_err(|e: std::num::ParseIntError| {
            match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    ParseDecimalError::ExponentOutOfRange
                }
                _ => ParseDecimalError::Invalid,
            }
        })?;

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let unsigned = int_part
            .strip_prefix('-')
            .or_else(|| int_part.strip_prefix('+'))
            .unwrap_or(int_part);
        let all_digits = unsigned
            .chars()
            .chain(frac_part.chars())
            .all(|c| c.is_ascii_digit());
        if !all_digits || (unsigned.is_empty() && frac_part.is_empty()) {
            return Err(ParseDecimalError::Invalid);
        }

        let digits = format!("{}{}", int_part, frac_part);
        let unscaled: BigInt = digits.parse().map_err(|_| ParseDecimalError::Invalid)?;
        let scale = i64::try_from(frac_part.len())
            .ok()
            .and_then(|frac_len| frac_len.checked_sub(exponent))
            .ok_or(ParseDecimalError::ExponentOutOfRange)?;
        Ok(Self::new(unscaled, scale))
    }
}

impl fmt::Display for BigDecimal {
    /// Scientific form with one leading digit, e.g. `2.5e308`, `-1e-400`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (unscaled, scale) = self.normalized();
        let digits = unscaled.magnitude().to_string();
        if unscaled.is_negative() {
            f.write_str("-")?;
        }
        let (head, tail) = digits.split_at(1);
        f.write_str(head)?;
        if !tail.is_empty() {
            write!(f, ".{}", tail)?;
        }
        let exponent = digits.len() as i128 - 1 - scale;
        if exponent != 0 {
            write!(f, "e{}", exponent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_components() {
        let d = dec("2.5e308");
        assert_eq!(d.unscaled(), &BigInt::from(25));
        assert_eq!(d.scale(), -307);

        let d = dec("-123.456");
        assert_eq!(d.unscaled(), &BigInt::from(-123456));
        assert_eq!(d.scale(), 3);

        let d = dec("1E-5");
        assert_eq!(d.unscaled(), &BigInt::from(1));
        assert_eq!(d.scale(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(dec("2.5e308").to_string(), "2.5e308");
        assert_eq!(dec("-25000e-4").to_string(), "-2.5");
        assert_eq!(dec("-25000e-3").to_string(), "-2.5e1");
        assert_eq!(dec("123.456").to_string(), "1.23456e2");
        assert_eq!(dec("0.00").to_string(), "0");
        assert_eq!(dec("7").to_string(), "7");
        assert_eq!(dec("1e-400").to_string(), "1e-400");
    }

    #[test]
    fn test_numeric_equality() {
        assert_eq!(dec("2.50e400"), dec("2.5e400"));
        assert_eq!(dec("25e399"), dec("2.5e400"));
        assert_eq!(dec("-0.0"), dec("0"));
        assert_ne!(dec("2.5e400"), dec("-2.5e400"));
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(dec("1.5").to_f64(), 1.5);
        assert_eq!(dec("2.5e308").to_f64(), f64::INFINITY);
        assert_eq!(dec("-2.5e308").to_f64(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_invalid() {
        assert_eq!("".parse::<BigDecimal>(), Err(ParseDecimalError::Invalid));
        assert_eq!("1.2.3".parse::<BigDecimal>(), Err(ParseDecimalError::Invalid));
        assert_eq!("1_000".parse::<BigDecimal>(), Err(ParseDecimalError::Invalid));
        assert_eq!("e5".parse::<BigDecimal>(), Err(ParseDecimalError::Invalid));
        assert_eq!(
            "1e99999999999999999999".parse::<BigDecimal>(),
            Err(ParseDecimalError::ExponentOutOfRange)
        );
    }
}
