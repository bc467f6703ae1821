// kiz-core - Arbitrary-precision decimal
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Arbitrary-precision decimal: a `BigInt` mantissa scaled by a power of
//! ten. The representation is normalized: the mantissa carries no
//! trailing zero digits (and zero itself is stored with exponent 0), so
//! equal values have equal representations.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// A decimal number `mantissa * 10^exponent`, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    mantissa: BigInt,
    exponent: i32,
}

fn ten() -> BigInt {
    BigInt::from(10)
}

fn pow10(exp: u32) -> BigInt {
    ten().pow(exp)
}

impl Decimal {
    /// Create a decimal from a raw mantissa and exponent, normalizing.
    pub fn new(mantissa: BigInt, exponent: i32) -> Self {
        let mut mantissa = mantissa;
        let mut exponent = exponent;
        if mantissa.is_zero() {
            return Decimal {
                mantissa,
                exponent: 0,
            };
        }
        let ten = ten();
        while (&mantissa % &ten).is_zero() {
            mantissa /= &ten;
            exponent += 1;
        }
        Decimal { mantissa, exponent }
    }

    /// An integer value as a decimal.
    pub fn from_int(value: &BigInt) -> Self {
        Decimal::new(value.clone(), 0)
    }

    /// Zero.
    pub fn zero() -> Self {
        Decimal::new(BigInt::zero(), 0)
    }

    /// Parse decimal text: optional sign, digits, optional fraction,
    /// optional scientific exponent (`-12.5e-3`).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (digits_part, exp_part) = match text.find(['e', 'E']) {
            Some(index) => (&text[..index], Some(&text[index + 1..])),
            None => (text, None),
        };
        let exp_shift: i32 = match exp_part {
            Some(exp_text) => exp_text.parse().ok()?,
            None => 0,
        };

        let (int_part, frac_part) = match digits_part.find('.') {
            Some(index) => (&digits_part[..index], &digits_part[index + 1..]),
            None => (digits_part, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        let mut all_digits = String::with_capacity(int_part.len() + frac_part.len());
        all_digits.push_str(int_part);
        all_digits.push_str(frac_part);
        let mantissa: BigInt = all_digits.parse().ok()?;
        let exponent = exp_shift.checked_sub(i32::try_from(frac_part.len()).ok()?)?;
        Some(Decimal::new(mantissa, exponent))
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Both mantissas rescaled to the smaller exponent.
    fn aligned(&self, other: &Decimal) -> (BigInt, BigInt, i32) {
        let exponent = self.exponent.min(other.exponent);
        let left = &self.mantissa * pow10((self.exponent - exponent) as u32);
        let right = &other.mantissa * pow10((other.exponent - exponent) as u32);
        (left, right, exponent)
    }

    /// Divide, keeping `digits` fractional digits (truncated toward
    /// zero). Returns `None` when `other` is zero.
    pub fn div(&self, other: &Decimal, digits: u32) -> Option<Decimal> {
        if other.is_zero() {
            return None;
        }
        // self/other = (ma/mb) * 10^(ea-eb); scale by 10^digits and
        // truncate to an integer quotient.
        let shift = i64::from(self.exponent) - i64::from(other.exponent) + i64::from(digits);
        let quotient = if shift >= 0 {
            (&self.mantissa * pow10(shift as u32)) / &other.mantissa
        } else {
            &self.mantissa / (&other.mantissa * pow10((-shift) as u32))
        };
        Some(Decimal::new(quotient, -(digits as i32)))
    }

    /// Raise to a non-negative integer power. Returns `None` when the
    /// exponent does not fit or the scale overflows.
    pub fn pow(&self, exp: &BigInt) -> Option<Decimal> {
        if exp.is_negative() {
            return None;
        }
        let exp = exp.to_u32()?;
        let exponent = i32::try_from(i64::from(self.exponent) * i64::from(exp)).ok()?;
        Some(Decimal::new(self.mantissa.pow(exp), exponent))
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, other: Decimal) -> Decimal {
        let (left, right, exponent) = self.aligned(&other);
        Decimal::new(left + right, exponent)
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, other: Decimal) -> Decimal {
        let (left, right, exponent) = self.aligned(&other);
        Decimal::new(left - right, exponent)
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, other: Decimal) -> Decimal {
        Decimal::new(
            self.mantissa * other.mantissa,
            self.exponent.saturating_add(other.exponent),
        )
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal {
            mantissa: -self.mantissa,
            exponent: self.exponent,
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Decimal) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Decimal) -> Ordering {
        let (left, right, _) = self.aligned(other);
        left.cmp(&right)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent >= 0 {
            let scaled = &self.mantissa * pow10(self.exponent as u32);
            return write!(f, "{}", scaled);
        }
        let digits = self.mantissa.abs().to_string();
        let frac_len = (-self.exponent) as usize;
        let sign = if self.is_negative() { "-" } else { "" };
        if digits.len() > frac_len {
            let split = digits.len() - frac_len;
            write!(f, "{}{}.{}", sign, &digits[..split], &digits[split..])
        } else {
            write!(
                f,
                "{}0.{}{}",
                sign,
                "0".repeat(frac_len - digits.len()),
                digits
            )
        }
    }
}
