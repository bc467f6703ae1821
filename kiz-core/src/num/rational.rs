// kiz-core - Exact rational numbers
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Exact rational arithmetic: a reduced `BigInt` fraction with a
//! positive denominator.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// A rational number `num / den`, reduced, `den > 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

fn gcd(mut a: BigInt, mut b: BigInt) -> BigInt {
    a = a.abs();
    b = b.abs();
    while !b.is_zero() {
        let rem = &a % &b;
        a = b;
        b = rem;
    }
    a
}

impl Rational {
    /// Create a reduced rational. Returns `None` for a zero denominator.
    pub fn new(num: BigInt, den: BigInt) -> Option<Self> {
        if den.is_zero() {
            return None;
        }
        let divisor = gcd(num.clone(), den.clone());
        let (mut num, mut den) = if divisor.is_zero() {
            (num, den)
        } else {
            (num / &divisor, den / &divisor)
        };
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        Some(Rational { num, den })
    }

    /// An integer as a rational.
    pub fn from_int(value: &BigInt) -> Self {
        Rational {
            num: value.clone(),
            den: BigInt::from(1),
        }
    }

    pub fn numerator(&self) -> &BigInt {
        &self.num
    }

    pub fn denominator(&self) -> &BigInt {
        &self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Exact division. Returns `None` when `other` is zero.
    pub fn div(&self, other: &Rational) -> Option<Rational> {
        if other.is_zero() {
            return None;
        }
        Rational::new(&self.num * &other.den, &self.den * &other.num)
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, other: Rational) -> Rational {
        Rational::new(&self.num * &other.den + &other.num * &self.den, self.den * other.den)
            .expect("denominator product is nonzero")
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, other: Rational) -> Rational {
        self + (-other)
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, other: Rational) -> Rational {
        Rational::new(self.num * other.num, self.den * other.den)
            .expect("denominator product is nonzero")
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Rational) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(num: i64, den: i64) -> Rational {
        Rational::new(BigInt::from(num), BigInt::from(den)).expect("zero denominator")
    }

    #[test]
    fn reduction_and_sign() {
        assert_eq!(rat(2, 4), rat(1, 2));
        assert_eq!(rat(1, -2), rat(-1, 2));
        assert_eq!(rat(1, -2).denominator(), &BigInt::from(2));
        assert!(Rational::new(BigInt::from(1), BigInt::zero()).is_none());
    }

    #[test]
    fn arithmetic() {
        assert_eq!(rat(1, 2) + rat(1, 3), rat(5, 6));
        assert_eq!(rat(1, 2) - rat(1, 3), rat(1, 6));
        assert_eq!(rat(2, 3) * rat(3, 4), rat(1, 2));
        assert_eq!(rat(1, 2).div(&rat(1, 4)).unwrap(), rat(2, 1));
        assert!(rat(1, 2).div(&rat(0, 1)).is_none());
    }

    #[test]
    fn ordering() {
        assert!(rat(1, 3) < rat(1, 2));
        assert!(rat(-1, 2) < rat(1, 3));
        assert_eq!(rat(2, 4).cmp(&rat(1, 2)), Ordering::Equal);
    }

    #[test]
    fn display() {
        assert_eq!(rat(3, 4).to_string(), "3/4");
        assert_eq!(rat(-3, 4).to_string(), "-3/4");
    }
}
