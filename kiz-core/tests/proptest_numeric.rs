// kiz-core - Property-based tests for the numeric tower
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Property-based tests for `Decimal` and `Rational`:
//! - representation invariants (normalized mantissa, reduced fraction,
//!   positive denominator)
//! - parse/display round trips
//! - arithmetic identities (commutativity, negation, inverses)
//! - ordering consistency with subtraction

use kiz_core::{BigInt, Decimal, Rational};
use num_traits::{Signed, Zero};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Mantissas small enough to keep the tests fast.
fn arb_mantissa() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

fn arb_exponent() -> impl Strategy<Value = i32> {
    -9i32..9i32
}

fn arb_decimal() -> impl Strategy<Value = Decimal> {
    (arb_mantissa(), arb_exponent())
        .prop_map(|(mantissa, exponent)| Decimal::new(BigInt::from(mantissa), exponent))
}

fn arb_rational() -> impl Strategy<Value = Rational> {
    (arb_mantissa(), arb_mantissa())
        .prop_filter("denominator must be nonzero", |(_, den)| *den != 0)
        .prop_map(|(num, den)| {
            Rational::new(BigInt::from(num), BigInt::from(den)).expect("nonzero denominator")
        })
}

// =============================================================================
// Decimal
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The mantissa never carries trailing zero digits (zero itself has
    /// exponent 0).
    #[test]
    fn decimal_is_normalized(d in arb_decimal()) {
        if d.mantissa().is_zero() {
            prop_assert_eq!(d.exponent(), 0);
        } else {
            prop_assert!(!(d.mantissa() % BigInt::from(10)).is_zero());
        }
    }

    /// Displaying and reparsing reproduces the value.
    #[test]
    fn decimal_display_round_trips(d in arb_decimal()) {
        let reparsed = Decimal::parse(&d.to_string()).expect("reparse failed");
        prop_assert_eq!(reparsed, d);
    }

    #[test]
    fn decimal_addition_commutes(a in arb_decimal(), b in arb_decimal()) {
        prop_assert_eq!(a.clone() + b.clone(), b + a);
    }

    #[test]
    fn decimal_add_neg_is_zero(a in arb_decimal()) {
        prop_assert_eq!(a.clone() + (-a), Decimal::zero());
    }

    #[test]
    fn decimal_mul_by_one_is_identity(a in arb_decimal()) {
        let one = Decimal::from_int(&BigInt::from(1));
        prop_assert_eq!(a.clone() * one, a);
    }

    /// a/b scaled back by b differs from a by less than one unit of the
    /// kept precision (division truncates).
    #[test]
    fn decimal_division_truncation_is_bounded(a in arb_decimal(), b in arb_decimal()) {
        prop_assume!(!b.is_zero());
        let quotient = a.div(&b, 10).expect("nonzero divisor");
        let error = a - (quotient * b.clone());
        let bound = Decimal::parse("1e-10").unwrap()
            * (if b.is_negative() { -b } else { b });
        let error_abs = if error.is_negative() { -error } else { error };
        prop_assert!(error_abs < bound || error_abs == Decimal::zero());
    }

    /// Ordering agrees with the sign of the difference.
    #[test]
    fn decimal_ordering_matches_subtraction(a in arb_decimal(), b in arb_decimal()) {
        let diff = a.clone() - b.clone();
        match a.cmp(&b) {
            std::cmp::Ordering::Less => prop_assert!(diff.is_negative()),
            std::cmp::Ordering::Equal => prop_assert!(diff.is_zero()),
            std::cmp::Ordering::Greater => {
                prop_assert!(!diff.is_negative() && !diff.is_zero())
            }
        }
    }
}

// =============================================================================
// Rational
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Denominator is positive and the fraction is fully reduced.
    #[test]
    fn rational_is_reduced(r in arb_rational()) {
        prop_assert!(r.denominator() > &BigInt::zero());
        let mut a = r.numerator().abs();
        let mut b = r.denominator().clone();
        while !b.is_zero() {
            let rem = &a % &b;
            a = b;
            b = rem;
        }
        // gcd(num, den) == 1, except 0/1 where the gcd is the denominator
        if r.numerator().is_zero() {
            prop_assert_eq!(r.denominator(), &BigInt::from(1));
        } else {
            prop_assert_eq!(a, BigInt::from(1));
        }
    }

    #[test]
    fn rational_addition_commutes(a in arb_rational(), b in arb_rational()) {
        prop_assert_eq!(a.clone() + b.clone(), b + a);
    }

    #[test]
    fn rational_add_neg_is_zero(a in arb_rational()) {
        let zero = Rational::from_int(&BigInt::zero());
        prop_assert_eq!(a.clone() + (-a), zero);
    }

    /// Multiplying by the inverse recovers one.
    #[test]
    fn rational_mul_by_inverse_is_one(a in arb_rational()) {
        prop_assume!(!a.is_zero());
        let one = Rational::from_int(&BigInt::from(1));
        let inverse = one.clone().div(&a).expect("nonzero");
        prop_assert_eq!(a * inverse, one);
    }

    #[test]
    fn rational_ordering_is_antisymmetric(a in arb_rational(), b in arb_rational()) {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => prop_assert_eq!(b.cmp(&a), std::cmp::Ordering::Greater),
            std::cmp::Ordering::Equal => prop_assert_eq!(&a, &b),
            std::cmp::Ordering::Greater => prop_assert_eq!(b.cmp(&a), std::cmp::Ordering::Less),
        }
    }

    /// Construction from equal cross-multiples yields equal rationals.
    #[test]
    fn rational_equality_is_representation_independent(
        num in arb_mantissa(),
        den in 1i64..1_000_000,
        scale in 1i64..1_000,
    ) {
        let plain = Rational::new(BigInt::from(num), BigInt::from(den)).unwrap();
        let scaled = Rational::new(
            BigInt::from(num) * BigInt::from(scale),
            BigInt::from(den) * BigInt::from(scale),
        )
        .unwrap();
        prop_assert_eq!(plain, scaled);
    }
}
