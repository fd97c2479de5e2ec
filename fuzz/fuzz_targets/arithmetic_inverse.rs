//! Fuzz target for big integer arithmetic
//!
//! Builds operands from arbitrary bytes and checks algebraic identities that
//! must hold for every input.
//!
//! # Invariants
//!
//! - (a + b) - b == a
//! - (a * b) / b == a for non-zero b
//! - a == q * b + r with |r| < |b|
//! - (a << n) >> n == a
//! - Division by zero is an error, never a panic, and leaves the receiver alone

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tessera_bignum::{BigInt, BigIntError, Endianness, Sign};

#[derive(Debug, Arbitrary)]
struct Operands {
    a: Vec<u8>,
    a_negative: bool,
    b: Vec<u8>,
    b_negative: bool,
    shift: u16,
}

fuzz_target!(|input: Operands| {
    let a = BigInt::from_bytes(&input.a, Sign::from_negative(input.a_negative), Endianness::Big).expect("a");
    let b = BigInt::from_bytes(&input.b, Sign::from_negative(input.b_negative), Endianness::Little).expect("b");

    let sum = a.checked_add(&b).expect("add");
    assert_eq!(sum.checked_sub(&b).expect("sub"), a);

    let shift = usize::from(input.shift);
    assert_eq!(a.checked_shl(shift).expect("shl").checked_shr(shift).expect("shr"), a);

    if b.is_zero().expect("live") {
        let mut receiver = a.clone();
        assert_eq!(receiver.assign_div(&b), Err(BigIntError::DivisionByZero));
        assert_eq!(receiver, a);
        return;
    }

    let product = a.checked_mul(&b).expect("mul");
    assert_eq!(product.checked_div(&b).expect("div"), a);

    let (q, r) = a.checked_div_rem(&b).expect("div_rem");
    assert_eq!(q.checked_mul(&b).expect("mul").checked_add(&r).expect("add"), a);
    assert!(r.cmp_abs(&b).expect("cmp").is_lt());
});
