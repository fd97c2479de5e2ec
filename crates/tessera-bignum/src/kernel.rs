//! Magnitude arithmetic on little-endian limb slices.
//!
//! Kernels take unsigned magnitudes and return freshly allocated,
//! normalized results. Signs are handled by callers. All buffers come from
//! [`buffer`], so exhausting memory surfaces as an error rather than an
//! abort. Not constant time.

use std::cmp::Ordering;

use crate::{
    error::{BigIntError, Result},
    mpi::{LIMB_BITS, Limb},
};

/// Zero-filled limb buffer of exactly `len` limbs.
pub(crate) fn buffer(len: usize) -> Result<Vec<Limb>> {
    let mut limbs = Vec::new();
    reserve(&mut limbs, len)?;
    limbs.resize(len, 0);
    Ok(limbs)
}

/// Reserve room for `additional` more limbs.
pub(crate) fn reserve(limbs: &mut Vec<Limb>, additional: usize) -> Result<()> {
    Ok(tessera_handle::allocator::try_reserve(limbs, additional)?)
}

/// Copy of `limbs` in a fallibly allocated buffer.
pub(crate) fn copy(limbs: &[Limb]) -> Result<Vec<Limb>> {
    let mut out = Vec::new();
    reserve(&mut out, limbs.len())?;
    out.extend_from_slice(limbs);
    Ok(out)
}

/// Remove trailing zero limbs.
pub(crate) fn trim(limbs: &mut Vec<Limb>) {
    let len = significant(limbs).len();
    limbs.truncate(len);
}

/// `limbs` without its trailing zero limbs.
pub(crate) fn significant(limbs: &[Limb]) -> &[Limb] {
    let len = limbs.iter().rposition(|&limb| limb != 0).map_or(0, |top| top + 1);
    &limbs[..len]
}

/// Number of significant bits.
pub(crate) fn bit_len(limbs: &[Limb]) -> usize {
    let limbs = significant(limbs);
    match limbs.last() {
        Some(&top) => limbs.len() * LIMB_BITS - top.leading_zeros() as usize,
        None => 0,
    }
}

/// Compare two magnitudes.
pub(crate) fn cmp(a: &[Limb], b: &[Limb]) -> Ordering {
    let (a, b) = (significant(a), significant(b));
    a.len().cmp(&b.len()).then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

/// `a + b`.
pub(crate) fn add(a: &[Limb], b: &[Limb]) -> Result<Vec<Limb>> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = buffer(long.len() + 1)?;

    let mut carry = false;
    for (i, &limb) in long.iter().enumerate() {
        let (sum, c1) = limb.overflowing_add(short.get(i).copied().unwrap_or(0));
        let (sum, c2) = sum.overflowing_add(Limb::from(carry));
        out[i] = sum;
        carry = c1 || c2;
    }
    out[long.len()] = Limb::from(carry);

    trim(&mut out);
    Ok(out)
}

/// `a - b`; requires `a >= b`.
pub(crate) fn sub(a: &[Limb], b: &[Limb]) -> Result<Vec<Limb>> {
    let b = significant(b);
    if b.len() > a.len() {
        return Err(BigIntError::backend("sub"));
    }

    let mut out = buffer(a.len())?;
    let mut borrow = false;
    for (i, &limb) in a.iter().enumerate() {
        let (diff, b1) = limb.overflowing_sub(b.get(i).copied().unwrap_or(0));
        let (diff, b2) = diff.overflowing_sub(Limb::from(borrow));
        out[i] = diff;
        borrow = b1 || b2;
    }

    if borrow {
        return Err(BigIntError::backend("sub"));
    }

    trim(&mut out);
    Ok(out)
}

/// `a * b` by schoolbook multiplication.
pub(crate) fn mul(a: &[Limb], b: &[Limb]) -> Result<Vec<Limb>> {
    let (a, b) = (significant(a), significant(b));
    if a.is_empty() || b.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = buffer(a.len() + b.len())?;
    for (i, &x) in a.iter().enumerate() {
        let mut carry: u128 = 0;
        for (j, &y) in b.iter().enumerate() {
            let t = u128::from(x) * u128::from(y) + u128::from(out[i + j]) + carry;
            out[i + j] = t as Limb;
            carry = t >> LIMB_BITS;
        }
        out[i + b.len()] = carry as Limb;
    }

    trim(&mut out);
    Ok(out)
}

/// Truncating division: returns `(u / v, u % v)`.
pub(crate) fn div_rem(u: &[Limb], v: &[Limb]) -> Result<(Vec<Limb>, Vec<Limb>)> {
    let (u, v) = (significant(u), significant(v));

    let Some(&divisor_top) = v.last() else {
        return Err(BigIntError::DivisionByZero);
    };

    if cmp(u, v) == Ordering::Less {
        return Ok((Vec::new(), copy(u)?));
    }

    if v.len() == 1 {
        let mut quotient = copy(u)?;
        let remainder = div_rem_small_in_place(&mut quotient, divisor_top)?;
        let remainder = if remainder == 0 { Vec::new() } else { copy(&[remainder])? };
        return Ok((quotient, remainder));
    }

    knuth_div_rem(u, v)
}

/// Knuth, TAOCP vol. 2, 4.3.1 Algorithm D. Requires `v.len() >= 2` and
/// `u >= v`, both normalized.
fn knuth_div_rem(u: &[Limb], v: &[Limb]) -> Result<(Vec<Limb>, Vec<Limb>)> {
    const BASE: u128 = 1 << LIMB_BITS;

    let n = v.len();
    let m = u.len() - n;
    let shift = v[n - 1].leading_zeros();

    // D1: normalize so the divisor's top bit is set
    let vn = shift_left_within(v, shift, n)?;
    let mut un = shift_left_within(u, shift, u.len() + 1)?;
    let mut quotient = buffer(m + 1)?;

    let v_top = u128::from(vn[n - 1]);
    let v_next = u128::from(vn[n - 2]);

    for j in (0..=m).rev() {
        // D3: estimate the quotient digit
        let numerator = (u128::from(un[j + n]) << LIMB_BITS) | u128::from(un[j + n - 1]);
        let mut q_hat = numerator / v_top;
        let mut r_hat = numerator % v_top;

        while q_hat >= BASE || q_hat * v_next > ((r_hat << LIMB_BITS) | u128::from(un[j + n - 2])) {
            q_hat -= 1;
            r_hat += v_top;
            if r_hat >= BASE {
                break;
            }
        }

        // D4: multiply and subtract
        let mut borrow: i128 = 0;
        let mut carry: u128 = 0;
        for i in 0..n {
            let product = q_hat * u128::from(vn[i]) + carry;
            carry = product >> LIMB_BITS;
            let t = i128::from(un[i + j]) - borrow - i128::from(product as Limb);
            un[i + j] = t as Limb;
            borrow = i128::from(t < 0);
        }
        let t = i128::from(un[j + n]) - borrow - carry as i128;
        un[j + n] = t as Limb;

        // D5/D6: the estimate was one too large, add the divisor back
        if t < 0 {
            if q_hat == 0 {
                return Err(BigIntError::backend("div_rem"));
            }
            q_hat -= 1;
            let mut carry: u128 = 0;
            for i in 0..n {
                let sum = u128::from(un[i + j]) + u128::from(vn[i]) + carry;
                un[i + j] = sum as Limb;
                carry = sum >> LIMB_BITS;
            }
            un[j + n] = un[j + n].wrapping_add(carry as Limb);
        }

        quotient[j] = q_hat as Limb;
    }

    // D8: unnormalize the remainder
    let mut remainder = shift_right_within(&un[..n], shift)?;
    trim(&mut quotient);
    trim(&mut remainder);
    Ok((quotient, remainder))
}

/// `limbs << shift` for `shift < LIMB_BITS`, into a buffer of `len` limbs.
fn shift_left_within(limbs: &[Limb], shift: u32, len: usize) -> Result<Vec<Limb>> {
    let mut out = buffer(len)?;
    let mut carry: Limb = 0;
    for (i, &limb) in limbs.iter().enumerate() {
        out[i] = (limb << shift) | carry;
        carry = if shift == 0 { 0 } else { limb >> (LIMB_BITS as u32 - shift) };
    }
    if let Some(slot) = out.get_mut(limbs.len()) {
        *slot = carry;
    }
    Ok(out)
}

/// `limbs >> shift` for `shift < LIMB_BITS`.
fn shift_right_within(limbs: &[Limb], shift: u32) -> Result<Vec<Limb>> {
    let mut out = buffer(limbs.len())?;
    for i in 0..limbs.len() {
        let high = match limbs.get(i + 1) {
            Some(&next) if shift != 0 => next << (LIMB_BITS as u32 - shift),
            _ => 0,
        };
        out[i] = (limbs[i] >> shift) | high;
    }
    Ok(out)
}

/// Divide in place by a single limb and return the remainder.
pub(crate) fn div_rem_small_in_place(limbs: &mut Vec<Limb>, divisor: Limb) -> Result<Limb> {
    if divisor == 0 {
        return Err(BigIntError::DivisionByZero);
    }

    let divisor = u128::from(divisor);
    let mut remainder: u128 = 0;
    for limb in limbs.iter_mut().rev() {
        let current = (remainder << LIMB_BITS) | u128::from(*limb);
        *limb = (current / divisor) as Limb;
        remainder = current % divisor;
    }

    trim(limbs);
    Ok(remainder as Limb)
}

/// `limbs = limbs * factor + addend`, in place.
pub(crate) fn mul_small_add_in_place(limbs: &mut Vec<Limb>, factor: Limb, addend: Limb) -> Result<()> {
    let mut carry = u128::from(addend);
    for limb in limbs.iter_mut() {
        let t = u128::from(*limb) * u128::from(factor) + carry;
        *limb = t as Limb;
        carry = t >> LIMB_BITS;
    }
    if carry != 0 {
        reserve(limbs, 1)?;
        limbs.push(carry as Limb);
    }
    trim(limbs);
    Ok(())
}

/// `a << bits`.
pub(crate) fn shl(a: &[Limb], bits: usize) -> Result<Vec<Limb>> {
    let a = significant(a);
    if a.is_empty() {
        return Ok(Vec::new());
    }

    let limb_shift = bits / LIMB_BITS;
    let bit_shift = (bits % LIMB_BITS) as u32;
    let len = limb_shift
        .checked_add(a.len() + 1)
        .ok_or(BigIntError::AllocationFailure { limbs: usize::MAX })?;

    let mut out = buffer(len)?;
    let shifted = shift_left_within(a, bit_shift, a.len() + 1)?;
    out[limb_shift..].copy_from_slice(&shifted);

    trim(&mut out);
    Ok(out)
}

/// `a >> bits`, truncating.
pub(crate) fn shr(a: &[Limb], bits: usize) -> Result<Vec<Limb>> {
    let a = significant(a);
    let limb_shift = bits / LIMB_BITS;
    if limb_shift >= a.len() {
        return Ok(Vec::new());
    }

    let mut out = shift_right_within(&a[limb_shift..], (bits % LIMB_BITS) as u32)?;
    trim(&mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_limbs(value: u128) -> Vec<Limb> {
        let mut limbs = vec![value as Limb, (value >> 64) as Limb];
        trim(&mut limbs);
        limbs
    }

    fn to_u128(limbs: &[Limb]) -> u128 {
        let limbs = significant(limbs);
        assert!(limbs.len() <= 2, "value does not fit in u128");
        limbs.iter().rev().fold(0u128, |acc, &limb| (acc << 64) | u128::from(limb))
    }

    #[test]
    fn add_carries_across_limbs() {
        let sum = add(&[Limb::MAX], &[1]).unwrap();
        assert_eq!(sum, vec![0, 1]);
    }

    #[test]
    fn sub_borrows_across_limbs() {
        let diff = sub(&[0, 1], &[1]).unwrap();
        assert_eq!(diff, vec![Limb::MAX]);
    }

    #[test]
    fn sub_underflow_is_backend_failure() {
        assert_eq!(sub(&[1], &[2]), Err(BigIntError::ArithmeticBackend { operation: "sub" }));
    }

    #[test]
    fn mul_matches_u128() {
        let a = 0xFFFF_FFFF_FFFF_FFFF_u128;
        let b = 0x1234_5678_9ABC_DEF0_u128;
        assert_eq!(to_u128(&mul(&to_limbs(a), &to_limbs(b)).unwrap()), a * b);
    }

    #[test]
    fn mul_by_zero_is_empty() {
        assert!(mul(&[5], &[]).unwrap().is_empty());
    }

    #[test]
    fn div_rem_single_limb() {
        let (q, r) = div_rem(&to_limbs(1_000_000_000_000_000_000), &[3]).unwrap();
        assert_eq!(to_u128(&q), 333_333_333_333_333_333);
        assert_eq!(to_u128(&r), 1);
    }

    #[test]
    fn div_rem_multi_limb_matches_u128() {
        let cases = [
            (u128::MAX, 0x1_0000_0000_0000_0001_u128),
            (0xDEAD_BEEF_0000_0000_CAFE_BABE_1234_5678, 0x1_FFFF_FFFF_FFFF_FFFF),
            (0x8000_0000_0000_0000_0000_0000_0000_0000, 0x8000_0000_0000_0000_0000_0000_0000_0001),
        ];

        for (u, v) in cases {
            let (q, r) = div_rem(&to_limbs(u), &to_limbs(v)).unwrap();
            assert_eq!(to_u128(&q), u / v, "quotient of {u:#x} / {v:#x}");
            assert_eq!(to_u128(&r), u % v, "remainder of {u:#x} % {v:#x}");
        }
    }

    #[test]
    fn div_rem_three_by_two_limbs() {
        // (2^128 + 5) * (2^64 + 7) + 11, divided by 2^64 + 7
        let divisor = to_limbs((1u128 << 64) + 7);
        let factor = vec![5, 0, 1];
        let product = mul(&factor, &divisor).unwrap();
        let dividend = add(&product, &[11]).unwrap();

        let (q, r) = div_rem(&dividend, &divisor).unwrap();
        assert_eq!(q, factor);
        assert_eq!(r, vec![11]);
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(div_rem(&[1], &[]), Err(BigIntError::DivisionByZero));
        assert_eq!(div_rem_small_in_place(&mut vec![1], 0), Err(BigIntError::DivisionByZero));
    }

    #[test]
    fn smaller_dividend_is_remainder() {
        let (q, r) = div_rem(&[3], &[0, 1]).unwrap();
        assert!(q.is_empty());
        assert_eq!(r, vec![3]);
    }

    #[test]
    fn shifts_cross_limb_boundaries() {
        assert_eq!(shl(&[1], 64).unwrap(), vec![0, 1]);
        assert_eq!(shl(&[Limb::MAX], 4).unwrap(), vec![Limb::MAX << 4, 0xF]);
        assert_eq!(shr(&[0, 1], 1).unwrap(), vec![1 << 63]);
        assert!(shr(&[0, 1], 128).unwrap().is_empty());
    }

    #[test]
    fn huge_shift_reports_allocation_failure() {
        let result = shl(&[1], usize::MAX / 2);
        assert!(matches!(result, Err(BigIntError::AllocationFailure { .. })));
    }

    #[test]
    fn mul_small_add_grows() {
        let mut limbs = vec![Limb::MAX];
        mul_small_add_in_place(&mut limbs, 2, 3).unwrap();
        assert_eq!(to_u128(&limbs), u128::from(Limb::MAX) * 2 + 3);
    }

    #[test]
    fn bit_len_ignores_trailing_zero_limbs() {
        assert_eq!(bit_len(&[]), 0);
        assert_eq!(bit_len(&[1, 0]), 1);
        assert_eq!(bit_len(&[0, 1]), 65);
    }

    #[test]
    fn cmp_orders_by_value() {
        assert_eq!(cmp(&[1, 1], &[Limb::MAX]), Ordering::Greater);
        assert_eq!(cmp(&[5, 0], &[5]), Ordering::Equal);
        assert_eq!(cmp(&[], &[1]), Ordering::Less);
    }
}
