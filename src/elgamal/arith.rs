//! Modular arithmetic used by every layer of the cryptosystem.
//!
//! Inputs are accepted as anything convertible to a [`BigInt`] so that signed
//! values can be checked (and rejected) explicitly instead of being ruled out
//! by the type system alone. Results are always reduced into `[0, modulus)`.

use num_bigint::{BigInt, BigUint, ToBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{Error, Result};

/// Computes `base^exponent mod modulus` by left-to-right square-and-multiply.
///
/// Every intermediate product is reduced modulo `modulus`, so no value grows
/// beyond `modulus^2`. A zero exponent yields `1`.
///
/// # Errors
/// - [`Error::InvalidArgument`] if `modulus < 2` or `exponent` is negative.
pub fn mod_pow<B, E>(base: &B, exponent: &E, modulus: &BigUint) -> Result<BigUint>
where
    B: ToBigInt + ?Sized,
    E: ToBigInt + ?Sized,
{
    check_modulus(modulus)?;

    let exponent = to_bigint(exponent)?;
    if exponent.is_negative() {
        return Err(Error::InvalidArgument(format!(
            "negative exponent {exponent} is not supported"
        )));
    }
    let base = reduce(base, modulus)?;
    Ok(square_and_multiply(&base, exponent.magnitude(), modulus))
}

/// Unchecked core of [`mod_pow`]; `modulus` must be at least 2.
pub(crate) fn square_and_multiply(
    base: &BigUint,
    exponent: &BigUint,
    modulus: &BigUint,
) -> BigUint {
    let base = base % modulus;
    let mut result = BigUint::one();
    for i in (0..exponent.bits()).rev() {
        result = (&result * &result) % modulus;
        if exponent.bit(i) {
            result = (&result * &base) % modulus;
        }
    }
    result
}

/// Finds `x` in `[1, modulus)` with `a * x ≡ 1 (mod modulus)`.
///
/// # Errors
/// - [`Error::InvalidArgument`] if `modulus < 2`.
/// - [`Error::NoInverseExists`] if `gcd(a, modulus) != 1`.
pub fn mod_inverse<A>(a: &A, modulus: &BigUint) -> Result<BigUint>
where
    A: ToBigInt + ?Sized,
{
    check_modulus(modulus)?;

    let value = reduce(a, modulus)?;
    let m = BigInt::from(modulus.clone());
    let (g, x, _) = extended_gcd(&BigInt::from(value.clone()), &m);
    if !g.is_one() {
        return Err(Error::NoInverseExists {
            value,
            modulus: modulus.clone(),
        });
    }
    Ok(x.mod_floor(&m).into_parts().1)
}

/// Extended Euclidean algorithm.
/// Returns `(g, x, y)` such that `a*x + b*y = g = gcd(a, b)`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        (a.clone(), BigInt::one(), BigInt::zero())
    } else {
        let (q, r) = a.div_rem(b);
        let (g, x, y) = extended_gcd(b, &r);
        (g, y.clone(), x - &q * y)
    }
}

/// Reduces any integer into `[0, modulus)`.
pub(crate) fn reduce<T>(value: &T, modulus: &BigUint) -> Result<BigUint>
where
    T: ToBigInt + ?Sized,
{
    let value = to_bigint(value)?;
    let m = BigInt::from(modulus.clone());
    Ok(value.mod_floor(&m).into_parts().1)
}

fn check_modulus(modulus: &BigUint) -> Result<()> {
    if *modulus < BigUint::from(2u32) {
        return Err(Error::InvalidArgument(format!(
            "modulus must be at least 2, got {modulus}"
        )));
    }
    Ok(())
}

fn to_bigint<T>(value: &T) -> Result<BigInt>
where
    T: ToBigInt + ?Sized,
{
    value
        .to_bigint()
        .ok_or_else(|| Error::InvalidArgument("value is not an integer".to_string()))
}
