//! Per-block ElGamal encryption and decryption.
//!
//! Every block is transformed independently: encryption draws a fresh
//! ephemeral exponent `r` and nothing is carried from one block to the next,
//! so blocks may be processed in any order or in parallel.

use log::trace;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;

use super::arith::{mod_inverse, mod_pow};
use super::keys::{PrivateKey, PublicKey};
use super::rng::rng_from_seed;
use crate::error::{Error, Result};

/// An encrypted block `(c1, c2)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ciphertext {
    /// `g^r mod p`.
    pub c1: BigUint,
    /// `m * e2^r mod p`.
    pub c2: BigUint,
}

/// Configuration for encryption.
#[derive(Debug, Clone, Default)]
pub struct EncryptConfig {
    /// Optional RNG seed for reproducible ephemeral exponents.
    pub seed: Option<u64>,
}

/// Encrypts the block `m` with a fresh ephemeral exponent from `rng`.
///
/// # Errors
/// - [`Error::BlockTooLarge`] if `m >= p`.
/// - [`Error::InvalidKey`] if `p < 3`.
pub fn encrypt_block<R>(m: &BigUint, key: &PublicKey, rng: &mut R) -> Result<Ciphertext>
where
    R: Rng + ?Sized,
{
    check_block(m, &key.p)?;
    if key.p < BigUint::from(3u32) {
        return Err(Error::InvalidKey(format!("modulus {} is too small", key.p)));
    }
    // r in [1, p - 2]
    let r = rng.gen_biguint_range(&BigUint::one(), &(&key.p - BigUint::one()));
    encrypt_block_with_ephemeral(m, key, &r)
}

/// Encrypts the block `m` with a caller-chosen ephemeral exponent `r`.
///
/// `r` must never be reused across blocks; this entry point exists for
/// known-answer tests.
///
/// # Errors
/// - [`Error::BlockTooLarge`] if `m >= p`.
/// - [`Error::InvalidArgument`] if `r` lies outside `[1, p - 2]`.
pub fn encrypt_block_with_ephemeral(
    m: &BigUint,
    key: &PublicKey,
    r: &BigUint,
) -> Result<Ciphertext> {
    check_block(m, &key.p)?;
    if r.is_zero() || *r >= &key.p - BigUint::one() {
        return Err(Error::InvalidArgument(format!(
            "ephemeral exponent {r} is outside [1, p - 2]"
        )));
    }

    let c1 = mod_pow(&key.g, r, &key.p)?;
    let shared = mod_pow(&key.e2, r, &key.p)?;
    let c2 = (m * shared) % &key.p;
    trace!("encrypted block into ({c1}, {c2})");
    Ok(Ciphertext { c1, c2 })
}

/// Recovers the block from `(c1, c2)` as `c2 * (c1^d)^-1 mod p`.
///
/// # Errors
/// - [`Error::InvalidCipherBlock`] if `c1 == 0`, `c1 >= p` or `c2 >= p`.
/// - [`Error::NoInverseExists`] if the shared secret is not invertible,
///   which indicates a corrupted key.
pub fn decrypt_block(ciphertext: &Ciphertext, key: &PrivateKey) -> Result<BigUint> {
    let Ciphertext { c1, c2 } = ciphertext;
    if c1.is_zero() {
        return Err(Error::InvalidCipherBlock("c1 must not be zero".to_string()));
    }
    if *c1 >= key.p || *c2 >= key.p {
        return Err(Error::InvalidCipherBlock(format!(
            "({c1}, {c2}) is not reduced modulo {}",
            key.p
        )));
    }

    let shared = mod_pow(c1, &key.d, &key.p)?;
    let inverse = mod_inverse(&shared, &key.p)?;
    Ok((c2 * inverse) % &key.p)
}

impl PublicKey {
    /// Encrypts one block with the RNG described by `config.seed`.
    pub fn encrypt(&self, m: &BigUint, config: &EncryptConfig) -> Result<Ciphertext> {
        let mut rng = rng_from_seed(config.seed);
        encrypt_block(m, self, &mut rng)
    }
}

impl PrivateKey {
    /// Decrypts one block.
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint> {
        decrypt_block(ciphertext, self)
    }
}

fn check_block(m: &BigUint, p: &BigUint) -> Result<()> {
    if m >= p {
        return Err(Error::BlockTooLarge {
            block: m.clone(),
            modulus: p.clone(),
        });
    }
    Ok(())
}
