//! Search for a prime modulus `p` that admits a fixed small primitive root.
//!
//! Candidates of an exact bit length are drawn at random, filtered with
//! Miller-Rabin, and accepted only once the generator is shown to be a
//! primitive root by checking `g^((p-1)/q) != 1 (mod p)` for every prime
//! factor `q` of `p - 1`. The generator is never changed; a candidate that
//! fails the check is simply discarded.

use log::{debug, info};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, ToPrimitive, Zero};
use rand::Rng;

use super::arith::mod_pow;
use super::primality::is_probably_prime;
use super::rng::rng_from_seed;
use crate::error::{Error, Result};

/// Default bit length of the modulus: `2^32 <= p < 2^33`.
pub const DEFAULT_PRIME_BITS: usize = 33;
/// The generator used for every key pair.
pub const DEFAULT_GENERATOR: u64 = 2;
/// Miller-Rabin rounds applied to each candidate modulus.
pub const DEFAULT_MILLER_RABIN_ROUNDS: usize = 20;
/// Candidates drawn before the search gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

/// Smallest supported modulus size (`p` in `{5, 7}`).
pub const MIN_PRIME_BITS: usize = 3;
/// Largest supported modulus size; `p - 1` must be fully factorable.
pub const MAX_PRIME_BITS: usize = 64;

/// Group parameters shared verbatim by the public and private key records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElGamalParams {
    /// The prime modulus.
    pub p: BigUint,
    /// A primitive root modulo `p`.
    pub g: BigUint,
}

/// Configuration for the modulus search.
#[derive(Debug, Clone)]
pub struct ParamsConfig {
    /// Exact bit length of `p`.
    pub prime_bits: usize,
    /// The fixed generator that must be a primitive root of `p`.
    pub generator: u64,
    /// Miller-Rabin rounds per candidate.
    pub rounds: usize,
    /// Upper bound on the number of candidates drawn.
    pub max_attempts: usize,
    /// Optional RNG seed for reproducible searches.
    pub seed: Option<u64>,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        ParamsConfig {
            prime_bits: DEFAULT_PRIME_BITS,
            generator: DEFAULT_GENERATOR,
            rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}

impl ParamsConfig {
    fn validate(&self) -> Result<()> {
        if !(MIN_PRIME_BITS..=MAX_PRIME_BITS).contains(&self.prime_bits) {
            return Err(Error::InvalidArgument(format!(
                "prime bit length must be in [{MIN_PRIME_BITS}, {MAX_PRIME_BITS}], got {}",
                self.prime_bits
            )));
        }
        if self.generator < 2 {
            return Err(Error::InvalidArgument(format!(
                "generator must be at least 2, got {}",
                self.generator
            )));
        }
        if self.rounds == 0 {
            return Err(Error::InvalidArgument(
                "at least one Miller-Rabin round is required".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidArgument(
                "max_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl ElGamalParams {
    /// Generates parameters with the RNG described by `config.seed`.
    pub fn generate(config: &ParamsConfig) -> Result<Self> {
        let mut rng = rng_from_seed(config.seed);
        find_modulus_and_generator(config, &mut rng)
    }

    /// Accepts externally supplied parameters after checking that `p` is
    /// prime and `g` is a primitive root of it.
    ///
    /// # Errors
    /// [`Error::InvalidKey`] if either check fails.
    pub fn new(p: BigUint, g: BigUint) -> Result<Self> {
        let mut rng = rng_from_seed(None);
        let params = ElGamalParams { p, g };
        params.validate(&mut rng)?;
        Ok(params)
    }

    pub(crate) fn validate<R>(&self, rng: &mut R) -> Result<()>
    where
        R: Rng + ?Sized,
    {
        if !is_probably_prime(&self.p, DEFAULT_MILLER_RABIN_ROUNDS, rng)? {
            return Err(Error::InvalidKey(format!("modulus {} is not prime", self.p)));
        }
        let primitive = is_primitive_root(&self.g, &self.p)
            .map_err(|e| Error::InvalidKey(e.to_string()))?;
        if !primitive {
            return Err(Error::InvalidKey(format!(
                "{} is not a primitive root modulo {}",
                self.g, self.p
            )));
        }
        Ok(())
    }
}

/// Draws random candidates until one is a probable prime of exactly
/// `config.prime_bits` bits with `config.generator` as a primitive root.
///
/// # Errors
/// - [`Error::InvalidArgument`] for an unusable configuration.
/// - [`Error::GenerationFailed`] once `config.max_attempts` candidates have
///   been rejected.
pub fn find_modulus_and_generator<R>(config: &ParamsConfig, rng: &mut R) -> Result<ElGamalParams>
where
    R: Rng + ?Sized,
{
    config.validate()?;

    let g = BigUint::from(config.generator);
    let bits = config.prime_bits as u64;
    let mut composites = 0usize;
    let mut non_generating = 0usize;

    for attempt in 1..=config.max_attempts {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);

        if candidate <= g || !is_probably_prime(&candidate, config.rounds, rng)? {
            composites += 1;
            continue;
        }
        if !is_primitive_root(&g, &candidate)? {
            non_generating += 1;
            continue;
        }

        info!(
            "found {bits}-bit modulus {candidate} with generator {g} after {attempt} candidates"
        );
        debug!("rejected {composites} composite and {non_generating} non-generating candidates");
        return Ok(ElGamalParams { p: candidate, g });
    }

    debug!("rejected {composites} composite and {non_generating} non-generating candidates");
    Err(Error::GenerationFailed {
        attempts: config.max_attempts,
    })
}

/// Returns `true` if `g` generates the whole multiplicative group modulo the
/// prime `p`.
///
/// # Errors
/// [`Error::InvalidArgument`] if `p < 2` or `p` does not fit in 64 bits.
pub fn is_primitive_root(g: &BigUint, p: &BigUint) -> Result<bool> {
    let p64 = p
        .to_u64()
        .filter(|&v| v >= 2)
        .ok_or_else(|| Error::InvalidArgument(format!("cannot factor group order of {p}")))?;

    let g = g % p;
    if g.is_zero() {
        return Ok(false);
    }
    let order = p - BigUint::one();
    for q in prime_factors(p64 - 1) {
        if mod_pow(&g, &(&order / q), p)?.is_one() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Distinct prime factors of `n` in increasing order.
pub fn prime_factors(n: u64) -> Vec<u64> {
    num_prime::nt_funcs::factorize64(n).into_keys().collect()
}
