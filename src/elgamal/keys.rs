//! Key pairs: a private scalar `d` and the public value `e2 = g^d mod p`.

use log::info;
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;

use super::arith::mod_pow;
use super::params::{find_modulus_and_generator, ElGamalParams, ParamsConfig};
use super::rng::rng_from_seed;
use crate::error::{Error, Result};

/// Samples of `d` tried before giving up on a degenerate group.
const SCALAR_MAX_ATTEMPTS: usize = 128;

/// Public half of a key pair: `(p, g, e2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub p: BigUint,
    pub g: BigUint,
    /// `g^d mod p`.
    pub e2: BigUint,
}

/// Private half of a key pair: `(p, g, d)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub p: BigUint,
    pub g: BigUint,
    /// Secret exponent in `[1, p - 2]`.
    pub d: BigUint,
}

/// Both halves of a freshly generated key pair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

/// Configuration for drawing a key pair from existing parameters.
#[derive(Debug, Clone, Default)]
pub struct KeyGenConfig {
    /// Optional RNG seed for reproducible keys.
    pub seed: Option<u64>,
}

impl ElGamalParams {
    /// Draws a key pair for these parameters with the RNG described by
    /// `config.seed`.
    pub fn generate_keypair(&self, config: &KeyGenConfig) -> Result<KeyPair> {
        let mut rng = rng_from_seed(config.seed);
        self.generate_keypair_with(&mut rng)
    }

    /// Draws `d` uniformly from `[1, p - 2]` and derives `e2 = g^d mod p`.
    ///
    /// Scalars with `e2 == 1` are resampled; with a primitive root they
    /// cannot occur.
    pub fn generate_keypair_with<R>(&self, rng: &mut R) -> Result<KeyPair>
    where
        R: Rng + ?Sized,
    {
        let one = BigUint::one();
        if self.p < BigUint::from(3u32) {
            return Err(Error::InvalidKey(format!(
                "modulus {} is too small for a key pair",
                self.p
            )));
        }
        let upper = &self.p - &one;

        for _ in 0..SCALAR_MAX_ATTEMPTS {
            let d = rng.gen_biguint_range(&one, &upper);
            let e2 = mod_pow(&self.g, &d, &self.p)?;
            if e2.is_one() {
                continue;
            }
            return Ok(KeyPair {
                public: PublicKey {
                    p: self.p.clone(),
                    g: self.g.clone(),
                    e2,
                },
                private: PrivateKey {
                    p: self.p.clone(),
                    g: self.g.clone(),
                    d,
                },
            });
        }
        Err(Error::GenerationFailed {
            attempts: SCALAR_MAX_ATTEMPTS,
        })
    }
}

impl KeyPair {
    /// Runs the full key generation: modulus search, then scalar sampling,
    /// both driven by `config.seed`.
    pub fn generate(config: &ParamsConfig) -> Result<Self> {
        let mut rng = rng_from_seed(config.seed);
        generate_key_pair(config, &mut rng)
    }
}

/// Finds `(p, g)` and draws a key pair from it using `rng`.
pub fn generate_key_pair<R>(config: &ParamsConfig, rng: &mut R) -> Result<KeyPair>
where
    R: Rng + ?Sized,
{
    let params = find_modulus_and_generator(config, rng)?;
    let pair = params.generate_keypair_with(rng)?;
    info!("generated key pair for modulus {}", pair.public.p);
    Ok(pair)
}

impl PublicKey {
    pub fn params(&self) -> ElGamalParams {
        ElGamalParams {
            p: self.p.clone(),
            g: self.g.clone(),
        }
    }

    /// Checks the invariants of a public key loaded from outside.
    ///
    /// # Errors
    /// [`Error::InvalidKey`] if `p` is not prime, `g` is not a primitive root
    /// or `e2` lies outside `[2, p - 1]`.
    pub fn validate<R>(&self, rng: &mut R) -> Result<()>
    where
        R: Rng + ?Sized,
    {
        self.params().validate(rng)?;
        if self.e2 < BigUint::from(2u32) || self.e2 >= self.p {
            return Err(Error::InvalidKey(format!(
                "public value {} is outside [2, p - 1]",
                self.e2
            )));
        }
        Ok(())
    }
}

impl PrivateKey {
    pub fn params(&self) -> ElGamalParams {
        ElGamalParams {
            p: self.p.clone(),
            g: self.g.clone(),
        }
    }

    /// Derives the matching public key.
    pub fn public_key(&self) -> Result<PublicKey> {
        Ok(PublicKey {
            p: self.p.clone(),
            g: self.g.clone(),
            e2: mod_pow(&self.g, &self.d, &self.p)?,
        })
    }

    /// Checks the invariants of a private key loaded from outside.
    ///
    /// # Errors
    /// [`Error::InvalidKey`] if `p` is not prime, `g` is not a primitive root
    /// or `d` lies outside `[1, p - 2]`.
    pub fn validate<R>(&self, rng: &mut R) -> Result<()>
    where
        R: Rng + ?Sized,
    {
        self.params().validate(rng)?;
        if self.d < BigUint::one() || self.d >= &self.p - BigUint::one() {
            return Err(Error::InvalidKey(format!(
                "private scalar {} is outside [1, p - 2]",
                self.d
            )));
        }
        Ok(())
    }
}
