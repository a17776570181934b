//! The number-theoretic core: primality testing, modulus search, modular
//! arithmetic, key generation and the per-block ElGamal transform.
//!
//! DISCLAIMER: educational implementation only. Operations are not constant
//! time and the default 33-bit modulus offers no real security.

pub mod arith;
pub mod cipher;
pub mod keys;
pub mod params;
pub mod primality;
pub mod rng;

pub use arith::{extended_gcd, mod_inverse, mod_pow};
pub use cipher::{
    decrypt_block, encrypt_block, encrypt_block_with_ephemeral, Ciphertext, EncryptConfig,
};
pub use keys::{generate_key_pair, KeyGenConfig, KeyPair, PrivateKey, PublicKey};
pub use params::{
    find_modulus_and_generator, is_primitive_root, prime_factors, ElGamalParams, ParamsConfig,
    DEFAULT_GENERATOR, DEFAULT_MAX_ATTEMPTS, DEFAULT_MILLER_RABIN_ROUNDS, DEFAULT_PRIME_BITS,
};
pub use primality::{is_probably_prime, is_witness};
pub use rng::rng_from_seed;
