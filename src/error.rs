//! Error type shared by every layer of the crate.

use num_bigint::BigUint;
use thiserror::Error;

/// Errors reported by the arithmetic core, the key/record layer and the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// A bad exponent, modulus, bit length, round count or ephemeral value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `gcd(value, modulus) != 1`, so no modular inverse exists.
    #[error("no inverse exists for {value} modulo {modulus}")]
    NoInverseExists { value: BigUint, modulus: BigUint },

    /// A plaintext block that is not strictly below the modulus.
    #[error("plaintext block {block} is not smaller than the modulus {modulus}")]
    BlockTooLarge { block: BigUint, modulus: BigUint },

    /// A ciphertext pair with a zero or out-of-range component.
    #[error("invalid cipher block: {0}")]
    InvalidCipherBlock(String),

    /// A randomized search ran out of attempts.
    #[error("generation failed after {attempts} attempts")]
    GenerationFailed { attempts: usize },

    /// Loaded key material violates a key invariant.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Input text that cannot be packed into blocks.
    #[error("invalid text: {0}")]
    InvalidText(String),

    /// A malformed key or ciphertext record.
    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
