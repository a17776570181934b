//! ElGamal public-key encryption over a prime field.
//!
//! The crate is split into the number-theoretic core ([`elgamal`]) and the
//! thin layers that surround it: packing ASCII text into 32-bit blocks
//! ([`codec`]), reading and writing key and ciphertext records ([`record`])
//! and whole-message encryption ([`message`]).
//!
//! DISCLAIMER: this is an educational implementation. It makes no attempt to
//! resist timing side channels and uses a 33-bit modulus by default. Do NOT
//! use it to protect real data.

pub mod codec;
pub mod elgamal;
pub mod error;
pub mod message;
pub mod record;

pub use codec::{pack_text, unpack_blocks, BLOCK_BYTES};
pub use elgamal::{
    decrypt_block, encrypt_block, encrypt_block_with_ephemeral, find_modulus_and_generator,
    generate_key_pair, is_probably_prime, mod_inverse, mod_pow, Ciphertext, ElGamalParams,
    EncryptConfig, KeyGenConfig, KeyPair, ParamsConfig, PrivateKey, PublicKey,
};
pub use error::{Error, Result};
pub use message::{decrypt_message, encrypt_message};
