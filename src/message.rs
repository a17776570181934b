//! Whole-message encryption built on the per-block transform.
//!
//! Blocks are independent, so both directions fan out over a rayon pool.
//! Ordering of the output always matches the input.

use log::debug;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use crate::codec::{pack_text, unpack_blocks, BLOCK_BYTES};
use crate::elgamal::{
    decrypt_block, encrypt_block, rng_from_seed, Ciphertext, EncryptConfig, PrivateKey, PublicKey,
};
use crate::error::{Error, Result};

/// Smallest modulus size that fits every packed block: `p >= 2^32`.
pub const MESSAGE_MIN_PRIME_BITS: u64 = (BLOCK_BYTES * 8 + 1) as u64;

/// Packs `text` into blocks and encrypts each one under `key`.
///
/// Per-block generators are seeded from a master generator before the
/// parallel step, so a fixed `config.seed` yields the same ciphertext
/// regardless of how the work is scheduled.
///
/// # Errors
/// [`Error::InvalidKey`] if the modulus is below `2^32`.
pub fn encrypt_message(
    text: &str,
    key: &PublicKey,
    config: &EncryptConfig,
) -> Result<Vec<Ciphertext>> {
    check_modulus_width(&key.p)?;
    let blocks = pack_text(text)?;
    let mut master = rng_from_seed(config.seed);
    let seeds: Vec<[u8; 32]> = blocks.iter().map(|_| master.gen()).collect();

    debug!("encrypting {} blocks", blocks.len());
    blocks
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(&block, seed)| {
            let mut rng = ChaCha20Rng::from_seed(*seed);
            encrypt_block(&BigUint::from(block), key, &mut rng)
        })
        .collect()
}

/// Decrypts every block under `key` and unpacks the text.
///
/// # Errors
/// Fails if the modulus is below `2^32`, if any block fails to decrypt, decrypts to a value wider than
/// 32 bits, or unpacks to non-ASCII text.
pub fn decrypt_message(ciphertext: &[Ciphertext], key: &PrivateKey) -> Result<String> {
    check_modulus_width(&key.p)?;
    debug!("decrypting {} blocks", ciphertext.len());
    let blocks = ciphertext
        .par_iter()
        .map(|ct| {
            let m = decrypt_block(ct, key)?;
            m.to_u32().ok_or_else(|| {
                Error::InvalidCipherBlock(format!("decrypted block {m} exceeds 32 bits"))
            })
        })
        .collect::<Result<Vec<u32>>>()?;
    unpack_blocks(&blocks)
}

fn check_modulus_width(p: &BigUint) -> Result<()> {
    if p.bits() < MESSAGE_MIN_PRIME_BITS {
        return Err(Error::InvalidKey(format!(
            "modulus {p} has {} bits, text blocks need at least {MESSAGE_MIN_PRIME_BITS}",
            p.bits()
        )));
    }
    Ok(())
}
