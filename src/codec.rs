//! Packing of ASCII text into 32-bit plaintext blocks and back.
//!
//! Each block holds four bytes in big-endian order. The final block is
//! right-padded with NUL bytes, which are stripped again on unpacking. NUL is
//! therefore not accepted as payload.

use crate::error::{Error, Result};

/// Bytes of text carried by one plaintext block.
pub const BLOCK_BYTES: usize = 4;

/// Splits ASCII `text` into 32-bit blocks.
///
/// # Errors
/// [`Error::InvalidText`] if `text` contains a NUL or non-ASCII character.
pub fn pack_text(text: &str) -> Result<Vec<u32>> {
    if let Some(pos) = text.bytes().position(|b| !b.is_ascii()) {
        return Err(Error::InvalidText(format!(
            "non-ASCII byte at offset {pos}"
        )));
    }
    if let Some(pos) = text.bytes().position(|b| b == 0) {
        return Err(Error::InvalidText(format!("NUL byte at offset {pos}")));
    }

    Ok(text
        .as_bytes()
        .chunks(BLOCK_BYTES)
        .map(|chunk| {
            let mut buf = [0u8; BLOCK_BYTES];
            buf[..chunk.len()].copy_from_slice(chunk);
            u32::from_be_bytes(buf)
        })
        .collect())
}

/// Reassembles text from blocks produced by [`pack_text`].
///
/// # Errors
/// [`Error::InvalidText`] if a block contains a non-ASCII byte, which
/// happens when blocks were decrypted with the wrong key.
pub fn unpack_blocks(blocks: &[u32]) -> Result<String> {
    let mut bytes: Vec<u8> = blocks.iter().flat_map(|b| b.to_be_bytes()).collect();

    // padding only ever lives in the final block
    let mut padding = 0;
    while padding < BLOCK_BYTES - 1 && bytes.last() == Some(&0) {
        bytes.pop();
        padding += 1;
    }

    if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(Error::InvalidText(format!(
            "non-ASCII byte at offset {pos}"
        )));
    }
    String::from_utf8(bytes).map_err(|e| Error::InvalidText(e.to_string()))
}
