//! Text records for keys and ciphertext.
//!
//! A key record holds three decimal integers, one per line: `p`, `g`, then
//! `e2` (public) or `d` (private). A ciphertext record holds one `c1 c2` pair
//! per line in block order.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::info;
use num_bigint::BigUint;

use crate::elgamal::{rng_from_seed, Ciphertext, PrivateKey, PublicKey};
use crate::error::{Error, Result};

/// Default file name for the public key record.
pub const DEFAULT_PUBLIC_KEY_FILE: &str = "pubkey.txt";
/// Default file name for the private key record.
pub const DEFAULT_PRIVATE_KEY_FILE: &str = "prikey.txt";

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.p)?;
        writeln!(f, "{}", self.g)?;
        writeln!(f, "{}", self.e2)
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.p)?;
        writeln!(f, "{}", self.g)?;
        writeln!(f, "{}", self.d)
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.c1, self.c2)
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    /// Parses and validates a public key record.
    fn from_str(s: &str) -> Result<Self> {
        let [p, g, e2] = parse_key_values(s)?;
        let key = PublicKey { p, g, e2 };
        key.validate(&mut rng_from_seed(None))?;
        Ok(key)
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    /// Parses and validates a private key record.
    fn from_str(s: &str) -> Result<Self> {
        let [p, g, d] = parse_key_values(s)?;
        let key = PrivateKey { p, g, d };
        key.validate(&mut rng_from_seed(None))?;
        Ok(key)
    }
}

impl FromStr for Ciphertext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(c1), Some(c2), None) => Ok(Ciphertext {
                c1: parse_integer(c1)?,
                c2: parse_integer(c2)?,
            }),
            _ => Err(Error::Parse(format!(
                "expected two integers per cipher block, got {s:?}"
            ))),
        }
    }
}

/// Renders a ciphertext record, one block per line.
pub fn format_ciphertexts(blocks: &[Ciphertext]) -> String {
    blocks.iter().map(|ct| format!("{ct}\n")).collect()
}

/// Parses a ciphertext record. Blank lines are ignored.
pub fn parse_ciphertexts(s: &str) -> Result<Vec<Ciphertext>> {
    s.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.parse::<Ciphertext>()
                .map_err(|e| Error::Parse(format!("line {}: {e}", i + 1)))
        })
        .collect()
}

pub fn write_public_key(path: &Path, key: &PublicKey) -> Result<()> {
    fs::write(path, key.to_string())?;
    info!("wrote public key to {}", path.display());
    Ok(())
}

pub fn write_private_key(path: &Path, key: &PrivateKey) -> Result<()> {
    fs::write(path, key.to_string())?;
    info!("wrote private key to {}", path.display());
    Ok(())
}

pub fn read_public_key(path: &Path) -> Result<PublicKey> {
    fs::read_to_string(path)?.parse()
}

pub fn read_private_key(path: &Path) -> Result<PrivateKey> {
    fs::read_to_string(path)?.parse()
}

pub fn write_ciphertexts(path: &Path, blocks: &[Ciphertext]) -> Result<()> {
    fs::write(path, format_ciphertexts(blocks))?;
    Ok(())
}

pub fn read_ciphertexts(path: &Path) -> Result<Vec<Ciphertext>> {
    parse_ciphertexts(&fs::read_to_string(path)?)
}

fn parse_key_values(s: &str) -> Result<[BigUint; 3]> {
    let values = s
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_integer)
        .collect::<Result<Vec<_>>>()?;
    let count = values.len();
    <[BigUint; 3]>::try_from(values)
        .map_err(|_| Error::Parse(format!("expected 3 values in key record, found {count}")))
}

fn parse_integer(s: &str) -> Result<BigUint> {
    s.parse::<BigUint>()
        .map_err(|e| Error::Parse(format!("{s:?} is not a non-negative integer: {e}")))
}
