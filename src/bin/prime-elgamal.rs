use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use prime_elgamal::elgamal::params::MAX_PRIME_BITS;
use prime_elgamal::elgamal::{KeyPair, ParamsConfig, DEFAULT_PRIME_BITS};
use prime_elgamal::message::MESSAGE_MIN_PRIME_BITS;
use prime_elgamal::record::{
    self, format_ciphertexts, DEFAULT_PRIVATE_KEY_FILE, DEFAULT_PUBLIC_KEY_FILE,
};
use prime_elgamal::{decrypt_message, encrypt_message, EncryptConfig, Result};

/// CLI arguments parsed via clap.
#[derive(Parser, Debug)]
#[command(
    name = "prime-elgamal",
    about = "Generate ElGamal keys and encrypt or decrypt ASCII text files"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a key pair and write the public and private key records.
    Keygen {
        /// Seed for the random generator; omit to use system entropy.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Bit length of the prime modulus; 32-bit text blocks need at least 33.
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_PRIME_BITS as u64,
            value_parser = clap::value_parser!(u64)
                .range(MESSAGE_MIN_PRIME_BITS..=MAX_PRIME_BITS as u64)
        )]
        bits: u64,

        #[arg(long, default_value = DEFAULT_PUBLIC_KEY_FILE)]
        public: PathBuf,

        #[arg(long, default_value = DEFAULT_PRIVATE_KEY_FILE)]
        private: PathBuf,

        /// Print both keys after writing them.
        #[arg(short, long)]
        print: bool,
    },
    /// Encrypt an ASCII text file with a public key record.
    Encrypt {
        key_file: PathBuf,
        message_file: PathBuf,

        /// Output file for the ciphertext record; stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for the ephemeral exponents; omit to use system entropy.
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Decrypt a ciphertext record with a private key record.
    Decrypt {
        key_file: PathBuf,
        cipher_file: PathBuf,

        /// Output file for the recovered text; stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = run(cli.command, &mut io::stdout().lock());
    ExitCode::from(exit_status(&result))
}

/// Reports a failure on stderr and maps the outcome to a process status.
fn exit_status(result: &Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}

fn run<W: Write>(command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Keygen {
            seed,
            bits,
            public,
            private,
            print,
        } => {
            let config = ParamsConfig {
                prime_bits: bits as usize,
                seed,
                ..ParamsConfig::default()
            };
            let pair = KeyPair::generate(&config)?;
            record::write_public_key(&public, &pair.public)?;
            record::write_private_key(&private, &pair.private)?;
            if print {
                writeln!(out, "Public Key:  {}", single_line(&pair.public.to_string()))?;
                writeln!(out, "Private Key: {}", single_line(&pair.private.to_string()))?;
            }
        }
        Command::Encrypt {
            key_file,
            message_file,
            output,
            seed,
        } => {
            let key = record::read_public_key(&key_file)?;
            let text = fs::read_to_string(&message_file)?;
            let blocks = encrypt_message(&text, &key, &EncryptConfig { seed })?;
            emit(output.as_deref(), &format_ciphertexts(&blocks), out)?;
        }
        Command::Decrypt {
            key_file,
            cipher_file,
            output,
        } => {
            let key = record::read_private_key(&key_file)?;
            let blocks = record::read_ciphertexts(&cipher_file)?;
            let text = decrypt_message(&blocks, &key)?;
            emit(output.as_deref(), &text, out)?;
        }
    }
    Ok(())
}

fn emit<W: Write>(output: Option<&Path>, contents: &str, out: &mut W) -> Result<()> {
    match output {
        Some(path) => fs::write(path, contents)?,
        None => {
            out.write_all(contents.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

/// `(p, g, x)` rendering of a three-line key record.
fn single_line(record: &str) -> String {
    format!("({})", record.lines().collect::<Vec<_>>().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prime_elgamal::Error;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_keygen_encrypt_decrypt_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name).to_str().unwrap().to_string();
        let (public, private) = (path("pub.txt"), path("pri.txt"));
        let (message, cipher, recovered) = (path("msg.txt"), path("ct.txt"), path("out.txt"));

        let mut out = Vec::new();
        let keygen = parse(&[
            "prime-elgamal",
            "keygen",
            "--seed",
            "42",
            "--public",
            public.as_str(),
            "--private",
            private.as_str(),
        ]);
        run(keygen, &mut out).unwrap();
        assert!(out.is_empty());

        let text = "Meet me by the old oak tree.\nBring the map.";
        fs::write(&message, text).unwrap();
        let encrypt = parse(&[
            "prime-elgamal",
            "encrypt",
            public.as_str(),
            message.as_str(),
            "-o",
            cipher.as_str(),
        ]);
        run(encrypt, &mut out).unwrap();
        let blocks = record::read_ciphertexts(Path::new(&cipher)).unwrap();
        assert_eq!(blocks.len(), text.len().div_ceil(4));

        let decrypt = parse(&[
            "prime-elgamal",
            "decrypt",
            private.as_str(),
            cipher.as_str(),
            "-o",
            recovered.as_str(),
        ]);
        run(decrypt, &mut out).unwrap();
        assert_eq!(fs::read_to_string(&recovered).unwrap(), text);

        // without -o the text goes to the writer
        let decrypt = parse(&["prime-elgamal", "decrypt", private.as_str(), cipher.as_str()]);
        run(decrypt, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), text);
    }

    #[test]
    fn test_keygen_print_shows_both_keys() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("pub.txt");
        let private = dir.path().join("pri.txt");
        let keygen = parse(&[
            "prime-elgamal",
            "keygen",
            "-s",
            "7",
            "-p",
            "--public",
            public.to_str().unwrap(),
            "--private",
            private.to_str().unwrap(),
        ]);
        let mut out = Vec::new();
        run(keygen, &mut out).unwrap();

        let public_key = record::read_public_key(&public).unwrap();
        let private_key = record::read_private_key(&private).unwrap();
        let expected = format!(
            "Public Key:  ({}, {}, {})\nPrivate Key: ({}, {}, {})\n",
            public_key.p, public_key.g, public_key.e2, private_key.p, private_key.g, private_key.d
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        assert_eq!(public_key.p.bits(), 33);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("83\n2\n28\n"), "(83, 2, 28)");
    }

    #[test]
    fn test_bits_below_block_width_rejected() {
        for bits in ["3", "20", "32", "65"] {
            assert!(
                Cli::try_parse_from(["prime-elgamal", "keygen", "--bits", bits]).is_err(),
                "--bits {bits}"
            );
        }
        match parse(&["prime-elgamal", "keygen", "--bits", "40"]) {
            Command::Keygen { bits, .. } => assert_eq!(bits, 40),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_failures_exit_with_status_one() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let decrypt = parse(&[
            "prime-elgamal",
            "decrypt",
            missing.to_str().unwrap(),
            missing.to_str().unwrap(),
        ]);
        let result = run(decrypt, &mut Vec::new());
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(exit_status(&result), 1);
        assert_eq!(exit_status(&Ok(())), 0);
    }

    #[test]
    fn test_encrypt_rejects_corrupt_key_record() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("pub.txt");
        let message = dir.path().join("msg.txt");
        fs::write(&key, "23\n2\n18\n").unwrap();
        fs::write(&message, "hi").unwrap();
        let encrypt = parse(&[
            "prime-elgamal",
            "encrypt",
            key.to_str().unwrap(),
            message.to_str().unwrap(),
        ]);
        let result = run(encrypt, &mut Vec::new());
        assert!(matches!(result, Err(Error::InvalidKey(_))));
        assert_eq!(exit_status(&result), 1);
    }
}
