//! Miller-Rabin probabilistic primality testing.
//!
//! A prime is never reported composite. A composite survives `k` independent
//! rounds with probability at most `4^-k`.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use super::arith::square_and_multiply;
use crate::error::{Error, Result};

/// Small primes used for trial division before any Miller-Rabin round.
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97,
];

/// Returns `true` if `n` is probably prime after `rounds` Miller-Rabin rounds.
///
/// Values below 4, even values and multiples of the primes below 100 are
/// answered deterministically. Otherwise each round draws a fresh base
/// uniformly from `[2, n - 2]` using `rng`, and the test stops at the first
/// witness of compositeness.
///
/// # Errors
/// [`Error::InvalidArgument`] if `rounds` is zero.
pub fn is_probably_prime<R>(n: &BigUint, rounds: usize, rng: &mut R) -> Result<bool>
where
    R: Rng + ?Sized,
{
    if rounds == 0 {
        return Err(Error::InvalidArgument(
            "at least one Miller-Rabin round is required".to_string(),
        ));
    }
    if let Some(answer) = trial_division(n) {
        return Ok(answer);
    }

    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let n_minus_one = n - &one;
    let (s, t) = decompose(&n_minus_one);

    for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        if !passes_round(&a, n, &n_minus_one, s, &t) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns `true` if the base `a` proves the odd number `n` composite.
///
/// This is a single deterministic Miller-Rabin round and performs no trial
/// division.
///
/// # Errors
/// [`Error::InvalidArgument`] if `n` is even or below 5, or `a` lies
/// outside `[2, n - 2]`.
pub fn is_witness(a: &BigUint, n: &BigUint) -> Result<bool> {
    if *n < BigUint::from(5u32) || n.is_even() {
        return Err(Error::InvalidArgument(format!(
            "witness test needs an odd n >= 5, got {n}"
        )));
    }
    let n_minus_one = n - BigUint::one();
    if *a < BigUint::from(2u32) || *a >= n_minus_one {
        return Err(Error::InvalidArgument(format!(
            "base {a} is outside [2, {n} - 2]"
        )));
    }
    let (s, t) = decompose(&n_minus_one);
    Ok(!passes_round(a, n, &n_minus_one, s, &t))
}

/// Trial division by [`SMALL_PRIMES`]. `None` means inconclusive.
fn trial_division(n: &BigUint) -> Option<bool> {
    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if *n == p {
            return Some(true);
        }
        if *n < p || n.is_multiple_of(&p) {
            return Some(false);
        }
    }
    None
}

/// Splits `n - 1` into `2^s * t` with `t` odd.
fn decompose(n_minus_one: &BigUint) -> (u64, BigUint) {
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    (s, n_minus_one >> s)
}

fn passes_round(a: &BigUint, n: &BigUint, n_minus_one: &BigUint, s: u64, t: &BigUint) -> bool {
    let mut x = square_and_multiply(a, t, n);
    if x.is_one() || x == *n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = (&x * &x) % n;
        if x == *n_minus_one {
            return true;
        }
        if x.is_one() {
            // nontrivial square root of 1
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const ROUNDS: usize = 20;

    fn sieve(limit: usize) -> Vec<bool> {
        let mut is_prime = vec![true; limit + 1];
        is_prime[0] = false;
        is_prime[1] = false;
        let mut i = 2;
        while i * i <= limit {
            if is_prime[i] {
                let mut j = i * i;
                while j <= limit {
                    is_prime[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        is_prime
    }

    #[test]
    fn test_small_values() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for n in [0u32, 1, 4, 6, 8, 9, 100] {
            assert!(!is_probably_prime(&BigUint::from(n), ROUNDS, &mut rng).unwrap(), "{n}");
        }
        for n in [2u32, 3, 5, 7, 97] {
            assert!(is_probably_prime(&BigUint::from(n), ROUNDS, &mut rng).unwrap(), "{n}");
        }
    }

    #[test]
    fn test_first_thousand_primes_are_accepted() {
        // the 1000th prime is 7919
        let table = sieve(7919);
        let primes: Vec<usize> = (0..table.len()).filter(|&i| table[i]).collect();
        assert_eq!(primes.len(), 1000);

        let mut rng = ChaCha20Rng::seed_from_u64(2);
        for p in primes {
            assert!(
                is_probably_prime(&BigUint::from(p), ROUNDS, &mut rng).unwrap(),
                "prime {p} rejected"
            );
        }
    }

    #[test]
    fn test_composites_below_limit_are_rejected() {
        let table = sieve(20_000);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for (n, &prime) in table.iter().enumerate() {
            assert_eq!(
                is_probably_prime(&BigUint::from(n), ROUNDS, &mut rng).unwrap(),
                prime,
                "wrong answer for {n}"
            );
        }
    }

    #[test]
    fn test_pseudoprimes_are_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        // Carmichael numbers and strong pseudoprimes to several fixed bases.
        let hard: [u64; 8] = [
            561,
            41_041,
            10_403,          // 101 * 103
            1_373_653,       // spsp(2, 3)
            25_326_001,      // spsp(2, 3, 5)
            3_215_031_751,   // spsp(2, 3, 5, 7)
            4_294_967_297,   // 2^32 + 1 = 641 * 6700417
            8_589_934_591,   // 2^33 - 1
        ];
        for n in hard {
            assert!(
                !is_probably_prime(&BigUint::from(n), ROUNDS, &mut rng).unwrap(),
                "composite {n} accepted"
            );
        }
    }

    #[test]
    fn test_agrees_with_deterministic_test_on_33_bit_values() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        for _ in 0..2_000 {
            let n: u64 = rng.gen_range((1u64 << 32)..(1u64 << 33)) | 1;
            assert_eq!(
                is_probably_prime(&BigUint::from(n), ROUNDS, &mut rng).unwrap(),
                num_prime::nt_funcs::is_prime64(n),
                "disagreement on {n}"
            );
        }
    }

    #[test]
    fn test_known_33_bit_primes() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        // 2^32 + 15 is the smallest 33-bit prime, 2^33 - 9 the largest
        for p in [4_294_967_311u64, 8_589_934_583] {
            assert!(is_probably_prime(&BigUint::from(p), ROUNDS, &mut rng).unwrap(), "{p}");
        }
    }

    #[test]
    fn test_witness() {
        let n = BigUint::from(2047u32);
        // 2047 = 23 * 89 is a strong pseudoprime to base 2
        assert!(!is_witness(&BigUint::from(2u32), &n).unwrap());
        assert!(is_witness(&BigUint::from(3u32), &n).unwrap());
        assert!(is_witness(&BigUint::from(2u32), &BigUint::from(561u32)).unwrap());

        let p = BigUint::from(7919u32);
        for a in 2u32..7917 {
            assert!(!is_witness(&BigUint::from(a), &p).unwrap(), "base {a} flagged a prime");
        }
    }

    #[test]
    fn test_seeded_source_is_deterministic() {
        let n = BigUint::from(3_215_031_751u64);
        let mut a = ChaCha20Rng::seed_from_u64(9);
        let mut b = ChaCha20Rng::seed_from_u64(9);
        assert_eq!(
            is_probably_prime(&n, 1, &mut a).unwrap(),
            is_probably_prime(&n, 1, &mut b).unwrap()
        );
    }

    #[test]
    fn test_zero_rounds_is_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        assert!(matches!(
            is_probably_prime(&BigUint::from(7919u32), 0, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_witness_rejects_out_of_domain_inputs() {
        let two = BigUint::from(2u32);
        for n in [0u32, 1, 3, 4, 2048] {
            assert!(
                matches!(is_witness(&two, &BigUint::from(n)), Err(Error::InvalidArgument(_))),
                "n = {n}"
            );
        }
        let n = BigUint::from(561u32);
        for a in [0u32, 1, 560, 561, 1000] {
            assert!(
                matches!(is_witness(&BigUint::from(a), &n), Err(Error::InvalidArgument(_))),
                "a = {a}"
            );
        }
        assert!(is_witness(&BigUint::from(2u32), &BigUint::from(5u32)).is_ok());
    }
}
