//! Number theory helpers for the prime/generator search.

use zkiot_asm::field::{is_prime, pow_mod};

pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple, or `None` on overflow.
pub const fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

/// Distinct prime factors of `n` in increasing order, by trial division.
pub fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut q = 2;
    while q * q <= n {
        if n % q == 0 {
            factors.push(q);
            while n % q == 0 {
                n /= q;
            }
        }
        q += if q == 2 { 1 } else { 2 };
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Whether `g` generates the multiplicative group mod the prime `p`.
///
/// `factors` must be the distinct prime factors of `p - 1`.
pub fn is_primitive_root(g: u64, p: u64, factors: &[u64]) -> bool {
    g % p != 0 && factors.iter().all(|&q| pow_mod(g, (p - 1) / q, p) != 1)
}

/// The smallest `g >= 2` of full order `p - 1`, or `None` when `p` is not
/// prime or no such `g` exists.
pub fn smallest_primitive_root(p: u64) -> Option<u64> {
    if !is_prime(p) {
        return None;
    }
    let factors = prime_factors(p - 1);
    (2..p).find(|&g| is_primitive_root(g, p, &factors))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(gcd(33, 496), 1);
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(lcm(33, 496), Some(16368));
        assert_eq!(lcm(4, 6), Some(12));
        assert_eq!(lcm(u64::MAX, u64::MAX - 1), None);
    }

    #[test]
    fn test_prime_factors() {
        assert_eq!(prime_factors(1), Vec::<u64>::new());
        assert_eq!(prime_factors(6), [2, 3]);
        assert_eq!(prime_factors(1_678_320), [2, 3, 5, 7, 37]);
        assert_eq!(prime_factors(2_147_483_646), [2, 3, 7, 11, 31, 151, 331]);
        assert_eq!(prime_factors(97), [97]);
    }

    #[test]
    fn test_toy_primitive_root() {
        // 3 has full order 6 mod 7.
        let powers: Vec<_> = (1..=6).map(|e| pow_mod(3, e, 7)).collect();
        assert_eq!(powers, [3, 2, 6, 4, 5, 1]);
        assert_eq!(smallest_primitive_root(7), Some(3));
        // 2 has order 3 mod 7.
        assert!(!is_primitive_root(2, 7, &prime_factors(6)));
    }

    #[test]
    fn test_known_primitive_roots() {
        assert_eq!(smallest_primitive_root(3), Some(2));
        assert_eq!(smallest_primitive_root(41), Some(6));
        assert_eq!(smallest_primitive_root(97), Some(5));
        assert_eq!(smallest_primitive_root(881), Some(3));
        assert_eq!(smallest_primitive_root(1_678_321), Some(11));
        assert_eq!(smallest_primitive_root(2), None);
        assert_eq!(smallest_primitive_root(91), None);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(50))]

        #[test]
        fn test_factors_multiply_back(n in 2u64..1_000_000) {
            let factors = prime_factors(n);
            let mut rest = n;
            for &q in &factors {
                prop_assert!(is_prime(q));
                while rest % q == 0 {
                    rest /= q;
                }
            }
            prop_assert_eq!(rest, 1);
        }
    }
}
