//! Arithmetic in the prime field `Z/pZ` used for trace values.

use std::fmt;

use thiserror::Error;

/// Default trace modulus.
pub const DEFAULT_MODULUS: u64 = 1_678_321;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModulusError {
    #[error("modulus {0} is not prime")]
    NotPrime(u64),
}

/// A prime modulus `p`.
///
/// All values handled through a `Modulus` are kept in `[0, p)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modulus(u64);

impl Modulus {
    pub fn new(p: u64) -> Result<Self, ModulusError> {
        if is_prime(p) {
            Ok(Self(p))
        } else {
            Err(ModulusError::NotPrime(p))
        }
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    pub const fn reduce(&self, v: u64) -> u64 {
        v % self.0
    }

    /// Reduces a signed immediate into `[0, p)`.
    pub fn reduce_signed(&self, v: i128) -> u64 {
        v.rem_euclid(self.0 as i128) as u64
    }

    pub fn add(&self, a: u64, b: u64) -> u64 {
        ((a as u128 + b as u128) % self.0 as u128) as u64
    }

    pub fn sub(&self, a: u64, b: u64) -> u64 {
        self.add(a, self.0 - self.reduce(b))
    }

    pub fn mul(&self, a: u64, b: u64) -> u64 {
        mul_mod(a, b, self.0)
    }

    pub fn pow(&self, base: u64, exp: u64) -> u64 {
        pow_mod(base, exp, self.0)
    }

    /// Multiplicative inverse via Fermat's little theorem. `None` for zero.
    pub fn inv(&self, a: u64) -> Option<u64> {
        let a = self.reduce(a);
        (a != 0).then(|| self.pow(a, self.0 - 2))
    }
}

impl Default for Modulus {
    fn default() -> Self {
        Self(DEFAULT_MODULUS)
    }
}

impl fmt::Debug for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modulus({})", self.0)
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

pub const fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let mut acc = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

/// Deterministic Miller-Rabin for the whole `u64` range.
pub fn is_prime(n: u64) -> bool {
    // These witnesses are sufficient for every n < 3.3 * 10^24.
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    'witness: for a in WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prime_small() {
        let primes: Vec<u64> = (0..60).filter(|&n| is_prime(n)).collect();
        assert_eq!(
            primes,
            [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59]
        );
    }

    #[test]
    fn test_is_prime_large() {
        assert!(is_prime(2_147_483_647));
        assert!(is_prime(DEFAULT_MODULUS));
        assert!(is_prime(18_446_744_069_414_584_321));
        assert!(!is_prime(2_147_483_649));
        // Carmichael numbers.
        assert!(!is_prime(561));
        assert!(!is_prime(3_215_031_751));
        assert!(!is_prime(u64::MAX));
    }

    #[test]
    fn test_modulus_rejects_composites() {
        assert_eq!(Modulus::new(4294967296), Err(ModulusError::NotPrime(4294967296)));
        assert_eq!(Modulus::new(1), Err(ModulusError::NotPrime(1)));
        assert!(Modulus::new(881).is_ok());
    }

    #[test]
    fn test_field_ops() {
        let p = Modulus::new(7).unwrap();
        assert_eq!(p.add(5, 4), 2);
        assert_eq!(p.sub(2, 5), 4);
        assert_eq!(p.sub(2, 12), 4);
        assert_eq!(p.mul(6, 6), 1);
        assert_eq!(p.reduce_signed(-1), 6);
        assert_eq!(p.reduce_signed(-15), 6);
        assert_eq!(p.inv(3), Some(5));
        assert_eq!(p.inv(14), None);
        assert_eq!(p.pow(3, 6), 1);
    }

    #[test]
    fn test_mul_mod_does_not_overflow() {
        let p = 18_446_744_069_414_584_321;
        assert_eq!(mul_mod(p - 1, p - 1, p), 1);
    }
}
