//! The constrained prime search.
//!
//! A qualifying prime `p` satisfies `n | p - 1` and `m | p - 1`, which is the
//! same as `lcm(n, m) | p - 1`. The search therefore only visits candidates
//! `1 + k * lcm(n, m)` below the bound, in the requested direction.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use zkiot_asm::field::is_prime;

use crate::{
    error::SetupError,
    math::{lcm, smallest_primitive_root},
};

/// Largest value a prime may take, `2^31 - 1`.
pub const DEFAULT_BOUND: u64 = (1 << 31) - 1;

/// Which end of the range the search starts from.
///
/// The two directions give different primes and downstream constants assume
/// one or the other, so there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum SearchDirection {
    /// Scan down from the bound and return the largest qualifying prime.
    #[serde(rename = "largest")]
    #[value(name = "largest", alias = "descending")]
    Descending,
    /// Scan up from 1 and return the smallest qualifying prime.
    #[serde(rename = "smallest")]
    #[value(name = "smallest", alias = "ascending")]
    Ascending,
}

impl fmt::Display for SearchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchDirection::Descending => f.write_str("largest"),
            SearchDirection::Ascending => f.write_str("smallest"),
        }
    }
}

/// A prime together with its smallest primitive root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeGenerator {
    pub p: u64,
    pub g: u64,
}

impl fmt::Display for PrimeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.p, self.g)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeSearch {
    n: u64,
    m: u64,
    direction: SearchDirection,
    bound: u64,
}

impl PrimeSearch {
    /// Rejects `n = 0` or `m = 0` before any search runs.
    pub fn new(n: u64, m: u64, direction: SearchDirection) -> Result<Self, SetupError> {
        if n == 0 || m == 0 {
            return Err(SetupError::InvalidParameters { n, m });
        }
        Ok(Self {
            n,
            m,
            direction,
            bound: DEFAULT_BOUND,
        })
    }

    /// Lowers (or raises) the inclusive upper bound on `p`.
    pub fn with_bound(mut self, bound: u64) -> Self {
        self.bound = bound;
        self
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn m(&self) -> u64 {
        self.m
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// Returns the qualifying prime nearest the starting end, or `None` if the
    /// range holds none.
    #[instrument(level = "debug", skip(self), fields(n = self.n, m = self.m, direction = %self.direction))]
    pub fn find_prime(&self) -> Option<u64> {
        // An lcm that overflows leaves no candidate below any u64 bound.
        let step = lcm(self.n, self.m)?;
        let max_k = self.bound.saturating_sub(1) / step;
        debug!(step, max_k, "scanning candidates");

        let candidate = |k: u64| 1 + k * step;
        let found = match self.direction {
            SearchDirection::Descending => (1..=max_k).rev().map(candidate).find(|&p| is_prime(p)),
            SearchDirection::Ascending => (1..=max_k).map(candidate).find(|&p| is_prime(p)),
        };
        debug!(?found, "search finished");
        found
    }

    /// Finds the prime and its smallest primitive root.
    pub fn find_prime_and_generator(&self) -> Result<PrimeGenerator, SetupError> {
        let p = self.find_prime().ok_or(SetupError::NoPrimeFound {
            n: self.n,
            m: self.m,
            direction: self.direction,
            bound: self.bound,
        })?;
        let g = smallest_primitive_root(p).ok_or(SetupError::NoGenerator(p))?;
        info!(p, g, direction = %self.direction, "found prime and generator");
        Ok(PrimeGenerator { p, g })
    }
}

/// Searches below `2^31` with the given direction.
pub fn find_prime_and_generator(
    n: u64,
    m: u64,
    direction: SearchDirection,
) -> Result<PrimeGenerator, SetupError> {
    PrimeSearch::new(n, m, direction)?.find_prime_and_generator()
}
