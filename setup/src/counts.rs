use std::{fmt::Debug, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;
use zkiot_asm::{AsmConfig, InstructionStats, Trace};

use crate::{error::SetupError, listing::read_listing};

/// Constraint-system sizes derived from a trace.
///
/// Loads are inputs (`n_i`) and every other instruction is a gate (`n_g`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintCounts {
    pub n_g: u64,
    pub n_i: u64,
    /// `n_i + n_g + 1`.
    pub n: u64,
    /// `C(n, 2) - C(n_i + 1, 2)`.
    pub m: u64,
}

/// `C(k, 2)`, or `None` if it does not fit in a `u64`.
fn pairs(k: u64) -> Option<u64> {
    // One of `k` and `k - 1` is even; halve it before multiplying.
    if k % 2 == 0 {
        (k / 2).checked_mul(k.saturating_sub(1))
    } else {
        k.checked_mul((k - 1) / 2)
    }
}

impl ConstraintCounts {
    pub fn new(n_i: u64, n_g: u64) -> Result<Self, SetupError> {
        let overflow = || SetupError::CountOverflow { n_i, n_g };
        let n = n_i
            .checked_add(n_g)
            .and_then(|s| s.checked_add(1))
            .ok_or_else(overflow)?;
        // n >= n_i + 1, so the subtraction cannot underflow.
        let m = pairs(n).ok_or_else(overflow)? - pairs(n_i + 1).ok_or_else(overflow)?;
        Ok(Self { n_g, n_i, n, m })
    }

    /// Counts a parsed listing. `inputs` replaces the number of loads as
    /// `n_i`; setups that treat every register as an input pass 32.
    pub fn from_stats(stats: &InstructionStats, inputs: Option<u64>) -> Result<Self, SetupError> {
        let n_i = inputs.unwrap_or(stats.loads() as u64);
        let counts = Self::new(n_i, stats.gates() as u64)?;
        debug!(?counts, "derived constraint counts");
        Ok(counts)
    }

    pub fn from_trace(trace: &Trace, inputs: Option<u64>) -> Result<Self, SetupError> {
        Self::from_stats(&InstructionStats::new(trace), inputs)
    }

    /// Reads, parses and counts the listing at `path`.
    pub fn from_path(
        path: impl AsRef<Path> + Debug,
        config: &AsmConfig,
        inputs: Option<u64>,
    ) -> Result<Self, SetupError> {
        Self::from_trace(&read_listing(path, config)?, inputs)
    }
}

#[cfg(test)]
mod tests {
    use zkiot_asm::{parse_program, RegisterNames};

    use super::*;

    #[test]
    fn test_formula() {
        let counts = ConstraintCounts::new(32, 10).unwrap();
        assert_eq!((counts.n, counts.m), (43, 375));
        assert_eq!(ConstraintCounts::new(0, 3).unwrap().m, 6);
        assert_eq!(ConstraintCounts::new(2, 3).unwrap().m, 12);
        // With no gates every pair is an input pair.
        assert_eq!(ConstraintCounts::new(5, 0).unwrap().m, 0);
        assert_eq!(ConstraintCounts::new(0, 0).unwrap().m, 0);
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            ConstraintCounts::new(5_000_000_000, 3),
            Err(SetupError::CountOverflow { n_i: 5_000_000_000, n_g: 3 })
        ));
        assert!(ConstraintCounts::new(u64::MAX, 0).is_err());
        assert!(ConstraintCounts::new(0, u64::MAX).is_err());

        // The largest n whose C(n, 2) still fits.
        let counts = ConstraintCounts::new(0, 6_074_000_999).unwrap();
        assert_eq!(counts.m, 3_037_000_500 * 6_074_000_999);
        assert!(ConstraintCounts::new(0, 6_074_001_000).is_err());
    }

    #[test]
    fn test_from_trace() {
        let trace = parse_program(
            "ld a0, 0(sp)\nld a1, 8(sp)\nadd a2, a0, a1\nmul a3, a2, a0\nsub a4, a3, 1",
            &AsmConfig::default(),
        )
        .unwrap();

        let counts = ConstraintCounts::from_trace(&trace, None).unwrap();
        assert_eq!(counts, ConstraintCounts { n_g: 3, n_i: 2, n: 6, m: 12 });

        let pinned = ConstraintCounts::from_trace(&trace, Some(32)).unwrap();
        assert_eq!(pinned, ConstraintCounts::new(32, 3).unwrap());
        assert_eq!(pinned.n, 36);

        assert!(ConstraintCounts::from_trace(&trace, Some(5_000_000_000)).is_err());
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!("zkiot_counts_{}.txt", std::process::id()));
        std::fs::write(
            &path,
            "40380552:       02f407b3                ld      R1, R1 ,1234\n\
             40380556:       02f407b3                mul      R1, R1 ,77\n\
             4038055a:       02f407b3                addi      R1, R1 ,5\n",
        )
        .unwrap();

        assert!(matches!(
            ConstraintCounts::from_path(&path, &AsmConfig::default(), None),
            Err(SetupError::Parse(_))
        ));
        let numeric = AsmConfig::default().with_register_names(RegisterNames::Numeric);
        let counts = ConstraintCounts::from_path(&path, &numeric, None).unwrap();
        assert_eq!((counts.n_i, counts.n_g, counts.n, counts.m), (1, 2, 4, 5));

        std::fs::remove_file(path).unwrap();
    }
}
