use std::{fmt::Debug, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    counts::ConstraintCounts,
    error::SetupError,
    search::{PrimeGenerator, SearchDirection},
};

/// The setup constants handed to the class-table tooling.
///
/// `n_g` and `n_i` are absent when the search ran on explicit `n` and `m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_g: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_i: Option<u64>,
    pub n: u64,
    pub m: u64,
    pub direction: SearchDirection,
    pub p: u64,
    pub g: u64,
}

impl SetupRecord {
    pub fn new(n: u64, m: u64, direction: SearchDirection, found: PrimeGenerator) -> Self {
        Self {
            n_g: None,
            n_i: None,
            n,
            m,
            direction,
            p: found.p,
            g: found.g,
        }
    }

    pub fn from_counts(
        counts: &ConstraintCounts,
        direction: SearchDirection,
        found: PrimeGenerator,
    ) -> Self {
        Self {
            n_g: Some(counts.n_g),
            n_i: Some(counts.n_i),
            ..Self::new(counts.n, counts.m, direction, found)
        }
    }

    pub fn generator(&self) -> PrimeGenerator {
        PrimeGenerator {
            p: self.p,
            g: self.g,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn write_to(&self, path: impl AsRef<Path> + Debug) -> Result<(), SetupError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    #[instrument(level = "debug")]
    pub fn read_from(path: impl AsRef<Path> + Debug) -> Result<Self, SetupError> {
        let record = serde_json::from_str(&fs::read_to_string(path)?)?;
        debug!(?record, "setup record loaded");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let counts = ConstraintCounts::new(32, 10).unwrap();
        let record = SetupRecord::from_counts(
            &counts,
            SearchDirection::Descending,
            PrimeGenerator { p: 2147398501, g: 2 },
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "n_g": 10,
                "n_i": 32,
                "n": 43,
                "m": 375,
                "direction": "largest",
                "p": 2147398501u64,
                "g": 2,
            })
        );

        let bare = SetupRecord::new(33, 496, SearchDirection::Ascending, PrimeGenerator { p: 16369, g: 7 });
        let json = serde_json::to_string(&bare).unwrap();
        assert!(!json.contains("n_g"));
        assert_eq!(serde_json::from_str::<SetupRecord>(&json).unwrap(), bare);
        assert_eq!(bare.generator().to_string(), "(16369, 7)");
    }
}
