//! The `Z` vector file format: decimal entries separated by `", "`.

use std::{fmt, fs, path::Path, str::FromStr};

use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum VectorError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("entry {index} is not an integer: `{text}`")]
    BadEntry { index: usize, text: String },
}

/// The concatenated output vector `Z`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZVector(Vec<u64>);

impl ZVector {
    pub fn new(values: Vec<u64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<u64> {
        self.0
    }

    #[instrument(level = "debug", skip(self), fields(len = self.len()))]
    pub fn write_to(&self, path: impl AsRef<Path> + fmt::Debug) -> Result<(), VectorError> {
        fs::write(path, self.to_string())?;
        Ok(())
    }

    #[instrument(level = "debug")]
    pub fn read_from(path: impl AsRef<Path> + fmt::Debug) -> Result<Self, VectorError> {
        let vector = fs::read_to_string(path)?.parse::<Self>()?;
        debug!(len = vector.len(), "vector loaded");
        Ok(vector)
    }
}

impl fmt::Display for ZVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values = self.0.iter();
        if let Some(first) = values.next() {
            write!(f, "{first}")?;
            for value in values {
                write!(f, ", {value}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for ZVector {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        s.split(',')
            .enumerate()
            .map(|(index, entry)| {
                let text = entry.trim();
                text.parse::<u64>().map_err(|_| VectorError::BadEntry {
                    index,
                    text: text.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<u64>> for ZVector {
    fn from(values: Vec<u64>) -> Self {
        Self(values)
    }
}
