use std::collections::BTreeMap;

/// Word-addressed data memory backing `ld`.
///
/// The memory is read-only during an evaluation; unmapped addresses read as
/// zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataMemory(BTreeMap<u64, u64>);

impl DataMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` at `addr`, returning the previous word if any.
    pub fn insert(&mut self, addr: u64, value: u64) -> Option<u64> {
        self.0.insert(addr, value)
    }

    pub fn read(&self, addr: u64) -> u64 {
        self.0.get(&addr).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u64, u64)> for DataMemory {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_reads_zero() {
        let mut memory: DataMemory = [(8, 42)].into_iter().collect();
        assert_eq!(memory.read(8), 42);
        assert_eq!(memory.read(16), 0);
        assert_eq!(memory.insert(8, 7), Some(42));
        assert_eq!(memory.read(8), 7);
        assert_eq!(memory.len(), 1);
    }
}
