use strum::{EnumCount, IntoEnumIterator};
use tracing::info;

use crate::{instruction::Trace, opcodes::Mnemonic};

/// Per-mnemonic instruction counts of a listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InstructionStats {
    counts: [usize; Mnemonic::COUNT],
}

impl InstructionStats {
    pub fn new(trace: &Trace) -> Self {
        let mut stats = Self::default();
        for instruction in trace {
            stats.record(instruction.mnemonic);
        }
        stats
    }

    pub fn record(&mut self, mnemonic: Mnemonic) {
        self.counts[mnemonic as usize] += 1;
    }

    pub fn count(&self, mnemonic: Mnemonic) -> usize {
        self.counts[mnemonic as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of `ld` instructions.
    pub fn loads(&self) -> usize {
        Mnemonic::iter()
            .filter(Mnemonic::is_load)
            .map(|m| self.count(m))
            .sum()
    }

    /// Number of instructions that are not loads.
    pub fn gates(&self) -> usize {
        self.total() - self.loads()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mnemonic, usize)> + '_ {
        Mnemonic::iter().map(|m| (m, self.count(m)))
    }

    pub fn log_summary(&self) {
        for (mnemonic, count) in self.iter().filter(|&(_, c)| c > 0) {
            info!(%mnemonic, count, "instruction count");
        }
    }
}
