use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// The closed set of mnemonics accepted in an instruction listing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
    Add = 0x00,
    Addi = 0x01,
    Mul = 0x02,
    Sub = 0x03,
    Div = 0x04,
    Ld = 0x05,
}

impl Mnemonic {
    /// Returns the number of operands expected by the given mnemonic.
    pub const fn num_args(&self) -> usize {
        3
    }

    /// Whether `count` operands form a valid instruction.
    ///
    /// `ld rd, rs, imm` may also be written `ld rd, imm(rs)`.
    pub const fn accepts_args(&self, count: usize) -> bool {
        count == self.num_args() || (self.is_load() && count == 2)
    }

    /// Whether the instruction reads its inputs from data memory rather than
    /// from the register file alone.
    pub const fn is_load(&self) -> bool {
        matches!(self, Mnemonic::Ld)
    }

    const fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

/// A subset of [`Mnemonic`]s enabled for a listing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeSet(u8);

impl OpcodeSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Mnemonic::iter().collect()
    }

    pub const fn with(self, mnemonic: Mnemonic) -> Self {
        Self(self.0 | mnemonic.bit())
    }

    pub const fn contains(&self, mnemonic: Mnemonic) -> bool {
        self.0 & mnemonic.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Mnemonic> + '_ {
        Mnemonic::iter().filter(|m| self.contains(*m))
    }
}

impl Default for OpcodeSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Mnemonic> for OpcodeSet {
    fn from_iter<I: IntoIterator<Item = Mnemonic>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Debug for OpcodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

const _: () = assert!(Mnemonic::COUNT <= u8::BITS as usize);
