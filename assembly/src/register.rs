//! The 32-entry register file of the RISC-V-like ISA and its name tables.

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use ahash::AHashMap;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use once_cell::sync::Lazy;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::field::Modulus;

/// A register, in canonical `x0..x31` order.
///
/// Each variant serialises to its ABI name.
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
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Register {
    Zero = 0,
    Ra,
    Sp,
    Gp,
    Tp,
    T0,
    T1,
    T2,
    S0,
    S1,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
    S10,
    S11,
    T3,
    T4,
    T5,
    T6,
}

/// Number of architectural registers.
pub const NUM_REGISTERS: usize = Register::COUNT;

const _: () = assert!(NUM_REGISTERS == 32);

/// `xN`, plus the `rN`/`RN` spellings emitted by synthetic listing generators.
static NUMERIC_NAMES: Lazy<AHashMap<String, Register>> = Lazy::new(|| {
    Register::iter()
        .flat_map(|r| {
            let i = r.index();
            [(r.numeric_name(), r), (format!("r{i}"), r), (format!("R{i}"), r)]
        })
        .collect()
});

impl Register {
    /// Canonical index of the register (`xN` has index `N`).
    pub fn index(self) -> usize {
        u8::from(self) as usize
    }

    pub fn abi_name(self) -> &'static str {
        self.into()
    }

    pub fn numeric_name(self) -> String {
        format!("x{}", self.index())
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abi_name())
    }
}

/// Spellings of register operands accepted by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegisterNames {
    /// `zero`, `ra`, `sp`, ..., `t6`.
    #[default]
    Abi,
    /// `x0` to `x31`, also spelled `r0`/`R0` to `r31`/`R31`.
    Numeric,
    /// Either spelling.
    Any,
}

impl RegisterNames {
    /// Resolves a register operand, or returns `None` if this table does not
    /// know the name.
    pub fn resolve(&self, name: &str) -> Option<Register> {
        let abi = || Register::from_str(name).ok();
        let numeric = || NUMERIC_NAMES.get(name).copied();
        match self {
            RegisterNames::Abi => abi(),
            RegisterNames::Numeric => numeric(),
            RegisterNames::Any => abi().or_else(numeric),
        }
    }
}

/// The mutable register state of one evaluation.
///
/// Values are kept reduced modulo the field prime.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterFile([u64; NUM_REGISTERS]);

impl RegisterFile {
    pub fn new(values: [u64; NUM_REGISTERS], modulus: Modulus) -> Self {
        Self(values.map(|v| modulus.reduce(v)))
    }

    /// Register `xN` holds `N`.
    pub fn indexed(modulus: Modulus) -> Self {
        Self::new(std::array::from_fn(|i| i as u64), modulus)
    }

    pub fn zeroed() -> Self {
        Self([0; NUM_REGISTERS])
    }

    /// Values in canonical register order.
    pub fn values(&self) -> &[u64; NUM_REGISTERS] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Register, u64)> + '_ {
        Register::iter().zip(self.0.iter().copied())
    }
}

impl Index<Register> for RegisterFile {
    type Output = u64;

    fn index(&self, reg: Register) -> &Self::Output {
        &self.0[reg.index()]
    }
}

impl IndexMut<Register> for RegisterFile {
    fn index_mut(&mut self, reg: Register) -> &mut Self::Output {
        &mut self.0[reg.index()]
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(r, v)| (r.abi_name(), v)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let names: Vec<_> = Register::iter().map(Register::abi_name).collect();
        assert_eq!(names.len(), 32);
        assert_eq!(&names[..5], &["zero", "ra", "sp", "gp", "tp"]);
        assert_eq!(names[8], "s0");
        assert_eq!(names[10], "a0");
        assert_eq!(names[18], "s2");
        assert_eq!(names[27], "s11");
        assert_eq!(names[31], "t6");
        assert_eq!(Register::S10.index(), 26);
    }

    #[test]
    fn test_name_tables() {
        assert_eq!(RegisterNames::Abi.resolve("s11"), Some(Register::S11));
        assert_eq!(RegisterNames::Abi.resolve("x27"), None);
        assert_eq!(RegisterNames::Numeric.resolve("x27"), Some(Register::S11));
        assert_eq!(RegisterNames::Numeric.resolve("s11"), None);
        assert_eq!(RegisterNames::Any.resolve("x5"), Some(Register::T0));
        assert_eq!(RegisterNames::Any.resolve("t0"), Some(Register::T0));
        assert_eq!(RegisterNames::Any.resolve("x32"), None);
        assert_eq!(RegisterNames::Any.resolve("fp"), None);
        assert_eq!(RegisterNames::Numeric.resolve("R1"), Some(Register::Ra));
        assert_eq!(RegisterNames::Numeric.resolve("r31"), Some(Register::T6));
        assert_eq!(RegisterNames::Abi.resolve("R1"), None);
        assert_eq!(RegisterNames::Numeric.resolve("R32"), None);
    }

    #[test]
    fn test_indexed_file_is_reduced() {
        let file = RegisterFile::indexed(Modulus::new(7).unwrap());
        assert_eq!(file[Register::Zero], 0);
        assert_eq!(file[Register::T2], 0);
        assert_eq!(file[Register::S0], 1);
        assert_eq!(file[Register::T6], 31 % 7);
    }
}
