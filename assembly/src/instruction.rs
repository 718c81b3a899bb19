use std::fmt;

use crate::{opcodes::Mnemonic, register::Register};

/// Second source of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Register(Register),
    Immediate(i128),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(reg) => write!(f, "{reg}"),
            Operand::Immediate(imm) => write!(f, "{imm}"),
        }
    }
}

/// A parsed three-operand instruction.
///
/// For `ld`, `src` is the base register and `rhs` the immediate offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub dst: Register,
    pub src: Register,
    pub rhs: Operand,
    /// 1-based line in the source listing.
    pub line: usize,
}

impl Instruction {
    pub const fn new(
        mnemonic: Mnemonic,
        dst: Register,
        src: Register,
        rhs: Operand,
        line: usize,
    ) -> Self {
        Self {
            mnemonic,
            dst,
            src,
            rhs,
            line,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mnemonic, self.rhs) {
            (Mnemonic::Ld, Operand::Immediate(offset)) => {
                write!(f, "ld {}, {}({})", self.dst, offset, self.src)
            }
            (mnemonic, rhs) => write!(f, "{} {}, {}, {}", mnemonic, self.dst, self.src, rhs),
        }
    }
}

/// An ordered instruction listing, as read from a program file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    instructions: Vec<Instruction>,
}

impl Trace {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Instruction> for Trace {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
