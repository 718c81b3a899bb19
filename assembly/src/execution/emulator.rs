use thiserror::Error;
use tracing::trace;

use crate::{
    config::{AsmConfig, ConfigError},
    field::Modulus,
    instruction::{Instruction, Operand},
    memory::DataMemory,
    opcodes::Mnemonic,
    register::{Register, RegisterFile},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterpreterError {
    #[error("line {line}: division by zero in `{instruction}`")]
    DivisionByZero { line: usize, instruction: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A single register write, recorded once per executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteEvent {
    /// Position of the instruction in the trace.
    pub step: usize,
    /// Source line of the instruction.
    pub line: usize,
    pub register: Register,
    /// Value written, reduced modulo the field prime.
    pub value: u64,
}

/// Executes instructions against a register file owned for one run.
#[derive(Debug)]
pub(crate) struct Interpreter<'a> {
    pub(crate) registers: RegisterFile,
    pub(crate) step: usize,
    modulus: Modulus,
    memory: &'a DataMemory,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(config: &'a AsmConfig) -> Result<Self, InterpreterError> {
        config.validate()?;
        Ok(Self {
            registers: config.initial_registers()?,
            step: 0,
            modulus: config.modulus,
            memory: &config.memory,
        })
    }

    fn operand(&self, operand: Operand) -> u64 {
        match operand {
            Operand::Register(reg) => self.registers[reg],
            Operand::Immediate(imm) => self.modulus.reduce_signed(imm),
        }
    }

    /// Executes one instruction and returns the resulting write.
    pub(crate) fn step(&mut self, instruction: &Instruction) -> Result<WriteEvent, InterpreterError> {
        let p = self.modulus;
        let lhs = self.registers[instruction.src];
        let rhs = self.operand(instruction.rhs);

        let value = match instruction.mnemonic {
            Mnemonic::Add | Mnemonic::Addi => p.add(lhs, rhs),
            Mnemonic::Sub => p.sub(lhs, rhs),
            Mnemonic::Mul => p.mul(lhs, rhs),
            Mnemonic::Div => {
                let inv = p.inv(rhs).ok_or_else(|| InterpreterError::DivisionByZero {
                    line: instruction.line,
                    instruction: instruction.to_string(),
                })?;
                p.mul(lhs, inv)
            }
            Mnemonic::Ld => {
                // Addresses live in the field like every other value.
                let addr = p.add(lhs, rhs);
                p.reduce(self.memory.read(addr))
            }
        };

        self.registers[instruction.dst] = value;
        let event = WriteEvent {
            step: self.step,
            line: instruction.line,
            register: instruction.dst,
            value,
        };
        trace!(step = self.step, %instruction, value, "executed");
        self.step += 1;
        Ok(event)
    }
}
