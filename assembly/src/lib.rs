//! Assembly listing parser and trace-vector evaluator.
//!
//! A listing is parsed into a [`Trace`], executed over the prime field by
//! [`ExecutionTrace::generate`], and split into the `X`, `W` and `Y`
//! sequences whose concatenation is the [`ZVector`].

pub mod config;
pub mod execution;
pub mod field;
pub mod instruction;
pub mod memory;
pub mod opcodes;
pub mod parser;
pub mod register;
pub mod stats;
pub mod utils;
pub mod vector;

pub use config::{AsmConfig, ConfigError, InitialValues};
pub use execution::{ExecutionTrace, InterpreterError, TraceVectors, WriteEvent};
pub use field::{Modulus, ModulusError, DEFAULT_MODULUS};
pub use instruction::{Instruction, Operand, Trace};
pub use memory::DataMemory;
pub use opcodes::{Mnemonic, OpcodeSet};
pub use parser::{parse_program, ParseError, ParseErrorKind};
pub use register::{Register, RegisterFile, RegisterNames};
pub use stats::InstructionStats;
pub use vector::{VectorError, ZVector};
