mod emulator;
mod trace;

pub use emulator::{InterpreterError, WriteEvent};
pub use trace::{ExecutionTrace, TraceVectors};
