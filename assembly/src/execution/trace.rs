use ahash::AHashSet;
use tracing::{debug, instrument};

use super::emulator::{Interpreter, InterpreterError, WriteEvent};
use crate::{
    config::AsmConfig,
    instruction::Trace,
    register::{Register, RegisterFile, NUM_REGISTERS},
    vector::ZVector,
};

/// The full record of one evaluation: starting registers, final registers and
/// every write in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTrace {
    initial: RegisterFile,
    registers: RegisterFile,
    writes: Vec<WriteEvent>,
}

impl ExecutionTrace {
    /// Runs `trace` from the configured initial state.
    ///
    /// Nothing is returned on failure, so a division by zero halfway through a
    /// listing leaves no partial output behind.
    #[instrument(level = "debug", skip_all, fields(instructions = trace.len()))]
    pub fn generate(trace: &Trace, config: &AsmConfig) -> Result<Self, InterpreterError> {
        let mut interpreter = Interpreter::new(config)?;
        let initial = interpreter.registers.clone();

        let writes = trace
            .iter()
            .map(|instruction| interpreter.step(instruction))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(writes = writes.len(), "trace evaluated");
        Ok(Self {
            initial,
            registers: interpreter.registers,
            writes,
        })
    }

    pub fn initial_registers(&self) -> &RegisterFile {
        &self.initial
    }

    pub fn final_registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn writes(&self) -> &[WriteEvent] {
        &self.writes
    }

    /// Splits the writes into dead and live events.
    ///
    /// Scanning backward, the first write seen for a register is its live
    /// value; every earlier write to it is dead. Both lists come back in
    /// forward trace order.
    pub fn vectors(&self) -> TraceVectors {
        let mut seen = AHashSet::with_capacity(NUM_REGISTERS);
        let mut live = Vec::new();
        let mut dead = Vec::new();

        for event in self.writes.iter().rev() {
            if seen.insert(event.register) {
                live.push(*event);
            } else {
                dead.push(*event);
            }
        }
        live.reverse();
        dead.reverse();

        TraceVectors {
            x: self.initial.values().to_vec(),
            dead,
            live,
        }
    }
}

/// The `X`, `W` and `Y` sequences of an evaluated trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceVectors {
    x: Vec<u64>,
    dead: Vec<WriteEvent>,
    live: Vec<WriteEvent>,
}

impl TraceVectors {
    /// Initial register values in canonical order.
    pub fn x(&self) -> &[u64] {
        &self.x
    }

    /// Values of overwritten intermediate writes.
    pub fn w(&self) -> Vec<u64> {
        self.dead.iter().map(|e| e.value).collect()
    }

    /// Final live value of every written register.
    pub fn y(&self) -> Vec<u64> {
        self.live.iter().map(|e| e.value).collect()
    }

    pub fn dead_writes(&self) -> &[WriteEvent] {
        &self.dead
    }

    pub fn live_writes(&self) -> &[WriteEvent] {
        &self.live
    }

    pub fn live_registers(&self) -> impl Iterator<Item = Register> + '_ {
        self.live.iter().map(|e| e.register)
    }

    /// `Z = [1] ++ X ++ W ++ Y`.
    pub fn z(&self) -> ZVector {
        let values = std::iter::once(1)
            .chain(self.x.iter().copied())
            .chain(self.dead.iter().map(|e| e.value))
            .chain(self.live.iter().map(|e| e.value))
            .collect::<Vec<_>>();
        ZVector::new(values)
    }
}
