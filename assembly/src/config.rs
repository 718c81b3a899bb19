use std::ops::RangeInclusive;

use thiserror::Error;

use crate::{
    field::Modulus,
    memory::DataMemory,
    opcodes::OpcodeSet,
    register::{RegisterFile, RegisterNames, NUM_REGISTERS},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("expected 32 initial register values, got {0}")]
    InitialValueCount(usize),
    #[error("immediate range {min}..={max} is empty")]
    EmptyImmediateRange { min: i128, max: i128 },
    #[error("no opcodes enabled")]
    NoOpcodes,
}

/// Starting contents of the register file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InitialValues {
    /// `xN = N`.
    #[default]
    Index,
    Zero,
    /// Values in canonical register order.
    Custom(Vec<u64>),
}

/// Parser and evaluator settings for one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmConfig {
    pub register_names: RegisterNames,
    pub immediate_range: RangeInclusive<i128>,
    pub opcodes: OpcodeSet,
    pub modulus: Modulus,
    pub initial_values: InitialValues,
    /// Word-addressed data memory read by `ld`. Missing addresses read as 0.
    pub memory: DataMemory,
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self {
            register_names: RegisterNames::default(),
            immediate_range: i64::MIN as i128..=u64::MAX as i128,
            opcodes: OpcodeSet::all(),
            modulus: Modulus::default(),
            initial_values: InitialValues::default(),
            memory: DataMemory::new(),
        }
    }
}

impl AsmConfig {
    pub fn with_modulus(mut self, modulus: Modulus) -> Self {
        self.modulus = modulus;
        self
    }

    pub fn with_register_names(mut self, names: RegisterNames) -> Self {
        self.register_names = names;
        self
    }

    pub fn with_immediate_range(mut self, range: RangeInclusive<i128>) -> Self {
        self.immediate_range = range;
        self
    }

    pub fn with_opcodes(mut self, opcodes: OpcodeSet) -> Self {
        self.opcodes = opcodes;
        self
    }

    pub fn with_initial_values(mut self, values: InitialValues) -> Self {
        self.initial_values = values;
        self
    }

    pub fn with_memory(mut self, memory: DataMemory) -> Self {
        self.memory = memory;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.immediate_range.is_empty() {
            return Err(ConfigError::EmptyImmediateRange {
                min: *self.immediate_range.start(),
                max: *self.immediate_range.end(),
            });
        }
        if self.opcodes.is_empty() {
            return Err(ConfigError::NoOpcodes);
        }
        if let InitialValues::Custom(values) = &self.initial_values {
            if values.len() != NUM_REGISTERS {
                return Err(ConfigError::InitialValueCount(values.len()));
            }
        }
        Ok(())
    }

    /// Builds a fresh register file for one run.
    pub fn initial_registers(&self) -> Result<RegisterFile, ConfigError> {
        match &self.initial_values {
            InitialValues::Index => Ok(RegisterFile::indexed(self.modulus)),
            InitialValues::Zero => Ok(RegisterFile::zeroed()),
            InitialValues::Custom(values) => {
                let values: [u64; NUM_REGISTERS] = values
                    .as_slice()
                    .try_into()
                    .map_err(|_| ConfigError::InitialValueCount(values.len()))?;
                Ok(RegisterFile::new(values, self.modulus))
            }
        }
    }
}
