use thiserror::Error;
use zkiot_asm::{ConfigError, InterpreterError, ModulusError, ParseError, VectorError};

use crate::search::SearchDirection;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("search parameters must be positive, got n = {n}, m = {m}")]
    InvalidParameters { n: u64, m: u64 },

    #[error("no {direction} prime p <= {bound} with n = {n} and m = {m} dividing p - 1")]
    NoPrimeFound {
        n: u64,
        m: u64,
        direction: SearchDirection,
        bound: u64,
    },

    #[error("constraint counts overflow u64 with n_i = {n_i}, n_g = {n_g}")]
    CountOverflow { n_i: u64, n_g: u64 },

    #[error("{0} has no primitive root g >= 2")]
    NoGenerator(u64),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Interpreter(#[from] InterpreterError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Modulus(#[from] ModulusError),

    #[error(transparent)]
    Vector(#[from] VectorError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
