use pest::iterators::Pair;
use thiserror::Error;

use super::{get_first_inner, Rule};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BadArgumentError {
    #[error("expected a register, found `{0}`")]
    ExpectedRegister(String),
    #[error("expected an immediate, found `{0}`")]
    ExpectedImmediate(String),
    #[error("expected an `offset(base)` operand, found `{0}`")]
    ExpectedMemory(String),
    #[error("immediate `{0}` is not a representable integer")]
    Immediate(String),
}

/// An operand as it appears in the listing, before name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawOperand<'a> {
    Register(&'a str),
    Immediate(&'a str),
    Memory { offset: &'a str, base: &'a str },
}

impl<'a> RawOperand<'a> {
    /// Builds an operand from a `Rule::operand` pair.
    pub(crate) fn from_pair(pair: Pair<'a, Rule>) -> Self {
        let inner = get_first_inner(pair, "operand has a kind");
        match inner.as_rule() {
            Rule::register => RawOperand::Register(inner.as_str()),
            Rule::immediate => RawOperand::Immediate(inner.as_str()),
            Rule::memory => {
                let mut parts = inner.into_inner();
                let offset = parts.next().expect("memory operand has offset").as_str();
                let base = parts.next().expect("memory operand has base").as_str();
                RawOperand::Memory { offset, base }
            }
            rule => unreachable!("operand cannot be {rule:?}"),
        }
    }

    pub(crate) fn register(&self) -> Result<&'a str, BadArgumentError> {
        match self {
            RawOperand::Register(name) => Ok(*name),
            other => Err(BadArgumentError::ExpectedRegister(other.to_string())),
        }
    }

    pub(crate) fn immediate(&self) -> Result<i128, BadArgumentError> {
        match self {
            RawOperand::Immediate(text) => parse_immediate(text),
            other => Err(BadArgumentError::ExpectedImmediate(other.to_string())),
        }
    }

    pub(crate) fn memory(&self) -> Result<(i128, &'a str), BadArgumentError> {
        match self {
            RawOperand::Memory { offset, base } => Ok((parse_immediate(offset)?, *base)),
            other => Err(BadArgumentError::ExpectedMemory(other.to_string())),
        }
    }
}

impl std::fmt::Display for RawOperand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawOperand::Register(s) | RawOperand::Immediate(s) => f.write_str(s),
            RawOperand::Memory { offset, base } => write!(f, "{offset}({base})"),
        }
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal integer, optionally negated.
pub(crate) fn parse_immediate(text: &str) -> Result<i128, BadArgumentError> {
    let bad = || BadArgumentError::Immediate(text.to_string());
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match digits.strip_prefix("0x") {
        Some(hex) => i128::from_str_radix(hex, 16),
        None => digits.parse::<i128>(),
    }
    .map_err(|_| bad())?;
    Ok(if negative { -magnitude } else { magnitude })
}
