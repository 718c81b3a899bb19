use std::str::FromStr;

use pest::{error::LineColLocation, iterators::Pair, Parser};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, instrument, trace};

mod instruction_args;

pub use instruction_args::BadArgumentError;
use instruction_args::RawOperand;

use crate::{
    config::AsmConfig,
    instruction::{Instruction, Operand, Trace},
    opcodes::Mnemonic,
    register::Register,
};

#[derive(pest_derive::Parser)]
#[grammar = "parser/asm.pest"]
struct AsmParser;

/// A rejected line of the listing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {kind}: `{content}`")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub content: String,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("malformed instruction (unexpected input at column {0})")]
    Syntax(usize),
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),
    #[error("mnemonic `{0}` is not enabled")]
    DisabledMnemonic(Mnemonic),
    #[error("`{mnemonic}` expects {expected} operands, found {found}")]
    OperandCount {
        mnemonic: Mnemonic,
        expected: usize,
        found: usize,
    },
    #[error("unknown register `{0}`")]
    UnknownRegister(String),
    #[error(transparent)]
    BadArgument(#[from] BadArgumentError),
    #[error("immediate {value} outside of {min}..={max}")]
    ImmediateOutOfRange { value: i128, min: i128, max: i128 },
}

#[inline]
fn get_first_inner<'a>(pair: Pair<'a, Rule>, msg: &str) -> Pair<'a, Rule> {
    pair.into_inner().next().expect(msg)
}

/// Parses a whole listing, one instruction per line.
///
/// Blank lines and comment lines are skipped. The first malformed line aborts
/// parsing.
#[instrument(level = "debug", skip_all)]
pub fn parse_program(input: &str, config: &AsmConfig) -> Result<Trace, ParseError> {
    let trace = input
        .lines()
        .enumerate()
        .filter_map(|(index, content)| parse_line(content, index + 1, config).transpose())
        .collect::<Result<Trace, _>>()?;

    debug!(instructions = trace.len(), "parsed listing");
    Ok(trace)
}

/// Parses a single line. Returns `Ok(None)` for lines without an instruction.
pub fn parse_line(
    content: &str,
    line: usize,
    config: &AsmConfig,
) -> Result<Option<Instruction>, ParseError> {
    let error = |kind| ParseError {
        line,
        content: content.trim().to_string(),
        kind,
    };

    let parsed = AsmParser::parse(Rule::line, content).map_err(|e| {
        let column = match e.line_col {
            LineColLocation::Pos((_, col)) | LineColLocation::Span((_, col), _) => col,
        };
        error(ParseErrorKind::Syntax(column))
    })?;

    let line_pair = parsed.into_iter().next().expect("line rule yields one pair");
    for pair in line_pair.into_inner() {
        match pair.as_rule() {
            Rule::prefix => trace!(line, prefix = pair.as_str(), "skipping address prefix"),
            Rule::instruction => {
                return parse_instruction(pair, line, config).map(Some).map_err(error)
            }
            Rule::EOI => (),
            rule => unreachable!("line cannot contain {rule:?}"),
        }
    }
    Ok(None)
}

fn parse_instruction(
    instruction: Pair<'_, Rule>,
    line: usize,
    config: &AsmConfig,
) -> Result<Instruction, ParseErrorKind> {
    let mut inner = instruction.into_inner();
    let name = inner.next().expect("instruction has mnemonic").as_str();
    let operands: SmallVec<[RawOperand<'_>; 3]> = inner
        .next()
        .map(|ops| ops.into_inner().map(RawOperand::from_pair).collect())
        .unwrap_or_default();

    let mnemonic =
        Mnemonic::from_str(name).map_err(|_| ParseErrorKind::UnknownMnemonic(name.to_string()))?;
    if !config.opcodes.contains(mnemonic) {
        return Err(ParseErrorKind::DisabledMnemonic(mnemonic));
    }
    if !mnemonic.accepts_args(operands.len()) {
        return Err(ParseErrorKind::OperandCount {
            mnemonic,
            expected: mnemonic.num_args(),
            found: operands.len(),
        });
    }

    let register = |name: &str| resolve_register(name, config);
    let immediate = |value: i128| {
        if config.immediate_range.contains(&value) {
            Ok(value)
        } else {
            Err(ParseErrorKind::ImmediateOutOfRange {
                value,
                min: *config.immediate_range.start(),
                max: *config.immediate_range.end(),
            })
        }
    };

    let dst = register(operands[0].register()?)?;
    let (src, rhs) = match mnemonic {
        Mnemonic::Ld if operands.len() == 2 => {
            let (offset, base) = operands[1].memory()?;
            (register(base)?, Operand::Immediate(immediate(offset)?))
        }
        Mnemonic::Ld | Mnemonic::Addi => (
            register(operands[1].register()?)?,
            Operand::Immediate(immediate(operands[2].immediate()?)?),
        ),
        Mnemonic::Add | Mnemonic::Sub | Mnemonic::Mul | Mnemonic::Div => {
            let src = register(operands[1].register()?)?;
            let rhs = match operands[2] {
                RawOperand::Immediate(_) => {
                    Operand::Immediate(immediate(operands[2].immediate()?)?)
                }
                other => Operand::Register(register(other.register()?)?),
            };
            (src, rhs)
        }
    };

    Ok(Instruction::new(mnemonic, dst, src, rhs, line))
}

/// Resolves a single register name against the configured name table.
pub fn resolve_register(name: &str, config: &AsmConfig) -> Result<Register, ParseErrorKind> {
    config
        .register_names
        .resolve(name)
        .ok_or_else(|| ParseErrorKind::UnknownRegister(name.to_string()))
}
