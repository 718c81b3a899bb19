//! The `zkiot` command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use zkiot_asm::{
    AsmConfig, DataMemory, InitialValues, Mnemonic, Modulus, OpcodeSet, RegisterNames,
    DEFAULT_MODULUS,
};

use crate::{
    counts::ConstraintCounts,
    error::SetupError,
    listing::evaluate_listing,
    record::SetupRecord,
    search::{PrimeSearch, SearchDirection, DEFAULT_BOUND},
};

/// Trace-vector and setup-constant toolchain for zkIoT programs.
#[derive(Parser, Debug)]
#[clap(version)]
#[clap(propagate_version = true)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Eval(Eval),
    Counts(Counts),
    FindPrime(FindPrime),
}

impl Cli {
    pub fn exec(self) -> Result<()> {
        match self.cmd {
            Command::Eval(e) => e.exec(),
            Command::Counts(c) => c.exec(),
            Command::FindPrime(f) => f.exec(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NameTable {
    Abi,
    Numeric,
    Any,
}

impl From<NameTable> for RegisterNames {
    fn from(table: NameTable) -> Self {
        match table {
            NameTable::Abi => RegisterNames::Abi,
            NameTable::Numeric => RegisterNames::Numeric,
            NameTable::Any => RegisterNames::Any,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Init {
    /// Register `xN` starts at `N`.
    Index,
    Zero,
}

fn parse_load(s: &str) -> Result<(u64, u64), String> {
    let (addr, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=VALUE, got `{s}`"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u64>()
            .map_err(|e| format!("`{v}`: {e}"))
    };
    Ok((parse(addr)?, parse(value)?))
}

/// How listing lines are read, shared by every subcommand that parses one.
#[derive(Args, Debug)]
pub struct ListingArgs {
    /// Accepted register spellings.
    #[arg(long, value_enum, default_value_t = NameTable::Abi)]
    registers: NameTable,
    /// Enabled mnemonics, comma separated. Defaults to all of them.
    #[arg(long, value_delimiter = ',')]
    opcodes: Vec<Mnemonic>,
    /// Smallest accepted immediate.
    #[arg(long, allow_negative_numbers = true)]
    imm_min: Option<i128>,
    /// Largest accepted immediate.
    #[arg(long, allow_negative_numbers = true)]
    imm_max: Option<i128>,
}

impl ListingArgs {
    pub fn config(&self) -> Result<AsmConfig, SetupError> {
        let default = AsmConfig::default();
        let min = self.imm_min.unwrap_or(*default.immediate_range.start());
        let max = self.imm_max.unwrap_or(*default.immediate_range.end());
        let opcodes = if self.opcodes.is_empty() {
            OpcodeSet::all()
        } else {
            self.opcodes.iter().copied().collect()
        };

        let config = default
            .with_register_names(self.registers.into())
            .with_opcodes(opcodes)
            .with_immediate_range(min..=max);
        config.validate()?;
        Ok(config)
    }
}

/// Evaluate a listing and write its Z vector.
#[derive(Args, Debug)]
pub struct Eval {
    /// Instruction listing to evaluate.
    #[arg(long)]
    program: PathBuf,
    /// Destination of the comma-separated Z vector.
    #[arg(long)]
    output: PathBuf,
    /// Field modulus; must be prime.
    #[arg(long, default_value_t = DEFAULT_MODULUS)]
    modulus: u64,
    /// Initial register values.
    #[arg(long, value_enum, default_value_t = Init::Index)]
    init: Init,
    /// Data memory word read by `ld`, as ADDR=VALUE. May be repeated.
    #[arg(long = "load", value_parser = parse_load)]
    loads: Vec<(u64, u64)>,
    #[command(flatten)]
    listing: ListingArgs,
}

impl Eval {
    fn config(&self) -> Result<AsmConfig, SetupError> {
        let initial_values = match self.init {
            Init::Index => InitialValues::Index,
            Init::Zero => InitialValues::Zero,
        };

        Ok(self
            .listing
            .config()?
            .with_modulus(Modulus::new(self.modulus)?)
            .with_initial_values(initial_values)
            .with_memory(self.loads.iter().copied().collect::<DataMemory>()))
    }

    pub fn exec(self) -> Result<()> {
        let config = self.config()?;
        let vectors = evaluate_listing(&self.program, &self.output, &config)
            .with_context(|| format!("failed to evaluate {}", self.program.display()))?;
        println!(
            "wrote {} entries to {}",
            vectors.z().len(),
            self.output.display()
        );
        Ok(())
    }
}

/// Print the constraint counts of a listing.
#[derive(Args, Debug)]
pub struct Counts {
    /// Instruction listing to count.
    #[arg(long)]
    program: PathBuf,
    /// Number of inputs, replacing the count of `ld` instructions.
    #[arg(long)]
    inputs: Option<u64>,
    #[command(flatten)]
    listing: ListingArgs,
}

impl Counts {
    pub fn exec(self) -> Result<()> {
        let config = self.listing.config()?;
        let counts = ConstraintCounts::from_path(&self.program, &config, self.inputs)
            .with_context(|| format!("failed to count {}", self.program.display()))?;
        println!(
            "n_g = {}, n_i = {}, n = {}, m = {}",
            counts.n_g, counts.n_i, counts.n, counts.m
        );
        Ok(())
    }
}

/// Find a prime p with n | p - 1 and m | p - 1, and its smallest primitive
/// root.
#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["program", "n"]),
))]
pub struct FindPrime {
    /// Which qualifying prime to return.
    #[arg(long, value_enum)]
    direction: SearchDirection,
    /// Derive n and m from this listing.
    #[arg(long, conflicts_with_all = ["n", "m"])]
    program: Option<PathBuf>,
    /// Number of inputs when deriving from a listing.
    #[arg(long, requires = "program")]
    inputs: Option<u64>,
    #[arg(long, requires = "m")]
    n: Option<u64>,
    #[arg(long, requires = "n")]
    m: Option<u64>,
    /// Inclusive upper bound on p.
    #[arg(long, default_value_t = DEFAULT_BOUND)]
    bound: u64,
    /// Write the setup record as JSON to this path.
    #[arg(long)]
    record: Option<PathBuf>,
    #[command(flatten)]
    listing: ListingArgs,
}

impl FindPrime {
    pub fn exec(self) -> Result<()> {
        let counts = match &self.program {
            Some(path) => Some(
                ConstraintCounts::from_path(path, &self.listing.config()?, self.inputs)
                    .with_context(|| format!("failed to count {}", path.display()))?,
            ),
            None => None,
        };
        let (n, m) = match (counts, self.n, self.m) {
            (Some(c), _, _) => (c.n, c.m),
            (None, Some(n), Some(m)) => (n, m),
            _ => anyhow::bail!("either --program or both --n and --m are required"),
        };

        let found = PrimeSearch::new(n, m, self.direction)?
            .with_bound(self.bound)
            .find_prime_and_generator()?;
        println!("{found}");

        if let Some(path) = &self.record {
            let record = match &counts {
                Some(c) => SetupRecord::from_counts(c, self.direction, found),
                None => SetupRecord::new(n, m, self.direction, found),
            };
            record
                .write_to(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote setup record");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_direction_is_required() {
        assert!(Cli::try_parse_from(["zkiot", "find-prime", "--n", "33", "--m", "496"]).is_err());
        assert!(Cli::try_parse_from([
            "zkiot",
            "find-prime",
            "--direction",
            "smallest",
            "--n",
            "33",
            "--m",
            "496"
        ])
        .is_ok());
        assert!(Cli::try_parse_from([
            "zkiot",
            "find-prime",
            "--direction",
            "largest",
            "--n",
            "33"
        ])
        .is_err());
    }

    #[test]
    fn test_eval_flags() {
        let cli = Cli::try_parse_from([
            "zkiot",
            "eval",
            "--program",
            "program.s",
            "--output",
            "z_vec.txt",
            "--modulus",
            "97",
            "--registers",
            "any",
            "--opcodes",
            "add,mul,ld",
            "--imm-min",
            "-5",
            "--load",
            "8=42",
            "--load",
            "16=7",
        ])
        .unwrap();
        let Command::Eval(eval) = cli.cmd else {
            panic!("expected eval");
        };
        let config = eval.config().unwrap();
        assert_eq!(config.modulus.get(), 97);
        assert_eq!(config.register_names, RegisterNames::Any);
        assert_eq!(config.opcodes.len(), 3);
        assert!(!config.opcodes.contains(Mnemonic::Div));
        assert_eq!(*config.immediate_range.start(), -5);
        assert_eq!(config.memory.read(8), 42);
        assert_eq!(config.memory.read(16), 7);

        assert!(parse_load("8").is_err());
        assert_eq!(parse_load("8 = 9"), Ok((8, 9)));
    }

    #[test]
    fn test_eval_rejects_composite_modulus() {
        let cli = Cli::try_parse_from([
            "zkiot",
            "eval",
            "--program",
            "p.s",
            "--output",
            "z.txt",
            "--modulus",
            "91",
        ])
        .unwrap();
        let Command::Eval(eval) = cli.cmd else {
            panic!("expected eval");
        };
        assert!(matches!(eval.config(), Err(SetupError::Modulus(_))));
    }

    #[test]
    fn test_listing_flags_are_shared() {
        let cli = Cli::try_parse_from([
            "zkiot",
            "counts",
            "--program",
            "generated.txt",
            "--registers",
            "numeric",
            "--opcodes",
            "ld,mul",
            "--imm-max",
            "2147483646",
        ])
        .unwrap();
        let Command::Counts(counts) = cli.cmd else {
            panic!("expected counts");
        };
        let config = counts.listing.config().unwrap();
        assert_eq!(config.register_names, RegisterNames::Numeric);
        assert_eq!(config.opcodes.len(), 2);
        assert_eq!(*config.immediate_range.end(), 2147483646);

        let cli = Cli::try_parse_from([
            "zkiot",
            "find-prime",
            "--direction",
            "largest",
            "--program",
            "generated.txt",
            "--registers",
            "any",
            "--imm-min",
            "10",
            "--imm-max",
            "1",
        ])
        .unwrap();
        let Command::FindPrime(find) = cli.cmd else {
            panic!("expected find-prime");
        };
        assert!(matches!(find.listing.config(), Err(SetupError::Config(_))));
    }
}
