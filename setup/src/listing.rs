//! Reading and evaluating instruction listings from disk.

use std::{fmt::Debug, fs, path::Path};

use tracing::{info, instrument};
use zkiot_asm::{parse_program, AsmConfig, ExecutionTrace, InstructionStats, Trace, TraceVectors};

use crate::error::SetupError;

#[instrument(level = "debug", skip(config))]
pub fn read_listing(
    path: impl AsRef<Path> + Debug,
    config: &AsmConfig,
) -> Result<Trace, SetupError> {
    let source = fs::read_to_string(path)?;
    let trace = parse_program(&source, config)?;
    InstructionStats::new(&trace).log_summary();
    Ok(trace)
}

/// Evaluates the listing at `program` and writes its Z vector to `output`.
#[instrument(level = "debug", skip(config))]
pub fn evaluate_listing(
    program: impl AsRef<Path> + Debug,
    output: impl AsRef<Path> + Debug,
    config: &AsmConfig,
) -> Result<TraceVectors, SetupError> {
    config.validate()?;
    let trace = read_listing(program, config)?;
    let vectors = ExecutionTrace::generate(&trace, config)?.vectors();
    vectors.z().write_to(output)?;
    info!(
        x = vectors.x().len(),
        w = vectors.w().len(),
        y = vectors.y().len(),
        "wrote Z vector"
    );
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use zkiot_asm::{ParseErrorKind, ZVector};

    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("zkiot_listing_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_evaluate_listing() {
        let program = scratch("ok.s");
        let output = scratch("ok_z.txt");
        fs::write(&program, "addi a0, zero, 5\nmul a1, a0, a0\n").unwrap();

        let vectors = evaluate_listing(&program, &output, &AsmConfig::default()).unwrap();
        let z = ZVector::read_from(&output).unwrap();
        assert_eq!(z, vectors.z());
        assert_eq!(&z.values()[33..], [5, 25]);

        fs::remove_file(program).unwrap();
        fs::remove_file(output).unwrap();
    }

    #[test]
    fn test_errors_keep_their_source() {
        let missing = read_listing(scratch("missing.s"), &AsmConfig::default()).unwrap_err();
        assert!(matches!(missing, SetupError::Io(_)));

        let program = scratch("bad.s");
        fs::write(&program, "addi a0, zero, 5\nxor a1, a0, a0\n").unwrap();
        let err = read_listing(&program, &AsmConfig::default()).unwrap_err();
        let SetupError::Parse(parse) = err else {
            panic!("expected a parse error, got {err:?}");
        };
        assert_eq!(parse.line, 2);
        assert_eq!(parse.kind, ParseErrorKind::UnknownMnemonic("xor".into()));

        fs::write(&program, "addi a0, zero, 0\ndiv a1, a1, a0\n").unwrap();
        let err = evaluate_listing(&program, scratch("bad_z.txt"), &AsmConfig::default())
            .unwrap_err();
        assert!(matches!(err, SetupError::Interpreter(_)));

        fs::write(&program, "addi a0, zero, 5\n").unwrap();
        let unwritable = scratch("no_such_dir").join("z.txt");
        let err = evaluate_listing(&program, unwritable, &AsmConfig::default()).unwrap_err();
        assert!(matches!(err, SetupError::Vector(_)));

        let inverted = AsmConfig::default().with_immediate_range(5..=-5);
        let err = evaluate_listing(&program, scratch("bad_z.txt"), &inverted).unwrap_err();
        assert!(matches!(err, SetupError::Config(_)));
        fs::remove_file(program).unwrap();
    }
}
