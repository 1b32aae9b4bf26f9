//! Command execution.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use anyhow::{Context, Result};
use tracing::{Level, debug};

use crate::observer::TracingObserver;
use crate::parser::{CsvParser, ParseResult};

use super::Args;

/// Runs the converter with parsed arguments.
///
/// The output file is only created once the whole input has parsed, so a
/// failed run leaves it untouched. This also makes `-o` safe to point at the
/// input file.
///
/// # Errors
///
/// Any parse failure, or failing to open the input or write the output.
pub fn run(args: &Args) -> Result<()> {
    if args.verbose {
        setup_logging()?;
    }

    let result = match args.input_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            parse_input(args, file)?
        }
        None => parse_input(args, io::stdin().lock())?,
    };

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_rows(args, &result, BufWriter::new(file))?;
        }
        None => write_rows(args, &result, BufWriter::new(io::stdout().lock()))?,
    }

    debug!(rows = result.count, "done");
    Ok(())
}

/// Parses everything from `reader` and writes the rows to `writer` as a JSON
/// array followed by a newline. Returns the number of rows written.
///
/// Nothing is written when the input fails to parse.
///
/// # Errors
///
/// Any parse error, or failing to write the output.
pub fn convert<R: Read, W: Write>(args: &Args, reader: R, writer: W) -> Result<usize> {
    let result = parse_input(args, reader)?;
    write_rows(args, &result, writer)?;
    Ok(result.count)
}

fn parse_input<R: Read>(args: &Args, reader: R) -> Result<ParseResult> {
    let mut parser = CsvParser::new(args.parser_config()?)?;
    if args.verbose {
        parser = parser.with_observer(TracingObserver);
    }

    parser.feed_reader(reader)?;
    Ok(parser.finalize()?)
}

fn write_rows<W: Write>(args: &Args, result: &ParseResult, mut writer: W) -> Result<()> {
    if args.is_pretty() {
        serde_json::to_writer_pretty(&mut writer, &result.rows)?;
    } else {
        serde_json::to_writer(&mut writer, &result.rows)?;
    }
    writeln!(writer)?;
    writer.flush().context("failed to write output")
}

/// Installs a stderr fmt subscriber at debug level.
fn setup_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}
