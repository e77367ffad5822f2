//! Command-line interface for sham
//!
//! # Usage Examples
//!
//! ```bash
//! # Schema as an argument
//! sham '{"id": uuid, "name": name, "phone": phoneNumber}'
//!
//! # Schema from stdin, five pretty-printed XML documents
//! sham -f xml -n 5 --pretty < schema.sham
//!
//! # Reproducible output
//! SHAM_SEED=42 sham '[(3), /[A-Z]{2}[0-9]{4}/]'
//! ```
//!
//! Each generated document is written on its own line.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use sham::{encode, GenerateOpts, OutputFormat};
use std::io::{self, IsTerminal, Read, Write};
use tracing::debug;

#[derive(Parser)]
#[command(name = "sham")]
#[command(about = "A tool for generating random data from Sham schemas")]
#[command(version, long_about = None)]
struct Cli {
    /// Schema source text (read from stdin when omitted)
    schema: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Number of documents to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Pretty print each document
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    opts: GenerateOpts,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Xml,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Xml => OutputFormat::Xml,
        }
    }
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let source = read_schema(cli.schema)?;

    let parser = cli.opts.build_parser()?;
    let schema = parser.parse(&source).context("Failed to parse schema")?;
    let mut rng = cli.opts.rng();
    let format = OutputFormat::from(cli.format);

    debug!("Generating {} {} document(s)", cli.count, format);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for i in 0..cli.count {
        let value = schema
            .generate(&mut rng)
            .with_context(|| format!("Failed to generate document {}", i + 1))?;
        let document = encode(&value, format, cli.pretty)
            .with_context(|| format!("Failed to encode document {}", i + 1))?;
        writeln!(out, "{document}").context("Failed to write to stdout")?;
    }
    out.flush().context("Failed to write to stdout")?;

    Ok(())
}

/// Take the schema from the argument, falling back to stdin when it is omitted.
///
/// Stdin is left untouched when an argument is given, so an idle inherited
/// pipe cannot block the run.
fn read_schema(arg: Option<String>) -> anyhow::Result<String> {
    if let Some(schema) = arg {
        return Ok(schema);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("no schema provided: pass it as an argument or on stdin");
    }

    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("Failed to read schema from stdin")?;
    if buf.trim().is_empty() {
        bail!("no schema provided: pass it as an argument or on stdin");
    }
    Ok(buf)
}
