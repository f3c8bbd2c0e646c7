//! sheetsql CLI - render one SQL statement per row
//!
//! ```bash
//! sheetsql ./batch     # batch/ holds insert.sql and data.csv (or data.xlsx)
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG=debug` to see which files were
//! picked up. A fatal error is always printed to stderr, whatever `RUST_LOG`
//! says.

use clap::Parser;
use sheetsql::{run, PipelineError, PipelineOptions};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sheetsql", version)]
#[command(about = "Render a .sql template once per row of a CSV or XLSX file", long_about = None)]
struct Cli {
    /// Directory holding the template and the data file
    dir: PathBuf,
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(&cli.dir, &PipelineOptions::default()) {
        Ok(rendered) => println!("out: {}", rendered),
        Err(e) => {
            tracing::debug!(kind = %e.kind(), "run failed");
            let _ = report(&e, &mut io::stderr());
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Write the fatal error line, tagged with its kind.
fn report<W: Write>(err: &PipelineError, sink: &mut W) -> io::Result<()> {
    writeln!(sink, "Error [{}]: {}", err.kind(), err)
}
