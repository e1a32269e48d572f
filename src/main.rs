// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up diagnostic logging (stderr, controlled by RUST_LOG)
// 3. Run the audit, printing progress unless --quiet
// 4. Save the JSON report if --output was given
// 5. Exit with proper code (0 = every page OK, 1 = some page not OK,
//    2 = the audit could not run or the report could not be saved)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use site_auditor::report::{write_json, AuditEvent, ConsoleSink, EventSink, NullSink};
use site_auditor::SiteAuditor;

// One request at a time, so a single-threaded runtime is all we need
#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let auditor = SiteAuditor::new(cli.to_config()).context("could not set up the audit")?;

    let mut sink: Box<dyn EventSink> = if cli.quiet {
        Box::new(NullSink)
    } else if cli.no_color {
        Box::new(ConsoleSink::new().without_colors())
    } else {
        Box::new(ConsoleSink::new())
    };

    let report = auditor.run(sink.as_mut()).await;

    if let Some(path) = &cli.output {
        write_json(&report, path)
            .with_context(|| format!("could not write report to {}", path.display()))?;
        sink.emit(&AuditEvent::ReportSaved { path });
    }

    Ok(report.summary.exit_code())
}
