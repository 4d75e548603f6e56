mod cli;
mod logger;
mod tagger;

use clap::Parser;
use cli::Cli;
use logger::{Event, Logger};
use std::process::ExitCode;
use std::time::Instant;
use tagger::{run_pipeline, RunSummary, TaggerConfig};

fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Track run duration for summary reporting
    let started = Instant::now();

    // Initialize logger with optional JSON output and file logging
    let logger = match Logger::new(cli.json, cli.log_file.as_deref()) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to open log file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cfg = TaggerConfig {
        lookup_path:   cli.lookup,
        flow_log_path: cli.flow_log,
        output_path:   cli.output,
        logger:        &logger,
    };

    match run_pipeline(&cfg) {
        Ok(summary) => {
            print_summary(&logger, &summary, started);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let message = e.to_string();
            logger.log(&Event::Fatal { message: &message });
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

/// Logs the run totals and elapsed time.
fn print_summary(logger: &Logger, summary: &RunSummary, started: Instant) {
    logger.log(&Event::RunSummary {
        lookup:      summary.lookup_status.as_str(),
        records:     summary.records,
        discarded:   summary.discarded,
        tags:        summary.tags,
        pairs:       summary.pairs,
        tag_total:   summary.tag_total,
        untagged:    summary.untagged,
        duration_ms: started.elapsed().as_millis(),
    });
}
