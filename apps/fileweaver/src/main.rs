use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use fileweaver_weave::Config;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fileweaver", version)]
#[command(
    about = "A CLI tool for weaving files together with pattern matching and import following",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    config: Config,
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    let cfg = cli.config;
    debug!("Parsed CLI arguments: {:?}", cfg);

    let start = Instant::now();
    let num_threads = rayon::current_num_threads();
    info!("Weaving files (using {} threads)", num_threads);

    let result = match fileweaver_weave::run_weave(&cfg) {
        Ok(result) => result,
        Err(e) => {
            writeln!(stdout, "{} {}", "✗".red().bold(), format!("Error: {:#}", e).red())?;
            stdout.flush()?;
            std::process::exit(1);
        }
    };
    debug!("Processed {} of {} files", result.files_processed, result.files.len());

    let elapsed_ms = start.elapsed().as_millis();

    fileweaver_weave::print_warnings(&mut stdout, &result.warnings)?;
    fileweaver_weave::print_found_files(&mut stdout, &result)?;
    if let Some(stats) = &result.stats {
        fileweaver_weave::print_compression_stats(&mut stdout, stats)?;
    }
    fileweaver_weave::print_success(&mut stdout, &result)?;

    writeln!(
        stdout,
        "\n{} Finished in {}ms on {} files (using {} threads).",
        "●".bright_blue(),
        elapsed_ms.to_string().cyan(),
        result.files_processed.to_string().cyan(),
        num_threads.to_string().cyan()
    )?;
    stdout.flush()?;

    Ok(())
}
