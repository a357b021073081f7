use anyhow::Result;
use lintsmith::utils::error::{LintsmithError, format_error};
use lintsmith::{cli, run};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Config is not parsed yet when early errors happen.
    let verbose = std::env::args().any(|arg| arg == "-v" || arg == "--verbose");

    match run_main().await {
        Ok(code) => code,
        Err(e) => {
            display_error(&e, verbose);
            ExitCode::FAILURE
        }
    }
}

/// Display an error with contextual formatting.
///
/// Tries to downcast to `LintsmithError` for rich formatting, falls back to
/// anyhow's error chain display for other errors.
fn display_error(error: &anyhow::Error, verbose: bool) {
    if let Some(lintsmith_error) = error.downcast_ref::<LintsmithError>() {
        eprintln!("{}", format_error(lintsmith_error, verbose));
        return;
    }

    eprintln!("\n\u{26a0} Error: {}", error);

    let causes: Vec<_> = error.chain().skip(1).collect();
    if !causes.is_empty() {
        eprintln!("\nCaused by:");
        for (i, cause) in causes.iter().enumerate() {
            let prefix = if i == causes.len() - 1 {
                "\u{2514}\u{2500}"
            } else {
                "\u{251c}\u{2500}"
            };
            eprintln!("{} {}", prefix, cause);
        }
    }

    if verbose {
        let backtrace = error.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:\n{}", backtrace);
        }
    }
}

async fn run_main() -> Result<ExitCode> {
    let args = cli::args::parse();

    if args.mcp {
        let config = cli::config::load(&args)?;
        let merged_config = cli::config::merge_config(&args, config);
        lintsmith::init_logging(merged_config.verbose, merged_config.quiet);
        lintsmith::mcp::serve_stdio(merged_config).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let has_description = args
        .description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if !has_description {
        eprintln!("Usage: lintsmith \"<description of the lint rule>\"");
        eprintln!("Run `lintsmith --help` for all options.");
        return Ok(ExitCode::FAILURE);
    }

    let config = cli::config::load(&args)?;
    let merged_config = cli::config::merge_config(&args, config);

    lintsmith::init_logging(merged_config.verbose, merged_config.quiet);

    // A finished workflow exits 0 whether or not a rule was created.
    if let Some(outcome) = run(merged_config).await? {
        println!("{}", outcome.message());
    }
    Ok(ExitCode::SUCCESS)
}
