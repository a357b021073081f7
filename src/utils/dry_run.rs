//! Dry-run mode display for previewing a rule request.
//!
//! Shows what a run would do with the resolved configuration without
//! calling the LLM or ESLint.

use crate::MergedConfig;
use anyhow::{Context, Result};
use console::{Term, style};
use std::io::Write;

/// Print the dry-run summary to stdout.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized or writing to
/// the terminal fails.
pub fn display_dry_run(config: &MergedConfig) -> Result<()> {
    let mut term = Term::stdout();
    write_dry_run(&mut term, config)
}

/// Write the dry-run summary to `out`.
pub fn write_dry_run(out: &mut impl Write, config: &MergedConfig) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} - No LLM or ESLint calls will be made",
        style("Dry Run").yellow().bold()
    )?;
    writeln!(out)?;

    let description = config
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("(none)");
    writeln!(out, "{}: {}", style("Description").bold(), description)?;

    let scratch = config.generated_dir.join(&config.scratch_file);
    let rows = [
        ("Provider", config.provider.clone()),
        ("Examples model", config.examples_model.clone()),
        ("Rule model", config.rule_model.clone()),
        ("Scratch rule", scratch.display().to_string()),
        ("Rules directory", config.rules_dir.display().to_string()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let prefix = if i == rows.len() - 1 {
            "\u{2514}\u{2500}"
        } else {
            "\u{251c}\u{2500}"
        };
        writeln!(out, "{} {}: {}", style(prefix).dim(), label, value)?;
    }

    writeln!(out)?;
    writeln!(out, "{}:", style("Resolved configuration").bold())?;
    let rendered =
        toml::to_string_pretty(config).context("Failed to render configuration as TOML")?;
    write!(out, "{}", rendered)?;
    writeln!(out)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::Args;
    use crate::cli::config::{Config, merge_config};

    #[test]
    fn test_write_dry_run_lists_resolved_values() {
        let config = merge_config(
            &Args {
                description: Some("  Disallow var  ".to_string()),
                rule_model: Some("qwen2.5-coder".to_string()),
                ..Args::default()
            },
            Config::default(),
        );

        let mut buffer = Vec::new();
        write_dry_run(&mut buffer, &config).expect("should render");
        let output = String::from_utf8(buffer).expect("utf8");

        assert!(output.contains("Disallow var"));
        assert!(output.contains("qwen2.5-coder"));
        assert!(output.contains("max_attempts = 5"));
        assert!(output.contains("[checker]"));
        assert!(output.contains("custom-rule.js"));
    }
}
