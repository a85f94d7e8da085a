use anyhow::{Context, Result, bail};
use chainscope_core::report::{ReportFormat, generate_report, save_report};
use chainscope_core::walk::{WalkOptions, WalkProgressCallback, execute_walk};
use chainscope_scanner::{DependencyResult, parse};
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, debug};
use url::Url;

/// Install the fmt subscriber; `--verbose` lowers the level to DEBUG
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // A second install (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

/// Map a `--format` value onto a report format
pub fn parse_format(value: &str) -> Result<ReportFormat> {
    match ReportFormat::from_str(value) {
        Some(format) => Ok(format),
        None => bail!("Unsupported report format '{}'", value),
    }
}

/// Expand `~` and environment variables in an output path
pub fn resolve_output_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Could not expand output path '{}'", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Read a payload from a file path, or from stdin when `source` is `-`
pub fn read_payload(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read payload from stdin")?;
        return Ok(text);
    }

    let path = resolve_output_path(source)?;
    fs::read_to_string(&path)
        .with_context(|| format!("Failed to read payload file {}", path.display()))
}

/// Parse a payload into a dependency tree
pub fn parse_payload(text: &str) -> Result<DependencyResult> {
    parse(text).context("Payload is not a dependency result")
}

pub fn build_report(tree: &DependencyResult, format: ReportFormat) -> Result<String> {
    generate_report(tree, format).context("Failed to generate report")
}

/// Resolve the file a report is saved to; a directory gets a default file name
pub fn report_destination(output: &str, format: ReportFormat) -> Result<PathBuf> {
    let path = resolve_output_path(output)?;
    if path.is_dir() {
        Ok(path.join(format!("chainscope-report.{}", format.extension())))
    } else {
        Ok(path)
    }
}

/// Print the report, or save it to `output`.
///
/// Saved reports never carry terminal colour codes.
pub fn write_report(
    tree: &DependencyResult,
    format: ReportFormat,
    output: Option<&String>,
) -> Result<()> {
    match output {
        Some(output) => {
            let path = report_destination(output, format)?;
            colored::control::set_override(false);
            let report = build_report(tree, format)?;
            save_report(&report, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✓ Report saved to {}", path.display());
        }
        None => print!("{}", build_report(tree, format)?),
    }
    Ok(())
}

pub async fn handle_walk(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let url = sub_matches
        .get_one::<Url>("url")
        .context("--url is required")?;
    let depth = *sub_matches.get_one::<usize>("depth").unwrap_or(&1);
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&30);
    let caller_path = sub_matches.get_one::<String>("caller-path").cloned();
    let format = parse_format(
        sub_matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text"),
    )?;
    let output = sub_matches.get_one::<String>("output");

    if !quiet {
        println!("\n{} Walking {}", "→".blue().bold(), url.as_str().bright_white());
        println!("Depth: {}", depth);
        println!("Timeout: {}s\n", timeout_secs);
    }

    let options = WalkOptions {
        url: url.as_str().to_string(),
        depth,
        timeout_secs,
        caller_path,
        show_progress: !quiet,
    };

    let progress_callback: WalkProgressCallback = Arc::new(|msg: String| {
        debug!("{}", msg);
    });

    let tree = execute_walk(options, Some(progress_callback))
        .await
        .with_context(|| format!("Walk of {} failed", url))?;

    write_report(&tree, format, output)
}

pub fn handle_render(sub_matches: &ArgMatches) -> Result<()> {
    let source = sub_matches
        .get_one::<String>("FILE")
        .map(String::as_str)
        .unwrap_or("-");
    let format = parse_format(
        sub_matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("html"),
    )?;
    let output = sub_matches.get_one::<String>("output");

    let text = read_payload(source)?;
    let tree = parse_payload(&text)?;
    write_report(&tree, format, output)
}
