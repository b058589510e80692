use anyhow::{Context, Result};
use bwpairs::{
    batch,
    cli::{Cli, OutputFormat},
    config::BatchConfig,
    csv_output::CsvReportOutput,
    json_output::JsonOutput,
    report::MergedReport,
    text_output,
};
use clap::Parser;
use std::fs;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings by default, everything with --debug
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve configuration from the optional file and command-line flags
fn load_config(args: &Cli) -> Result<BatchConfig> {
    let base = match &args.config {
        Some(path) => BatchConfig::from_toml(path)?,
        None => BatchConfig::default(),
    };
    Ok(args.apply_to(base))
}

fn render(
    format: OutputFormat,
    report: &MergedReport,
    diagnostics: &[batch::Diagnostic],
    config: &BatchConfig,
) -> Result<String> {
    match format {
        OutputFormat::Csv => {
            CsvReportOutput::new(&config.unit_suffix, &config.na_marker).to_csv(report)
        }
        OutputFormat::Json => {
            let mut output = JsonOutput::new(&config.unit_suffix);
            output.set_report(report);
            for diagnostic in diagnostics {
                output.add_diagnostic(diagnostic);
            }
            output.to_json()
        }
        OutputFormat::Text => Ok(text_output::render_text(
            report,
            &config.unit_suffix,
            &config.na_marker,
        )),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    // Identities are a precondition of the whole batch
    let identity = config.validate()?;

    tracing::info!(
        vxm_ip = %identity.vxm_ip,
        vc_ip = %identity.vc_ip,
        files = args.files.len(),
        "processing batch"
    );

    let outcome = batch::run_batch(&args.files, &identity, config.jobs);
    let report = MergedReport::merge(&outcome.results, &identity);

    // Diagnostics are the user-facing copy; the library only logs them at debug
    for diagnostic in &outcome.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    if report.is_empty() {
        tracing::warn!("no input file produced a report row");
    }

    let rendered = render(args.format, &report, &outcome.diagnostics, &config)?;

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write report: {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write report to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
