//! Config Type Checker CLI
//!
//! Checks the values in one config file against the constraint expressions
//! declared for each key in another.

use std::path::PathBuf;

use clap::Parser;
use conftype::{
    ConstraintSet, ConstraintSource, Outcome, Report, ReportFormat, Settings, ValueSource,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conftype")]
#[command(about = "Check config values against declared type constraints")]
struct Cli {
    /// Config file holding the values to check
    values: PathBuf,

    /// Config file declaring a constraint expression per key
    constraints: PathBuf,

    /// Output format (overrides settings)
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Ignore tokens left after a complete constraint expression
    #[arg(long)]
    allow_trailing_tokens: bool,

    /// Settings file
    #[arg(short, long)]
    settings: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the run should count as a success
fn run(cli: Cli) -> conftype::Result<bool> {
    let mut settings = Settings::load_from(cli.settings.as_deref())?;
    if let Some(format) = cli.format {
        settings.report.format = format;
    }
    if cli.allow_trailing_tokens {
        settings.parser.allow_trailing_tokens = true;
    }

    let values = ValueSource::from_file(&cli.values)?;
    let constraints = ConstraintSource::from_file(&cli.constraints)?;

    let set = ConstraintSet::compile(&constraints, settings.parse_options());
    let report = set.check(&values);

    if settings.report.warn_undeclared {
        for key in set.undeclared_keys(&values) {
            eprintln!("⚠️  {}: no constraint declared", key);
        }
    }

    let rendered = match settings.report.format {
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
        ReportFormat::Text => render_text(&report),
    };

    if let Some(path) = cli.output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &rendered)?;
        println!("✅ Report written to {:?}", path);
    } else {
        println!("{}", rendered);
    }

    Ok(report.is_clean() || !settings.report.fail_on_invalid)
}

fn render_text(report: &Report) -> String {
    let mut lines = Vec::with_capacity(report.entries.len() + 2);

    for entry in &report.entries {
        let line = match &entry.outcome {
            Outcome::Valid { value: Value::Null } => format!("✅ {}: (absent)", entry.key),
            Outcome::Valid { value } => format!("✅ {}: {}", entry.key, value),
            Outcome::Invalid { reason } => {
                format!("❌ {}: {}\n   └─ expected {}", entry.key, reason, entry.constraint)
            }
            Outcome::Malformed { error } => {
                format!(
                    "⚠️  {}: malformed constraint `{}`\n   └─ {}",
                    entry.key, entry.constraint, error
                )
            }
        };
        lines.push(line);
    }

    lines.push(String::new());
    lines.push(format!(
        "{} valid, {} invalid, {} malformed",
        report.valid_count(),
        report.invalid_count(),
        report.malformed_count()
    ));
    lines.join("\n")
}
