//! Anntier: time-anchored annotation tiers with interval-algebra querying.
//!
//! Anntier models the kind of multi-level annotated speech data produced by
//! phonetic alignment and transcription tools: tiers of annotations anchored
//! on a shared timeline, with every time value carrying a vagueness radius so
//! that comparisons tolerate measurement imprecision. Tiers can be linked
//! into hierarchies that keep their boundaries consistent, and queried with
//! content predicates and Allen interval relations.
//!
//! # Modules
//!
//! - [`model`]: Core types (TimePoint, TimeInterval, Annotation, Tier,
//!   Transcription) and the canonical JSON form
//! - [`filter`]: Content predicates and Allen-relation queries over tiers
//! - [`validation`]: Transcription validation and error reporting
//! - [`error`]: Error types for anntier operations

pub mod error;
pub mod filter;
pub mod model;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::AnnTierError;

/// The anntier CLI application.
#[derive(Parser)]
#[command(name = "anntier")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a transcription for errors and warnings.
    Validate(ValidateArgs),

    /// Summarize the tiers and hierarchy of a transcription.
    Inspect(InspectArgs),
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Input transcription JSON file to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Input transcription JSON file to inspect.
    input: PathBuf,
}

/// Run the anntier CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), AnnTierError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("anntier {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Time-anchored annotation tiers with interval-algebra querying.");
            println!();
            println!("Run 'anntier --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), AnnTierError> {
    let transcription = model::io_json::read_json(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_transcription(&transcription, &opts);

    match args.output.as_str() {
        "json" => {
            // Simple JSON output for programmatic use
            println!("{{");
            println!("  \"error_count\": {},", report.error_count());
            println!("  \"warning_count\": {},", report.warning_count());
            println!("  \"issues\": [");
            for (i, issue) in report.issues.iter().enumerate() {
                let comma = if i < report.issues.len() - 1 { "," } else { "" };
                println!("    {{");
                println!("      \"severity\": \"{:?}\",", issue.severity);
                println!("      \"code\": \"{:?}\",", issue.code);
                println!(
                    "      \"message\": \"{}\",",
                    issue.message.replace('"', "\\\"")
                );
                println!("      \"context\": \"{}\"", issue.context);
                println!("    }}{}", comma);
            }
            println!("  ]");
            println!("}}");
        }
        "text" => {
            print!("{}", report);
        }
        other => {
            return Err(AnnTierError::UnsupportedOutput(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(AnnTierError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), AnnTierError> {
    let transcription = model::io_json::read_json(&args.input)?;

    println!("Transcription '{}'", transcription.name());
    println!(
        "  {} tier(s), {} hierarchy link(s)",
        transcription.len(),
        transcription.hierarchy().len()
    );
    println!();

    for (id, tier) in transcription.tiers() {
        if tier.is_empty() {
            println!("  [{}] '{}': empty", id, tier.name());
        } else {
            println!(
                "  [{}] '{}': {} annotation(s) over [{:.3}, {:.3}]",
                id,
                tier.name(),
                tier.len(),
                tier.begin(),
                tier.end()
            );
        }
    }

    if !transcription.hierarchy().is_empty() {
        println!();
        for link in transcription.hierarchy().iter() {
            println!(
                "  link {} -> {} ({})",
                link.reference, link.child, link.kind
            );
        }
    }

    Ok(())
}
