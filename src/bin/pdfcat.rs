//! pdfcat CLI tool
//!
//! Concatenates PDF files into one document, in the order given.

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use log::LevelFilter;

use pdfcat::pdf::{merge_pdfs_with, MergeEvent, MergeOptions, MergeSummary};

const USAGE: &str = "Usage: pdfcat <output_path> <input1.pdf> [<input2.pdf> ... <inputN.pdf>]";

/// Bad input: too few arguments, or a listed input file does not exist
const EXIT_INPUT: i32 = 1;
/// A PDF could not be read or the output could not be written
const EXIT_FAILURE: i32 = 2;

/// pdfcat - Concatenate PDF files, preserving input order
#[derive(Parser)]
#[command(name = "pdfcat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge three chapters into one book
    pdfcat book.pdf ch1.pdf ch2.pdf ch3.pdf

    # Show what is being appended and renumbered
    pdfcat -vv handout.pdf intro.pdf exercises.pdf")]
struct Cli {
    /// Output PDF file path (overwritten if it exists)
    #[arg(allow_hyphen_values = true)]
    output: PathBuf,

    /// Input PDF files, merged in the order given
    #[arg(required = true, allow_hyphen_values = true, trailing_var_arg = true)]
    inputs: Vec<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            ErrorKind::MissingRequiredArgument => usage_exit(),
            _ => {
                eprint!("{}", e);
                usage_exit()
            }
        },
    };

    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<pdfcat::Error>() {
            Some(e) if e.is_missing_input() => {
                println!("{}", e);
                process::exit(EXIT_INPUT);
            }
            _ => {
                eprintln!("Error: {:#}", err);
                process::exit(EXIT_FAILURE);
            }
        }
    }
}

fn usage_exit() -> ! {
    println!("{}", USAGE);
    process::exit(EXIT_INPUT)
}

/// Route `log` output to stderr; `RUST_LOG` overrides the -v level
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Merge the inputs into the output, printing progress to stdout
fn run(cli: Cli) -> anyhow::Result<MergeSummary> {
    let options = MergeOptions {
        input_paths: cli.inputs,
        output_path: cli.output,
    };

    merge_pdfs_with(&options, report_progress)
        .with_context(|| format!("Failed to merge into {}", options.output_path.display()))
}

fn report_progress(event: MergeEvent<'_>) {
    match event {
        MergeEvent::Adding(path) => println!("Adding: {}", path.display()),
        MergeEvent::Saving(path) => println!("Saving merged PDF to: {}", path.display()),
        MergeEvent::Saved(summary) => {
            println!(
                "Merge completed successfully! ({} pages from {} files)",
                summary.pages, summary.documents
            );
            let absolute = fs::canonicalize(&summary.output_path)
                .unwrap_or_else(|_| summary.output_path.clone());
            println!("Final file: {}", absolute.display());
        }
    }
}
