//! pdfcat library
//!
//! Concatenates PDF files into a single document, preserving input order.
//! This library provides functionality to:
//! - Validate an ordered list of input files (fail-fast on the first missing one)
//! - Append the full page sequence of each input to a merge accumulator
//! - Write the combined document in one step
//! - Inspect page counts and page content of the result
//!
//! # Example
//!
//! ```no_run
//! use pdfcat::pdf::{MergeOptions, merge_pdfs};
//! use std::path::PathBuf;
//!
//! let options = MergeOptions {
//!     input_paths: vec![
//!         PathBuf::from("1. intro.pdf"),
//!         PathBuf::from("2. advanced.pdf"),
//!     ],
//!     output_path: PathBuf::from("merged.pdf"),
//! };
//!
//! let summary = merge_pdfs(&options).expect("Failed to merge PDFs");
//! println!("{} pages", summary.pages);
//! ```

pub mod error;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
