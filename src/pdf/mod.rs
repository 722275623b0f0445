//! PDF manipulation module

pub mod merge;
pub mod metadata;

// Re-export commonly used items
pub use merge::{
    merge_pdfs, merge_pdfs_with, validate_inputs, MergeEvent, MergeOptions, MergeSummary, Merger,
};
pub use metadata::{count_pages, page_contents};
