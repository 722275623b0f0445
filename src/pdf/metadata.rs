//! Read-only page inspection

use std::path::Path;
use lopdf::Document;
use crate::error::{Error, Result};

fn load_existing(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    Document::load(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Count the number of pages in a PDF file
///
/// Walks the page tree rather than trusting the root `Count` entry, which some
/// producers get wrong.
pub fn count_pages(path: &Path) -> Result<usize> {
    let doc = load_existing(path)?;
    Ok(doc.get_pages().len())
}

/// Decoded content stream bytes of every page, in page order
pub fn page_contents(path: &Path) -> Result<Vec<Vec<u8>>> {
    let doc = load_existing(path)?;

    doc.get_pages()
        .into_values()
        .map(|page_id| doc.get_page_content(page_id).map_err(Error::from))
        .collect()
}
