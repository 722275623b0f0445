//! PDF merging functionality using lopdf

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info, trace};
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};

/// Page dictionary keys a page may take from its ancestors in the page tree
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files
const MAX_PAGE_TREE_DEPTH: usize = 64;

const DEFAULT_PDF_VERSION: &str = "1.5";

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// Outcome of a successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Number of input documents appended
    pub documents: usize,
    /// Total number of pages in the output
    pub pages: usize,
    /// Where the merged document was written
    pub output_path: PathBuf,
}

/// Progress notifications emitted by [`merge_pdfs_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeEvent<'a> {
    /// An input is about to be opened and appended
    Adding(&'a Path),
    /// All inputs are appended; the output is about to be written
    Saving(&'a Path),
    /// The output was written
    Saved(&'a MergeSummary),
}

/// Accumulates the pages of several documents, in append order.
///
/// Each appended document is renumbered above everything already held, so
/// object ids never collide. The accumulator is consumed by [`Merger::write`]
/// (or [`Merger::into_document`]), which releases it whatever the outcome.
#[derive(Debug)]
pub struct Merger {
    objects: BTreeMap<ObjectId, Object>,
    page_ids: Vec<ObjectId>,
    max_id: u32,
    documents: usize,
    version: String,
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

impl Merger {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            page_ids: Vec::new(),
            max_id: 0,
            documents: 0,
            version: DEFAULT_PDF_VERSION.to_string(),
        }
    }

    /// Number of pages appended so far
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Number of documents appended so far
    pub fn document_count(&self) -> usize {
        self.documents
    }

    /// Load the PDF at `path` and append its full page sequence.
    ///
    /// Returns the number of pages appended.
    pub fn append(&mut self, path: &Path) -> Result<usize> {
        debug!("Loading {}", path.display());
        let doc = Document::load(path).map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source,
        })?;
        self.absorb(doc, path)
    }

    fn absorb(&mut self, mut doc: Document, origin: &Path) -> Result<usize> {
        if doc.get_pages().is_empty() {
            return Err(Error::EmptyPdf(origin.to_path_buf()));
        }

        // Pages are re-parented under a single flat node later, so anything
        // they inherit has to live on the page itself first.
        flatten_inherited_attributes(&mut doc)?;

        let first_id = self.max_id + 1;
        doc.renumber_objects_with(first_id);
        self.max_id = doc.max_id;
        trace!(
            "Renumbered {} into object ids {}..={}",
            origin.display(),
            first_id,
            self.max_id
        );

        // Collect page IDs after renumbering, in page-tree order
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let appended = pages.len();
        self.page_ids.extend(pages);
        self.objects.extend(doc.objects);

        if doc.version > self.version {
            self.version = doc.version;
        }
        self.documents += 1;

        info!("Appended {} page(s) from {}", appended, origin.display());
        Ok(appended)
    }

    /// Build the merged document: one catalog, one flat page tree.
    pub fn into_document(self) -> Document {
        let page_count = self.page_ids.len();
        let mut merged_doc = Document::with_version(self.version);

        // Add all collected objects FIRST, then bump max_id so new ids
        // land above them
        merged_doc.objects = self.objects;
        merged_doc.max_id = self.max_id;

        let pages_id = merged_doc.new_object_id();
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let mut pages_object = Dictionary::new();
        pages_object.set("Type", Object::Name(b"Pages".to_vec()));
        pages_object.set("Count", Object::Integer(page_count as i64));
        pages_object.set("Kids", Object::Array(kids));

        let catalog_id = merged_doc.new_object_id();
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));

        merged_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        merged_doc.objects.insert(pages_id, Object::Dictionary(pages_object));
        merged_doc.trailer.set("Root", Object::Reference(catalog_id));

        for &page_id in &self.page_ids {
            if let Ok(Object::Dictionary(dict)) = merged_doc.get_object_mut(page_id) {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        // Old catalogs, page-tree nodes, outlines and info dictionaries are
        // no longer reachable from the new root
        let pruned = merged_doc.prune_objects();
        debug!("Pruned {} unreachable object(s)", pruned.len());

        merged_doc
    }

    /// Write the merged document to `path`, consuming the accumulator.
    ///
    /// The document is serialized in memory first, so a failure never leaves
    /// a partially written file behind. Returns the number of pages written.
    pub fn write(self, path: &Path) -> Result<usize> {
        let page_count = self.page_count();
        let mut merged_doc = self.into_document();

        merged_doc.compress();
        let mut buffer = Vec::new();
        merged_doc.save_to(&mut buffer)?;

        fs::write(path, &buffer).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            "Wrote {} page(s), {} bytes to {}",
            page_count,
            buffer.len(),
            path.display()
        );
        Ok(page_count)
    }
}

/// Check that every input exists, stopping at the first one that does not.
pub fn validate_inputs(paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        return Err(Error::NoInputs);
    }

    for path in paths {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }
    }

    Ok(())
}

/// Merge multiple PDF files into a single PDF
///
/// # Example
///
/// ```no_run
/// use pdfcat::pdf::{MergeOptions, merge_pdfs};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![
///         PathBuf::from("1. first.pdf"),
///         PathBuf::from("2. second.pdf"),
///     ],
///     output_path: PathBuf::from("merged.pdf"),
/// };
///
/// merge_pdfs(&options).expect("Failed to merge");
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<MergeSummary> {
    merge_pdfs_with(options, |_| {})
}

/// Merge multiple PDF files, reporting progress through `on_event`.
///
/// Inputs are validated before any of them is opened; on the first missing
/// file nothing is read and the output path is left untouched.
pub fn merge_pdfs_with<F>(options: &MergeOptions, mut on_event: F) -> Result<MergeSummary>
where
    F: FnMut(MergeEvent<'_>),
{
    validate_inputs(&options.input_paths)?;

    let mut merger = Merger::new();
    for path in &options.input_paths {
        on_event(MergeEvent::Adding(path));
        merger.append(path)?;
    }

    let documents = merger.document_count();
    on_event(MergeEvent::Saving(&options.output_path));
    let pages = merger.write(&options.output_path)?;

    let summary = MergeSummary {
        documents,
        pages,
        output_path: options.output_path.clone(),
    };
    on_event(MergeEvent::Saved(&summary));

    Ok(summary)
}

/// Copy inheritable attributes from ancestor page-tree nodes onto each page
fn flatten_inherited_attributes(doc: &mut Document) -> Result<()> {
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    for page_id in page_ids {
        let inherited = collect_inherited(doc, page_id)?;
        if inherited.is_empty() {
            continue;
        }

        if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
            for (key, value) in inherited {
                page.set(key, value);
            }
        }
    }

    Ok(())
}

fn collect_inherited(doc: &Document, page_id: ObjectId) -> Result<Vec<(Vec<u8>, Object)>> {
    let page = doc.get_dictionary(page_id)?;
    let mut missing: Vec<&[u8]> = INHERITABLE_PAGE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();

    let mut found = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if missing.is_empty() || depth >= MAX_PAGE_TREE_DEPTH {
            break;
        }

        let node = doc.get_dictionary(parent_id)?;
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Ok(found)
}
