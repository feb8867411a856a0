//! Booklet pipeline
//!
//! This module sequences the booklet stages:
//! 1. Pad the document to whole signatures
//! 2. Reorder each signature into printing order
//! 3. Impose the reordered pages onto output sheets
//!
//! The in-memory pipeline passes [`PageSequence`] values between stages.
//! The file pipeline stages each intermediate document on disk, the same way
//! separate tools would hand files to one another.

mod io;

pub use io::{load_pdf, save_pdf};

use crate::document::PageSequence;
use crate::layout::{SheetLayout, pad, plan_sheets, reorder};
use crate::options::BookletConfig;
use crate::pages::{pad_document, read_pages, reorder_document};
use crate::render::render_sheets;
use crate::stats::calculate_statistics;
use crate::types::*;
use io::StagingArea;
use lopdf::Document;
use std::path::Path;

/// Pages in printing order together with their sheet layout
#[derive(Debug, Clone)]
pub struct BookletPlan<C> {
    /// Padded pages in physical order
    pub pages: PageSequence<C>,
    pub sheets: Vec<SheetLayout>,
    pub statistics: BookletStatistics,
}

/// Run padding, reordering and layout on a page sequence.
///
/// This is the whole booklet computation without any PDF backend.
pub fn plan_booklet<C>(doc: PageSequence<C>, config: &BookletConfig) -> Result<BookletPlan<C>> {
    config.validate()?;
    let statistics = calculate_statistics(doc.len(), config)?;

    let padded = pad(doc, config.signature_size)?;
    let pages = reorder(padded, config.signature_size)?;
    let sheets = plan_sheets(&pages, config)?;

    Ok(BookletPlan {
        pages,
        sheets,
        statistics,
    })
}

/// Lay out an already padded and reordered PDF onto booklet sheets
pub fn impose_document(source: &Document, config: &BookletConfig) -> Result<Document> {
    let pages = read_pages(source)?;
    let sheets = plan_sheets(&pages, config)?;
    render_sheets(source, &pages, &sheets, config)
}

/// Turn a document into printable booklet sheets
pub async fn make_booklet(source: Document, config: &BookletConfig) -> Result<Document> {
    config.validate()?;

    let config = config.clone();
    tokio::task::spawn_blocking(move || make_booklet_sync(&source, &config)).await?
}

fn make_booklet_sync(source: &Document, config: &BookletConfig) -> Result<Document> {
    let plan = plan_booklet(read_pages(source)?, config)?;
    let stats = &plan.statistics;
    log::info!(
        "Imposing {} pages ({} blank) as {} signatures on {} sheets",
        stats.source_pages,
        stats.blank_pages_added,
        stats.signatures,
        stats.output_sheets
    );
    render_sheets(source, &plan.pages, &plan.sheets, config)
}

/// Read a PDF, turn it into a booklet and write the result.
///
/// Intermediate documents are staged in a fresh directory under the system
/// temporary directory.
pub async fn make_booklet_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &BookletConfig,
) -> Result<BookletStatistics> {
    make_booklet_file_in(input, output, config, std::env::temp_dir()).await
}

/// Like [`make_booklet_file`], staging intermediates under `staging_root`.
///
/// The staging directory is removed on every exit path, including errors
/// from any stage.
pub async fn make_booklet_file_in(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &BookletConfig,
    staging_root: impl AsRef<Path>,
) -> Result<BookletStatistics> {
    config.validate()?;
    let signature_size = config.signature_size;

    let staging = StagingArea::new_in(staging_root)?;
    log::debug!("Staging intermediates in {}", staging.path().display());

    let source = load_pdf(input.as_ref()).await?;
    let statistics = calculate_statistics(source.get_pages().len(), config)?;
    log::info!(
        "Loaded {} pages from {}",
        statistics.source_pages,
        input.as_ref().display()
    );

    // Stage 1: pad
    let padded = tokio::task::spawn_blocking(move || pad_document(source, signature_size)).await??;
    let padded_path = staging.file("padded.pdf");
    save_pdf(padded, &padded_path).await?;
    log::info!("Padded with {} blank pages", statistics.blank_pages_added);

    // Stage 2: reorder
    let padded = load_pdf(&padded_path).await?;
    let reordered =
        tokio::task::spawn_blocking(move || reorder_document(padded, signature_size)).await??;
    let reordered_path = staging.file("reordered.pdf");
    save_pdf(reordered, &reordered_path).await?;
    log::info!("Reordered {} signatures", statistics.signatures);

    // Stage 3: impose
    let reordered = load_pdf(&reordered_path).await?;
    let impose_config = config.clone();
    let booklet =
        tokio::task::spawn_blocking(move || impose_document(&reordered, &impose_config)).await??;
    save_pdf(booklet, output.as_ref()).await?;
    log::info!(
        "Wrote {} sheets to {}",
        statistics.output_sheets,
        output.as_ref().display()
    );

    staging.close()?;
    Ok(statistics)
}
