use crate::layout::{padding_needed, total_sheets};
use crate::options::BookletConfig;
use crate::types::*;

/// Calculate statistics for a booklet made from `source_pages` pages
pub fn calculate_statistics(
    source_pages: usize,
    config: &BookletConfig,
) -> Result<BookletStatistics> {
    config.validate()?;

    let signature_size = config.signature_size;
    let blank_pages_added = padding_needed(source_pages, signature_size);
    let padded_pages = source_pages + blank_pages_added;
    let cells_per_sheet = config.cells_per_sheet();

    Ok(BookletStatistics {
        source_pages,
        blank_pages_added,
        padded_pages,
        signatures: padded_pages / signature_size,
        cells_per_sheet,
        output_sheets: total_sheets(padded_pages, cells_per_sheet),
    })
}
