//! PDF rendering modules for imposition
//!
//! This module handles all PDF output work:
//! - Creating XObjects from source pages
//! - Building the output sheets (placement, borders, sheet numbers)
//! - Deep copying PDF objects between documents

mod sheet;
mod xobject;

pub use sheet::BookletRenderer;
pub use xobject::{copy_object_deep, create_page_xobject, media_box_array};

use crate::document::PageSequence;
use crate::layout::SheetLayout;
use crate::options::BookletConfig;
use crate::types::Result;
use lopdf::{Document, ObjectId};

/// Render planned sheets into a new document.
///
/// `pages` must be the sequence the sheets were planned from, with content
/// handles pointing into `source`.
pub fn render_sheets(
    source: &Document,
    pages: &PageSequence<ObjectId>,
    sheets: &[SheetLayout],
    config: &BookletConfig,
) -> Result<Document> {
    let mut renderer = BookletRenderer::new(source, config);
    for sheet in sheets {
        renderer.render_sheet(sheet, pages)?;
    }
    Ok(renderer.finish())
}
