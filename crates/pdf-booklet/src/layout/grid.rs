//! Sheet grid layout
//!
//! Groups the physically ordered pages into output sheets and decides where
//! each page lands. Rectangles here use sheet coordinates with the origin at
//! the top-left corner and y growing downwards; the renderer flips them into
//! PDF user space.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::document::PageSequence;
use crate::options::{BookletConfig, GridSpec};
use crate::types::{MediaBox, Result, Rotation};

use super::fit_page;

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// The same area in PDF user space (origin bottom-left) on a sheet of
    /// the given height. The returned `y` is the bottom edge.
    pub fn to_pdf_space(&self, sheet_height: f32) -> Rect {
        Rect::new(self.x, sheet_height - self.bottom(), self.width, self.height)
    }
}

/// Placement of one source page on a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct CellPlacement {
    /// Cell index within the sheet, row-major
    pub index: usize,
    pub row: usize,
    pub col: usize,
    /// Full cell area
    pub rect: Rect,
    /// Rotation of the column the cell sits in
    pub rotation: Rotation,
    /// Rotation applied to the page content: the page's own display
    /// rotation followed by the column rotation
    pub content_rotation: Rotation,
    /// Index into the physically ordered page sequence
    pub source: usize,
    /// Area covered by the scaled page, centred in `rect`
    pub content: Rect,
    pub scale: f32,
    /// MediaBox used for fitting
    pub media_box: MediaBox,
}

/// One output sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// 1-based sheet number
    pub number: usize,
    /// Total number of sheets in the booklet
    pub total: usize,
    pub width: f32,
    pub height: f32,
    pub cells: Vec<CellPlacement>,
}

impl SheetLayout {
    /// Collation annotation, e.g. `"2/5"`
    pub fn annotation(&self) -> String {
        format!("{}/{}", self.number, self.total)
    }
}

/// Number of sheets needed for `page_count` pages
pub fn total_sheets(page_count: usize, cells_per_sheet: usize) -> usize {
    if cells_per_sheet == 0 {
        return 0;
    }
    page_count.div_ceil(cells_per_sheet)
}

/// Rectangle of cell `index` on a sheet of the given size
pub fn cell_rect(index: usize, grid: GridSpec, sheet_width: f32, sheet_height: f32) -> Rect {
    let cell_width = sheet_width / grid.cols as f32;
    let cell_height = sheet_height / grid.rows as f32;
    let row = index / grid.cols;
    let col = index % grid.cols;
    Rect::new(
        col as f32 * cell_width,
        row as f32 * cell_height,
        cell_width,
        cell_height,
    )
}

/// Lay out the pages of `doc`, in order, onto sheets.
///
/// `doc` is expected to be padded and reordered already. Cells of the final
/// sheet that would point past the end of `doc` are left out.
pub fn plan_sheets<C>(doc: &PageSequence<C>, config: &BookletConfig) -> Result<Vec<SheetLayout>> {
    config.validate()?;
    let grid = config.grid;
    let cells_per_sheet = grid.cells_per_sheet();

    let (sheet_width, sheet_height) = config.sheet_dimensions_pt();
    let page_count = doc.len();
    let total = total_sheets(page_count, cells_per_sheet);
    let mut sheets = Vec::with_capacity(total);

    for sheet_idx in 0..total {
        let first = sheet_idx * cells_per_sheet;
        let mut cells = Vec::with_capacity(cells_per_sheet);

        for index in 0..cells_per_sheet {
            let source = first + index;
            let Some(page) = doc.get(source) else {
                log::warn!(
                    "Sheet {}: cell {} has no page ({} pages), leaving it empty",
                    sheet_idx + 1,
                    index,
                    page_count
                );
                continue;
            };

            let media_box = page.media_box().unwrap_or_else(|| {
                log::warn!(
                    "Page {} has no usable MediaBox, assuming {} x {} pt",
                    source,
                    DEFAULT_PAGE_DIMENSIONS.0,
                    DEFAULT_PAGE_DIMENSIONS.1
                );
                MediaBox::new(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
            });

            let rect = cell_rect(index, grid, sheet_width, sheet_height);
            let col = index % grid.cols;
            let rotation = config.rotation_for_column(col);
            let content_rotation = page.rotation().then(rotation);
            let (content, scale) = fit_page(&rect, media_box, content_rotation);

            cells.push(CellPlacement {
                index,
                row: index / grid.cols,
                col,
                rect,
                rotation,
                content_rotation,
                source,
                content,
                scale,
                media_box,
            });
        }

        sheets.push(SheetLayout {
            number: sheet_idx + 1,
            total,
            width: sheet_width,
            height: sheet_height,
            cells,
        });
    }

    Ok(sheets)
}
