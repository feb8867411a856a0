//! Shared constants for booklet imposition
//!
//! This module centralizes magic numbers used by the layout and rendering
//! code. The user-facing defaults live in [`crate::BookletConfig`].

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Booklet Defaults
// =============================================================================

/// Pages in one folded signature
pub const DEFAULT_SIGNATURE_SIZE: usize = 8;

/// Grid columns on an output sheet
pub const DEFAULT_GRID_COLS: usize = 2;

/// Grid rows on an output sheet
pub const DEFAULT_GRID_ROWS: usize = 4;

/// Largest accepted signature size
pub const MAX_SIGNATURE_SIZE: usize = 1024;

/// Largest accepted number of cells on one sheet
pub const MAX_CELLS_PER_SHEET: usize = 256;

/// Fallback page size for pages without a usable MediaBox (US Letter)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (612.0, 792.0);

// =============================================================================
// Sheet Decoration
// =============================================================================

/// Line width of the cell border (points)
pub const BORDER_LINE_WIDTH: f32 = 0.5;

/// Font size of the sheet number annotation (points)
pub const ANNOTATION_FONT_SIZE: f32 = 5.0;

/// Gray level of the sheet number annotation (0 = black)
pub const ANNOTATION_GRAY: f32 = 0.3;

/// Distance of the annotation baseline from the right sheet edge (points)
pub const ANNOTATION_RIGHT_INSET: f32 = 3.0;

/// Distance of the annotation start from the top sheet edge (points)
pub const ANNOTATION_TOP_INSET: f32 = 20.0;

/// Resource name of the annotation font
pub const ANNOTATION_FONT_NAME: &str = "F1";
