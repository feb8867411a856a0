use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape of the cell grid on each output sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSpec {
    pub cols: usize,
    pub rows: usize,
}

impl GridSpec {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Number of source pages laid onto one sheet
    pub fn cells_per_sheet(self) -> usize {
        self.cols.saturating_mul(self.rows)
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS)
    }
}

/// Booklet configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BookletConfig {
    // Folding
    pub signature_size: usize,

    // Output sheet
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub grid: GridSpec,

    /// Rotation of the cells in each column; wider grids cycle through the list
    pub column_rotations: Vec<Rotation>,

    // Decoration
    pub draw_borders: bool,
    pub border_width_pt: f32,
    pub annotate_sheets: bool,
    pub annotation_font_size: f32,
}

impl Default for BookletConfig {
    fn default() -> Self {
        Self {
            signature_size: DEFAULT_SIGNATURE_SIZE,
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            grid: GridSpec::default(),
            column_rotations: vec![Rotation::Clockwise270, Rotation::Clockwise90],
            draw_borders: true,
            border_width_pt: BORDER_LINE_WIDTH,
            annotate_sheets: true,
            annotation_font_size: ANNOTATION_FONT_SIZE,
        }
    }
}

impl BookletConfig {
    /// Load configuration from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| BookletError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BookletError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Source pages laid onto one output sheet
    pub fn cells_per_sheet(&self) -> usize {
        self.grid.cells_per_sheet()
    }

    /// Output sheet dimensions in points
    pub fn sheet_dimensions_pt(&self) -> (f32, f32) {
        self.paper_size.dimensions_pt(self.orientation)
    }

    /// Rotation for cells in the given column
    pub fn rotation_for_column(&self, col: usize) -> Rotation {
        if self.column_rotations.is_empty() {
            return Rotation::None;
        }
        self.column_rotations[col % self.column_rotations.len()]
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.signature_size == 0
            || self.signature_size % 4 != 0
            || self.signature_size > MAX_SIGNATURE_SIZE
        {
            return Err(BookletError::Config(format!(
                "Signature size must be a positive multiple of 4 up to {}, got {}",
                MAX_SIGNATURE_SIZE, self.signature_size
            )));
        }

        if self.grid.cols == 0 || self.grid.rows == 0 {
            return Err(BookletError::Config(format!(
                "Grid must have at least one column and one row, got {}x{}",
                self.grid.cols, self.grid.rows
            )));
        }

        match self.grid.cols.checked_mul(self.grid.rows) {
            Some(cells) if cells <= MAX_CELLS_PER_SHEET => {}
            _ => {
                return Err(BookletError::Config(format!(
                    "Grid {}x{} exceeds {} cells per sheet",
                    self.grid.cols, self.grid.rows, MAX_CELLS_PER_SHEET
                )));
            }
        }

        if self.column_rotations.is_empty() {
            return Err(BookletError::Config(
                "At least one column rotation is required".to_string(),
            ));
        }

        let (width_mm, height_mm) = self.paper_size.dimensions_mm();
        if !(width_mm > 0.0 && height_mm > 0.0) {
            return Err(BookletError::Config(format!(
                "Paper size must be positive, got {} x {} mm",
                width_mm, height_mm
            )));
        }

        if !(self.border_width_pt >= 0.0) {
            return Err(BookletError::Config(
                "Border width cannot be negative".to_string(),
            ));
        }

        if !(self.annotation_font_size > 0.0) {
            return Err(BookletError::Config(
                "Annotation font size must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
