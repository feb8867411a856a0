use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookletError {
    /// The document cannot be parsed, or a required page property is missing
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
    /// A stage received input that an earlier stage should have ruled out
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<lopdf::Error> for BookletError {
    fn from(err: lopdf::Error) -> Self {
        BookletError::MalformedDocument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BookletError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Dimensions in points with orientation applied.
    ///
    /// A4 is pinned to the exact PostScript size (595 × 842) so that cell
    /// geometry matches what print drivers expect.
    pub fn dimensions_pt(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = match self {
            PaperSize::A4 => (595.0, 842.0),
            PaperSize::Letter => (612.0, 792.0),
            other => {
                let (w_mm, h_mm) = other.dimensions_mm();
                (
                    crate::constants::mm_to_pt(w_mm),
                    crate::constants::mm_to_pt(h_mm),
                )
            }
        };
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Clockwise rotation applied to a page inside its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Parse a clockwise angle. Only right angles are accepted.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::None),
            90 => Some(Rotation::Clockwise90),
            180 => Some(Rotation::Clockwise180),
            270 => Some(Rotation::Clockwise270),
            _ => None,
        }
    }

    /// Whether the rotation swaps the width and height of the page
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }

    /// This rotation followed by `next`
    pub fn then(self, next: Rotation) -> Rotation {
        match (self.quarter_turns() + next.quarter_turns()) % 4 {
            0 => Rotation::None,
            1 => Rotation::Clockwise90,
            2 => Rotation::Clockwise180,
            _ => Rotation::Clockwise270,
        }
    }

    fn quarter_turns(self) -> u8 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 1,
            Rotation::Clockwise180 => 2,
            Rotation::Clockwise270 => 3,
        }
    }
}

/// Physical page box in points, as found in a PDF `/MediaBox`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    x0: f32,
    y0: f32,
    width: f32,
    height: f32,
}

impl MediaBox {
    /// Box anchored at the origin
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_origin(0.0, 0.0, width, height)
    }

    pub fn with_origin(x0: f32, y0: f32, width: f32, height: f32) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    /// Build from the four corner values of a `/MediaBox` array.
    ///
    /// Corners may be given in any order; degenerate boxes yield `None`.
    pub fn from_corners(llx: f32, lly: f32, urx: f32, ury: f32) -> Option<Self> {
        let (x0, x1) = (llx.min(urx), llx.max(urx));
        let (y0, y1) = (lly.min(ury), lly.max(ury));
        let (width, height) = (x1 - x0, y1 - y0);
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            Some(Self::with_origin(x0, y0, width, height))
        } else {
            None
        }
    }

    pub fn x0(&self) -> f32 {
        self.x0
    }

    pub fn y0(&self) -> f32 {
        self.y0
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

/// Statistics about a booklet run
#[derive(Debug, Clone, PartialEq)]
pub struct BookletStatistics {
    /// Pages in the input document
    pub source_pages: usize,
    /// Blank pages appended by padding
    pub blank_pages_added: usize,
    /// Page count after padding
    pub padded_pages: usize,
    /// Number of folded signatures
    pub signatures: usize,
    /// Source pages laid onto each output sheet
    pub cells_per_sheet: usize,
    /// Output sheets (pages of the booklet PDF)
    pub output_sheets: usize,
}
