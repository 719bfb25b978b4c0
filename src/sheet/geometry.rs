use thiserror::Error;

/// Reasons a sprite sheet description is unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("sprite sheet needs at least one column")]
    NoColumns,
    #[error("sprite sheet needs at least one row")]
    NoRows,
    #[error("sprite sheet needs at least one frame")]
    NoFrames,
    #[error("frame size must be positive, got {width}x{height}")]
    FrameSize { width: u32, height: u32 },
}

/// A strip sheet with a known frame size: frames run left to right, one
/// animation per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSheet {
    frame_width: u32,
    frame_height: u32,
    frame_count: usize,
}

impl PixelSheet {
    pub fn new(frame_width: u32, frame_height: u32, frame_count: usize) -> Result<Self, SheetError> {
        if frame_width == 0 || frame_height == 0 {
            return Err(SheetError::FrameSize {
                width: frame_width,
                height: frame_height,
            });
        }
        if frame_count == 0 {
            return Err(SheetError::NoFrames);
        }
        Ok(Self {
            frame_width,
            frame_height,
            frame_count,
        })
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

/// A grid sheet of unknown pixel size, described only by its column and row
/// counts. Each column is one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSheet {
    columns: usize,
    rows: usize,
}

impl GridSheet {
    pub fn new(columns: usize, rows: usize) -> Result<Self, SheetError> {
        if columns == 0 {
            return Err(SheetError::NoColumns);
        }
        if rows == 0 {
            return Err(SheetError::NoRows);
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// Sheet layout, selected by which dimensions are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetGeometry {
    Pixel(PixelSheet),
    Grid(GridSheet),
}

impl SheetGeometry {
    /// Number of frames in one animation row.
    pub fn frame_count(&self) -> usize {
        match self {
            SheetGeometry::Pixel(sheet) => sheet.frame_count(),
            SheetGeometry::Grid(sheet) => sheet.columns(),
        }
    }

    pub fn mode_label(&self) -> &'static str {
        match self {
            SheetGeometry::Pixel(_) => "pixel",
            SheetGeometry::Grid(_) => "grid",
        }
    }
}

impl From<PixelSheet> for SheetGeometry {
    fn from(sheet: PixelSheet) -> Self {
        SheetGeometry::Pixel(sheet)
    }
}

impl From<GridSheet> for SheetGeometry {
    fn from(sheet: GridSheet) -> Self {
        SheetGeometry::Grid(sheet)
    }
}
