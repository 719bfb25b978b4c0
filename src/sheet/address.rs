use super::geometry::{GridSheet, PixelSheet, SheetGeometry};

/// Background offset of a frame on a frame-sized viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelOffset {
    pub x: i64,
    pub y: i64,
}

/// Background size and position of a frame, as percentages of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    pub size_x: f64,
    pub size_y: f64,
    pub pos_x: f64,
    pub pos_y: f64,
}

/// Where a given frame lives on its sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameAddress {
    Pixel(PixelOffset),
    Grid(GridPosition),
}

impl PixelSheet {
    /// Offset of `(frame, row)`.
    ///
    /// The frame is clamped to the last one. The row is not: a strip sheet
    /// doesn't know its row count, so an oversized row saturates instead.
    pub fn offset(&self, frame: usize, row: usize) -> PixelOffset {
        let frame = frame.min(self.frame_count() - 1);
        PixelOffset {
            x: pixel_span(frame, self.frame_width()),
            y: pixel_span(row, self.frame_height()),
        }
    }
}

impl GridSheet {
    /// Percentage position of `(frame, row)`, clamped into the grid.
    ///
    /// A single column or row always sits at 0%.
    pub fn position(&self, frame: usize, row: usize) -> GridPosition {
        GridPosition {
            size_x: self.columns() as f64 * 100.0,
            size_y: self.rows() as f64 * 100.0,
            pos_x: fraction(frame, self.columns()) * 100.0,
            pos_y: fraction(row, self.rows()) * 100.0,
        }
    }
}

impl SheetGeometry {
    pub fn address(&self, frame: usize, row: usize) -> FrameAddress {
        match self {
            SheetGeometry::Pixel(sheet) => FrameAddress::Pixel(sheet.offset(frame, row)),
            SheetGeometry::Grid(sheet) => FrameAddress::Grid(sheet.position(frame, row)),
        }
    }
}

/// `-(index * size)`, saturating at `i64::MIN + 1`.
fn pixel_span(index: usize, size: u32) -> i64 {
    let index = i64::try_from(index).unwrap_or(i64::MAX);
    -index.saturating_mul(i64::from(size))
}

fn fraction(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    let last = count - 1;
    index.min(last) as f64 / last as f64
}

/// Format a percentage with at most four decimals and no trailing zeros.
pub fn format_percent(value: f64) -> String {
    let rounded = format!("{:.4}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    format!("{}%", trimmed)
}
