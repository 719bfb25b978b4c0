//! Sprite-sheet geometry and frame addressing.
//!
//! A sheet is addressed one of two ways:
//! - **Pixel**: the frame size is known, so a frame is an exact background offset
//!   on a viewport the size of one frame.
//! - **Grid**: only the column/row counts are known, so the background is
//!   stretched to `columns x rows` viewports and positioned by percentage.

mod address;
mod geometry;
mod style;

pub use address::{FrameAddress, format_percent};
pub use geometry::{GridSheet, PixelSheet, SheetError, SheetGeometry};
pub use style::{SheetLook, Style, sheet_style};
