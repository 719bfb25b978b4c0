//! Frame clocks: a pure frame sequence and the scoped timer that drives it.

mod sequence;
mod timer;

pub use sequence::FrameSequence;
pub use timer::{ClockMode, FrameTimer};
