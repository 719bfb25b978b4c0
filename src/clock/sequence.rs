use std::time::Duration;

/// Frame index cycling over one animation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    index: usize,
    frame_count: usize,
}

impl FrameCursor {
    /// Cursor positioned at `start`, clamped into `[0, frame_count)`.
    pub fn new(frame_count: usize, start: usize) -> Self {
        let frame_count = frame_count.max(1);
        Self {
            index: start.min(frame_count - 1),
            frame_count,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn index(&self) -> usize {
        self.index
    }

    #[allow(dead_code)] // Used in tests
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Step to the next frame, wrapping to 0 after the last one.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.frame_count;
        self.index
    }
}

/// The timing contract of a frame clock, independent of any real timer.
///
/// A playing sequence yields `0, 1, .., n-1, 0, ..`, one step every
/// `1000 / fps` ms. A held sequence (or one with `fps == 0`) stays on its hold
/// frame forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSequence {
    frame_count: usize,
    fps: u32,
    hold: Option<usize>,
}

impl FrameSequence {
    pub fn playing(frame_count: usize, fps: u32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            fps,
            hold: None,
        }
    }

    /// A sequence paused on `frame` (clamped to the last frame).
    pub fn held(frame_count: usize, frame: usize) -> Self {
        let frame_count = frame_count.max(1);
        Self {
            frame_count,
            fps: 0,
            hold: Some(frame.min(frame_count - 1)),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn is_animating(&self) -> bool {
        self.hold.is_none() && self.fps > 0
    }

    /// Frame shown before the first tick, and for as long as the sequence is held.
    pub fn start_frame(&self) -> usize {
        self.hold.unwrap_or(0).min(self.frame_count - 1)
    }

    /// Time between ticks, or `None` when the sequence never advances.
    pub fn interval(&self) -> Option<Duration> {
        self.is_animating()
            .then(|| Duration::from_secs_f64(1.0 / f64::from(self.fps)))
    }

    /// Time for one full cycle through the row.
    #[allow(dead_code)] // Used in tests
    pub fn period(&self) -> Option<Duration> {
        self.is_animating()
            .then(|| Duration::from_secs_f64(self.frame_count as f64 / f64::from(self.fps)))
    }

    /// Frame shown after `elapsed` time since the clock started.
    pub fn frame_at(&self, elapsed: Duration) -> usize {
        if !self.is_animating() {
            return self.start_frame();
        }
        let ticks = elapsed.as_nanos() * u128::from(self.fps) / 1_000_000_000;
        (ticks % self.frame_count as u128) as usize
    }

    pub fn cursor(&self) -> FrameCursor {
        FrameCursor::new(self.frame_count, self.start_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps() {
        let mut cursor = FrameCursor::new(3, 0);
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
        assert_eq!(cursor.advance(), 0);
    }

    #[test]
    fn test_cursor_clamps_start() {
        let cursor = FrameCursor::new(4, 10);
        assert_eq!(cursor.index(), 3);
        let single = FrameCursor::new(0, 0);
        assert_eq!(single.frame_count(), 1);
    }

    #[test]
    fn test_frame_at_steps_every_interval() {
        let seq = FrameSequence::playing(4, 8);
        assert_eq!(seq.interval(), Some(Duration::from_millis(125)));
        assert_eq!(seq.frame_at(Duration::ZERO), 0);
        assert_eq!(seq.frame_at(Duration::from_millis(124)), 0);
        assert_eq!(seq.frame_at(Duration::from_millis(125)), 1);
        assert_eq!(seq.frame_at(Duration::from_millis(375)), 3);
        assert_eq!(seq.frame_at(Duration::from_millis(500)), 0);
    }

    #[test]
    fn test_frame_at_is_periodic_and_bounded() {
        let seq = FrameSequence::playing(5, 10);
        let period = seq.period().unwrap();
        for ms in (0..3000).step_by(7) {
            let t = Duration::from_millis(ms);
            let frame = seq.frame_at(t);
            assert!(frame < 5);
            assert_eq!(frame, seq.frame_at(t + period));
        }
    }

    #[test]
    fn test_zero_fps_holds_start_frame() {
        let seq = FrameSequence::playing(4, 0);
        assert!(!seq.is_animating());
        assert_eq!(seq.interval(), None);
        for ms in [0, 100, 10_000] {
            assert_eq!(seq.frame_at(Duration::from_millis(ms)), 0);
        }
    }

    #[test]
    fn test_held_sequence_stays_on_hold_frame() {
        let seq = FrameSequence::held(4, 2);
        assert_eq!(seq.start_frame(), 2);
        for ms in [0, 125, 999_999] {
            assert_eq!(seq.frame_at(Duration::from_millis(ms)), 2);
        }
        assert_eq!(FrameSequence::held(4, 9).start_frame(), 3);
    }
}
