use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

use super::sequence::FrameSequence;

/// Whether a timer may spawn its ticker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    /// Advance in real time.
    Live,
    /// Stay on the start frame; callers sample with [`FrameSequence::frame_at`].
    Frozen,
}

/// A running ticker thread and the channel that stops it.
struct Ticker {
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

/// Scoped frame timer owned by a single view.
///
/// The ticker thread is acquired in [`FrameTimer::start`] and released on
/// every exit path: [`FrameTimer::cancel`], [`FrameTimer::restart`], and drop.
/// Release joins the thread, so once it returns the frame never changes again.
///
/// Sequences that don't animate (paused, `fps == 0`) never spawn a thread.
pub struct FrameTimer {
    mode: ClockMode,
    sequence: FrameSequence,
    frame: Arc<AtomicUsize>,
    ticker: Option<Ticker>,
}

impl FrameTimer {
    pub fn start(sequence: FrameSequence) -> Self {
        Self::with_mode(sequence, ClockMode::Live)
    }

    pub fn with_mode(sequence: FrameSequence, mode: ClockMode) -> Self {
        let frame = Arc::new(AtomicUsize::new(sequence.start_frame()));
        let ticker = match mode {
            ClockMode::Live => spawn_ticker(sequence, Arc::clone(&frame)),
            ClockMode::Frozen => None,
        };
        Self {
            mode,
            sequence,
            frame,
            ticker,
        }
    }

    /// Current frame index.
    pub fn frame(&self) -> usize {
        self.frame.load(Ordering::Acquire)
    }

    pub fn sequence(&self) -> FrameSequence {
        self.sequence
    }

    /// Whether a ticker thread is currently held.
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Tear down the current ticker and acquire a new one for `sequence`.
    ///
    /// The frame restarts at the new sequence's start frame, so a shorter
    /// row never shows an index past its end.
    pub fn restart(&mut self, sequence: FrameSequence) {
        self.cancel();
        debug!(
            frame_count = sequence.frame_count(),
            fps = sequence.fps(),
            animating = sequence.is_animating(),
            "clock:restart"
        );
        self.sequence = sequence;
        self.frame.store(sequence.start_frame(), Ordering::Release);
        if self.mode == ClockMode::Live {
            self.ticker = spawn_ticker(sequence, Arc::clone(&self.frame));
        }
    }

    /// Stop ticking. The frame stays where it is. No-op if nothing is running.
    pub fn cancel(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            // Dropping the sender wakes the ticker with `Disconnected`
            drop(ticker.cancel);
            if ticker.handle.join().is_err() {
                warn!("clock:ticker panicked");
            }
            trace!("clock:cancelled");
        }
    }
}

impl Drop for FrameTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn spawn_ticker(sequence: FrameSequence, frame: Arc<AtomicUsize>) -> Option<Ticker> {
    let interval = sequence.interval()?;
    let (cancel, cancelled) = mpsc::channel::<()>();

    let spawned = thread::Builder::new()
        .name("spritemux-frame-clock".to_string())
        .spawn(move || {
            let mut cursor = sequence.cursor();
            loop {
                match cancelled.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        frame.store(cursor.advance(), Ordering::Release);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

    match spawned {
        Ok(handle) => Some(Ticker { cancel, handle }),
        Err(e) => {
            // Hold on the start frame rather than fail the view
            warn!(error = %e, "clock:failed to spawn ticker, holding frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::{Duration, Instant};

    #[test]
    fn test_held_sequence_spawns_no_thread() {
        let timer = FrameTimer::start(FrameSequence::held(4, 1));
        assert!(!timer.is_running());
        thread::sleep(Duration::from_millis(30));
        assert_eq!(timer.frame(), 1);
    }

    #[test]
    fn test_zero_fps_spawns_no_thread() {
        let timer = FrameTimer::start(FrameSequence::playing(4, 0));
        assert!(!timer.is_running());
        assert_eq!(timer.frame(), 0);
    }

    #[test]
    fn test_playing_sequence_advances_within_bounds() {
        let timer = FrameTimer::start(FrameSequence::playing(3, 200));
        assert!(timer.is_running());

        let mut seen = HashSet::new();
        let deadline = Instant::now() + Duration::from_millis(500);
        while Instant::now() < deadline && seen.len() < 3 {
            let frame = timer.frame();
            assert!(frame < 3);
            seen.insert(frame);
            thread::sleep(Duration::from_millis(1));
        }
        assert!(seen.len() > 1, "frame never advanced: {:?}", seen);
    }

    #[test]
    fn test_cancel_freezes_frame() {
        let mut timer = FrameTimer::start(FrameSequence::playing(4, 500));
        thread::sleep(Duration::from_millis(20));
        timer.cancel();
        assert!(!timer.is_running());

        let frozen = timer.frame();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(timer.frame(), frozen);
    }

    #[test]
    fn test_drop_stops_ticking() {
        let timer = FrameTimer::start(FrameSequence::playing(4, 500));
        let frame = Arc::clone(&timer.frame);
        thread::sleep(Duration::from_millis(20));
        drop(timer);

        let frozen = frame.load(Ordering::Acquire);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(frame.load(Ordering::Acquire), frozen);
    }

    #[test]
    fn test_restart_resets_to_new_start_frame() {
        let mut timer = FrameTimer::start(FrameSequence::playing(8, 500));
        thread::sleep(Duration::from_millis(20));

        timer.restart(FrameSequence::held(2, 1));
        assert!(!timer.is_running());
        assert_eq!(timer.frame(), 1);
        assert_eq!(timer.sequence().frame_count(), 2);

        timer.restart(FrameSequence::playing(2, 100));
        assert!(timer.is_running());
        assert_eq!(timer.frame(), 0);
    }

    #[test]
    fn test_frozen_timer_never_ticks() {
        let mut timer = FrameTimer::with_mode(FrameSequence::playing(4, 500), ClockMode::Frozen);
        assert!(!timer.is_running());
        thread::sleep(Duration::from_millis(20));
        assert_eq!(timer.frame(), 0);

        timer.restart(FrameSequence::playing(2, 500));
        assert!(!timer.is_running());
        assert_eq!(timer.sequence().frame_count(), 2);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timer = FrameTimer::start(FrameSequence::playing(4, 50));
        timer.cancel();
        timer.cancel();
        assert!(!timer.is_running());
    }
}
