//! Sprite animator: a frame timer plus sheet addressing.

use tracing::debug;

use super::node::{Element, Node};
use crate::clock::{ClockMode, FrameSequence, FrameTimer};
use crate::policy::Playback;
use crate::sheet::{FrameAddress, SheetGeometry, SheetLook, Style, sheet_style};

#[derive(Debug, Clone, PartialEq)]
pub struct AnimatorProps {
    /// Image locator as it should appear in CSS.
    pub src: String,
    pub geometry: SheetGeometry,
    pub row: usize,
    pub playback: Playback,
    pub look: SheetLook,
}

impl AnimatorProps {
    fn sequence(&self) -> FrameSequence {
        self.playback.sequence(self.geometry.frame_count())
    }
}

/// Shows one animation row of a sprite sheet, stepping through its frames.
///
/// Owns its timer: dropping the animator cancels it.
pub struct SpriteAnimator {
    props: AnimatorProps,
    timer: FrameTimer,
}

impl SpriteAnimator {
    /// Mount with a timer in `mode`. Frozen animators stay on their start
    /// frame and are sampled through [`SpriteAnimator::sequence`].
    pub fn mount(props: AnimatorProps, mode: ClockMode) -> Self {
        let sequence = props.sequence();
        debug!(
            src = %props.src,
            mode = props.geometry.mode_label(),
            row = props.row,
            frames = sequence.frame_count(),
            fps = sequence.fps(),
            ?mode,
            "animator:mount"
        );
        Self {
            timer: FrameTimer::with_mode(sequence, mode),
            props,
        }
    }

    pub fn props(&self) -> &AnimatorProps {
        &self.props
    }

    /// Replace the props. The timer is recreated only when the frame count or
    /// playback changed; a row switch keeps the running clock.
    pub fn set_props(&mut self, props: AnimatorProps) {
        let sequence = props.sequence();
        if sequence != self.timer.sequence() {
            self.timer.restart(sequence);
        }
        self.props = props;
    }

    pub fn frame(&self) -> usize {
        self.timer.frame()
    }

    /// Whether a timer thread is live for this animator.
    pub fn is_ticking(&self) -> bool {
        self.timer.is_running()
    }

    pub fn sequence(&self) -> FrameSequence {
        self.timer.sequence()
    }

    pub fn address(&self) -> FrameAddress {
        self.props.geometry.address(self.frame(), self.props.row)
    }

    pub fn style(&self) -> Style {
        self.style_at(self.frame())
    }

    /// Style for an explicit frame, for snapshots taken outside the clock.
    pub fn style_at(&self, frame: usize) -> Style {
        sheet_style(
            &self.props.geometry,
            frame,
            self.props.row,
            &self.props.src,
            &self.props.look,
        )
    }

    pub fn render_at(&self, frame: usize) -> Node {
        Element::new("div")
            .class("sprite-animator")
            .style(self.style_at(frame))
            .into()
    }
}
