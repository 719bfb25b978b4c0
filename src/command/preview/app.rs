use ratatui::widgets::TableState;
use std::time::Instant;
use tracing::debug;

use crate::status::AnimationState;
use crate::view::EntityView;

/// Order `s` steps a character through.
fn next_status(status: &AnimationState) -> AnimationState {
    match status {
        AnimationState::Idle => AnimationState::Working,
        AnimationState::Working => AnimationState::Merging,
        AnimationState::Merging => AnimationState::Other("WALKING".to_string()),
        AnimationState::Other(_) => AnimationState::Idle,
    }
}

pub struct PreviewApp {
    pub title: String,
    pub views: Vec<EntityView>,
    pub table_state: TableState,
    pub started: Instant,
    /// Detail pane shows rendered HTML instead of the sprite style.
    pub show_html: bool,
}

impl PreviewApp {
    pub fn new(title: String, views: Vec<EntityView>) -> Self {
        let mut table_state = TableState::default();
        if !views.is_empty() {
            table_state.select(Some(0));
        }
        Self {
            title,
            views,
            table_state,
            started: Instant::now(),
            show_html: false,
        }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn selected(&self) -> Option<&EntityView> {
        self.table_state.selected().and_then(|i| self.views.get(i))
    }

    pub fn select_next(&mut self) {
        if self.views.is_empty() {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < self.views.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.views.is_empty() {
            return;
        }
        let prev = match self.table_state.selected() {
            Some(0) | None => self.views.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(prev));
    }

    /// Step the selected character to its next activity state. Zones have none.
    pub fn cycle_status(&mut self) {
        let Some(EntityView::Character(view)) = self
            .table_state
            .selected()
            .and_then(|i| self.views.get_mut(i))
        else {
            return;
        };
        let next = next_status(view.status());
        debug!(from = %view.status(), to = %next, "preview:cycle status");
        view.set_status(next);
    }

    pub fn toggle_html(&mut self) {
        self.show_html = !self.show_html;
    }

    /// Simulate an image load failure on the selected entity.
    pub fn break_selected(&mut self) {
        if let Some(view) = self
            .table_state
            .selected()
            .and_then(|i| self.views.get_mut(i))
        {
            view.mark_broken();
        }
    }
}
