//! Application state (Model in TEA pattern)

use tunwatch_core::{Display, DisplayRow, EntityId};
use tunwatch_feed::FeedState;

/// Rows moved by PageUp/PageDown.
pub const PAGE_SIZE: usize = 10;

/// Application lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,

    /// Feed URI, shown in the header.
    pub uri: String,

    /// Latest feed publication.
    pub feed: FeedState,

    /// `feed` passed through the view renderer. Recomputed on every publication.
    pub display: Display,

    /// Index into `display.rows()`.
    pub selected: Option<usize>,

    /// One-line notice shown in the footer.
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(uri: impl Into<String>) -> Self {
        let feed = FeedState::default();
        Self {
            phase: AppPhase::Running,
            uri: uri.into(),
            display: feed.display(),
            feed,
            selected: None,
            notice: None,
        }
    }

    /// Replace the feed state and re-render.
    ///
    /// The selection follows the selected row by identity when it is still
    /// present, otherwise it is clamped to the new row count.
    pub fn apply_feed(&mut self, feed: FeedState) {
        let previous = self.selected_row().map(row_key);
        self.display = feed.display();
        self.feed = feed;

        let rows = self.display.rows();
        self.selected = match (previous, self.selected) {
            _ if rows.is_empty() => None,
            (Some(key), Some(index)) => rows
                .iter()
                .position(|row| row_key(row) == key)
                .or(Some(index.min(rows.len() - 1))),
            _ => None,
        };
    }

    pub fn row_count(&self) -> usize {
        self.display.rows().len()
    }

    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.selected.and_then(|i| self.display.rows().get(i))
    }

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.move_selection(-1);
    }

    pub fn page_down(&mut self) {
        self.move_selection(PAGE_SIZE as isize);
    }

    pub fn page_up(&mut self) {
        self.move_selection(-(PAGE_SIZE as isize));
    }

    pub fn select_first(&mut self) {
        self.selected = (self.row_count() > 0).then_some(0);
    }

    pub fn select_last(&mut self) {
        self.selected = self.row_count().checked_sub(1);
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.row_count();
        if count == 0 {
            self.selected = None;
            return;
        }
        let next = match self.selected {
            None => 0,
            Some(i) => i.saturating_add_signed(delta).min(count - 1),
        };
        self.selected = Some(next);
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }
}

/// Identity of a row across snapshots.
fn row_key(row: &DisplayRow) -> (EntityId, Option<EntityId>) {
    match row {
        DisplayRow::Connection { id, .. } => (id.clone(), None),
        DisplayRow::Forwarded {
            connection_id, id, ..
        } => (connection_id.clone(), Some(id.clone())),
    }
}
