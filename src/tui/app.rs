use ratatui::widgets::ListState;

use crate::domain::catalog::CHAPTER_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Chapters,
    Verses,
    Detail,
}

impl ActivePane {
    pub fn next(self) -> Self {
        match self {
            ActivePane::Chapters => ActivePane::Verses,
            ActivePane::Verses => ActivePane::Detail,
            ActivePane::Detail => ActivePane::Chapters,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActivePane::Chapters => ActivePane::Detail,
            ActivePane::Verses => ActivePane::Chapters,
            ActivePane::Detail => ActivePane::Verses,
        }
    }
}

pub const PAGE_SIZE: usize = 10;

pub struct TuiApp {
    pub active_pane: ActivePane,
    /// Cursor in the chapter list, 0-based.
    pub chapter_index: usize,
    /// Cursor in the verse list, as a position among the visible rows.
    pub verse_cursor: usize,
    pub detail_scroll: u16,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub maximized: bool,
    /// Query being typed; `None` outside search mode.
    pub search_input: Option<String>,
    /// Inner height of the verse list at the last draw.
    pub verses_height: usize,
    /// Shown under a failed load.
    pub retry_hint: String,
    pub chapter_list_state: ListState,
}

impl TuiApp {
    pub fn new(chapter: u16) -> Self {
        let chapter_index = usize::from(chapter.clamp(1, CHAPTER_COUNT)) - 1;
        let mut chapter_list_state = ListState::default();
        chapter_list_state.select(Some(chapter_index));

        Self {
            active_pane: ActivePane::Verses,
            chapter_index,
            verse_cursor: 0,
            detail_scroll: 0,
            should_quit: false,
            status_message: None,
            maximized: false,
            search_input: None,
            verses_height: 0,
            retry_hint: String::new(),
            chapter_list_state,
        }
    }

    /// Chapter number under the chapter-list cursor.
    pub fn selected_chapter(&self) -> u16 {
        self.chapter_index as u16 + 1
    }

    /// Point the chapter list at `number`, e.g. after n/p navigation.
    pub fn follow_chapter(&mut self, number: u16) {
        self.chapter_index = usize::from(number.clamp(1, CHAPTER_COUNT)) - 1;
        self.chapter_list_state.select(Some(self.chapter_index));
        self.reset_verse_cursor();
    }

    pub fn reset_verse_cursor(&mut self) {
        self.verse_cursor = 0;
        self.detail_scroll = 0;
    }

    /// Keep the verse cursor inside a visible list of `len` rows.
    pub fn clamp_verse_cursor(&mut self, len: usize) {
        let max_index = len.saturating_sub(1);
        if self.verse_cursor > max_index {
            self.verse_cursor = max_index;
            self.detail_scroll = 0;
        }
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Chapters => {
                if self.chapter_index > 0 {
                    self.chapter_index -= 1;
                    self.chapter_list_state.select(Some(self.chapter_index));
                }
            }
            ActivePane::Verses => {
                if self.verse_cursor > 0 {
                    self.verse_cursor -= 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
        }
    }

    /// `visible_len` is the number of rows in the verse list.
    pub fn move_down(&mut self, visible_len: usize) {
        match self.active_pane {
            ActivePane::Chapters => {
                if self.chapter_index + 1 < usize::from(CHAPTER_COUNT) {
                    self.chapter_index += 1;
                    self.chapter_list_state.select(Some(self.chapter_index));
                }
            }
            ActivePane::Verses => {
                if self.verse_cursor + 1 < visible_len {
                    self.verse_cursor += 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
        }
    }

    pub fn next_page(&mut self, visible_len: usize) {
        match self.active_pane {
            ActivePane::Chapters => {
                let max_index = usize::from(CHAPTER_COUNT) - 1;
                self.chapter_index = (self.chapter_index + PAGE_SIZE).min(max_index);
                self.chapter_list_state.select(Some(self.chapter_index));
            }
            ActivePane::Verses => {
                let max_index = visible_len.saturating_sub(1);
                let new_index = (self.verse_cursor + PAGE_SIZE).min(max_index);
                if new_index != self.verse_cursor {
                    self.verse_cursor = new_index;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(PAGE_SIZE as u16);
            }
        }
    }

    pub fn prev_page(&mut self) {
        match self.active_pane {
            ActivePane::Chapters => {
                self.chapter_index = self.chapter_index.saturating_sub(PAGE_SIZE);
                self.chapter_list_state.select(Some(self.chapter_index));
            }
            ActivePane::Verses => {
                let new_index = self.verse_cursor.saturating_sub(PAGE_SIZE);
                if new_index != self.verse_cursor {
                    self.verse_cursor = new_index;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(PAGE_SIZE as u16);
            }
        }
    }

    pub fn toggle_maximize(&mut self) {
        self.maximized = !self.maximized;
        if self.maximized {
            self.active_pane = ActivePane::Detail;
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_cycle() {
        let pane = ActivePane::Chapters;
        assert_eq!(pane.next().next().next(), pane);
        assert_eq!(pane.prev(), ActivePane::Detail);
    }

    #[test]
    fn test_verse_cursor_stays_in_visible_list() {
        let mut app = TuiApp::new(1);
        app.move_down(3);
        app.move_down(3);
        app.move_down(3);
        assert_eq!(app.verse_cursor, 2);

        app.next_page(3);
        assert_eq!(app.verse_cursor, 2);
        app.prev_page();
        assert_eq!(app.verse_cursor, 0);

        app.verse_cursor = 40;
        app.clamp_verse_cursor(5);
        assert_eq!(app.verse_cursor, 4);
        app.clamp_verse_cursor(0);
        assert_eq!(app.verse_cursor, 0);
    }

    #[test]
    fn test_chapter_cursor_bounds() {
        let mut app = TuiApp::new(114);
        app.active_pane = ActivePane::Chapters;
        app.move_down(0);
        assert_eq!(app.selected_chapter(), 114);

        app.follow_chapter(1);
        app.move_up();
        assert_eq!(app.selected_chapter(), 1);
        app.next_page(0);
        assert_eq!(app.selected_chapter(), 11);
    }

    #[test]
    fn test_maximize_focuses_detail() {
        let mut app = TuiApp::new(1);
        app.toggle_maximize();
        assert!(app.maximized);
        assert_eq!(app.active_pane, ActivePane::Detail);
    }
}
