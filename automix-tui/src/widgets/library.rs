//! Library widget - track table driven by the per-view column layout

use crate::theme::Theme;
use automix_input::Direction;
use automix_library::{ColumnLayout, Favorites, LibraryView, Track};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Widget,
    },
};

/// Width of the favorite marker column
const STAR_WIDTH: u16 = 2;

/// State for the library widget
#[derive(Debug, Clone)]
pub struct LibraryState {
    pub tracks: Vec<Track>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub view: LibraryView,
    layouts: Vec<ColumnLayout>,
    /// Index into the current layout's columns
    pub focused_column: usize,
    pub favorites: Favorites,
}

impl Default for LibraryState {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            view: LibraryView::Audio,
            layouts: LibraryView::ALL.iter().map(|v| ColumnLayout::defaults(*v)).collect(),
            focused_column: 0,
            favorites: Favorites::default(),
        }
    }
}

impl LibraryState {
    pub fn new(tracks: Vec<Track>, layouts: Vec<ColumnLayout>, favorites: Favorites) -> Self {
        let mut state = Self {
            tracks,
            favorites,
            ..Default::default()
        };
        for layout in layouts {
            state.replace_layout(layout);
        }
        state
    }

    fn replace_layout(&mut self, layout: ColumnLayout) {
        if let Some(slot) = self.layouts.iter_mut().find(|l| l.view() == layout.view()) {
            *slot = layout;
        }
    }

    /// Column layout of the current view
    pub fn layout(&self) -> &ColumnLayout {
        self.layouts
            .iter()
            .find(|l| l.view() == self.view)
            .unwrap_or(&self.layouts[0])
    }

    fn layout_mut(&mut self) -> Option<&mut ColumnLayout> {
        let view = self.view;
        self.layouts.iter_mut().find(|l| l.view() == view)
    }

    pub fn cycle_view(&mut self) {
        self.view = self.view.next();
        self.focused_column = 0;
    }

    pub fn select_next(&mut self) {
        let count = self.tracks.len();
        if count > 0 && self.selected_index < count - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        let count = self.tracks.len();
        if count > 0 {
            self.selected_index = count - 1;
        }
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected_index)
    }

    /// Flip the selected track's favorite flag; returns (id, now favorite)
    pub fn toggle_favorite(&mut self) -> Option<(String, bool)> {
        let id = self.selected_track()?.id.clone();
        let now = self.favorites.toggle(&id);
        Some((id, now))
    }

    pub fn focus_column(&mut self, direction: Direction) {
        let count = self.layout().columns().len();
        self.focused_column = match direction {
            Direction::Left => self.focused_column.saturating_sub(1),
            Direction::Right => (self.focused_column + 1).min(count.saturating_sub(1)),
        };
    }

    /// Show or hide the focused column; returns whether the layout changed
    pub fn toggle_column(&mut self) -> bool {
        let index = self.focused_column;
        self.layout_mut().is_some_and(|l| l.toggle(index))
    }

    /// Move the focused column, keeping focus on it
    pub fn move_column(&mut self, direction: Direction) -> bool {
        let index = self.focused_column;
        let moved = match (self.layout_mut(), direction) {
            (Some(layout), Direction::Left) => layout.move_left(index),
            (Some(layout), Direction::Right) => layout.move_right(index),
            (None, _) => false,
        };
        if moved {
            self.focused_column = match direction {
                Direction::Left => index - 1,
                Direction::Right => index + 1,
            };
        }
        moved
    }

    pub fn reset_columns(&mut self) {
        if let Some(layout) = self.layout_mut() {
            layout.reset();
        }
        self.focused_column = 0;
    }

    /// Update scroll offset to keep selection visible
    fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        }
    }
}

/// Pad or cut text to an exact cell width
fn fit(text: &str, width: u16) -> String {
    let width = width as usize;
    let cut: String = text.chars().take(width).collect();
    format!("{:<width$}", cut, width = width)
}

/// Widget for displaying the track library
pub struct LibraryWidget<'a> {
    state: &'a mut LibraryState,
    theme: &'a Theme,
}

impl<'a> LibraryWidget<'a> {
    pub fn new(state: &'a mut LibraryState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for LibraryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            " {} [{}] ★{} ",
            self.state.view.label().to_uppercase(),
            self.state.tracks.len(),
            self.state.favorites.len()
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_active())
            .title(Span::styled(title, self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width < 20 {
            return;
        }

        let list_width = inner.width.saturating_sub(1);
        let layout = self.state.layout().clone();
        let focused_id = layout
            .columns()
            .get(self.state.focused_column)
            .map(|c| c.id.clone());

        // Header: visible columns, the focused one highlighted
        let mut header = vec![Span::styled(fit("", STAR_WIDTH), self.theme.dim())];
        for col in layout.visible() {
            let style = if focused_id.as_deref() == Some(col.id.as_str()) {
                self.theme.title().add_modifier(Modifier::UNDERLINED)
            } else {
                self.theme.dim()
            };
            header.push(Span::styled(fit(&col.label.to_uppercase(), col.width), style));
            header.push(Span::raw(" "));
        }
        // Hidden focused column still needs a cue
        if let Some(col) = layout.columns().get(self.state.focused_column) {
            if !col.visible {
                header.push(Span::styled(format!("[{} hidden]", col.label), self.theme.dim()));
            }
        }
        Paragraph::new(Line::from(header)).render(Rect::new(inner.x, inner.y, list_width, 1), buf);

        let list_height = (inner.height - 1) as usize;
        self.state.update_scroll(list_height);
        let scroll_offset = self.state.scroll_offset;

        for (i, track) in self
            .state
            .tracks
            .iter()
            .skip(scroll_offset)
            .take(list_height)
            .enumerate()
        {
            let y = inner.y + 1 + i as u16;
            let is_selected = scroll_offset + i == self.state.selected_index;
            let base_style = if is_selected {
                self.theme.highlight()
            } else {
                self.theme.normal()
            };

            let star = if self.state.favorites.contains(&track.id) {
                Span::styled(fit("★", STAR_WIDTH), base_style.fg(self.theme.warning))
            } else {
                Span::styled(fit("", STAR_WIDTH), base_style)
            };
            let mut spans = vec![star];
            for col in layout.visible() {
                spans.push(Span::styled(fit(&col.cell(track), col.width), base_style));
                spans.push(Span::styled(" ", base_style));
            }

            Paragraph::new(Line::from(spans)).render(Rect::new(inner.x, y, list_width, 1), buf);
        }

        if self.state.tracks.len() > list_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            let mut scrollbar_state =
                ScrollbarState::new(self.state.tracks.len()).position(scroll_offset);
            let scrollbar_area =
                Rect::new(inner.x + inner.width - 1, inner.y + 1, 1, inner.height - 1);
            StatefulWidget::render(scrollbar, scrollbar_area, buf, &mut scrollbar_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automix_library::mock_catalog;

    fn state() -> LibraryState {
        LibraryState::new(mock_catalog(), Vec::new(), Favorites::default())
    }

    #[test]
    fn test_library_state_navigation() {
        let mut state = state();
        let last = state.tracks.len() - 1;

        state.select_next();
        state.select_next();
        assert_eq!(state.selected_index, 2);

        state.select_last();
        state.select_next();
        assert_eq!(state.selected_index, last);

        state.select_first();
        state.select_prev();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_toggle_favorite() {
        let mut state = state();
        state.select_next();
        assert_eq!(state.toggle_favorite(), Some(("t2".to_string(), true)));
        assert!(state.favorites.contains("t2"));
        assert_eq!(state.toggle_favorite(), Some(("t2".to_string(), false)));

        let mut empty = LibraryState::default();
        assert_eq!(empty.toggle_favorite(), None);
    }

    #[test]
    fn test_column_focus_follows_move() {
        let mut state = state();
        assert_eq!(state.layout().columns()[0].id, "title");
        assert!(state.move_column(Direction::Right));
        assert_eq!(state.focused_column, 1);
        assert_eq!(state.layout().columns()[1].id, "title");

        assert!(state.move_column(Direction::Left));
        assert!(!state.move_column(Direction::Left));
        assert_eq!(state.focused_column, 0);
    }

    #[test]
    fn test_layouts_are_per_view() {
        let mut state = state();
        state.focus_column(Direction::Right);
        assert!(state.toggle_column());
        assert!(!state.layout().columns()[1].visible);

        state.cycle_view();
        assert_eq!(state.view, LibraryView::Analysis);
        assert_eq!(state.focused_column, 0);
        assert!(state.layout().columns()[1].visible);

        state.cycle_view();
        state.cycle_view();
        assert!(!state.layout().columns()[1].visible);
        state.reset_columns();
        assert!(state.layout().columns()[1].visible);
    }

    #[test]
    fn test_loaded_layouts_replace_defaults() {
        let mut custom = ColumnLayout::defaults(LibraryView::Dna);
        custom.move_right(0);
        let mut state =
            LibraryState::new(mock_catalog(), vec![custom.clone()], Favorites::default());
        state.view = LibraryView::Dna;
        assert_eq!(state.layout(), &custom);
    }

    #[test]
    fn test_render_shows_titles() {
        let mut state = state();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 100, 8);
        let mut buf = Buffer::empty(area);
        LibraryWidget::new(&mut state, &theme).render(area, &mut buf);

        let row: String = (0..area.width).map(|x| buf[(x, 2)].symbol().to_string()).collect();
        assert!(row.contains("Midnight Drive"), "row was {row:?}");
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
    }
}
