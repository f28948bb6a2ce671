//! Single-line city search box

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

pub const PLACEHOLDER: &str = "Search any city";

/// Text entry that keeps its own draft and reports it on Enter.
///
/// The draft is neither trimmed nor cleared on submit; the receiver decides
/// what to do with blank input.
pub struct SearchInput<A> {
    draft: String,
    /// Byte index into `draft`, always on a char boundary.
    cursor: usize,
    placeholder: &'static str,
    on_submit: fn(String) -> A,
}

impl<A> SearchInput<A> {
    pub fn new(placeholder: &'static str, on_submit: fn(String) -> A) -> Self {
        Self {
            draft: String::new(),
            cursor: 0,
            placeholder,
            on_submit,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<A> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => self.cursor = 0,
                KeyCode::Char('e') => self.cursor = self.draft.len(),
                KeyCode::Char('u') => {
                    self.draft.clear();
                    self.cursor = 0;
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Enter => return Some((self.on_submit)(self.draft.clone())),
            KeyCode::Char(c) => {
                self.draft.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            KeyCode::Backspace => {
                if let Some(start) = self.prev_boundary() {
                    self.draft.drain(start..self.cursor);
                    self.cursor = start;
                }
            }
            KeyCode::Delete => {
                if let Some(end) = self.next_boundary() {
                    self.draft.drain(self.cursor..end);
                }
            }
            KeyCode::Left => {
                if let Some(start) = self.prev_boundary() {
                    self.cursor = start;
                }
            }
            KeyCode::Right => {
                if let Some(end) = self.next_boundary() {
                    self.cursor = end;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.draft.len(),
            _ => {}
        }

        None
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.draft[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.draft[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    /// The box is the only input on the screen, so it always owns the cursor.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let paragraph = if self.draft.is_empty() {
            Paragraph::new(self.placeholder).fg(Color::Gray).italic()
        } else {
            Paragraph::new(self.draft.as_str()).fg(Color::White)
        };

        let inner = block.inner(area);
        frame.render_widget(paragraph.block(block), area);

        if inner.width > 0 && inner.height > 0 {
            // Terminal cells, not chars: wide glyphs take two.
            let column = self.draft[..self.cursor].width() as u16;
            frame.set_cursor_position(Position::new(
                inner.x + column.min(inner.width - 1),
                inner.y,
            ));
        }
    }
}
