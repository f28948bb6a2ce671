//! Drawing the weather screen
//!
//! Rendering is a pure function of `ScreenState` and the search box.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};
use weather_core::{Action, ScreenState, ScreenView};

use crate::search_input::SearchInput;

pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Static visual settings.
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub details_width: u16,
}

pub const THEME: Theme = Theme {
    text: Color::White,
    muted: Color::Gray,
    details_width: 60,
};

/// Draw the whole screen for the current state.
///
/// The search box is drawn in every phase, including while a lookup is in
/// flight. Submitting from there starts a newer chain; the older chain's
/// result then carries a stale generation and is dropped by the state.
pub fn render(
    frame: &mut Frame,
    state: &ScreenState,
    search: &SearchInput<Action>,
    tick: usize,
) {
    let area = frame.area();
    let backdrop = state.backdrop();
    let (r, g, b) = backdrop.color;

    frame.render_widget(Block::default().bg(Color::Rgb(r, g, b)), area);

    let [body, help] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let [column] = Layout::horizontal([Constraint::Max(THEME.details_width)])
        .flex(Flex::Center)
        .areas(body);

    let [details, input] = Layout::vertical([Constraint::Length(6), Constraint::Length(3)])
        .flex(Flex::Center)
        .spacing(1)
        .areas(column);

    render_details(frame, details, state, backdrop.icon, tick);
    search.render(frame, input);
    render_help(frame, help);
}

fn render_details(frame: &mut Frame, area: Rect, state: &ScreenState, icon: &str, tick: usize) {
    let text = Style::default().fg(THEME.text);

    let lines = match state.view() {
        ScreenView::Loading => {
            let spinner = SPINNERS[(tick / 2) % SPINNERS.len()];
            vec![Line::from(format!("{spinner} Loading...")).style(text)]
        }
        ScreenView::Error { message } => vec![Line::from(message.to_string()).style(text)],
        ScreenView::Weather {
            location,
            weather,
            temperature,
        } => vec![
            Line::from(icon.to_string()).style(text),
            Line::from(location.to_string()).style(text.add_modifier(Modifier::BOLD)),
            Line::from(weather.to_string()).style(text),
            Line::from(temperature).style(text.add_modifier(Modifier::BOLD)),
        ],
    };

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(THEME.text).add_modifier(Modifier::BOLD);
    let label = Style::default().fg(THEME.muted);

    let line = Line::from(vec![
        Span::styled("Enter", key),
        Span::styled(" search  ", label),
        Span::styled("Esc", key),
        Span::styled(" quit", label),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
