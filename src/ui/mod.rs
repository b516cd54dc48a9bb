//! UI rendering module for Hava Durumu
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod detail;
pub mod help_overlay;
pub mod home;
pub mod theme;
pub mod widgets;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppState};

pub use detail::render as render_detail;
pub use help_overlay::render as render_help_overlay;
pub use home::render as render_home;
pub use theme::Theme;

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &mut App) {
    match app.state {
        AppState::Loading => render_loading(frame, app),
        AppState::Home => render_home(frame, app),
        AppState::Detail => render_detail(frame, app),
    }

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Renders a loading message while the first request is running
fn render_loading(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new(format!("{} için hava durumu yükleniyor...", app.location))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}
