//! Home screen rendering
//!
//! Shows the current conditions for the selected city with a search bar and
//! a row of summary cards.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, StatusKind, StatusMessage};
use crate::condition::classify;
use crate::data::{CitySuggestion, CurrentWeather};
use crate::format::{
    capitalize_first, format_date, format_humidity, format_pressure, format_temperature,
    format_visibility, format_wind_speed,
};
use crate::ui::theme::Theme;

/// Renders the home screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let presentation = classify(app.current.as_ref().map(|c| c.condition_code.as_str()));
    let theme = Theme::from_presentation(&presentation);

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.background))
        .title(Span::styled(
            " Hava Durumu ",
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = main_block.inner(area);
    frame.render_widget(main_block, area);

    let suggestion_height = if app.input_mode == InputMode::Editing && !app.suggestions.is_empty()
    {
        app.suggestions.len() as u16 + 2
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                 // Search bar
            Constraint::Length(suggestion_height), // Suggestions
            Constraint::Min(7),                    // Current conditions
            Constraint::Length(4),                 // Cards
            Constraint::Length(1),                 // Status
            Constraint::Length(1),                 // Help
        ])
        .split(inner);

    render_search_bar(frame, chunks[0], app, &theme);
    if suggestion_height > 0 {
        render_suggestions(frame, chunks[1], app, &theme);
    }

    match &app.current {
        Some(current) => {
            let lines = build_current_lines(current, &theme);
            frame.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                chunks[2],
            );
            render_cards(frame, chunks[3], current, &theme);
        }
        None => {
            frame.render_widget(
                Paragraph::new("Hava durumu verisi yok")
                    .style(Style::default().fg(theme.muted))
                    .alignment(Alignment::Center),
                chunks[2],
            );
        }
    }

    if let Some(line) = build_status_line(app.status.as_ref()) {
        frame.render_widget(Paragraph::new(line), chunks[4]);
    } else if let Some(refreshed) = app.last_refresh {
        let updated = Paragraph::new(Span::styled(
            format!("Son güncelleme {}", refreshed.format("%H:%M")),
            Style::default().fg(theme.muted),
        ))
        .alignment(Alignment::Right);
        frame.render_widget(updated, chunks[4]);
    }

    let help = Paragraph::new(Line::from(Span::styled(
        "/ ara  Enter detay  r yenile  ? yardım  q çıkış",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);
}

/// Builds the centered current-conditions block
fn build_current_lines(current: &CurrentWeather, theme: &Theme) -> Vec<Line<'static>> {
    let presentation = classify(Some(current.condition_code.as_str()));
    let city = match &current.country {
        Some(country) => format!("{}, {}", current.city, country),
        None => current.city.clone(),
    };

    vec![
        Line::from(Span::styled(
            city,
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format_date(current.timestamp, current.timezone_offset),
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format_temperature(current.temperature),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(presentation.icon),
        ]),
        Line::from(Span::styled(
            capitalize_first(&current.description),
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            format!("Hissedilen {}", format_temperature(current.feels_like)),
            Style::default().fg(theme.muted),
        )),
        Line::from(Span::styled(
            format!(
                "Max {}  Min {}",
                format_temperature(current.temperature_max),
                format_temperature(current.temperature_min)
            ),
            Style::default().fg(theme.muted),
        )),
    ]
}

/// Label/value pairs for the summary cards
fn card_values(current: &CurrentWeather) -> [(&'static str, String); 4] {
    [
        ("Nem", format_humidity(current.humidity)),
        ("Rüzgar", format_wind_speed(current.wind_speed)),
        ("Basınç", format_pressure(current.pressure)),
        (
            "Görüş",
            current
                .visibility
                .map(format_visibility)
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]
}

fn render_cards(frame: &mut Frame, area: Rect, current: &CurrentWeather, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value), column) in card_values(current).into_iter().zip(columns.iter()) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(label, Style::default().fg(theme.muted))),
            Line::from(Span::styled(
                value,
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.muted)),
        );
        frame.render_widget(card, *column);
    }
}

fn render_search_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { theme.muted };

    let mut spans = Vec::new();
    if app.search_query.is_empty() && !editing {
        spans.push(Span::styled(
            "Şehir ara...",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            app.search_query.clone(),
            Style::default().fg(theme.text),
        ));
        if editing {
            spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        }
    }
    if app.searching {
        spans.push(Span::styled(
            "  aranıyor...",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Ara "),
    );
    frame.render_widget(search, area);
}

/// One line per suggestion, the selected one highlighted
fn build_suggestion_lines(
    suggestions: &[CitySuggestion],
    selected: Option<usize>,
) -> Vec<Line<'static>> {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, city)| {
            let label = match &city.country {
                Some(country) => format!("{}, {}", city.name, country),
                None => city.name.clone(),
            };
            if selected == Some(i) {
                Line::from(Span::styled(
                    format!("> {}", label),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {}", label))
            }
        })
        .collect()
}

fn render_suggestions(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let list = Paragraph::new(build_suggestion_lines(
        &app.suggestions,
        app.selected_suggestion,
    ))
    .style(Style::default().fg(theme.text))
    .block(
        Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(list, area);
}

/// Builds the status line, coloured by severity
pub(crate) fn build_status_line(status: Option<&StatusMessage>) -> Option<Line<'static>> {
    let status = status?;
    let color = match status.kind {
        StatusKind::Warning => Color::Yellow,
        StatusKind::Error => Color::Red,
    };
    Some(Line::from(Span::styled(
        status.text.clone(),
        Style::default().fg(color),
    )))
}
