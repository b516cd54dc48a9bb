//! Detail screen UI
//!
//! Renders every field of the current conditions followed by the hourly and
//! daily forecasts. The body scrolls; the header, temperature curve and help
//! line stay fixed.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::condition::classify;
use crate::data::{CurrentWeather, Forecast};
use crate::forecast::{daily_entries, hourly_entries, hourly_view, ForecastEntry};
use crate::format::{
    capitalize_first, format_date, format_day_month, format_humidity, format_percent,
    format_pressure, format_temperature, format_time, format_visibility, format_weekday_short,
    format_wind_speed, rain_chance, wind_direction,
};
use crate::ui::home::build_status_line;
use crate::ui::theme::Theme;
use crate::ui::widgets::TemperatureSparkline;

/// Width of the label column in detail rows
const LABEL_WIDTH: usize = 16;

/// Renders the detail screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state; the scroll offset is clamped to the content
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let Some(current) = app.current.as_ref() else {
        render_no_data(frame, area);
        return;
    };

    let presentation = classify(Some(current.condition_code.as_str()));
    let theme = Theme::from_presentation(&presentation);

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.background))
        .title(Span::styled(
            format!(" {} {} ", presentation.icon, current.city),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = main_block.inner(area);
    frame.render_widget(main_block, area);

    let hourly_temps: Vec<f64> = app
        .forecast
        .as_ref()
        .map(|f| hourly_view(&f.samples).iter().map(|s| s.temperature).collect())
        .unwrap_or_default();
    let sparkline_height = if hourly_temps.is_empty() { 0 } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                // Header
            Constraint::Length(sparkline_height), // Temperature curve
            Constraint::Min(0),                   // Scrollable body
            Constraint::Length(1),                // Status
            Constraint::Length(1),                // Help
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(build_header_lines(current, &theme)),
        chunks[0],
    );

    if sparkline_height > 0 {
        render_sparkline_row(frame, chunks[1], &hourly_temps, &theme);
    }

    let lines = build_detail_lines(current, app.forecast.as_ref(), &theme);

    // Clamp scroll offset to valid range
    let max_scroll = (lines.len() as u16).saturating_sub(chunks[2].height);
    if app.detail_scroll_offset > max_scroll {
        app.detail_scroll_offset = max_scroll;
    }

    frame.render_widget(
        Paragraph::new(lines).scroll((app.detail_scroll_offset, 0)),
        chunks[2],
    );

    if let Some(line) = build_status_line(app.status.as_ref()) {
        frame.render_widget(Paragraph::new(line), chunks[3]);
    }

    let help = Paragraph::new(Line::from(Span::styled(
        "j/k kaydır  g/G baş/son  Esc geri  r yenile  q çıkış",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}

fn render_no_data(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("Hava durumu verisi yok")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_sparkline_row(frame: &mut Frame, area: Rect, temps: &[f64], theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LABEL_WIDTH as u16 + 2), Constraint::Min(0)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "  Sıcaklık eğrisi",
            Style::default().fg(theme.muted),
        )),
        columns[0],
    );
    frame.render_widget(
        TemperatureSparkline::new(temps)
            .highlight(0)
            .style(Style::default().fg(Color::LightRed)),
        columns[1],
    );
}

fn build_header_lines(current: &CurrentWeather, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                format_temperature(current.temperature),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                capitalize_first(&current.description),
                Style::default().fg(theme.text),
            ),
        ]),
        Line::from(Span::styled(
            format_date(current.timestamp, current.timezone_offset),
            Style::default().fg(theme.muted),
        )),
    ]
}

fn section_header(title: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    ))
}

fn detail_row(label: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<width$}", label, width = LABEL_WIDTH),
            Style::default().fg(theme.muted),
        ),
        Span::styled(value, Style::default().fg(theme.text)),
    ])
}

/// Builds the scrollable body of the detail screen
pub(crate) fn build_detail_lines(
    current: &CurrentWeather,
    forecast: Option<&Forecast>,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(section_header("Detaylar", theme));
    lines.push(detail_row(
        "Nem Oranı",
        format_humidity(current.humidity),
        theme,
    ));

    let mut wind = format!(
        "{} {}",
        format_wind_speed(current.wind_speed),
        wind_direction(current.wind_direction)
    );
    if let Some(gust) = current.wind_gust {
        wind.push_str(&format!("  (Hamle {})", format_wind_speed(gust)));
    }
    lines.push(detail_row("Rüzgar", wind, theme));

    let mut pressure = format_pressure(current.pressure);
    if let Some(sea_level) = current.sea_level {
        pressure.push_str(&format!("  (Deniz {})", format_pressure(sea_level)));
    }
    lines.push(detail_row("Basınç", pressure, theme));

    lines.push(detail_row(
        "Görüş Mesafesi",
        current
            .visibility
            .map(format_visibility)
            .unwrap_or_else(|| "-".to_string()),
        theme,
    ));
    lines.push(detail_row(
        "Bulutluluk",
        format_percent(current.cloudiness),
        theme,
    ));

    let mut coordinates = format!("{:.2}, {:.2}", current.latitude, current.longitude);
    if let Some(country) = &current.country {
        coordinates.push_str(&format!("  ({})", country));
    }
    lines.push(detail_row("Koordinatlar", coordinates, theme));

    lines.push(Line::from(""));
    lines.push(section_header("Sıcaklık Detayları", theme));
    lines.push(detail_row(
        "Şu an",
        format_temperature(current.temperature),
        theme,
    ));
    lines.push(detail_row(
        "Hissedilen",
        format_temperature(current.feels_like),
        theme,
    ));
    lines.push(detail_row(
        "En yüksek",
        format_temperature(current.temperature_max),
        theme,
    ));
    lines.push(detail_row(
        "En düşük",
        format_temperature(current.temperature_min),
        theme,
    ));

    lines.push(Line::from(""));
    lines.push(section_header("Güneş", theme));
    let sun_time = |ts: Option<i64>| {
        ts.map(|t| format_time(t, current.timezone_offset))
            .unwrap_or_else(|| "-".to_string())
    };
    lines.push(detail_row("Doğuş", sun_time(current.sunrise), theme));
    lines.push(detail_row("Batış", sun_time(current.sunset), theme));

    lines.push(Line::from(""));
    lines.push(section_header("24 Saatlik Tahmin", theme));
    match forecast {
        Some(forecast) if !forecast.samples.is_empty() => {
            for entry in hourly_entries(&forecast.samples) {
                lines.push(hourly_line(&entry, forecast.timezone_offset, theme));
            }
        }
        _ => lines.push(empty_forecast_line(theme)),
    }

    lines.push(Line::from(""));
    lines.push(section_header("7 Günlük Tahmin", theme));
    match forecast {
        Some(forecast) if !forecast.samples.is_empty() => {
            for entry in daily_entries(&forecast.samples) {
                lines.push(daily_line(&entry, theme));
            }
        }
        _ => lines.push(empty_forecast_line(theme)),
    }

    lines
}

fn empty_forecast_line(theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        "  Tahmin verisi yok",
        Style::default().fg(theme.muted),
    ))
}

/// One hourly row: time, icon, temperature and rain chance when non-zero
fn hourly_line(entry: &ForecastEntry<'_>, timezone_offset: i64, theme: &Theme) -> Line<'static> {
    let sample = entry.sample;
    let mut spans = vec![
        Span::styled(
            format!("  {}  ", format_time(sample.timestamp, timezone_offset)),
            Style::default().fg(theme.muted),
        ),
        Span::raw(entry.presentation.icon),
        Span::styled(
            format!("  {:>4}", format_temperature(sample.temperature)),
            Style::default().fg(theme.text),
        ),
    ];

    let chance = rain_chance(sample.precipitation_probability);
    if chance > 0 {
        spans.push(Span::styled(
            format!("  %{}", chance),
            Style::default().fg(Color::LightBlue),
        ));
    }
    Line::from(spans)
}

/// One daily row: weekday, date, icon, description and max/min
fn daily_line(entry: &ForecastEntry<'_>, theme: &Theme) -> Line<'static> {
    let sample = entry.sample;
    Line::from(vec![
        Span::styled(
            format!(
                "  {:<4}{:<8}",
                format_weekday_short(sample.timestamp),
                format_day_month(sample.timestamp)
            ),
            Style::default().fg(theme.muted),
        ),
        Span::raw(entry.presentation.icon),
        Span::styled(
            format!("  {:<18}", capitalize_first(&sample.description)),
            Style::default().fg(theme.text),
        ),
        Span::styled(
            format!(
                "{} / {}",
                format_temperature(sample.temperature_max),
                format_temperature(sample.temperature_min)
            ),
            Style::default().fg(theme.text),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::data::fixtures::{current_weather, sample};
    use crate::data::{Location, WeatherClient};
    use ratatui::{backend::TestBackend, Terminal};

    /// 2024-07-15 00:00 UTC
    const DAY_START: i64 = 1_721_001_600;

    fn five_day_forecast() -> Forecast {
        let samples = (0..40)
            .map(|i| {
                let mut s = sample(DAY_START + i * 3 * 3600, "10d");
                s.temperature = 15.0 + (i % 8) as f64;
                s.precipitation_probability = if i == 1 { 0.47 } else { 0.0 };
                s
            })
            .collect();
        Forecast {
            city: "İstanbul".to_string(),
            timezone_offset: 10_800,
            samples,
        }
    }

    fn detail_app(forecast: Option<Forecast>) -> App {
        let mut app = App::new(
            WeatherClient::new("test-key"),
            Location::City("Istanbul".to_string()),
        );
        app.state = AppState::Detail;
        app.current = Some(current_weather());
        app.forecast = forecast;
        app
    }

    fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_detail_rows() {
        let theme = Theme::default();
        let lines = build_detail_lines(&current_weather(), None, &theme);
        let text: Vec<String> = lines.iter().map(line_text).collect();

        assert!(text.iter().any(|l| l.contains("Nem Oranı") && l.contains("%58")));
        assert!(text
            .iter()
            .any(|l| l.contains("19 km/h KD") && l.contains("Hamle 30 km/h")));
        assert!(text
            .iter()
            .any(|l| l.contains("1012 hPa") && l.contains("Deniz 1012 hPa")));
        assert!(text.iter().any(|l| l.contains("Görüş Mesafesi") && l.contains("10.0 km")));
        assert!(text.iter().any(|l| l.contains("Bulutluluk") && l.contains("%20")));
        assert!(text.iter().any(|l| l.contains("41.01, 28.95") && l.contains("(TR)")));
        assert!(text.iter().any(|l| l.contains("Doğuş") && l.contains("05:25")));
        assert!(text.iter().any(|l| l.contains("Batış") && l.contains("20:16")));
    }

    #[test]
    fn test_missing_forecast_shows_placeholder() {
        let theme = Theme::default();
        let lines = build_detail_lines(&current_weather(), None, &theme);
        let placeholders = lines
            .iter()
            .filter(|l| line_text(l).contains("Tahmin verisi yok"))
            .count();
        assert_eq!(placeholders, 2);
    }

    #[test]
    fn test_forecast_sections_use_views() {
        let theme = Theme::default();
        let forecast = five_day_forecast();
        let lines = build_detail_lines(&current_weather(), Some(&forecast), &theme);
        let text: Vec<String> = lines.iter().map(line_text).collect();

        let hourly_start = text
            .iter()
            .position(|l| l == "24 Saatlik Tahmin")
            .unwrap();
        let daily_start = text.iter().position(|l| l == "7 Günlük Tahmin").unwrap();

        // 24 hourly rows then a blank line
        assert_eq!(daily_start - hourly_start, 26);
        // One row per distinct UTC date in five days
        assert_eq!(text.len() - daily_start - 1, 5);

        // First hourly row is 03:00 local, second carries the rain chance
        assert!(text[hourly_start + 1].contains("03:00"));
        assert!(text[hourly_start + 2].contains("%47"));
        assert!(!text[hourly_start + 3].contains('%'));

        assert!(text[daily_start + 1].contains("Pzt"));
        assert!(text[daily_start + 1].contains("15 Tem"));
        assert!(text[daily_start + 5].contains("Cum"));
    }

    #[test]
    fn test_render_detail_screen() {
        let mut app = detail_app(Some(five_day_forecast()));
        let content = render_to_string(&mut app, 80, 30);

        assert!(content.contains("İstanbul"));
        assert!(content.contains("Az bulutlu"));
        assert!(content.contains("Sıcaklık eğrisi"));
        assert!(content.contains("Nem Oranı"));
    }

    #[test]
    fn test_render_without_data() {
        let mut app = detail_app(None);
        app.current = None;
        let content = render_to_string(&mut app, 80, 24);
        assert!(content.contains("Hava durumu verisi yok"));
    }

    #[test]
    fn test_scroll_offset_clamped_to_content() {
        let mut app = detail_app(Some(five_day_forecast()));
        app.detail_scroll_offset = u16::MAX;
        let _ = render_to_string(&mut app, 80, 30);

        let theme = Theme::default();
        let total = build_detail_lines(&current_weather(), app.forecast.as_ref(), &theme).len();
        // 30 rows minus borders, header, sparkline, status and help
        let visible = 30 - 2 - 2 - 1 - 1 - 1;
        assert_eq!(app.detail_scroll_offset as usize, total - visible);

        let content = render_to_string(&mut app, 80, 30);
        assert!(content.contains("7 Günlük Tahmin") || content.contains("Cum"));
    }

    #[test]
    fn test_scroll_hides_top_rows() {
        let mut app = detail_app(Some(five_day_forecast()));
        app.detail_scroll_offset = 10;
        let content = render_to_string(&mut app, 80, 30);
        assert!(!content.contains("Nem Oranı"));
    }
}
