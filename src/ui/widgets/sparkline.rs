//! Temperature sparkline widget for the hourly forecast

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different temperatures (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline of temperatures scaled between their own minimum and maximum
pub struct TemperatureSparkline<'a> {
    /// Temperature for each forecast sample
    temperatures: &'a [f64],
    /// Lowest temperature in the series
    min: f64,
    /// Highest temperature in the series
    max: f64,
    /// Index drawn with the highlight style
    highlight: Option<usize>,
    /// Style for the sparkline
    style: Style,
    /// Style for the highlighted sample
    highlight_style: Style,
}

impl<'a> TemperatureSparkline<'a> {
    pub fn new(temperatures: &'a [f64]) -> Self {
        let (min, max) = temperatures
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
                (lo.min(*t), hi.max(*t))
            });

        Self {
            temperatures,
            min,
            max,
            highlight: None,
            style: Style::default().fg(Color::LightRed),
            highlight_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn highlight(mut self, index: usize) -> Self {
        self.highlight = Some(index);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn temperature_to_block(&self, temperature: f64) -> char {
        let range = self.max - self.min;
        if !range.is_finite() || range <= f64::EPSILON {
            // Flat series sits in the middle
            return BLOCKS[3];
        }
        let normalized = ((temperature - self.min) / range).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for TemperatureSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;

        for (i, temperature) in self.temperatures.iter().take(width).enumerate() {
            let block = self.temperature_to_block(*temperature);
            let x = area.x + i as u16;
            let y = area.y;

            let style = if self.highlight == Some(i) {
                self.highlight_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}
