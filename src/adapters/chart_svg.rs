//! SVG chart rendering for reports.
//!
//! Every function returns an owned `<svg>` string; nothing is shared between
//! calls, so concurrent report generation is safe.

use crate::domain::series::IndicatorSeries;
use crate::domain::simulator::{Trade, TradeAction};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 40.0;

struct Scale {
    min: f64,
    x_step: f64,
    y_per_unit: f64,
}

impl Scale {
    fn new(min: f64, max: f64, count: usize) -> Self {
        let range = max - min;
        Scale {
            min,
            x_step: if count > 1 {
                (WIDTH - 2.0 * PADDING) / (count - 1) as f64
            } else {
                0.0
            },
            y_per_unit: if range > 0.0 {
                (HEIGHT - 2.0 * PADDING) / range
            } else {
                0.0
            },
        }
    }

    fn x(&self, index: usize) -> f64 {
        PADDING + index as f64 * self.x_step
    }

    fn y(&self, value: f64) -> f64 {
        HEIGHT - PADDING - (value - self.min) * self.y_per_unit
    }
}

fn polyline(points: &[(usize, f64)], scale: &Scale, stroke: &str, dashed: bool) -> String {
    if points.len() < 2 {
        return String::new();
    }
    let coords: Vec<String> = points
        .iter()
        .map(|&(i, v)| format!("{:.1},{:.1}", scale.x(i), scale.y(v)))
        .collect();
    let dash = if dashed {
        " stroke-dasharray=\"6,4\""
    } else {
        ""
    };
    format!(
        "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"{} points=\"{}\"/>\n",
        stroke,
        dash,
        coords.join(" ")
    )
}

fn axes() -> String {
    format!(
        "<line x1=\"{p:.0}\" y1=\"{p:.0}\" x2=\"{p:.0}\" y2=\"{b:.0}\" stroke=\"#444\"/>\n\
         <line x1=\"{p:.0}\" y1=\"{b:.0}\" x2=\"{r:.0}\" y2=\"{b:.0}\" stroke=\"#444\"/>\n",
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING,
    )
}

fn svg_open() -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {WIDTH:.0} {HEIGHT:.0}\" \
         width=\"{WIDTH:.0}\" height=\"{HEIGHT:.0}\">\n<rect width=\"100%\" height=\"100%\" \
         fill=\"white\"/>\n"
    )
}

/// Close price with both moving averages and buy/sell markers.
pub fn render_price_chart(series: &IndicatorSeries, trades: &[Trade]) -> String {
    if series.is_empty() {
        return String::new();
    }

    let closes: Vec<f64> = series.points.iter().map(|p| p.close).collect();
    let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = Scale::new(min, max, series.len());

    let close_line: Vec<(usize, f64)> = closes.iter().copied().enumerate().collect();
    let short_line: Vec<(usize, f64)> = series
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.ma_short.map(|v| (i, v)))
        .collect();
    let long_line: Vec<(usize, f64)> = series
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.ma_long.map(|v| (i, v)))
        .collect();

    let mut svg = svg_open();
    svg.push_str(&axes());
    svg.push_str(&polyline(&close_line, &scale, "steelblue", false));
    svg.push_str(&polyline(&short_line, &scale, "orange", true));
    svg.push_str(&polyline(&long_line, &scale, "crimson", true));

    for trade in trades {
        let Ok(index) = series
            .points
            .binary_search_by(|p| p.date.cmp(&trade.date))
        else {
            continue;
        };
        let x = scale.x(index);
        let y = scale.y(trade.price);
        let marker = match trade.action {
            TradeAction::Buy => format!(
                "<polygon points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\" fill=\"green\"/>\n",
                x,
                y - 6.0,
                x - 5.0,
                y + 4.0,
                x + 5.0,
                y + 4.0
            ),
            TradeAction::Sell => format!(
                "<polygon points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\" fill=\"red\"/>\n",
                x,
                y + 6.0,
                x - 5.0,
                y - 4.0,
                x + 5.0,
                y - 4.0
            ),
        };
        svg.push_str(&marker);
    }

    svg.push_str("</svg>\n");
    svg
}

/// Portfolio value over the run.
pub fn render_value_chart(value_path: &[f64]) -> String {
    if value_path.is_empty() {
        return String::new();
    }

    let min = value_path.iter().copied().fold(f64::INFINITY, f64::min);
    let max = value_path.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = Scale::new(min, max, value_path.len());

    let line: Vec<(usize, f64)> = value_path.iter().copied().enumerate().collect();

    let mut svg = svg_open();
    svg.push_str(&axes());
    svg.push_str(&polyline(&line, &scale, "steelblue", false));
    svg.push_str("</svg>\n");
    svg
}
