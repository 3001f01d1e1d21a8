//! Text charts for the terminal

use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::Write;

use crate::error::AppError;
use crate::output::format::{NumberFormat, format_decimal};
use crate::render::{Chart, ChartHandle, ChartKind, ChartSlot, ChartSurface};

const BAR_WIDTH: usize = 40;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Copy)]
pub(crate) struct ChartOptions {
    pub(crate) use_color: bool,
    pub(crate) number_format: NumberFormat,
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * BAR_WIDTH as f64).round() as usize;
    if cells == 0 {
        "▏".to_string()
    } else {
        "█".repeat(cells.min(BAR_WIDTH))
    }
}

fn sparkline(values: &[f64], max: f64) -> String {
    values
        .iter()
        .map(|&v| {
            if max <= 0.0 {
                SPARK_LEVELS[0]
            } else {
                let level = ((v / max) * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

fn paint(text: &str, use_color: bool) -> String {
    if use_color && !text.is_empty() {
        format!("\x1b[36m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

/// Render a chart as text: bars per label, with shares for pies and a sparkline for lines
pub(crate) fn render_chart(chart: &Chart, options: ChartOptions) -> String {
    let nf = options.number_format;
    let mut out = String::new();
    let _ = writeln!(out, "\n  {}\n", chart.title);

    if chart.kind == ChartKind::Line {
        let max = chart.max_value();
        let first = chart.labels.first().map_or("", String::as_str);
        let last = chart.labels.last().map_or("", String::as_str);
        let final_value = chart.values.last().copied().unwrap_or(0.0);
        let _ = writeln!(
            out,
            "  {}\n  {first} .. {last}  {} {}",
            paint(&sparkline(&chart.values, max), options.use_color),
            format_decimal(final_value, chart.precision, nf),
            chart.unit
        );
        return out;
    }

    let max = chart.max_value();
    let total = chart.total();
    let label_width = chart
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);

    for (label, &value) in chart.labels.iter().zip(&chart.values) {
        let pad = label_width - label.chars().count();
        let shown = format_decimal(value, chart.precision, nf);
        let bar = bar(value, max);
        let bar_pad = BAR_WIDTH.saturating_sub(bar.chars().count());
        let _ = write!(
            out,
            "  {label}{} │{}{} {shown} {}",
            " ".repeat(pad),
            paint(&bar, options.use_color),
            " ".repeat(bar_pad),
            chart.unit
        );
        if chart.kind == ChartKind::Pie && total > 0.0 {
            let _ = write!(out, " ({}%)", format_decimal(value / total * 100.0, 1, nf));
        }
        out.push('\n');
    }
    out
}

/// Chart surface that prints each chart as it is drawn and tracks live handles
pub(crate) struct TerminalCharts<W: Write> {
    out: W,
    options: ChartOptions,
    next_id: u64,
    live: HashSet<u64>,
}

impl<W: Write> TerminalCharts<W> {
    pub(crate) fn new(out: W, options: ChartOptions) -> Self {
        TerminalCharts {
            out,
            options,
            next_id: 0,
            live: HashSet::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl<W: Write> ChartSurface for TerminalCharts<W> {
    fn draw(&mut self, slot: ChartSlot, chart: &Chart) -> Result<ChartHandle, AppError> {
        let text = render_chart(chart, self.options);
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| AppError::Adapter {
                view: slot.name(),
                reason: e.to_string(),
            })?;
        self.next_id += 1;
        self.live.insert(self.next_id);
        Ok(ChartHandle(self.next_id))
    }

    fn release(&mut self, handle: ChartHandle) {
        if !self.live.remove(&handle.0) {
            tracing::debug!(handle = handle.0, "release of unknown chart handle");
        }
    }
}
