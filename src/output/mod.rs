mod chart;
mod csv;
mod format;
mod json;
mod table;

pub(crate) use chart::{ChartOptions, TerminalCharts, render_chart};
pub(crate) use csv::{ExportFormat, write_export};
pub(crate) use format::NumberFormat;
pub(crate) use json::{summary_json, view_json, views_json};
pub(crate) use table::{TableOptions, TerminalTable, summary_line};
