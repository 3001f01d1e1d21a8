//! Chart specs built from derived views

use crate::consts::DATE_FORMAT;
use crate::core::{BookSlice, CumulativeTotal, DayTotal, WeekdayTotal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ChartSlot {
    Distribution,
    Daily,
    Cumulative,
    Weekday,
}

impl ChartSlot {
    #[cfg(test)]
    pub(crate) const ALL: [ChartSlot; 4] = [
        ChartSlot::Distribution,
        ChartSlot::Daily,
        ChartSlot::Cumulative,
        ChartSlot::Weekday,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ChartSlot::Distribution => 0,
            ChartSlot::Daily => 1,
            ChartSlot::Cumulative => 2,
            ChartSlot::Weekday => 3,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            ChartSlot::Distribution => "distribution",
            ChartSlot::Daily => "daily",
            ChartSlot::Cumulative => "cumulative",
            ChartSlot::Weekday => "weekday",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChartKind {
    Pie,
    Bar,
    Line,
}

/// Labels plus one numeric series of the same length
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Chart {
    pub(crate) kind: ChartKind,
    pub(crate) title: &'static str,
    pub(crate) unit: &'static str,
    /// Decimal places shown for values
    pub(crate) precision: usize,
    pub(crate) labels: Vec<String>,
    pub(crate) values: Vec<f64>,
}

impl Chart {
    fn new(
        kind: ChartKind,
        title: &'static str,
        unit: &'static str,
        precision: usize,
        points: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        let (labels, values): (Vec<String>, Vec<f64>) = points.into_iter().unzip();
        Chart {
            kind,
            title,
            unit,
            precision,
            labels,
            values,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    pub(crate) fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Time by book; zero-duration books get no slice
pub(crate) fn distribution_chart(slices: &[BookSlice]) -> Option<Chart> {
    let chart = Chart::new(
        ChartKind::Pie,
        "Time by Book",
        "h",
        2,
        slices
            .iter()
            .filter(|s| s.hours > 0.0)
            .map(|s| (s.title.clone(), s.hours)),
    );
    (!chart.is_empty()).then_some(chart)
}

pub(crate) fn daily_chart(days: &[DayTotal]) -> Option<Chart> {
    let chart = Chart::new(
        ChartKind::Bar,
        "Hours Read",
        "h",
        1,
        days.iter()
            .map(|d| (d.day.format(DATE_FORMAT).to_string(), d.hours)),
    );
    (!chart.is_empty()).then_some(chart)
}

pub(crate) fn cumulative_chart(days: &[CumulativeTotal]) -> Option<Chart> {
    let chart = Chart::new(
        ChartKind::Line,
        "Cumulative Minutes Read",
        "min",
        0,
        days.iter()
            .map(|d| (d.day.format(DATE_FORMAT).to_string(), d.minutes)),
    );
    (!chart.is_empty()).then_some(chart)
}

/// Always seven bars once anything was read; nothing when every weekday is zero
pub(crate) fn weekday_chart(weekdays: &[WeekdayTotal; 7]) -> Option<Chart> {
    if weekdays.iter().all(|w| w.hours == 0.0) {
        return None;
    }
    Some(Chart::new(
        ChartKind::Bar,
        "Hours Read by Weekday",
        "h",
        1,
        weekdays.iter().map(|w| (w.label.to_string(), w.hours)),
    ))
}
