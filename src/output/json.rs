use serde::Serialize;
use serde_json::json;

use crate::core::ViewState;
use crate::render::Views;

fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Every view plus the parameters that produced it
pub(crate) fn views_json(views: &Views, state: &ViewState) -> Result<String, serde_json::Error> {
    pretty(&json!({
        "view": {
            "sort": state.sort_key().column(),
            "ascending": state.ascending(),
            "min_seconds": state.threshold_secs(),
        },
        "summary": summary_value(views.summary_seconds),
        "books": views.books,
        "distribution": views.distribution,
        "daily": views.daily,
        "cumulative": views.cumulative,
        "weekday": views.weekday,
    }))
}

fn summary_value(total_seconds: i64) -> serde_json::Value {
    json!({
        "total_read_time": total_seconds,
        "hours": total_seconds as f64 / 3600.0,
    })
}

pub(crate) fn summary_json(total_seconds: i64) -> Result<String, serde_json::Error> {
    pretty(&summary_value(total_seconds))
}

/// Any single view serialized as-is
pub(crate) fn view_json<T: Serialize + ?Sized>(rows: &T) -> Result<String, serde_json::Error> {
    pretty(rows)
}
