//! Rolling-window descriptive statistics over one metric's sample series.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::metrics::MetricSample;

/// Statistics for one metric over one trailing window. Every statistic is
/// optional: absence means the window held too little data to compute it,
/// never that it was zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowStats {
    /// Window length in days.
    pub days: i64,
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub std: Option<f64>,
    /// Ordinary-least-squares slope of value against elapsed days since the
    /// window's earliest included sample. Absent with fewer than 2 samples
    /// or zero time-variance.
    pub slope_per_day: Option<f64>,
    /// Percentage of ranged samples outside their reference range. Absent
    /// when no in-window sample carries a range.
    pub out_of_range_pct: Option<f64>,
    /// Days since the most recent in-range sample. Absent if never in range
    /// or no range data.
    pub time_since_last_normal_days: Option<f64>,
    /// Days since the most recent sample in the window, falling back to the
    /// most recent sample at or before `now` in the full series when the
    /// window is empty.
    pub days_since_last: Option<f64>,
}

/// Fractional days from `earlier` to `later`.
pub(crate) fn days_between(later: NaiveDateTime, earlier: NaiveDateTime) -> f64 {
    (later - earlier).num_seconds() as f64 / 86_400.0
}

/// Compute stats for one window over a series sorted ascending by timestamp.
/// The full series is passed so an empty window can still report
/// `days_since_last` from the most recent non-future sample overall.
pub(crate) fn compute_window_stats(
    series: &[MetricSample],
    days: i64,
    now: NaiveDateTime,
) -> WindowStats {
    let cutoff = now - Duration::days(days);
    // The window is [now - days, now]; future-dated samples (data-entry
    // errors) never enter any statistic.
    let window: Vec<&MetricSample> = series
        .iter()
        .filter(|s| s.taken_at >= cutoff && s.taken_at <= now)
        .collect();

    if window.is_empty() {
        return WindowStats {
            days,
            count: 0,
            mean: None,
            min: None,
            max: None,
            std: None,
            slope_per_day: None,
            out_of_range_pct: None,
            time_since_last_normal_days: None,
            days_since_last: series
                .iter()
                .rev()
                .find(|s| s.taken_at <= now)
                .map(|s| days_between(now, s.taken_at)),
        };
    }

    let days_since_last = window.last().map(|s| days_between(now, s.taken_at));

    let values: Vec<f64> = window.iter().map(|s| s.value).collect();
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    let std = variance.sqrt();

    let slope_per_day = ols_slope_per_day(&window);

    let ranged: Vec<&&MetricSample> = window.iter().filter(|s| s.has_range()).collect();
    let out_of_range_pct = if ranged.is_empty() {
        None
    } else {
        let out = ranged.iter().filter(|s| s.in_range() == Some(false)).count();
        Some(100.0 * out as f64 / ranged.len() as f64)
    };

    // Most recent in-range sample, scanning backward in time.
    let time_since_last_normal_days = ranged
        .iter()
        .rev()
        .find(|s| s.in_range() == Some(true))
        .map(|s| days_between(now, s.taken_at));

    WindowStats {
        days,
        count,
        mean: Some(mean),
        min: Some(min),
        max: Some(max),
        std: Some(std),
        slope_per_day,
        out_of_range_pct,
        time_since_last_normal_days,
        days_since_last,
    }
}

/// OLS slope of value vs. elapsed days from the first in-window sample.
/// `None` when underdetermined (<2 points or zero x-variance); never NaN or
/// infinite.
fn ols_slope_per_day(window: &[&MetricSample]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let origin = window[0].taken_at;
    let points: Vec<(f64, f64)> = window
        .iter()
        .map(|s| (days_between(s.taken_at, origin), s.value))
        .collect();

    let n = points.len() as f64;
    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let denom: f64 = points.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
    if denom == 0.0 {
        return None;
    }
    let numer: f64 = points.iter().map(|(x, y)| (x - x_mean) * (y - y_mean)).sum();

    let slope = numer / denom;
    slope.is_finite().then_some(slope)
}
