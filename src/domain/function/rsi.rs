//! RSI (Relative Strength Index).
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Missing observations are skipped: changes are taken between consecutive present
//! values and the result is null wherever the input is null. Warmup: the first n
//! present values produce null.

use crate::domain::error::EngineError;
use crate::domain::function::{ArgKind, Arguments, ResultKind, SeriesFunction};
use crate::domain::series::Series;
use crate::domain::value::EvaluationResult;

/// Wilder RSI over a dense slice of values; `None` during warmup.
pub fn wilder_rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let gain = |c: f64| if c > 0.0 { c } else { 0.0 };
    let loss = |c: f64| if c < 0.0 { -c } else { 0.0 };

    let mut avg_gain = changes[..period].iter().map(|&c| gain(c)).sum::<f64>() / period as f64;
    let mut avg_loss = changes[..period].iter().map(|&c| loss(c)).sum::<f64>() / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in period + 1..values.len() {
        let change = changes[i - 1];
        avg_gain = (avg_gain * (period - 1) as f64 + gain(change)) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss(change)) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        (100.0 - (100.0 / (1.0 + avg_gain / avg_loss))).clamp(0.0, 100.0)
    }
}

pub fn calculate_rsi(series: &Series, period: usize) -> Series {
    let present: Vec<(usize, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(i, o)| o.value.map(|v| (i, v)))
        .collect();
    let dense: Vec<f64> = present.iter().map(|&(_, v)| v).collect();

    let mut out = vec![None; series.len()];
    for (&(index, _), rsi) in present.iter().zip(wilder_rsi(&dense, period)) {
        out[index] = rsi;
    }
    series.with_values(out)
}

pub struct Rsi;

impl SeriesFunction for Rsi {
    fn name(&self) -> &'static str {
        "RSI"
    }

    fn params(&self) -> &'static [ArgKind] {
        &[ArgKind::Series, ArgKind::Periods]
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Series
    }

    fn summary(&self) -> &'static str {
        "Wilder-smoothed relative strength index"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        let series = args.series(0)?;
        let period = args.periods(1)?;
        Ok(EvaluationResult::SeriesValue(calculate_rsi(series, period)))
    }
}
