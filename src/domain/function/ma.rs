//! MA (Simple Moving Average).
//!
//! MA(n)[i] = mean of the non-null values in V[i-n+1..=i].
//! Warmup: first (n-1) points are null. A window with no non-null member is null.

use crate::domain::error::EngineError;
use crate::domain::function::{ArgKind, Arguments, ResultKind, SeriesFunction};
use crate::domain::series::Series;
use crate::domain::value::EvaluationResult;

pub fn calculate_ma(series: &Series, period: usize) -> Series {
    let values = series.values();
    let warmup = period.saturating_sub(1);

    let out = (0..values.len())
        .map(|i| {
            if i < warmup {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            let (sum, n) = window
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
            if n == 0 { None } else { Some(sum / n as f64) }
        })
        .collect();
    series.with_values(out)
}

pub struct Ma;

impl SeriesFunction for Ma {
    fn name(&self) -> &'static str {
        "MA"
    }

    fn params(&self) -> &'static [ArgKind] {
        &[ArgKind::Series, ArgKind::Periods]
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Series
    }

    fn summary(&self) -> &'static str {
        "simple moving average over a trailing window of `periods` observations"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        let series = args.series(0)?;
        let period = args.periods(1)?;
        Ok(EvaluationResult::SeriesValue(calculate_ma(series, period)))
    }
}
