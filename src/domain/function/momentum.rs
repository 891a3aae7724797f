//! MOMENTUM(n)[i] = V[i] - V[i-n]; null when i < n or either endpoint is null.

use crate::domain::error::EngineError;
use crate::domain::function::{ArgKind, Arguments, ResultKind, SeriesFunction};
use crate::domain::series::Series;
use crate::domain::value::EvaluationResult;

pub fn calculate_momentum(series: &Series, period: usize) -> Series {
    let values = series.values();
    let out = (0..values.len())
        .map(|i| {
            if i < period {
                return None;
            }
            Some(values[i]? - values[i - period]?)
        })
        .collect();
    series.with_values(out)
}

pub struct Momentum;

impl SeriesFunction for Momentum {
    fn name(&self) -> &'static str {
        "MOMENTUM"
    }

    fn params(&self) -> &'static [ArgKind] {
        &[ArgKind::Series, ArgKind::Periods]
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Series
    }

    fn summary(&self) -> &'static str {
        "difference against the value `periods` observations earlier"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        let series = args.series(0)?;
        let period = args.periods(1)?;
        Ok(EvaluationResult::SeriesValue(calculate_momentum(
            series, period,
        )))
    }
}
