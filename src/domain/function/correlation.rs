//! Pearson correlation of two series over the dates where both have a value.

use crate::domain::align::intersect_present;
use crate::domain::error::EngineError;
use crate::domain::function::{ArgKind, Arguments, ResultKind, SeriesFunction, has_no_spread};
use crate::domain::series::Series;
use crate::domain::value::EvaluationResult;

const NAME: &str = "CORRELATION";

/// Pearson correlation coefficient of paired samples.
///
/// Returns `InsufficientData` for fewer than two pairs or when either side has zero
/// variance. The computation is symmetric in `x` and `y`.
pub fn pearson(pairs: &[(f64, f64)]) -> Result<f64, EngineError> {
    let n = pairs.len();
    if n < 2 {
        return Err(EngineError::insufficient(
            NAME,
            format!("need at least 2 aligned points, have {}", n),
        ));
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if has_no_spread(pairs.iter().map(|p| p.0), var_x)
        || has_no_spread(pairs.iter().map(|p| p.1), var_y)
    {
        return Err(EngineError::insufficient(NAME, "series has zero variance"));
    }

    Ok((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

pub fn calculate_correlation(a: &Series, b: &Series) -> Result<f64, EngineError> {
    let pairs: Vec<(f64, f64)> = intersect_present(a, b)
        .into_iter()
        .map(|(_, x, y)| (x, y))
        .collect();
    pearson(&pairs)
}

pub struct Correlation;

impl SeriesFunction for Correlation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn params(&self) -> &'static [ArgKind] {
        &[ArgKind::Series, ArgKind::Series]
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Scalar
    }

    fn summary(&self) -> &'static str {
        "Pearson correlation over dates where both series have values"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        let a = args.series(0)?;
        let b = args.series(1)?;
        Ok(EvaluationResult::Scalar(calculate_correlation(a, b)?))
    }
}
