//! Series alignment for binary operations.
//!
//! Combining two series works on the intersection of their dates, ascending. A scalar
//! combined with a series is broadcast across every date of the series. Missing values
//! stay missing.

use crate::domain::ast::BinaryOperator;
use crate::domain::series::{Observation, Series};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// One date present in both series, with both (possibly missing) values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedPair {
    pub date: NaiveDate,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

/// Dates present in both series, ascending. Both inputs are sorted, so a merge walk
/// suffices.
pub fn intersect(left: &Series, right: &Series) -> Vec<AlignedPair> {
    let (a, b) = (left.observations(), right.observations());
    let mut pairs = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                pairs.push(AlignedPair {
                    date: a[i].date,
                    left: a[i].value,
                    right: b[j].value,
                });
                i += 1;
                j += 1;
            }
        }
    }
    pairs
}

/// Value pairs on dates where both series have a value.
pub fn intersect_present(left: &Series, right: &Series) -> Vec<(NaiveDate, f64, f64)> {
    intersect(left, right)
        .into_iter()
        .filter_map(|p| Some((p.date, p.left?, p.right?)))
        .collect()
}

/// Elementwise `left op right` over the date intersection.
pub fn combine_series(op: BinaryOperator, left: &Series, right: &Series) -> Series {
    let observations = intersect(left, right)
        .into_iter()
        .map(|p| Observation {
            date: p.date,
            value: apply(op, p.left, p.right),
        })
        .collect();
    Series::from_sorted(observations)
}

/// `series op scalar` on every date of the series.
pub fn combine_series_scalar(op: BinaryOperator, series: &Series, scalar: f64) -> Series {
    series.with_values(
        series
            .iter()
            .map(|o| apply(op, o.value, Some(scalar)))
            .collect(),
    )
}

/// `scalar op series` on every date of the series.
pub fn combine_scalar_series(op: BinaryOperator, scalar: f64, series: &Series) -> Series {
    series.with_values(
        series
            .iter()
            .map(|o| apply(op, Some(scalar), o.value))
            .collect(),
    )
}

/// Negate every present value.
pub fn negate(series: &Series) -> Series {
    series.with_values(series.iter().map(|o| o.value.map(|v| -v)).collect())
}

fn apply(op: BinaryOperator, left: Option<f64>, right: Option<f64>) -> Option<f64> {
    op.apply(left?, right?)
}
