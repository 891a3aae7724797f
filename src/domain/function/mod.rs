//! Built-in function registry.
//!
//! Every function is a unit struct implementing [`SeriesFunction`], declaring its
//! parameter kinds and result kind. The registry is a read-only name → function map
//! built once per process from the static [`BUILTINS`] table.
//!
//! - `aggregate`: SUM, AVG, MIN, MAX, COUNT
//! - `roc`, `momentum`, `ma`, `rsi`: period-based indicators producing series
//! - `correlation`: Pearson correlation of two series
//! - `regression`: least-squares trend line

pub mod aggregate;
pub mod correlation;
pub mod ma;
pub mod momentum;
pub mod regression;
pub mod roc;
pub mod rsi;

use crate::domain::error::EngineError;
use crate::domain::series::{Series, normalize_name};
use crate::domain::value::EvaluationResult;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Series,
    /// A positive integer scalar.
    Periods,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Series => write!(f, "series"),
            ArgKind::Periods => write!(f, "periods"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Scalar,
    Series,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::Scalar => write!(f, "scalar"),
            ResultKind::Series => write!(f, "series"),
        }
    }
}

/// A type-checked argument.
#[derive(Debug, Clone, Copy)]
pub enum Argument<'a> {
    Series(&'a Series),
    Periods(usize),
}

/// Arguments that already matched a function's declared parameters.
#[derive(Debug)]
pub struct Arguments<'a> {
    function: &'static str,
    values: Vec<Argument<'a>>,
}

impl<'a> Arguments<'a> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn series(&self, index: usize) -> Result<&'a Series, EngineError> {
        match self.values.get(index) {
            Some(Argument::Series(s)) => Ok(*s),
            _ => Err(EngineError::type_error(format!(
                "argument {} of {} must be a series",
                index + 1,
                self.function
            ))),
        }
    }

    pub fn periods(&self, index: usize) -> Result<usize, EngineError> {
        match self.values.get(index) {
            Some(Argument::Periods(n)) => Ok(*n),
            _ => Err(EngineError::type_error(format!(
                "argument {} of {} must be a positive integer",
                index + 1,
                self.function
            ))),
        }
    }
}

pub trait SeriesFunction: Send + Sync {
    fn name(&self) -> &'static str;
    fn params(&self) -> &'static [ArgKind];
    fn returns(&self) -> ResultKind;
    fn summary(&self) -> &'static str;
    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError>;

    /// Human-readable signature, e.g. `ROC(series, periods) -> series`.
    fn signature(&self) -> String {
        let params: Vec<String> = self.params().iter().map(|p| p.to_string()).collect();
        format!("{}({}) -> {}", self.name(), params.join(", "), self.returns())
    }
}

pub static BUILTINS: [&dyn SeriesFunction; 11] = [
    &aggregate::Sum,
    &aggregate::Avg,
    &aggregate::Min,
    &aggregate::Max,
    &aggregate::Count,
    &roc::Roc,
    &ma::Ma,
    &rsi::Rsi,
    &momentum::Momentum,
    &correlation::Correlation,
    &regression::Regression,
];

static REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::new);

pub struct FunctionRegistry {
    functions: HashMap<&'static str, &'static dyn SeriesFunction>,
}

impl FunctionRegistry {
    /// Create a registry holding every built-in function.
    pub fn new() -> Self {
        let functions = BUILTINS.iter().map(|f| (f.name(), *f)).collect();
        Self { functions }
    }

    /// The shared process-wide registry.
    pub fn builtin() -> &'static FunctionRegistry {
        &REGISTRY
    }

    /// Look up a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&'static dyn SeriesFunction> {
        self.functions.get(normalize_name(name).as_str()).copied()
    }

    /// Registered functions sorted by name.
    pub fn functions(&self) -> Vec<&'static dyn SeriesFunction> {
        let mut all: Vec<_> = self.functions.values().copied().collect();
        all.sort_by_key(|f| f.name());
        all
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check evaluated arguments against a function's declared parameters.
pub fn bind_arguments<'a>(
    function: &dyn SeriesFunction,
    values: &'a [EvaluationResult],
) -> Result<Arguments<'a>, EngineError> {
    let params = function.params();
    if values.len() != params.len() {
        return Err(EngineError::type_error(format!(
            "{} expects {} argument{}, got {}",
            function.signature(),
            params.len(),
            if params.len() == 1 { "" } else { "s" },
            values.len()
        )));
    }

    let mut bound = Vec::with_capacity(values.len());
    for (i, (param, value)) in params.iter().zip(values).enumerate() {
        let arg = match (param, value) {
            (ArgKind::Series, EvaluationResult::SeriesValue(s)) => Argument::Series(s),
            (ArgKind::Periods, EvaluationResult::Scalar(v)) => {
                Argument::Periods(to_periods(*v).ok_or_else(|| {
                    EngineError::type_error(format!(
                        "argument {} of {} must be a positive integer, got {}",
                        i + 1,
                        function.name(),
                        v
                    ))
                })?)
            }
            (expected, actual) => {
                return Err(EngineError::type_error(format!(
                    "argument {} of {} must be {}, got a {}",
                    i + 1,
                    function.name(),
                    match expected {
                        ArgKind::Series => "a series",
                        ArgKind::Periods => "a positive integer",
                    },
                    actual.kind_name()
                )));
            }
        };
        bound.push(arg);
    }

    Ok(Arguments {
        function: function.name(),
        values: bound,
    })
}

/// True when `values` have no usable spread: every value is equal, or `sum_sq_dev`
/// (the summed squared deviation from the mean) is within rounding noise of zero.
pub(crate) fn has_no_spread(values: impl IntoIterator<Item = f64>, sum_sq_dev: f64) -> bool {
    let mut values = values.into_iter();
    let Some(first) = values.next() else {
        return true;
    };
    let (mut n, mut sum_sq, mut all_equal) = (1usize, first * first, true);
    for v in values {
        n += 1;
        sum_sq += v * v;
        all_equal &= v == first;
    }
    all_equal || sum_sq_dev <= n as f64 * f64::EPSILON * f64::EPSILON * sum_sq
}

fn to_periods(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 {
        Some(value as usize)
    } else {
        None
    }
}
