//! Formula evaluation engine.
//!
//! Evaluates a parsed [`Node`] against a [`DataContext`] with a single post-order walk.
//!
//! # Evaluation Semantics
//!
//! - `Literal`: a scalar
//! - `SeriesRef`: case-insensitive lookup, `ReferenceError` when absent
//! - `FunctionCall`: arguments first, then registry lookup, argument binding, invocation
//! - Arithmetic: scalar/scalar is plain arithmetic (`DivisionByZeroError` on `/ 0`);
//!   anything involving a series goes elementwise through the aligner, where a zero
//!   divisor yields a null point

use crate::domain::align;
use crate::domain::ast::{BinaryOperator, Node};
use crate::domain::error::EngineError;
use crate::domain::function::{FunctionRegistry, bind_arguments};
use crate::domain::series::DataContext;
use crate::domain::value::EvaluationResult;

pub struct Evaluator<'a> {
    registry: &'a FunctionRegistry,
    context: &'a DataContext,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a FunctionRegistry, context: &'a DataContext) -> Self {
        Self { registry, context }
    }

    pub fn evaluate(&self, node: &Node) -> Result<EvaluationResult, EngineError> {
        match node {
            Node::Literal(n) => Ok(EvaluationResult::Scalar(*n)),
            Node::SeriesRef(name) => self
                .context
                .get(name)
                .cloned()
                .map(EvaluationResult::SeriesValue)
                .ok_or_else(|| EngineError::reference(name.as_str())),
            Node::FunctionCall { name, args } => self.evaluate_call(name, args),
            Node::BinaryOp { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                evaluate_binary(*op, &left, &right)
            }
            Node::UnaryMinus(inner) => match self.evaluate(inner)? {
                EvaluationResult::Scalar(v) => Ok(EvaluationResult::Scalar(-v)),
                EvaluationResult::SeriesValue(s) => {
                    Ok(EvaluationResult::SeriesValue(align::negate(&s)))
                }
            },
        }
    }

    fn evaluate_call(&self, name: &str, args: &[Node]) -> Result<EvaluationResult, EngineError> {
        let values = args
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let function = self
            .registry
            .get(name)
            .ok_or_else(|| EngineError::reference(name))?;
        let bound = bind_arguments(function, &values)?;
        function.evaluate(&bound)
    }
}

pub fn evaluate_binary(
    op: BinaryOperator,
    left: &EvaluationResult,
    right: &EvaluationResult,
) -> Result<EvaluationResult, EngineError> {
    use EvaluationResult::{Scalar, SeriesValue};

    match (left, right) {
        (Scalar(l), Scalar(r)) => op
            .apply(*l, *r)
            .map(Scalar)
            .ok_or(EngineError::DivisionByZero),
        (SeriesValue(l), Scalar(r)) => Ok(SeriesValue(align::combine_series_scalar(op, l, *r))),
        (Scalar(l), SeriesValue(r)) => Ok(SeriesValue(align::combine_scalar_series(op, *l, r))),
        (SeriesValue(l), SeriesValue(r)) => Ok(SeriesValue(align::combine_series(op, l, r))),
    }
}
