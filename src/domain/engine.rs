//! Engine facade: `Text → Tokenized → Parsed → Evaluated → Formatted`.
//!
//! Each call is one-shot: a fresh AST is built, checked against the node ceiling,
//! evaluated and discarded. The engine holds no mutable state and can be shared
//! across threads.

use crate::domain::ast::Node;
use crate::domain::error::EngineError;
use crate::domain::evaluator::Evaluator;
use crate::domain::formatter::{Output, OutputType, format_result};
use crate::domain::function::FunctionRegistry;
use crate::domain::lexer::tokenize;
use crate::domain::parser::parse_tokens;
use crate::domain::series::DataContext;
use crate::domain::value::EvaluationResult;
use chrono::NaiveDate;
use tracing::debug;

pub const DEFAULT_MAX_NODES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Formulas with more AST nodes than this fail with `ComplexityLimitError`.
    pub max_nodes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    registry: &'static FunctionRegistry,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: FunctionRegistry::builtin(),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn registry(&self) -> &'static FunctionRegistry {
        self.registry
    }

    /// Tokenize and parse `formula`, enforcing the node ceiling.
    pub fn parse(&self, formula: &str) -> Result<Node, EngineError> {
        let tokens = tokenize(formula)?;
        debug!(tokens = tokens.len(), "tokenized formula");

        let node = parse_tokens(tokens)?;
        let nodes = node.node_count();
        debug!(nodes, "parsed formula");

        if nodes > self.config.max_nodes {
            return Err(EngineError::ComplexityLimit {
                nodes,
                limit: self.config.max_nodes,
            });
        }
        Ok(node)
    }

    /// Parse and evaluate `formula` against `context`.
    pub fn evaluate(
        &self,
        formula: &str,
        context: &DataContext,
    ) -> Result<EvaluationResult, EngineError> {
        let node = self.parse(formula)?;
        let result = Evaluator::new(self.registry, context).evaluate(&node)?;
        debug!(kind = result.kind_name(), "evaluated formula");
        Ok(result)
    }

    /// Full pipeline. `as_of` dates a scalar wrapped into a series output.
    pub fn run(
        &self,
        formula: &str,
        context: &DataContext,
        output_type: OutputType,
        as_of: NaiveDate,
    ) -> Result<Output, EngineError> {
        let result = self.evaluate(formula, context)?;
        let output = format_result(result, output_type, as_of)?;
        debug!(%output_type, "formatted output");
        Ok(output)
    }

    /// [`Engine::run`] dated at the current local day.
    pub fn run_today(
        &self,
        formula: &str,
        context: &DataContext,
        output_type: OutputType,
    ) -> Result<Output, EngineError> {
        let today = chrono::Local::now().date_naive();
        self.run(formula, context, output_type, today)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use crate::domain::series::Series;

    fn d(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, 1).unwrap()
    }

    fn context() -> DataContext {
        let gdp = Series::from_points((1..=10).map(|m| (d(m), Some(99.0 + m as f64)))).unwrap();
        DataContext::new().with_series("GDP_US", gdp)
    }

    #[test]
    fn default_ceiling() {
        assert_eq!(Engine::default().config().max_nodes, 500);
    }

    #[test]
    fn ceiling_rejects_large_formulas() {
        let engine = Engine::new(EngineConfig { max_nodes: 5 });
        // 3 literals + 2 binary ops
        assert!(engine.parse("1 + 2 + 3").is_ok());
        let err = engine.parse("1 + 2 + 3 + 4").unwrap_err();
        assert_eq!(
            err,
            EngineError::ComplexityLimit {
                nodes: 7,
                limit: 5
            }
        );
    }

    #[test]
    fn ceiling_checked_before_evaluation() {
        // would be a ReferenceError if evaluation started
        let engine = Engine::new(EngineConfig { max_nodes: 3 });
        let err = engine
            .evaluate("SUM(MISSING) + SUM(MISSING)", &DataContext::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ComplexityLimitError);
    }

    #[test]
    fn run_scalar() {
        let out = Engine::default()
            .run("AVG(GDP_US)", &context(), OutputType::Scalar, d(12))
            .unwrap();
        assert_eq!(out, Output::Scalar { value: 104.5 });
    }

    #[test]
    fn run_scalar_as_series_uses_as_of() {
        let out = Engine::default()
            .run("COUNT(GDP_US)", &context(), OutputType::Series, d(12))
            .unwrap();
        assert_eq!(
            out,
            Output::Series {
                points: vec![(d(12), Some(10.0))]
            }
        );
    }

    #[test]
    fn run_propagates_syntax_errors() {
        let err = Engine::default()
            .run("ROC(GDP_US, 4", &context(), OutputType::Series, d(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert_eq!(err.position(), Some(13));
    }

    #[test]
    fn run_today_wraps_with_a_date() {
        let out = Engine::default()
            .run_today("1 + 1", &DataContext::new(), OutputType::Series)
            .unwrap();
        match out {
            Output::Series { points } => {
                assert_eq!(points.len(), 1);
                assert_eq!(points[0].1, Some(2.0));
            }
            other => panic!("expected series, got {:?}", other),
        }
    }
}
