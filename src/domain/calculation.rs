//! Named calculation definitions.
//!
//! A definition pairs formula text with its declared output shape and the set of series
//! it references. Evaluating one resolves each referenced series through a
//! [`SeriesResolver`] into a fresh [`DataContext`] and runs the engine.

use crate::domain::engine::Engine;
use crate::domain::error::EconcalcError;
use crate::domain::formatter::{Output, OutputType};
use crate::domain::series::DataContext;
use crate::ports::series_port::SeriesResolver;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationDefinition {
    pub formula: String,
    pub series_names: BTreeSet<String>,
    pub output_type: OutputType,
}

impl CalculationDefinition {
    /// Validate the formula's syntax and record the series it references.
    pub fn new(
        engine: &Engine,
        formula: &str,
        output_type: OutputType,
    ) -> Result<Self, EconcalcError> {
        let node = engine.parse(formula)?;
        Ok(Self {
            formula: formula.to_string(),
            series_names: node.series_refs(),
            output_type,
        })
    }

    /// Resolve every referenced series. Unknown names are left out so the engine
    /// reports them as reference errors.
    pub fn build_context(&self, resolver: &dyn SeriesResolver) -> Result<DataContext, EconcalcError> {
        let mut context = DataContext::new();
        for name in &self.series_names {
            match resolver.resolve(name)? {
                Some(series) => {
                    debug!(name = %name, points = series.len(), "resolved series");
                    context.insert(name, series);
                }
                None => debug!(name = %name, "series not found"),
            }
        }
        Ok(context)
    }

    pub fn evaluate(
        &self,
        engine: &Engine,
        resolver: &dyn SeriesResolver,
        as_of: NaiveDate,
    ) -> Result<Output, EconcalcError> {
        let context = self.build_context(resolver)?;
        Ok(engine.run(&self.formula, &context, self.output_type, as_of)?)
    }
}
