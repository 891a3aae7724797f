//! Core domain types and logic: series data, the formula pipeline and its functions.

pub mod series;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod align;
pub mod value;
pub mod function;
pub mod evaluator;
pub mod formatter;
pub mod engine;
pub mod calculation;
pub mod config_validation;
pub mod error;
