//! Formula AST data structures.
//!
//! - `Node`: literals, series references, function calls and arithmetic
//! - `BinaryOperator`: the four arithmetic operators

use crate::domain::series::normalize_name;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    /// Apply to two present values. Division by zero yields `None`.
    pub fn apply(self, left: f64, right: f64) -> Option<f64> {
        match self {
            BinaryOperator::Add => Some(left + right),
            BinaryOperator::Subtract => Some(left - right),
            BinaryOperator::Multiply => Some(left * right),
            BinaryOperator::Divide if right == 0.0 => None,
            BinaryOperator::Divide => Some(left / right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(f64),
    SeriesRef(String),
    FunctionCall { name: String, args: Vec<Node> },
    BinaryOp {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryMinus(Box<Node>),
}

impl Node {
    pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Self {
        Node::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(name: &str, args: Vec<Node>) -> Self {
        Node::FunctionCall {
            name: name.to_string(),
            args,
        }
    }

    pub fn series(name: &str) -> Self {
        Node::SeriesRef(name.to_string())
    }

    /// Total number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        match self {
            Node::Literal(_) | Node::SeriesRef(_) => 1,
            Node::FunctionCall { args, .. } => 1 + args.iter().map(Node::node_count).sum::<usize>(),
            Node::BinaryOp { left, right, .. } => 1 + left.node_count() + right.node_count(),
            Node::UnaryMinus(inner) => 1 + inner.node_count(),
        }
    }

    /// Upper-cased names of every series referenced by the tree.
    pub fn series_refs(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_series_refs(&mut names);
        names
    }

    fn collect_series_refs(&self, names: &mut BTreeSet<String>) {
        match self {
            Node::Literal(_) => {}
            Node::SeriesRef(name) => {
                names.insert(normalize_name(name));
            }
            Node::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_series_refs(names);
                }
            }
            Node::BinaryOp { left, right, .. } => {
                left.collect_series_refs(names);
                right.collect_series_refs(names);
            }
            Node::UnaryMinus(inner) => inner.collect_series_refs(names),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(n) => write!(f, "{}", n),
            Node::SeriesRef(name) => write!(f, "{}", normalize_name(name)),
            Node::FunctionCall { name, args } => {
                write!(f, "{}(", normalize_name(name))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Node::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Node::UnaryMinus(inner) => write!(f, "-{}", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        // ROC(gdp, 4) - MA(cpi, 3) * 2
        Node::binary(
            BinaryOperator::Subtract,
            Node::call("ROC", vec![Node::series("gdp"), Node::Literal(4.0)]),
            Node::binary(
                BinaryOperator::Multiply,
                Node::call("ma", vec![Node::series("CPI"), Node::Literal(3.0)]),
                Node::Literal(2.0),
            ),
        )
    }

    #[test]
    fn node_count_counts_every_node() {
        assert_eq!(Node::Literal(1.0).node_count(), 1);
        assert_eq!(sample().node_count(), 9);
        assert_eq!(
            Node::UnaryMinus(Box::new(Node::series("A"))).node_count(),
            2
        );
    }

    #[test]
    fn series_refs_are_normalized_and_deduplicated() {
        let node = Node::binary(
            BinaryOperator::Add,
            Node::series("gdp"),
            Node::call("SUM", vec![Node::series("GDP"), Node::series("cpi")]),
        );
        let names: Vec<String> = node.series_refs().into_iter().collect();
        assert_eq!(names, vec!["CPI".to_string(), "GDP".to_string()]);
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(sample().to_string(), "(ROC(GDP, 4) - (MA(CPI, 3) * 2))");
        assert_eq!(
            Node::UnaryMinus(Box::new(Node::Literal(1.5))).to_string(),
            "-1.5"
        );
    }

    #[test]
    fn divide_by_zero_is_missing() {
        assert_eq!(BinaryOperator::Divide.apply(1.0, 0.0), None);
        assert_eq!(BinaryOperator::Divide.apply(1.0, 4.0), Some(0.25));
        assert_eq!(BinaryOperator::Subtract.apply(1.0, 4.0), Some(-3.0));
    }
}
