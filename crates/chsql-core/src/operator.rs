//! Filter operators and the registry that resolves them by mnemonic.
//!
//! A filter key is either a bare field name or `field__mnemonic`. The
//! mnemonic picks an [`Operator`] which renders the final condition from the
//! field name and the already-escaped literal.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Mnemonic used when a filter key has no separator.
pub const DEFAULT_OPERATOR: &str = "exact";

/// Separator between the field name and the mnemonic in a filter key.
pub const SEPARATOR: &str = "__";

/// Renders a single parenthesized condition.
///
/// `value` is a literal produced by the value mapper and must be emitted
/// as-is.
pub trait Operator: Send + Sync {
    /// Returns the condition for `field` compared against `value`.
    fn to_sql(&self, field: &str, value: &str) -> String;
}

impl<F> Operator for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn to_sql(&self, field: &str, value: &str) -> String {
        self(field, value)
    }
}

/// Comparison operators registered by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (=)
    Eq,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
        }
    }
}

impl Operator for CompareOp {
    fn to_sql(&self, field: &str, value: &str) -> String {
        format!("({field} {self} {value})")
    }
}

/// An infix operator given by its SQL token, e.g. `!=` or `LIKE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleOperator {
    sql_operator: String,
}

impl SimpleOperator {
    /// Creates an operator rendering `(field {sql_operator} value)`.
    #[must_use]
    pub fn new(sql_operator: impl Into<String>) -> Self {
        Self {
            sql_operator: sql_operator.into(),
        }
    }
}

impl Operator for SimpleOperator {
    fn to_sql(&self, field: &str, value: &str) -> String {
        format!("({field} {} {value})", self.sql_operator)
    }
}

/// Splits a filter key into `(field, mnemonic)`.
///
/// Only the first separator is recognized. Field names containing `__` are
/// not supported: everything after the first separator is taken as the
/// mnemonic, which then fails lookup.
#[must_use]
pub fn split_key(key: &str) -> (&str, &str) {
    key.split_once(SEPARATOR).unwrap_or((key, DEFAULT_OPERATOR))
}

/// Mapping from mnemonic to operator.
///
/// Populate it with [`OperatorRegistry::register`] at startup, then share it
/// behind an `Arc`. Lookups never mutate it.
#[derive(Clone)]
pub struct OperatorRegistry {
    operators: BTreeMap<String, Arc<dyn Operator>>,
}

impl OperatorRegistry {
    /// Creates a registry with no operators.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            operators: BTreeMap::new(),
        }
    }

    /// Creates a registry with `exact`, `lt`, `lte`, `gt` and `gte`.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .register(DEFAULT_OPERATOR, CompareOp::Eq)
            .register("lt", CompareOp::Lt)
            .register("lte", CompareOp::Lte)
            .register("gt", CompareOp::Gt)
            .register("gte", CompareOp::Gte);
        registry
    }

    /// Registers an operator under `name`, replacing any previous one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        operator: impl Operator + 'static,
    ) -> &mut Self {
        self.operators.insert(name.into(), Arc::new(operator));
        self
    }

    /// Builder-style variant of [`OperatorRegistry::register`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, operator: impl Operator + 'static) -> Self {
        self.register(name, operator);
        self
    }

    /// Looks up an operator by mnemonic.
    pub fn get(&self, name: &str) -> Result<&dyn Operator> {
        self.operators
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| Error::UnknownOperator(String::from(name)))
    }

    /// Returns whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// Returns the registered mnemonics in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    /// Renders the condition for a filter key and an escaped literal.
    pub fn condition(&self, key: &str, literal: &str) -> Result<String> {
        let (field, mnemonic) = split_key(key);
        Ok(self.get(mnemonic)?.to_sql(field, literal))
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
