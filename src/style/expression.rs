//! Style expressions evaluated against feature properties.
//!
//! Covers the operators the map uses in filters and data-driven paint:
//! `get`, `has`, `!has`, `!`, `all`, `any`, `==`, `!=`, `case`, `coalesce`
//! and `literal`. Legacy filter comparisons (`["==", "key", value]`) are
//! recognised with the same rule MapLibre uses.

use crate::prelude::HashMap;
use crate::style::StyleError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Feature attributes an expression reads from
pub type Properties = HashMap<String, Value>;

const OPERATORS: &[&str] = &[
    "get", "has", "!has", "!", "all", "any", "==", "!=", "case", "coalesce", "literal",
];

/// A JSON expression such as `["case", ["has", "colour"], ["get", "colour"], "#C0C0C0"]`.
/// Plain values (`0.6`, `"#ff0000"`) are constant expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(pub Value);

impl Expression {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// `["get", key]`
    pub fn get(key: &str) -> Self {
        Self(Value::from(vec!["get", key]))
    }

    /// `["has", key]`
    pub fn has(key: &str) -> Self {
        Self(Value::from(vec!["has", key]))
    }

    /// `["!has", key]`
    pub fn not_has(key: &str) -> Self {
        Self(Value::from(vec!["!has", key]))
    }

    /// `["all", ...]`
    pub fn all(conditions: Vec<Expression>) -> Self {
        Self::compound("all", conditions)
    }

    /// `["any", ...]`
    pub fn any(conditions: Vec<Expression>) -> Self {
        Self::compound("any", conditions)
    }

    /// `["case", cond, output, fallback]`
    pub fn case(condition: Expression, output: Expression, fallback: Expression) -> Self {
        Self::compound("case", vec![condition, output, fallback])
    }

    fn compound(op: &str, args: Vec<Expression>) -> Self {
        let mut items = Vec::with_capacity(args.len() + 1);
        items.push(Value::from(op));
        items.extend(args.into_iter().map(|e| e.0));
        Self(Value::Array(items))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Literal number, if the expression is a constant number
    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    /// Evaluates against a feature's properties
    pub fn evaluate(&self, properties: &Properties) -> Value {
        eval(&self.0, properties)
    }

    /// Evaluates as a filter: only `true` passes
    pub fn matches(&self, properties: &Properties) -> bool {
        truthy(&self.evaluate(properties))
    }

    /// Checks operators and arity, as the renderer would when the style loads
    pub fn validate(&self) -> Result<(), StyleError> {
        check(&self.0).map_err(StyleError::Expression)
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn operator(value: &Value) -> Option<(&str, &[Value])> {
    match value {
        Value::Array(items) => match items.split_first() {
            Some((Value::String(op), args)) => Some((op.as_str(), args)),
            _ => None,
        },
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    matches!(value, Value::Bool(true))
}

fn key_of(value: &Value) -> Option<&str> {
    value.as_str()
}

/// `["==", "key", value]` with no nested expression is a legacy filter
fn is_legacy_comparison(args: &[Value]) -> bool {
    args.len() == 2 && !args[0].is_array() && !args[1].is_array() && args[0].is_string()
}

fn eval(value: &Value, properties: &Properties) -> Value {
    let Some((op, args)) = operator(value) else {
        return value.clone();
    };

    match op {
        "literal" => args.first().cloned().unwrap_or(Value::Null),
        "get" => args
            .first()
            .and_then(key_of)
            .and_then(|key| properties.get(key))
            .cloned()
            .unwrap_or(Value::Null),
        "has" => Value::Bool(args.first().and_then(key_of).is_some_and(|k| properties.contains_key(k))),
        "!has" => Value::Bool(!args.first().and_then(key_of).is_some_and(|k| properties.contains_key(k))),
        "!" => Value::Bool(!args.first().is_some_and(|a| truthy(&eval(a, properties)))),
        "all" => Value::Bool(args.iter().all(|a| truthy(&eval(a, properties)))),
        "any" => Value::Bool(args.iter().any(|a| truthy(&eval(a, properties)))),
        "==" | "!=" => {
            let equal = if is_legacy_comparison(args) {
                let actual = args[0].as_str().and_then(|k| properties.get(k));
                actual == Some(&args[1])
            } else if args.len() == 2 {
                eval(&args[0], properties) == eval(&args[1], properties)
            } else {
                false
            };
            Value::Bool(if op == "==" { equal } else { !equal })
        }
        "case" => {
            let mut branches = args.chunks_exact(2);
            for branch in branches.by_ref() {
                if truthy(&eval(&branch[0], properties)) {
                    return eval(&branch[1], properties);
                }
            }
            branches
                .remainder()
                .first()
                .map(|fallback| eval(fallback, properties))
                .unwrap_or(Value::Null)
        }
        "coalesce" => args
            .iter()
            .map(|a| eval(a, properties))
            .find(|v| !v.is_null())
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn check(value: &Value) -> Result<(), String> {
    let Some((op, args)) = operator(value) else {
        return Ok(());
    };

    if !OPERATORS.contains(&op) {
        return Err(format!("unknown expression operator \"{op}\""));
    }

    let arity_ok = match op {
        "get" | "has" | "!has" => args.len() == 1 && args[0].is_string(),
        "!" | "literal" => args.len() == 1,
        "==" | "!=" => args.len() == 2,
        "case" => args.len() >= 3 && args.len() % 2 == 1,
        "coalesce" => !args.is_empty(),
        _ => true,
    };
    if !arity_ok {
        return Err(format!("wrong arguments for \"{op}\""));
    }

    if op == "literal" || (matches!(op, "==" | "!=") && is_legacy_comparison(args)) {
        return Ok(());
    }
    args.iter().try_for_each(check)
}
