//! Filter expression model.
//!
//! xDome narrows result sets with a `filter_by` expression: an `and` over a
//! list of operands, each a field/operation/value triple. Caller-supplied
//! operands are forwarded untouched, so an [`Operand`] is either a
//! structured [`FilterOperand`] or raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison applied by a filter operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Field value is one of a list
    In,
    /// Field value is at most the operand value
    LessOrEqual,
    /// Field value is at least the operand value
    GreaterOrEqual,
}

/// A single field/operation/value condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOperand {
    /// Remote field name
    pub field: String,
    /// Comparison
    pub operation: FilterOp,
    /// A list for `in`, a scalar for comparisons
    pub value: Value,
}

impl FilterOperand {
    /// Membership condition over `values`.
    #[must_use]
    pub fn one_of(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            field: field.into(),
            operation: FilterOp::In,
            value: Value::Array(values),
        }
    }

    /// Ordered comparison against a scalar.
    #[must_use]
    pub fn compare(field: impl Into<String>, operation: FilterOp, value: Value) -> Self {
        Self {
            field: field.into(),
            operation,
            value,
        }
    }
}

/// An entry of a filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// Condition derived from connector parameters
    Condition(FilterOperand),
    /// Caller-supplied operand, forwarded as-is
    PassThrough(Value),
}

impl From<FilterOperand> for Operand {
    fn from(operand: FilterOperand) -> Self {
        Operand::Condition(operand)
    }
}

/// Boolean combinator of a filter expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conjunction {
    /// All operands must hold
    #[default]
    And,
}

/// The `filter_by` body sent to xDome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    /// Combinator
    pub operation: Conjunction,
    /// Conditions, in emission order
    pub operands: Vec<Operand>,
}

impl FilterExpression {
    /// Conjunction of `operands`, or `None` when there are none.
    #[must_use]
    pub fn all_of(operands: Vec<Operand>) -> Option<Self> {
        if operands.is_empty() {
            return None;
        }
        Some(Self {
            operation: Conjunction::And,
            operands,
        })
    }
}

/// The accepted shapes of a checklist field value.
///
/// Precedence when reading JSON: integer list, string list, single
/// integer, comma-delimited string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Already-coded integers, used verbatim
    Integers(Vec<i64>),
    /// Strings, trimmed individually
    Strings(Vec<String>),
    /// One integer
    Integer(i64),
    /// Comma-separated text
    Delimited(String),
}

impl FieldInput {
    /// Classify a JSON value. Returns `None` for unsupported shapes
    /// (floats, booleans, objects, mixed lists).
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => {
                if let Some(ints) = items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>() {
                    return Some(FieldInput::Integers(ints));
                }
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .map(FieldInput::Strings)
            }
            Value::Number(n) => n.as_i64().map(FieldInput::Integer),
            Value::String(s) => Some(FieldInput::Delimited(s.clone())),
            _ => None,
        }
    }

    /// Whether the input holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            FieldInput::Integers(v) => v.is_empty(),
            FieldInput::Strings(v) => v.is_empty(),
            FieldInput::Integer(_) | FieldInput::Delimited(_) => false,
        }
    }

    /// Trimmed textual entries, or `None` for integer inputs.
    #[must_use]
    pub fn into_labels(self) -> Option<Vec<String>> {
        match self {
            FieldInput::Strings(items) => {
                Some(items.iter().map(|s| s.trim().to_string()).collect())
            }
            FieldInput::Delimited(text) => Some(split_trimmed(&text)),
            FieldInput::Integers(_) | FieldInput::Integer(_) => None,
        }
    }

    /// The list sent as the value of an `in` operand.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        match self {
            FieldInput::Integers(items) => items.into_iter().map(Value::from).collect(),
            FieldInput::Integer(n) => vec![Value::from(n)],
            text => text
                .into_labels()
                .unwrap_or_default()
                .into_iter()
                .map(Value::String)
                .collect(),
        }
    }
}

fn split_trimmed(text: &str) -> Vec<String> {
    text.split(',').map(|token| token.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operand_serializes_as_triple() {
        let operand = FilterOperand::one_of("device_type", vec![json!("PLC")]);
        assert_eq!(
            serde_json::to_value(&operand).unwrap(),
            json!({"field": "device_type", "operation": "in", "value": ["PLC"]})
        );

        let operand = FilterOperand::compare("cvss_v3_score", FilterOp::GreaterOrEqual, json!(7.5));
        assert_eq!(
            serde_json::to_value(&operand).unwrap()["operation"],
            json!("greater_or_equal")
        );
    }

    #[test]
    fn expression_mixes_pass_through_and_conditions() {
        let expr = FilterExpression::all_of(vec![
            Operand::PassThrough(json!({"field": "site", "operation": "equals", "value": 3})),
            FilterOperand::one_of("id", vec![json!(1)]).into(),
        ])
        .unwrap();

        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({
                "operation": "and",
                "operands": [
                    {"field": "site", "operation": "equals", "value": 3},
                    {"field": "id", "operation": "in", "value": [1]}
                ]
            })
        );
    }

    #[test]
    fn empty_expression_is_none() {
        assert!(FilterExpression::all_of(Vec::new()).is_none());
    }

    #[test]
    fn field_input_precedence() {
        assert_eq!(
            FieldInput::from_value(&json!([1, 2])),
            Some(FieldInput::Integers(vec![1, 2]))
        );
        assert_eq!(
            FieldInput::from_value(&json!([" a ", "b"])),
            Some(FieldInput::Strings(vec![" a ".into(), "b".into()]))
        );
        assert_eq!(FieldInput::from_value(&json!(4)), Some(FieldInput::Integer(4)));
        assert_eq!(
            FieldInput::from_value(&json!("x, y")),
            Some(FieldInput::Delimited("x, y".into()))
        );
    }

    #[test]
    fn unsupported_shapes_are_rejected() {
        assert!(FieldInput::from_value(&json!(2.5)).is_none());
        assert!(FieldInput::from_value(&json!(true)).is_none());
        assert!(FieldInput::from_value(&json!({"a": 1})).is_none());
        assert!(FieldInput::from_value(&json!([1, "two"])).is_none());
    }

    #[test]
    fn coercion_trims_and_splits() {
        let values = FieldInput::Delimited("PLC, Sensor ,HMI".into()).into_values();
        assert_eq!(values, vec![json!("PLC"), json!("Sensor"), json!("HMI")]);

        let values = FieldInput::Strings(vec!["  PLC".into()]).into_values();
        assert_eq!(values, vec![json!("PLC")]);

        assert_eq!(FieldInput::Integer(9).into_values(), vec![json!(9)]);
        assert!(FieldInput::Integers(vec![1]).into_labels().is_none());
    }
}
