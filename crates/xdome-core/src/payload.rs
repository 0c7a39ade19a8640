//! Request payload construction.
//!
//! Turns a loosely-typed parameter mapping into the body xDome expects:
//!
//! 1. [`normalize_payload`] flattens `fields`, wraps single `sort_by` and
//!    `filter_by` objects in lists, and drops `null`/empty-string values.
//! 2. [`build_filter_operands`] folds checklist fields, detection-time
//!    bounds, and the CVSS threshold into filter operands.
//! 3. [`build_request`] combines both into a [`QueryRequest`] whose
//!    serialized form carries the operands under `filter_by`.
//!
//! The caller's mapping is never modified.

use crate::epoch::{format_epoch, EpochZone};
use crate::filter::{FieldInput, FilterExpression, FilterOp, FilterOperand, Operand};
use crate::lookup::FormatLookup;
use crate::resource::Resource;
use serde::Serialize;
use serde_json::{Map, Value};

/// Flat parameter mapping supplied per request.
pub type Params = Map<String, Value>;

const DETECTED_TIME: &str = "detected_time";
const CVSS_V3_SCORE: &str = "cvss_v3_score";

/// Detection-time bounds and the comparison each one produces.
const TIME_BOUNDS: [(&str, FilterOp); 2] = [
    ("before_detected_time", FilterOp::LessOrEqual),
    ("after_detected_time", FilterOp::GreaterOrEqual),
];

/// Knobs for payload construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Label translation tables
    pub lookup: FormatLookup,
    /// Rendering of integer detection times
    pub epoch_zone: EpochZone,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            lookup: FormatLookup::vendor(),
            epoch_zone: EpochZone::default(),
        }
    }
}

/// A fully built query for one resource.
///
/// Serializes to the request body: the remaining parameters with the
/// filter expression, if any, under `filter_by`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    /// Target resource
    #[serde(skip)]
    pub resource: Resource,
    /// Parameters forwarded verbatim
    #[serde(flatten)]
    pub params: Params,
    /// Filter expression
    #[serde(rename = "filter_by", skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
}

impl QueryRequest {
    /// API path for this query.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        self.resource.endpoint()
    }
}

/// Normalize a raw parameter mapping.
///
/// Idempotent: normalizing the output again yields the same mapping.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use xdome_core::normalize_payload;
///
/// let params = json!({"fields": {"limit": 10}, "offset": null, "sort_by": {"field": "id"}});
/// let normalized = normalize_payload(params.as_object().unwrap());
///
/// assert_eq!(
///     serde_json::Value::Object(normalized),
///     json!({"limit": 10, "sort_by": [{"field": "id"}]})
/// );
/// ```
#[must_use]
pub fn normalize_payload(params: &Params) -> Params {
    let mut out = params.clone();

    while matches!(out.get("fields"), Some(Value::Object(_))) {
        if let Some(Value::Object(nested)) = out.remove("fields") {
            out.extend(nested);
        }
    }

    for key in ["sort_by", "filter_by"] {
        if let Some(value) = out.get_mut(key) {
            if value.is_object() {
                let single = value.take();
                *value = Value::Array(vec![single]);
            }
        }
    }

    out.into_iter().filter(|(_, value)| !is_blank(value)).collect()
}

/// Fold filterable parameters into operands.
///
/// Consumes `params` and returns the operands along with whatever was not
/// folded. A pre-existing `filter_by` seeds the list, and derived operands
/// follow it.
///
/// # Errors
///
/// Returns error if a checklist field has an unsupported or empty value,
/// a label has no code, or an integer detection time is out of range.
pub fn build_filter_operands(
    mut params: Params,
    field_checklist: &[&str],
    options: &BuildOptions,
) -> Result<(Vec<Operand>, Params), PayloadError> {
    let mut operands = Vec::new();

    match params.remove("filter_by") {
        Some(Value::Array(seed)) => operands.extend(seed.into_iter().map(Operand::PassThrough)),
        Some(Value::Null) | None => {}
        Some(other) => operands.push(Operand::PassThrough(other)),
    }

    for field in field_checklist {
        let Some(raw) = take_present(&mut params, field) else {
            continue;
        };
        tracing::debug!(field, value = %raw, "Folding field into filter");

        let values = checklist_values(field, raw, &options.lookup)?;
        operands.push(FilterOperand::one_of(*field, values).into());
    }

    for (key, operation) in TIME_BOUNDS {
        if let Some(raw) = take_present(&mut params, key) {
            let value = detected_time_value(key, raw, options.epoch_zone)?;
            operands.push(FilterOperand::compare(DETECTED_TIME, operation, value).into());
        }
    }

    if let Some(score) = take_present(&mut params, CVSS_V3_SCORE) {
        operands.push(FilterOperand::compare(CVSS_V3_SCORE, FilterOp::GreaterOrEqual, score).into());
    }

    tracing::debug!(count = operands.len(), "Built filter operands");
    Ok((operands, params))
}

/// Build the request for `resource` from raw parameters.
///
/// # Errors
///
/// Returns error if filter construction fails (see [`build_filter_operands`]).
pub fn build_request(
    params: &Params,
    resource: Resource,
    options: &BuildOptions,
) -> Result<QueryRequest, PayloadError> {
    let normalized = normalize_payload(params);
    let (operands, params) =
        build_filter_operands(normalized, resource.field_checklist(), options)?;

    Ok(QueryRequest {
        resource,
        params,
        filter: FilterExpression::all_of(operands),
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn take_present(params: &mut Params, key: &str) -> Option<Value> {
    match params.get(key) {
        Some(value) if !value.is_null() => params.remove(key),
        _ => None,
    }
}

fn checklist_values(
    field: &str,
    raw: Value,
    lookup: &FormatLookup,
) -> Result<Vec<Value>, PayloadError> {
    let invalid = || PayloadError::InvalidFieldValue {
        field: field.to_string(),
        value: raw.clone(),
    };

    let input = FieldInput::from_value(&raw).ok_or_else(invalid)?;
    if input.is_empty() {
        return Err(PayloadError::EmptyFieldValue {
            field: field.to_string(),
        });
    }

    if !lookup.has_field(field) {
        return Ok(input.into_values());
    }

    let labels = input.into_labels().ok_or_else(invalid)?;
    labels
        .into_iter()
        .map(|label| {
            lookup
                .code(field, &label)
                .map(Value::from)
                .ok_or_else(|| PayloadError::UnknownLabel {
                    field: field.to_string(),
                    label,
                })
        })
        .collect()
}

fn detected_time_value(key: &str, raw: Value, zone: EpochZone) -> Result<Value, PayloadError> {
    if !(raw.is_i64() || raw.is_u64()) {
        return Ok(raw);
    }
    raw.as_i64()
        .and_then(|secs| format_epoch(secs, zone))
        .map(Value::String)
        .ok_or_else(|| PayloadError::InvalidTimestamp {
            field: key.to_string(),
            value: raw,
        })
}

/// Errors that can occur while building a payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    /// Checklist field value has an unsupported shape
    #[error("invalid value for '{field}': {value}")]
    InvalidFieldValue {
        /// Field name
        field: String,
        /// Offending value
        value: Value,
    },
    /// Checklist field value is an empty list
    #[error("empty value for '{field}'")]
    EmptyFieldValue {
        /// Field name
        field: String,
    },
    /// Label missing from the field's translation table
    #[error("unknown label '{label}' for '{field}'")]
    UnknownLabel {
        /// Field name
        field: String,
        /// Unrecognized label
        label: String,
    },
    /// Integer detection time outside the representable range
    #[error("invalid timestamp for '{field}': {value}")]
    InvalidTimestamp {
        /// Parameter name
        field: String,
        /// Offending value
        value: Value,
    },
}
