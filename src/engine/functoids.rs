use crate::graph::TransformKind;
use ahash::AHashMap;
use itertools::Itertools;
use serde_json::{Number, Value};

/// Defines how one transform kind turns its input set into a single value.
///
/// Inputs arrive in connection-creation order; absent source values are
/// `Value::Null`.
pub trait TransformEvaluator: Send + Sync {
    fn kind(&self) -> TransformKind;
    fn evaluate(&self, inputs: &[Value]) -> Value;
}

/// Joins the string forms of all non-null inputs with a single space.
pub fn concat(inputs: &[Value]) -> Value {
    Value::String(
        inputs
            .iter()
            .filter(|v| !v.is_null())
            .map(string_form)
            .join(" "),
    )
}

/// Sums all inputs after numeric coercion.
pub fn sum(inputs: &[Value]) -> Value {
    number_value(inputs.iter().map(coerce_number).sum())
}

/// Returns the first non-null input unchanged.
pub fn coalesce(inputs: &[Value]) -> Value {
    inputs
        .iter()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

/// String form of the first input, or `""` when it is absent or null.
pub fn convert_to_string(inputs: &[Value]) -> Value {
    match inputs.first() {
        None | Some(Value::Null) => Value::String(String::new()),
        Some(value) => Value::String(string_form(value)),
    }
}

/// Renders a value the way it reads in a document: strings verbatim, whole
/// numbers without a fraction, containers as compact JSON.
pub fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if is_whole(f) => format!("{}", f as i64),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Numeric coercion: numbers as is, numeric strings parsed, booleans as 1/0,
/// everything else 0.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// Wraps an `f64` as a JSON number, preferring an integer representation for
/// whole values. Non-finite results become `null`.
pub fn number_value(n: f64) -> Value {
    if is_whole(n) {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

pub(crate) fn is_whole(n: f64) -> bool {
    // 2^53: beyond this an f64 no longer represents every integer exactly.
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0
}

/// Defines the default evaluator structs and their registration.
macro_rules! define_transform_evaluators {
    ( $( ($struct_name:ident, $kind:path, $eval_fn:path) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl TransformEvaluator for $struct_name {
                fn kind(&self) -> TransformKind { $kind }
                fn evaluate(&self, inputs: &[Value]) -> Value { $eval_fn(inputs) }
            }
        )*

        pub(super) fn register_default_evaluators(
            table: &mut AHashMap<TransformKind, Box<dyn TransformEvaluator>>,
        ) {
            $( table.insert($kind, Box::new($struct_name)); )*
        }
    };
}

define_transform_evaluators! {
    (ConcatEvaluator, TransformKind::String, concat),
    (SumEvaluator, TransformKind::Math, sum),
    (CoalesceEvaluator, TransformKind::Logical, coalesce),
    (ConversionEvaluator, TransformKind::Conversion, convert_to_string),
}
