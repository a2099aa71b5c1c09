//! Human-readable rendering of execution traces.

use crate::engine::functoids::is_whole;
use crate::engine::{ExecutionTrace, TraceInput, TraceStep};
use crate::path::FieldPath;
use itertools::Itertools;
use serde_json::Value;

/// Formats execution traces into human-readable explanations.
pub struct TraceFormatter;

impl TraceFormatter {
    /// One line per step, in execution order.
    pub fn format_trace(trace: &ExecutionTrace) -> String {
        trace.steps.iter().map(Self::format_step).join("\n")
    }

    /// Formats a single step, e.g.
    /// `string#0($SourceData.A (was "x"), $SourceData.B (was "y")) = "x y" -> DestinationData.C`.
    pub fn format_step(step: &TraceStep) -> String {
        match step {
            TraceStep::Copy {
                from, to, value, ..
            } => format!("${} (was {}) -> {}", from, Self::format_value(value), to),
            TraceStep::Transform {
                id,
                kind,
                inputs,
                outcome,
                outputs,
            } => format!(
                "{}#{}({}) = {} -> {}",
                kind,
                id,
                inputs.iter().map(Self::format_input).join(", "),
                Self::format_value(outcome),
                Self::format_targets(outputs)
            ),
        }
    }

    fn format_input(input: &TraceInput) -> String {
        format!("{} (was {})", input.source, Self::format_value(&input.value))
    }

    fn format_targets(outputs: &[FieldPath]) -> String {
        if outputs.is_empty() {
            "(no outputs)".to_string()
        } else {
            outputs.iter().join(", ")
        }
    }

    /// Compact JSON rendering; whole floats in the exact integer range lose
    /// their trailing `.0`.
    fn format_value(value: &Value) -> String {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) if n.is_f64() && is_whole(f) => format!("{}", f as i64),
                _ => n.to_string(),
            },
            other => other.to_string(),
        }
    }
}
