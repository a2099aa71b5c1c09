use super::plan::InputSource;
use crate::graph::{ConnectionId, TransformId, TransformKind};
use crate::path::FieldPath;
use serde_json::Value;

/// A record of what one execution run did, step by step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionTrace {
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceStep {
    /// A direct field-to-field copy.
    Copy {
        connection: ConnectionId,
        from: FieldPath,
        to: FieldPath,
        value: Value,
    },
    /// One transform evaluation.
    Transform {
        id: TransformId,
        kind: TransformKind,
        inputs: Vec<TraceInput>,
        outcome: Value,
        outputs: Vec<FieldPath>,
    },
}

/// An input value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceInput {
    pub source: InputSource,
    pub value: Value,
}

impl ExecutionTrace {
    pub fn push(&mut self, step: TraceStep) {
        self.steps.push(step);
    }

    /// The outcome recorded for transform `id`, if it ran.
    pub fn transform_outcome(&self, id: TransformId) -> Option<&Value> {
        self.steps.iter().find_map(|step| match step {
            TraceStep::Transform {
                id: step_id,
                outcome,
                ..
            } if *step_id == id => Some(outcome),
            _ => None,
        })
    }

    /// Transform ids in the order they were evaluated.
    pub fn transform_order(&self) -> Vec<TransformId> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                TraceStep::Transform { id, .. } => Some(*id),
                TraceStep::Copy { .. } => None,
            })
            .collect()
    }
}
