//! Executes a mapping graph against a concrete source document.
//!
//! Execution has two passes. Direct field-to-field connections are copied
//! first, in connection-creation order. Transforms are then evaluated in
//! dependency order and each result is written to every destination field
//! wired to the transform's output port.

use crate::error::{ExecutionError, ExecutionWarning};
use crate::graph::{MappingGraph, Side, TransformId, TransformKind};
use crate::path::FieldPath;
use crate::schema::MappingSchemas;
use ahash::{AHashMap, AHashSet};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub mod functoids;
pub mod plan;
pub mod trace;

pub use functoids::TransformEvaluator;
pub use plan::{DirectCopy, ExecutionPlan, InputSource, TransformStep};
pub use trace::{ExecutionTrace, TraceInput, TraceStep};

use functoids::register_default_evaluators;

/// What to do when two connections write the same destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// The later write replaces the earlier one and a warning is recorded.
    #[default]
    LastWriteWins,
    /// The run fails with `ExecutionError::ConflictingWrites`.
    Reject,
}

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    /// The produced destination document (without the destination root name).
    pub output: Value,
    pub trace: ExecutionTrace,
    pub warnings: Vec<ExecutionWarning>,
}

/// Runs mapping graphs against source documents.
///
/// An `Executor` holds only configuration and the transform evaluation
/// table, so one instance can be reused for any number of runs.
pub struct Executor {
    evaluators: AHashMap<TransformKind, Box<dyn TransformEvaluator>>,
    conflict_policy: ConflictPolicy,
}

pub struct ExecutorBuilder {
    evaluators: AHashMap<TransformKind, Box<dyn TransformEvaluator>>,
    conflict_policy: ConflictPolicy,
}

impl ExecutorBuilder {
    pub fn new() -> Self {
        let mut evaluators: AHashMap<TransformKind, Box<dyn TransformEvaluator>> = AHashMap::new();
        register_default_evaluators(&mut evaluators);
        Self {
            evaluators,
            conflict_policy: ConflictPolicy::default(),
        }
    }

    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Replaces the evaluator used for the evaluator's own transform kind.
    pub fn with_custom_evaluator(mut self, evaluator: Box<dyn TransformEvaluator>) -> Self {
        self.evaluators.insert(evaluator.kind(), evaluator);
        self
    }

    pub fn build(self) -> Executor {
        Executor {
            evaluators: self.evaluators,
            conflict_policy: self.conflict_policy,
        }
    }
}

impl Default for ExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Executor {
    fn default() -> Self {
        ExecutorBuilder::new().build()
    }
}

impl Executor {
    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::new()
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.conflict_policy
    }

    /// Parses `input` as JSON and executes `graph` against it.
    pub fn execute_json(
        &self,
        graph: &MappingGraph,
        input: &str,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        let document: Value = serde_json::from_str(input)
            .map_err(|e| ExecutionError::InvalidInputDocument(e.to_string()))?;
        self.execute(graph, &document)
    }

    /// Executes `graph` against `input`.
    pub fn execute(
        &self,
        graph: &MappingGraph,
        input: &Value,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        self.run(graph, input, None)
    }

    /// Executes `graph` and additionally reports connection paths that the
    /// given schemas do not contain. The schemas never block execution.
    pub fn execute_with_schemas(
        &self,
        graph: &MappingGraph,
        schemas: &MappingSchemas,
        input: &Value,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        self.run(graph, input, Some(schemas))
    }

    fn run(
        &self,
        graph: &MappingGraph,
        input: &Value,
        schemas: Option<&MappingSchemas>,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        let plan = ExecutionPlan::build(graph)?;
        let mut run = Run {
            output: Value::Object(Map::new()),
            trace: ExecutionTrace::default(),
            warnings: plan.ignored.clone(),
            written: AHashSet::new(),
            policy: self.conflict_policy,
        };

        if let Some(schemas) = schemas {
            run.warnings.extend(Self::check_schema_paths(&plan, schemas));
        }

        for copy in &plan.direct {
            let value = copy.from.resolve(input).cloned().unwrap_or(Value::Null);
            debug!(from = %copy.from, to = %copy.to, "direct copy");
            run.write(&copy.to, value.clone())?;
            run.trace.push(TraceStep::Copy {
                connection: copy.connection,
                from: copy.from.clone(),
                to: copy.to.clone(),
                value,
            });
        }

        let mut results: AHashMap<TransformId, Value> = AHashMap::new();
        for step in &plan.steps {
            let inputs: Vec<TraceInput> = step
                .inputs
                .iter()
                .map(|source| TraceInput {
                    source: source.clone(),
                    value: match source {
                        InputSource::Field(path) => {
                            path.resolve(input).cloned().unwrap_or(Value::Null)
                        }
                        InputSource::Transform(id) => {
                            results.get(id).cloned().unwrap_or(Value::Null)
                        }
                    },
                })
                .collect();

            let values: Vec<Value> = inputs.iter().map(|i| i.value.clone()).collect();
            let outcome = match self.evaluators.get(&step.kind) {
                Some(evaluator) => evaluator.evaluate(&values),
                None => Value::Null,
            };
            debug!(id = step.id, kind = %step.kind, inputs = values.len(), "transform evaluated");

            for path in &step.outputs {
                run.write(path, outcome.clone())?;
            }
            results.insert(step.id, outcome.clone());
            run.trace.push(TraceStep::Transform {
                id: step.id,
                kind: step.kind,
                inputs,
                outcome,
                outputs: step.outputs.clone(),
            });
        }

        Ok(ExecutionOutcome {
            output: run.output,
            trace: run.trace,
            warnings: run.warnings,
        })
    }

    fn check_schema_paths(plan: &ExecutionPlan, schemas: &MappingSchemas) -> Vec<ExecutionWarning> {
        let sources = plan
            .direct
            .iter()
            .map(|copy| &copy.from)
            .chain(plan.steps.iter().flat_map(|step| {
                step.inputs.iter().filter_map(|source| match source {
                    InputSource::Field(path) => Some(path),
                    InputSource::Transform(_) => None,
                })
            }))
            .map(|path| (Side::Source, path));
        let destinations = plan
            .direct
            .iter()
            .map(|copy| &copy.to)
            .chain(plan.steps.iter().flat_map(|step| step.outputs.iter()))
            .map(|path| (Side::Destination, path));

        sources
            .chain(destinations)
            .filter(|(side, path)| !schemas.has_field(*side, path))
            .map(|(side, path)| ExecutionWarning::UnknownSchemaPath {
                side,
                path: path.to_string(),
            })
            .collect()
    }
}

/// Mutable state of one execution run.
struct Run {
    output: Value,
    trace: ExecutionTrace,
    warnings: Vec<ExecutionWarning>,
    written: AHashSet<FieldPath>,
    policy: ConflictPolicy,
}

impl Run {
    /// Writes one destination value, applying the conflict policy. Path
    /// failures are recorded as warnings so the rest of the run continues.
    fn write(&mut self, path: &FieldPath, value: Value) -> Result<(), ExecutionError> {
        if !self.written.insert(path.clone()) {
            match self.policy {
                ConflictPolicy::Reject => {
                    return Err(ExecutionError::ConflictingWrites {
                        path: path.to_string(),
                    });
                }
                ConflictPolicy::LastWriteWins => {
                    self.warnings.push(ExecutionWarning::OverwrittenPath {
                        path: path.to_string(),
                    });
                }
            }
        }
        if let Err(error) = path.assign(&mut self.output, value) {
            warn!(%path, %error, "destination write skipped");
            self.warnings.push(ExecutionWarning::UnresolvedWrite {
                path: path.to_string(),
                error,
            });
        }
        Ok(())
    }
}
