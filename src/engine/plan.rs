use crate::error::{ExecutionError, ExecutionWarning};
use crate::graph::{Connection, ConnectionId, Endpoint, MappingGraph, Port, Side, TransformId, TransformKind};
use crate::path::FieldPath;
use ahash::AHashMap;
use petgraph::Direction;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Where a transform input value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// A field of the source document.
    Field(FieldPath),
    /// The output of an upstream transform.
    Transform(TransformId),
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Field(path) => write!(f, "${}", path),
            InputSource::Transform(id) => write!(f, "#{}", id),
        }
    }
}

/// A source-field to destination-field copy.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectCopy {
    pub connection: ConnectionId,
    pub from: FieldPath,
    pub to: FieldPath,
}

/// One transform evaluation with its gathered inputs and outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformStep {
    pub id: TransformId,
    pub kind: TransformKind,
    pub inputs: Vec<InputSource>,
    pub outputs: Vec<FieldPath>,
}

/// What a single connection contributes to execution.
enum Flow {
    Direct { from: FieldPath, to: FieldPath },
    Input { source: InputSource, into: TransformId },
    Output { from: TransformId, to: FieldPath },
}

/// A graph flattened into the two execution passes.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    pub direct: Vec<DirectCopy>,
    /// Transform steps in dependency order.
    pub steps: Vec<TransformStep>,
    /// Connections that carry no data flow.
    pub ignored: Vec<ExecutionWarning>,
}

impl ExecutionPlan {
    /// Classifies every connection and orders the transforms topologically.
    ///
    /// Independent transforms run lowest id first. A dependency cycle among
    /// transforms fails the whole plan.
    pub fn build(graph: &MappingGraph) -> Result<Self, ExecutionError> {
        let mut plan = ExecutionPlan::default();
        let mut inputs: AHashMap<TransformId, Vec<InputSource>> = AHashMap::new();
        let mut outputs: AHashMap<TransformId, Vec<FieldPath>> = AHashMap::new();

        for connection in graph.connections() {
            match Self::classify(connection) {
                Ok(Flow::Direct { from, to }) => plan.direct.push(DirectCopy {
                    connection: connection.id,
                    from,
                    to,
                }),
                Ok(Flow::Input { source, into }) => inputs.entry(into).or_default().push(source),
                Ok(Flow::Output { from, to }) => outputs.entry(from).or_default().push(to),
                Err(reason) => {
                    warn!(connection = connection.id, reason, "connection ignored");
                    plan.ignored.push(ExecutionWarning::IgnoredConnection {
                        connection: connection.id,
                        reason: reason.to_string(),
                    });
                }
            }
        }

        for id in Self::topological_order(graph, &inputs)? {
            let Some(node) = graph.transform(id) else {
                continue;
            };
            plan.steps.push(TransformStep {
                id,
                kind: node.kind,
                inputs: inputs.remove(&id).unwrap_or_default(),
                outputs: outputs.remove(&id).unwrap_or_default(),
            });
        }
        Ok(plan)
    }

    /// Orients a connection by endpoint roles, so the click order used to
    /// draw it does not matter.
    fn classify(connection: &Connection) -> Result<Flow, &'static str> {
        Self::orient(&connection.from, &connection.to)
            .or_else(|| Self::orient(&connection.to, &connection.from))
            .ok_or("endpoints do not form a source-to-destination data flow")
    }

    fn orient(upstream: &Endpoint, downstream: &Endpoint) -> Option<Flow> {
        use Endpoint::{Field, Transform};
        match (upstream, downstream) {
            (
                Field { path: from, side: Side::Source },
                Field { path: to, side: Side::Destination },
            ) => Some(Flow::Direct {
                from: from.clone(),
                to: to.clone(),
            }),
            (
                Field { path, side: Side::Source },
                Transform { transform_id, port: Port::Left },
            ) => Some(Flow::Input {
                source: InputSource::Field(path.clone()),
                into: *transform_id,
            }),
            (
                Transform { transform_id, port: Port::Right },
                Field { path, side: Side::Destination },
            ) => Some(Flow::Output {
                from: *transform_id,
                to: path.clone(),
            }),
            (
                Transform { transform_id: from, port: Port::Right },
                Transform { transform_id: into, port: Port::Left },
            ) => Some(Flow::Input {
                source: InputSource::Transform(*from),
                into: *into,
            }),
            _ => None,
        }
    }

    /// Kahn's algorithm over the transform dependency graph, with an ordered
    /// ready set so that ties are broken by ascending transform id.
    fn topological_order(
        graph: &MappingGraph,
        inputs: &AHashMap<TransformId, Vec<InputSource>>,
    ) -> Result<Vec<TransformId>, ExecutionError> {
        let mut dependencies: DiGraph<TransformId, ()> = DiGraph::new();
        let mut ids: Vec<TransformId> = graph.transforms().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        let index: AHashMap<TransformId, NodeIndex> = ids
            .iter()
            .map(|id| (*id, dependencies.add_node(*id)))
            .collect();

        for (downstream, sources) in inputs {
            let Some(&to) = index.get(downstream) else {
                continue;
            };
            for source in sources {
                if let InputSource::Transform(upstream) = source {
                    if let Some(&from) = index.get(upstream) {
                        dependencies.add_edge(from, to, ());
                    }
                }
            }
        }

        let mut in_degree: AHashMap<NodeIndex, usize> = dependencies
            .node_indices()
            .map(|n| (n, dependencies.neighbors_directed(n, Direction::Incoming).count()))
            .collect();
        let mut ready: BTreeSet<(TransformId, NodeIndex)> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(n, _)| (dependencies[*n], *n))
            .collect();

        let mut order = Vec::with_capacity(ids.len());
        while let Some((id, node)) = ready.pop_first() {
            order.push(id);
            for next in dependencies.neighbors_directed(node, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert((dependencies[next], next));
                    }
                }
            }
        }

        if order.len() < ids.len() {
            return Err(ExecutionError::TransformCycle {
                transforms: Self::cycle_members(&dependencies),
            });
        }
        Ok(order)
    }

    /// Transform ids that sit on a dependency cycle, ascending.
    fn cycle_members(dependencies: &DiGraph<TransformId, ()>) -> Vec<TransformId> {
        let mut members: Vec<TransformId> = kosaraju_scc(dependencies)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|n| dependencies.contains_edge(*n, *n))
            })
            .flatten()
            .map(|n| dependencies[n])
            .collect();
        members.sort_unstable();
        members
    }
}
