use super::{EndpointDescriptor, MappingDocument};
use crate::error::{GraphError, ImportWarning};
use crate::graph::{ConnectionId, Endpoint, MappingGraph, Side, TransformId, TransformKind};
use crate::path::FieldPath;
use crate::schema::MappingSchemas;
use tracing::{debug, warn};

/// Answers whether a field descriptor still points at something real.
pub trait FieldResolver {
    fn resolves(&self, side: Side, path: &FieldPath) -> bool;
}

/// Accepts every field path; for graph-only imports without schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyField;

impl FieldResolver for AnyField {
    fn resolves(&self, _side: Side, _path: &FieldPath) -> bool {
        true
    }
}

impl FieldResolver for MappingSchemas {
    fn resolves(&self, side: Side, path: &FieldPath) -> bool {
        self.has_field(side, path)
    }
}

/// What an import created and what it had to skip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub transforms: Vec<TransformId>,
    pub connections: Vec<ConnectionId>,
    pub warnings: Vec<ImportWarning>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Replaces the contents of `graph` with the mapping in `document`.
///
/// Transforms are recreated first with their saved ids, then connections.
/// Entries referring to missing fields or transforms are skipped and reported.
pub fn import(
    document: &MappingDocument,
    graph: &mut MappingGraph,
    resolver: &impl FieldResolver,
) -> ImportReport {
    graph.clear();
    let mut report = ImportReport::default();

    for functoid in &document.functoids {
        let kind = match functoid.kind.parse::<TransformKind>() {
            Ok(kind) => kind,
            Err(message) => {
                warn!(id = functoid.id, %message, "functoid skipped");
                report.warnings.push(ImportWarning::UnknownTransformKind {
                    id: functoid.id,
                    message,
                });
                continue;
            }
        };
        match graph.add_transform(kind, functoid.position, Some(functoid.id)) {
            Ok(id) => report.transforms.push(id),
            Err(GraphError::TransformIdExhausted(_)) => {
                warn!(id = functoid.id, "out of range functoid id skipped");
                report
                    .warnings
                    .push(ImportWarning::TransformIdOutOfRange(functoid.id));
            }
            Err(_) => {
                warn!(id = functoid.id, "duplicate functoid id skipped");
                report
                    .warnings
                    .push(ImportWarning::DuplicateTransform(functoid.id));
            }
        }
    }

    for (index, entry) in document.mappings.iter().enumerate() {
        let (from, to) = match (
            resolve_descriptor(&entry.source, graph, resolver),
            resolve_descriptor(&entry.target, graph, resolver),
        ) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(reason), _) | (_, Err(reason)) => {
                warn!(index, %reason, "mapping skipped");
                report
                    .warnings
                    .push(ImportWarning::UnresolvedConnectorReference { index, reason });
                continue;
            }
        };

        match graph.add_connection(from, to) {
            Ok(id) => report.connections.push(id),
            Err(GraphError::SelfConnection(_)) => {
                report.warnings.push(ImportWarning::SelfConnection { index });
            }
            Err(error) => {
                report
                    .warnings
                    .push(ImportWarning::UnresolvedConnectorReference {
                        index,
                        reason: error.to_string(),
                    });
            }
        }
    }

    debug!(
        transforms = report.transforms.len(),
        connections = report.connections.len(),
        warnings = report.warnings.len(),
        "mapping imported"
    );
    report
}

fn resolve_descriptor(
    descriptor: &EndpointDescriptor,
    graph: &MappingGraph,
    resolver: &impl FieldResolver,
) -> Result<Endpoint, String> {
    match descriptor {
        EndpointDescriptor::Field { path, schema } => {
            let parsed = FieldPath::parse(path).map_err(|e| e.to_string())?;
            if !resolver.resolves(*schema, &parsed) {
                return Err(format!("no {} field at '{}'", schema, path));
            }
            Ok(Endpoint::Field {
                path: parsed,
                side: *schema,
            })
        }
        EndpointDescriptor::Functoid {
            functoid_id,
            connector_side,
        } => {
            let id = functoid_id.ok_or_else(|| "functoid reference has no id".to_string())?;
            if graph.transform(id).is_none() {
                return Err(format!("functoid #{} does not exist", id));
            }
            Ok(Endpoint::transform(id, *connector_side))
        }
    }
}
