use crate::graph::{ConnectionId, Endpoint, Side, TransformId};
use thiserror::Error;

/// Errors raised while loading, validating, or editing a schema tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Failed to parse schema JSON: {0}")]
    InvalidSchemaJson(String),

    #[error("Invalid schema structure at '{path}': {message}")]
    InvalidStructure { path: String, message: String },

    #[error("Duplicate child name '{name}' under '{parent_path}'")]
    DuplicateName { parent_path: String, name: String },

    #[error("No schema node found at path '{0}'")]
    FieldNotFound(String),

    #[error("Schema node at '{0}' is not a field")]
    NotAField(String),

    #[error("Field '{0}' does not belong to the destination schema")]
    NotDestination(String),
}

/// Errors raised while parsing a dotted path or writing through one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path is empty")]
    Empty,

    #[error("Path '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("Path '{0}' has no field segment below the root name")]
    MissingFieldSegment(String),

    #[error("Cannot descend into '{segment}' of path '{path}': the existing value is not a container")]
    NotAContainer { path: String, segment: String },
}

/// Errors raised by mapping graph mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Cannot connect endpoint {0} to itself")]
    SelfConnection(Endpoint),

    #[error("Transform #{0} does not exist in the mapping graph")]
    UnknownTransform(TransformId),

    #[error("Transform #{0} already exists in the mapping graph")]
    DuplicateTransform(TransformId),

    #[error("No {side} field found at path '{path}'")]
    UnknownField { side: Side, path: String },

    #[error("Transform id {0} leaves no room for further transform ids")]
    TransformIdExhausted(TransformId),
}

/// Errors that abort an execution run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Failed to parse input document: {0}")]
    InvalidInputDocument(String),

    #[error("Transform dependency cycle detected between transforms {transforms:?}")]
    TransformCycle { transforms: Vec<TransformId> },

    #[error("More than one connection writes destination path '{path}'")]
    ConflictingWrites { path: String },
}

/// Errors raised while reading a portable mapping document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Failed to parse mapping JSON: {0}")]
    InvalidMappingJson(String),

    #[error("Unsupported mapping document version '{0}'")]
    UnsupportedVersion(String),
}

/// Errors reported by a text-generation collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Text generation failed: {0}")]
    Generator(String),
}

/// Errors raised while authoring a business description for a field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescribeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Non-fatal problems found while importing a mapping document. The entry is
/// skipped and the import continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportWarning {
    #[error("Mapping #{index} skipped: unresolved connector reference ({reason})")]
    UnresolvedConnectorReference { index: usize, reason: String },

    #[error("Mapping #{index} skipped: it connects an endpoint to itself")]
    SelfConnection { index: usize },

    #[error("Functoid #{id} skipped: {message}")]
    UnknownTransformKind { id: TransformId, message: String },

    #[error("Functoid #{0} skipped: the id is already in use")]
    DuplicateTransform(TransformId),

    #[error("Functoid #{0} skipped: the id is out of range")]
    TransformIdOutOfRange(TransformId),
}

/// Non-fatal problems found during an execution run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionWarning {
    #[error("Connection #{connection} ignored: {reason}")]
    IgnoredConnection { connection: ConnectionId, reason: String },

    #[error("Could not write '{path}': {error}")]
    UnresolvedWrite { path: String, error: PathError },

    #[error("Destination '{path}' was written more than once; the last write wins")]
    OverwrittenPath { path: String },

    #[error("Path '{path}' does not name a field of the {side} schema")]
    UnknownSchemaPath { side: Side, path: String },
}
