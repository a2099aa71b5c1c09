use super::{SchemaNode, has_field};
use crate::graph::Side;
use crate::path::FieldPath;

/// The source and destination trees of one mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSchemas {
    pub source: SchemaNode,
    pub destination: SchemaNode,
}

impl MappingSchemas {
    pub fn new(source: SchemaNode, destination: SchemaNode) -> Self {
        Self {
            source,
            destination,
        }
    }

    pub fn tree(&self, side: Side) -> &SchemaNode {
        match side {
            Side::Source => &self.source,
            Side::Destination => &self.destination,
        }
    }

    /// Whether `path` names a field node in the tree on `side`.
    pub fn has_field(&self, side: Side, path: &FieldPath) -> bool {
        has_field(self.tree(side), path)
    }
}
