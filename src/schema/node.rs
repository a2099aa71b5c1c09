use crate::error::SchemaError;
use crate::path::FieldPath;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One node of a schema tree, discriminated by the JSON `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaNode {
    Root(GroupNode),
    Parent(GroupNode),
    Field(FieldNode),
}

/// A root or parent node: a name and its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SchemaNode>,
}

/// A leaf field carrying a data type and optional business metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: DataType,
    #[serde(flatten)]
    pub metadata: BusinessMetadata,
}

/// Editable, business-facing annotations of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    Datetime,
    Guid,
    Array,
    Object,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Datetime => "datetime",
            DataType::Guid => "guid",
            DataType::Array => "array",
            DataType::Object => "object",
        };
        write!(f, "{}", name)
    }
}

impl FieldNode {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            metadata: BusinessMetadata::default(),
        }
    }
}

impl GroupNode {
    pub fn new(name: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

impl SchemaNode {
    pub fn root(name: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        SchemaNode::Root(GroupNode::new(name, children))
    }

    pub fn parent(name: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        SchemaNode::Parent(GroupNode::new(name, children))
    }

    pub fn field(name: impl Into<String>, data_type: DataType) -> Self {
        SchemaNode::Field(FieldNode::new(name, data_type))
    }

    /// Parses and validates a schema tree from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let node: SchemaNode =
            serde_json::from_str(json).map_err(|e| SchemaError::InvalidSchemaJson(e.to_string()))?;
        node.validate()?;
        Ok(node)
    }

    /// Same as [`SchemaNode::from_json`] for an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SchemaError> {
        let node: SchemaNode = serde_json::from_value(value)
            .map_err(|e| SchemaError::InvalidSchemaJson(e.to_string()))?;
        node.validate()?;
        Ok(node)
    }

    pub fn name(&self) -> &str {
        match self {
            SchemaNode::Root(group) | SchemaNode::Parent(group) => &group.name,
            SchemaNode::Field(field) => &field.name,
        }
    }

    pub fn children(&self) -> &[SchemaNode] {
        match self {
            SchemaNode::Root(group) | SchemaNode::Parent(group) => &group.children,
            SchemaNode::Field(_) => &[],
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Root(_) => "root",
            SchemaNode::Parent(_) => "parent",
            SchemaNode::Field(_) => "field",
        }
    }

    pub fn as_field(&self) -> Option<&FieldNode> {
        match self {
            SchemaNode::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut FieldNode> {
        match self {
            SchemaNode::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Checks the tree-shape invariants: a single root at the top, non-empty
    /// dot-free names, and unique names among siblings.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let SchemaNode::Root(group) = self else {
            return Err(SchemaError::InvalidStructure {
                path: self.name().to_string(),
                message: format!("top-level node must be 'root', found '{}'", self.kind_name()),
            });
        };
        Self::validate_name(&group.name, "")?;
        Self::validate_children(&group.name, &group.children)
    }

    fn validate_children(parent_path: &str, children: &[SchemaNode]) -> Result<(), SchemaError> {
        let mut seen = AHashSet::new();
        for child in children {
            let name = child.name();
            Self::validate_name(name, parent_path)?;
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateName {
                    parent_path: parent_path.to_string(),
                    name: name.to_string(),
                });
            }
            let child_path = format!("{}.{}", parent_path, name);
            match child {
                SchemaNode::Root(_) => {
                    return Err(SchemaError::InvalidStructure {
                        path: child_path,
                        message: "'root' nodes may only appear at the top of a tree".to_string(),
                    });
                }
                SchemaNode::Parent(group) => Self::validate_children(&child_path, &group.children)?,
                SchemaNode::Field(_) => {}
            }
        }
        Ok(())
    }

    fn validate_name(name: &str, parent_path: &str) -> Result<(), SchemaError> {
        if name.is_empty() || name.contains('.') {
            return Err(SchemaError::InvalidStructure {
                path: if parent_path.is_empty() {
                    name.to_string()
                } else {
                    format!("{}.{}", parent_path, name)
                },
                message: "node names must be non-empty and must not contain '.'".to_string(),
            });
        }
        Ok(())
    }

    /// Returns a copy of this tree with the root renamed, e.g. to seed a
    /// destination schema from the source schema.
    pub fn clone_with_root_name(&self, root_name: &str) -> Result<Self, SchemaError> {
        let mut cloned = self.clone();
        if let SchemaNode::Root(group) = &mut cloned {
            group.name = root_name.to_string();
        }
        cloned.validate()?;
        Ok(cloned)
    }

    /// Finds the field at `path` for metadata editing.
    pub fn field_mut(&mut self, path: &FieldPath) -> Result<&mut FieldNode, SchemaError> {
        let node = self
            .find_by_path_mut(path)
            .ok_or_else(|| SchemaError::FieldNotFound(path.to_string()))?;
        node.as_field_mut()
            .ok_or_else(|| SchemaError::NotAField(path.to_string()))
    }

    /// Replaces the business metadata of the field at `path`.
    pub fn set_metadata(
        &mut self,
        path: &FieldPath,
        metadata: BusinessMetadata,
    ) -> Result<(), SchemaError> {
        self.field_mut(path)?.metadata = metadata;
        Ok(())
    }

    fn find_by_path_mut(&mut self, path: &FieldPath) -> Option<&mut SchemaNode> {
        if self.name() != path.root() {
            return None;
        }
        let mut current = self;
        for segment in path.document_segments() {
            current = match current {
                SchemaNode::Root(group) | SchemaNode::Parent(group) => group
                    .children
                    .iter_mut()
                    .find(|child| child.name() == segment.as_str())?,
                SchemaNode::Field(_) => return None,
            };
        }
        Some(current)
    }
}
