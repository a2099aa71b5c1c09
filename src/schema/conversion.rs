use super::{BusinessMetadata, DataType, FieldNode, GroupNode, SchemaNode};
use crate::error::SchemaError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A trait for external schema descriptions that can be turned into a mapping
/// `SchemaNode` tree.
///
/// This is the seam through which connectors hand their discovered schemas to
/// the mapping core. A connector parses its own wire format, then implements
/// `IntoSchema` to produce a validated tree.
///
/// # Example
///
/// ```rust
/// use schema_mapper::schema::{DataType, IntoSchema, SchemaNode};
/// use schema_mapper::error::SchemaError;
///
/// struct Table {
///     name: String,
///     columns: Vec<String>,
/// }
///
/// impl IntoSchema for Table {
///     fn into_schema(self) -> Result<SchemaNode, SchemaError> {
///         let children = self
///             .columns
///             .into_iter()
///             .map(|c| SchemaNode::field(c, DataType::String))
///             .collect();
///         let tree = SchemaNode::root(self.name, children);
///         tree.validate()?;
///         Ok(tree)
///     }
/// }
///
/// let table = Table { name: "Orders".into(), columns: vec!["Id".into()] };
/// assert_eq!(table.into_schema().unwrap().children().len(), 1);
/// ```
pub trait IntoSchema {
    /// Consumes the description and converts it into a validated schema tree.
    fn into_schema(self) -> Result<SchemaNode, SchemaError>;
}

/// A JSON-Schema-like entity description, as produced by metadata discovery
/// connectors: `{ "type": "object", "title", "properties", "required" }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityDescription {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl EntityDescription {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::InvalidSchemaJson(e.to_string()))
    }

    fn convert_properties(&self, parent_path: &str) -> Result<Vec<SchemaNode>, SchemaError> {
        self.properties
            .iter()
            .map(|(name, raw)| {
                let property: EntityDescription = serde_json::from_value(raw.clone()).map_err(
                    |e| SchemaError::InvalidStructure {
                        path: format!("{}.{}", parent_path, name),
                        message: e.to_string(),
                    },
                )?;
                let is_required = self.required.iter().any(|r| r == name);
                property.into_node(name, parent_path, is_required)
            })
            .collect()
    }

    fn into_node(
        self,
        name: &str,
        parent_path: &str,
        is_required: bool,
    ) -> Result<SchemaNode, SchemaError> {
        if self.kind.as_deref() == Some("object") && !self.properties.is_empty() {
            let path = format!("{}.{}", parent_path, name);
            let children = self.convert_properties(&path)?;
            return Ok(SchemaNode::Parent(GroupNode::new(name, children)));
        }

        let data_type = Self::map_data_type(self.kind.as_deref(), self.format.as_deref());
        Ok(SchemaNode::Field(FieldNode {
            name: name.to_string(),
            data_type,
            metadata: BusinessMetadata {
                business_description: self.description,
                required: is_required.then_some(true),
                format: self.format,
                default_value: None,
            },
        }))
    }

    /// Maps JSON Schema `type`/`format` pairs onto field data types.
    /// Unknown or missing types fall back to `string`.
    fn map_data_type(kind: Option<&str>, format: Option<&str>) -> DataType {
        match (kind, format) {
            (Some("integer"), _) => DataType::Integer,
            (Some("number"), _) => DataType::Number,
            (Some("boolean"), _) => DataType::Boolean,
            (Some("array"), _) => DataType::Array,
            (Some("object"), _) => DataType::Object,
            (_, Some("date-time")) => DataType::Datetime,
            (_, Some("date")) => DataType::Date,
            (_, Some("uuid")) => DataType::Guid,
            _ => DataType::String,
        }
    }
}

impl IntoSchema for EntityDescription {
    fn into_schema(self) -> Result<SchemaNode, SchemaError> {
        let root_name = self
            .title
            .clone()
            .ok_or_else(|| SchemaError::InvalidStructure {
                path: String::new(),
                message: "entity description has no 'title' to use as the root name".to_string(),
            })?;
        let children = self.convert_properties(&root_name)?;
        let tree = SchemaNode::Root(GroupNode::new(root_name, children));
        tree.validate()?;
        Ok(tree)
    }
}
