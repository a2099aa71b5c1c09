use crate::error::DocumentError;
use crate::graph::{Port, Position, Side, TransformId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The complete persisted form of a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mappings: Vec<MappingEntry>,
    #[serde(default)]
    pub functoids: Vec<FunctoidEntry>,
}

/// One connection, as the descriptors of both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub source: EndpointDescriptor,
    pub target: EndpointDescriptor,
}

/// One transform node. `type` is kept as text so that an unknown type skips
/// the entry instead of failing the whole document.
///
/// `position` is written only for placed transforms. A transform without one
/// is left for the renderer to place, and a missing `position` reads back as
/// unplaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctoidEntry {
    pub id: TransformId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EndpointDescriptor {
    Field {
        path: String,
        schema: Side,
    },
    Functoid {
        #[serde(rename = "functoidId")]
        functoid_id: Option<TransformId>,
        #[serde(rename = "connectorSide")]
        connector_side: Port,
    },
}

impl MappingDocument {
    /// Parses a mapping document and checks its major version.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: MappingDocument = serde_json::from_str(json)
            .map_err(|e| DocumentError::InvalidMappingJson(e.to_string()))?;
        document.check_version()?;
        Ok(document)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DocumentError::InvalidMappingJson(e.to_string()))
    }

    /// Accepts any `1.x` version.
    pub fn check_version(&self) -> Result<(), DocumentError> {
        match self.version.split('.').next() {
            Some("1") => Ok(()),
            _ => Err(DocumentError::UnsupportedVersion(self.version.clone())),
        }
    }
}
