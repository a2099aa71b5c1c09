use crate::error::PathError;
use crate::path::FieldPath;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type TransformId = u64;
pub type ConnectionId = u64;

/// Which schema tree a field endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "source")]
    Source,
    #[serde(rename = "dest")]
    Destination,
}

/// The two ports of a transform node: inputs arrive on the left, the result
/// leaves on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Port {
    Left,
    Right,
}

/// One end of a connection. Endpoints are plain values; two endpoints are the
/// same endpoint exactly when their descriptors are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    Field { path: FieldPath, side: Side },
    Transform { transform_id: TransformId, port: Port },
}

impl Endpoint {
    pub fn field(path: &str, side: Side) -> Result<Self, PathError> {
        Ok(Endpoint::Field {
            path: FieldPath::parse(path)?,
            side,
        })
    }

    pub fn source(path: &str) -> Result<Self, PathError> {
        Self::field(path, Side::Source)
    }

    pub fn destination(path: &str) -> Result<Self, PathError> {
        Self::field(path, Side::Destination)
    }

    pub fn transform(transform_id: TransformId, port: Port) -> Self {
        Endpoint::Transform { transform_id, port }
    }

    pub fn transform_id(&self) -> Option<TransformId> {
        match self {
            Endpoint::Transform { transform_id, .. } => Some(*transform_id),
            Endpoint::Field { .. } => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Destination => write!(f, "destination"),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Left => write!(f, "left"),
            Port::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Field { path, side } => write!(f, "{}:{}", side, path),
            Endpoint::Transform { transform_id, port } => {
                write!(f, "transform#{}.{}", transform_id, port)
            }
        }
    }
}
