use super::TransformId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The behaviour family of a transform node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    String,
    Math,
    Logical,
    Conversion,
}

impl TransformKind {
    pub const ALL: [TransformKind; 4] = [
        TransformKind::String,
        TransformKind::Math,
        TransformKind::Logical,
        TransformKind::Conversion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::String => "string",
            TransformKind::Math => "math",
            TransformKind::Logical => "logical",
            TransformKind::Conversion => "conversion",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransformKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown transform type '{}'", s))
    }
}

/// Canvas coordinates of a transform node. Presentational only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A functoid placed on the mapping canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformNode {
    pub id: TransformId,
    pub kind: TransformKind,
    /// `None` means "not placed yet"; the renderer centres such nodes.
    pub position: Option<Position>,
}
