//! The portable mapping document: export and import of a `MappingGraph`.
//!
//! The document lists transforms ("functoids") by id, type and position, and
//! connections by a descriptor of each end. Import re-resolves every
//! descriptor against the live schemas and skips what no longer exists.

mod import;
mod types;

pub use import::*;
pub use types::*;

use crate::graph::{Endpoint, MappingGraph};
use chrono::{DateTime, Utc};

pub const MAPPING_DOCUMENT_VERSION: &str = "1.0";

/// Exports `graph` stamped with the current time.
pub fn export(graph: &MappingGraph) -> MappingDocument {
    export_at(graph, Utc::now())
}

/// Exports `graph` with an explicit timestamp.
pub fn export_at(graph: &MappingGraph, timestamp: DateTime<Utc>) -> MappingDocument {
    MappingDocument {
        version: MAPPING_DOCUMENT_VERSION.to_string(),
        timestamp: Some(timestamp),
        mappings: graph
            .connections()
            .iter()
            .map(|c| MappingEntry {
                source: describe(&c.from),
                target: describe(&c.to),
            })
            .collect(),
        functoids: graph
            .transforms()
            .iter()
            .map(|t| FunctoidEntry {
                id: t.id,
                kind: t.kind.to_string(),
                position: t.position,
            })
            .collect(),
    }
}

fn describe(endpoint: &Endpoint) -> EndpointDescriptor {
    match endpoint {
        Endpoint::Field { path, side } => EndpointDescriptor::Field {
            path: path.to_string(),
            schema: *side,
        },
        Endpoint::Transform { transform_id, port } => EndpointDescriptor::Functoid {
            functoid_id: Some(*transform_id),
            connector_side: *port,
        },
    }
}
