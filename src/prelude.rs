//! Prelude module for convenient imports
//!
//! Re-exports the types most mapping code needs, so a single
//! `use schema_mapper::prelude::*;` is enough to load schemas, draw a mapping
//! and execute it.
//!
//! # Example
//!
//! ```rust,no_run
//! use schema_mapper::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let source = SchemaNode::from_json(&std::fs::read_to_string("source.json")?)?;
//! let destination = SchemaNode::from_json(&std::fs::read_to_string("destination.json")?)?;
//! let mapping = MappingDocument::from_json(&std::fs::read_to_string("mapping.json")?)?;
//!
//! let mut session = MappingSession::new(source, destination)?;
//! let report = session.import_mapping(&mapping);
//! for warning in &report.warnings {
//!     eprintln!("skipped: {}", warning);
//! }
//!
//! let input = serde_json::from_str(&std::fs::read_to_string("input.json")?)?;
//! let outcome = session.execute(&input)?;
//! println!("{}", serde_json::to_string_pretty(&outcome.output)?);
//! # Ok(())
//! # }
//! ```

// Session and execution
pub use crate::engine::{ConflictPolicy, ExecutionOutcome, Executor, TransformEvaluator};
pub use crate::session::MappingSession;

// Schema model
pub use crate::schema::{BusinessMetadata, DataType, IntoSchema, MappingSchemas, SchemaNode};

// Mapping graph
pub use crate::graph::{
    ConnectionId, Endpoint, MappingGraph, Port, Position, Side, TransformId, TransformKind,
};
pub use crate::path::FieldPath;

// Persistence
pub use crate::document::{ImportReport, MappingDocument};

// Error types
pub use crate::error::{
    DocumentError, ExecutionError, ExecutionWarning, GraphError, ImportWarning, PathError,
    SchemaError,
};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
