//! # Schema Mapper - Visual Schema-to-Schema Mapping Engine
//!
//! **Schema Mapper** models the mapping a user draws between two hierarchical
//! data schemas: a *source* tree and a *destination* tree. Fields are wired
//! together either directly or through small transform nodes ("functoids")
//! that concatenate, add, coalesce or convert values. The resulting graph can
//! be executed against a concrete source document to produce the destination
//! document, and saved to or loaded from a portable JSON mapping document.
//!
//! ## Core Workflow
//!
//! 1.  **Load Schemas**: Parse both trees with `SchemaNode::from_json`, or
//!     convert your own schema format by implementing `IntoSchema`.
//! 2.  **Draw the Mapping**: Connect field endpoints and transform ports on a
//!     `MappingSession` (or directly on a `MappingGraph`).
//! 3.  **Execute**: Run the mapping against a source document. The outcome
//!     carries the produced document, a step-by-step trace and any warnings.
//! 4.  **Persist**: Export the graph as a `MappingDocument` and import it
//!     again later; stale references are skipped and reported.
//!
//! ## Quick Start
//!
//! ```rust
//! use schema_mapper::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let source = SchemaNode::root(
//!         "SourceData",
//!         vec![SchemaNode::parent(
//!             "Customer",
//!             vec![
//!                 SchemaNode::field("FirstName", DataType::String),
//!                 SchemaNode::field("LastName", DataType::String),
//!             ],
//!         )],
//!     );
//!     let destination = SchemaNode::root(
//!         "DestinationData",
//!         vec![SchemaNode::parent(
//!             "Contact",
//!             vec![SchemaNode::field("FullName", DataType::String)],
//!         )],
//!     );
//!
//!     let mut session = MappingSession::new(source, destination)?;
//!     let concat = session.add_transform(TransformKind::String, None)?;
//!     session.connect(
//!         Endpoint::source("SourceData.Customer.FirstName")?,
//!         Endpoint::transform(concat, Port::Left),
//!     )?;
//!     session.connect(
//!         Endpoint::source("SourceData.Customer.LastName")?,
//!         Endpoint::transform(concat, Port::Left),
//!     )?;
//!     session.connect(
//!         Endpoint::transform(concat, Port::Right),
//!         Endpoint::destination("DestinationData.Contact.FullName")?,
//!     )?;
//!
//!     let input = json!({ "Customer": { "FirstName": "John", "LastName": "Doe" } });
//!     let outcome = session.execute(&input)?;
//!     assert_eq!(outcome.output, json!({ "Contact": { "FullName": "John Doe" } }));
//!
//!     println!("{}", TraceFormatter::format_trace(&outcome.trace));
//!     Ok(())
//! }
//! ```

pub mod describe;
pub mod document;
pub mod engine;
pub mod error;
pub mod graph;
pub mod path;
pub mod prelude;
pub mod schema;
pub mod session;
pub mod trace;
