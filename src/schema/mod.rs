//! The schema tree model consumed by the mapping core.
//!
//! Trees are supplied by an external loader (file, paste, or a connector) in
//! the `{ "name", "type": "root"|"parent"|"field", ... }` format. The core only
//! reads their shape and edits business metadata on field nodes.

pub mod conversion;
pub mod node;
pub mod pair;
pub mod traverse;

pub use conversion::*;
pub use node::*;
pub use pair::*;
pub use traverse::*;
