//! Property graph holding people, places and visits
//!
//! - Nodes with labels and properties (`Person`, `Place`)
//! - Directed typed edges with properties (`VISITS`)
//! - Multiple edges between the same pair of nodes
//! - In-memory storage with label, name and adjacency indices
//! - All-or-nothing property write transactions

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod transaction;
pub mod types;

pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphStore};
pub use transaction::{PropertyWrite, Transaction};
pub use types::{EdgeId, EdgeType, Label, NodeId, PERSON_LABEL, PLACE_LABEL, VISITS_EDGE};
