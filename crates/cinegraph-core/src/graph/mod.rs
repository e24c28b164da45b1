//! Typed property graph: model, store contracts and the in-process backend.

pub mod memory;
pub mod model;
pub mod store;

pub use memory::MemoryGraph;
pub use model::{Direction, Label, Node, NodeRef, Properties, Relation};
pub use store::{finish, GraphStore, ReadContext, WriteContext};
