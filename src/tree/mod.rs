//! Reconstructed object tree and back-reference table.

pub mod arena;
pub mod backref;

pub use arena::{NodeId, TraceNode, TraceTree};
pub use backref::{parse_backref_target, BackrefEntry, BackrefTable};
