pub mod fixpoint;
pub mod module_graph;
pub mod taint;

pub use fixpoint::{AbstractDomain, ModuleFixpointIterator, OperationSemantics};
pub use module_graph::{ModuleGraph, Node};
