use std::collections::HashMap;

use itertools::Itertools;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use tracing::trace;

use crate::ir::{Module, Operation, OperationId, Value, visitor::IrTraversingVisitor};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Node {
    Value(Value),
    Operation(OperationId),
}

/// Read-only dataflow view of a module. Every input of an operation is an
/// edge `input --i--> operation` and every output an edge
/// `operation --i--> output`. Edge weights are the input or output index.
///
/// Every operation and every output value has an entry, even when it has
/// no out-edges, so asking about a node that is not in the module is a bug
/// rather than an empty answer.
pub struct ModuleGraph<'m> {
    graph: DiGraph<Node, usize>,
    node_to_index: HashMap<Node, NodeIndex<u32>>,
    operations: HashMap<OperationId, &'m Operation>,
    operation_order: Vec<OperationId>,
}

impl<'m> ModuleGraph<'m> {
    #[tracing::instrument(skip_all, name = "ModuleGraph::new")]
    pub fn new(module: &'m Module) -> Self {
        let mut builder = AdjacencyListBuilder {
            graph: ModuleGraph {
                graph: DiGraph::new(),
                node_to_index: HashMap::new(),
                operations: HashMap::new(),
                operation_order: Vec::new(),
            },
        };
        module.traverse(&mut builder);
        let graph = builder.graph;
        trace!(
            "{} nodes, {} edges",
            graph.graph.node_count(),
            graph.graph.edge_count()
        );
        graph
    }

    fn ensure_node(&mut self, node: Node) -> NodeIndex<u32> {
        if let Some(index) = self.node_to_index.get(&node) {
            return *index;
        }
        let index = self.graph.add_node(node);
        self.node_to_index.insert(node, index);
        index
    }

    fn add_edge(&mut self, source: Node, index: usize, target: Node) {
        let from = self.ensure_node(source);
        let to = self.ensure_node(target);
        let exists = self
            .graph
            .edges_connecting(from, to)
            .any(|edge| *edge.weight() == index);
        if !exists {
            self.graph.add_edge(from, to, index);
        }
    }

    pub fn contains(&self, node: Node) -> bool {
        self.node_to_index.contains_key(&node)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Out-edges of `node` as `(index, target)` pairs, ordered.
    pub fn get_out_edges(&self, node: Node) -> Vec<(usize, Node)> {
        let index = match self.node_to_index.get(&node) {
            Some(index) => *index,
            None => panic!("Node {:?} is not present in the ModuleGraph", node),
        };
        self.graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| (*edge.weight(), self.graph[edge.target()]))
            .sorted()
            .collect()
    }

    /// Operations reading `value`, with the input position they read it at.
    pub fn get_uses(&self, value: Value) -> Vec<(usize, OperationId)> {
        self.get_out_edges(Node::Value(value))
            .into_iter()
            .map(|(index, target)| match target {
                Node::Operation(operation) => (index, operation),
                Node::Value(_) => panic!("ModuleGraph has an unexpected edge."),
            })
            .collect()
    }

    /// Values produced by `operation`, with their output index.
    pub fn get_results(&self, operation: OperationId) -> Vec<(usize, Value)> {
        self.get_out_edges(Node::Operation(operation))
            .into_iter()
            .map(|(index, target)| match target {
                Node::Value(value) if value.is_operation_result() => (index, value),
                _ => panic!("ModuleGraph has an unexpected edge."),
            })
            .collect()
    }

    pub fn get_operation(&self, id: OperationId) -> &'m Operation {
        self.operations
            .get(&id)
            .copied()
            .expect("Operation should exist")
    }

    /// All operations, nested implementations included, in traversal order.
    pub fn operations(&self) -> impl Iterator<Item = &'m Operation> + '_ {
        self.operation_order.iter().map(|id| self.operations[id])
    }
}

struct AdjacencyListBuilder<'m> {
    graph: ModuleGraph<'m>,
}

impl<'m> IrTraversingVisitor<'m> for AdjacencyListBuilder<'m> {
    type Output = ();

    fn get_default_value(&mut self) {}

    fn pre_visit_operation(&mut self, operation: &'m Operation) {
        let op_node = Node::Operation(operation.id());
        self.graph.ensure_node(op_node);
        self.graph.operations.insert(operation.id(), operation);
        self.graph.operation_order.push(operation.id());
        for (i, input) in operation.inputs().iter().enumerate() {
            self.graph.add_edge(Node::Value(*input), i, op_node);
        }
        for (i, output) in operation.get_outputs().enumerate() {
            self.graph.add_edge(op_node, i, Node::Value(output));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BlockBuilder, IrContext, ModuleBuilder, NamedAttributeMap, Operator};

    fn make_context() -> IrContext {
        let mut ctx = IrContext::new();
        ctx.register_operator(Operator::new("core.constant"));
        ctx.register_operator(Operator::new("core.copy"));
        ctx.register_operator(Operator::new("core.merge"));
        ctx.register_operator(Operator::with_return_values("core.triple", 3));
        ctx
    }

    fn add(block: &mut BlockBuilder, name: &str, inputs: Vec<Value>) -> OperationId {
        block.add_operation_by_name(name, NamedAttributeMap::new(), inputs)
    }

    #[test]
    fn test_straight_line_chain() {
        let ctx = make_context();
        let mut block = BlockBuilder::new(&ctx);
        let op0 = add(&mut block, "core.constant", vec![]);
        let op1 = add(&mut block, "core.copy", vec![Value::default_result(op0)]);
        let op2 = add(&mut block, "core.copy", vec![Value::default_result(op1)]);
        let op3 = add(&mut block, "core.copy", vec![Value::default_result(op2)]);
        let mut module = ModuleBuilder::new(&ctx);
        module.add_block(block.build());
        let module = module.build();

        let graph = ModuleGraph::new(&module);
        let ops = [op0, op1, op2, op3];
        for op in ops {
            assert_eq!(graph.get_results(op), vec![(0, Value::default_result(op))]);
        }
        for pair in ops.windows(2) {
            assert_eq!(graph.get_uses(Value::default_result(pair[0])), vec![(0, pair[1])]);
        }
        assert!(graph.get_uses(Value::default_result(op3)).is_empty());
        // 4 operations and 4 values; 3 input edges and 4 output edges.
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.edge_count(), 7);
        assert_eq!(
            graph.operations().map(|op| op.id()).collect::<Vec<_>>(),
            ops.to_vec()
        );
    }

    #[test]
    fn test_multiple_outputs_and_repeated_inputs() {
        let ctx = make_context();
        let mut block = BlockBuilder::new(&ctx);
        let triple = add(&mut block, "core.triple", vec![]);
        let first = Value::result(triple, 0);
        let merge = add(&mut block, "core.merge", vec![first, first, Value::result(triple, 2)]);
        let mut module = ModuleBuilder::new(&ctx);
        module.add_block(block.build());
        let module = module.build();

        let graph = ModuleGraph::new(&module);
        assert_eq!(
            graph.get_results(triple),
            vec![
                (0, Value::result(triple, 0)),
                (1, Value::result(triple, 1)),
                (2, Value::result(triple, 2)),
            ]
        );
        assert_eq!(graph.get_uses(first), vec![(0, merge), (1, merge)]);
        assert_eq!(graph.get_uses(Value::result(triple, 2)), vec![(2, merge)]);
        assert!(graph.get_uses(Value::result(triple, 1)).is_empty());
        assert!(graph.contains(Node::Operation(merge)));
        assert_eq!(graph.get_operation(merge).inputs().len(), 3);
    }

    #[test]
    fn test_non_result_values_are_nodes() {
        let ctx = make_context();
        let mut block = BlockBuilder::new(&ctx);
        let copy = add(&mut block, "core.copy", vec![Value::Any]);
        let merge = add(&mut block, "core.merge", vec![Value::Any, Value::Constant(1)]);
        let mut module = ModuleBuilder::new(&ctx);
        module.add_block(block.build());
        let module = module.build();

        let graph = ModuleGraph::new(&module);
        assert_eq!(graph.get_uses(Value::Any), vec![(0, copy), (0, merge)]);
        assert_eq!(graph.get_uses(Value::Constant(1)), vec![(1, merge)]);
    }

    #[test]
    #[should_panic(expected = "is not present in the ModuleGraph")]
    fn test_unknown_node_is_fatal() {
        let ctx = make_context();
        let module = ModuleBuilder::new(&ctx).build();
        let graph = ModuleGraph::new(&module);
        graph.get_out_edges(Node::Operation(OperationId(99)));
    }
}
