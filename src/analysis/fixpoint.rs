use std::collections::{HashMap, HashSet, VecDeque};

use itertools::Itertools;
use tracing::{instrument, trace};

use crate::{
    analysis::module_graph::ModuleGraph,
    ir::{Module, Operation, OperationId, Value},
};

/// A lattice with a least element.
pub trait AbstractDomain: Clone {
    fn bottom() -> Self;
    fn join(&self, other: &Self) -> Self;
    fn is_equivalent_to(&self, other: &Self) -> bool;
}

/// Transfer functions of an analysis, one operation at a time.
pub trait OperationSemantics {
    type State: AbstractDomain;

    /// State of values that no operation in the module defines, and of the
    /// outputs of seed operations.
    fn get_initial_state(&self) -> Self::State;

    /// Must return exactly one state per output of `operation`.
    fn apply_operation(&self, operation: &Operation, inputs: &[Self::State]) -> Vec<Self::State>;
}

/// Worklist fixpoint of an [`OperationSemantics`] over a whole module.
pub struct ModuleFixpointIterator<'s, S: OperationSemantics> {
    semantics: &'s S,
}

impl<'s, S: OperationSemantics> ModuleFixpointIterator<'s, S> {
    pub fn new(semantics: &'s S) -> Self {
        Self { semantics }
    }

    #[instrument(skip_all, name = "ModuleFixpointIterator::compute")]
    pub fn compute(&self, module: &Module) -> HashMap<Value, S::State> {
        let graph = ModuleGraph::new(module);
        self.compute_with_graph(&graph)
    }

    pub fn compute_with_graph(&self, graph: &ModuleGraph<'_>) -> HashMap<Value, S::State> {
        let mut states: HashMap<Value, S::State> = HashMap::new();
        let mut worklist = Worklist::default();

        for operation in graph.operations() {
            if operation.inputs().is_empty() {
                worklist.push(operation.id());
            }
            for input in operation.inputs() {
                if input.is_operation_result() || states.contains_key(input) {
                    continue;
                }
                states.insert(*input, self.semantics.get_initial_state());
                for (_, user) in graph.get_uses(*input) {
                    worklist.push(user);
                }
            }
        }

        let mut steps = 0usize;
        while let Some(op_id) = worklist.pop() {
            steps += 1;
            let operation = graph.get_operation(op_id);
            let inputs = operation
                .inputs()
                .iter()
                .map(|v| states.get(v).cloned().unwrap_or_else(S::State::bottom))
                .collect::<Vec<_>>();
            let outputs = self.semantics.apply_operation(operation, &inputs);
            if outputs.len() != operation.number_of_outputs() {
                panic!(
                    "Semantics produced {} results for operation `{}` with {} outputs",
                    outputs.len(),
                    operation.op().name(),
                    operation.number_of_outputs()
                );
            }

            for (index, new_state) in outputs.into_iter().enumerate() {
                let value = operation.get_output_value(index);
                let old = states.get(&value).cloned().unwrap_or_else(S::State::bottom);
                let joined = old.join(&new_state);
                let changed = !old.is_equivalent_to(&joined);
                if changed || !states.contains_key(&value) {
                    states.insert(value, joined);
                }
                if changed {
                    trace!("output {} of operation {} changed", index, op_id.0);
                    for (_, user) in graph.get_uses(value) {
                        worklist.push(user);
                    }
                }
            }
        }

        trace!(
            "fixpoint reached after {} steps over operations {}",
            steps,
            states
                .keys()
                .filter_map(|v| v.get_operation())
                .unique()
                .sorted()
                .map(|op| op.0.to_string())
                .join(", ")
        );
        states
    }
}

/// FIFO of operations, each present at most once.
#[derive(Default)]
struct Worklist {
    queue: VecDeque<OperationId>,
    queued: HashSet<OperationId>,
}

impl Worklist {
    fn push(&mut self, op: OperationId) {
        if self.queued.insert(op) {
            self.queue.push_back(op);
        }
    }

    fn pop(&mut self) -> Option<OperationId> {
        let op = self.queue.pop_front()?;
        self.queued.remove(&op);
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BlockBuilder, IrContext, ModuleBuilder, NamedAttributeMap, Operator};

    /// Distance from a seed, saturating at `LIMIT`.
    #[derive(Clone, Debug, PartialEq)]
    struct Depth(Option<u64>);

    const LIMIT: u64 = 3;

    impl AbstractDomain for Depth {
        fn bottom() -> Self {
            Depth(None)
        }

        fn join(&self, other: &Self) -> Self {
            Depth(self.0.max(other.0))
        }

        fn is_equivalent_to(&self, other: &Self) -> bool {
            self == other
        }
    }

    struct DepthSemantics;

    impl OperationSemantics for DepthSemantics {
        type State = Depth;

        fn get_initial_state(&self) -> Depth {
            Depth(Some(0))
        }

        fn apply_operation(&self, operation: &Operation, inputs: &[Depth]) -> Vec<Depth> {
            let depth = inputs
                .iter()
                .filter_map(|d| d.0)
                .max()
                .map(|d| (d + 1).min(LIMIT))
                .unwrap_or(0);
            vec![Depth(Some(depth)); operation.number_of_outputs()]
        }
    }

    struct WrongArity;

    impl OperationSemantics for WrongArity {
        type State = Depth;

        fn get_initial_state(&self) -> Depth {
            Depth(Some(0))
        }

        fn apply_operation(&self, _operation: &Operation, _inputs: &[Depth]) -> Vec<Depth> {
            vec![]
        }
    }

    fn make_context() -> IrContext {
        let mut ctx = IrContext::new();
        ctx.register_operator(Operator::new("core.constant"));
        ctx.register_operator(Operator::new("core.step"));
        ctx
    }

    #[test]
    fn test_straight_line() {
        let ctx = make_context();
        let mut block = BlockBuilder::new(&ctx);
        let seed = block.add_operation_by_name("core.constant", NamedAttributeMap::new(), vec![]);
        let a = block.add_operation_by_name("core.step", NamedAttributeMap::new(), vec![Value::default_result(seed)]);
        let b = block.add_operation_by_name("core.step", NamedAttributeMap::new(), vec![Value::default_result(a), Value::Any]);
        let mut module = ModuleBuilder::new(&ctx);
        module.add_block(block.build());
        let module = module.build();

        let states = ModuleFixpointIterator::new(&DepthSemantics).compute(&module);
        assert_eq!(states[&Value::default_result(seed)], Depth(Some(0)));
        assert_eq!(states[&Value::default_result(a)], Depth(Some(1)));
        assert_eq!(states[&Value::default_result(b)], Depth(Some(2)));
        assert_eq!(states[&Value::Any], Depth(Some(0)));
    }

    #[test]
    fn test_cycle_converges() {
        let ctx = make_context();
        let step = ctx.get_operator("core.step").expect("registered");
        let mut block = BlockBuilder::new(&ctx);
        let seed = block.add_operation_by_name("core.constant", NamedAttributeMap::new(), vec![]);
        let loop_head = ctx.fresh_operation_id();
        let loop_body = ctx.fresh_operation_id();
        block.add_existing_operation(Operation::new(
            loop_head,
            None,
            step.clone(),
            NamedAttributeMap::new(),
            vec![Value::default_result(seed), Value::default_result(loop_body)],
        ));
        block.add_existing_operation(Operation::new(
            loop_body,
            None,
            step,
            NamedAttributeMap::new(),
            vec![Value::default_result(loop_head)],
        ));
        let mut module = ModuleBuilder::new(&ctx);
        module.add_block(block.build());
        let module = module.build();

        let states = ModuleFixpointIterator::new(&DepthSemantics).compute(&module);
        assert_eq!(states[&Value::default_result(loop_head)], Depth(Some(LIMIT)));
        assert_eq!(states[&Value::default_result(loop_body)], Depth(Some(LIMIT)));
    }

    #[test]
    #[should_panic(expected = "Semantics produced 0 results for operation `core.constant` with 1 outputs")]
    fn test_wrong_result_count_is_fatal() {
        let ctx = make_context();
        let mut block = BlockBuilder::new(&ctx);
        block.add_operation_by_name("core.constant", NamedAttributeMap::new(), vec![]);
        let mut module = ModuleBuilder::new(&ctx);
        module.add_block(block.build());
        let module = module.build();
        ModuleFixpointIterator::new(&WrongArity).compute(&module);
    }
}
