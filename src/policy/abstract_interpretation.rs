use std::collections::{HashMap, HashSet};

use tracing::{info, instrument};

use crate::{
    analysis::{
        fixpoint::ModuleFixpointIterator,
        module_graph::ModuleGraph,
        taint::{AbstractIfcTags, AbstractSemantics, InferenceRules},
    },
    ir::{Module, Value},
    policy::{Policy, PolicyChecker},
};

/// Runs the taint fixpoint and requires every input of an egress operation
/// to carry no secrecy tag.
pub struct AbstractInterpretationPolicyChecker {
    inference_rules: InferenceRules,
    egress_operators: HashSet<String>,
}

impl AbstractInterpretationPolicyChecker {
    pub fn new<S: Into<String>>(
        inference_rules: InferenceRules,
        egress_operators: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            inference_rules,
            egress_operators: egress_operators.into_iter().map(Into::into).collect(),
        }
    }

    pub fn inference_rules(&self) -> &InferenceRules {
        &self.inference_rules
    }

    #[instrument(skip_all, name = "AbstractInterpretationPolicyChecker::compute_ifc_tags")]
    pub fn compute_ifc_tags(&self, module: &Module) -> HashMap<Value, AbstractIfcTags> {
        let graph = ModuleGraph::new(module);
        self.compute_with_graph(&graph)
    }

    fn compute_with_graph(&self, graph: &ModuleGraph<'_>) -> HashMap<Value, AbstractIfcTags> {
        let semantics = AbstractSemantics::new(&self.inference_rules);
        ModuleFixpointIterator::new(&semantics).compute_with_graph(graph)
    }
}

impl PolicyChecker for AbstractInterpretationPolicyChecker {
    #[instrument(skip_all, name = "AbstractInterpretationPolicyChecker::is_module_policy_compliant")]
    fn is_module_policy_compliant(&self, module: &Module, _policy: &Policy) -> bool {
        let graph = ModuleGraph::new(module);
        let states = self.compute_with_graph(&graph);
        let tag_names = self.inference_rules.tag_names();

        let mut compliant = true;
        for operation in graph.operations() {
            if !self.egress_operators.contains(operation.op().name()) {
                continue;
            }
            for input in operation.inputs() {
                // Unknown values never reach the egress.
                let Some(tags) = states.get(input).filter(|tags| !tags.is_bottom()) else {
                    continue;
                };
                if !tags.has_no_secrecy() {
                    info!(
                        "operation {} (`{}`) receives secret value {}",
                        operation.id().0,
                        operation.op().name(),
                        tags.to_string(tag_names)
                    );
                    compliant = false;
                }
            }
        }
        info!("compliant: {}", compliant);
        compliant
    }
}
