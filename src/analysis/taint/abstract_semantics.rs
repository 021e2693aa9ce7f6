use std::collections::BTreeSet;

use tracing::trace;

use crate::{
    analysis::{
        fixpoint::OperationSemantics,
        taint::{
            abstract_ifc_tags::{AbstractIfcTags, TagId},
            inference_rule::{
                Conclusion, InferenceRule, MergeIntegrityTags, MergeKind, ModifyTag, ModifyTagKind,
            },
            inference_rules::InferenceRules,
        },
    },
    ir::Operation,
};

/// Transfer function of the taint analysis. An operation either implements
/// an action, and its outputs are computed by that action's rules, or it
/// does not and its outputs take the default result.
pub struct AbstractSemantics<'r> {
    rules: &'r InferenceRules,
}

impl<'r> AbstractSemantics<'r> {
    pub fn new(rules: &'r InferenceRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &InferenceRules {
        self.rules
    }

    /// Seed operations (no inputs) produce untagged values. Otherwise a
    /// `Bottom` input makes the result `Bottom`, and known inputs pass their
    /// joined secrecy on. Integrity is never kept by default.
    pub fn default_result(&self, inputs: &[AbstractIfcTags]) -> AbstractIfcTags {
        if inputs.iter().any(AbstractIfcTags::is_bottom) {
            return AbstractIfcTags::bottom();
        }
        let secrecy = inputs
            .iter()
            .flat_map(|input| input.secrecy_tags().iter().copied())
            .collect::<BTreeSet<_>>();
        AbstractIfcTags::new(secrecy, [])
    }

    pub fn apply_operation_transformer(
        &self,
        operation: &Operation,
        inputs: &[AbstractIfcTags],
    ) -> Vec<AbstractIfcTags> {
        let num_outputs = operation.number_of_outputs();
        let default = self.default_result(inputs);
        let mut results = vec![default.clone(); num_outputs];

        let Some(action) = self.rules.get_action(operation) else {
            return results;
        };
        let output_rules = self
            .rules
            .get_output_rules_for_action(action)
            .unwrap_or_else(|| panic!("No inference rules for action '{}'", action));

        for (index, sequence) in output_rules {
            if *index >= num_outputs {
                panic!(
                    "Output index {} in rules of action '{}' is out of bounds for operation `{}` with {} outputs",
                    index,
                    action,
                    operation.op().name(),
                    num_outputs
                );
            }
            results[*index] = sequence.iter().fold(default.clone(), |acc, rule| {
                self.interpret_inference_rule(rule, inputs, acc)
            });
        }
        trace!(
            "operation `{}` as action '{}': [{}]",
            operation.op().name(),
            action,
            results
                .iter()
                .map(|r| r.to_string(self.rules.tag_names()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        results
    }

    pub fn interpret_inference_rule(
        &self,
        rule: &InferenceRule,
        inputs: &[AbstractIfcTags],
        current: AbstractIfcTags,
    ) -> AbstractIfcTags {
        if !Self::premises_hold(rule, inputs) {
            return current;
        }
        match &rule.conclusion {
            Conclusion::CopyInput(copy) => match inputs.get(copy.input_index) {
                Some(input) => input.clone(),
                None => panic!(
                    "Input index {} in CopyInput is out of bounds for {} inputs",
                    copy.input_index,
                    inputs.len()
                ),
            },
            Conclusion::ModifyTag(modify) => Self::modify_tag(modify, &current),
            Conclusion::MergeIntegrityTags(merge) => Self::merge_integrity_tags(merge, inputs, &current),
        }
    }

    /// Every premise must name a known input that carries the tag.
    fn premises_hold(rule: &InferenceRule, inputs: &[AbstractIfcTags]) -> bool {
        rule.premises.iter().all(|premise| {
            let input = inputs.get(premise.input_index).unwrap_or_else(|| {
                panic!(
                    "Premise index {} is out of bounds for {} inputs",
                    premise.input_index,
                    inputs.len()
                )
            });
            !input.is_bottom() && input.has_integrity(premise.tag)
        })
    }

    fn modify_tag(modify: &ModifyTag, current: &AbstractIfcTags) -> AbstractIfcTags {
        match modify.kind {
            ModifyTagKind::AddSecrecy => current.add_secrecy(modify.tag),
            ModifyTagKind::RemoveSecrecy => current.remove_secrecy(modify.tag),
            ModifyTagKind::AddIntegrity => current.add_integrity(modify.tag),
            ModifyTagKind::RemoveIntegrity => current.remove_integrity(modify.tag),
        }
    }

    fn merge_integrity_tags(
        merge: &MergeIntegrityTags,
        inputs: &[AbstractIfcTags],
        current: &AbstractIfcTags,
    ) -> AbstractIfcTags {
        // Waiting until every input is known gives a more precise fixpoint
        // than merging the inputs seen so far.
        if current.is_bottom() || inputs.iter().any(AbstractIfcTags::is_bottom) {
            return AbstractIfcTags::bottom();
        }
        let mut merged: Option<BTreeSet<TagId>> = None;
        for index in &merge.input_indices {
            let input = inputs.get(*index).unwrap_or_else(|| {
                panic!(
                    "Index {} in MergeIntegrityTags is out of bounds for {} inputs",
                    index,
                    inputs.len()
                )
            });
            let tags = input.integrity_tags();
            merged = Some(match (merged, merge.kind) {
                (None, _) => tags.clone(),
                (Some(acc), MergeKind::Union) => acc.union(tags).copied().collect(),
                (Some(acc), MergeKind::Intersect) => acc.intersection(tags).copied().collect(),
            });
        }
        current.with_integrity(merged.unwrap_or_default())
    }
}

impl OperationSemantics for AbstractSemantics<'_> {
    type State = AbstractIfcTags;

    fn get_initial_state(&self) -> AbstractIfcTags {
        AbstractIfcTags::empty()
    }

    fn apply_operation(&self, operation: &Operation, inputs: &[AbstractIfcTags]) -> Vec<AbstractIfcTags> {
        self.apply_operation_transformer(operation, inputs)
    }
}
