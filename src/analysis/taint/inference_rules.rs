use std::collections::HashMap;

use crate::{
    analysis::taint::{abstract_ifc_tags::TagId, inference_rule::OutputRules},
    ir::{OperationId, Operation},
};

/// Compiled policy: which operations implement which action, the rules of
/// each action and the tag name table. Only [`InferenceRulesBuilder`]
/// creates these.
///
/// [`InferenceRulesBuilder`]: crate::analysis::taint::InferenceRulesBuilder
#[derive(Clone, Debug, Default)]
pub struct InferenceRules {
    pub(super) tags: HashMap<String, TagId>,
    pub(super) tag_names: Vec<String>,
    pub(super) actions: HashMap<OperationId, String>,
    pub(super) action_rules: HashMap<String, OutputRules>,
}

impl InferenceRules {
    pub fn get_tag_id(&self, name: &str) -> Option<TagId> {
        self.tags.get(name).copied()
    }

    pub fn get_tag_name(&self, tag: TagId) -> &str {
        self.tag_names
            .get(tag as usize)
            .unwrap_or_else(|| panic!("Unknown tag id {}", tag))
    }

    pub fn tag_names(&self) -> &[String] {
        &self.tag_names
    }

    pub fn actions(&self) -> &HashMap<OperationId, String> {
        &self.actions
    }

    pub fn action_rules(&self) -> &HashMap<String, OutputRules> {
        &self.action_rules
    }

    pub fn get_action(&self, operation: &Operation) -> Option<&str> {
        self.actions.get(&operation.id()).map(String::as_str)
    }

    pub fn get_output_rules_for_action(&self, action: &str) -> Option<&OutputRules> {
        self.action_rules.get(action)
    }

    pub fn get_output_rules_for_operation(&self, operation: &Operation) -> Option<&OutputRules> {
        self.get_action(operation)
            .and_then(|action| self.get_output_rules_for_action(action))
    }
}
