use crate::{
    analysis::taint::{
        abstract_ifc_tags::TagId, inference_rule::OutputRules, inference_rules::InferenceRules,
    },
    ir::OperationId,
};

pub struct InferenceRulesBuilder {
    rules: InferenceRules,
}

impl InferenceRulesBuilder {
    /// Seed tags get ids `0..seed_tag_names.len()` in the given order.
    pub fn new(seed_tag_names: Vec<String>) -> Self {
        let mut builder = Self {
            rules: InferenceRules::default(),
        };
        for name in seed_tag_names {
            if builder.rules.tags.contains_key(&name) {
                panic!("Duplicate seed tag name '{}'", name);
            }
            builder.get_or_create_tag_id(&name);
        }
        builder
    }

    pub fn get_or_create_tag_id(&mut self, name: &str) -> TagId {
        if let Some(id) = self.rules.tags.get(name) {
            return *id;
        }
        let id = self.rules.tag_names.len() as TagId;
        self.rules.tag_names.push(name.to_string());
        self.rules.tags.insert(name.to_string(), id);
        id
    }

    pub fn mark_operation_as_action(&mut self, operation: OperationId, action: &str) {
        if self.rules.actions.contains_key(&operation) {
            panic!("Operation {} is already marked as an action", operation.0);
        }
        self.rules.actions.insert(operation, action.to_string());
    }

    pub fn add_output_rules_for_action(&mut self, action: &str, output_rules: OutputRules) {
        if self.rules.action_rules.contains_key(action) {
            panic!("Duplicate rules for action '{}'", action);
        }
        self.rules
            .action_rules
            .insert(action.to_string(), output_rules);
    }

    pub fn build(self) -> InferenceRules {
        self.rules
    }
}
