use std::collections::HashMap;

use tracing::{instrument, trace};

use crate::{
    analysis::taint::{
        Conclusion, InferenceRule, InferenceRules, InferenceRulesBuilder, InputHasIntegrity,
        MergeKind, ModifyTag, ModifyTagKind, OutputRules,
    },
    ir::{Module, Value},
    policy::sql::{
        ops::{MergeOp, TagTransformOp},
        policy_rules::{Action, SqlPolicyRuleDescription},
    },
};

fn modify_tag_kind(action: Action) -> ModifyTagKind {
    match action {
        Action::AddConfidentiality => ModifyTagKind::AddSecrecy,
        Action::RemoveConfidentiality => ModifyTagKind::RemoveSecrecy,
        Action::AddIntegrity => ModifyTagKind::AddIntegrity,
    }
}

fn merge_rules(merge: MergeOp, kind: MergeKind) -> OutputRules {
    let indices = (0..merge.control_input_start_index()).collect();
    OutputRules::from([(0, vec![InferenceRule::merge_integrity(kind, indices)])])
}

fn tag_transform_rules(
    rule: &SqlPolicyRuleDescription,
    tag_transform: TagTransformOp,
    builder: &mut InferenceRulesBuilder,
) -> OutputRules {
    let input_indices = tag_transform.precondition_input_indices();
    let premises = rule
        .preconditions
        .iter()
        .map(|precondition| {
            let tag = builder.get_or_create_tag_id(&precondition.required_integrity_tag);
            let input_index = *input_indices
                .get(precondition.argument.as_str())
                .unwrap_or_else(|| panic!("Unable to find input index for '{}'.", precondition.argument));
            InputHasIntegrity { input_index, tag }
        })
        .collect();
    let modify = ModifyTag {
        kind: modify_tag_kind(rule.action),
        tag: builder.get_or_create_tag_id(&rule.tag),
    };
    OutputRules::from([(
        0,
        vec![
            InferenceRule::copy_input(TagTransformOp::TRANSFORMED_VALUE_INDEX),
            InferenceRule::with_premises(Conclusion::ModifyTag(modify), premises),
        ],
    )])
}

/// Compiles SQL policy rules into inference rules for the tag transforms
/// of `module`. Each transform becomes the action `<rule>_<n>`, where `n`
/// counts earlier transforms naming the same rule. The internal integrity
/// rules make the merge they consume the action instead.
#[instrument(skip_all, name = "decode_sql_policy_rules")]
pub fn decode_sql_policy_rules(
    rules: &[SqlPolicyRuleDescription],
    module: &Module,
    seed_tags: Vec<String>,
) -> InferenceRules {
    let mut builder = InferenceRulesBuilder::new(seed_tags);
    let mut rules_by_name: HashMap<&str, &SqlPolicyRuleDescription> = HashMap::new();
    for rule in rules {
        if rules_by_name.insert(rule.name.as_str(), rule).is_some() {
            panic!("Duplicate entry for rule name '{}'", rule.name);
        }
    }

    let mut rule_counts: HashMap<&str, u64> = HashMap::new();
    for operation in module.iter_operations() {
        let Some(tag_transform) = TagTransformOp::from_operation(operation) else {
            continue;
        };
        let rule_name = tag_transform.rule_name();
        let count = rule_counts.entry(rule_name).or_insert(0);
        let action = format!("{}_{}", rule_name, count);
        *count += 1;

        if tag_transform.is_internal_rule() {
            if operation.inputs().len() != 1 {
                panic!("Special tag transform op has more than one input.");
            }
            let Value::OperationResult { operation: merge_id, .. } = tag_transform.transformed_value() else {
                panic!("Argument of a special tag transform op is not an operation result.");
            };
            let merge = module
                .find_operation(merge_id)
                .and_then(MergeOp::from_operation)
                .unwrap_or_else(|| panic!("Special tag transform op is not referring to a MergeOp"));
            let kind = if rule_name == TagTransformOp::UNION_ITAG_RULE {
                MergeKind::Union
            } else {
                MergeKind::Intersect
            };
            builder.mark_operation_as_action(merge_id, &action);
            let output_rules = merge_rules(merge, kind);
            builder.add_output_rules_for_action(&action, output_rules);
        } else {
            let rule = rules_by_name
                .get(rule_name)
                .unwrap_or_else(|| panic!("No sql policy rule found for '{}'.", rule_name));
            builder.mark_operation_as_action(operation.id(), &action);
            let output_rules = tag_transform_rules(rule, tag_transform, &mut builder);
            builder.add_output_rules_for_action(&action, output_rules);
        }
        trace!("operation {} is action '{}'", operation.id().0, action);
    }
    builder.build()
}
