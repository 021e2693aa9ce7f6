use std::collections::HashMap;

use tracing::{info, instrument, trace};

use crate::{
    ir::{Module, Operation, Value},
    policy::{
        Policy, PolicyChecker,
        sql::{
            ops::{LiteralOp, MergeOp, SqlOutputOp, TagTransformOp},
            policy_rules::{Action, SqlPolicyRules, TagSet},
        },
    },
};

/// Secrecy and integrity of every operation result after the fixpoint.
#[derive(Clone, Debug, Default)]
pub struct ChaoticFixpoint {
    secrecy_tags: HashMap<Value, TagSet>,
    integrity_tags: HashMap<Value, TagSet>,
    passes: usize,
}

impl ChaoticFixpoint {
    pub fn secrecy_tags(&self, value: &Value) -> Option<&TagSet> {
        self.secrecy_tags.get(value)
    }

    pub fn integrity_tags(&self, value: &Value) -> Option<&TagSet> {
        self.integrity_tags.get(value)
    }

    /// Full passes over the module, the final unchanged one included.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Updates the entries of `value`. Returns whether anything changed,
    /// recording a first entry counting as a change.
    fn update(&mut self, value: Value, secrecy: TagSet, integrity: TagSet) -> bool {
        let secrecy_changed = self.secrecy_tags.get(&value) != Some(&secrecy);
        let integrity_changed = self.integrity_tags.get(&value) != Some(&integrity);
        if secrecy_changed {
            self.secrecy_tags.insert(value, secrecy);
        }
        if integrity_changed {
            self.integrity_tags.insert(value, integrity);
        }
        secrecy_changed || integrity_changed
    }
}

/// Checks SQL modules by re-evaluating every operation until no tag set
/// changes. Only merges and tag transforms move tags.
///
/// Termination relies on the rules: tag sets grow monotonically as long as
/// no cycle mixes adding and removing the same tag, and nothing bounds the
/// number of passes otherwise.
pub struct ChaoticIterator {
    policy_rules: SqlPolicyRules,
}

impl ChaoticIterator {
    pub fn new(policy_rules: SqlPolicyRules) -> Self {
        Self { policy_rules }
    }

    pub fn policy_rules(&self) -> &SqlPolicyRules {
        &self.policy_rules
    }

    #[instrument(skip_all, name = "ChaoticIterator::compute_fixpoint")]
    pub fn compute_fixpoint(&self, module: &Module) -> ChaoticFixpoint {
        let mut fixpoint = ChaoticFixpoint::default();
        let mut changed = true;
        while changed {
            changed = false;
            fixpoint.passes += 1;
            for operation in module.iter_operations() {
                let Some((secrecy, integrity)) = self.transfer(operation, &fixpoint) else {
                    continue;
                };
                changed |= fixpoint.update(Value::default_result(operation.id()), secrecy, integrity);
            }
            trace!("pass {} done, changed: {}", fixpoint.passes, changed);
        }
        fixpoint
    }

    /// New tag sets of the result of `operation`, or `None` when the
    /// operation is not part of the SQL front-end.
    fn transfer(&self, operation: &Operation, fixpoint: &ChaoticFixpoint) -> Option<(TagSet, TagSet)> {
        let mut secrecy = TagSet::new();
        let mut integrity = TagSet::new();

        if let Some(merge) = MergeOp::from_operation(operation) {
            for input in merge.operation().inputs() {
                if let Some(tags) = fixpoint.secrecy_tags(input) {
                    secrecy.extend(tags);
                }
            }
        } else if let Some(tag_transform) = TagTransformOp::from_operation(operation) {
            let value = tag_transform.transformed_value();
            if let Some(tags) = fixpoint.secrecy_tags(&value) {
                secrecy.extend(tags);
            }
            if !tag_transform.is_internal_rule() {
                let rule_name = tag_transform.rule_name();
                let rule = self
                    .policy_rules
                    .get_rule(rule_name)
                    .unwrap_or_else(|| panic!("Cannot find rule {}", rule_name));
                if let Some(tags) = fixpoint.integrity_tags(&value) {
                    integrity.extend(tags);
                }
                let fires = tag_transform.preconditions().into_iter().all(|(name, input)| {
                    match (fixpoint.integrity_tags(&input), rule.get_precondition_tag_set(name)) {
                        (Some(present), Some(required)) => required.is_subset(present),
                        _ => false,
                    }
                });
                if fires {
                    match rule.action() {
                        Action::AddConfidentiality => {
                            secrecy.insert(rule.tag());
                        }
                        Action::RemoveConfidentiality => {
                            secrecy.remove(&rule.tag());
                        }
                        Action::AddIntegrity => {
                            integrity.insert(rule.tag());
                        }
                    }
                }
            }
        } else if LiteralOp::from_operation(operation).is_none()
            && SqlOutputOp::from_operation(operation).is_none()
        {
            return None;
        }
        Some((secrecy, integrity))
    }

    /// Compliant iff nothing secret reaches an `sql.sql_output`.
    pub fn is_compliant(&self, module: &Module, fixpoint: &ChaoticFixpoint) -> bool {
        module
            .iter_operations()
            .filter_map(SqlOutputOp::from_operation)
            .flat_map(|output| output.inputs().iter())
            .all(|input| fixpoint.secrecy_tags(input).is_none_or(TagSet::is_empty))
    }
}

impl PolicyChecker for ChaoticIterator {
    fn is_module_policy_compliant(&self, module: &Module, _policy: &Policy) -> bool {
        let fixpoint = self.compute_fixpoint(module);
        let compliant = self.is_compliant(module, &fixpoint);
        info!(
            "chaotic iteration converged after {} passes, compliant: {}",
            fixpoint.passes(),
            compliant
        );
        compliant
    }
}
