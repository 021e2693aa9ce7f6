//! Policies and the checkers deciding whether a module complies with one.

pub mod abstract_interpretation;
pub mod chaotic_iterator;
pub mod dp_parameter;
pub mod sql;

use crate::ir::Module;

pub use abstract_interpretation::AbstractInterpretationPolicyChecker;
pub use chaotic_iterator::ChaoticIterator;
pub use dp_parameter::{DpBudgetChecker, DpParameter, DpParameterPolicy};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Policy {
    SqlPolicyRule { facts: String },
    Catchall { facts: String },
    DpParameter(DpParameterPolicy),
}

impl Policy {
    pub fn sql_policy_rule(facts: impl Into<String>) -> Self {
        Policy::SqlPolicyRule {
            facts: facts.into(),
        }
    }

    pub fn catchall(facts: impl Into<String>) -> Self {
        Policy::Catchall {
            facts: facts.into(),
        }
    }

    /// Name of the relation the policy's facts populate.
    pub fn fact_name(&self) -> &'static str {
        match self {
            Policy::SqlPolicyRule { .. } | Policy::Catchall { .. } => "isSqlPolicyRule",
            Policy::DpParameter(_) => DpParameterPolicy::FACT_NAME,
        }
    }

    pub fn facts(&self) -> String {
        match self {
            Policy::SqlPolicyRule { facts } | Policy::Catchall { facts } => facts.clone(),
            Policy::DpParameter(dp) => dp.facts(),
        }
    }
}

pub trait PolicyChecker {
    fn is_module_policy_compliant(&self, module: &Module, policy: &Policy) -> bool;
}
