use std::collections::HashMap;

use tracing::{info, instrument, trace};

use crate::{
    analysis::{
        fixpoint::{AbstractDomain, ModuleFixpointIterator, OperationSemantics},
        module_graph::ModuleGraph,
    },
    ir::{Module, Operation, Value},
    policy::{Policy, PolicyChecker},
};

pub type DpParameter = u64;

pub const GROUP_BY: &str = "sql.group_by";
pub const PRIVACY_MECHANISM: &str = "privacy_mechanism";
pub const EPSILON: &str = "epsilon";
pub const DELTA: &str = "delta";

/// A global differential-privacy budget.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DpParameterPolicy {
    epsilon: DpParameter,
    delta: DpParameter,
}

impl DpParameterPolicy {
    pub const FACT_NAME: &'static str = "isDPParameter";

    pub fn new(epsilon: DpParameter, delta: DpParameter) -> Self {
        Self { epsilon, delta }
    }

    pub fn epsilon(&self) -> DpParameter {
        self.epsilon
    }

    pub fn delta(&self) -> DpParameter {
        self.delta
    }

    pub fn facts(&self) -> String {
        format!("$EpsilonValue({})\n$DeltaValue({})", self.epsilon, self.delta)
    }
}

/// How many rows of the source a single output row may depend on.
/// `None` is Bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sensitivity(pub Option<u64>);

impl Sensitivity {
    pub fn get(&self) -> Option<u64> {
        self.0
    }
}

impl AbstractDomain for Sensitivity {
    fn bottom() -> Self {
        Sensitivity(None)
    }

    fn join(&self, other: &Self) -> Self {
        Sensitivity(self.0.max(other.0))
    }

    fn is_equivalent_to(&self, other: &Self) -> bool {
        self == other
    }
}

struct SensitivitySemantics;

impl OperationSemantics for SensitivitySemantics {
    type State = Sensitivity;

    fn get_initial_state(&self) -> Sensitivity {
        Sensitivity(Some(1))
    }

    fn apply_operation(&self, operation: &Operation, inputs: &[Sensitivity]) -> Vec<Sensitivity> {
        let result = if inputs.is_empty() {
            Some(1)
        } else {
            let max = inputs.iter().filter_map(Sensitivity::get).max();
            if operation.op().name() == GROUP_BY {
                max.map(|s| s.saturating_mul(2))
            } else {
                max
            }
        };
        vec![Sensitivity(result); operation.number_of_outputs()]
    }
}

/// Privacy loss of a module, summed over its mechanisms.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PrivacyBudget {
    pub epsilon: DpParameter,
    pub delta: DpParameter,
}

impl PrivacyBudget {
    pub fn fits(&self, policy: &DpParameterPolicy) -> bool {
        self.epsilon <= policy.epsilon() && self.delta <= policy.delta()
    }
}

fn parameter(operation: &Operation, name: &str) -> Option<DpParameter> {
    let attribute = operation.get_attribute(name)?;
    let value = attribute.as_int64().unwrap_or_else(|| {
        panic!("Attribute `{}` of {} must be an integer, got {}", name, PRIVACY_MECHANISM, attribute)
    });
    match DpParameter::try_from(value) {
        Ok(value) => Some(value),
        Err(_) => panic!("Attribute `{}` of {} must not be negative, got {}", name, PRIVACY_MECHANISM, value),
    }
}

/// Checks a module against a [`DpParameterPolicy`]. Each
/// `privacy_mechanism` spends its `epsilon` and `delta` once per unit of
/// sensitivity of its input, and `sql.group_by` doubles sensitivity.
#[derive(Default)]
pub struct DpBudgetChecker;

impl DpBudgetChecker {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, name = "DpBudgetChecker::compute_sensitivities")]
    pub fn compute_sensitivities(&self, module: &Module) -> HashMap<Value, Sensitivity> {
        ModuleFixpointIterator::new(&SensitivitySemantics).compute(module)
    }

    pub fn consumed_budget(&self, module: &Module) -> PrivacyBudget {
        let graph = ModuleGraph::new(module);
        let sensitivities = ModuleFixpointIterator::new(&SensitivitySemantics).compute_with_graph(&graph);

        let mut budget = PrivacyBudget::default();
        for operation in graph.operations() {
            if operation.op().name() != PRIVACY_MECHANISM {
                continue;
            }
            let epsilon = parameter(operation, EPSILON).unwrap_or_else(|| {
                panic!("{} {} has no `{}` attribute", PRIVACY_MECHANISM, operation.id().0, EPSILON)
            });
            let delta = parameter(operation, DELTA).unwrap_or(0);
            if operation.inputs().is_empty() {
                panic!("{} {} has no input", PRIVACY_MECHANISM, operation.id().0);
            }
            let sensitivity = sensitivities
                .get(&operation.get_input_value(0))
                .and_then(Sensitivity::get)
                .unwrap_or(1);
            trace!(
                "mechanism {} spends epsilon {} and delta {} at sensitivity {}",
                operation.id().0,
                epsilon,
                delta,
                sensitivity
            );
            budget.epsilon = budget.epsilon.saturating_add(epsilon.saturating_mul(sensitivity));
            budget.delta = budget.delta.saturating_add(delta.saturating_mul(sensitivity));
        }
        budget
    }
}

impl PolicyChecker for DpBudgetChecker {
    fn is_module_policy_compliant(&self, module: &Module, policy: &Policy) -> bool {
        let Policy::DpParameter(dp_policy) = policy else {
            panic!("DpBudgetChecker requires a DP parameter policy, got `{}`", policy.fact_name());
        };
        let consumed = self.consumed_budget(module);
        let compliant = consumed.fits(dp_policy);
        info!(
            "consumed epsilon {} of {}, delta {} of {}, compliant: {}",
            consumed.epsilon,
            dp_policy.epsilon(),
            consumed.delta,
            dp_policy.delta(),
            compliant
        );
        compliant
    }
}
