use std::path::Path;

use tracing::info;

use crate::{
    Error,
    config::{CheckerKind, Program, Scenario},
    ir::{IrPrinter, SsaNames},
    policy::{
        AbstractInterpretationPolicyChecker, ChaoticIterator, DpBudgetChecker, PolicyChecker,
        sql::{SqlPolicyRules, decode_sql_policy_rules},
    },
};

/// Runs a scenario through its stages: lowering the program, then checking
/// it against the scenario's policy with the configured checker.
pub struct Driver {
    scenario: Scenario,
    program: Option<Program>,
}

impl Driver {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            program: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        info!("Loading scenario {}", path.display());
        Ok(Self::new(Scenario::load(path)?))
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    #[tracing::instrument(skip_all)]
    pub fn build_ir(&mut self) -> Result<(), Error> {
        let program = self.scenario.build_program()?;
        info!(
            "Built module with {} blocks",
            program.module.blocks().len()
        );
        self.program = Some(program);
        Ok(())
    }

    pub fn program(&self) -> &Program {
        self.program.as_ref().expect("build_ir should be called first")
    }

    pub fn ir_to_string(&self) -> String {
        IrPrinter::module_to_string(&self.program().module, &mut SsaNames::new())
    }

    /// Checks the lowered module, building it first if needed.
    #[tracing::instrument(skip_all)]
    pub fn check_policy(&mut self) -> Result<bool, Error> {
        let policy = self.scenario.policy()?;
        if self.program.is_none() {
            self.build_ir()?;
        }
        let config = &self.scenario.policy;
        let module = &self.program().module;

        let checker: Box<dyn PolicyChecker> = match config.checker {
            CheckerKind::Chaotic => Box::new(ChaoticIterator::new(SqlPolicyRules::new(&config.rules))),
            CheckerKind::AbstractInterpretation => {
                let inference_rules =
                    decode_sql_policy_rules(&config.rules, module, config.seed_tags.clone());
                Box::new(AbstractInterpretationPolicyChecker::new(
                    inference_rules,
                    config.egress.iter().cloned(),
                ))
            }
            CheckerKind::DpBudget => Box::new(DpBudgetChecker::new()),
        };
        let compliant = checker.is_module_policy_compliant(module, &policy);
        info!(
            "Policy `{}` with checker {:?}: {}",
            policy.fact_name(),
            config.checker,
            if compliant { "compliant" } else { "non-compliant" }
        );
        Ok(compliant)
    }
}
