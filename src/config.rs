//! TOML scenario files: a program made of operators, storages and blocks,
//! plus the policy it is checked against.
//!
//! Operation inputs are written as references:
//!
//! - `%name` names a result declared by any operation of the scenario, so
//!   forward references and cycles are allowed;
//! - `arg:<input>` names an input of the enclosing block and
//!   `arg:<block>.<input>` an input of any block;
//! - `store:<name>` names a storage;
//! - `any` is the wildcard value and a bare integer is a constant.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs,
    path::Path,
};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    Error,
    ir::{
        Attribute, BlockBuilder, IrContext, Module, ModuleBuilder, NamedAttributeMap, Operation,
        OperationId, Operator, StorageId, Type, Value,
    },
    policy::{
        DpParameter, DpParameterPolicy, Policy,
        sql::{SqlPolicyRuleDescription, register_sql_operators},
    },
};

pub const DEFAULT_EGRESS_OPERATOR: &str = "sql.sql_output";

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub operators: Vec<OperatorConfig>,
    #[serde(default)]
    pub storages: Vec<StorageConfig>,
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,
    pub policy: PolicyConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorConfig {
    pub name: String,
    #[serde(default = "default_outputs")]
    pub outputs: usize,
}

fn default_outputs() -> usize {
    1
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    /// References to the values written into the storage.
    #[serde(default)]
    pub inputs: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclConfig {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockConfig {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<DeclConfig>,
    #[serde(default)]
    pub outputs: Vec<DeclConfig>,
    /// Output name to value reference.
    #[serde(default)]
    pub results: BTreeMap<String, String>,
    #[serde(default)]
    pub operations: Vec<OperationConfig>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationConfig {
    #[serde(default)]
    pub results: Vec<String>,
    pub operator: String,
    #[serde(default)]
    pub attributes: toml::Table,
    #[serde(default)]
    pub inputs: Vec<InputConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InputConfig {
    Constant(i64),
    Reference(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Sql,
    Catchall,
    Dp,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckerKind {
    Chaotic,
    AbstractInterpretation,
    DpBudget,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub kind: PolicyKind,
    pub checker: CheckerKind,
    #[serde(default)]
    pub facts: String,
    #[serde(default)]
    pub rules: Vec<SqlPolicyRuleDescription>,
    /// Tags interned before any rule tag, in order.
    #[serde(default)]
    pub seed_tags: Vec<String>,
    #[serde(default = "default_egress")]
    pub egress: Vec<String>,
    pub epsilon: Option<DpParameter>,
    pub delta: Option<DpParameter>,
}

fn default_egress() -> Vec<String> {
    vec![DEFAULT_EGRESS_OPERATOR.to_string()]
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<(), Error> {
        match (self.kind, self.checker) {
            (PolicyKind::Dp, CheckerKind::DpBudget) => {}
            (PolicyKind::Dp, _) => {
                return Err(Error::InvalidPolicy(
                    "a `dp` policy is only checked by the `dp_budget` checker".to_string(),
                ));
            }
            (_, CheckerKind::DpBudget) => {
                return Err(Error::InvalidPolicy(
                    "the `dp_budget` checker needs a `dp` policy".to_string(),
                ));
            }
            _ => {}
        }
        if self.kind == PolicyKind::Dp && self.epsilon.is_none() {
            return Err(Error::InvalidPolicy("a `dp` policy needs an `epsilon` budget".to_string()));
        }

        let mut rule_names = HashSet::new();
        for rule in &self.rules {
            if !rule_names.insert(rule.name.as_str()) {
                return Err(Error::DuplicateName {
                    kind: "policy rule",
                    name: rule.name.clone(),
                });
            }
        }
        let mut seed_tags = HashSet::new();
        for tag in &self.seed_tags {
            if !seed_tags.insert(tag.as_str()) {
                return Err(Error::DuplicateName {
                    kind: "seed tag",
                    name: tag.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn to_policy(&self) -> Result<Policy, Error> {
        self.validate()?;
        Ok(match self.kind {
            PolicyKind::Sql => Policy::sql_policy_rule(self.facts.as_str()),
            PolicyKind::Catchall => Policy::catchall(self.facts.as_str()),
            PolicyKind::Dp => Policy::DpParameter(DpParameterPolicy::new(
                self.epsilon.unwrap_or_default(),
                self.delta.unwrap_or(0),
            )),
        })
    }
}

/// A lowered scenario. The module's ids were allocated by `context`.
pub struct Program {
    pub context: IrContext,
    pub module: Module,
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn policy(&self) -> Result<Policy, Error> {
        self.policy.to_policy()
    }

    #[instrument(skip_all, name = "Scenario::build_program")]
    pub fn build_program(&self) -> Result<Program, Error> {
        let mut context = IrContext::new();
        for operator in &self.operators {
            if context.is_registered_operator(&operator.name) {
                return Err(Error::DuplicateName {
                    kind: "operator",
                    name: operator.name.clone(),
                });
            }
            context.register_operator(Operator::with_return_values(
                operator.name.as_str(),
                operator.outputs,
            ));
        }
        register_sql_operators(&mut context);

        for storage in &self.storages {
            if context.find_storage(&storage.name).is_some() {
                return Err(Error::DuplicateName {
                    kind: "storage",
                    name: storage.name.clone(),
                });
            }
            context.register_storage(&storage.name, parse_type(storage.ty.as_deref()));
        }

        let (module, storage_inputs) = self.lower_module(&context)?;
        for (storage, value) in storage_inputs {
            context.add_storage_input(storage, value);
        }
        debug!(
            "lowered {} blocks and {} storages",
            module.blocks().len(),
            self.storages.len()
        );
        Ok(Program { context, module })
    }

    fn lower_module(&self, context: &IrContext) -> Result<(Module, Vec<(StorageId, Value)>), Error> {
        let mut scope = Scope {
            context,
            block_arguments: HashMap::new(),
            results: HashMap::new(),
        };

        // Every block and result is declared before any input is resolved.
        let mut builders = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if scope.block_arguments.contains_key(block.name.as_str()) {
                return Err(Error::DuplicateName {
                    kind: "block",
                    name: block.name.clone(),
                });
            }
            let mut builder = BlockBuilder::new(context);
            let mut arguments = HashMap::new();
            for input in &block.inputs {
                if arguments.contains_key(input.name.as_str()) {
                    return Err(Error::DuplicateName {
                        kind: "block input",
                        name: format!("{}.{}", block.name, input.name),
                    });
                }
                let value = builder.add_input(&input.name, parse_type(input.ty.as_deref()));
                arguments.insert(input.name.as_str(), value);
            }
            let mut outputs = HashSet::new();
            for output in &block.outputs {
                if !outputs.insert(output.name.as_str()) {
                    return Err(Error::DuplicateName {
                        kind: "block output",
                        name: format!("{}.{}", block.name, output.name),
                    });
                }
                builder.add_output(&output.name, parse_type(output.ty.as_deref()));
            }
            scope.block_arguments.insert(block.name.as_str(), arguments);

            let mut ids = Vec::with_capacity(block.operations.len());
            for operation in &block.operations {
                let id = context.fresh_operation_id();
                for (index, name) in operation.results.iter().enumerate() {
                    if scope.results.insert(name.as_str(), Value::result(id, index)).is_some() {
                        return Err(Error::DuplicateName {
                            kind: "result",
                            name: name.clone(),
                        });
                    }
                }
                ids.push(id);
            }
            builders.push((builder, ids));
        }

        let mut module = ModuleBuilder::new(context);
        for (block, (mut builder, ids)) in self.blocks.iter().zip(builders) {
            let block_scope = format!("block `{}`", block.name);
            for (index, (operation, id)) in block.operations.iter().zip(ids).enumerate() {
                let operation = scope.lower_operation(block, index, operation, id)?;
                builder.add_existing_operation(operation);
            }
            for (name, reference) in &block.results {
                if block.outputs.iter().all(|output| &output.name != name) {
                    return Err(Error::UnknownOutput {
                        block: block.name.clone(),
                        name: name.clone(),
                    });
                }
                let value = scope.resolve(Some(block.name.as_str()), &block_scope, reference)?;
                builder.add_result(name, value);
            }
            module.add_block(builder.build());
        }

        let mut storage_inputs = Vec::new();
        for storage in &self.storages {
            let id = context
                .find_storage(&storage.name)
                .expect("Storage should be registered");
            let storage_scope = format!("storage `{}`", storage.name);
            for reference in &storage.inputs {
                storage_inputs.push((id, scope.resolve(None, &storage_scope, reference)?));
            }
        }
        Ok((module.build(), storage_inputs))
    }
}

struct Scope<'s> {
    context: &'s IrContext,
    block_arguments: HashMap<&'s str, HashMap<&'s str, Value>>,
    results: HashMap<&'s str, Value>,
}

impl Scope<'_> {
    fn resolve(&self, block: Option<&str>, scope: &str, reference: &str) -> Result<Value, Error> {
        let unknown = || Error::UnknownValueReference {
            reference: reference.to_string(),
            scope: scope.to_string(),
        };

        if reference == "any" {
            return Ok(Value::Any);
        }
        if reference.starts_with('%') {
            return self.results.get(reference).copied().ok_or_else(unknown);
        }
        if let Some(name) = reference.strip_prefix("store:") {
            return self
                .context
                .find_storage(name)
                .map(Value::StoredValue)
                .ok_or_else(unknown);
        }
        if let Some(argument) = reference.strip_prefix("arg:") {
            let (block, input) = match argument.split_once('.') {
                Some((block, input)) => (block, input),
                None => (block.ok_or_else(unknown)?, argument),
            };
            let arguments = self
                .block_arguments
                .get(block)
                .ok_or_else(|| Error::UnknownBlock(block.to_string()))?;
            return arguments.get(input).copied().ok_or_else(unknown);
        }
        reference.parse::<i64>().map(Value::Constant).map_err(|_| unknown())
    }

    fn lower_operation(
        &self,
        block: &BlockConfig,
        index: usize,
        operation: &OperationConfig,
        id: OperationId,
    ) -> Result<Operation, Error> {
        let label = operation
            .results
            .first()
            .cloned()
            .unwrap_or_else(|| format!("{}#{}", block.name, index));
        let op = self
            .context
            .get_operator(&operation.operator)
            .ok_or_else(|| Error::UnknownOperator {
                operation: label.clone(),
                operator: operation.operator.clone(),
            })?;
        if operation.results.len() > op.number_of_return_values() {
            return Err(Error::TooManyResults {
                operation: label,
                operator: operation.operator.clone(),
                results: operation.results.len(),
                outputs: op.number_of_return_values(),
            });
        }

        let attributes = operation
            .attributes
            .iter()
            .map(|(name, value)| Ok((name.clone(), lower_attribute(&label, name, value)?)))
            .collect::<Result<NamedAttributeMap, Error>>()?;
        let scope = format!("block `{}`", block.name);
        let inputs = operation
            .inputs
            .iter()
            .map(|input| match input {
                InputConfig::Constant(value) => Ok(Value::Constant(*value)),
                InputConfig::Reference(reference) => {
                    self.resolve(Some(block.name.as_str()), &scope, reference)
                }
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Operation::new(id, None, op, attributes, inputs))
    }
}

fn lower_attribute(operation: &str, name: &str, value: &toml::Value) -> Result<Attribute, Error> {
    match value {
        toml::Value::Integer(value) => Ok(Attribute::int64(*value)),
        toml::Value::Float(value) => Ok(Attribute::double(*value)),
        toml::Value::String(value) => Ok(Attribute::string(value.as_str())),
        other => Err(Error::BadAttribute {
            operation: operation.to_string(),
            name: name.to_string(),
            reason: format!("has an unsupported {} value", other.type_str()),
        }),
    }
}

/// `primitive` (or nothing) is the primitive type; `entity<Schema>` and any
/// other name are entity types.
fn parse_type(ty: Option<&str>) -> Type {
    match ty {
        None | Some("primitive") => Type::primitive(),
        Some(name) => {
            let schema = name
                .strip_prefix("entity<")
                .and_then(|rest| rest.strip_suffix('>'))
                .unwrap_or(name);
            Type::entity(schema)
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::ir::{IrPrinter, SsaNames, types::TypeKind};

    const POLICY: &str = indoc! {r#"
        [policy]
        kind = "sql"
        checker = "chaotic"
    "#};

    fn scenario(program: &str) -> Scenario {
        Scenario::from_toml_str(&format!("{}\n{}", program, POLICY)).expect("Scenario should parse")
    }

    fn build(program: &str) -> Result<Program, Error> {
        scenario(program).build_program()
    }

    #[test]
    fn test_lower_sql_pipeline() {
        let program = build(indoc! {r#"
            [[blocks]]
            name = "main"

            [[blocks.operations]]
            results = ["%lit"]
            operator = "sql.literal"
            attributes = { literal_string = "secret" }

            [[blocks.operations]]
            results = ["%tainted"]
            operator = "sql.tag_transform"
            attributes = { rule_name = "AddTaint" }
            inputs = ["%lit"]

            [[blocks.operations]]
            operator = "sql.sql_output"
            inputs = ["%tainted"]
        "#})
        .expect("Program should lower");

        let text = IrPrinter::module_to_string(&program.module, &mut SsaNames::new());
        assert_eq!(
            text,
            indoc! {r#"
                module m0 {
                  block b0 {
                    %0 = sql.literal [literal_string: secret]()
                    %1 = sql.tag_transform [rule_name: AddTaint](%0)
                    %2 = sql.sql_output [](%1)
                  }  // block b0
                }  // module m0
            "#}
        );
    }

    #[test]
    fn test_forward_references_form_cycles() {
        let program = build(indoc! {r#"
            [[operators]]
            name = "core.loop"

            [[blocks]]
            name = "main"

            [[blocks.operations]]
            results = ["%a"]
            operator = "core.loop"
            inputs = ["%b"]

            [[blocks.operations]]
            results = ["%b"]
            operator = "core.loop"
            inputs = ["%a", 7]
        "#})
        .expect("Program should lower");

        let operations = program.module.blocks()[0].operations();
        assert_eq!(operations[0].inputs(), &[Value::default_result(operations[1].id())]);
        assert_eq!(
            operations[1].inputs(),
            &[Value::default_result(operations[0].id()), Value::Constant(7)]
        );
    }

    #[test]
    fn test_arguments_storages_and_results() {
        let program = build(indoc! {r#"
            [[operators]]
            name = "core.pair"
            outputs = 2

            [[storages]]
            name = "db"
            type = "entity<Users>"
            inputs = ["%second"]

            [[blocks]]
            name = "source"
            inputs = [{ name = "x" }]

            [[blocks]]
            name = "main"
            inputs = [{ name = "y", type = "primitive" }]
            outputs = [{ name = "out" }]
            results = { out = "%first" }

            [[blocks.operations]]
            results = ["%first", "%second"]
            operator = "core.pair"
            inputs = ["arg:y", "arg:source.x", "store:db", "any", "-3"]
        "#})
        .expect("Program should lower");

        let blocks = program.module.blocks();
        let operation = &blocks[1].operations()[0];
        assert_eq!(
            operation.inputs(),
            &[
                blocks[1].argument("y"),
                blocks[0].argument("x"),
                Value::StoredValue(program.context.find_storage("db").expect("registered")),
                Value::Any,
                Value::Constant(-3),
            ]
        );
        assert_eq!(blocks[1].get_result("out"), Some(operation.get_output_value(0)));

        let storage = program.context.iter_storages().next().expect("one storage");
        assert_eq!(
            storage.input_values().iter().copied().collect::<Vec<_>>(),
            vec![operation.get_output_value(1)]
        );
        assert!(matches!(storage.get_type().kind(), TypeKind::Entity(schema) if schema == "Users"));
    }

    #[test]
    fn test_attribute_kinds() {
        let program = build(indoc! {r#"
            [[operators]]
            name = "core.op"

            [[blocks]]
            name = "main"

            [[blocks.operations]]
            operator = "core.op"
            attributes = { count = 3, ratio = 0.5, label = "x" }
        "#})
        .expect("Program should lower");

        let operation = &program.module.blocks()[0].operations()[0];
        assert_eq!(operation.get_attribute("count").and_then(Attribute::as_int64), Some(3));
        assert_eq!(operation.get_attribute("ratio").and_then(Attribute::as_double), Some(0.5));
        assert_eq!(operation.get_attribute("label").and_then(Attribute::as_str), Some("x"));
    }

    #[test]
    fn test_bad_attribute() {
        let err = build(indoc! {r#"
            [[operators]]
            name = "core.op"

            [[blocks]]
            name = "main"

            [[blocks.operations]]
            results = ["%x"]
            operator = "core.op"
            attributes = { flag = true }
        "#})
        .err()
        .expect("Lowering should fail");
        assert_eq!(
            err.to_string(),
            "Attribute `flag` of operation `%x` has an unsupported boolean value"
        );
    }

    #[test]
    fn test_unknown_operator() {
        let err = build(indoc! {r#"
            [[blocks]]
            name = "main"

            [[blocks.operations]]
            operator = "core.missing"
        "#})
        .err()
        .expect("Lowering should fail");
        assert!(matches!(
            err,
            Error::UnknownOperator { ref operation, ref operator }
                if operation == "main#0" && operator == "core.missing"
        ));
    }

    #[test]
    fn test_unknown_references() {
        let unknown_result = build(indoc! {r#"
            [[blocks]]
            name = "main"

            [[blocks.operations]]
            operator = "sql.sql_output"
            inputs = ["%nowhere"]
        "#})
        .err()
        .expect("Lowering should fail");
        assert_eq!(
            unknown_result.to_string(),
            "Unknown value reference `%nowhere` in block `main`"
        );

        let unknown_block = build(indoc! {r#"
            [[blocks]]
            name = "main"

            [[blocks.operations]]
            operator = "sql.sql_output"
            inputs = ["arg:other.x"]
        "#})
        .err()
        .expect("Lowering should fail");
        assert!(matches!(unknown_block, Error::UnknownBlock(ref name) if name == "other"));

        let unknown_storage_input = build(indoc! {r#"
            [[storages]]
            name = "db"
            inputs = ["arg:x"]
        "#})
        .err()
        .expect("Lowering should fail");
        assert_eq!(
            unknown_storage_input.to_string(),
            "Unknown value reference `arg:x` in storage `db`"
        );
    }

    #[test]
    fn test_duplicates_and_arity() {
        let duplicate_result = build(indoc! {r#"
            [[blocks]]
            name = "main"

            [[blocks.operations]]
            results = ["%x"]
            operator = "sql.literal"

            [[blocks.operations]]
            results = ["%x"]
            operator = "sql.literal"
        "#})
        .err()
        .expect("Lowering should fail");
        assert_eq!(duplicate_result.to_string(), "Duplicate result `%x`");

        let duplicate_block = build(indoc! {r#"
            [[blocks]]
            name = "main"

            [[blocks]]
            name = "main"
        "#})
        .err()
        .expect("Lowering should fail");
        assert_eq!(duplicate_block.to_string(), "Duplicate block `main`");

        let too_many = build(indoc! {r#"
            [[blocks]]
            name = "main"

            [[blocks.operations]]
            results = ["%x", "%y"]
            operator = "sql.literal"
        "#})
        .err()
        .expect("Lowering should fail");
        assert!(matches!(
            too_many,
            Error::TooManyResults { results: 2, outputs: 1, .. }
        ));

        let unknown_output = build(indoc! {r#"
            [[blocks]]
            name = "main"
            results = { out = "any" }
        "#})
        .err()
        .expect("Lowering should fail");
        assert_eq!(unknown_output.to_string(), "Block `main` has no output named `out`");
    }

    #[test]
    fn test_policy_tables() {
        let dp = Scenario::from_toml_str(indoc! {r#"
            [policy]
            kind = "dp"
            checker = "dp_budget"
            epsilon = 10
        "#})
        .expect("Scenario should parse");
        assert_eq!(
            dp.policy().expect("Policy is valid"),
            Policy::DpParameter(DpParameterPolicy::new(10, 0))
        );

        let sql = Scenario::from_toml_str(indoc! {r#"
            [policy]
            kind = "sql"
            checker = "abstract_interpretation"
            seed_tags = ["A"]

            [[policy.rules]]
            name = "AddA"
            action = "add_confidentiality"
            tag = "A"
        "#})
        .expect("Scenario should parse");
        assert_eq!(sql.policy.egress, vec![DEFAULT_EGRESS_OPERATOR.to_string()]);
        assert_eq!(sql.policy.rules.len(), 1);
        assert_eq!(sql.policy().expect("Policy is valid"), Policy::sql_policy_rule(""));
    }

    #[test]
    fn test_invalid_policies() {
        let mismatched = Scenario::from_toml_str(indoc! {r#"
            [policy]
            kind = "sql"
            checker = "dp_budget"
        "#})
        .expect("Scenario should parse");
        assert!(matches!(mismatched.policy(), Err(Error::InvalidPolicy(_))));

        let no_epsilon = Scenario::from_toml_str(indoc! {r#"
            [policy]
            kind = "dp"
            checker = "dp_budget"
        "#})
        .expect("Scenario should parse");
        assert_eq!(
            no_epsilon.policy().err().map(|err| err.to_string()),
            Some("Invalid policy: a `dp` policy needs an `epsilon` budget".to_string())
        );

        let duplicate_rule = Scenario::from_toml_str(indoc! {r#"
            [policy]
            kind = "sql"
            checker = "chaotic"

            [[policy.rules]]
            name = "R"
            action = "add_integrity"
            tag = "A"

            [[policy.rules]]
            name = "R"
            action = "add_integrity"
            tag = "B"
        "#})
        .expect("Scenario should parse");
        assert!(matches!(
            duplicate_rule.policy(),
            Err(Error::DuplicateName { kind: "policy rule", .. })
        ));
    }

    #[test]
    fn test_unknown_field_is_a_decode_error() {
        let err = Scenario::from_toml_str(indoc! {r#"
            [policy]
            kind = "sql"
            checker = "chaotic"
            budget = 3
        "#})
        .err()
        .expect("Decoding should fail");
        assert!(matches!(err, Error::TomlDecode(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("scenario.toml");
        fs::write(&path, POLICY).expect("Failed to write scenario");
        let loaded = Scenario::load(&path).expect("Scenario should load");
        assert_eq!(loaded.policy.checker, CheckerKind::Chaotic);
        assert!(loaded.blocks.is_empty());

        let missing = temp_dir.path().join("missing.toml");
        let err = Scenario::load(&missing).err().expect("Loading should fail");
        assert!(matches!(err, Error::Io { ref path, .. } if path == &missing));
    }
}
