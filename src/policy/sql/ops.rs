//! Typed views over the operations the SQL front-end emits.
//!
//! The views borrow a plain [`Operation`] and are obtained with
//! `from_operation`, which checks the operator name. The `build` functions
//! append a well-formed operation to a block.

use std::collections::BTreeMap;

use crate::ir::{
    Attribute, BlockBuilder, IrContext, NamedAttributeMap, Operation, OperationId, Operator, Value,
};

pub const LITERAL: &str = "sql.literal";
pub const MERGE: &str = "sql.merge";
pub const TAG_TRANSFORM: &str = "sql.tag_transform";
pub const SQL_OUTPUT: &str = "sql.sql_output";

/// Registers every SQL operator not registered yet.
pub fn register_sql_operators(context: &mut IrContext) {
    for name in [LITERAL, MERGE, TAG_TRANSFORM, SQL_OUTPUT] {
        if !context.is_registered_operator(name) {
            context.register_operator(Operator::new(name));
        }
    }
}

fn view_of<'o>(operation: &'o Operation, name: &str) -> Option<&'o Operation> {
    (operation.op().name() == name).then_some(operation)
}

#[derive(Copy, Clone, Debug)]
pub struct LiteralOp<'o> {
    operation: &'o Operation,
}

impl<'o> LiteralOp<'o> {
    pub const LITERAL_STRING: &'static str = "literal_string";

    pub fn build(block: &mut BlockBuilder, literal: &str) -> OperationId {
        let attributes =
            NamedAttributeMap::from([(Self::LITERAL_STRING.to_string(), Attribute::string(literal))]);
        block.add_operation_by_name(LITERAL, attributes, vec![])
    }

    pub fn from_operation(operation: &'o Operation) -> Option<Self> {
        view_of(operation, LITERAL).map(|operation| Self { operation })
    }

    pub fn literal_str(&self) -> &'o str {
        self.operation
            .get_attribute(Self::LITERAL_STRING)
            .and_then(Attribute::as_str)
            .expect("sql.literal should carry a string `literal_string` attribute")
    }
}

/// Merges direct inputs, which contribute data, with control inputs, which
/// only decide whether the data flows. Inputs are stored direct first.
#[derive(Copy, Clone, Debug)]
pub struct MergeOp<'o> {
    operation: &'o Operation,
}

impl<'o> MergeOp<'o> {
    pub const CONTROL_INPUT_START_INDEX: &'static str = "control_input_start_index";

    pub fn build(block: &mut BlockBuilder, direct_inputs: Vec<Value>, control_inputs: Vec<Value>) -> OperationId {
        if direct_inputs.is_empty() && control_inputs.is_empty() {
            panic!("Both direct inputs and control inputs are empty.");
        }
        let attributes = NamedAttributeMap::from([(
            Self::CONTROL_INPUT_START_INDEX.to_string(),
            Attribute::int64(direct_inputs.len() as i64),
        )]);
        let mut inputs = direct_inputs;
        inputs.extend(control_inputs);
        block.add_operation_by_name(MERGE, attributes, inputs)
    }

    pub fn from_operation(operation: &'o Operation) -> Option<Self> {
        view_of(operation, MERGE).map(|operation| Self { operation })
    }

    pub fn operation(&self) -> &'o Operation {
        self.operation
    }

    pub fn control_input_start_index(&self) -> usize {
        let index = self
            .operation
            .get_attribute(Self::CONTROL_INPUT_START_INDEX)
            .and_then(Attribute::as_int64)
            .unwrap_or_else(|| {
                panic!(
                    "sql.merge {} has no integer `{}` attribute",
                    self.operation.id().0,
                    Self::CONTROL_INPUT_START_INDEX
                )
            });
        if index < 0 || index as usize > self.operation.inputs().len() {
            panic!(
                "Invalid control input start index {} for sql.merge with {} inputs",
                index,
                self.operation.inputs().len()
            );
        }
        index as usize
    }

    pub fn direct_inputs(&self) -> &'o [Value] {
        &self.operation.inputs()[..self.control_input_start_index()]
    }

    pub fn control_inputs(&self) -> &'o [Value] {
        &self.operation.inputs()[self.control_input_start_index()..]
    }
}

/// Applies a named policy rule to input 0. Every precondition of the rule is
/// an attribute naming the input that must satisfy it.
#[derive(Copy, Clone, Debug)]
pub struct TagTransformOp<'o> {
    operation: &'o Operation,
}

impl<'o> TagTransformOp<'o> {
    pub const RULE_NAME: &'static str = "rule_name";
    pub const UNION_ITAG_RULE: &'static str = "##raksha_internal#union_itag_rule";
    pub const INTERSECT_ITAG_RULE: &'static str = "##raksha_internal#intersect_itag_rule";
    pub const TRANSFORMED_VALUE_INDEX: usize = 0;

    pub fn build(
        block: &mut BlockBuilder,
        rule_name: &str,
        transformed_value: Value,
        preconditions: &[(&str, Value)],
    ) -> OperationId {
        let mut attributes =
            NamedAttributeMap::from([(Self::RULE_NAME.to_string(), Attribute::string(rule_name))]);
        let mut inputs = vec![transformed_value];
        for (index, (name, value)) in preconditions.iter().enumerate() {
            let previous = attributes.insert(name.to_string(), Attribute::int64(index as i64 + 1));
            if previous.is_some() {
                panic!("Duplicate precondition name '{}'.", name);
            }
            inputs.push(*value);
        }
        block.add_operation_by_name(TAG_TRANSFORM, attributes, inputs)
    }

    pub fn from_operation(operation: &'o Operation) -> Option<Self> {
        view_of(operation, TAG_TRANSFORM).map(|operation| Self { operation })
    }

    pub fn operation(&self) -> &'o Operation {
        self.operation
    }

    pub fn rule_name(&self) -> &'o str {
        self.operation
            .get_attribute(Self::RULE_NAME)
            .and_then(Attribute::as_str)
            .unwrap_or_else(|| {
                panic!(
                    "sql.tag_transform {} has no string `{}` attribute",
                    self.operation.id().0,
                    Self::RULE_NAME
                )
            })
    }

    /// Whether the rule only merges integrity and names no policy rule.
    pub fn is_internal_rule(&self) -> bool {
        matches!(self.rule_name(), Self::UNION_ITAG_RULE | Self::INTERSECT_ITAG_RULE)
    }

    pub fn transformed_value(&self) -> Value {
        self.operation.get_input_value(Self::TRANSFORMED_VALUE_INDEX)
    }

    pub fn precondition_input_indices(&self) -> BTreeMap<&'o str, usize> {
        let num_inputs = self.operation.inputs().len();
        self.operation
            .attributes()
            .iter()
            .filter(|(name, _)| name.as_str() != Self::RULE_NAME)
            .map(|(name, attribute)| {
                let index = attribute.as_int64().unwrap_or_else(|| {
                    panic!("Precondition `{}` of sql.tag_transform is not an integer", name)
                });
                if index < 1 || index as usize >= num_inputs {
                    panic!("Invalid index {} for precondition `{}` in sql.tag_transform", index, name);
                }
                (name.as_str(), index as usize)
            })
            .collect()
    }

    pub fn preconditions(&self) -> BTreeMap<&'o str, Value> {
        self.precondition_input_indices()
            .into_iter()
            .map(|(name, index)| (name, self.operation.get_input_value(index)))
            .collect()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SqlOutputOp<'o> {
    operation: &'o Operation,
}

impl<'o> SqlOutputOp<'o> {
    pub fn build(block: &mut BlockBuilder, value: Value) -> OperationId {
        block.add_operation_by_name(SQL_OUTPUT, NamedAttributeMap::new(), vec![value])
    }

    pub fn from_operation(operation: &'o Operation) -> Option<Self> {
        view_of(operation, SQL_OUTPUT).map(|operation| Self { operation })
    }

    pub fn output_value(&self) -> Value {
        self.operation.get_input_value(0)
    }

    pub fn inputs(&self) -> &'o [Value] {
        self.operation.inputs()
    }
}
