use std::rc::Rc;

use crate::ir::{
    BlockId, OperationId,
    attribute::{Attribute, NamedAttributeMap},
    module::Module,
    operator::Operator,
    value::Value,
};

/// A single dataflow node. Outputs are not stored; the `i`-th output is the
/// value `OperationResult { operation: id, index: i }`.
#[derive(Debug)]
pub struct Operation {
    id: OperationId,
    parent: Option<BlockId>,
    op: Rc<Operator>,
    attributes: NamedAttributeMap,
    inputs: Vec<Value>,
    impl_module: Option<Box<Module>>,
}

impl Operation {
    pub fn new(
        id: OperationId,
        parent: Option<BlockId>,
        op: Rc<Operator>,
        attributes: NamedAttributeMap,
        inputs: Vec<Value>,
    ) -> Self {
        Self {
            id,
            parent,
            op,
            attributes,
            inputs,
            impl_module: None,
        }
    }

    pub fn with_impl_module(mut self, module: Module) -> Self {
        self.impl_module = Some(Box::new(module));
        self
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: BlockId) {
        self.parent = Some(parent);
    }

    pub fn op(&self) -> &Operator {
        &self.op
    }

    pub fn op_rc(&self) -> &Rc<Operator> {
        &self.op
    }

    pub fn attributes(&self) -> &NamedAttributeMap {
        &self.attributes
    }

    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn inputs(&self) -> &[Value] {
        &self.inputs
    }

    pub fn impl_module(&self) -> Option<&Module> {
        self.impl_module.as_deref()
    }

    pub fn number_of_outputs(&self) -> usize {
        self.op.number_of_return_values()
    }

    pub fn get_input_value(&self, index: usize) -> Value {
        match self.inputs.get(index) {
            Some(value) => *value,
            None => panic!(
                "GetInputValue({}) fails because index is out of bounds for operation `{}` with {} inputs",
                index,
                self.op.name(),
                self.inputs.len()
            ),
        }
    }

    pub fn get_output_value(&self, index: usize) -> Value {
        if index >= self.number_of_outputs() {
            panic!(
                "GetOutputValue({}) fails because index is out of bounds for operation `{}` with {} outputs",
                index,
                self.op.name(),
                self.number_of_outputs()
            );
        }
        Value::result(self.id, index)
    }

    pub fn get_outputs(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.number_of_outputs()).map(|i| Value::result(self.id, i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_operation(outputs: usize) -> Operation {
        let mut attributes = NamedAttributeMap::new();
        attributes.insert("const".to_string(), Attribute::int64(10));
        Operation::new(
            OperationId(3),
            None,
            Rc::new(Operator::with_return_values("core.split", outputs)),
            attributes,
            vec![Value::Any, Value::Constant(2)],
        )
    }

    #[test]
    fn test_accessors() {
        let op = make_operation(2);
        assert_eq!(op.parent(), None);
        assert_eq!(op.op().name(), "core.split");
        assert_eq!(op.get_attribute("const").and_then(|a| a.as_int64()), Some(10));
        assert_eq!(op.get_input_value(1), Value::Constant(2));
        assert_eq!(op.get_output_value(1), Value::result(OperationId(3), 1));
        assert_eq!(
            op.get_outputs().collect::<Vec<_>>(),
            vec![Value::result(OperationId(3), 0), Value::result(OperationId(3), 1)]
        );
    }

    #[test]
    #[should_panic(expected = "GetInputValue(2) fails because index is out of bounds")]
    fn test_input_out_of_bounds_is_fatal() {
        make_operation(1).get_input_value(2);
    }

    #[test]
    #[should_panic(expected = "GetOutputValue(1) fails because index is out of bounds")]
    fn test_output_out_of_bounds_is_fatal() {
        make_operation(1).get_output_value(1);
    }
}
