use std::{collections::HashMap, rc::Rc};

use crate::ir::{
    BlockId, OperationId,
    attribute::NamedAttributeMap,
    block::Block,
    context::IrContext,
    data_decl::DataDeclCollection,
    module::Module,
    operation::Operation,
    operator::Operator,
    types::Type,
    value::Value,
};

pub struct BlockBuilder<'c> {
    context: &'c IrContext,
    id: BlockId,
    operations: Vec<Operation>,
    inputs: DataDeclCollection,
    outputs: DataDeclCollection,
    results: HashMap<String, Value>,
}

impl<'c> BlockBuilder<'c> {
    pub fn new(context: &'c IrContext) -> Self {
        Self {
            context,
            id: context.fresh_block_id(),
            operations: Vec::new(),
            inputs: DataDeclCollection::new(),
            outputs: DataDeclCollection::new(),
            results: HashMap::new(),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn add_input(&mut self, name: &str, ty: Type) -> Value {
        let index = self.inputs.add_decl(name, ty);
        Value::argument(self.id, index)
    }

    pub fn add_output(&mut self, name: &str, ty: Type) {
        self.outputs.add_decl(name, ty);
    }

    pub fn add_result(&mut self, name: &str, value: Value) {
        if self.outputs.find_decl(name).is_none() {
            panic!("Block has no output named `{}`", name);
        }
        self.results.insert(name.to_string(), value);
    }

    pub fn add_operation(
        &mut self,
        op: &Rc<Operator>,
        attributes: NamedAttributeMap,
        inputs: Vec<Value>,
    ) -> OperationId {
        let id = self.context.fresh_operation_id();
        self.operations.push(Operation::new(
            id,
            Some(self.id),
            op.clone(),
            attributes,
            inputs,
        ));
        id
    }

    /// Adds an operation whose operator is looked up by name.
    pub fn add_operation_by_name(
        &mut self,
        name: &str,
        attributes: NamedAttributeMap,
        inputs: Vec<Value>,
    ) -> OperationId {
        let op = self
            .context
            .get_operator(name)
            .unwrap_or_else(|| panic!("Operator `{}` is not registered", name));
        self.add_operation(&op, attributes, inputs)
    }

    pub fn add_composite_operation(
        &mut self,
        op: &Rc<Operator>,
        attributes: NamedAttributeMap,
        inputs: Vec<Value>,
        impl_module: Module,
    ) -> OperationId {
        let id = self.add_operation(op, attributes, inputs);
        let operation = self
            .operations
            .pop()
            .expect("Operation was just added");
        self.operations.push(operation.with_impl_module(impl_module));
        id
    }

    /// Moves an already built operation into this block.
    pub fn add_existing_operation(&mut self, mut operation: Operation) -> OperationId {
        operation.set_parent(self.id);
        let id = operation.id();
        self.operations.push(operation);
        id
    }

    pub fn build(self) -> Block {
        Block::new(
            self.id,
            self.operations,
            self.inputs,
            self.outputs,
            self.results,
        )
    }
}

pub struct ModuleBuilder<'c> {
    context: &'c IrContext,
    module: Module,
}

impl<'c> ModuleBuilder<'c> {
    pub fn new(context: &'c IrContext) -> Self {
        Self {
            context,
            module: Module::new(context.fresh_module_id()),
        }
    }

    pub fn context(&self) -> &'c IrContext {
        self.context
    }

    pub fn add_block(&mut self, block: Block) -> BlockId {
        self.module.add_block(block)
    }

    pub fn build(self) -> Module {
        self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::attribute::Attribute;

    fn make_context() -> IrContext {
        let mut ctx = IrContext::new();
        ctx.register_operator(Operator::new("core.constant"));
        ctx.register_operator(Operator::new("core.plus"));
        ctx.register_operator(Operator::with_return_values("core.split", 2));
        ctx
    }

    #[test]
    fn test_build_block_and_module() {
        let ctx = make_context();
        let mut block = BlockBuilder::new(&ctx);
        let x = block.add_input("x", Type::primitive());
        block.add_output("sum", Type::primitive());
        let mut attrs = NamedAttributeMap::new();
        attrs.insert("value".to_string(), Attribute::int64(3));
        let c = block.add_operation_by_name("core.constant", attrs, vec![]);
        let plus = block.add_operation_by_name(
            "core.plus",
            NamedAttributeMap::new(),
            vec![x, Value::default_result(c)],
        );
        block.add_result("sum", Value::default_result(plus));
        let block_id = block.id();
        let block = block.build();
        assert_eq!(block.argument("x"), x);

        let mut module = ModuleBuilder::new(&ctx);
        module.add_block(block);
        let module = module.build();

        let block = module.get_block(block_id);
        assert_eq!(block.parent(), Some(module.id()));
        assert_eq!(block.operations().len(), 2);
        assert_eq!(block.get_result("sum"), Some(Value::default_result(plus)));
        let plus_op = module.get_operation(plus);
        assert_eq!(plus_op.parent(), Some(block_id));
        assert_eq!(plus_op.inputs(), &[x, Value::default_result(c)]);
        assert_eq!(module.iter_operations().count(), 2);
    }

    #[test]
    fn test_nested_modules_do_not_share_ids() {
        let ctx = make_context();
        let mut inner_block = BlockBuilder::new(&ctx);
        let inner_op = inner_block.add_operation_by_name("core.constant", NamedAttributeMap::new(), vec![]);
        let mut inner = ModuleBuilder::new(&ctx);
        inner.add_block(inner_block.build());
        let inner = inner.build();

        let mut outer_block = BlockBuilder::new(&ctx);
        let split = ctx.get_operator("core.split").expect("registered");
        let outer_op = outer_block.add_composite_operation(&split, NamedAttributeMap::new(), vec![], inner);
        assert_ne!(inner_op, outer_op);

        let mut outer = ModuleBuilder::new(&ctx);
        outer.add_block(outer_block.build());
        let outer = outer.build();
        let composite = outer.get_operation(outer_op);
        let nested = composite.impl_module().expect("has impl module");
        assert_ne!(nested.id(), outer.id());
        assert!(nested.find_operation(inner_op).is_some());
        assert!(outer.find_operation(inner_op).is_none());
    }

    #[test]
    #[should_panic(expected = "Operator `core.minus` is not registered")]
    fn test_unknown_operator_is_fatal() {
        let ctx = make_context();
        let mut block = BlockBuilder::new(&ctx);
        block.add_operation_by_name("core.minus", NamedAttributeMap::new(), vec![]);
    }

    #[test]
    #[should_panic(expected = "Block has no output named `y`")]
    fn test_undeclared_result_is_fatal() {
        let ctx = make_context();
        let mut block = BlockBuilder::new(&ctx);
        block.add_result("y", Value::Any);
    }
}
