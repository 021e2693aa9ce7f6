//! Fold-based traversal over the IR.
//!
//! [`IrVisitor`] dispatches on the node kind only. [`IrTraversingVisitor`]
//! walks the tree: for every node it calls the pre-visit hook, then visits
//! the children in declaration order folding each child's result into the
//! running accumulator, then calls the post-visit hook with the accumulator.
//! Modules have blocks as children, blocks have operations, and operations
//! have their implementation module if any.

use crate::ir::{block::Block, module::Module, operation::Operation, storage::Storage};

pub trait IrVisitor<'ir> {
    type Output;

    fn visit_module(&mut self, module: &'ir Module) -> Self::Output;
    fn visit_block(&mut self, block: &'ir Block) -> Self::Output;
    fn visit_operation(&mut self, operation: &'ir Operation) -> Self::Output;
    fn visit_storage(&mut self, storage: &'ir Storage) -> Self::Output;
}

pub trait IrTraversingVisitor<'ir> {
    type Output;

    /// The accumulator each pre-visit hook starts from unless overridden.
    fn get_default_value(&mut self) -> Self::Output;

    /// Combines a child's result into the accumulator. Keeps the accumulator
    /// by default.
    fn fold_result(&mut self, accumulator: Self::Output, _child: Self::Output) -> Self::Output {
        accumulator
    }

    fn pre_visit_module(&mut self, _module: &'ir Module) -> Self::Output {
        self.get_default_value()
    }
    fn post_visit_module(&mut self, _module: &'ir Module, result: Self::Output) -> Self::Output {
        result
    }

    fn pre_visit_block(&mut self, _block: &'ir Block) -> Self::Output {
        self.get_default_value()
    }
    fn post_visit_block(&mut self, _block: &'ir Block, result: Self::Output) -> Self::Output {
        result
    }

    fn pre_visit_operation(&mut self, _operation: &'ir Operation) -> Self::Output {
        self.get_default_value()
    }
    fn post_visit_operation(&mut self, _operation: &'ir Operation, result: Self::Output) -> Self::Output {
        result
    }

    fn pre_visit_storage(&mut self, _storage: &'ir Storage) -> Self::Output {
        self.get_default_value()
    }
    fn post_visit_storage(&mut self, _storage: &'ir Storage, result: Self::Output) -> Self::Output {
        result
    }
}

/// Adapts a traversing visitor to the plain [`IrVisitor`] interface.
pub struct Traversal<'v, V: ?Sized> {
    visitor: &'v mut V,
}

impl<'v, V: ?Sized> Traversal<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self { visitor }
    }
}

impl<'ir, V: IrTraversingVisitor<'ir> + ?Sized> IrVisitor<'ir> for Traversal<'_, V> {
    type Output = V::Output;

    fn visit_module(&mut self, module: &'ir Module) -> V::Output {
        let mut result = self.visitor.pre_visit_module(module);
        for block in module.blocks() {
            let child = self.visit_block(block);
            result = self.visitor.fold_result(result, child);
        }
        self.visitor.post_visit_module(module, result)
    }

    fn visit_block(&mut self, block: &'ir Block) -> V::Output {
        let mut result = self.visitor.pre_visit_block(block);
        for operation in block.operations() {
            let child = self.visit_operation(operation);
            result = self.visitor.fold_result(result, child);
        }
        self.visitor.post_visit_block(block, result)
    }

    fn visit_operation(&mut self, operation: &'ir Operation) -> V::Output {
        let mut result = self.visitor.pre_visit_operation(operation);
        if let Some(module) = operation.impl_module() {
            let child = self.visit_module(module);
            result = self.visitor.fold_result(result, child);
        }
        self.visitor.post_visit_operation(operation, result)
    }

    fn visit_storage(&mut self, storage: &'ir Storage) -> V::Output {
        let result = self.visitor.pre_visit_storage(storage);
        self.visitor.post_visit_storage(storage, result)
    }
}

impl Module {
    pub fn accept<'ir, V: IrVisitor<'ir> + ?Sized>(&'ir self, visitor: &mut V) -> V::Output {
        visitor.visit_module(self)
    }

    pub fn traverse<'ir, V: IrTraversingVisitor<'ir> + ?Sized>(&'ir self, visitor: &mut V) -> V::Output {
        Traversal::new(visitor).visit_module(self)
    }
}

impl Block {
    pub fn accept<'ir, V: IrVisitor<'ir> + ?Sized>(&'ir self, visitor: &mut V) -> V::Output {
        visitor.visit_block(self)
    }

    pub fn traverse<'ir, V: IrTraversingVisitor<'ir> + ?Sized>(&'ir self, visitor: &mut V) -> V::Output {
        Traversal::new(visitor).visit_block(self)
    }
}

impl Operation {
    pub fn accept<'ir, V: IrVisitor<'ir> + ?Sized>(&'ir self, visitor: &mut V) -> V::Output {
        visitor.visit_operation(self)
    }

    pub fn traverse<'ir, V: IrTraversingVisitor<'ir> + ?Sized>(&'ir self, visitor: &mut V) -> V::Output {
        Traversal::new(visitor).visit_operation(self)
    }
}

impl Storage {
    pub fn accept<'ir, V: IrVisitor<'ir> + ?Sized>(&'ir self, visitor: &mut V) -> V::Output {
        visitor.visit_storage(self)
    }

    pub fn traverse<'ir, V: IrTraversingVisitor<'ir> + ?Sized>(&'ir self, visitor: &mut V) -> V::Output {
        Traversal::new(visitor).visit_storage(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        attribute::NamedAttributeMap,
        builder::{BlockBuilder, ModuleBuilder},
        context::IrContext,
        operator::Operator,
        types::Type,
    };

    fn make_module(ctx: &IrContext) -> Module {
        let constant = ctx.get_operator("core.constant").expect("registered");
        let composite = ctx.get_operator("core.composite").expect("registered");

        let mut inner_block = BlockBuilder::new(ctx);
        inner_block.add_operation(&constant, NamedAttributeMap::new(), vec![]);
        let mut inner = ModuleBuilder::new(ctx);
        inner.add_block(inner_block.build());

        let mut b0 = BlockBuilder::new(ctx);
        b0.add_operation(&constant, NamedAttributeMap::new(), vec![]);
        b0.add_composite_operation(&composite, NamedAttributeMap::new(), vec![], inner.build());
        let mut b1 = BlockBuilder::new(ctx);
        b1.add_operation(&constant, NamedAttributeMap::new(), vec![]);

        let mut module = ModuleBuilder::new(ctx);
        module.add_block(b0.build());
        module.add_block(b1.build());
        module.build()
    }

    fn make_context() -> IrContext {
        let mut ctx = IrContext::new();
        ctx.register_operator(Operator::new("core.constant"));
        ctx.register_operator(Operator::new("core.composite"));
        ctx
    }

    /// Records the traversal order.
    struct OrderRecorder {
        events: Vec<String>,
    }

    impl<'ir> IrTraversingVisitor<'ir> for OrderRecorder {
        type Output = ();

        fn get_default_value(&mut self) {}

        fn pre_visit_module(&mut self, _module: &'ir Module) {
            self.events.push("pre module".to_string());
        }
        fn post_visit_module(&mut self, _module: &'ir Module, _result: ()) {
            self.events.push("post module".to_string());
        }
        fn pre_visit_block(&mut self, _block: &'ir Block) {
            self.events.push("pre block".to_string());
        }
        fn post_visit_block(&mut self, _block: &'ir Block, _result: ()) {
            self.events.push("post block".to_string());
        }
        fn pre_visit_operation(&mut self, operation: &'ir Operation) {
            self.events.push(format!("pre {}", operation.op().name()));
        }
        fn post_visit_operation(&mut self, operation: &'ir Operation, _result: ()) {
            self.events.push(format!("post {}", operation.op().name()));
        }
    }

    #[test]
    fn test_traversal_order() {
        let ctx = make_context();
        let module = make_module(&ctx);
        let mut recorder = OrderRecorder { events: vec![] };
        module.traverse(&mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "pre module",
                "pre block",
                "pre core.constant",
                "post core.constant",
                "pre core.composite",
                "pre module",
                "pre block",
                "pre core.constant",
                "post core.constant",
                "post block",
                "post module",
                "post core.composite",
                "post block",
                "pre block",
                "pre core.constant",
                "post core.constant",
                "post block",
                "post module",
            ]
        );
    }

    /// Counts nodes with an accumulator that has no default value.
    struct Count(usize);

    struct NodeCounter;

    impl<'ir> IrTraversingVisitor<'ir> for NodeCounter {
        type Output = Count;

        fn get_default_value(&mut self) -> Count {
            Count(1)
        }

        fn fold_result(&mut self, accumulator: Count, child: Count) -> Count {
            Count(accumulator.0 + child.0)
        }
    }

    #[test]
    fn test_fold_over_non_default_accumulator() {
        let ctx = make_context();
        let module = make_module(&ctx);
        // 2 modules, 3 blocks, 4 operations.
        assert_eq!(module.traverse(&mut NodeCounter).0, 9);
        assert_eq!(module.blocks()[1].traverse(&mut NodeCounter).0, 2);
    }

    struct KindNamer;

    impl<'ir> IrVisitor<'ir> for KindNamer {
        type Output = &'static str;

        fn visit_module(&mut self, _module: &'ir Module) -> &'static str {
            "module"
        }
        fn visit_block(&mut self, _block: &'ir Block) -> &'static str {
            "block"
        }
        fn visit_operation(&mut self, _operation: &'ir Operation) -> &'static str {
            "operation"
        }
        fn visit_storage(&mut self, _storage: &'ir Storage) -> &'static str {
            "storage"
        }
    }

    #[test]
    fn test_plain_visitor_dispatch() {
        let mut ctx = make_context();
        let db = ctx.register_storage("db", Type::primitive());
        let module = make_module(&ctx);
        assert_eq!(module.accept(&mut KindNamer), "module");
        assert_eq!(module.blocks()[0].accept(&mut KindNamer), "block");
        assert_eq!(module.blocks()[0].operations()[0].accept(&mut KindNamer), "operation");
        assert_eq!(ctx.get_storage(db).accept(&mut KindNamer), "storage");
        assert_eq!(ctx.get_storage(db).traverse(&mut NodeCounter).0, 1);
    }
}
