use itertools::Itertools;

use crate::ir::{
    attribute::attributes_to_string,
    block::Block,
    module::Module,
    operation::Operation,
    ssa_names::SsaNames,
    value::Value,
    visitor::IrTraversingVisitor,
};

/// Renders modules, blocks and operations in the textual IR form.
pub struct IrPrinter<'a> {
    out: String,
    indent: usize,
    ssa_names: &'a mut SsaNames,
}

impl<'a> IrPrinter<'a> {
    fn new(ssa_names: &'a mut SsaNames) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            ssa_names,
        }
    }

    pub fn module_to_string(module: &Module, ssa_names: &mut SsaNames) -> String {
        let mut printer = IrPrinter::new(ssa_names);
        module.traverse(&mut printer);
        printer.out
    }

    pub fn block_to_string(block: &Block, ssa_names: &mut SsaNames) -> String {
        let mut printer = IrPrinter::new(ssa_names);
        block.traverse(&mut printer);
        printer.out
    }

    pub fn operation_to_string(operation: &Operation, ssa_names: &mut SsaNames) -> String {
        let mut printer = IrPrinter::new(ssa_names);
        operation.traverse(&mut printer);
        printer.out
    }

    fn write_line(&mut self, line: &str) {
        self.out.push_str(&"  ".repeat(self.indent));
        self.out.push_str(line);
        self.out.push('\n');
    }
}

impl<'ir> IrTraversingVisitor<'ir> for IrPrinter<'_> {
    type Output = ();

    fn get_default_value(&mut self) {}

    fn pre_visit_module(&mut self, module: &'ir Module) {
        let id = self.ssa_names.get_or_create_module_id(module.id());
        self.write_line(&format!("module m{id} {{"));
        self.indent += 1;
    }

    fn post_visit_module(&mut self, module: &'ir Module, _result: ()) {
        self.indent -= 1;
        let id = self.ssa_names.get_or_create_module_id(module.id());
        self.write_line(&format!("}}  // module m{id}"));
    }

    fn pre_visit_block(&mut self, block: &'ir Block) {
        let id = self.ssa_names.get_or_create_block_id(block.id());
        self.write_line(&format!("block b{id} {{"));
        self.indent += 1;
    }

    fn post_visit_block(&mut self, block: &'ir Block, _result: ()) {
        self.indent -= 1;
        let id = self.ssa_names.get_or_create_block_id(block.id());
        self.write_line(&format!("}}  // block b{id}"));
    }

    fn pre_visit_operation(&mut self, operation: &'ir Operation) {
        let inputs = operation
            .inputs()
            .iter()
            .map(|v| v.to_string(&mut *self.ssa_names))
            .join(", ");
        let name = Value::default_result(operation.id()).to_string(&mut *self.ssa_names);
        let line = format!(
            "{} = {} [{}]({})",
            name,
            operation.op().name(),
            attributes_to_string(operation.attributes()),
            inputs
        );
        if operation.impl_module().is_some() {
            self.write_line(&format!("{line} {{"));
            self.indent += 1;
        } else {
            self.write_line(&line);
        }
    }

    fn post_visit_operation(&mut self, operation: &'ir Operation, _result: ()) {
        if operation.impl_module().is_some() {
            self.indent -= 1;
            self.write_line("}");
        }
    }
}
