use std::collections::HashMap;

use itertools::Itertools;

use crate::ir::{
    BlockId, ModuleId,
    data_decl::DataDeclCollection,
    operation::Operation,
    value::Value,
};

/// A straight-line region: an ordered list of operations with declared
/// inputs and outputs. Each declared output is bound to a producing value in
/// `results`.
#[derive(Debug)]
pub struct Block {
    id: BlockId,
    parent: Option<ModuleId>,
    operations: Vec<Operation>,
    inputs: DataDeclCollection,
    outputs: DataDeclCollection,
    results: HashMap<String, Value>,
}

impl Block {
    pub fn new(
        id: BlockId,
        operations: Vec<Operation>,
        inputs: DataDeclCollection,
        outputs: DataDeclCollection,
        results: HashMap<String, Value>,
    ) -> Self {
        Self {
            id,
            parent: None,
            operations,
            inputs,
            outputs,
            results,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: ModuleId) {
        self.parent = Some(parent);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn inputs(&self) -> &DataDeclCollection {
        &self.inputs
    }

    pub fn outputs(&self) -> &DataDeclCollection {
        &self.outputs
    }

    pub fn results(&self) -> &HashMap<String, Value> {
        &self.results
    }

    pub fn get_result(&self, name: &str) -> Option<Value> {
        self.results.get(name).copied()
    }

    /// The value of the declared input `name`.
    pub fn argument(&self, name: &str) -> Value {
        let index = self
            .inputs
            .index_of(name)
            .unwrap_or_else(|| panic!("Block has no input named `{}`", name));
        Value::argument(self.id, index)
    }

    pub fn result_names(&self) -> impl Iterator<Item = &String> {
        self.results.keys().sorted()
    }
}
