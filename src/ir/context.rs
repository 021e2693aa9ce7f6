use std::{cell::Cell, collections::HashMap, rc::Rc};

use crate::ir::{
    BlockId, ModuleId, OperationId, StorageId,
    operator::Operator,
    storage::Storage,
    types::Type,
    value::Value,
};

/// Registry of operators and storages, and the source of every id used by
/// modules built against it.
#[derive(Debug, Default)]
pub struct IrContext {
    operators: HashMap<String, Rc<Operator>>,
    storages: Vec<Storage>,
    storage_by_name: HashMap<String, StorageId>,
    next_module: Cell<u64>,
    next_block: Cell<u64>,
    next_operation: Cell<u64>,
}

impl IrContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_operator(&mut self, operator: Operator) -> Rc<Operator> {
        if self.operators.contains_key(operator.name()) {
            panic!("Cannot register duplicate operator with name '{}'.", operator.name());
        }
        let operator = Rc::new(operator);
        self.operators
            .insert(operator.name().to_string(), operator.clone());
        operator
    }

    pub fn get_operator(&self, name: &str) -> Option<Rc<Operator>> {
        self.operators.get(name).cloned()
    }

    pub fn is_registered_operator(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    pub fn register_storage(&mut self, name: &str, ty: Type) -> StorageId {
        if self.storage_by_name.contains_key(name) {
            panic!("Cannot register duplicate storage with name '{}'.", name);
        }
        let id = StorageId(self.storages.len() as u64);
        self.storages.push(Storage::new(id, name, ty));
        self.storage_by_name.insert(name.to_string(), id);
        id
    }

    pub fn get_storage(&self, id: StorageId) -> &Storage {
        self.storages
            .get(id.0 as usize)
            .expect("Storage should exist")
    }

    pub fn find_storage(&self, name: &str) -> Option<StorageId> {
        self.storage_by_name.get(name).copied()
    }

    pub fn add_storage_input(&mut self, id: StorageId, value: Value) {
        self.storages
            .get_mut(id.0 as usize)
            .expect("Storage should exist")
            .add_input_value(value);
    }

    pub fn iter_storages(&self) -> impl Iterator<Item = &Storage> {
        self.storages.iter()
    }

    pub fn fresh_module_id(&self) -> ModuleId {
        ModuleId(Self::bump(&self.next_module))
    }

    pub fn fresh_block_id(&self) -> BlockId {
        BlockId(Self::bump(&self.next_block))
    }

    pub fn fresh_operation_id(&self) -> OperationId {
        OperationId(Self::bump(&self.next_operation))
    }

    fn bump(counter: &Cell<u64>) -> u64 {
        let id = counter.get();
        counter.set(id + 1);
        id
    }
}
