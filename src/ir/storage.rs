use std::collections::BTreeSet;

use crate::ir::{StorageId, types::Type, value::Value};

/// A named global cell. Values written into it are remembered.
#[derive(Debug)]
pub struct Storage {
    id: StorageId,
    name: String,
    ty: Type,
    input_values: BTreeSet<Value>,
}

impl Storage {
    pub fn new(id: StorageId, name: impl Into<String>, ty: Type) -> Self {
        Self {
            id,
            name: name.into(),
            ty,
            input_values: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> StorageId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> &Type {
        &self.ty
    }

    pub fn add_input_value(&mut self, value: Value) {
        self.input_values.insert(value);
    }

    pub fn input_values(&self) -> &BTreeSet<Value> {
        &self.input_values
    }

    pub fn to_string(&self) -> String {
        format!("store:{}:{}", self.name, self.ty)
    }
}
