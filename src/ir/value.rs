use crate::ir::{BlockId, OperationId, StorageId, ssa_names::SsaNames};

/// A handle to a piece of data flowing through a module.
///
/// Values never own what they name: blocks, operations and storages live in
/// their owning module or context and are referred to here by id. Two values
/// are equal when they name the same entity at the same index; every `Any`
/// is equal to every other `Any`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Value {
    Any,
    BlockArgument { block: BlockId, index: usize },
    OperationResult { operation: OperationId, index: usize },
    StoredValue(StorageId),
    Constant(i64),
}

impl Value {
    pub fn result(operation: OperationId, index: usize) -> Self {
        Value::OperationResult { operation, index }
    }

    /// The first output of `operation`, which is the only one most operators
    /// produce.
    pub fn default_result(operation: OperationId) -> Self {
        Value::result(operation, 0)
    }

    pub fn argument(block: BlockId, index: usize) -> Self {
        Value::BlockArgument { block, index }
    }

    pub fn get_operation(&self) -> Option<OperationId> {
        match self {
            Value::OperationResult { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    pub fn is_operation_result(&self) -> bool {
        matches!(self, Value::OperationResult { .. })
    }

    pub fn to_string(&self, ssa_names: &mut SsaNames) -> String {
        match self {
            Value::Any => "<<ANY>>".to_string(),
            Value::Constant(c) => c.to_string(),
            Value::StoredValue(storage) => format!("store:{}", storage.0),
            Value::BlockArgument { .. } | Value::OperationResult { .. } => {
                format!("%{}", ssa_names.get_or_create_value_id(*self))
            }
        }
    }
}
