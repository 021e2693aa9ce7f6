use std::collections::HashMap;

use crate::ir::{BlockId, ModuleId, value::Value};

/// Hands out short, stable names for printing. Ids are assigned in the
/// order entities are first asked about and never change for a given table.
#[derive(Debug, Default)]
pub struct SsaNames {
    module_ids: HashMap<ModuleId, u64>,
    block_ids: HashMap<BlockId, u64>,
    value_ids: HashMap<Value, u64>,
}

impl SsaNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_module_id(&mut self, module: ModuleId) -> u64 {
        Self::get_or_create(&mut self.module_ids, module)
    }

    pub fn get_or_create_block_id(&mut self, block: BlockId) -> u64 {
        Self::get_or_create(&mut self.block_ids, block)
    }

    pub fn get_or_create_value_id(&mut self, value: Value) -> u64 {
        Self::get_or_create(&mut self.value_ids, value)
    }

    fn get_or_create<K: std::hash::Hash + Eq>(table: &mut HashMap<K, u64>, key: K) -> u64 {
        let next = table.len() as u64;
        *table.entry(key).or_insert(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::OperationId;

    #[test]
    fn test_ids_are_per_kind_and_stable() {
        let mut names = SsaNames::new();
        assert_eq!(names.get_or_create_block_id(BlockId(10)), 0);
        assert_eq!(names.get_or_create_block_id(BlockId(4)), 1);
        assert_eq!(names.get_or_create_module_id(ModuleId(10)), 0);
        assert_eq!(names.get_or_create_value_id(Value::default_result(OperationId(9))), 0);
        assert_eq!(names.get_or_create_block_id(BlockId(10)), 0);
    }
}
