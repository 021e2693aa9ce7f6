use std::collections::HashMap;

use crate::ir::{BlockId, ModuleId, OperationId, block::Block, operation::Operation};

/// Owns its blocks and, through them, every operation. Operations of this
/// module (not of nested implementation modules) can be found by id.
#[derive(Debug)]
pub struct Module {
    id: ModuleId,
    blocks: Vec<Block>,
    block_index: HashMap<BlockId, usize>,
    operation_index: HashMap<OperationId, (usize, usize)>,
}

impl Module {
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            blocks: Vec::new(),
            block_index: HashMap::new(),
            operation_index: HashMap::new(),
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn add_block(&mut self, mut block: Block) -> BlockId {
        let block_id = block.id();
        if self.block_index.contains_key(&block_id) {
            panic!("Block {} is already part of module {}", block_id.0, self.id.0);
        }
        block.set_parent(self.id);
        let position = self.blocks.len();
        for (i, operation) in block.operations().iter().enumerate() {
            self.operation_index.insert(operation.id(), (position, i));
        }
        self.block_index.insert(block_id, position);
        self.blocks.push(block);
        block_id
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get_block(&self, id: BlockId) -> &Block {
        let position = self.block_index.get(&id).expect("Block should exist");
        &self.blocks[*position]
    }

    pub fn find_block(&self, id: BlockId) -> Option<&Block> {
        self.block_index.get(&id).map(|p| &self.blocks[*p])
    }

    pub fn get_operation(&self, id: OperationId) -> &Operation {
        self.find_operation(id).expect("Operation should exist")
    }

    pub fn find_operation(&self, id: OperationId) -> Option<&Operation> {
        self.operation_index
            .get(&id)
            .map(|(block, op)| &self.blocks[*block].operations()[*op])
    }

    pub fn iter_operations(&self) -> impl Iterator<Item = &Operation> {
        self.blocks.iter().flat_map(|b| b.operations().iter())
    }
}
