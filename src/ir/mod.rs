//! The dataflow IR: modules own blocks, blocks own operations and values are
//! small handles naming entities by id.

pub mod attribute;
pub mod block;
pub mod builder;
pub mod context;
pub mod data_decl;
pub mod module;
pub mod operation;
pub mod operator;
pub mod printer;
pub mod ssa_names;
pub mod storage;
pub mod types;
pub mod value;
pub mod visitor;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ModuleId(pub u64);
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BlockId(pub u64);
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct OperationId(pub u64);
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StorageId(pub u64);

pub use attribute::{Attribute, NamedAttributeMap};
pub use block::Block;
pub use builder::{BlockBuilder, ModuleBuilder};
pub use context::IrContext;
pub use data_decl::{DataDecl, DataDeclCollection};
pub use module::Module;
pub use operation::Operation;
pub use operator::Operator;
pub use printer::IrPrinter;
pub use ssa_names::SsaNames;
pub use storage::Storage;
pub use types::Type;
pub use value::Value;
pub use visitor::{IrTraversingVisitor, IrVisitor};
