use derivative::Derivative;

use crate::ir::block::Block;

/// A named operation kind such as `core.plus` or `sql.merge`.
///
/// Operators are identified by name alone; a composite operator may also
/// carry the block that implements it.
#[derive(Derivative)]
#[derivative(Debug, PartialEq, Eq, Hash)]
pub struct Operator {
    name: String,
    number_of_return_values: usize,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    implementation: Option<Block>,
}

impl Operator {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_return_values(name, 1)
    }

    pub fn with_return_values(name: impl Into<String>, number_of_return_values: usize) -> Self {
        Self {
            name: name.into(),
            number_of_return_values,
            implementation: None,
        }
    }

    pub fn with_implementation(
        name: impl Into<String>,
        number_of_return_values: usize,
        implementation: Block,
    ) -> Self {
        Self {
            name: name.into(),
            number_of_return_values,
            implementation: Some(implementation),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number_of_return_values(&self) -> usize {
        self.number_of_return_values
    }

    pub fn implementation(&self) -> Option<&Block> {
        self.implementation.as_ref()
    }
}
