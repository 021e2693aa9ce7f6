use std::{fmt::Display, rc::Rc};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Entity(String),
}

/// Shared, immutable type handle carried by declarations and storages.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type(Rc<TypeKind>);

impl Type {
    pub fn primitive() -> Self {
        Type(Rc::new(TypeKind::Primitive))
    }

    pub fn entity(schema: impl Into<String>) -> Self {
        Type(Rc::new(TypeKind::Entity(schema.into())))
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.0 {
            TypeKind::Primitive => write!(f, "primitive"),
            TypeKind::Entity(schema) => write!(f, "entity<{schema}>"),
        }
    }
}
