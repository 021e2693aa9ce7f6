use std::collections::HashMap;

use crate::ir::types::Type;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDecl {
    name: String,
    ty: Type,
}

impl DataDecl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> &Type {
        &self.ty
    }
}

/// Named declarations in declaration order. Names are unique.
#[derive(Clone, Debug, Default)]
pub struct DataDeclCollection {
    decls: Vec<DataDecl>,
    by_name: HashMap<String, usize>,
}

impl DataDeclCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the position of the new declaration.
    pub fn add_decl(&mut self, name: &str, ty: Type) -> usize {
        if self.by_name.contains_key(name) {
            panic!("Adding a duplicate declaration for `{}`.", name);
        }
        let index = self.decls.len();
        self.decls.push(DataDecl::new(name, ty));
        self.by_name.insert(name.to_string(), index);
        index
    }

    pub fn find_decl(&self, name: &str) -> Option<&DataDecl> {
        self.by_name.get(name).map(|i| &self.decls[*i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, index: usize) -> Option<&DataDecl> {
        self.decls.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find() {
        let mut decls = DataDeclCollection::new();
        assert_eq!(decls.add_decl("x", Type::primitive()), 0);
        assert_eq!(decls.add_decl("y", Type::entity("Person")), 1);
        assert_eq!(decls.find_decl("y").map(|d| d.get_type().to_string()), Some("entity<Person>".to_string()));
        assert!(decls.find_decl("z").is_none());
        assert_eq!(decls.index_of("x"), Some(0));
        assert_eq!(decls.iter().map(|d| d.name()).collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    #[should_panic(expected = "Adding a duplicate declaration for `x`.")]
    fn test_duplicate_decl_is_fatal() {
        let mut decls = DataDeclCollection::new();
        decls.add_decl("x", Type::primitive());
        decls.add_decl("x", Type::primitive());
    }
}
