use std::{collections::HashMap, fmt::Display, rc::Rc};

use itertools::Itertools;

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeKind {
    Int64(i64),
    String(String),
    Double(f64),
    Float(f32),
}

/// An immutable, shared operation attribute. Cloning only bumps a count.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute(Rc<AttributeKind>);

pub type NamedAttributeMap = HashMap<String, Attribute>;

impl Attribute {
    pub fn int64(value: i64) -> Self {
        Attribute(Rc::new(AttributeKind::Int64(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Attribute(Rc::new(AttributeKind::String(value.into())))
    }

    pub fn double(value: f64) -> Self {
        Attribute(Rc::new(AttributeKind::Double(value)))
    }

    pub fn float(value: f32) -> Self {
        Attribute(Rc::new(AttributeKind::Float(value)))
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.0
    }

    pub fn as_int64(&self) -> Option<i64> {
        match *self.0 {
            AttributeKind::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &*self.0 {
            AttributeKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match *self.0 {
            AttributeKind::Double(v) => Some(v),
            AttributeKind::Float(v) => Some(f64::from(v)),
            _ => None,
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.0 {
            AttributeKind::Int64(v) => write!(f, "{v}"),
            AttributeKind::String(s) => write!(f, "{s}"),
            AttributeKind::Double(v) => write!(f, "{v}l"),
            AttributeKind::Float(v) => write!(f, "{v}l"),
        }
    }
}

/// Renders `name: value` pairs sorted by name so output is stable.
pub fn attributes_to_string(attributes: &NamedAttributeMap) -> String {
    attributes
        .iter()
        .sorted_by_key(|(name, _)| name.as_str())
        .map(|(name, attr)| format!("{name}: {attr}"))
        .join(", ")
}
