use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

pub type Tag = usize;
pub type TagSet = BTreeSet<Tag>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddConfidentiality,
    RemoveConfidentiality,
    AddIntegrity,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PreconditionDescription {
    pub argument: String,
    pub required_integrity_tag: String,
}

/// A policy rule as authored: the tag transform named `name` applies
/// `action` with `tag` when every precondition holds.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SqlPolicyRuleDescription {
    pub name: String,
    pub action: Action,
    pub tag: String,
    #[serde(default)]
    pub preconditions: Vec<PreconditionDescription>,
}

impl SqlPolicyRuleDescription {
    pub fn new(name: &str, action: Action, tag: &str) -> Self {
        Self {
            name: name.to_string(),
            action,
            tag: tag.to_string(),
            preconditions: vec![],
        }
    }

    pub fn with_precondition(mut self, argument: &str, required_integrity_tag: &str) -> Self {
        self.preconditions.push(PreconditionDescription {
            argument: argument.to_string(),
            required_integrity_tag: required_integrity_tag.to_string(),
        });
        self
    }
}

#[derive(Clone, Debug)]
pub struct SqlPolicyRule {
    name: String,
    action: Action,
    tag: Tag,
    preconditions: HashMap<String, TagSet>,
}

impl SqlPolicyRule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn get_precondition_tag_set(&self, argument: &str) -> Option<&TagSet> {
        self.preconditions.get(argument)
    }
}

/// Rules by name with their tags interned in first-use order.
#[derive(Clone, Debug, Default)]
pub struct SqlPolicyRules {
    rules: HashMap<String, SqlPolicyRule>,
    tags: HashMap<String, Tag>,
    tag_names: Vec<String>,
}

impl SqlPolicyRules {
    pub fn new(descriptions: &[SqlPolicyRuleDescription]) -> Self {
        let mut result = Self::default();
        for description in descriptions {
            let mut preconditions: HashMap<String, TagSet> = HashMap::new();
            for precondition in &description.preconditions {
                let tag = result.get_or_create_tag(&precondition.required_integrity_tag);
                preconditions
                    .entry(precondition.argument.clone())
                    .or_default()
                    .insert(tag);
            }
            let rule = SqlPolicyRule {
                name: description.name.clone(),
                action: description.action,
                tag: result.get_or_create_tag(&description.tag),
                preconditions,
            };
            if result.rules.insert(description.name.clone(), rule).is_some() {
                panic!("Duplicate entry for rule name '{}'", description.name);
            }
        }
        result
    }

    fn get_or_create_tag(&mut self, name: &str) -> Tag {
        if let Some(tag) = self.tags.get(name) {
            return *tag;
        }
        let tag = self.tag_names.len();
        self.tags.insert(name.to_string(), tag);
        self.tag_names.push(name.to_string());
        tag
    }

    pub fn get_rule(&self, name: &str) -> Option<&SqlPolicyRule> {
        self.rules.get(name)
    }

    pub fn get_tag(&self, name: &str) -> Option<Tag> {
        self.tags.get(name).copied()
    }

    pub fn get_tag_name(&self, tag: Tag) -> Option<&str> {
        self.tag_names.get(tag).map(String::as_str)
    }

    pub fn tag_names(&self) -> &[String] {
        &self.tag_names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
