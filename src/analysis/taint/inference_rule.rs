use std::collections::HashMap;

use crate::analysis::taint::abstract_ifc_tags::TagId;

/// Replace the running result with the tags of one input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyInput {
    pub input_index: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModifyTagKind {
    AddSecrecy,
    RemoveSecrecy,
    AddIntegrity,
    RemoveIntegrity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifyTag {
    pub kind: ModifyTagKind,
    pub tag: TagId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MergeKind {
    Union,
    Intersect,
}

/// Replace the integrity of the running result with the union or the
/// intersection of the integrity of the listed inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeIntegrityTags {
    pub kind: MergeKind,
    pub input_indices: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Conclusion {
    CopyInput(CopyInput),
    ModifyTag(ModifyTag),
    MergeIntegrityTags(MergeIntegrityTags),
}

/// Holds when the input at `input_index` is known and carries `tag` as an
/// integrity tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputHasIntegrity {
    pub input_index: usize,
    pub tag: TagId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferenceRule {
    pub conclusion: Conclusion,
    pub premises: Vec<InputHasIntegrity>,
}

impl InferenceRule {
    pub fn new(conclusion: Conclusion) -> Self {
        Self {
            conclusion,
            premises: vec![],
        }
    }

    pub fn with_premises(conclusion: Conclusion, premises: Vec<InputHasIntegrity>) -> Self {
        Self {
            conclusion,
            premises,
        }
    }

    pub fn copy_input(input_index: usize) -> Self {
        Self::new(Conclusion::CopyInput(CopyInput { input_index }))
    }

    pub fn modify_tag(kind: ModifyTagKind, tag: TagId) -> Self {
        Self::new(Conclusion::ModifyTag(ModifyTag { kind, tag }))
    }

    pub fn merge_integrity(kind: MergeKind, input_indices: Vec<usize>) -> Self {
        Self::new(Conclusion::MergeIntegrityTags(MergeIntegrityTags {
            kind,
            input_indices,
        }))
    }
}

/// Rules applied in order, each one updating the running result.
pub type InferenceRuleSequence = Vec<InferenceRule>;

/// Output index to the rules that compute that output.
pub type OutputRules = HashMap<usize, InferenceRuleSequence>;
