//! Secrecy and integrity tag inference.
//!
//! A policy is compiled into [`InferenceRules`]: a mapping from operations to
//! named actions and, per action, the rules computing each output's tags.
//! [`AbstractSemantics`] turns those rules into a transfer function for the
//! module fixpoint.

pub mod abstract_ifc_tags;
pub mod abstract_semantics;
pub mod inference_rule;
pub mod inference_rules;
pub mod inference_rules_builder;

pub use abstract_ifc_tags::{AbstractIfcTags, TagId};
pub use abstract_semantics::AbstractSemantics;
pub use inference_rule::{
    Conclusion, CopyInput, InferenceRule, InferenceRuleSequence, InputHasIntegrity,
    MergeIntegrityTags, MergeKind, ModifyTag, ModifyTagKind, OutputRules,
};
pub use inference_rules::InferenceRules;
pub use inference_rules_builder::InferenceRulesBuilder;
