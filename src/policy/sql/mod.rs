//! The SQL front-end: its operators and the policy rules attached to them.

pub mod decode;
pub mod ops;
pub mod policy_rules;

pub use decode::decode_sql_policy_rules;
pub use ops::{LiteralOp, MergeOp, SqlOutputOp, TagTransformOp, register_sql_operators};
pub use policy_rules::{
    Action, PreconditionDescription, SqlPolicyRule, SqlPolicyRuleDescription, SqlPolicyRules,
};
