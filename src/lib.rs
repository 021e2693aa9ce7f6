//! Information-flow (taint) analysis over a small SSA-style IR.
//!
//! Programs are modules of blocks and operations ([`ir`]). The [`analysis`]
//! module provides the fixpoint machinery and the secrecy/integrity tag
//! lattice, and [`policy`] turns SQL policy rules and differential-privacy
//! budgets into compliance checks. [`config`] reads scenarios from TOML and
//! [`driver`] ties the stages together.

pub mod analysis;
pub mod config;
pub mod driver;
pub mod error;
pub mod ir;
pub mod policy;

pub use error::Error;
