use std::path::PathBuf;

use thiserror::Error;

/// Recoverable errors at the boundary: reading and lowering a scenario.
/// Broken invariants inside the IR or the analyses panic instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot read scenario {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    TomlDecode(#[from] toml::de::Error),
    #[error("Operation `{operation}` uses unknown operator `{operator}`")]
    UnknownOperator { operation: String, operator: String },
    #[error("Unknown value reference `{reference}` in {scope}")]
    UnknownValueReference { reference: String, scope: String },
    #[error("Unknown block `{0}`")]
    UnknownBlock(String),
    #[error("Block `{block}` has no output named `{name}`")]
    UnknownOutput { block: String, name: String },
    #[error("Attribute `{name}` of operation `{operation}` {reason}")]
    BadAttribute {
        operation: String,
        name: String,
        reason: String,
    },
    #[error("Duplicate {kind} `{name}`")]
    DuplicateName { kind: &'static str, name: String },
    #[error("Operation `{operation}` names {results} results but `{operator}` has {outputs} outputs")]
    TooManyResults {
        operation: String,
        operator: String,
        results: usize,
        outputs: usize,
    },
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
}
