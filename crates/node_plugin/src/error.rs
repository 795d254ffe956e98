use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::ExecutorKind;
use crate::value::DataType;

/// Failures surfaced from node processing. All variants are fatal to the
/// invocation that produced them; retries are the host's decision.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, JsonSchema)]
pub enum NodeError {
    /// The current executor lacks a capability the node requires.
    #[error("node requires the {required} executor, but is running under {actual}")]
    UnsupportedExecutor {
        required: ExecutorKind,
        actual: ExecutorKind,
    },

    /// An input value's type cannot be converted to the type a field expects.
    #[error("cannot coerce {actual} to {expected}")]
    Coercion { expected: DataType, actual: DataType },

    /// The native artifact ran but the operation failed.
    #[error("native process failed: {0}")]
    NativeProcess(String),

    /// The native artifact could not be resolved or spoken to at call time.
    /// Distinct from `UnsupportedExecutor`: the executor was supposed to
    /// support the call, but the artifact is missing or broken.
    #[error("native entry unavailable: {0}")]
    DeferredLoad(String),

    /// The stored node configuration does not deserialize into the shape the
    /// node expects.
    #[error("invalid node configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("node type already registered: {0}")]
    DuplicateNodeType(String),

    #[error("internal error: {0}")]
    Internal(String),
}
