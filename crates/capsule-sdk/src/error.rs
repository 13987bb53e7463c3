//! Error types shared across the capsule SDK and runtime

/// Boxed error used to carry constructor failure causes
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for capsule operations
pub type CapsuleResult<T> = Result<T, CapsuleError>;

/// Errors surfaced by capsule wrap/unwrap operations
#[derive(Debug, thiserror::Error)]
pub enum CapsuleError {
    /// No capsule factory is known for the requested value type
    #[error("no capsule factory registered for `{type_name}`")]
    NotRegistered {
        /// Name of the offending value type
        type_name: &'static str,
    },

    /// A binding exists but is tied to a different value type
    #[error("capsule binding for `{type_name}` does not match its value type (generated code mismatch)")]
    MalformedBinding {
        /// Name of the value type the binding was looked up for
        type_name: &'static str,
    },

    /// The generated constructor failed while building a capsule
    #[error("failed to build capsule for `{type_name}`")]
    BuildFailed {
        /// Name of the value type being wrapped
        type_name: &'static str,
        /// Original constructor failure
        #[source]
        source: BoxError,
    },

    /// A manifest source exists but could not produce its manifest
    #[error("failed to load capsule manifest: {reason}")]
    ManifestFailed {
        /// Description of the failure
        reason: String,
    },

    /// A capsule was unwrapped as the wrong value type
    #[error("type mismatch: capsule holds `{got}`, requested `{expected}`")]
    TypeMismatch {
        /// Value type requested by the caller
        expected: &'static str,
        /// Value type actually held by the capsule
        got: &'static str,
    },
}
