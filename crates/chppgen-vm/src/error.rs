/// Errors raised while executing a generation program.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("no entry point for `{0}`")]
    UnknownRoot(String),

    #[error("program has no definition for `{0}`")]
    MissingDefinition(String),

    /// The generated C asserts here.
    #[error("discriminator value {value} of union field `{field}` has no mapping")]
    UnmappedDiscriminator { field: String, value: i64 },

    #[error("unknown constant `{0}`")]
    UnknownConstant(String),

    #[error("field `{field}`: expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("allocation of {size} bytes failed")]
    AllocationFailed { size: usize },

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
