//! Generation-time errors.
//!
//! Every error aborts the whole run: inputs are static declarations and
//! annotation data, so the fix is always to correct the input.

/// Errors that can occur while compiling a generation request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The resolver knows no struct or union with this name.
    #[error("couldn't find `{0}` in parsed structs/unions")]
    UnknownType(String),

    /// Pointer member with neither `rewrite_type` nor `var_len_array`.
    #[error("pointer member `{field}` of `{type_name}` requires an annotation")]
    UnannotatedPointer { type_name: String, field: String },

    #[error("type `{type_name}` does not start with `{prefix}` and has no rename_type annotation")]
    NamingConvention { type_name: String, prefix: String },

    /// Type name does not follow `<prefix><Service><Core>`.
    #[error("unexpected structure name `{type_name}`: expected `{prefix}{service}<Name>`")]
    StructureNaming {
        type_name: String,
        prefix: String,
        service: String,
    },

    #[error("unsupported nesting of variable-length data at `{type_name}.{field}`")]
    UnsupportedNesting { type_name: String, field: String },

    #[error("dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    /// `var_len_array` names a length field that is not a sibling.
    #[error("`{type_name}.{field}` references unknown length field `{length_field}`")]
    UnknownLengthField {
        type_name: String,
        field: String,
        length_field: String,
    },

    /// `union_variant` names a discriminator that is not a sibling.
    #[error("`{type_name}.{field}` references unknown discriminator `{discriminator}`")]
    UnknownDiscriminator {
        type_name: String,
        field: String,
        discriminator: String,
    },

    /// `union_variant` mapping targets a member the union does not have.
    #[error("invalid mapping: couldn't find member `{member}` in union `{union_type}`")]
    InvalidVariantMapping { union_type: String, member: String },

    #[error("`{type_name}.{field}` has a union_variant annotation but is not a union")]
    NotAUnion { type_name: String, field: String },

    /// Union member without `union_variant`; unions are only encoded inline.
    #[error("union member `{field}` of `{type_name}` has no union_variant annotation")]
    UndiscriminatedUnion { type_name: String, field: String },

    #[error("root type `{0}` is a union")]
    UnionRoot(String),
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, Error>;
