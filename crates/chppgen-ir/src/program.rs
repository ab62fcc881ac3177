//! Program structure: declarations, size functions, encoders, entry points.

use chppgen_core::{Aggregate, Literal};

/// Reference to another generated aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordRef {
    /// Source type name (`chreWwanCellInfo`).
    pub source: String,
    /// Generated type, keyword included (`struct ChppWwanCellInfo`).
    pub target: String,
    pub kind: Aggregate,
}

/// Generated representation of one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Repr {
    /// Primitive or rewritten type spec, emitted verbatim.
    Primitive(String),
    Record(RecordRef),
}

impl Repr {
    /// Type spec as spelled in generated code.
    pub fn c_type(&self) -> &str {
        match self {
            Self::Primitive(spec) => spec,
            Self::Record(record) => &record.target,
        }
    }
}

/// Generated representation of a member in a packed declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberRepr {
    Value(Repr),
    /// Offset+length descriptor into the shared payload region, which holds
    /// consecutive `element` values.
    Descriptor { element: Repr },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberDecl {
    pub name: String,
    pub repr: MemberRepr,
    pub array_len: Option<usize>,
    /// Trailing comment documenting overwritten or indirect members.
    pub comment: Option<String>,
}

/// Packed declaration of one generated struct or union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    pub source: String,
    pub target: String,
    pub kind: Aggregate,
    pub members: Vec<MemberDecl>,
}

impl TypeDecl {
    /// Anonymous source types have front-end synthesized names.
    pub fn is_anonymous(&self) -> bool {
        self.source.starts_with("anon")
    }

    pub fn member(&self, name: &str) -> Option<&MemberDecl> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// How a source value is copied into its generated slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Assign {
    /// Direct assignment.
    Scalar,
    /// Whole fixed-size array of primitives.
    Array(usize),
    /// Delegate to the nested type's encoder.
    Record {
        source: String,
        function: String,
        /// Encoder takes the shared payload arguments.
        var_len: bool,
    },
    /// Fixed-size array of nested structs, encoded element by element.
    RecordArray {
        source: String,
        function: String,
        len: usize,
    },
}

/// Union member written when the discriminator equals `value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionArm {
    pub value: Literal,
    pub member: String,
    pub assign: Assign,
}

/// Encoding of a single member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Scalar overwritten with a constant.
    FixedScalar { field: String, value: Literal },
    /// Array region filled with a constant byte.
    FixedFill { field: String, value: Literal },
    Assign { field: String, assign: Assign },
    /// Elements copied into the payload region, described by an offset+length
    /// descriptor in `field`.
    VarLen {
        field: String,
        length_field: String,
        element: Repr,
        assign: Assign,
    },
    /// Union storage zeroed, then the member selected by `discriminator` copied.
    Union {
        field: String,
        union: RecordRef,
        discriminator: String,
        arms: Vec<UnionArm>,
    },
}

impl Step {
    pub fn field(&self) -> &str {
        match self {
            Self::FixedScalar { field, .. }
            | Self::FixedFill { field, .. }
            | Self::Assign { field, .. }
            | Self::VarLen { field, .. }
            | Self::Union { field, .. } => field,
        }
    }
}

/// Encoder for one struct type. Unions never get one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeFn {
    pub source: String,
    pub target: String,
    pub function: String,
    pub var_len: bool,
    pub steps: Vec<Step>,
}

/// Contribution to an encoded size beyond the static layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SizeTerm {
    /// `length_field` elements of `element`, stored in the payload.
    VarLen {
        field: String,
        length_field: String,
        element: Repr,
    },
    /// Payload of a nested variable-length member: `function(member) - sizeof(target)`.
    Nested {
        field: String,
        source: String,
        target: String,
        function: String,
    },
}

/// Runtime size computation for a variable-length type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeFn {
    pub source: String,
    pub target: String,
    pub function: String,
    /// Parameter name of the source instance.
    pub param: String,
    pub terms: Vec<SizeTerm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SizeCall {
    /// `sizeof` of the generated type.
    Static,
    /// Named size function.
    Dynamic(String),
}

/// Public encode+allocate function for one root type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    pub source: String,
    pub target: String,
    pub function: String,
    pub encoder: String,
    pub size: SizeCall,
    pub var_len: bool,
}

/// Result of one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub service: String,
    pub includes: Vec<String>,
    pub roots: Vec<String>,
    /// Declarations, dependencies first.
    pub decls: Vec<TypeDecl>,
    /// Size functions, callees first.
    pub size_fns: Vec<SizeFn>,
    /// Encoders, callees first.
    pub encoders: Vec<EncodeFn>,
    /// One per root, in request order.
    pub entry_points: Vec<EntryPoint>,
}

impl Program {
    pub fn decl(&self, source: &str) -> Option<&TypeDecl> {
        self.decls.iter().find(|d| d.source == source)
    }

    pub fn size_fn(&self, source: &str) -> Option<&SizeFn> {
        self.size_fns.iter().find(|f| f.source == source)
    }

    pub fn encoder(&self, source: &str) -> Option<&EncodeFn> {
        self.encoders.iter().find(|f| f.source == source)
    }

    pub fn entry_point(&self, source: &str) -> Option<&EntryPoint> {
        self.entry_points.iter().find(|e| e.source == source)
    }
}
