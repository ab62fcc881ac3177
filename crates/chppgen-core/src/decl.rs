//! Raw declarations as produced by the header-parsing front end.

use std::fmt;

use indexmap::IndexMap;

/// Whether a declaration is a `struct` or a `union`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Struct,
    Union,
}

impl Aggregate {
    /// C keyword that introduces this aggregate.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
        }
    }

    pub fn is_union(self) -> bool {
        matches!(self, Self::Union)
    }
}

/// Declarator applied on top of a field's base type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Declarator {
    #[default]
    Plain,
    Pointer,
    /// Fixed-size array with the given element count.
    Array(usize),
}

/// Type of a single field: base type plus declarator.
///
/// The base is kept verbatim (`uint32_t`, `struct chreWwanCellInfo`), which is
/// how it is spelled in the generated declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSpec {
    base: String,
    declarator: Declarator,
}

impl TypeSpec {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            declarator: Declarator::Plain,
        }
    }

    /// Turn this spec into a pointer to the base type.
    pub fn pointer(mut self) -> Self {
        self.declarator = Declarator::Pointer;
        self
    }

    /// Turn this spec into a fixed-size array of the base type.
    pub fn array(mut self, len: usize) -> Self {
        self.declarator = Declarator::Array(len);
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Base type without leading `const`/`volatile` qualifiers.
    ///
    /// # Examples
    /// ```
    /// use chppgen_core::TypeSpec;
    /// assert_eq!(TypeSpec::new("const uint32_t").unqualified_base(), "uint32_t");
    /// assert_eq!(TypeSpec::new("volatile const int8_t").unqualified_base(), "int8_t");
    /// ```
    pub fn unqualified_base(&self) -> &str {
        let mut base = self.base.trim();
        while let Some(rest) = base
            .strip_prefix("const ")
            .or_else(|| base.strip_prefix("volatile "))
        {
            base = rest.trim_start();
        }
        base
    }

    pub fn declarator(&self) -> Declarator {
        self.declarator
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.declarator, Declarator::Pointer)
    }

    pub fn array_len(&self) -> Option<usize> {
        match self.declarator {
            Declarator::Array(len) => Some(len),
            _ => None,
        }
    }

    /// Name of the struct or union the base type refers to, if any.
    ///
    /// # Examples
    /// ```
    /// use chppgen_core::TypeSpec;
    /// assert_eq!(TypeSpec::new("struct chreWwanCellInfo").aggregate_name(), Some("chreWwanCellInfo"));
    /// assert_eq!(TypeSpec::new("const union anon7").aggregate_name(), Some("anon7"));
    /// assert_eq!(TypeSpec::new("uint32_t").aggregate_name(), None);
    /// ```
    pub fn aggregate_name(&self) -> Option<&str> {
        let base = self.unqualified_base();
        base.strip_prefix("struct ")
            .or_else(|| base.strip_prefix("union "))
            .map(str::trim)
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.declarator {
            Declarator::Plain => write!(f, "{}", self.base),
            Declarator::Pointer => write!(f, "{} *", self.base),
            Declarator::Array(len) => write!(f, "{}[{}]", self.base, len),
        }
    }
}

/// One field of a struct or union, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawField {
    pub name: String,
    pub ty: TypeSpec,
}

impl RawField {
    pub fn new(name: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A resolved struct or union declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawType {
    pub kind: Aggregate,
    pub fields: Vec<RawField>,
}

/// Capability that turns a type name into its declaration.
pub trait Resolver {
    /// Returns `None` when `name` is neither a struct nor a union.
    fn resolve(&self, name: &str) -> Option<RawType>;
}

/// In-memory [`Resolver`] backed by an ordered map of declarations.
#[derive(Clone, Debug, Default)]
pub struct DeclTable {
    types: IndexMap<String, RawType>,
}

impl DeclTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a declaration.
    pub fn insert(&mut self, name: impl Into<String>, decl: RawType) {
        self.types.insert(name.into(), decl);
    }

    /// Builder form of [`insert`](Self::insert) for a struct.
    pub fn with_struct(
        mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = RawField>,
    ) -> Self {
        self.insert(
            name,
            RawType {
                kind: Aggregate::Struct,
                fields: fields.into_iter().collect(),
            },
        );
        self
    }

    /// Builder form of [`insert`](Self::insert) for a union.
    pub fn with_union(
        mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = RawField>,
    ) -> Self {
        self.insert(
            name,
            RawType {
                kind: Aggregate::Union,
                fields: fields.into_iter().collect(),
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&RawType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Resolver for DeclTable {
    fn resolve(&self, name: &str) -> Option<RawType> {
        self.types.get(name).cloned()
    }
}
