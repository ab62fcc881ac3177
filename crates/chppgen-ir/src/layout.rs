//! Packed layout of generated declarations.
//!
//! Generated declarations carry no implicit padding, so a member's offset is
//! the sum of the sizes before it (structs) or zero (unions).

use chppgen_core::Aggregate;
use indexmap::IndexMap;

use crate::program::{MemberDecl, MemberRepr, Program, Repr, TypeDecl};

/// Encoded size of the offset+length descriptor: `uint16_t offset; uint16_t length;`.
pub const DESCRIPTOR_SIZE: usize = 4;

/// How a primitive's bytes are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarClass {
    Unsigned,
    Signed,
    Float,
    Bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Primitive {
    pub size: usize,
    pub class: ScalarClass,
}

/// Sizes of primitive type specs.
///
/// `const`/`volatile` qualifiers are ignored and every `enum` spec is a 4-byte
/// signed integer.
#[derive(Clone, Debug)]
pub struct PrimitiveTable {
    types: IndexMap<String, Primitive>,
}

impl Default for PrimitiveTable {
    fn default() -> Self {
        use ScalarClass::*;
        Self::empty()
            .with("uint8_t", 1, Unsigned)
            .with("int8_t", 1, Signed)
            .with("uint16_t", 2, Unsigned)
            .with("int16_t", 2, Signed)
            .with("uint32_t", 4, Unsigned)
            .with("int32_t", 4, Signed)
            .with("uint64_t", 8, Unsigned)
            .with("int64_t", 8, Signed)
            .with("char", 1, Signed)
            .with("bool", 1, Bool)
            .with("float", 4, Float)
            .with("double", 8, Float)
    }
}

impl PrimitiveTable {
    /// Table with the fixed-width integer, `char`, `bool`, `float` and `double` types.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Register (or override) a primitive.
    pub fn with(mut self, name: impl Into<String>, size: usize, class: ScalarClass) -> Self {
        self.types.insert(name.into(), Primitive { size, class });
        self
    }

    pub fn get(&self, spec: &str) -> Option<Primitive> {
        let mut spec = spec.trim();
        while let Some(rest) = spec
            .strip_prefix("const ")
            .or_else(|| spec.strip_prefix("volatile "))
        {
            spec = rest.trim_start();
        }
        if spec.starts_with("enum ") {
            return Some(Primitive {
                size: 4,
                class: ScalarClass::Signed,
            });
        }
        self.types.get(spec).copied()
    }
}

/// Placement of one member inside its packed declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub offset: usize,
    /// Bytes occupied inside the declaration.
    pub size: usize,
    /// Size of one element: the array element, the scalar itself, or for a
    /// descriptor the element stored in the payload region.
    pub element_size: usize,
    /// Element count of a fixed-size array, otherwise 1.
    pub count: usize,
    /// Scalar class of the element, `None` for nested aggregates.
    pub scalar: Option<ScalarClass>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeLayout {
    pub kind: Aggregate,
    pub size: usize,
    fields: IndexMap<String, FieldLayout>,
}

impl TypeLayout {
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldLayout)> {
        self.fields.iter().map(|(name, layout)| (name.as_str(), layout))
    }
}

/// Errors computing packed layouts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("no size known for `{spec}` (member `{field}` of `{type_name}`)")]
    UnsizedPrimitive {
        type_name: String,
        field: String,
        spec: String,
    },

    #[error("type `{0}` is referenced before it is declared")]
    UndeclaredType(String),
}

/// Layouts of every declaration in a program, keyed by source type name.
#[derive(Clone, Debug, Default)]
pub struct LayoutTable {
    types: IndexMap<String, TypeLayout>,
}

impl LayoutTable {
    /// Lay out `program.decls`, which are in dependency order.
    pub fn compute(program: &Program, primitives: &PrimitiveTable) -> Result<Self, LayoutError> {
        let mut table = Self::default();
        for decl in &program.decls {
            let layout = table.lay_out(decl, primitives)?;
            table.types.insert(decl.source.clone(), layout);
        }
        Ok(table)
    }

    pub fn get(&self, source: &str) -> Option<&TypeLayout> {
        self.types.get(source)
    }

    pub fn size_of(&self, source: &str) -> Option<usize> {
        self.types.get(source).map(|layout| layout.size)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn lay_out(&self, decl: &TypeDecl, primitives: &PrimitiveTable) -> Result<TypeLayout, LayoutError> {
        let mut fields = IndexMap::new();
        let mut cursor = 0;
        let mut size = 0;

        for member in &decl.members {
            let mut field = self.member_layout(decl, member, primitives)?;
            match decl.kind {
                Aggregate::Struct => {
                    field.offset = cursor;
                    cursor += field.size;
                    size = cursor;
                }
                Aggregate::Union => size = size.max(field.size),
            }
            fields.insert(member.name.clone(), field);
        }

        Ok(TypeLayout {
            kind: decl.kind,
            size,
            fields,
        })
    }

    fn member_layout(
        &self,
        decl: &TypeDecl,
        member: &MemberDecl,
        primitives: &PrimitiveTable,
    ) -> Result<FieldLayout, LayoutError> {
        let count = member.array_len.unwrap_or(1);
        let layout = match &member.repr {
            MemberRepr::Value(repr) => {
                let (element_size, scalar) = self.repr_size(decl, member, repr, primitives)?;
                FieldLayout {
                    offset: 0,
                    size: element_size * count,
                    element_size,
                    count,
                    scalar,
                }
            }
            MemberRepr::Descriptor { element } => {
                let (element_size, scalar) = self.repr_size(decl, member, element, primitives)?;
                FieldLayout {
                    offset: 0,
                    size: DESCRIPTOR_SIZE * count,
                    element_size,
                    count,
                    scalar,
                }
            }
        };
        Ok(layout)
    }

    fn repr_size(
        &self,
        decl: &TypeDecl,
        member: &MemberDecl,
        repr: &Repr,
        primitives: &PrimitiveTable,
    ) -> Result<(usize, Option<ScalarClass>), LayoutError> {
        match repr {
            Repr::Primitive(spec) => primitives
                .get(spec)
                .map(|p| (p.size, Some(p.class)))
                .ok_or_else(|| LayoutError::UnsizedPrimitive {
                    type_name: decl.source.clone(),
                    field: member.name.clone(),
                    spec: spec.clone(),
                }),
            Repr::Record(record) => self
                .size_of(&record.source)
                .map(|size| (size, None))
                .ok_or_else(|| LayoutError::UndeclaredType(record.source.clone())),
        }
    }
}
