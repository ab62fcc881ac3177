//! Annotation model and the (type, field) lookup index.
//!
//! Annotations arrive grouped per type, in the same shape as the annotation
//! document:
//!
//! ```json
//! { "name": "chreWwanCellInfoResult",
//!   "annotations": [
//!     { "field": "cells", "annotation": "var_len_array", "length_field": "cellInfoCount" }
//!   ] }
//! ```
//!
//! The field name `"."` binds an annotation to the type itself.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// Field name that marks a type-level annotation.
pub const TYPE_LEVEL_FIELD: &str = ".";

/// Constant appearing in annotation data.
///
/// Symbolic constants (`CHRE_WWAN_CELL_INFO_TYPE_LTE`) are emitted verbatim and
/// resolved by whoever compiles or executes the generated code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Symbol(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Symbol(name) => f.write_str(name),
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Literal {
    fn from(name: &str) -> Self {
        Self::Symbol(name.to_owned())
    }
}

/// What an annotation is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Type,
    Field(String),
}

impl Target {
    /// Interpret a field name from the annotation document.
    pub fn from_field_name(field: &str) -> Self {
        if field == TYPE_LEVEL_FIELD {
            Self::Type
        } else {
            Self::Field(field.to_owned())
        }
    }

    fn key(&self) -> &str {
        match self {
            Self::Type => TYPE_LEVEL_FIELD,
            Self::Field(name) => name,
        }
    }
}

/// Closed set of annotation kinds.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "annotation", rename_all = "snake_case")]
pub enum Annotation {
    /// Type-level: use this name (without the `struct`/`union` keyword) for the
    /// generated type.
    RenameType { type_override: String },
    /// Field-level: use this type spec for the generated member.
    RewriteType { type_override: String },
    /// Ignore the source value and always encode this constant.
    FixedValue { value: Literal },
    /// Pointer to `length_field` consecutive elements.
    VarLenArray { length_field: String },
    /// Union member selected by the value of a sibling discriminator field.
    UnionVariant {
        discriminator: String,
        mapping: Vec<(Literal, String)>,
    },
    /// Field holds an enumeration value.
    Enum {
        #[serde(default)]
        enum_type: Option<String>,
    },
}

impl Annotation {
    /// Name of the kind as spelled in the annotation document.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::RenameType { .. } => "rename_type",
            Self::RewriteType { .. } => "rewrite_type",
            Self::FixedValue { .. } => "fixed_value",
            Self::VarLenArray { .. } => "var_len_array",
            Self::UnionVariant { .. } => "union_variant",
            Self::Enum { .. } => "enum",
        }
    }
}

/// One annotation bound to a type or one of its fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub type_name: String,
    pub target: Target,
    pub annotation: Annotation,
}

impl AnnotationRecord {
    pub fn field(
        type_name: impl Into<String>,
        field: impl Into<String>,
        annotation: Annotation,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            target: Target::Field(field.into()),
            annotation,
        }
    }

    pub fn type_level(type_name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            type_name: type_name.into(),
            target: Target::Type,
            annotation,
        }
    }
}

/// Per-type annotation group from the annotation document.
#[derive(Clone, Debug, Deserialize)]
pub struct StructAnnotations {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<FieldAnnotation>,
}

/// Annotation entry inside a [`StructAnnotations`] group.
#[derive(Clone, Debug, Deserialize)]
pub struct FieldAnnotation {
    pub field: String,
    #[serde(flatten)]
    pub annotation: Annotation,
}

impl StructAnnotations {
    pub fn into_records(self) -> impl Iterator<Item = AnnotationRecord> {
        let type_name = self.name;
        self.annotations
            .into_iter()
            .map(move |entry| AnnotationRecord {
                type_name: type_name.clone(),
                target: Target::from_field_name(&entry.field),
                annotation: entry.annotation,
            })
    }
}

/// Annotations grouped by type, then by field, in document order.
///
/// Absence of annotations is never an error: unknown pairs yield an empty slice.
#[derive(Clone, Debug, Default)]
pub struct AnnotationIndex {
    by_type: HashMap<String, HashMap<String, Vec<Annotation>>>,
    len: usize,
}

impl AnnotationIndex {
    pub fn new(records: impl IntoIterator<Item = AnnotationRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            index
                .by_type
                .entry(record.type_name)
                .or_default()
                .entry(record.target.key().to_owned())
                .or_default()
                .push(record.annotation);
            index.len += 1;
        }
        index
    }

    pub fn from_structs(structs: impl IntoIterator<Item = StructAnnotations>) -> Self {
        Self::new(structs.into_iter().flat_map(StructAnnotations::into_records))
    }

    /// Annotations for `(type_name, field)`; `field == "."` selects type-level ones.
    pub fn lookup(&self, type_name: &str, field: &str) -> &[Annotation] {
        self.by_type
            .get(type_name)
            .and_then(|fields| fields.get(field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn type_level(&self, type_name: &str) -> &[Annotation] {
        self.lookup(type_name, TYPE_LEVEL_FIELD)
    }

    /// Total number of records in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
