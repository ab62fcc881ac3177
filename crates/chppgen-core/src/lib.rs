#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for CHPP serialization code generation.
//!
//! Two inputs feed every generation run:
//! - **Declarations**: struct/union field lists, supplied by a [`Resolver`]
//!   (the header-parsing front end lives outside this workspace)
//! - **Annotations**: per-type and per-field hints that give pointers, unions
//!   and fixed fields a defined wire representation

pub mod annotations;
pub mod decl;
pub mod utils;


pub use annotations::{
    Annotation, AnnotationIndex, AnnotationRecord, FieldAnnotation, Literal, StructAnnotations,
    TYPE_LEVEL_FIELD, Target,
};
pub use decl::{Aggregate, DeclTable, Declarator, RawField, RawType, Resolver, TypeSpec};
