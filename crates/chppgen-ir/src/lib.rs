#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compiled generation program shared by the C renderer and the reference encoder.
//!
//! A [`Program`] is the fully resolved result of one generation run: every
//! name is final, every annotation has been turned into a concrete encoding
//! step, and every ordering decision has been made. Renderers and
//! interpreters only walk it.

pub mod layout;
pub mod program;


pub use layout::{
    DESCRIPTOR_SIZE, FieldLayout, LayoutError, LayoutTable, Primitive, PrimitiveTable,
    ScalarClass, TypeLayout,
};
pub use program::{
    Assign, EncodeFn, EntryPoint, MemberDecl, MemberRepr, Program, RecordRef, Repr, SizeCall,
    SizeFn, SizeTerm, Step, TypeDecl, UnionArm,
};
