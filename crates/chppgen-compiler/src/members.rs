//! Generated representation of struct and union members.

use chppgen_core::Annotation;
use chppgen_ir::{MemberDecl, MemberRepr, Repr};

use crate::Result;
use crate::graph::MemberDescriptor;
use crate::naming::Namer;

/// Representation of one value of `member`: for a `var_len_array` member, the
/// type of each element stored in the payload.
///
/// `rewrite_type` wins over everything; nested types take their generated
/// name; anything else keeps its base type spec minus `const`/`volatile`,
/// since generated members and payload elements are written to.
pub fn element_repr(namer: &Namer<'_>, member: &MemberDescriptor) -> Result<Repr> {
    if let Some(spec) = member.rewrite_type() {
        return Ok(Repr::Primitive(spec.to_owned()));
    }
    match &member.nested {
        Some(nested) => Ok(Repr::Record(namer.record_ref(nested)?)),
        None => Ok(Repr::Primitive(member.ty.unqualified_base().to_owned())),
    }
}

/// Representation of `member` inside its packed declaration.
pub fn member_repr(namer: &Namer<'_>, member: &MemberDescriptor) -> Result<MemberRepr> {
    if member.rewrite_type().is_none() && member.var_len_array().is_some() {
        return Ok(MemberRepr::Descriptor {
            element: element_repr(namer, member)?,
        });
    }
    Ok(MemberRepr::Value(element_repr(namer, member)?))
}

pub fn member_decl(namer: &Namer<'_>, member: &MemberDescriptor) -> Result<MemberDecl> {
    let repr = member_repr(namer, member)?;
    let comment = member_comment(member, &repr);
    Ok(MemberDecl {
        name: member.name.clone(),
        repr,
        array_len: member.array_len(),
        comment,
    })
}

fn member_comment(member: &MemberDescriptor, repr: &MemberRepr) -> Option<String> {
    member.annotations.iter().find_map(|annotation| match (annotation, repr) {
        (Annotation::FixedValue { value }, _) => {
            Some(format!("Input ignored; always set to {value}"))
        }
        (Annotation::VarLenArray { length_field }, MemberRepr::Descriptor { element }) => Some(
            format!("References {length_field} instances of {}", element.c_type()),
        ),
        _ => None,
    })
}
