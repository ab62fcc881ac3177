//! Encoders.
//!
//! One per struct reachable from the roots, dependencies first. Unions are
//! encoded inline by their container, which knows the discriminator.

use chppgen_core::{Annotation, Literal};
use chppgen_ir::{Assign, EncodeFn, Step, UnionArm};

use super::Lowering;
use crate::graph::{MemberDescriptor, TypeEntry};
use crate::members::element_repr;
use crate::naming::FnKind;
use crate::order::post_order;
use crate::{Error, Result};

impl Lowering<'_> {
    pub(super) fn encoders(&self) -> Result<Vec<EncodeFn>> {
        post_order(self.graph, self.graph.roots().iter().copied())
            .into_iter()
            .map(|id| self.graph.get(id))
            .filter(|entry| !entry.is_union())
            .map(|entry| self.encoder(entry))
            .collect()
    }

    fn encoder(&self, entry: &TypeEntry) -> Result<EncodeFn> {
        Ok(EncodeFn {
            source: entry.name.clone(),
            target: self.namer.chpp_name(&entry.name)?,
            function: self.namer.function_name(FnKind::Convert, &entry.name)?,
            var_len: entry.var_len,
            steps: entry
                .members
                .iter()
                .map(|m| self.step(entry, m))
                .collect::<Result<_>>()?,
        })
    }

    /// The first encoding annotation decides; `enum`, `rename_type` and
    /// `rewrite_type` fall through to plain assignment.
    fn step(&self, entry: &TypeEntry, member: &MemberDescriptor) -> Result<Step> {
        let opaque = member.rewrite_type().is_some();
        for annotation in &member.annotations {
            match annotation {
                Annotation::FixedValue { value } => return Ok(fixed(member, value)),
                Annotation::VarLenArray { length_field } if !opaque => {
                    return self.var_len_step(entry, member, length_field);
                }
                Annotation::UnionVariant {
                    discriminator,
                    mapping,
                } if !opaque => return self.union_step(entry, member, discriminator, mapping),
                Annotation::VarLenArray { .. }
                | Annotation::UnionVariant { .. }
                | Annotation::Enum { .. }
                | Annotation::RenameType { .. }
                | Annotation::RewriteType { .. } => {}
            }
        }
        Ok(Step::Assign {
            field: member.name.clone(),
            assign: self.assign(entry, member)?,
        })
    }

    fn var_len_step(
        &self,
        entry: &TypeEntry,
        member: &MemberDescriptor,
        length_field: &str,
    ) -> Result<Step> {
        let assign = match self.graph.nested(member) {
            None => Assign::Scalar,
            Some(nested) if nested.is_union() => return Err(undiscriminated(entry, member)),
            Some(nested) if nested.var_len => return Err(unsupported(entry, member)),
            Some(nested) => Assign::Record {
                source: nested.name.clone(),
                function: self.namer.function_name(FnKind::Convert, &nested.name)?,
                var_len: false,
            },
        };
        Ok(Step::VarLen {
            field: member.name.clone(),
            length_field: length_field.to_owned(),
            element: element_repr(&self.namer, member)?,
            assign,
        })
    }

    fn union_step(
        &self,
        entry: &TypeEntry,
        member: &MemberDescriptor,
        discriminator: &str,
        mapping: &[(Literal, String)],
    ) -> Result<Step> {
        let union = self
            .graph
            .nested(member)
            .filter(|nested| nested.is_union())
            .ok_or_else(|| Error::NotAUnion {
                type_name: entry.name.clone(),
                field: member.name.clone(),
            })?;
        if member.array_len().is_some() {
            return Err(unsupported(entry, member));
        }

        let arms = mapping
            .iter()
            .map(|(value, target)| -> Result<UnionArm> {
                let variant = union.member(target).ok_or_else(|| Error::InvalidVariantMapping {
                    union_type: union.name.clone(),
                    member: target.clone(),
                })?;
                Ok(UnionArm {
                    value: value.clone(),
                    member: target.clone(),
                    assign: self.assign(union, variant)?,
                })
            })
            .collect::<Result<_>>()?;

        Ok(Step::Union {
            field: member.name.clone(),
            union: self.namer.record_ref(&union.name)?,
            discriminator: discriminator.to_owned(),
            arms,
        })
    }

    /// Plain copy of `member` from source to generated layout.
    fn assign(&self, entry: &TypeEntry, member: &MemberDescriptor) -> Result<Assign> {
        let len = member.array_len();
        let primitive = len.map_or(Assign::Scalar, Assign::Array);
        if member.rewrite_type().is_some() {
            return Ok(primitive);
        }

        let Some(nested) = self.graph.nested(member) else {
            return Ok(primitive);
        };
        if nested.is_union() {
            return Err(undiscriminated(entry, member));
        }

        let function = self.namer.function_name(FnKind::Convert, &nested.name)?;
        match len {
            None => Ok(Assign::Record {
                source: nested.name.clone(),
                function,
                var_len: nested.var_len,
            }),
            Some(_) if nested.var_len => Err(unsupported(entry, member)),
            Some(len) => Ok(Assign::RecordArray {
                source: nested.name.clone(),
                function,
                len,
            }),
        }
    }
}

fn fixed(member: &MemberDescriptor, value: &Literal) -> Step {
    let field = member.name.clone();
    let value = value.clone();
    if member.array_len().is_some() {
        Step::FixedFill { field, value }
    } else {
        Step::FixedScalar { field, value }
    }
}

fn unsupported(entry: &TypeEntry, member: &MemberDescriptor) -> Error {
    Error::UnsupportedNesting {
        type_name: entry.name.clone(),
        field: member.name.clone(),
    }
}

fn undiscriminated(entry: &TypeEntry, member: &MemberDescriptor) -> Error {
    Error::UndiscriminatedUnion {
        type_name: entry.name.clone(),
        field: member.name.clone(),
    }
}
