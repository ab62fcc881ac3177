//! Work-list discovery of the type graph.

use std::collections::VecDeque;

use chppgen_core::{Annotation, AnnotationIndex, RawField, Resolver};
use tracing::debug;

use super::{MemberDescriptor, TypeEntry, TypeGraph, TypeId, check_acyclic};
use crate::{Error, Result};

/// Discover every type reachable from `roots`, link it and compute the
/// variable-length flag.
///
/// Fails on the first unresolvable type, unannotated pointer, dangling
/// annotation reference or dependency cycle.
pub fn build<R>(resolver: &R, annotations: &AnnotationIndex, roots: &[String]) -> Result<TypeGraph>
where
    R: Resolver + ?Sized,
{
    let mut graph = TypeGraph::default();
    let mut pending: Vec<String> = roots.to_vec();

    while let Some(name) = pending.pop() {
        if graph.id(&name).is_some() {
            continue;
        }
        let raw = resolver
            .resolve(&name)
            .ok_or_else(|| Error::UnknownType(name.clone()))?;

        let mut members = Vec::with_capacity(raw.fields.len());
        for field in raw.fields {
            let member = describe(&name, field, annotations)?;
            if let Some(nested) = &member.nested
                && graph.id(nested).is_none()
            {
                pending.push(nested.clone());
            }
            members.push(member);
        }

        let var_len = members.iter().any(|m| m.var_len_array().is_some());
        debug!(type_name = %name, members = members.len(), var_len, "discovered type");
        graph.push(TypeEntry {
            name,
            kind: raw.kind,
            members,
            dependencies: Vec::new(),
            appears_in: Vec::new(),
            var_len,
        });
    }

    graph.roots = roots.iter().filter_map(|name| graph.id(name)).collect();
    link(&mut graph);
    check_acyclic(&graph)?;
    validate(&graph)?;
    propagate_var_len(&mut graph);
    Ok(graph)
}

fn describe(
    type_name: &str,
    field: RawField,
    annotations: &AnnotationIndex,
) -> Result<MemberDescriptor> {
    let member = MemberDescriptor {
        nested: field.ty.aggregate_name().map(str::to_owned),
        annotations: annotations.lookup(type_name, &field.name).to_vec(),
        name: field.name,
        ty: field.ty,
    };

    // Pointers have no wire representation of their own.
    if member.ty.is_pointer() && member.rewrite_type().is_none() && member.var_len_array().is_none()
    {
        return Err(Error::UnannotatedPointer {
            type_name: type_name.to_owned(),
            field: member.name,
        });
    }
    Ok(member)
}

/// Fill in dependency and appears-in edges, both sorted by type name.
fn link(graph: &mut TypeGraph) {
    let mut appears_in: Vec<Vec<TypeId>> = vec![Vec::new(); graph.len()];

    for index in 0..graph.len() {
        let id = TypeId(index as u32);
        let mut deps: Vec<TypeId> = graph
            .get(id)
            .members
            .iter()
            .filter_map(|m| m.nested.as_deref())
            .filter_map(|name| graph.id(name))
            .collect();
        deps.sort_by(|a, b| graph.get(*a).name.cmp(&graph.get(*b).name));
        deps.dedup();

        for dep in &deps {
            appears_in[dep.index()].push(id);
        }
        graph.get_mut(id).dependencies = deps;
    }

    for (index, mut containers) in appears_in.into_iter().enumerate() {
        containers.sort_by(|a, b| graph.get(*a).name.cmp(&graph.get(*b).name));
        graph.get_mut(TypeId(index as u32)).appears_in = containers;
    }
}

/// Check that annotation references point at existing members.
fn validate(graph: &TypeGraph) -> Result<()> {
    for (_, entry) in graph.iter() {
        for member in &entry.members {
            for annotation in &member.annotations {
                match annotation {
                    Annotation::VarLenArray { length_field } => {
                        if entry.member(length_field).is_none() {
                            return Err(Error::UnknownLengthField {
                                type_name: entry.name.clone(),
                                field: member.name.clone(),
                                length_field: length_field.clone(),
                            });
                        }
                    }
                    Annotation::UnionVariant {
                        discriminator,
                        mapping,
                    } => {
                        if entry.member(discriminator).is_none() {
                            return Err(Error::UnknownDiscriminator {
                                type_name: entry.name.clone(),
                                field: member.name.clone(),
                                discriminator: discriminator.clone(),
                            });
                        }
                        let union = graph
                            .nested(member)
                            .filter(|nested| nested.is_union())
                            .ok_or_else(|| Error::NotAUnion {
                                type_name: entry.name.clone(),
                                field: member.name.clone(),
                            })?;
                        if let Some((_, missing)) =
                            mapping.iter().find(|(_, target)| union.member(target).is_none())
                        {
                            return Err(Error::InvalidVariantMapping {
                                union_type: union.name.clone(),
                                member: missing.clone(),
                            });
                        }
                    }
                    Annotation::RenameType { .. }
                    | Annotation::RewriteType { .. }
                    | Annotation::FixedValue { .. }
                    | Annotation::Enum { .. } => {}
                }
            }
        }
    }
    Ok(())
}

/// Mark every container of a variable-length type as variable-length.
fn propagate_var_len(graph: &mut TypeGraph) {
    let mut queue: VecDeque<TypeId> = graph
        .iter()
        .filter(|(_, entry)| entry.var_len)
        .map(|(id, _)| id)
        .collect();

    while let Some(id) = queue.pop_front() {
        for container in graph.get(id).appears_in.clone() {
            if graph.get(container).var_len {
                continue;
            }
            debug!(
                type_name = %graph.get(container).name,
                via = %graph.get(id).name,
                "marked variable-length"
            );
            graph.get_mut(container).var_len = true;
            queue.push_back(container);
        }
    }
}
