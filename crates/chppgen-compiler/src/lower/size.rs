//! Size functions.
//!
//! Only variable-length types get one; a fixed type's encoded size is the
//! `sizeof` of its generated declaration. A size function is generated once
//! per type, after the size functions it calls.

use std::collections::HashMap;

use chppgen_ir::{SizeFn, SizeTerm};
use tracing::debug;

use super::Lowering;
use crate::graph::{MemberDescriptor, TypeEntry, TypeId};
use crate::members::element_repr;
use crate::naming::FnKind;
use crate::order::post_order;
use crate::{Error, Result};

impl Lowering<'_> {
    pub(super) fn size_functions(&self) -> Result<Vec<SizeFn>> {
        let graph = self.graph;
        let mut terms: HashMap<TypeId, Vec<SizeTerm>> = HashMap::new();
        let mut pending: Vec<TypeId> = graph
            .roots()
            .iter()
            .copied()
            .filter(|id| graph.get(*id).var_len)
            .collect();

        while let Some(id) = pending.pop() {
            if terms.contains_key(&id) {
                continue;
            }
            let entry = graph.get(id);
            let mut entry_terms = Vec::new();
            for member in &entry.members {
                let Some(term) = self.size_term(entry, member)? else {
                    continue;
                };
                if let SizeTerm::Nested { source, .. } = &term
                    && let Some(callee) = graph.id(source)
                {
                    pending.push(callee);
                }
                entry_terms.push(term);
            }
            terms.insert(id, entry_terms);
        }

        post_order(graph, graph.roots().iter().copied())
            .into_iter()
            .filter_map(|id| terms.remove(&id).map(|terms| (id, terms)))
            .map(|(id, terms)| -> Result<SizeFn> {
                let entry = graph.get(id);
                debug!(type_name = %entry.name, terms = terms.len(), "size function");
                Ok(SizeFn {
                    source: entry.name.clone(),
                    target: self.namer.chpp_name(&entry.name)?,
                    function: self.namer.function_name(FnKind::SizeOf, &entry.name)?,
                    param: self.namer.size_param(&entry.name)?,
                    terms,
                })
            })
            .collect()
    }

    /// Runtime contribution of `member` beyond the static layout.
    fn size_term(&self, entry: &TypeEntry, member: &MemberDescriptor) -> Result<Option<SizeTerm>> {
        if member.rewrite_type().is_some() {
            return Ok(None);
        }
        let nested = self.graph.nested(member);
        let unsupported = || Error::UnsupportedNesting {
            type_name: entry.name.clone(),
            field: member.name.clone(),
        };

        if let Some(length_field) = member.var_len_array() {
            if nested.is_some_and(|n| n.var_len) {
                return Err(unsupported());
            }
            return Ok(Some(SizeTerm::VarLen {
                field: member.name.clone(),
                length_field: length_field.to_owned(),
                element: element_repr(&self.namer, member)?,
            }));
        }

        let Some(nested) = nested.filter(|n| n.var_len) else {
            return Ok(None);
        };
        if nested.is_union() || member.array_len().is_some() {
            return Err(unsupported());
        }
        Ok(Some(SizeTerm::Nested {
            field: member.name.clone(),
            source: nested.name.clone(),
            target: self.namer.chpp_name(&nested.name)?,
            function: self.namer.function_name(FnKind::SizeOf, &nested.name)?,
        }))
    }
}
