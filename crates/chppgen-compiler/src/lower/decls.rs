use chppgen_ir::TypeDecl;

use super::Lowering;
use crate::Result;
use crate::members::member_decl;
use crate::order::declaration_order;

impl Lowering<'_> {
    pub(super) fn declarations(&self) -> Result<Vec<TypeDecl>> {
        declaration_order(self.graph)
            .into_iter()
            .map(|id| -> Result<TypeDecl> {
                let entry = self.graph.get(id);
                Ok(TypeDecl {
                    source: entry.name.clone(),
                    target: self.namer.chpp_name(&entry.name)?,
                    kind: entry.kind,
                    members: entry
                        .members
                        .iter()
                        .map(|m| member_decl(&self.namer, m))
                        .collect::<Result<_>>()?,
                })
            })
            .collect()
    }
}
