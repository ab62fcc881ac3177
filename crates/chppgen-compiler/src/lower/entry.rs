use chppgen_ir::{EntryPoint, SizeCall};

use super::Lowering;
use crate::Result;
use crate::naming::FnKind;

impl Lowering<'_> {
    /// One entry point per root, in request order.
    pub(super) fn entry_points(&self) -> Result<Vec<EntryPoint>> {
        self.graph
            .roots()
            .iter()
            .map(|id| -> Result<EntryPoint> {
                let entry = self.graph.get(*id);
                let size = if entry.var_len {
                    SizeCall::Dynamic(self.namer.function_name(FnKind::SizeOf, &entry.name)?)
                } else {
                    SizeCall::Static
                };
                Ok(EntryPoint {
                    source: entry.name.clone(),
                    target: self.namer.chpp_name(&entry.name)?,
                    function: self.namer.function_name(FnKind::Allocate, &entry.name)?,
                    encoder: self.namer.function_name(FnKind::Convert, &entry.name)?,
                    size,
                    var_len: entry.var_len,
                })
            })
            .collect()
    }
}
