//! Lowering of the type graph into a generation [`Program`].
//!
//! Each pass fills one section of the program:
//! - `decls` - packed declarations in dependency order
//! - `size` - size functions for variable-length types
//! - `encode` - per-struct encoders
//! - `entry` - public encode+allocate functions, one per root

mod decls;
mod encode;
mod entry;
mod size;


use chppgen_core::AnnotationIndex;
use chppgen_ir::Program;

use crate::graph::TypeGraph;
use crate::naming::Namer;
use crate::{Config, Error, GenerationRequest, Result};

/// State shared by the lowering passes of one run.
struct Lowering<'a> {
    graph: &'a TypeGraph,
    namer: Namer<'a>,
}

pub fn lower(
    graph: &TypeGraph,
    annotations: &AnnotationIndex,
    config: &Config,
    request: &GenerationRequest,
) -> Result<Program> {
    if let Some(union) = graph.roots().iter().map(|id| graph.get(*id)).find(|e| e.is_union()) {
        return Err(Error::UnionRoot(union.name.clone()));
    }

    let cx = Lowering {
        graph,
        namer: Namer::new(graph, annotations, config, &request.service),
    };

    Ok(Program {
        service: request.service.clone(),
        includes: request.includes.clone(),
        roots: request.roots.clone(),
        decls: cx.declarations()?,
        size_fns: cx.size_functions()?,
        encoders: cx.encoders()?,
        entry_points: cx.entry_points()?,
    })
}
