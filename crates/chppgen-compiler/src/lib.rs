#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! CHPP serialization code generator.
//!
//! Turns annotated CHRE struct/union declarations into packed CHPP
//! declarations plus the C functions that encode CHRE values into them:
//! - `graph` - discovery of every reachable type, variable-length propagation
//! - `order` - dependency-first declaration order
//! - `naming` - generated type and function names
//! - `members` - generated member representations
//! - `lower` - size functions, encoders and entry points as a [`Program`]
//! - `emit` - C rendering of both documents

pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod members;
pub mod naming;
pub mod order;
pub mod request;

mod lower;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod lib_tests;

pub use config::Config;
pub use emit::{Artifact, Generated};
pub use error::{Error, Result};
pub use request::GenerationRequest;

use chppgen_core::{AnnotationIndex, Resolver};
use chppgen_ir::Program;
use tracing::{debug, instrument};

/// Entry point tying a declaration source and its annotations together.
pub struct Generator<'a, R: ?Sized> {
    resolver: &'a R,
    annotations: &'a AnnotationIndex,
    config: Config,
}

impl<'a, R: Resolver + ?Sized> Generator<'a, R> {
    pub fn new(resolver: &'a R, annotations: &'a AnnotationIndex) -> Self {
        Self {
            resolver,
            annotations,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the type graph for `request` and lower it into a [`Program`].
    #[instrument(skip_all, fields(service = %request.service))]
    pub fn compile(&self, request: &GenerationRequest) -> Result<Program> {
        let graph = graph::build(self.resolver, self.annotations, &request.roots)?;
        debug!(types = graph.len(), "type graph built");
        lower::lower(&graph, self.annotations, &self.config, request)
    }

    /// [`compile`](Self::compile), then render both documents.
    ///
    /// Nothing is rendered unless compilation succeeds.
    pub fn generate(&self, request: &GenerationRequest) -> Result<Generated> {
        let program = self.compile(request)?;
        Ok(emit::render(&program, &self.config))
    }
}
