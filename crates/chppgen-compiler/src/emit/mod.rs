//! C rendering of a compiled [`Program`].
//!
//! Two documents per service: `<service>_types.h` with the packed declarations
//! and entry-point prototypes, and `<service>_convert.c` with size functions,
//! encoders and entry points.

mod conversion;
mod header;

#[cfg(test)]
mod emit_tests;

pub use conversion::render_conversion;
pub use header::render_header;

use chppgen_core::Aggregate;
use chppgen_ir::{EntryPoint, Program};

use crate::Config;

/// One generated document as an ordered list of text fragments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    name: String,
    fragments: Vec<String>,
}

impl Artifact {
    fn new(name: String) -> Self {
        Self {
            name,
            fragments: Vec::new(),
        }
    }

    fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    /// File name (`wwan_types.h`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Document text.
    pub fn text(&self) -> String {
        self.fragments.concat()
    }
}

/// Both documents of one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generated {
    pub header: Artifact,
    pub conversion: Artifact,
}

pub fn render(program: &Program, config: &Config) -> Generated {
    Generated {
        header: render_header(program, config),
        conversion: render_conversion(program, config),
    }
}

fn license(config: &Config) -> Option<String> {
    let text = config.license.as_deref()?;
    let mut out = text.to_owned();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Some(out)
}

fn notice(config: &Config) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "// This file was automatically generated by {}\n",
        config.generator
    ));
    out.push_str("// DO NOT modify this file directly, as those changes will be lost the next\n");
    out.push_str("// time the generator is executed\n\n");
    out
}

/// Source type as spelled in parameter lists. Only structs are encoded.
fn source_type(source: &str) -> String {
    format!("{} {source}", Aggregate::Struct.keyword())
}

fn entry_signature(entry: &EntryPoint) -> String {
    let mut out = String::new();
    out.push_str(&format!("bool {}(\n", entry.function));
    out.push_str(&format!("    const {} *in,\n", source_type(&entry.source)));
    out.push_str(&format!("    {} **out,\n", entry.target));
    out.push_str("    size_t *outSize)");
    out
}
