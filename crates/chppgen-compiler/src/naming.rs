//! Generated type and function names.

use chppgen_core::{Annotation, AnnotationIndex};
use chppgen_core::utils::{lower_first, upper_first};
use chppgen_ir::RecordRef;

use crate::Config;
use crate::graph::TypeGraph;
use crate::{Error, Result};

/// Kinds of generated functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FnKind {
    /// Static encoder: `chppWwanConvertCellInfoFromChre`
    Convert,
    /// Static size function: `chppWwanSizeOfCellInfoFromChre`
    SizeOf,
    /// Public encode+allocate entry point: `chppWwanCellInfoFromChre`
    Allocate,
}

impl FnKind {
    fn infix(self) -> &'static str {
        match self {
            Self::Convert => "Convert",
            Self::SizeOf => "SizeOf",
            Self::Allocate => "",
        }
    }
}

pub struct Namer<'a> {
    graph: &'a TypeGraph,
    annotations: &'a AnnotationIndex,
    config: &'a Config,
    service: String,
}

impl<'a> Namer<'a> {
    pub fn new(
        graph: &'a TypeGraph,
        annotations: &'a AnnotationIndex,
        config: &'a Config,
        service: &str,
    ) -> Self {
        Self {
            graph,
            annotations,
            config,
            service: upper_first(service),
        }
    }

    /// Generated type, keyword included.
    ///
    /// A type-level `rename_type` wins; otherwise the API prefix is replaced
    /// by the generated type prefix (`chreWwanCellInfo` -> `struct ChppWwanCellInfo`).
    pub fn chpp_name(&self, source: &str) -> Result<String> {
        let entry = self
            .graph
            .by_name(source)
            .ok_or_else(|| Error::UnknownType(source.to_owned()))?;
        let keyword = entry.kind.keyword();

        let renamed = self.annotations.type_level(source).iter().find_map(|a| match a {
            Annotation::RenameType { type_override } => Some(type_override),
            _ => None,
        });
        if let Some(name) = renamed {
            return Ok(format!("{keyword} {name}"));
        }

        match source.strip_prefix(self.config.api_prefix.as_str()) {
            Some(rest) => Ok(format!("{keyword} {}{rest}", self.config.type_prefix)),
            None => Err(Error::NamingConvention {
                type_name: source.to_owned(),
                prefix: self.config.api_prefix.clone(),
            }),
        }
    }

    pub fn record_ref(&self, source: &str) -> Result<RecordRef> {
        let entry = self
            .graph
            .by_name(source)
            .ok_or_else(|| Error::UnknownType(source.to_owned()))?;
        Ok(RecordRef {
            source: source.to_owned(),
            target: self.chpp_name(source)?,
            kind: entry.kind,
        })
    }

    pub fn function_name(&self, kind: FnKind, source: &str) -> Result<String> {
        let core = self.core_name(source)?;
        Ok(format!(
            "{}{}{}{core}{}",
            self.config.function_prefix,
            self.service,
            kind.infix(),
            self.config.function_suffix()
        ))
    }

    /// Parameter name of a size function (`cellInfoResult`).
    pub fn size_param(&self, source: &str) -> Result<String> {
        Ok(lower_first(self.core_name(source)?))
    }

    /// Source name without the API prefix and the service name
    /// (`chreWwanCellInfoResult` -> `CellInfoResult`).
    pub fn core_name<'s>(&self, source: &'s str) -> Result<&'s str> {
        source
            .strip_prefix(self.config.api_prefix.as_str())
            .and_then(|rest| rest.strip_prefix(self.service.as_str()))
            .ok_or_else(|| Error::StructureNaming {
                type_name: source.to_owned(),
                prefix: self.config.api_prefix.clone(),
                service: self.service.clone(),
            })
    }
}
