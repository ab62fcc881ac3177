//! Generator configuration.

/// Naming and rendering settings shared by every generation run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Prefix of source API type names
    pub(crate) api_prefix: String,
    /// Prefix that replaces `api_prefix` in generated type names
    pub(crate) type_prefix: String,
    /// Prefix of generated function names
    pub(crate) function_prefix: String,
    /// Type spec of the offset+length descriptor
    pub(crate) offset_type: String,
    /// Emitted verbatim at the top of both documents
    pub(crate) license: Option<String>,
    /// Project includes every declarations document carries
    pub(crate) header_includes: Vec<String>,
    /// Named in the generated-file notice
    pub(crate) generator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_prefix: "chre".to_owned(),
            type_prefix: "Chpp".to_owned(),
            function_prefix: "chpp".to_owned(),
            offset_type: "struct ChppOffset".to_owned(),
            license: None,
            header_includes: vec![
                "chpp/macros.h".to_owned(),
                "chre_api/chre/version.h".to_owned(),
            ],
            generator: "chppgen".to_owned(),
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source API prefix (`chre`).
    pub fn api_prefix(mut self, value: impl Into<String>) -> Self {
        self.api_prefix = value.into();
        self
    }

    /// Set the generated type prefix (`Chpp`).
    pub fn type_prefix(mut self, value: impl Into<String>) -> Self {
        self.type_prefix = value.into();
        self
    }

    /// Set the generated function prefix (`chpp`).
    pub fn function_prefix(mut self, value: impl Into<String>) -> Self {
        self.function_prefix = value.into();
        self
    }

    /// Set the descriptor type used for variable-length members.
    pub fn offset_type(mut self, value: impl Into<String>) -> Self {
        self.offset_type = value.into();
        self
    }

    /// Set the license header.
    pub fn license(mut self, value: impl Into<String>) -> Self {
        self.license = Some(value.into());
        self
    }

    /// Replace the default project includes.
    pub fn header_includes<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_includes = includes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the generator name shown in the notice.
    pub fn generator(mut self, value: impl Into<String>) -> Self {
        self.generator = value.into();
        self
    }

    /// Suffix of generated function names: `From` + capitalized API prefix.
    pub(crate) fn function_suffix(&self) -> String {
        format!("From{}", chppgen_core::utils::upper_first(&self.api_prefix))
    }
}
