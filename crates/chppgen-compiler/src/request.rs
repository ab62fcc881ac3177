//! Generation request.

/// One service's worth of root types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub(crate) service: String,
    pub(crate) roots: Vec<String>,
    pub(crate) includes: Vec<String>,
}

impl GenerationRequest {
    /// Request for `service` (`wwan`), which names the documents and every
    /// generated function.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Self::default()
        }
    }

    /// Add a root type. Repeated roots are ignored.
    pub fn root(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.roots.contains(&name) {
            self.roots.push(name);
        }
        self
    }

    pub fn roots<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |req, name| req.root(name))
    }

    /// Add an include to the declarations document.
    pub fn include(mut self, path: impl Into<String>) -> Self {
        self.includes.push(path.into());
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn root_names(&self) -> &[String] {
        &self.roots
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }
}
