/// Namespace of the core OVAL definitions schema.
pub const OVAL_DEFINITIONS_5: &str = "http://oval.mitre.org/XMLSchema/oval-definitions-5";
/// Namespace of the shared OVAL types (`oval-common-5`).
pub const OVAL_COMMON_5: &str = "http://oval.mitre.org/XMLSchema/oval-common-5";

/// Local name of the root element of an OVAL definitions document.
const ROOT_ELEMENT: &str = "oval_definitions";

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
#[command(next_help_heading = "OVAL")]
pub struct OvalConfig {
    /// Namespace URI of the OVAL definitions elements.
    ///
    /// If absent, the namespace of the document's root element is used, falling back to the
    /// `oval-definitions-5` namespace. An empty value matches elements by their local name only.
    #[arg(id = "oval-namespace", long = "oval-namespace", env = "OVAL_NAMESPACE")]
    pub namespace: Option<String>,
}

impl OvalConfig {
    /// Evaluate the namespace table for a document.
    ///
    /// `root` is the expanded name of the document's root element, as `(namespace, local name)`.
    pub fn namespaces(&self, root: (Option<&str>, &str)) -> Namespaces {
        match self.namespace.as_deref() {
            Some("") => Namespaces::any(),
            Some(uri) => Namespaces::new(uri),
            None => match root {
                (Some(uri), ROOT_ELEMENT) => Namespaces::new(uri),
                _ => Namespaces::default(),
            },
        }
    }
}

/// The namespace table used to look up OVAL elements.
///
/// Passed explicitly into every extraction step, so that extractors can be run against
/// fragments using a different (or no) namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    definitions: Option<String>,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new(OVAL_DEFINITIONS_5)
    }
}

impl Namespaces {
    pub fn new(definitions: impl Into<String>) -> Self {
        Self {
            definitions: Some(definitions.into()),
        }
    }

    /// A table which ignores namespaces altogether.
    pub fn any() -> Self {
        Self { definitions: None }
    }

    pub fn definitions(&self) -> Option<&str> {
        self.definitions.as_deref()
    }

    /// Check if an element namespace belongs to the OVAL definitions schema.
    pub fn is_definitions(&self, namespace: Option<&str>) -> bool {
        match &self.definitions {
            Some(expected) => namespace == Some(expected.as_str()),
            None => true,
        }
    }
}
