use serde::{Serialize, Serializer};
use std::collections::{HashMap, hash_map::Entry};

/// A resolved OVAL definition, one advisory.
///
/// The identifier is not part of the serialized record, it is the key under which the record
/// is emitted (see [`Definitions`]).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Definition {
    #[serde(skip)]
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
    #[serde(rename = "reference")]
    pub references: Vec<Reference>,
    pub cves: Vec<CveEntry>,
}

/// The attributes of a `<reference>` element, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reference(pub Vec<(String, String)>);

impl Reference {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// A CVE of a definition, paired with the criterion testing for it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CveEntry {
    pub cve_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss_vector: Option<String>,
    pub test_ref: String,

    // resolved from the referenced test

    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binaries: Option<Vec<String>>,
}

/// A `<test>`, referencing the object to collect and, for comparison tests, the expected state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Test {
    pub object_ref: String,
    pub state_ref: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Object {
    pub var_ref: Option<VarRef>,
}

/// How an object refers to its variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarRef {
    /// Through a `var_ref` attribute, holding the id of a variable.
    Reference(String),
    /// Through the text of the object's child, which may be a plain value instead of an id.
    Inline(String),
}

impl VarRef {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Reference(value) | Self::Inline(value) => value,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    pub fixed_version: Option<String>,
}

/// The content of a `<variables>` entry.
///
/// A variable either lists package names, or carries a single version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Variable {
    Binaries(Vec<String>),
    FixedVersion(Option<String>),
}

/// Definitions, keyed by their identifier, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Definitions {
    entries: Vec<Definition>,
    index: HashMap<String, usize>,
}

impl Definitions {
    /// Add a definition.
    ///
    /// Returns `false` if a definition with the same identifier already exists. In that case the
    /// existing entry is kept.
    pub fn insert(&mut self, definition: Definition) -> bool {
        match self.index.entry(definition.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(self.entries.len());
                self.entries.push(definition);
                true
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Definition> {
        self.index.get(id).map(|idx| &self.entries[*idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.entries.iter()
    }

    /// Mutable access to the records. Identifiers must not be changed.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Definition> {
        self.entries.iter_mut()
    }
}

impl Serialize for Definitions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|d| (&d.id, d)))
    }
}
