//! Extraction of the top level sections of an OVAL document.
//!
//! Each extractor scans a single section and builds a mapping keyed by the identifier of the
//! section's entries. The extractors don't depend on each other and run concurrently over the
//! same, read-only document.

pub mod definition;
pub mod object;
pub mod state;
pub mod test;
pub mod variable;

use super::Error;
use crate::model::{Definitions, Object, State, Test, Variable};
use ovaljson_common::config::Namespaces;
use roxmltree::Document;
use std::collections::HashMap;
use tracing::instrument;

/// A top level section of an OVAL definitions document.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    Definitions,
    Tests,
    Objects,
    States,
    Variables,
}

impl Section {
    /// The local name of the section's element.
    pub fn element(self) -> &'static str {
        self.into()
    }

    /// Check if a document without this section is invalid.
    ///
    /// Documents which don't make use of variables (like the Red Hat ones) don't carry the
    /// section at all.
    pub fn is_required(self) -> bool {
        !matches!(self, Self::Variables)
    }
}

/// The extracted content of all sections.
#[derive(Debug, Default)]
pub struct Sections {
    pub definitions: Definitions,
    /// Number of CVEs which could not be paired with a criterion.
    pub unpaired_cves: usize,
    pub tests: HashMap<String, Test>,
    pub objects: HashMap<String, Object>,
    pub states: HashMap<String, State>,
    pub variables: HashMap<String, Variable>,
}

/// Run all extractors.
///
/// Fails if any of the extractors fails. If more than one fails, the first error in section
/// order is reported.
#[instrument(skip_all, err(level=tracing::Level::INFO))]
pub fn extract(document: &Document, ns: &Namespaces) -> Result<Sections, Error> {
    let ((definitions, tests), (objects, (states, variables))) = rayon::join(
        || {
            rayon::join(
                || definition::extract(document, ns),
                || test::extract(document, ns),
            )
        },
        || {
            rayon::join(
                || object::extract(document, ns),
                || {
                    rayon::join(
                        || state::extract(document, ns),
                        || variable::extract(document, ns),
                    )
                },
            )
        },
    );

    let definition::Extracted {
        definitions,
        unpaired_cves,
    } = definitions?;

    let sections = Sections {
        definitions,
        unpaired_cves,
        tests: tests?,
        objects: objects?,
        states: states?,
        variables: variables?,
    };

    tracing::info!(
        definitions = sections.definitions.len(),
        tests = sections.tests.len(),
        objects = sections.objects.len(),
        states = sections.states.len(),
        variables = sections.variables.len(),
        "Extracted sections"
    );

    Ok(sections)
}

/// Lookup a section, tolerating the absence of optional ones.
fn optional_section<'a, 'input>(
    document: &'a Document<'input>,
    ns: &Namespaces,
    section: Section,
) -> Result<Option<roxmltree::Node<'a, 'input>>, Error> {
    match super::xml::section(document, ns, section) {
        Ok(node) => Ok(Some(node)),
        Err(Error::MissingSection(section)) if !section.is_required() => {
            log::debug!("Document has no {section} section");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Section::Definitions, "definitions", true)]
    #[case(Section::Tests, "tests", true)]
    #[case(Section::Objects, "objects", true)]
    #[case(Section::States, "states", true)]
    #[case(Section::Variables, "variables", false)]
    fn section_names(#[case] section: Section, #[case] name: &str, #[case] required: bool) {
        assert_eq!(section.element(), name);
        assert_eq!(section.to_string(), name);
        assert_eq!(section.is_required(), required);
    }
}
