pub mod extract;
pub mod resolve;

mod xml;

use crate::model::Definitions;
use extract::{Section, Sections};
use ovaljson_common::config::OvalConfig;
use resolve::{Report, Resolver};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse OVAL document: {0}")]
    Parse(#[from] roxmltree::Error),
    #[error("failed to parse OVAL document: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("failed to extract {0}: section not found")]
    MissingSection(Section),
}

impl Error {
    /// The stage of the conversion which failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Parse(_) | Self::Encoding(_) => "parse",
            Self::MissingSection(_) => "extraction",
        }
    }
}

/// The outcome of converting a document.
#[derive(Debug)]
pub struct Conversion {
    pub definitions: Definitions,
    pub report: Report,
}

/// Convert an OVAL document into resolved definitions.
///
/// Parses the document, runs all section extractors, and resolves the references between
/// the sections.
#[instrument(skip_all, fields(len = data.len()), err(level=tracing::Level::INFO))]
pub fn convert(data: &[u8], config: &OvalConfig) -> Result<Conversion, Error> {
    let text = std::str::from_utf8(data)?;
    let document = roxmltree::Document::parse(text)?;

    let root = document.root_element().tag_name();
    let namespaces = config.namespaces((root.namespace(), root.name()));
    log::debug!("Using namespaces: {namespaces:?}");

    let Sections {
        mut definitions,
        unpaired_cves,
        tests,
        objects,
        states,
        variables,
    } = extract::extract(&document, &namespaces)?;

    let report = Report {
        unpaired_cves,
        ..Resolver::new(&tests, &objects, &states, &variables).resolve(&mut definitions)
    };

    Ok(Conversion {
        definitions,
        report,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn malformed() {
        let result = convert(b"<oval_definitions><definitions>", &OvalConfig::default());
        let err = result.expect_err("must fail");
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(err.stage(), "parse");
    }

    #[test]
    fn invalid_encoding() {
        let err = convert(b"<oval_definitions>\xff</oval_definitions>", &OvalConfig::default())
            .expect_err("must fail");
        assert!(matches!(err, Error::Encoding(_)));
        assert_eq!(err.stage(), "parse");
    }

    #[test]
    fn missing_section() {
        let result = convert(
            br#"<oval_definitions xmlns="http://oval.mitre.org/XMLSchema/oval-definitions-5">
                <definitions/>
                <objects/>
                <states/>
            </oval_definitions>"#,
            &OvalConfig::default(),
        );
        let err = result.expect_err("must fail");
        assert!(matches!(err, Error::MissingSection(Section::Tests)));
        assert_eq!(err.stage(), "extraction");
    }
}
