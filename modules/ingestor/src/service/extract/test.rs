use super::Section;
use crate::{
    model::Test,
    service::{Error, xml},
};
use ovaljson_common::config::Namespaces;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use tracing::instrument;

/// Extract all tests, keyed by their id.
#[instrument(skip_all, err(level=tracing::Level::INFO))]
pub fn extract(document: &Document, ns: &Namespaces) -> Result<HashMap<String, Test>, Error> {
    let section = xml::section(document, ns, Section::Tests)?;
    Ok(xml::index(section, Section::Tests, test))
}

/// Read the object and state references of a test.
///
/// A test references exactly one object. Only comparison tests reference a state, existence
/// tests don't.
fn test(node: Node) -> Option<Test> {
    let mut object_ref = None;
    let mut state_ref = None;

    for child in xml::elements(node) {
        object_ref = object_ref.or_else(|| child.attribute("object_ref"));
        state_ref = state_ref.or_else(|| child.attribute("state_ref"));
    }

    Some(Test {
        object_ref: object_ref?.to_string(),
        state_ref: state_ref.map(ToString::to_string),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn extract_tests() -> anyhow::Result<()> {
        let document = Document::parse(
            r#"<oval_definitions
                    xmlns="http://oval.mitre.org/XMLSchema/oval-definitions-5"
                    xmlns:linux-def="http://oval.mitre.org/XMLSchema/oval-definitions-5#linux">
              <tests>
                <linux-def:dpkginfo_test check="at least one" id="test1" version="1">
                  <linux-def:object object_ref="obj1"/>
                  <linux-def:state state_ref="state1"/>
                </linux-def:dpkginfo_test>
                <linux-def:dpkginfo_test check="all" check_existence="at_least_one_exists" id="test2" version="1">
                  <linux-def:object object_ref="obj2"/>
                </linux-def:dpkginfo_test>
                <linux-def:dpkginfo_test check="all" id="broken" version="1">
                  <linux-def:state state_ref="state1"/>
                </linux-def:dpkginfo_test>
              </tests>
            </oval_definitions>"#,
        )?;

        let tests = extract(&document, &Namespaces::default())?;

        assert_eq!(tests.len(), 2);
        assert_eq!(
            tests.get("test1"),
            Some(&Test {
                object_ref: "obj1".into(),
                state_ref: Some("state1".into()),
            })
        );
        assert_eq!(
            tests.get("test2"),
            Some(&Test {
                object_ref: "obj2".into(),
                state_ref: None,
            })
        );
        assert!(!tests.contains_key("broken"));

        Ok(())
    }
}
