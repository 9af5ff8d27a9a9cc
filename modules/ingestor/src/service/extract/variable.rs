use super::{Section, optional_section};
use crate::{
    model::Variable,
    service::{Error, xml},
};
use ovaljson_common::config::Namespaces;
use regex::Regex;
use roxmltree::{Document, Node};
use std::{borrow::Cow, collections::HashMap, sync::LazyLock};
use tracing::instrument;

/// Datatype of variables listing package names.
const DATATYPE_STRING: &str = "string";

/// A value encoded as a regular expression, matching all architecture variants of a package:
/// `^libfoo\-dev(?:_.*)?$`.
#[allow(clippy::expect_used)]
static BINARY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\^(.+?)\(\?.*$").expect("binary pattern must compile"));

/// Extract all variables, keyed by their id.
///
/// Documents without a variables section result in an empty mapping.
#[instrument(skip_all, err(level=tracing::Level::INFO))]
pub fn extract(document: &Document, ns: &Namespaces) -> Result<HashMap<String, Variable>, Error> {
    let Some(section) = optional_section(document, ns, Section::Variables)? else {
        return Ok(HashMap::new());
    };

    Ok(xml::index(section, Section::Variables, |node| {
        Some(variable(node, ns))
    }))
}

fn variable(node: Node, ns: &Namespaces) -> Variable {
    let mut values = xml::elements(node)
        .filter(|child| xml::is_oval(child, ns, "value"))
        .filter_map(xml::text);

    match node.attribute("datatype") {
        Some(datatype) if datatype != DATATYPE_STRING => {
            Variable::FixedVersion(values.next().map(ToString::to_string))
        }
        _ => Variable::Binaries(
            values
                .map(|value| normalize_binary(value).into_owned())
                .collect(),
        ),
    }
}

/// Normalize a package name.
///
/// Values encoded as a regular expression (see [`BINARY_PATTERN`]) are reduced to the plain
/// name, with escape characters removed. Other values are returned as they are.
pub fn normalize_binary(value: &str) -> Cow<'_, str> {
    match BINARY_PATTERN.captures(value).and_then(|c| c.get(1)) {
        Some(name) => Cow::Owned(name.as_str().replace('\\', "")),
        None => Cow::Borrowed(value),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r"^libfoo\-dev(?:_.*)?$", "libfoo-dev")]
    #[case(r"^linux\-image\-5\.4\.0\-1\-generic(?:_.*)?$", "linux-image-5.4.0-1-generic")]
    #[case("libfoo-dev", "libfoo-dev")]
    #[case(r"libfoo\-dev", r"libfoo\-dev")]
    #[case("^libfoo$", "^libfoo$")]
    fn normalize(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(normalize_binary(value), expected);
    }

    #[rstest]
    #[case(r"^libfoo\-dev(?:_.*)?$")]
    #[case("openssl")]
    #[case("python3.8-minimal")]
    fn normalize_idempotent(#[case] value: &str) {
        let once = normalize_binary(value);
        let twice = normalize_binary(&once);
        assert_eq!(once, twice);
    }

    #[test_log::test]
    fn extract_variables() -> anyhow::Result<()> {
        let document = Document::parse(
            r#"<oval_definitions xmlns="http://oval.mitre.org/XMLSchema/oval-definitions-5">
              <variables>
                <constant_variable id="var1" version="1" datatype="string" comment="binaries">
                  <value>^libssl1\.1(?:_.*)?$</value>
                  <value>openssl</value>
                  <value/>
                </constant_variable>
                <constant_variable id="var2" version="1" datatype="debian_evr_string" comment="version">
                  <value>0:1.1.1f-1ubuntu2.1</value>
                  <value>0:1.1.1f-1ubuntu2.2</value>
                </constant_variable>
                <constant_variable id="var3" version="1" comment="no datatype">
                  <value>curl</value>
                </constant_variable>
              </variables>
            </oval_definitions>"#,
        )?;

        let variables = extract(&document, &Namespaces::default())?;

        assert_eq!(
            variables["var1"],
            Variable::Binaries(vec!["libssl1.1".into(), "openssl".into()])
        );
        assert_eq!(
            variables["var2"],
            Variable::FixedVersion(Some("0:1.1.1f-1ubuntu2.1".into()))
        );
        assert_eq!(variables["var3"], Variable::Binaries(vec!["curl".into()]));

        Ok(())
    }

    #[test_log::test]
    fn missing_section() -> anyhow::Result<()> {
        let document = Document::parse(
            r#"<oval_definitions xmlns="http://oval.mitre.org/XMLSchema/oval-definitions-5">
              <definitions/>
            </oval_definitions>"#,
        )?;

        assert!(extract(&document, &Namespaces::default())?.is_empty());

        Ok(())
    }
}
