use super::Section;
use crate::{
    model::State,
    service::{Error, xml},
};
use ovaljson_common::config::Namespaces;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use tracing::instrument;

/// Children carrying the version to compare against, in order of preference.
const VERSION_ELEMENTS: &[&str] = &["evr", "version"];

/// Extract all states, keyed by their id.
#[instrument(skip_all, err(level=tracing::Level::INFO))]
pub fn extract(document: &Document, ns: &Namespaces) -> Result<HashMap<String, State>, Error> {
    let section = xml::section(document, ns, Section::States)?;
    Ok(xml::index(section, Section::States, |node| Some(state(node))))
}

fn state(node: Node) -> State {
    let fixed_version = VERSION_ELEMENTS
        .iter()
        .find_map(|name| {
            xml::elements(node)
                .find(|child| child.tag_name().name() == *name)
                .and_then(xml::text)
        })
        .or_else(|| xml::elements(node).find_map(xml::text));

    State {
        fixed_version: fixed_version.map(ToString::to_string),
    }
}
