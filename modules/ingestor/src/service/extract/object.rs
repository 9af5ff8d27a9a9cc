use super::Section;
use crate::{
    model::{Object, VarRef},
    service::{Error, xml},
};
use ovaljson_common::config::Namespaces;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use tracing::instrument;

/// Extract all objects, keyed by their id.
#[instrument(skip_all, err(level=tracing::Level::INFO))]
pub fn extract(document: &Document, ns: &Namespaces) -> Result<HashMap<String, Object>, Error> {
    let section = xml::section(document, ns, Section::Objects)?;
    Ok(xml::index(section, Section::Objects, |node| Some(object(node))))
}

/// Read the variable reference of an object.
///
/// Depending on the vendor, the object's child either references a variable through a
/// `var_ref` attribute (`<name var_ref="oval:…:var:1"/>`), or carries the value inline as its
/// text (`<name>openssl</name>`). In the latter case, the text is used as reference.
fn object(node: Node) -> Object {
    let var_ref = xml::elements(node)
        .find_map(|child| child.attribute("var_ref"))
        .map(|id| VarRef::Reference(id.to_string()))
        .or_else(|| {
            xml::elements(node)
                .find_map(xml::text)
                .map(|text| VarRef::Inline(text.to_string()))
        });

    Object { var_ref }
}
