//! Navigation helpers on top of [`roxmltree`], aware of the OVAL namespace table.

use super::{Error, extract::Section};
use ovaljson_common::config::Namespaces;
use roxmltree::{Document, Node};
use std::collections::{HashMap, hash_map::Entry};

/// Check if the node is an OVAL definitions element with the provided local name.
pub fn is_oval(node: &Node, ns: &Namespaces, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && ns.is_definitions(node.tag_name().namespace())
}

/// All element children of the node, in document order.
pub fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

/// The first OVAL element below the node (excluding itself) with the provided local name.
pub fn descendant<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &Namespaces,
    name: &str,
) -> Option<Node<'a, 'input>> {
    descendants(node, ns, name).next()
}

/// All OVAL elements below the node (excluding itself) with the provided local name.
pub fn descendants<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &Namespaces,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |n| is_oval(n, ns, name))
}

/// The trimmed text of an element, `None` if it has no (or only whitespace) text.
pub fn text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|s| !s.is_empty())
}

/// Lookup a top level section of the document.
pub fn section<'a, 'input>(
    document: &'a Document<'input>,
    ns: &Namespaces,
    section: Section,
) -> Result<Node<'a, 'input>, Error> {
    document
        .root_element()
        .descendants()
        .find(|n| is_oval(n, ns, section.element()))
        .ok_or(Error::MissingSection(section))
}

/// Build a mapping from identifier to record for all entries of a section.
///
/// Every element child of the section is an entry, identified by its `id` attribute. Entries
/// without an identifier, or for which `f` returns `None`, are skipped. For duplicate
/// identifiers, the first entry wins.
pub fn index<'a, 'input, T, F>(section: Node<'a, 'input>, kind: Section, f: F) -> HashMap<String, T>
where
    F: Fn(Node<'a, 'input>) -> Option<T>,
{
    let mut result = HashMap::new();

    for node in elements(section) {
        let Some(id) = node.attribute("id") else {
            log::warn!(
                "Skipping {kind} entry without id: {}",
                node.tag_name().name()
            );
            continue;
        };

        let Some(record) = f(node) else {
            log::warn!("Skipping incomplete {kind} entry: {id}");
            continue;
        };

        match result.entry(id.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(record);
            }
            Entry::Occupied(_) => {
                log::warn!("Ignoring duplicate {kind} entry: {id}");
            }
        }
    }

    result
}
