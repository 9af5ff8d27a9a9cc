use super::Section;
use crate::{
    model::{CveEntry, Definition, Definitions, Reference},
    service::{Error, xml},
};
use ovaljson_common::config::Namespaces;
use roxmltree::{Document, Node};
use tracing::instrument;

/// Class of definitions describing a patch (Red Hat, Ubuntu, SUSE, …).
pub const CLASS_PATCH: &str = "patch";
/// Class of definitions describing a vulnerability (Debian, …).
pub const CLASS_VULNERABILITY: &str = "vulnerability";

/// The outcome of extracting the definitions section.
#[derive(Debug, Default)]
pub struct Extracted {
    pub definitions: Definitions,
    pub unpaired_cves: usize,
}

/// A `<criterion>` of a definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Criterion<'a> {
    pub test_ref: &'a str,
    pub comment: &'a str,
}

/// Extract all definitions.
///
/// Definitions of class `patch` are used. Only if there are none, definitions of class
/// `vulnerability` are used instead. Both are never mixed.
#[instrument(skip_all, err(level=tracing::Level::INFO))]
pub fn extract(document: &Document, ns: &Namespaces) -> Result<Extracted, Error> {
    let section = xml::section(document, ns, Section::Definitions)?;

    let mut nodes = with_class(section, CLASS_PATCH);
    if nodes.is_empty() {
        log::debug!("No '{CLASS_PATCH}' definitions, falling back to '{CLASS_VULNERABILITY}'");
        nodes = with_class(section, CLASS_VULNERABILITY);
    }

    let mut result = Extracted::default();

    for node in nodes {
        let Some((definition, unpaired)) = definition(node, ns) else {
            continue;
        };

        let id = definition.id.clone();
        if !result.definitions.insert(definition) {
            log::warn!("Ignoring duplicate definition: {id}");
            continue;
        }

        if unpaired > 0 {
            log::debug!("{unpaired} CVE(s) of {id} not paired with a criterion");
        }
        result.unpaired_cves += unpaired;
    }

    Ok(result)
}

/// All elements with the provided `class` attribute, in document order.
fn with_class<'a, 'input>(section: Node<'a, 'input>, class: &str) -> Vec<Node<'a, 'input>> {
    section
        .descendants()
        .filter(|n| n.is_element() && n.attribute("class") == Some(class))
        .collect()
}

/// Extract a single definition, returning it together with the number of unpaired CVEs.
fn definition(node: Node, ns: &Namespaces) -> Option<(Definition, usize)> {
    let Some(id) = node.attribute("id") else {
        log::warn!("Skipping definition without id");
        return None;
    };

    let text = |name: &str| xml::descendant(node, ns, name).and_then(xml::text);

    let issued = xml::descendant(node, ns, "issued")
        .and_then(|issued| issued.attribute("date").or_else(|| xml::text(issued)));

    let references = xml::descendants(node, ns, "reference")
        .map(|reference| {
            Reference(
                reference
                    .attributes()
                    .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                    .collect(),
            )
        })
        .collect();

    let cves = xml::descendants(node, ns, "cve")
        .filter_map(|cve| {
            let entry = cve_entry(cve);
            if entry.is_none() {
                log::debug!("Skipping CVE without id in {id}");
            }
            entry
        })
        .collect::<Vec<_>>();

    let criteria = xml::descendants(node, ns, "criterion")
        .filter(|criterion| {
            criterion
                .parent_element()
                .is_some_and(|parent| xml::is_oval(&parent, ns, "criteria"))
        })
        .filter_map(|criterion| {
            let Some(test_ref) = criterion.attribute("test_ref") else {
                log::warn!("Skipping criterion without test_ref in {id}");
                return None;
            };
            Some(Criterion {
                test_ref,
                comment: criterion.attribute("comment").unwrap_or_default(),
            })
        })
        .collect::<Vec<_>>();

    let total = cves.len();
    let cves = pair(cves, criteria);
    let unpaired = total - cves.len();

    Some((
        Definition {
            id: id.to_string(),
            title: text("title").unwrap_or_default().to_string(),
            description: text("description").map(ToString::to_string),
            severity: text("severity").map(ToString::to_string),
            issued: issued.map(ToString::to_string),
            references,
            cves,
        },
        unpaired,
    ))
}

/// Create a CVE entry from a `<cve>` element. The test reference is left empty.
fn cve_entry(node: Node) -> Option<CveEntry> {
    let cve_id = xml::text(node)?;

    let attr = |name: &str| node.attribute(name).map(ToString::to_string);

    let (cvss_score, cvss_vector) = match (attr("cvss_score"), attr("cvss_vector")) {
        (None, None) => node
            .attribute("cvss3")
            .or_else(|| node.attribute("cvss2"))
            .map(split_cvss)
            .unwrap_or_default(),
        scores => scores,
    };

    Some(CveEntry {
        cve_id: cve_id.to_string(),
        public_date: attr("public"),
        severity: attr("severity")
            .or_else(|| attr("priority"))
            .or_else(|| attr("impact")),
        cvss_score,
        cvss_vector,
        ..Default::default()
    })
}

/// Split a combined `<score>/<vector>` value.
fn split_cvss(value: &str) -> (Option<String>, Option<String>) {
    match value.split_once('/') {
        Some((score, vector)) => (Some(score.to_string()), Some(vector.to_string())),
        None => (Some(value.to_string()), None),
    }
}

/// Pair CVEs with the criteria testing for them.
///
/// Both lists are walked in document order. A criterion is paired with the current CVE if its
/// comment contains the CVE's id, which then advances to the next CVE. Otherwise the criterion
/// is skipped and the CVE stays current. CVEs left over once the criteria are exhausted are
/// dropped.
///
/// As containment is checked on the plain text, a CVE id which is a prefix of another one
/// (`CVE-2020-1` and `CVE-2020-12`) matches the comment of the other one as well.
pub fn pair<'a>(
    cves: impl IntoIterator<Item = CveEntry>,
    criteria: impl IntoIterator<Item = Criterion<'a>>,
) -> Vec<CveEntry> {
    let mut cves = cves.into_iter().peekable();
    let mut result = Vec::new();

    for criterion in criteria {
        if cves.peek().is_none() {
            break;
        }

        if let Some(mut cve) = cves.next_if(|cve| criterion.comment.contains(&cve.cve_id)) {
            cve.test_ref = criterion.test_ref.to_string();
            result.push(cve);
        }
    }

    result
}
