use crate::model::{CveEntry, Definitions, Object, State, Test, VarRef, Variable};
use std::{collections::HashMap, fmt};
use tracing::instrument;

/// Gaps found while converting a document.
///
/// None of them is fatal, the affected entries only lack the information which could not be
/// resolved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// CVE entries processed
    pub cves: usize,
    /// CVEs dropped, as no criterion was found for them
    pub unpaired_cves: usize,
    pub dangling_tests: usize,
    pub dangling_objects: usize,
    pub dangling_states: usize,
    pub dangling_variables: usize,
}

impl Report {
    /// The total number of gaps.
    pub fn warnings(&self) -> usize {
        self.unpaired_cves
            + self.dangling_tests
            + self.dangling_objects
            + self.dangling_states
            + self.dangling_variables
    }

    /// Log a summary, as a warning if there are any gaps.
    pub fn log(&self) {
        match self.warnings() {
            0 => log::info!("Resolved {} CVE entries", self.cves),
            n => log::warn!("Resolved {} CVE entries, with {n} warnings: {self}", self.cves),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unpaired CVEs: {}, dangling tests: {}, objects: {}, states: {}, variables: {}",
            self.unpaired_cves,
            self.dangling_tests,
            self.dangling_objects,
            self.dangling_states,
            self.dangling_variables
        )
    }
}

/// Resolves the references of CVE entries, using the extracted sections.
///
/// All lookups go through the identifier keyed mappings, the document isn't searched again.
#[derive(Copy, Clone, Debug)]
pub struct Resolver<'a> {
    tests: &'a HashMap<String, Test>,
    objects: &'a HashMap<String, Object>,
    states: &'a HashMap<String, State>,
    variables: &'a HashMap<String, Variable>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        tests: &'a HashMap<String, Test>,
        objects: &'a HashMap<String, Object>,
        states: &'a HashMap<String, State>,
        variables: &'a HashMap<String, Variable>,
    ) -> Self {
        Self {
            tests,
            objects,
            states,
            variables,
        }
    }

    /// Resolve all CVE entries of all definitions.
    #[instrument(skip_all, fields(definitions = definitions.len()))]
    pub fn resolve(&self, definitions: &mut Definitions) -> Report {
        let mut report = Report::default();

        for definition in definitions.iter_mut() {
            for cve in &mut definition.cves {
                self.resolve_cve(cve, &mut report);
            }
        }

        report
    }

    /// Resolve a single CVE entry: test → object → variable, and test → state.
    ///
    /// A reference is only copied into the entry if it could be resolved. The only exception is
    /// an inline variable reference, which is a value on its own.
    pub fn resolve_cve(&self, cve: &mut CveEntry, report: &mut Report) {
        report.cves += 1;

        let Some(test) = self.tests.get(&cve.test_ref) else {
            log::debug!("{}: unknown test {}", cve.cve_id, cve.test_ref);
            report.dangling_tests += 1;
            return;
        };

        if let Some(state_ref) = &test.state_ref {
            match self.states.get(state_ref) {
                Some(state) => {
                    cve.state_ref = Some(state_ref.clone());
                    cve.fixed_version = state.fixed_version.clone();
                }
                None => {
                    log::debug!("{}: unknown state {state_ref}", cve.cve_id);
                    report.dangling_states += 1;
                }
            }
        }

        let Some(object) = self.objects.get(&test.object_ref) else {
            log::debug!("{}: unknown object {}", cve.cve_id, test.object_ref);
            report.dangling_objects += 1;
            return;
        };
        cve.object_ref = Some(test.object_ref.clone());

        let Some(var_ref) = &object.var_ref else {
            return;
        };

        match (self.variables.get(var_ref.as_str()), var_ref) {
            (Some(Variable::Binaries(binaries)), _) => {
                cve.var_ref = Some(var_ref.as_str().to_string());
                cve.binaries = Some(binaries.clone());
            }
            (Some(Variable::FixedVersion(version)), _) => {
                cve.var_ref = Some(var_ref.as_str().to_string());
                // the state's version takes precedence
                if cve.fixed_version.is_none() {
                    cve.fixed_version = version.clone();
                }
            }
            (None, VarRef::Reference(id)) => {
                log::debug!("{}: unknown variable {id}", cve.cve_id);
                report.dangling_variables += 1;
            }
            (None, VarRef::Inline(value)) => {
                cve.var_ref = Some(value.clone());
            }
        }
    }
}
