pub mod cohesion;
pub mod complexity;
pub mod extract;
pub mod normalize;
pub mod paradigm;
pub mod patterns;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::core::{metrics, FileMetrics};

/// Composes normalization, extraction and scoring into one per-file record.
/// Total: malformed source degrades to best-effort values, never an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct RAnalyzer;

impl RAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, path: &Path, text: &str) -> FileMetrics {
        let normalized = normalize::normalize(text);
        let inventory = extract::extract(&normalized.stripped);

        let complexities = complexity::score_functions(&inventory.functions);
        let cc_avg = metrics::round2(metrics::average_complexity(&complexities));
        let cc_max = metrics::max_complexity(&complexities);

        // Distinct names: a re-registered definition does not inflate NOM,
        // though every body still appears in the complexity detail.
        let nom = inventory
            .functions
            .iter()
            .map(|f| f.name.as_str())
            .collect::<HashSet<_>>()
            .len();

        let classes: BTreeMap<String, usize> = inventory
            .classes
            .iter()
            .map(|c| (c.name.clone(), c.methods.len()))
            .collect();

        FileMetrics {
            path: path.to_path_buf(),
            loc: normalized.loc,
            nom,
            cc_avg,
            cc_max,
            mpc: metrics::round2(cohesion::mpc(&inventory, nom)),
            cbo: cohesion::cbo(&inventory.namespace_refs),
            lcom: cohesion::lcom(&inventory),
            paradigm: paradigm::classify(&inventory),
            num_classes: classes.len(),
            classes,
            complexities,
        }
    }
}

/// Read and analyze one file. An unreadable file is a per-unit skip, not a
/// repository failure.
pub fn analyze_file(path: &Path) -> Option<FileMetrics> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(RAnalyzer::new().analyze(path, &text)),
        Err(e) => {
            log::warn!("skipping unreadable file {}: {}", path.display(), e);
            None
        }
    }
}
