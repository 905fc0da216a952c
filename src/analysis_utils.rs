//! Parallel per-file collection and the repository-level reduction.
//! Each worker owns its file and produces an immutable record; the fold is
//! single-threaded and order-independent, with the user-visible sequence
//! re-sorted by path so completion order never shows through.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::analyzers;
use crate::config::AnalysisConfig;
use crate::core::{metrics, FileMetrics, Paradigm, RepositoryMetrics};

pub fn collect_file_metrics(files: &[PathBuf]) -> Vec<FileMetrics> {
    let mut collected: Vec<FileMetrics> = files
        .par_iter()
        .filter_map(|path| analyzers::analyze_file(path))
        .collect();
    collected.sort_by(|a, b| a.path.cmp(&b.path));
    collected
}

pub fn collect_file_metrics_serial(files: &[PathBuf]) -> Vec<FileMetrics> {
    let mut collected: Vec<FileMetrics> = files
        .iter()
        .filter_map(|path| analyzers::analyze_file(path))
        .collect();
    collected.sort_by(|a, b| a.path.cmp(&b.path));
    collected
}

/// Reduce per-file records into repository totals and averages. Files with
/// nothing to contribute still count toward `total_files`/`total_loc` but
/// stay out of the average denominators.
pub fn aggregate(
    repo: String,
    local_path: Option<PathBuf>,
    files: Vec<FileMetrics>,
    config: &AnalysisConfig,
) -> RepositoryMetrics {
    let total_files = files.len();
    let total_loc = files.iter().map(|f| f.loc).sum();
    let total_nom = files.iter().map(|f| f.nom).sum();
    let total_cbo = files.iter().map(|f| f.cbo).sum();
    let total_classes = files.iter().map(|f| f.num_classes).sum();

    let with_functions: Vec<&FileMetrics> = files.iter().filter(|f| f.nom > 0).collect();
    let with_units: Vec<&FileMetrics> = files
        .iter()
        .filter(|f| f.nom > 0 || f.num_classes > 0)
        .collect();

    let avg_cc = metrics::round2(metrics::mean_over(
        with_functions.iter().map(|f| f.cc_avg).sum(),
        with_functions.len(),
    ));
    let avg_mpc = metrics::round2(metrics::mean_over(
        with_units.iter().map(|f| f.mpc).sum(),
        with_units.len(),
    ));
    let avg_lcom = metrics::round2(metrics::mean_over(
        with_units.iter().map(|f| f.lcom as f64).sum(),
        with_units.len(),
    ));

    let mut paradigm_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for file in &files {
        *paradigm_distribution
            .entry(file.paradigm.as_str().to_string())
            .or_insert(0) += 1;
    }

    let paradigm = overall_paradigm(&paradigm_distribution, &config.paradigm_precedence);

    RepositoryMetrics {
        repo,
        local_path,
        total_files,
        total_loc,
        total_nom,
        avg_cc,
        avg_mpc,
        total_cbo,
        avg_lcom,
        paradigm,
        paradigm_distribution,
        total_classes,
        files,
    }
}

/// Majority label of the distribution; ties resolved by the configured
/// precedence order.
fn overall_paradigm(distribution: &BTreeMap<String, usize>, precedence: &[String]) -> Paradigm {
    let max = distribution.values().copied().max().unwrap_or(0);
    if max == 0 {
        return Paradigm::Functional;
    }
    for label in precedence {
        if distribution.get(label) == Some(&max) {
            return parse_paradigm(label);
        }
    }
    distribution
        .iter()
        .find(|(_, &count)| count == max)
        .map(|(label, _)| parse_paradigm(label))
        .unwrap_or(Paradigm::Functional)
}

fn parse_paradigm(label: &str) -> Paradigm {
    match label {
        "oop" => Paradigm::Oop,
        "mixed" => Paradigm::Mixed,
        _ => Paradigm::Functional,
    }
}
