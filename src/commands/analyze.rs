//! The analyze command: resolve the target, collect per-file metrics,
//! aggregate, and emit the report.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::analysis_utils;
use crate::analyzers::RAnalyzer;
use crate::config;
use crate::core::SingleFileReport;
use crate::errors::RqualError;
use crate::io::output::{create_writer, OutputFormat};
use crate::io::repo;
use crate::io::walker;

pub struct AnalyzeConfig {
    pub target: String,
    pub single_file: bool,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub keep_clone: bool,
    pub jobs: usize,
    pub no_parallel: bool,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    if config.single_file {
        return analyze_single_file(&config);
    }
    analyze_repository(config)
}

fn analyze_single_file(config: &AnalyzeConfig) -> Result<()> {
    let path = Path::new(&config.target);
    if !path.exists() {
        return Err(RqualError::TargetNotFound(path.to_path_buf()).into());
    }
    if !path.is_file() {
        return Err(RqualError::NotAFile(path.to_path_buf()).into());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not analyze file {}", path.display()))?;
    let metrics = RAnalyzer::new().analyze(path, &text);
    let report = SingleFileReport::new(metrics);

    let mut writer = create_writer(config.format, config.output.clone())?;
    writer.write_single_file(&report)
}

fn analyze_repository(config: AnalyzeConfig) -> Result<()> {
    let mut repo = repo::acquire(&config.target)?;
    let analysis_config = config::load(&repo.root);
    let files = walker::find_r_files(&repo.root, &analysis_config)?;
    log::info!(
        "{}: analyzing {} R files in {}",
        repo.name,
        files.len(),
        repo.root.display()
    );

    let metrics = if config.no_parallel {
        analysis_utils::collect_file_metrics_serial(&files)
    } else {
        let workers = if config.jobs == 0 {
            num_cpus::get()
        } else {
            config.jobs
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;
        pool.install(|| analysis_utils::collect_file_metrics(&files))
    };

    let report = analysis_utils::aggregate(
        repo.identifier(),
        Some(repo.root.clone()),
        metrics,
        &analysis_config,
    );

    let mut writer = create_writer(config.format, config.output.clone())?;
    writer.write_repository(&report)?;

    if config.keep_clone {
        if let Some(path) = repo.keep() {
            log::info!("keeping clone at {}", path.display());
        }
    }
    Ok(())
}
