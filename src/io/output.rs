use crate::core::{RepositoryMetrics, SingleFileReport};
use colored::*;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_repository(&mut self, report: &RepositoryMetrics) -> anyhow::Result<()>;
    fn write_single_file(&mut self, report: &SingleFileReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_repository(&mut self, report: &RepositoryMetrics) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }

    fn write_single_file(&mut self, report: &SingleFileReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_file_line(&mut self, file: &crate::core::FileMetrics) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "  {:<40} loc {:>5}  nom {:>3}  cc {:>5.2}/{:<3}  {}",
            file.path.display(),
            file.loc,
            file.nom,
            file.cc_avg,
            file.cc_max,
            file.paradigm
        )?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_repository(&mut self, report: &RepositoryMetrics) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", format!("Repository: {}", report.repo).bold())?;
        if let Some(path) = &report.local_path {
            writeln!(self.writer, "Local path: {}", path.display())?;
        }
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Files: {}   LOC: {}   Functions: {}   Classes: {}",
            report.total_files, report.total_loc, report.total_nom, report.total_classes
        )?;
        writeln!(
            self.writer,
            "avg CC: {}   avg MPC: {}   total CBO: {}   avg LCOM: {}",
            report.avg_cc, report.avg_mpc, report.total_cbo, report.avg_lcom
        )?;

        let distribution: Vec<String> = report
            .paradigm_distribution
            .iter()
            .map(|(label, count)| format!("{label}: {count}"))
            .collect();
        writeln!(
            self.writer,
            "Paradigm: {} ({})",
            report.paradigm.to_string().cyan(),
            distribution.join(", ")
        )?;

        if !report.files.is_empty() {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", "Per-file metrics:".bold())?;
            for file in &report.files {
                self.write_file_line(file)?;
            }
        }
        Ok(())
    }

    fn write_single_file(&mut self, report: &SingleFileReport) -> anyhow::Result<()> {
        let file = &report.file;
        writeln!(
            self.writer,
            "{}",
            format!("File: {}", file.path.display()).bold()
        )?;
        writeln!(
            self.writer,
            "loc {}  nom {}  cc_avg {}  cc_max {}  mpc {}  cbo {}  lcom {}  paradigm {}",
            file.loc,
            file.nom,
            file.cc_avg,
            file.cc_max,
            file.mpc,
            file.cbo,
            file.lcom,
            file.paradigm
        )?;
        if !file.complexities.is_empty() {
            writeln!(self.writer, "Functions:")?;
            for fc in &file.complexities {
                writeln!(
                    self.writer,
                    "  {:<30} line {:>4}  cc {}",
                    fc.function, fc.start_line, fc.cc
                )?;
            }
        }
        Ok(())
    }
}

/// Writer for the requested format, targeting a file when `output` is set
/// and stdout otherwise.
pub fn create_writer(
    format: OutputFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let target: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(target)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(target)),
    })
}
