pub mod metrics;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Which OOP idiom introduced a class.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassIdiom {
    S3,
    S4,
    R6,
    RefClass,
}

/// Optional class back-reference for a function. Methods never own their
/// class; the class owns the method-name list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MethodBinding {
    Unbound,
    BoundTo(String),
}

/// A function definition recovered from source text. The body span is
/// brace-balanced and may be truncated at end-of-file for malformed input.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub body: String,
    pub binding: MethodBinding,
}

/// A class declaration with its ordered method-name list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub idiom: ClassIdiom,
    pub methods: Vec<String>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, idiom: ClassIdiom) -> Self {
        Self {
            name: name.into(),
            idiom,
            methods: Vec::new(),
        }
    }

    pub fn add_method(&mut self, method: &str) {
        if !self.methods.iter().any(|m| m == method) {
            self.methods.push(method.to_string());
        }
    }
}

/// Structural classification of a file.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Paradigm {
    Functional,
    Oop,
    Mixed,
}

impl Paradigm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Paradigm::Functional => "functional",
            Paradigm::Oop => "oop",
            Paradigm::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Paradigm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-function complexity detail, emitted in source order for diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionComplexity {
    pub function: String,
    pub start_line: usize,
    pub cc: u32,
}

/// One file's derived metrics. Immutable once produced.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileMetrics {
    pub path: PathBuf,
    pub loc: usize,
    pub nom: usize,
    pub cc_avg: f64,
    pub cc_max: u32,
    pub mpc: f64,
    pub cbo: usize,
    pub lcom: usize,
    pub paradigm: Paradigm,
    pub classes: BTreeMap<String, usize>,
    pub num_classes: usize,
    pub complexities: Vec<FunctionComplexity>,
}

impl FileMetrics {
    /// Fully-populated zero record for a file with no functions or classes.
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            loc: 0,
            nom: 0,
            cc_avg: 0.0,
            cc_max: 0,
            mpc: 0.0,
            cbo: 0,
            lcom: 0,
            paradigm: Paradigm::Functional,
            classes: BTreeMap::new(),
            num_classes: 0,
            complexities: Vec::new(),
        }
    }
}

/// Repository-level reduction over per-file records.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RepositoryMetrics {
    pub repo: String,
    pub local_path: Option<PathBuf>,
    pub total_files: usize,
    pub total_loc: usize,
    pub total_nom: usize,
    pub avg_cc: f64,
    pub avg_mpc: f64,
    pub total_cbo: usize,
    pub avg_lcom: f64,
    pub paradigm: Paradigm,
    pub paradigm_distribution: BTreeMap<String, usize>,
    pub total_classes: usize,
    pub files: Vec<FileMetrics>,
}

/// Wrapper for single-file invocations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SingleFileReport {
    pub file: FileMetrics,
    pub single_file: bool,
}

impl SingleFileReport {
    pub fn new(file: FileMetrics) -> Self {
        Self {
            file,
            single_file: true,
        }
    }
}
