use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::config::AnalysisConfig;

pub struct FileWalker {
    root: PathBuf,
    extensions: Vec<String>,
    skip_directories: Vec<String>,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        let defaults = AnalysisConfig::default();
        Self {
            root,
            extensions: defaults.extensions,
            skip_directories: defaults.skip_directories,
            ignore_patterns: defaults.ignore_patterns,
        }
    }

    pub fn with_config(mut self, config: &AnalysisConfig) -> Self {
        self.extensions = config.extensions.clone();
        self.skip_directories = config.skip_directories.clone();
        self.ignore_patterns = config.ignore_patterns.clone();
        self
    }

    /// Collect matching files, sorted by path for stable output order.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let skip = self.skip_directories.clone();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !skip.iter().any(|s| s == name.as_ref())
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if !self.extensions.iter().any(|e| e == ext) {
            return false;
        }

        let path_str = path.to_string_lossy();
        for pattern in &self.ignore_patterns {
            if glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
            {
                return false;
            }
        }
        true
    }
}

pub fn find_r_files(root: &Path, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    FileWalker::new(root.to_path_buf()).with_config(config).walk()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x <- 1\n").unwrap();
    }

    #[test]
    fn walks_only_r_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.R"));
        touch(&dir.path().join("b.r"));
        touch(&dir.path().join("c.Rmd"));
        touch(&dir.path().join("d.py"));
        touch(&dir.path().join("e.txt"));

        let files = find_r_files(dir.path(), &AnalysisConfig::default()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.R", "b.r", "c.Rmd"]);
    }

    #[test]
    fn prunes_skip_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("keep.R"));
        touch(&dir.path().join(".git/hidden.R"));
        touch(&dir.path().join("node_modules/dep.R"));
        touch(&dir.path().join(".Rproj.user/cache.R"));
        touch(&dir.path().join("nested/ok.R"));

        let files = find_r_files(dir.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| {
            let s = p.to_string_lossy();
            !s.contains(".git") && !s.contains("node_modules")
        }));
    }

    #[test]
    fn ignore_patterns_filter_paths() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("keep.R"));
        touch(&dir.path().join("generated/skip.R"));

        let mut config = AnalysisConfig::default();
        config.ignore_patterns = vec!["**/generated/**".to_string()];
        let files = find_r_files(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
    }
}
