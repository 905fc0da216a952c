//! Repository acquisition. A target that looks like a git URL is cloned
//! into a temporary directory that lives for the duration of the run;
//! a target that is an existing directory is analyzed in place.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::errors::RqualError;

const KNOWN_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

/// Whether a target string names a remote repository rather than a local
/// path. Existing local paths always win, so a directory literally named
/// `owner/repo` is still analyzed in place.
pub fn is_git_url(target: &str) -> bool {
    if Path::new(target).exists() {
        return false;
    }
    if target.starts_with("http://") || target.starts_with("https://") || target.starts_with("git@")
    {
        return true;
    }
    if KNOWN_HOSTS.iter().any(|h| target.contains(h)) {
        return true;
    }
    // owner/repo shorthand: exactly one slash, no path-like prefix
    let parts: Vec<&str> = target.split('/').collect();
    parts.len() == 2 && parts.iter().all(|p| !p.is_empty() && !p.starts_with('.'))
}

/// Expand shorthand and host names into a cloneable URL.
pub fn normalize_url(target: &str) -> String {
    if target.starts_with("git@") {
        return target.to_string();
    }
    if target.starts_with("http://") || target.starts_with("https://") {
        if target.ends_with(".git") {
            return target.to_string();
        }
        return format!("{}.git", target.trim_end_matches('/'));
    }
    if KNOWN_HOSTS.iter().any(|h| target.starts_with(h)) {
        return format!("https://{}.git", target.trim_end_matches('/'));
    }
    format!("https://github.com/{}.git", target.trim_end_matches('/'))
}

/// Repository name from the last URL segment, without the `.git` suffix.
fn repo_name(url: &str) -> String {
    url.trim_end_matches('/')
        .trim_end_matches(".git")
        .rsplit(['/', ':'])
        .next()
        .unwrap_or("repository")
        .to_string()
}

#[derive(Debug)]
pub struct AcquiredRepo {
    pub root: PathBuf,
    pub name: String,
    pub origin: String,
    temp: Option<TempDir>,
}

impl AcquiredRepo {
    pub fn local(root: PathBuf) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root.to_string_lossy().to_string());
        let origin = root.to_string_lossy().to_string();
        Self {
            root,
            name,
            origin,
            temp: None,
        }
    }

    /// Label used in the report: the origin URL or local path.
    pub fn identifier(&self) -> String {
        self.origin.clone()
    }

    /// Persist a cloned working tree past the run instead of deleting it
    /// on drop. Returns the retained path.
    pub fn keep(&mut self) -> Option<PathBuf> {
        self.temp.take().map(TempDir::keep)
    }
}

/// Resolve a target into a local working tree, cloning when remote.
pub fn acquire(target: &str) -> Result<AcquiredRepo, RqualError> {
    if !is_git_url(target) {
        let path = PathBuf::from(target);
        if !path.exists() {
            return Err(RqualError::TargetNotFound(path));
        }
        if !path.is_dir() {
            return Err(RqualError::NotADirectory(path));
        }
        return Ok(AcquiredRepo::local(path));
    }

    let url = normalize_url(target);
    let name = repo_name(&url);
    let temp = tempfile::tempdir().map_err(RqualError::CloneDir)?;
    let root = temp.path().join(&name);

    log::info!("cloning {} into {}", url, root.display());
    git2::Repository::clone(&url, &root).map_err(|source| RqualError::Clone {
        url: url.clone(),
        source,
    })?;

    let origin = url.trim_end_matches(".git").to_string();
    Ok(AcquiredRepo {
        root,
        name,
        origin,
        temp: Some(temp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_shorthand_are_remote() {
        assert!(is_git_url("https://github.com/r-lib/R6"));
        assert!(is_git_url("git@github.com:r-lib/R6.git"));
        assert!(is_git_url("github.com/r-lib/R6"));
        assert!(is_git_url("r-lib/R6"));
    }

    #[test]
    fn local_paths_are_not_remote() {
        assert!(!is_git_url("."));
        assert!(!is_git_url("/tmp"));
        assert!(!is_git_url("src/io"));
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_git_url(&dir.path().to_string_lossy()));
    }

    #[test]
    fn normalization_expands_shorthand() {
        assert_eq!(
            normalize_url("r-lib/R6"),
            "https://github.com/r-lib/R6.git"
        );
        assert_eq!(
            normalize_url("github.com/r-lib/R6"),
            "https://github.com/r-lib/R6.git"
        );
        assert_eq!(
            normalize_url("https://gitlab.com/user/proj"),
            "https://gitlab.com/user/proj.git"
        );
        assert_eq!(
            normalize_url("https://github.com/r-lib/R6.git"),
            "https://github.com/r-lib/R6.git"
        );
        assert_eq!(
            normalize_url("git@github.com:r-lib/R6.git"),
            "git@github.com:r-lib/R6.git"
        );
    }

    #[test]
    fn repo_name_strips_suffix() {
        assert_eq!(repo_name("https://github.com/r-lib/R6.git"), "R6");
        assert_eq!(repo_name("git@github.com:r-lib/R6.git"), "R6");
        assert_eq!(repo_name("https://github.com/r-lib/R6/"), "R6");
    }

    #[test]
    fn missing_local_target_is_an_error() {
        let err = acquire("/no/such/place/at/all").unwrap_err();
        assert!(matches!(err, RqualError::TargetNotFound(_)));
    }

    #[test]
    fn local_directory_resolves_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let repo = acquire(&dir.path().to_string_lossy()).unwrap();
        assert_eq!(repo.root, dir.path());
        assert_eq!(repo.identifier(), dir.path().to_string_lossy());
        assert_eq!(
            repo.name,
            dir.path().file_name().unwrap().to_string_lossy()
        );
    }
}
